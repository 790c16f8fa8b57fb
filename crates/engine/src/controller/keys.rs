use winit::keyboard::{KeyCode, PhysicalKey};

use super::direction::Direction;

pub fn direction_for_key(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::KeyW => Some(Direction::Up),
        KeyCode::KeyS => Some(Direction::Down),
        KeyCode::KeyA => Some(Direction::Left),
        KeyCode::KeyD => Some(Direction::Right),
        _ => None,
    }
}

pub fn direction_for_physical_key(key: PhysicalKey) -> Option<Direction> {
    match key {
        PhysicalKey::Code(code) => direction_for_key(code),
        PhysicalKey::Unidentified(_) => None,
    }
}
