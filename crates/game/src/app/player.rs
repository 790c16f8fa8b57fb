use marty_engine::{ControllableEntity, Direction, MovementState, DEFAULT_DIRECTION};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Position {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

/// The player character as the controller sees it. Position is in map tiles,
/// +y up.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlayerEntity {
    position: Position,
    move_speed: f32,
    direction: Direction,
    state: MovementState,
}

impl PlayerEntity {
    pub(crate) fn new(position: Position, move_speed: f32) -> Self {
        Self {
            position,
            move_speed,
            direction: DEFAULT_DIRECTION,
            state: MovementState::Idle,
        }
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn place_at(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn state(&self) -> MovementState {
        self.state
    }
}

impl ControllableEntity for PlayerEntity {
    fn compute_next_position(&mut self, direction: Direction, elapsed_seconds: f32) {
        let (dx, dy) = direction.unit_vector();
        let step = self.move_speed * elapsed_seconds.max(0.0);
        self.position.x += dx * step;
        self.position.y += dy * step;
    }

    fn set_state(&mut self, state: MovementState) {
        self.state = state;
    }

    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Position, expected: Position) {
        assert!(
            (actual.x - expected.x).abs() < 1e-5 && (actual.y - expected.y).abs() < 1e-5,
            "actual={actual:?} expected={expected:?}"
        );
    }

    #[test]
    fn moves_by_speed_times_elapsed_along_direction() {
        let mut player = PlayerEntity::new(Position { x: 1.0, y: 1.0 }, 4.0);
        player.compute_next_position(Direction::Right, 0.5);
        assert_close(player.position(), Position { x: 3.0, y: 1.0 });
        player.compute_next_position(Direction::Down, 0.25);
        assert_close(player.position(), Position { x: 3.0, y: 0.0 });
    }

    #[test]
    fn negative_elapsed_does_not_move_backwards() {
        let mut player = PlayerEntity::new(Position::default(), 4.0);
        player.compute_next_position(Direction::Up, -1.0);
        assert_eq!(player.position(), Position::default());
    }

    #[test]
    fn starts_idle_facing_default_direction() {
        let player = PlayerEntity::new(Position::default(), 1.0);
        assert_eq!(player.direction(), DEFAULT_DIRECTION);
        assert_eq!(player.state(), MovementState::Idle);
    }
}
