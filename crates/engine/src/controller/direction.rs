/// Facing and movement direction of a controllable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Locomotion status of a controllable entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MovementState {
    #[default]
    Idle,
    Walking,
}

pub(crate) const DIRECTION_COUNT: usize = 4;

/// Tie-break order used when several directions are held at once. Vertical
/// movement wins over horizontal; the first entry is also the starting facing.
pub const DIRECTION_PRIORITY: [Direction; DIRECTION_COUNT] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

pub const DEFAULT_DIRECTION: Direction = DIRECTION_PRIORITY[0];

impl Direction {
    pub(crate) const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Unit step in world space, +y up.
    pub const fn unit_vector(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, 1.0),
            Direction::Down => (0.0, -1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_is_vertical_first() {
        assert_eq!(
            DIRECTION_PRIORITY,
            [
                Direction::Up,
                Direction::Down,
                Direction::Left,
                Direction::Right
            ]
        );
        assert_eq!(DEFAULT_DIRECTION, Direction::Up);
    }

    #[test]
    fn indices_are_dense_and_unique() {
        let mut seen = [false; DIRECTION_COUNT];
        for direction in DIRECTION_PRIORITY {
            assert!(!seen[direction.index()], "direction={direction:?}");
            seen[direction.index()] = true;
        }
        assert!(seen.iter().all(|flag| *flag));
    }

    #[test]
    fn default_state_is_idle() {
        assert_eq!(MovementState::default(), MovementState::Idle);
    }
}
