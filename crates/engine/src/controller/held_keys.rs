use super::direction::{Direction, DIRECTION_COUNT};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct HeldKeys {
    down: [bool; DIRECTION_COUNT],
}

impl HeldKeys {
    pub(crate) fn set(&mut self, direction: Direction, is_down: bool) {
        self.down[direction.index()] = is_down;
    }

    pub(crate) fn is_down(&self, direction: Direction) -> bool {
        self.down[direction.index()]
    }

    pub(crate) fn clear(&mut self) {
        self.down = [false; DIRECTION_COUNT];
    }

    pub(crate) fn any_down(&self) -> bool {
        self.down.iter().any(|is_down| *is_down)
    }
}
