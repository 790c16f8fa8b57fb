mod direction;
mod entity;
mod held_keys;
mod keys;
mod processor;

pub use direction::{Direction, MovementState, DEFAULT_DIRECTION, DIRECTION_PRIORITY};
pub use entity::ControllableEntity;
pub use keys::{direction_for_key, direction_for_physical_key};
pub use processor::{KeyEventHandler, PlayerInputController};
