use super::direction::{Direction, MovementState};

/// An entity whose movement and facing can be driven by a controller.
///
/// The controller never inspects the entity beyond these three calls.
pub trait ControllableEntity {
    /// Advance the entity's position for this tick.
    fn compute_next_position(&mut self, direction: Direction, elapsed_seconds: f32);

    fn set_state(&mut self, state: MovementState);

    fn set_direction(&mut self, direction: Direction);
}
