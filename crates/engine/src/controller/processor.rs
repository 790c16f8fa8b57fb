use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;
use winit::keyboard::KeyCode;

use super::direction::{Direction, MovementState, DEFAULT_DIRECTION, DIRECTION_PRIORITY};
use super::entity::ControllableEntity;
use super::held_keys::HeldKeys;
use super::keys::direction_for_key;

/// Receiver of raw key transitions. Returns `true` when the key was consumed.
pub trait KeyEventHandler {
    fn key_down(&mut self, key: KeyCode) -> bool;

    fn key_up(&mut self, key: KeyCode) -> bool;
}

/// Turns held movement keys into one direction and state per tick and drives
/// the bound entity with it.
///
/// Key events only record which directions are held. The bound entity is
/// touched exclusively from [`PlayerInputController::tick`], so however many
/// events arrive between two ticks the entity observes a single change.
///
/// The controller holds a non-owning handle to the entity: the owner may drop
/// it or rebind another one at any time, and ticking without a live entity is
/// a no-op.
#[derive(Default)]
pub struct PlayerInputController {
    held: HeldKeys,
    player: Option<Weak<RefCell<dyn ControllableEntity>>>,
}

impl PlayerInputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route subsequent ticks to `entity`. With `apply_defaults` the entity is
    /// faced towards [`DEFAULT_DIRECTION`] and set idle right away.
    pub fn bind_entity<E>(&mut self, entity: &Rc<RefCell<E>>, apply_defaults: bool)
    where
        E: ControllableEntity + 'static,
    {
        let handle: Weak<RefCell<dyn ControllableEntity>> = Rc::downgrade(entity) as Weak<RefCell<E>>;
        self.player = Some(handle);
        if apply_defaults {
            let mut entity = entity.borrow_mut();
            entity.set_direction(DEFAULT_DIRECTION);
            entity.set_state(MovementState::Idle);
        }
        debug!(apply_defaults, "player_entity_bound");
    }

    pub fn unbind_entity(&mut self) {
        if self.player.take().is_some() {
            debug!("player_entity_unbound");
        }
    }

    pub fn has_bound_entity(&self) -> bool {
        self.player
            .as_ref()
            .is_some_and(|handle| handle.strong_count() > 0)
    }

    /// Forget every held key, e.g. after focus loss swallowed key-up events.
    pub fn reset_held_keys(&mut self) {
        self.held.clear();
        debug!("player_input_reset");
    }

    pub fn any_key_held(&self) -> bool {
        self.held.any_down()
    }

    /// First held direction in [`DIRECTION_PRIORITY`] order.
    pub fn resolve_direction(&self) -> Option<Direction> {
        DIRECTION_PRIORITY
            .into_iter()
            .find(|direction| self.held.is_down(*direction))
    }

    /// Apply the held keys to the bound entity and return the direction moved
    /// in, if any. Nothing happens while no live entity is bound.
    pub fn tick(&mut self, elapsed_seconds: f32) -> Option<Direction> {
        let player = self.player.as_ref().and_then(Weak::upgrade)?;
        let mut player = player.borrow_mut();
        match self.resolve_direction() {
            Some(direction) => {
                player.set_state(MovementState::Walking);
                player.set_direction(direction);
                player.compute_next_position(direction, elapsed_seconds);
                Some(direction)
            }
            None => {
                player.set_state(MovementState::Idle);
                None
            }
        }
    }

    fn set_key(&mut self, key: KeyCode, is_down: bool) -> bool {
        match direction_for_key(key) {
            Some(direction) => {
                self.held.set(direction, is_down);
                true
            }
            None => false,
        }
    }
}

impl KeyEventHandler for PlayerInputController {
    fn key_down(&mut self, key: KeyCode) -> bool {
        self.set_key(key, true)
    }

    fn key_up(&mut self, key: KeyCode) -> bool {
        self.set_key(key, false)
    }
}
