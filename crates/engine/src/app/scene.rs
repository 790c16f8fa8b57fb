use crate::assets::{AssetError, Toolbox};
use crate::controller::PlayerInputController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

/// Loop-owned services a scene may use while it is active.
pub struct SceneContext<'a> {
    pub controller: &'a mut PlayerInputController,
    pub toolbox: &'a mut Toolbox,
}

pub trait Scene {
    /// Called once before the first tick. A returned error aborts startup.
    fn load(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), AssetError>;

    /// Called once per fixed tick, after the controller has driven the bound
    /// entity for that tick.
    fn update(&mut self, fixed_dt_seconds: f32, ctx: &mut SceneContext<'_>) -> SceneCommand;

    fn unload(&mut self, ctx: &mut SceneContext<'_>);
}
