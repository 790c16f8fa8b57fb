mod loop_runner;
mod scene;

pub use loop_runner::{dispatch_key_event, run_app, AppError, LoopConfig};
pub use scene::{Scene, SceneCommand, SceneContext};
