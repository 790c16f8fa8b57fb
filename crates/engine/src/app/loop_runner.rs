use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::assets::{AssetError, Toolbox};
use crate::controller::{KeyEventHandler, PlayerInputController};
use crate::{resolve_app_paths, StartupError};

use super::scene::{Scene, SceneCommand, SceneContext};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    /// Queued assets loaded per frame while the load queue is not empty.
    pub asset_loads_per_frame: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Marty Adventure".to_string(),
            window_width: 960,
            window_height: 540,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            asset_loads_per_frame: 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to load scene: {0}")]
    SceneLoad(#[from] AssetError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Forward a raw key transition to `handler`. Returns whether it was handled.
pub fn dispatch_key_event(
    handler: &mut dyn KeyEventHandler,
    key: PhysicalKey,
    state: ElementState,
) -> bool {
    let PhysicalKey::Code(code) = key else {
        return false;
    };
    match state {
        ElementState::Pressed => handler.key_down(code),
        ElementState::Released => handler.key_up(code),
    }
}

pub fn run_app(config: LoopConfig, scene: Box<dyn Scene>) -> Result<(), AppError> {
    let app_paths = resolve_app_paths()?;
    info!(
        root = %app_paths.root.display(),
        asset_dir = %app_paths.asset_dir.display(),
        "startup"
    );

    let mut state = LoopState::new(Toolbox::new(app_paths.asset_dir.clone()), scene);
    state.load_scene()?;
    info!(
        queued_assets = state.toolbox.queued_asset_count(),
        "scene_loaded"
    );

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = WindowBuilder::new()
        .with_title(config.window_title.clone())
        .with_inner_size(LogicalSize::new(
            config.window_width as f64,
            config.window_height as f64,
        ))
        .build(&event_loop)
        .map_err(AppError::CreateWindow)?;

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let asset_loads_per_frame = config.asset_loads_per_frame.max(1);
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        asset_loads_per_frame,
        "loop_config"
    );

    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Focused(false) => state.focus_lost(),
                WindowEvent::KeyboardInput { event, .. } => {
                    if is_quit_key(event.physical_key) && event.state == ElementState::Pressed {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                        return;
                    }
                    state.handle_key(event.physical_key, event.state);
                }
                _ => {}
            },
            Event::AboutToWait => {
                let now = Instant::now();
                let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                last_frame_instant = now;
                accumulator =
                    accumulator.saturating_add(clamp_frame_delta(raw_frame_dt, max_frame_delta));

                state.advance_loading(asset_loads_per_frame);

                let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                for _ in 0..step_plan.ticks_to_run {
                    if state.run_tick(fixed_dt_seconds) == SceneCommand::Quit {
                        info!(reason = "scene_quit", "shutdown_requested");
                        window_target.exit();
                        return;
                    }
                }
                accumulator = step_plan.remaining_accumulator;

                if step_plan.dropped_backlog > Duration::ZERO {
                    warn!(
                        dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                        max_ticks_per_frame, "sim_clamp_triggered"
                    );
                }

                let until_next_tick = fixed_dt.saturating_sub(accumulator);
                window_target.set_control_flow(ControlFlow::WaitUntil(now + until_next_tick));
            }
            Event::LoopExiting => {
                state.shutdown();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Everything the event loop drives, kept apart from winit so it can be
/// exercised without a window.
struct LoopState {
    controller: PlayerInputController,
    toolbox: Toolbox,
    scene: Box<dyn Scene>,
}

impl LoopState {
    fn new(toolbox: Toolbox, scene: Box<dyn Scene>) -> Self {
        Self {
            controller: PlayerInputController::new(),
            toolbox,
            scene,
        }
    }

    fn load_scene(&mut self) -> Result<(), AssetError> {
        let mut ctx = SceneContext {
            controller: &mut self.controller,
            toolbox: &mut self.toolbox,
        };
        self.scene.load(&mut ctx)
    }

    fn handle_key(&mut self, key: PhysicalKey, state: ElementState) -> bool {
        dispatch_key_event(&mut self.controller, key, state)
    }

    fn focus_lost(&mut self) {
        // Key-up events for keys released while unfocused never arrive.
        self.controller.reset_held_keys();
        debug!("window_focus_lost");
    }

    fn advance_loading(&mut self, max_steps: u32) {
        if self.toolbox.queued_asset_count() == 0 {
            return;
        }
        for _ in 0..max_steps {
            match self.toolbox.update_asset_loading() {
                Ok(true) => {
                    info!("asset_queue_drained");
                    return;
                }
                Ok(false) => {}
                Err(error) => warn!(error = %error, "asset_queue_load_failed"),
            }
        }
        debug!(
            completion = self.toolbox.load_completion(),
            queued = self.toolbox.queued_asset_count(),
            "asset_loading_progress"
        );
    }

    fn run_tick(&mut self, fixed_dt_seconds: f32) -> SceneCommand {
        self.controller.tick(fixed_dt_seconds);
        let mut ctx = SceneContext {
            controller: &mut self.controller,
            toolbox: &mut self.toolbox,
        };
        self.scene.update(fixed_dt_seconds, &mut ctx)
    }

    fn shutdown(&mut self) {
        let mut ctx = SceneContext {
            controller: &mut self.controller,
            toolbox: &mut self.toolbox,
        };
        self.scene.unload(&mut ctx);
        self.controller.unbind_entity();
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    let dropped_backlog = if accumulator >= fixed_dt {
        std::mem::take(&mut accumulator)
    } else {
        Duration::ZERO
    };
    StepPlan {
        ticks_to_run,
        remaining_accumulator: accumulator,
        dropped_backlog,
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn is_quit_key(key: PhysicalKey) -> bool {
    matches!(key, PhysicalKey::Code(KeyCode::Escape))
}
