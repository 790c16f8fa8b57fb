use marty_engine::{resolve_app_paths, LoopConfig, Scene};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::config::{load_game_config, resolve_target_tps, GameConfig, GAME_CONFIG_FILE};
use super::level::LevelScene;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, String> {
    init_tracing();
    info!("=== Marty Adventure Startup ===");

    let game_config = read_game_config()?;
    let defaults = LoopConfig::default();
    let config = LoopConfig {
        target_tps: resolve_target_tps(game_config.target_tps, defaults.target_tps),
        ..defaults
    };
    info!(target_tps = config.target_tps, "loop_config_resolved");

    Ok(AppWiring {
        config,
        scene: Box::new(LevelScene::new(game_config)),
    })
}

// Root resolution errors are reported by the loop itself; here they only mean
// there is no config file to read.
fn read_game_config() -> Result<GameConfig, String> {
    match resolve_app_paths() {
        Ok(paths) => load_game_config(&paths.asset_dir.join(GAME_CONFIG_FILE)),
        Err(error) => {
            warn!(error = %error, "game_config_skipped");
            Ok(GameConfig::default())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
