use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

pub(crate) const GAME_CONFIG_FILE: &str = "game.json";
pub(crate) const TARGET_TPS_ENV_VAR: &str = "MARTY_TARGET_TPS";

/// Level and tuning values read from `assets/game.json`. Asset paths are
/// relative to the asset directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) map_path: String,
    pub(crate) atlas_path: Option<String>,
    pub(crate) skin_path: Option<String>,
    pub(crate) texture_path: Option<String>,
    pub(crate) spawn_object: String,
    pub(crate) player_move_speed: f32,
    pub(crate) target_tps: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_path: "maps/town.tmx".to_string(),
            atlas_path: Some("sprites/marty.atlas".to_string()),
            skin_path: Some("ui/uiskin.json".to_string()),
            texture_path: Some("sprites/marty.png".to_string()),
            spawn_object: "player_spawn".to_string(),
            player_move_speed: 4.0,
            target_tps: None,
        }
    }
}

pub(crate) fn load_game_config(path: &Path) -> Result<GameConfig, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "game_config_missing_using_defaults");
            return Ok(GameConfig::default());
        }
        Err(error) => return Err(format!("read {}: {error}", path.display())),
    };

    let config =
        parse_game_config(&raw).map_err(|error| format!("{}: {error}", path.display()))?;
    if !config.player_move_speed.is_finite() || config.player_move_speed < 0.0 {
        return Err(format!(
            "{}: player_move_speed must be a non-negative number, got {}",
            path.display(),
            config.player_move_speed
        ));
    }
    info!(path = %path.display(), map = %config.map_path, "game_config_loaded");
    Ok(config)
}

fn parse_game_config(raw: &str) -> Result<GameConfig, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, GameConfig>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let source = error.into_inner();
        if path.is_empty() || path == "." {
            format!("parse game config: {source}")
        } else {
            format!("parse game config at {path}: {source}")
        }
    })
}

/// The env var wins over the file; an unparsable or zero value is ignored.
pub(crate) fn resolve_target_tps(configured: Option<u32>, default_tps: u32) -> u32 {
    let from_env = std::env::var(TARGET_TPS_ENV_VAR).ok();
    target_tps_from_sources(from_env.as_deref(), configured, default_tps)
}

fn target_tps_from_sources(
    env_value: Option<&str>,
    configured: Option<u32>,
    default_tps: u32,
) -> u32 {
    if let Some(raw) = env_value {
        match raw.trim().parse::<u32>() {
            Ok(tps) if tps > 0 => return tps,
            _ => warn!(
                var = TARGET_TPS_ENV_VAR,
                value = raw,
                "invalid_target_tps_env_ignored"
            ),
        }
    }
    configured.filter(|tps| *tps > 0).unwrap_or(default_tps)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().expect("temp");
        let config = load_game_config(&temp.path().join(GAME_CONFIG_FILE)).expect("config");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_absent_fields() {
        let config = parse_game_config(r#"{ "map_path": "maps/cave.tmx", "skin_path": null }"#)
            .expect("parse");
        assert_eq!(config.map_path, "maps/cave.tmx");
        assert_eq!(config.skin_path, None);
        assert_eq!(config.player_move_speed, GameConfig::default().player_move_speed);
    }

    #[test]
    fn type_errors_report_the_field_path() {
        let error = parse_game_config(r#"{ "player_move_speed": "fast" }"#).expect_err("bad");
        assert!(error.contains("at player_move_speed"), "{error}");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = parse_game_config(r#"{ "map": "x.tmx" }"#).expect_err("unknown");
        assert!(error.contains("unknown field"), "{error}");
    }

    #[test]
    fn negative_speed_is_rejected_on_load() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join(GAME_CONFIG_FILE);
        fs::write(&path, r#"{ "player_move_speed": -1.0 }"#).expect("write");
        let error = load_game_config(&path).expect_err("negative");
        assert!(error.contains("player_move_speed"), "{error}");
    }

    #[test]
    fn env_target_tps_overrides_file_value() {
        assert_eq!(target_tps_from_sources(Some("30"), Some(120), 60), 30);
        assert_eq!(target_tps_from_sources(None, Some(120), 60), 120);
        assert_eq!(target_tps_from_sources(None, None, 60), 60);
    }

    #[test]
    fn invalid_env_target_tps_falls_back() {
        assert_eq!(target_tps_from_sources(Some("0"), Some(120), 60), 120);
        assert_eq!(target_tps_from_sources(Some("lots"), None, 60), 60);
        assert_eq!(target_tps_from_sources(None, Some(0), 60), 60);
    }

    #[test]
    fn shipped_game_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../assets")
            .join(GAME_CONFIG_FILE);
        let config = load_game_config(&path).expect("shipped config");
        assert_eq!(config, GameConfig::default());
    }
}
