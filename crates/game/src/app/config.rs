use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use engine::{AppPaths, LoopConfig};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::sim::Tuning;

pub(crate) const CONFIG_ENV_VAR: &str = "FLOIOIDE_CONFIG";
const CONFIG_FILE_NAME: &str = "game.json";

/// Everything tunable without a rebuild. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    #[serde(rename = "loop")]
    pub loop_config: LoopConfig,
    pub tuning: Tuning,
    /// Sprite pixels with alpha above this count as solid in hit masks.
    pub mask_alpha_threshold: u8,
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path} at `{json_path}`: {source}")]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigSource {
    /// Named by the environment; must exist.
    Explicit(PathBuf),
    /// The repo default; silently optional.
    Default(PathBuf),
}

pub(crate) fn load_game_config(paths: &AppPaths) -> Result<GameConfig, ConfigError> {
    match resolve_config_source(paths)? {
        ConfigSource::Explicit(path) => load_config_file(&path),
        ConfigSource::Default(path) => load_config_or_default(&path),
    }
}

fn resolve_config_source(paths: &AppPaths) -> Result<ConfigSource, ConfigError> {
    match env::var(CONFIG_ENV_VAR) {
        Ok(value) => Ok(ConfigSource::Explicit(PathBuf::from(value))),
        Err(env::VarError::NotPresent) => Ok(ConfigSource::Default(
            paths.config_dir().join(CONFIG_FILE_NAME),
        )),
        Err(source) => Err(ConfigError::EnvVar {
            var: CONFIG_ENV_VAR,
            source,
        }),
    }
}

fn load_config_or_default(path: &Path) -> Result<GameConfig, ConfigError> {
    if !path.is_file() {
        info!(path = %path.display(), "config_missing_using_defaults");
        return Ok(GameConfig::default());
    }
    load_config_file(path)
}

fn load_config_file(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&raw, path)?;
    info!(path = %path.display(), "config_loaded");
    Ok(config)
}

fn parse_config(raw: &str, path: &Path) -> Result<GameConfig, ConfigError> {
    let deserializer = &mut serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(deserializer).map_err(|error| ConfigError::Parse {
        path: path.to_path_buf(),
        json_path: error.path().to_string(),
        source: error.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::BossMovement;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn missing_default_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config_or_default(&dir.path().join("absent.json")).expect("defaults");
        assert_eq!(config.loop_config, LoopConfig::default());
        assert_eq!(config.tuning.player.max_hp, 20);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = load_config_file(&dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(error, ConfigError::Read { .. }));
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(
            &dir,
            r#"{
                "loop": { "window_title": "Arena", "show_overlay": true },
                "tuning": {
                    "player": { "allow_double_jump": true },
                    "boss": { "movement": { "kind": "keep_distance", "min": 96, "max": 256, "speed": 2 } }
                },
                "mask_alpha_threshold": 16
            }"#,
        );

        let config = load_config_file(&path).expect("load");

        assert_eq!(config.loop_config.window_title, "Arena");
        assert!(config.loop_config.show_overlay);
        assert_eq!(config.loop_config.target_tps, 60);
        assert!(config.tuning.player.allow_double_jump);
        assert_eq!(config.tuning.player.max_hp, 20);
        assert_eq!(
            config.tuning.boss.movement,
            BossMovement::KeepDistance {
                min: 96.0,
                max: 256.0,
                speed: 2.0
            }
        );
        assert_eq!(config.mask_alpha_threshold, 16);
    }

    #[test]
    fn unknown_field_reports_json_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, r#"{"tuning": {"player": {"moon_gravity": 1}}}"#);

        let error = load_config_file(&path).expect_err("unknown field");

        match error {
            ConfigError::Parse { json_path, .. } => {
                assert_eq!(json_path, "tuning.player.moon_gravity");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wrong_type_reports_json_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, r#"{"loop": {"target_tps": "fast"}}"#);

        let error = load_config_file(&path).expect_err("wrong type");

        match error {
            ConfigError::Parse { json_path, .. } => assert_eq!(json_path, "loop.target_tps"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn repo_config_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("assets")
            .join("config")
            .join(CONFIG_FILE_NAME);
        load_config_file(&path).expect("shipped config should parse");
    }
}
