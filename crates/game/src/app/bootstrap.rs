use engine::{resolve_app_paths, AppPaths, LoopConfig, Scene, StartupError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::arena::build_arena;
use super::config::{load_game_config, ConfigError};
use super::gameplay::GameplayScene;
use super::masks::load_masks;
use crate::sim::World;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) paths: AppPaths,
    pub(crate) scene: Box<dyn Scene>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "=== Floioide Startup ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "project_root_resolved");
    let game_config = load_game_config(&paths)?;

    let tuning = game_config.tuning;
    let level = build_arena(tuning.physics.tile_size);
    let masks = load_masks(&paths.assets_dir, game_config.mask_alpha_threshold);
    let world = World::new(tuning, level, masks);
    let scene = GameplayScene::new(world, game_config.loop_config.viewport());

    Ok(AppWiring {
        config: game_config.loop_config,
        paths,
        scene: Box::new(scene),
    })
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
