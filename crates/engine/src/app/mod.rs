mod draw_list;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod tools;

pub use draw_list::{DrawCommand, DrawList, DrawSpace};
pub use input::InputAction;
pub use loop_runner::{run_app, run_app_with_metrics, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use rendering::{
    screen_to_world, world_to_screen, Renderer, Viewport, PLACEHOLDER_COLOR,
};
pub use scene::{Camera2D, InputSnapshot, Scene, SceneCommand, Vec2};
