pub(crate) mod raster;
mod renderer;
pub(crate) mod text;
mod transform;

pub use renderer::{Renderer, PLACEHOLDER_COLOR};
pub use transform::{screen_to_world, world_to_screen, Viewport};
