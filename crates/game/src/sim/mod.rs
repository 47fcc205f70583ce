//! Deterministic fixed-step simulation of the boss encounter. Nothing in here
//! touches the window, the clock or the filesystem.

mod actor;
mod animation;
mod body;
mod boss;
mod combat;
mod events;
mod geometry;
mod input;
mod player;
mod tiles;
mod tuning;
mod world;

pub use animation::{AnimationKey, Pose};
pub use combat::{MaskLibrary, PixelMask};
pub use events::{Outcome, SimEvent};
pub use geometry::Rect;
pub use input::TickInput;
pub use tiles::Level;
pub use tuning::{BossMovement, Tuning};
pub use world::World;
