use super::animation::Pose;
use super::combat::{HitShape, MaskLibrary};
use super::events::SimEvent;
use super::geometry::Rect;
use super::input::TickInput;
use super::tiles::TileCollisionIndex;
use super::tuning::Tuning;

/// Read-only view of the world handed to an actor for one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub tiles: &'a TileCollisionIndex,
    pub tuning: &'a Tuning,
    pub input: &'a TickInput,
    /// Hurtbox of the opposing actor.
    pub opponent: Rect,
}

/// Shared capabilities of every simulated entity.
pub trait Actor {
    fn advance(&mut self, ctx: &TickContext<'_>, events: &mut Vec<SimEvent>);

    /// Collision rectangle used when no sprite mask is available.
    fn hurtbox(&self) -> Rect;

    /// `None` once the actor has left the fight.
    fn pose(&self) -> Option<Pose>;

    fn hit_shape<'m>(&self, masks: &'m MaskLibrary) -> Option<HitShape<'m>> {
        let pose = self.pose()?;
        Some(pose_shape(&pose, self.hurtbox(), masks))
    }
}

/// Mask for the pose's current frame stretched over its sprite rectangle, or
/// the plain `fallback` rectangle when that frame has no mask.
pub fn pose_shape<'m>(pose: &Pose, fallback: Rect, masks: &'m MaskLibrary) -> HitShape<'m> {
    match masks.get(&pose.sprite_key()) {
        Some(mask) => HitShape::Masked {
            rect: pose.sprite_rect,
            mask,
            flip_x: pose.facing.flips_sprite(),
        },
        None => HitShape::Rect(fallback),
    }
}

/// Places a `width` x `height` box standing on the bottom edge of a spawn
/// cell, centred on it horizontally.
pub fn standing_on(cell: Rect, width: f32, height: f32) -> Rect {
    let mut rect = Rect::new(0.0, 0.0, width, height);
    rect.set_bottom(cell.bottom());
    rect.x = cell.center().x - width * 0.5;
    rect
}
