use super::geometry::Rect;
use super::tiles::TileCollisionIndex;

/// Rectangle mover resolved against the tile index one axis at a time.
/// Position is the hitbox's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicBody {
    pub hitbox: Rect,
    pub vx: f32,
    pub vy: f32,
    pub on_ground: bool,
    pub on_wall: bool,
}

impl KinematicBody {
    pub fn new(hitbox: Rect) -> Self {
        Self {
            hitbox,
            ..Self::default()
        }
    }

    /// Adds one tick of gravity and caps the downward speed so a body never
    /// skips over a tile in a single step.
    pub fn apply_gravity(&mut self, gravity: f32, max_fall_speed: f32) {
        self.vy = (self.vy + gravity).min(max_fall_speed);
    }

    /// Horizontal pass, then vertical pass, then the airborne wall probe and
    /// the level-bounds clamp. Horizontal resolution always runs first, so a
    /// body driven into a corner ends up hugging the wall.
    pub fn step_axis_separated(&mut self, tiles: &TileCollisionIndex, wall_probe_margin: f32) {
        self.move_horizontal(tiles);
        self.move_vertical(tiles);
        let probe = self.hitbox.inflated(wall_probe_margin.max(0.0), 0.0);
        self.on_wall = !self.on_ground && tiles.any_overlapping(&probe);
        self.clamp_to_bounds(tiles.bounds());
    }

    /// Vertical pass plus bounds clamp only. Used by bodies that never move
    /// sideways on their own.
    pub fn step_vertical(&mut self, tiles: &TileCollisionIndex) {
        self.move_vertical(tiles);
        self.on_wall = false;
        self.clamp_to_bounds(tiles.bounds());
    }

    /// Moves in sub-steps no longer than one tile so no speed can carry the
    /// body past a tile in a single tick.
    fn move_horizontal(&mut self, tiles: &TileCollisionIndex) {
        if self.vx == 0.0 {
            return;
        }
        let distance = limit_travel(self.vx, tiles.bounds().width);
        let steps = substeps(distance, tiles.cell_size());
        let dx = distance / steps as f32;
        for _ in 0..steps {
            self.hitbox.x += dx;
            let mut clamped = false;
            for tile in tiles.rects_overlapping(&self.hitbox) {
                if !tile.overlaps(&self.hitbox) {
                    continue;
                }
                if dx > 0.0 {
                    self.hitbox.set_right(tile.left());
                } else {
                    self.hitbox.set_left(tile.right());
                }
                clamped = true;
            }
            if clamped {
                self.vx = 0.0;
                return;
            }
        }
    }

    fn move_vertical(&mut self, tiles: &TileCollisionIndex) {
        self.on_ground = false;
        if self.vy == 0.0 {
            return;
        }
        let distance = limit_travel(self.vy, tiles.bounds().height);
        let steps = substeps(distance, tiles.cell_size());
        let dy = distance / steps as f32;
        for _ in 0..steps {
            self.hitbox.y += dy;
            let mut clamped = false;
            for tile in tiles.rects_overlapping(&self.hitbox) {
                if !tile.overlaps(&self.hitbox) {
                    continue;
                }
                if dy > 0.0 {
                    self.hitbox.set_bottom(tile.top());
                    self.on_ground = true;
                } else {
                    self.hitbox.set_top(tile.bottom());
                }
                clamped = true;
            }
            if clamped {
                self.vy = 0.0;
                return;
            }
        }
    }

    fn clamp_to_bounds(&mut self, bounds: Rect) {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return;
        }
        if self.hitbox.left() < bounds.left() {
            self.hitbox.set_left(bounds.left());
            self.vx = self.vx.max(0.0);
        } else if self.hitbox.right() > bounds.right() {
            self.hitbox.set_right(bounds.right());
            self.vx = self.vx.min(0.0);
        }
        if self.hitbox.top() < bounds.top() {
            self.hitbox.set_top(bounds.top());
            self.vy = self.vy.max(0.0);
        }
        if self.hitbox.bottom() >= bounds.bottom() {
            self.hitbox.set_bottom(bounds.bottom());
            self.vy = self.vy.min(0.0);
            self.on_ground = true;
            self.on_wall = false;
        }
    }
}

/// A body never needs to travel further than the level in one tick.
fn limit_travel(velocity: f32, extent: f32) -> f32 {
    if extent > 0.0 {
        velocity.clamp(-extent, extent)
    } else {
        velocity
    }
}

fn substeps(distance: f32, cell_size: f32) -> u32 {
    (distance.abs() / cell_size).ceil().max(1.0) as u32
}
