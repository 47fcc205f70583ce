use std::collections::HashMap;

use engine::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::Facing;
use super::geometry::Rect;

/// Which test an attack or contact check uses against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPrecision {
    #[default]
    Rect,
    PixelMask,
}

/// Row-major opacity map built from a sprite's alpha channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl PixelMask {
    /// `alpha` holds one byte per pixel; values above `threshold` are solid.
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8], threshold: u8) -> Option<Self> {
        let expected = (width as usize).checked_mul(height as usize)?;
        if alpha.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            bits: alpha.iter().map(|value| *value > threshold).collect(),
        })
    }

    #[cfg(test)]
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[(y * self.width + x) as usize]
    }

    #[cfg(test)]
    pub fn flipped_horizontally(&self) -> Self {
        let mut bits = Vec::with_capacity(self.bits.len());
        for row in self.bits.chunks(self.width.max(1) as usize) {
            bits.extend(row.iter().rev().copied());
        }
        Self {
            width: self.width,
            height: self.height,
            bits,
        }
    }

    #[cfg(test)]
    pub fn solid_count(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }
}

/// Masks per sprite key, loaded once before the first tick. A key without a
/// mask is treated as a solid rectangle.
#[derive(Debug, Clone, Default)]
pub struct MaskLibrary {
    masks: HashMap<String, PixelMask>,
}

impl MaskLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sprite_key: impl Into<String>, mask: PixelMask) {
        self.masks.insert(sprite_key.into(), mask);
    }

    pub fn get(&self, sprite_key: &str) -> Option<&PixelMask> {
        self.masks.get(sprite_key)
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

/// The geometry a hit test reads. A masked shape stretches its mask over
/// `rect`; `flip_x` mirrors it for sprites facing left.
#[derive(Debug, Clone, Copy)]
pub enum HitShape<'a> {
    Rect(Rect),
    Masked {
        rect: Rect,
        mask: &'a PixelMask,
        flip_x: bool,
    },
}

impl<'a> HitShape<'a> {
    #[cfg(test)]
    pub fn new(rect: Rect, mask: Option<&'a PixelMask>, flip_x: bool) -> Self {
        match mask {
            Some(mask) => Self::Masked { rect, mask, flip_x },
            None => Self::Rect(rect),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rect(rect) => *rect,
            Self::Masked { rect, .. } => *rect,
        }
    }

    fn is_solid_at(&self, point: Vec2) -> bool {
        match self {
            Self::Rect(rect) => rect.contains_point(point),
            Self::Masked { rect, mask, flip_x } => {
                if !rect.contains_point(point) || rect.width <= 0.0 || rect.height <= 0.0 {
                    return false;
                }
                let u = (point.x - rect.x) / rect.width;
                let v = (point.y - rect.y) / rect.height;
                let mut mx = (u * mask.width() as f32) as u32;
                let my = (v * mask.height() as f32) as u32;
                if *flip_x {
                    mx = mask.width().saturating_sub(1).saturating_sub(mx);
                }
                mask.is_set(mx, my)
            }
        }
    }
}

/// Pure hit test. `Rect` precision compares bounds only; `PixelMask`
/// precision additionally requires one integer pixel of the bounds
/// intersection to be solid in both shapes. Plain rectangles are fully solid.
pub fn test_hit(precision: HitPrecision, attacker: &HitShape<'_>, defender: &HitShape<'_>) -> bool {
    let Some(overlap) = attacker.bounds().intersection(&defender.bounds()) else {
        return false;
    };
    if precision == HitPrecision::Rect {
        return true;
    }
    if matches!(attacker, HitShape::Rect(_)) && matches!(defender, HitShape::Rect(_)) {
        return true;
    }

    let x_start = overlap.left().floor() as i64;
    let x_end = overlap.right().ceil() as i64;
    let y_start = overlap.top().floor() as i64;
    let y_end = overlap.bottom().ceil() as i64;
    for py in y_start..y_end {
        for px in x_start..x_end {
            let sample = Vec2 {
                x: px as f32 + 0.5,
                y: py as f32 + 0.5,
            };
            if !overlap.contains_point(sample) {
                continue;
            }
            if attacker.is_solid_at(sample) && defender.is_solid_at(sample) {
                return true;
            }
        }
    }
    false
}

/// Result of applying damage to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Ignored,
    Hit,
    Killed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    Melee,
    Ranged,
}

/// An attack in flight. Melee boxes follow the attacker; projectiles travel
/// on their own until they run out of ticks or distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackHitbox {
    pub kind: AttackKind,
    pub rect: Rect,
    pub velocity: Vec2,
    pub direction_angle: f32,
    pub travelled: f32,
    pub elapsed_ticks: u32,
    pub precision: HitPrecision,
    pub damage: u32,
}

impl AttackHitbox {
    pub fn facing(&self) -> Facing {
        if self.direction_angle.cos() < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x4 mask with only the left column solid.
    fn left_column_mask() -> PixelMask {
        let mut alpha = vec![0u8; 16];
        for row in 0..4 {
            alpha[row * 4] = 255;
        }
        PixelMask::from_alpha(4, 4, &alpha, 0).expect("mask")
    }

    #[test]
    fn rect_precision_ignores_masks() {
        let mask = PixelMask::from_alpha(2, 2, &[0; 4], 0).expect("mask");
        let attacker = HitShape::new(Rect::new(0.0, 0.0, 10.0, 10.0), Some(&mask), false);
        let defender = HitShape::Rect(Rect::new(5.0, 5.0, 10.0, 10.0));

        assert!(test_hit(HitPrecision::Rect, &attacker, &defender));
        assert!(!test_hit(HitPrecision::PixelMask, &attacker, &defender));
    }

    #[test]
    fn transparent_corner_does_not_register() {
        let mask = left_column_mask();
        let boss = HitShape::new(Rect::new(0.0, 0.0, 40.0, 40.0), Some(&mask), false);
        let sword = HitShape::Rect(Rect::new(30.0, 0.0, 20.0, 20.0));
        let sword_left = HitShape::Rect(Rect::new(-5.0, 0.0, 12.0, 20.0));

        assert!(!test_hit(HitPrecision::PixelMask, &sword, &boss));
        assert!(test_hit(HitPrecision::PixelMask, &sword_left, &boss));
    }

    #[test]
    fn flipped_mask_mirrors_solid_side() {
        let mask = left_column_mask();
        let boss = HitShape::new(Rect::new(0.0, 0.0, 40.0, 40.0), Some(&mask), true);
        let sword = HitShape::Rect(Rect::new(30.0, 0.0, 20.0, 20.0));

        assert!(test_hit(HitPrecision::PixelMask, &sword, &boss));
        let mirrored = mask.flipped_horizontally();
        assert!(mirrored.is_set(3, 2));
        assert!(!mirrored.is_set(0, 2));
    }

    #[test]
    fn missing_mask_counts_as_solid_rect() {
        let sword = HitShape::new(Rect::new(0.0, 0.0, 10.0, 10.0), None, false);
        let boss = HitShape::new(Rect::new(9.5, 9.5, 10.0, 10.0), None, false);

        assert!(test_hit(HitPrecision::PixelMask, &sword, &boss));
    }

    #[test]
    fn disjoint_shapes_never_hit() {
        let a = HitShape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = HitShape::Rect(Rect::new(10.0, 0.0, 10.0, 10.0));

        assert!(!test_hit(HitPrecision::Rect, &a, &b));
        assert!(!test_hit(HitPrecision::PixelMask, &a, &b));
    }

    #[test]
    fn alpha_length_mismatch_is_rejected() {
        assert!(PixelMask::from_alpha(3, 3, &[255; 4], 0).is_none());
        assert_eq!(PixelMask::solid(3, 2).solid_count(), 6);
    }
}
