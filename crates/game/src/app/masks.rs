use std::path::Path;

use engine::load_sprite;
use tracing::{debug, info};

use crate::sim::{AnimationKey, MaskLibrary, PixelMask};

/// Builds a hit mask from the alpha channel of every animation frame found on
/// disk. Frames that fail to load are left out and their owners collide as
/// plain rectangles.
pub(crate) fn load_masks(assets_dir: &Path, alpha_threshold: u8) -> MaskLibrary {
    let mut masks = MaskLibrary::new();
    let mut skipped = 0usize;
    for key in AnimationKey::ALL
        .into_iter()
        .flat_map(AnimationKey::sprite_keys)
    {
        match load_sprite(assets_dir, &key) {
            Ok(image) => {
                let alpha = image.alpha();
                match PixelMask::from_alpha(image.width, image.height, &alpha, alpha_threshold) {
                    Some(mask) => masks.insert(key, mask),
                    None => {
                        skipped += 1;
                        debug!(sprite_key = %key, "mask_alpha_size_mismatch");
                    }
                }
            }
            Err(err) => {
                skipped += 1;
                debug!(sprite_key = %key, error = %err, "mask_unavailable_using_rect");
            }
        }
    }
    if masks.is_empty() {
        info!(skipped, "hit_masks_missing_using_rects");
    } else {
        info!(loaded = masks.len(), skipped, "hit_masks_loaded");
    }
    masks
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgba, RgbaImage};

    use super::*;

    #[test]
    fn missing_sprite_dir_yields_empty_library() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_masks(dir.path(), 0).is_empty());
    }

    #[test]
    fn frame_on_disk_becomes_mask_with_threshold() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sprite_dir = dir.path().join("sprites").join("boss").join("idle");
        fs::create_dir_all(&sprite_dir).expect("mkdir");
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        image.put_pixel(1, 0, Rgba([9, 9, 9, 200]));
        image.save(sprite_dir.join("01.png")).expect("save png");

        let masks = load_masks(dir.path(), 100);

        assert_eq!(masks.len(), 1);
        let mask = masks.get("boss/idle/01").expect("mask");
        assert!(!mask.is_set(0, 0));
        assert!(mask.is_set(1, 0));
    }
}
