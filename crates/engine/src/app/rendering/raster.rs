use crate::assets::LoadedImage;

const FLASH_MIX: u16 = 160;

/// Screen-space rectangle in framebuffer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

pub(crate) fn write_pixel_rgba_clipped(
    frame: &mut [u8],
    width: usize,
    x: i32,
    y: i32,
    color: [u8; 4],
) {
    let Some(byte_offset) = pixel_byte_offset(frame, width, x, y) else {
        return;
    };
    frame[byte_offset..byte_offset + 4].copy_from_slice(&color);
}

/// Source-over blend onto an opaque framebuffer.
pub(crate) fn blend_pixel_rgba_clipped(
    frame: &mut [u8],
    width: usize,
    x: i32,
    y: i32,
    color: [u8; 4],
) {
    match color[3] {
        0 => {}
        255 => write_pixel_rgba_clipped(frame, width, x, y, color),
        alpha => {
            let Some(byte_offset) = pixel_byte_offset(frame, width, x, y) else {
                return;
            };
            let alpha = alpha as u16;
            for channel in 0..3 {
                let dst = frame[byte_offset + channel] as u16;
                let src = color[channel] as u16;
                frame[byte_offset + channel] = ((src * alpha + dst * (255 - alpha)) / 255) as u8;
            }
            frame[byte_offset + 3] = 255;
        }
    }
}

fn pixel_byte_offset(frame: &[u8], width: usize, x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 || x as usize >= width {
        return None;
    }
    let pixel_offset = (y as usize).checked_mul(width)?.checked_add(x as usize)?;
    let byte_offset = pixel_offset.checked_mul(4)?;
    let end = byte_offset.checked_add(4)?;
    (end <= frame.len()).then_some(byte_offset)
}

pub(crate) fn fill_rect(frame: &mut [u8], width: u32, height: u32, rect: PixelRect, color: [u8; 4]) {
    let start_x = rect.left.max(0);
    let start_y = rect.top.max(0);
    let end_x = rect.left.saturating_add(rect.width).min(width as i32);
    let end_y = rect.top.saturating_add(rect.height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    for y in start_y..end_y {
        for x in start_x..end_x {
            blend_pixel_rgba_clipped(frame, width as usize, x, y, color);
        }
    }
}

pub(crate) fn outline_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    rect: PixelRect,
    color: [u8; 4],
) {
    if rect.width <= 0 || rect.height <= 0 {
        return;
    }
    let edge = |left, top, w, h| PixelRect {
        left,
        top,
        width: w,
        height: h,
    };
    fill_rect(frame, width, height, edge(rect.left, rect.top, rect.width, 1), color);
    fill_rect(
        frame,
        width,
        height,
        edge(rect.left, rect.top + rect.height - 1, rect.width, 1),
        color,
    );
    fill_rect(frame, width, height, edge(rect.left, rect.top, 1, rect.height), color);
    fill_rect(
        frame,
        width,
        height,
        edge(rect.left + rect.width - 1, rect.top, 1, rect.height),
        color,
    );
}

/// Nearest-neighbour blit of `sprite` stretched over `dst`. Fully transparent
/// texels are skipped; `flash` pushes every drawn texel toward white.
pub(crate) fn draw_sprite_scaled(
    frame: &mut [u8],
    width: u32,
    height: u32,
    dst: PixelRect,
    sprite: &LoadedImage,
    flip_x: bool,
    flash: bool,
) {
    if sprite.width == 0 || sprite.height == 0 || dst.width <= 0 || dst.height <= 0 {
        return;
    }
    let expected_rgba_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_rgba_len {
        return;
    }

    let draw_left = dst.left.max(0);
    let draw_top = dst.top.max(0);
    let draw_right = dst.left.saturating_add(dst.width).min(width as i32);
    let draw_bottom = dst.top.saturating_add(dst.height).min(height as i32);
    if draw_left >= draw_right || draw_top >= draw_bottom {
        return;
    }

    let x_ratio = sprite.width as f32 / dst.width as f32;
    let y_ratio = sprite.height as f32 / dst.height as f32;
    let sprite_width = sprite.width as usize;

    for out_y in draw_top..draw_bottom {
        let src_y = (((out_y - dst.top) as f32 + 0.5) * y_ratio) as u32;
        let src_row_offset = src_y.min(sprite.height - 1) as usize * sprite_width * 4;

        for out_x in draw_left..draw_right {
            let mut src_x = (((out_x - dst.left) as f32 + 0.5) * x_ratio) as u32;
            src_x = src_x.min(sprite.width - 1);
            if flip_x {
                src_x = sprite.width - 1 - src_x;
            }
            let src_offset = src_row_offset + src_x as usize * 4;
            let mut texel = [
                sprite.rgba[src_offset],
                sprite.rgba[src_offset + 1],
                sprite.rgba[src_offset + 2],
                sprite.rgba[src_offset + 3],
            ];
            if texel[3] == 0 {
                continue;
            }
            if flash {
                for channel in texel.iter_mut().take(3) {
                    *channel = mix_toward_white(*channel);
                }
            }
            blend_pixel_rgba_clipped(frame, width as usize, out_x, out_y, texel);
        }
    }
}

fn mix_toward_white(channel: u8) -> u8 {
    let channel = channel as u16;
    (channel + (255 - channel) * FLASH_MIX / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: u32, height: u32) -> Vec<u8> {
        vec![0; width as usize * height as usize * 4]
    }

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn clipped_writes_outside_frame_are_ignored() {
        let mut buffer = frame(4, 4);
        write_pixel_rgba_clipped(&mut buffer, 4, -1, 0, [255; 4]);
        write_pixel_rgba_clipped(&mut buffer, 4, 4, 0, [255; 4]);
        write_pixel_rgba_clipped(&mut buffer, 4, 0, 4, [255; 4]);
        assert!(buffer.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn fill_rect_clips_to_frame() {
        let mut buffer = frame(4, 4);
        let rect = PixelRect {
            left: 2,
            top: -3,
            width: 10,
            height: 5,
        };
        fill_rect(&mut buffer, 4, 4, rect, [9, 9, 9, 255]);

        assert_eq!(pixel(&buffer, 4, 3, 0), [9, 9, 9, 255]);
        assert_eq!(pixel(&buffer, 4, 2, 1), [9, 9, 9, 255]);
        assert_eq!(pixel(&buffer, 4, 1, 1), [0; 4]);
        assert_eq!(pixel(&buffer, 4, 2, 2), [0; 4]);
    }

    #[test]
    fn half_alpha_blends_with_background() {
        let mut buffer = frame(1, 1);
        blend_pixel_rgba_clipped(&mut buffer, 1, 0, 0, [255, 255, 255, 255]);
        blend_pixel_rgba_clipped(&mut buffer, 1, 0, 0, [0, 0, 0, 128]);
        let blended = pixel(&buffer, 1, 0, 0);
        assert!((126..=128).contains(&blended[0]), "{blended:?}");
        assert_eq!(blended[3], 255);
    }

    #[test]
    fn outline_leaves_interior_untouched() {
        let mut buffer = frame(5, 5);
        let rect = PixelRect {
            left: 0,
            top: 0,
            width: 5,
            height: 5,
        };
        outline_rect(&mut buffer, 5, 5, rect, [1, 1, 1, 255]);
        assert_eq!(pixel(&buffer, 5, 0, 0), [1, 1, 1, 255]);
        assert_eq!(pixel(&buffer, 5, 4, 2), [1, 1, 1, 255]);
        assert_eq!(pixel(&buffer, 5, 2, 2), [0; 4]);
    }

    fn two_texel_sprite() -> LoadedImage {
        LoadedImage {
            width: 2,
            height: 1,
            rgba: vec![255, 0, 0, 255, 0, 0, 255, 255],
        }
    }

    #[test]
    fn sprite_scales_up_with_nearest_texels() {
        let mut buffer = frame(4, 2);
        let dst = PixelRect {
            left: 0,
            top: 0,
            width: 4,
            height: 2,
        };
        draw_sprite_scaled(&mut buffer, 4, 2, dst, &two_texel_sprite(), false, false);

        assert_eq!(pixel(&buffer, 4, 0, 0), [255, 0, 0, 255]);
        assert_eq!(pixel(&buffer, 4, 1, 1), [255, 0, 0, 255]);
        assert_eq!(pixel(&buffer, 4, 2, 0), [0, 0, 255, 255]);
        assert_eq!(pixel(&buffer, 4, 3, 1), [0, 0, 255, 255]);
    }

    #[test]
    fn flipped_sprite_mirrors_columns() {
        let mut buffer = frame(2, 1);
        let dst = PixelRect {
            left: 0,
            top: 0,
            width: 2,
            height: 1,
        };
        draw_sprite_scaled(&mut buffer, 2, 1, dst, &two_texel_sprite(), true, false);

        assert_eq!(pixel(&buffer, 2, 0, 0), [0, 0, 255, 255]);
        assert_eq!(pixel(&buffer, 2, 1, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn transparent_texels_are_skipped_and_flash_brightens() {
        let sprite = LoadedImage {
            width: 2,
            height: 1,
            rgba: vec![0, 0, 0, 0, 100, 100, 100, 255],
        };
        let mut buffer = frame(2, 1);
        let dst = PixelRect {
            left: 0,
            top: 0,
            width: 2,
            height: 1,
        };
        draw_sprite_scaled(&mut buffer, 2, 1, dst, &sprite, false, true);

        assert_eq!(pixel(&buffer, 2, 0, 0), [0; 4]);
        let lit = pixel(&buffer, 2, 1, 0);
        assert!(lit[0] > 100);
        assert_eq!(lit[3], 255);
    }

    #[test]
    fn sprite_partly_offscreen_does_not_panic() {
        let mut buffer = frame(3, 3);
        let dst = PixelRect {
            left: -5,
            top: 2,
            width: 9,
            height: 9,
        };
        draw_sprite_scaled(&mut buffer, 3, 3, dst, &two_texel_sprite(), false, false);
        assert_eq!(pixel(&buffer, 3, 0, 2)[3], 255);
        assert_eq!(pixel(&buffer, 3, 0, 1), [0; 4]);
    }
}
