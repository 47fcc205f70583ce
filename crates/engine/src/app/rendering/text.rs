use super::raster::blend_pixel_rgba_clipped;

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;

/// Five rows of three bits, most significant bit leftmost.
type Glyph = [u8; GLYPH_HEIGHT as usize];

const BLANK: Glyph = [0; 5];

pub(crate) fn glyph_advance_px(scale: i32) -> i32 {
    (GLYPH_WIDTH + 1) * scale
}

pub(crate) fn line_height_px(scale: i32) -> i32 {
    (GLYPH_HEIGHT + 2) * scale
}

/// Width of the longest line of `text` in pixels.
pub(crate) fn text_width_px(text: &str, scale: i32) -> i32 {
    text.lines()
        .map(|line| line.chars().count() as i32)
        .max()
        .filter(|chars| *chars > 0)
        .map(|chars| chars * glyph_advance_px(scale) - scale)
        .unwrap_or(0)
}

/// Draws `text` with its top-left at `(x, y)`; `\n` starts a new line.
/// Characters outside the font draw as blanks.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_text(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    text: &str,
    color: [u8; 4],
    scale: i32,
) {
    if width == 0 || height == 0 || scale <= 0 {
        return;
    }
    let mut pen_x = x;
    let mut pen_y = y;
    for ch in text.chars() {
        if ch == '\n' {
            pen_x = x;
            pen_y += line_height_px(scale);
            continue;
        }
        draw_glyph(frame, width, pen_x, pen_y, glyph_for(ch), color, scale);
        pen_x += glyph_advance_px(scale);
    }
}

fn draw_glyph(
    frame: &mut [u8],
    width: u32,
    x: i32,
    y: i32,
    glyph: Glyph,
    color: [u8; 4],
    scale: i32,
) {
    for (row_index, row_bits) in glyph.iter().enumerate() {
        let glyph_y = y + row_index as i32 * scale;
        for col in 0..GLYPH_WIDTH {
            if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            let glyph_x = x + col * scale;
            for sy in 0..scale {
                for sx in 0..scale {
                    blend_pixel_rgba_clipped(
                        frame,
                        width as usize,
                        glyph_x + sx,
                        glyph_y + sy,
                        color,
                    );
                }
            }
        }
    }
}

fn glyph_for(ch: char) -> Glyph {
    match ch.to_ascii_uppercase() {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '[' => [0b110, 0b100, 0b100, 0b100, 0b110],
        ']' => [0b011, 0b001, 0b001, 0b001, 0b011],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b110, 0b001, 0b010, 0b000, 0b010],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        _ => BLANK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_pixels(frame: &[u8]) -> usize {
        frame.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    #[test]
    fn lowercase_shares_uppercase_glyphs() {
        assert_eq!(glyph_for('h'), glyph_for('H'));
        assert_ne!(glyph_for('H'), BLANK);
    }

    #[test]
    fn unknown_character_draws_nothing() {
        let mut frame = vec![0u8; 16 * 16 * 4];
        draw_text(&mut frame, 16, 16, 0, 0, "\u{263a}", [255; 4], 2);
        assert_eq!(lit_pixels(&frame), 0);
    }

    #[test]
    fn scale_multiplies_lit_area() {
        let mut small = vec![0u8; 32 * 32 * 4];
        let mut large = vec![0u8; 32 * 32 * 4];
        draw_text(&mut small, 32, 32, 0, 0, "1", [255; 4], 1);
        draw_text(&mut large, 32, 32, 0, 0, "1", [255; 4], 3);
        assert_eq!(lit_pixels(&large), lit_pixels(&small) * 9);
    }

    #[test]
    fn text_width_uses_longest_line() {
        assert_eq!(text_width_px("", 2), 0);
        assert_eq!(text_width_px("AB", 1), 7);
        assert_eq!(text_width_px("A\nABC", 2), 22);
    }

    #[test]
    fn drawing_past_frame_edges_is_safe() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        draw_text(&mut frame, 4, 4, -7, -3, "HP 20/20", [255; 4], 2);
        draw_text(&mut frame, 4, 4, 3, 3, "BOSS", [255; 4], 4);
        draw_text(&mut frame, 0, 0, 0, 0, "X", [255; 4], 1);
    }
}
