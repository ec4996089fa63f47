// Software text overlay: a tiny 5x7 bitmap font blitted straight into the FrameBuffer.
// Covers what the frame-rate line needs ("fr: 29.970 fc: 12 ctime: ... stime: ...",
// plus "inf"/"NaN" for the first frame after a reset) and a little more.

use crate::types::FrameBuffer;

pub const GLYPH_W: i32 = 5;
pub const GLYPH_H: i32 = 7;
const SHADOW: u32 = 0x0000_0000;

/// Where and how the status line is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    pub scale: i32,
    pub color: u32,
}

/// (200, 200, 250) in BGR order, as RGB.
pub const STATUS_COLOR: u32 = 0x00FA_C8C8;
/// Grayscale output only has one channel; the status line takes its first component.
pub const STATUS_GRAY: u32 = 0x00C8_C8C8;
pub const STATUS_ORIGIN: (i32, i32) = (30, 30);
pub const STATUS_SCALE: i32 = 2;

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.pixels[y * fb.width + x] = color;
}

fn fill_block(fb: &mut FrameBuffer, x: i32, y: i32, size: i32, color: u32) {
    for dy in 0..size {
        for dx in 0..size {
            put_pixel(fb, x + dx, y + dy, color);
        }
    }
}

/// 5x7 glyph rows; the low 5 bits of each row are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'a' => g!(0b00000,0b00000,0b01110,0b00001,0b01111,0b10001,0b01111),
        'c' => g!(0b00000,0b00000,0b01110,0b10000,0b10000,0b10001,0b01110),
        'e' => g!(0b00000,0b00000,0b01110,0b10001,0b11111,0b10000,0b01110),
        'f' => g!(0b00110,0b01001,0b01000,0b11100,0b01000,0b01000,0b01000),
        'i' => g!(0b00100,0b00000,0b01100,0b00100,0b00100,0b00100,0b01110),
        'm' => g!(0b00000,0b00000,0b11010,0b10101,0b10101,0b10001,0b10001),
        'n' => g!(0b00000,0b00000,0b10110,0b11001,0b10001,0b10001,0b10001),
        'r' => g!(0b00000,0b00000,0b10110,0b11001,0b10000,0b10000,0b10000),
        's' => g!(0b00000,0b00000,0b01110,0b10000,0b01110,0b00001,0b11110),
        't' => g!(0b01000,0b01000,0b11100,0b01000,0b01000,0b01001,0b00110),

        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),

        _ => None,
    }
}

/// Draw one character with its top-left corner at (x,y).
fn draw_char(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, style: TextStyle) {
    let Some(rows) = glyph5x7(ch) else { return };
    let s = style.scale;
    // Shadow first, offset by one pixel, then the glyph on top.
    for (offset, color) in [(1, SHADOW), (0, style.color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..GLYPH_W {
                if rowbits & (1 << (4 - rx)) != 0 {
                    let px = x + rx * s + offset;
                    let py = y + ry as i32 * s + offset;
                    fill_block(fb, px, py, s, color);
                }
            }
        }
    }
}

/// Draw `text` with its baseline-left corner at `origin`. Unknown characters
/// leave a gap the width of one glyph.
pub fn draw_text(fb: &mut FrameBuffer, origin: (i32, i32), text: &str, style: TextStyle) {
    let (mut x, baseline) = origin;
    let top = baseline - GLYPH_H * style.scale;
    for ch in text.chars() {
        draw_char(fb, x, top, ch, style);
        x += (GLYPH_W + 1) * style.scale;
    }
}

/// Stamp the frame-rate line at its fixed spot.
pub fn stamp_status(fb: &mut FrameBuffer, text: &str, color: u32) {
    draw_text(fb, STATUS_ORIGIN, text, TextStyle { scale: STATUS_SCALE, color });
}
