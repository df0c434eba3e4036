//! Minimal 8×8 bitmap font
//!
//! Covers `h e l o p a r` and space, enough for "hello epaper". Anything else
//! renders as the blank glyph.

use crate::ssd1680::color::Color;
use crate::ssd1680::graphics::Framebuffer;

/// One byte per row, bit 7 is the leftmost column
pub type Glyph = [u8; 8];

/// Glyph cell edge in pixels
pub const GLYPH_SIZE: i32 = 8;

const BLANK: Glyph = [0x00; 8];

const GLYPHS: [(char, Glyph); 8] = [
    ('h', [0x00, 0x40, 0x40, 0x5C, 0x62, 0x62, 0x62, 0x00]),
    ('e', [0x00, 0x00, 0x3C, 0x42, 0x7E, 0x40, 0x3C, 0x00]),
    ('l', [0x00, 0x60, 0x20, 0x20, 0x20, 0x20, 0x3C, 0x00]),
    ('o', [0x00, 0x00, 0x3C, 0x42, 0x42, 0x42, 0x3C, 0x00]),
    ('p', [0x00, 0x00, 0x5C, 0x62, 0x62, 0x5C, 0x40, 0x40]),
    ('a', [0x00, 0x00, 0x3C, 0x02, 0x3E, 0x42, 0x3E, 0x00]),
    ('r', [0x00, 0x00, 0x5C, 0x62, 0x40, 0x40, 0x40, 0x00]),
    (' ', BLANK),
];

/// Immutable character to glyph table with a fallback
#[derive(Debug)]
pub struct Font {
    glyphs: &'static [(char, Glyph)],
    fallback: Glyph,
}

/// The built-in lowercase font
pub static FONT_8X8: Font = Font {
    glyphs: &GLYPHS,
    fallback: BLANK,
};

impl Font {
    /// Glyph for `c`, or the fallback for unmapped characters
    pub fn glyph(&self, c: char) -> &Glyph {
        self.glyphs
            .iter()
            .find(|(key, _)| *key == c)
            .map(|(_, glyph)| glyph)
            .unwrap_or(&self.fallback)
    }

    /// Draw one character with its top-left corner at `(x, y)`.
    ///
    /// Every set glyph bit becomes a `scale`×`scale` block of black pixels;
    /// clear bits leave the buffer untouched. Blocks are clipped to the buffer.
    pub fn draw_char(&self, fb: &mut Framebuffer, x: i32, y: i32, c: char, scale: u16) {
        let scale = i32::from(scale);
        let fb_width = i32::try_from(fb.width()).unwrap_or(i32::MAX);
        let fb_height = i32::try_from(fb.height()).unwrap_or(i32::MAX);
        for (i, row) in self.glyph(c).iter().enumerate() {
            for j in 0..GLYPH_SIZE {
                if *row & (0x80 >> j) == 0 {
                    continue;
                }
                let left = x.saturating_add(j * scale);
                let top = y.saturating_add(i as i32 * scale);
                let (x0, x1) = (left.max(0), left.saturating_add(scale).min(fb_width));
                let (y0, y1) = (top.max(0), top.saturating_add(scale).min(fb_height));
                for py in y0..y1 {
                    for px in x0..x1 {
                        fb.set_pixel(px, py, Color::Black);
                    }
                }
            }
        }
    }

    /// Draw `text` left to right, advancing `8 * scale` per character.
    ///
    /// No kerning and no wrapping. Returns the x position after the last
    /// character.
    pub fn draw_string(
        &self,
        fb: &mut Framebuffer,
        x: i32,
        y: i32,
        text: &str,
        scale: u16,
    ) -> i32 {
        let advance = GLYPH_SIZE * i32::from(scale);
        let mut cursor = x;
        for c in text.chars() {
            self.draw_char(fb, cursor, y, c, scale);
            cursor = cursor.saturating_add(advance);
        }
        cursor
    }
}

/// [`Font::draw_char`] with the built-in font
pub fn draw_char(fb: &mut Framebuffer, x: i32, y: i32, c: char, scale: u16) {
    FONT_8X8.draw_char(fb, x, y, c, scale);
}

/// [`Font::draw_string`] with the built-in font
pub fn draw_string(fb: &mut Framebuffer, x: i32, y: i32, text: &str, scale: u16) -> i32 {
    FONT_8X8.draw_string(fb, x, y, text, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssd1680::{LOGICAL_HEIGHT, LOGICAL_WIDTH};

    fn logical() -> Framebuffer {
        Framebuffer::new(u32::from(LOGICAL_WIDTH), u32::from(LOGICAL_HEIGHT))
    }

    #[test]
    fn test_unmapped_characters_fall_back_to_blank() {
        assert_eq!(FONT_8X8.glyph('Z'), &BLANK);
        assert_eq!(FONT_8X8.glyph('1'), &BLANK);
        assert_eq!(FONT_8X8.glyph('h')[3], 0x5C);

        let mut fb = logical();
        draw_char(&mut fb, 0, 0, 'x', 3);
        assert!(fb.as_bytes().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_hello_at_scale_two() {
        let mut fb = logical();
        let end = draw_string(&mut fb, 0, 0, "hello", 2);
        assert_eq!(end, 80);

        for (k, c) in "hello".chars().enumerate() {
            let glyph = FONT_8X8.glyph(c);
            let x0 = k as i32 * 16;
            for y in 0..16 {
                for x in 0..16 {
                    let (i, j) = (y / 2, x / 2);
                    let ink = glyph[i as usize] & (0x80 >> j) != 0;
                    let expected = if ink { Color::Black } else { Color::White };
                    assert_eq!(fb.get_pixel(x0 + x, y), Some(expected), "{c} at ({x}, {y})");
                }
            }
        }

        // Nothing outside the 80×16 span was touched
        for y in 0..i32::from(LOGICAL_HEIGHT) {
            for x in 0..i32::from(LOGICAL_WIDTH) {
                if x >= 80 || y >= 16 {
                    assert_eq!(fb.get_pixel(x, y), Some(Color::White));
                }
            }
        }
    }

    #[test]
    fn test_overflow_is_clipped() {
        let mut fb = Framebuffer::new(20, 8);
        // Second glyph starts at x = 16, only 4 columns are visible
        draw_string(&mut fb, 8, 0, "hh", 1);
        draw_char(&mut fb, -4, -4, 'o', 1);
        draw_char(&mut fb, 0, 100, 'o', 4);
        assert_eq!(fb.as_bytes().len(), 3 * 8);
        // 'h' row 3 = 0x5C: columns 1,3,4,5 are ink, shifted to x = 17, 19
        assert_eq!(fb.get_pixel(17, 3), Some(Color::Black));
        assert_eq!(fb.get_pixel(19, 3), Some(Color::Black));
        assert_eq!(fb.get_pixel(18, 3), Some(Color::White));
    }

    #[test]
    fn test_huge_scale_is_clipped_to_buffer() {
        let mut fb = Framebuffer::new(16, 16);
        // Every ink block lies beyond the buffer
        draw_char(&mut fb, 0, 0, 'h', u16::MAX);
        assert!(fb.as_bytes().iter().all(|&b| b == 0xFF));

        // 'h' row 1 column 1 is ink; shifted back, its block covers the buffer
        let shift = -i32::from(u16::MAX);
        draw_char(&mut fb, shift, shift, 'h', u16::MAX);
        assert!(fb.as_bytes().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_scale_zero_draws_nothing() {
        let mut fb = logical();
        assert_eq!(draw_string(&mut fb, 5, 5, "hello", 0), 5);
        assert!(fb.as_bytes().iter().all(|&b| b == 0xFF));
    }
}
