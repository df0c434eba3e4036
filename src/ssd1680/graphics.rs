//! Packed 1-bit framebuffer
//!
//! `ceil(width / 8)` bytes per row, rows top to bottom. Bit 7 of a byte is
//! the leftmost of its eight pixels. A set bit is white, a cleared bit black,
//! which is exactly what the controller expects in B/W RAM, so the bytes go
//! over SPI unchanged.

use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::Pixel;

use crate::ssd1680::color::Color;
use crate::ssd1680::error::Error;

/// Owned fixed-size monochrome bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    width_bytes: usize,
    bytes: Vec<u8>,
}

impl Framebuffer {
    /// New buffer, all white
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0xFF)
    }

    /// New buffer with every byte set to `byte`
    pub fn filled(width: u32, height: u32, byte: u8) -> Self {
        let width_bytes = Self::row_bytes(width);
        Framebuffer {
            width,
            height,
            width_bytes,
            bytes: vec![byte; width_bytes * height as usize],
        }
    }

    /// Wrap existing packed data, checking its length against the geometry
    pub fn from_bytes(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, Error> {
        let width_bytes = Self::row_bytes(width);
        let expected = width_bytes * height as usize;
        if bytes.len() != expected {
            return Err(Error::InvalidBuffer {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Framebuffer {
            width,
            height,
            width_bytes,
            bytes,
        })
    }

    fn row_bytes(width: u32) -> usize {
        (width as usize).div_ceil(8)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    pub fn width_bytes(&self) -> usize {
        self.width_bytes
    }

    /// Packed rows, ready to stream
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the packed rows
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Byte index and bit mask of an in-bounds pixel
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width_bytes + (x / 8) as usize;
        Some((index, 0x80 >> (x % 8)))
    }

    /// Set one pixel. Out of bounds coordinates are ignored so clipped
    /// drawing never spills into a neighbouring row.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some((index, mask)) = self.locate(x, y) {
            match color {
                Color::White => self.bytes[index] |= mask,
                Color::Black => self.bytes[index] &= !mask,
            }
        }
    }

    /// Color of one pixel, `None` outside the buffer
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.locate(x, y)
            .map(|(index, mask)| Color::from_bit(self.bytes[index] & mask != 0))
    }

    /// Overwrite every byte. `0xFF` is white, `0x00` black.
    pub fn fill(&mut self, byte: u8) {
        self.bytes.fill(byte);
    }

    /// Fill with one color
    pub fn clear_to(&mut self, color: Color) {
        self.fill(match color {
            Color::White => 0xFF,
            Color::Black => 0x00,
        });
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.into());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_to(color.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

    #[test]
    fn test_set_then_get_every_pixel() {
        let mut fb = Framebuffer::new(21, 5);
        for y in 0..5 {
            for x in 0..21 {
                fb.set_pixel(x, y, Color::Black);
                assert_eq!(fb.get_pixel(x, y), Some(Color::Black));
                fb.set_pixel(x, y, Color::White);
                assert_eq!(fb.get_pixel(x, y), Some(Color::White));
            }
        }
    }

    #[test]
    fn test_bit_layout_msb_is_leftmost() {
        let mut fb = Framebuffer::filled(16, 2, 0x00);
        fb.set_pixel(0, 0, Color::White);
        fb.set_pixel(9, 1, Color::White);
        assert_eq!(fb.as_bytes(), &[0x80, 0x00, 0x00, 0x40]);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut fb = Framebuffer::filled(12, 3, 0xA5);
        let before = fb.as_bytes().to_vec();
        for (x, y) in [(-1, 0), (0, -1), (12, 0), (15, 0), (0, 3), (i32::MAX, i32::MIN)] {
            fb.set_pixel(x, y, Color::Black);
            fb.set_pixel(x, y, Color::White);
            assert_eq!(fb.get_pixel(x, y), None);
        }
        assert_eq!(fb.as_bytes(), before.as_slice());
    }

    #[test]
    fn test_fill_is_uniform() {
        let mut fb = Framebuffer::filled(250, 4, 0x00);
        fb.fill(0xFF);
        assert!((0..4).all(|y| (0..250).all(|x| fb.get_pixel(x, y) == Some(Color::White))));
        fb.fill(0x00);
        assert!((0..4).all(|y| (0..250).all(|x| fb.get_pixel(x, y) == Some(Color::Black))));
    }

    #[test]
    fn test_from_bytes_checks_length() {
        assert!(Framebuffer::from_bytes(128, 250, vec![0xFF; 4000]).is_ok());
        assert!(matches!(
            Framebuffer::from_bytes(128, 250, vec![0xFF; 3999]),
            Err(Error::InvalidBuffer {
                expected: 4000,
                actual: 3999
            })
        ));
    }

    #[test]
    fn test_draw_target_on_is_black() {
        let mut fb = Framebuffer::new(8, 8);
        Line::new(Point::new(0, 0), Point::new(7, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut fb)
            .unwrap();
        assert_eq!(fb.as_bytes()[0], 0x00);
        assert_eq!(fb.as_bytes()[1], 0xFF);
        assert_eq!(fb.size(), Size::new(8, 8));
    }
}
