//! Pixel color of the monochrome panel

use embedded_graphics::pixelcolor::BinaryColor;

/// Only two colors; the RAM bit is 1 for white, 0 for black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Ink, RAM bit 0
    Black,
    /// Paper, RAM bit 1
    #[default]
    White,
}

impl Color {
    /// Bit value in panel RAM
    pub const fn bit(self) -> u8 {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }

    /// Color of a RAM bit
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Color::White
        } else {
            Color::Black
        }
    }
}

/// `On` is ink, so it maps to black
impl From<BinaryColor> for Color {
    fn from(color: BinaryColor) -> Self {
        match color {
            BinaryColor::On => Color::Black,
            BinaryColor::Off => Color::White,
        }
    }
}

impl From<Color> for BinaryColor {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => BinaryColor::On,
            Color::White => BinaryColor::Off,
        }
    }
}
