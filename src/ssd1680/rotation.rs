//! Landscape to portrait remap
//!
//! Software draws into a landscape buffer, panel RAM is portrait. A logical
//! pixel `(lx, ly)` lands on physical `(ly, H - 1 - lx)`, a 90° clockwise turn.

use crate::ssd1680::color::Color;
use crate::ssd1680::error::Error;
use crate::ssd1680::graphics::Framebuffer;

/// Physical coordinate of a logical pixel. Only meaningful for
/// `lx < physical_height`.
pub const fn map(lx: u32, ly: u32, physical_height: u32) -> (u32, u32) {
    (ly, physical_height - 1 - lx)
}

fn check_fit(logical: &Framebuffer, physical: &Framebuffer) -> Result<(), Error> {
    if logical.height() > physical.width() || logical.width() > physical.height() {
        return Err(Error::InvalidConfig(
            "rotated logical buffer does not fit the panel",
        ));
    }
    Ok(())
}

/// Rebuild `physical` from scratch out of `logical`.
///
/// `physical` is cleared to black first; every white logical pixel is then
/// copied through [`map`]. Physical pixels no logical pixel maps to stay black.
pub fn rotate_into(logical: &Framebuffer, physical: &mut Framebuffer) -> Result<(), Error> {
    check_fit(logical, physical)?;
    physical.clear_to(Color::Black);

    let physical_height = physical.height();
    let width_bytes = logical.width_bytes();
    for ly in 0..logical.height() {
        let row = &logical.as_bytes()[ly as usize * width_bytes..][..width_bytes];
        for (byte_index, &byte) in row.iter().enumerate() {
            if byte == 0 {
                continue;
            }
            for bit in 0..8 {
                let lx = byte_index as u32 * 8 + bit;
                // Padding bits past the logical width are outside the domain
                if lx >= logical.width() {
                    break;
                }
                if byte & (0x80 >> bit) != 0 {
                    let (px, py) = map(lx, ly, physical_height);
                    physical.set_pixel(px as i32, py as i32, Color::White);
                }
            }
        }
    }
    Ok(())
}

/// Allocate a physical buffer and rotate `logical` into it
pub fn rotate(
    logical: &Framebuffer,
    physical_width: u32,
    physical_height: u32,
) -> Result<Framebuffer, Error> {
    let mut physical = Framebuffer::filled(physical_width, physical_height, 0x00);
    rotate_into(logical, &mut physical)?;
    Ok(physical)
}
