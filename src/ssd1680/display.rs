//! Generic display surface
//!
//! The small polymorphic API a display or character-framebuffer layer expects
//! from a panel driver. [`Ssd1680`] is one implementation; anything else that
//! can accept a packed monochrome frame can be plugged in behind it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::ssd1680::config::Rotation;
use crate::ssd1680::driver::Ssd1680;
use crate::ssd1680::error::Error;
use crate::ssd1680::graphics::Framebuffer;

/// Pixel formats a display layer may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 1 bit per pixel, 1 = black
    Mono01,
    /// 1 bit per pixel, 1 = white
    Mono10,
    /// 8-bit grayscale
    L8,
    /// 16-bit color
    Rgb565,
    /// 24-bit color
    Rgb888,
    /// 32-bit color with alpha
    Argb8888,
}

/// How the panel RAM relates to the logical frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// RAM matches the frame
    Normal,
    /// Frame turned 90° clockwise into RAM
    Rotated90,
    /// Frame turned 180°
    Rotated180,
    /// Frame turned 270° clockwise
    Rotated270,
}

/// Bit and byte layout of a packed monochrome frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitLayout {
    /// Bit 7 is the leftmost pixel of a byte
    pub msb_first: bool,
    /// Bytes run down columns instead of along rows
    pub vertical_tiles: bool,
}

/// What a display can do, reported to the upper layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Frame width in pixels
    pub x_resolution: u16,
    /// Frame height in pixels
    pub y_resolution: u16,
    /// Formats `set_pixel_format` accepts
    pub supported_pixel_formats: &'static [PixelFormat],
    /// Format `write` expects
    pub current_pixel_format: PixelFormat,
    /// How the frame lands in panel RAM
    pub current_orientation: Orientation,
    /// Packing of pixels into bytes
    pub layout: BitLayout,
}

/// Shape of a buffer handed to [`PanelDisplay::write`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDescriptor {
    /// Bytes in the buffer
    pub buf_size: usize,
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Pixels per row including padding
    pub pitch: u16,
}

impl BufferDescriptor {
    /// Descriptor covering a whole framebuffer
    pub fn for_frame(frame: &Framebuffer) -> Self {
        BufferDescriptor {
            buf_size: frame.as_bytes().len(),
            width: frame.width() as u16,
            height: frame.height() as u16,
            pitch: frame.width() as u16,
        }
    }
}

/// Operations a display layer drives a panel through
pub trait PanelDisplay {
    /// Whether the device can take writes
    fn is_ready(&self) -> bool;

    /// Hide the panel contents
    fn blanking_on(&mut self) -> Result<(), Error>;

    /// Show the panel contents again
    fn blanking_off(&mut self) -> Result<(), Error>;

    /// Put `buf` on the panel, top-left corner at `(x, y)`
    fn write(&mut self, x: u16, y: u16, desc: &BufferDescriptor, buf: &[u8]) -> Result<(), Error>;

    /// Read panel contents back. Write-only panels cannot.
    fn read(
        &mut self,
        _x: u16,
        _y: u16,
        _desc: &BufferDescriptor,
        _buf: &mut [u8],
    ) -> Result<(), Error> {
        Err(Error::UnsupportedOperation("read"))
    }

    /// Resolution, formats and layout of the panel
    fn capabilities(&self) -> Capabilities;

    /// Select the format of buffers passed to `write`
    fn set_pixel_format(&mut self, format: PixelFormat) -> Result<(), Error>;
}

const SUPPORTED_FORMATS: &[PixelFormat] = &[PixelFormat::Mono10];

impl<SPI, BSY, DC, RST, DELAY> PanelDisplay for Ssd1680<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn is_ready(&self) -> bool {
        Ssd1680::is_ready(self)
    }

    // E-paper holds its image without power; nothing to blank.
    fn blanking_on(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn blanking_off(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Full frames only: the buffer is rotated as configured and the whole
    /// panel refreshed.
    fn write(&mut self, x: u16, y: u16, desc: &BufferDescriptor, buf: &[u8]) -> Result<(), Error> {
        let (width, height) = self.config().logical_size();
        if x != 0 || y != 0 || desc.width != width || desc.height != height {
            log::warn!(
                "Rejecting {}x{} write at ({}, {}), only full {}x{} frames are supported",
                desc.width,
                desc.height,
                x,
                y,
                width,
                height
            );
            return Err(Error::UnsupportedOperation("partial window write"));
        }
        if desc.pitch != desc.width {
            return Err(Error::UnsupportedOperation("padded rows"));
        }
        if buf.len() < desc.buf_size {
            return Err(Error::InvalidBuffer {
                expected: desc.buf_size,
                actual: buf.len(),
            });
        }

        let frame = Framebuffer::from_bytes(
            u32::from(width),
            u32::from(height),
            buf[..desc.buf_size].to_vec(),
        )?;
        self.present(&frame)?;
        Ok(())
    }

    fn capabilities(&self) -> Capabilities {
        let (x_resolution, y_resolution) = self.config().logical_size();
        let current_orientation = match self.config().rotation {
            Rotation::None => Orientation::Normal,
            Rotation::Rotate90 { .. } => Orientation::Rotated90,
        };
        Capabilities {
            x_resolution,
            y_resolution,
            supported_pixel_formats: SUPPORTED_FORMATS,
            current_pixel_format: PixelFormat::Mono10,
            current_orientation,
            layout: BitLayout {
                msb_first: true,
                vertical_tiles: false,
            },
        }
    }

    fn set_pixel_format(&mut self, format: PixelFormat) -> Result<(), Error> {
        if SUPPORTED_FORMATS.contains(&format) {
            Ok(())
        } else {
            log::error!("Pixel format {:?} not supported", format);
            Err(Error::UnsupportedOperation("pixel format"))
        }
    }
}
