//! SSD1680 ePaper Display Driver
//!
//! Used with the WeAct 2.13" black/white module (122×250 visible, 128×250 RAM).
//!
//! This driver is losely modeled after the
//! [epd-waveshare](https://github.com/caemor/epd-waveshare) drivers but built for
//! a single monochrome buffer and a landscape drawing surface.
//!
//! ### Usage
//!
//! 1. create the driver with a [`config::PanelConfig`] and call [`driver::Ssd1680::init`]
//! 1. draw into a [`graphics::Framebuffer`], either with [`font`] or with
//!    [`embedded_graphics`](https://github.com/jamwaffles/embedded-graphics)
//! 1. hand the buffer to [`driver::Ssd1680::present`], which rotates it and
//!    refreshes the panel
//!
//! [`display::PanelDisplay`] wraps the same driver behind the generic display API.
#![warn(missing_docs)]

pub mod cmd;
pub mod color;
pub mod config;
pub mod display;
pub mod driver;
pub mod error;
pub mod flag;
pub mod font;
pub mod graphics;
pub mod interface;
pub mod pins;
pub mod rotation;
pub mod sequence;

/// Display width, pixels horizontally (panel RAM, portrait)
pub const WIDTH: u16 = 128;

/// Display height, pixels vertically (panel RAM, portrait)
pub const HEIGHT: u16 = 250;

/// Bytes per RAM row
pub const WIDTH_BYTES: usize = (WIDTH as usize).div_ceil(8);

/// Bytes in one full frame of panel RAM
pub const BUFFER_SIZE: usize = WIDTH_BYTES * HEIGHT as usize;

/// Width of the landscape drawing surface. The last two gate lines are not
/// addressed, so it is two pixels short of `HEIGHT` rounded to a byte.
pub const LOGICAL_WIDTH: u16 = 248;

/// Height of the landscape drawing surface
pub const LOGICAL_HEIGHT: u16 = WIDTH;

pub use self::color::Color;
pub use self::config::{BusyPolarity, DcPolarity, PanelConfig, Rotation};
pub use self::display::{BufferDescriptor, Capabilities, PanelDisplay, PixelFormat};
pub use self::driver::Ssd1680;
pub use self::error::Error;
pub use self::graphics::Framebuffer;
pub use self::sequence::SequenceReport;
