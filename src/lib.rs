//! Monochrome SSD1680 e-paper stack: SPI transport, register sequencer,
//! framebuffer with landscape rotation, a tiny bitmap font and a generic
//! display surface.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod screen;
pub mod ssd1680;

pub use crate::screen::Screen;
pub use crate::ssd1680::{Color, Error, Framebuffer, PanelConfig, PanelDisplay, Ssd1680};
