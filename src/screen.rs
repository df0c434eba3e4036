//! Text and box drawing on top of any [`PanelDisplay`]
//!
//! Keeps one logical framebuffer in memory; drawing only touches that buffer
//! and `flush()` pushes the whole frame to the panel.

use anyhow::{bail, Context};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use crate::ssd1680::color::Color;
use crate::ssd1680::display::{BufferDescriptor, PanelDisplay, PixelFormat};
use crate::ssd1680::font;
use crate::ssd1680::graphics::Framebuffer;

/// Default glyph magnification
pub const DEFAULT_SCALE: u16 = 1;

pub struct Screen<D> {
    display: D,
    frame: Framebuffer,
    scale: u16,
}

impl<D: PanelDisplay> Screen<D> {
    /// Claim a ready display, switch it to 1 = white and start from a white frame
    pub fn init(mut display: D) -> anyhow::Result<Self> {
        if !display.is_ready() {
            bail!("display device not ready");
        }
        display
            .set_pixel_format(PixelFormat::Mono10)
            .context("Failed to select Mono10 pixel format")?;
        display
            .blanking_off()
            .context("Failed to turn blanking off")?;

        let caps = display.capabilities();
        log::info!(
            "Screen {}x{}, {:?}",
            caps.x_resolution,
            caps.y_resolution,
            caps.current_orientation
        );
        let frame = Framebuffer::new(u32::from(caps.x_resolution), u32::from(caps.y_resolution));

        Ok(Screen {
            display,
            frame,
            scale: DEFAULT_SCALE,
        })
    }

    pub fn set_scale(&mut self, scale: u16) {
        self.scale = scale;
    }

    pub fn scale(&self) -> u16 {
        self.scale
    }

    /// Draw `text` at `(x, y)` with the current scale. Returns the x position
    /// after the last character.
    pub fn print(&mut self, text: &str, x: i32, y: i32) -> i32 {
        font::draw_string(&mut self.frame, x, y, text, self.scale)
    }

    /// One pixel wide black outline from `(x, y)` to `(x + width, y + height)`,
    /// both corners inclusive
    pub fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let style = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
        let size = Size::new(width.saturating_add(1), height.saturating_add(1));
        let result = Rectangle::new(Point::new(x, y), size)
            .into_styled(style)
            .draw(&mut self.frame);
        if let Err(never) = result {
            match never {}
        }
    }

    /// Reset the in-memory frame to white. The panel keeps its image until
    /// the next `flush()`.
    pub fn clear(&mut self) {
        self.frame.clear_to(Color::White);
    }

    /// Write the whole frame to the display
    pub fn flush(&mut self) -> anyhow::Result<()> {
        let desc = BufferDescriptor::for_frame(&self.frame);
        self.display
            .write(0, 0, &desc, self.frame.as_bytes())
            .context("Failed to write frame to display")?;
        Ok(())
    }

    pub fn frame(&self) -> &Framebuffer {
        &self.frame
    }

    pub fn into_display(self) -> D {
        self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssd1680::display::{BitLayout, Capabilities, Orientation};
    use crate::ssd1680::error::Error;

    /// Records writes instead of driving hardware
    struct FakeDisplay {
        ready: bool,
        format: Option<PixelFormat>,
        writes: Vec<(BufferDescriptor, Vec<u8>)>,
        fail_writes: bool,
    }

    impl FakeDisplay {
        fn ready() -> Self {
            FakeDisplay {
                ready: true,
                format: None,
                writes: Vec::new(),
                fail_writes: false,
            }
        }
    }

    impl PanelDisplay for FakeDisplay {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn blanking_on(&mut self) -> Result<(), Error> {
            Ok(())
        }

        fn blanking_off(&mut self) -> Result<(), Error> {
            Ok(())
        }

        fn write(
            &mut self,
            _x: u16,
            _y: u16,
            desc: &BufferDescriptor,
            buf: &[u8],
        ) -> Result<(), Error> {
            if self.fail_writes {
                return Err(Error::DeviceNotReady);
            }
            self.writes.push((*desc, buf.to_vec()));
            Ok(())
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities {
                x_resolution: 248,
                y_resolution: 128,
                supported_pixel_formats: &[PixelFormat::Mono10],
                current_pixel_format: PixelFormat::Mono10,
                current_orientation: Orientation::Rotated90,
                layout: BitLayout {
                    msb_first: true,
                    vertical_tiles: false,
                },
            }
        }

        fn set_pixel_format(&mut self, format: PixelFormat) -> Result<(), Error> {
            self.format = Some(format);
            Ok(())
        }
    }

    #[test]
    fn test_init_requires_ready_display() {
        let mut display = FakeDisplay::ready();
        display.ready = false;
        assert!(Screen::init(display).is_err());
    }

    #[test]
    fn test_init_selects_mono10_and_white_frame() {
        let screen = Screen::init(FakeDisplay::ready()).unwrap();
        assert_eq!(screen.frame().width(), 248);
        assert_eq!(screen.frame().height(), 128);
        assert!(screen.frame().as_bytes().iter().all(|&b| b == 0xFF));
        assert_eq!(screen.into_display().format, Some(PixelFormat::Mono10));
    }

    #[test]
    fn test_print_and_flush_whole_frame() {
        let mut screen = Screen::init(FakeDisplay::ready()).unwrap();
        screen.set_scale(2);
        assert_eq!(screen.print("hello epaper", 0, 0), 12 * 16);
        screen.flush().unwrap();

        let display = screen.into_display();
        assert_eq!(display.writes.len(), 1);
        let (desc, bytes) = &display.writes[0];
        assert_eq!(desc.buf_size, 31 * 128);
        assert_eq!((desc.width, desc.height, desc.pitch), (248, 128, 248));
        assert_eq!(bytes.len(), 31 * 128);
        assert!(bytes.iter().any(|&b| b != 0xFF));
    }

    #[test]
    fn test_draw_rect_outline_only() {
        let mut screen = Screen::init(FakeDisplay::ready()).unwrap();
        screen.draw_rect(10, 10, 5, 4);
        let frame = screen.frame();
        assert_eq!(frame.get_pixel(10, 10), Some(Color::Black));
        // Far corner is inclusive: a 6×5 outline
        assert_eq!(frame.get_pixel(15, 14), Some(Color::Black));
        assert_eq!(frame.get_pixel(15, 10), Some(Color::Black));
        assert_eq!(frame.get_pixel(10, 14), Some(Color::Black));
        assert_eq!(frame.get_pixel(12, 11), Some(Color::White));
        assert_eq!(frame.get_pixel(16, 10), Some(Color::White));
        assert_eq!(frame.get_pixel(10, 15), Some(Color::White));

        screen.clear();
        assert!(screen.frame().as_bytes().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_flush_error_has_context() {
        let mut display = FakeDisplay::ready();
        display.fail_writes = true;
        let mut screen = Screen::init(display).unwrap();
        let err = screen.flush().unwrap_err();
        assert_eq!(err.to_string(), "Failed to write frame to display");
        assert!(err.downcast_ref::<Error>().is_some());
    }
}
