//! SSD1680 Display Driver Implementation
//!
//! Walks the register sequences from [`crate::ssd1680::sequence`] over a
//! [`DisplayInterface`].
//!
//! ## Lifecycle
//!
//! - `new()` only stores the pins; nothing is sent.
//! - `init()` resets and programs the controller. Until it succeeds, every
//!   other operation fails with [`Error::DeviceNotReady`] without touching the bus.
//! - `stage()` / `activate()` / `refresh()` push a frame and redraw.
//! - A transport failure or `sleep()` drops the driver back to not-ready;
//!   call `init()` again. Nothing re-initializes on its own.
//!
//! ## BUSY Pin Wait
//!
//! After `MASTER_ACTIVATE` the panel holds BUSY for the whole redraw (1-3 s).
//! Running out of polls is logged and counted in the [`SequenceReport`] but
//! does not abort the sequence. An unreadable BUSY line does: the sequence
//! stops with [`Error::DeviceNotReady`] before the next register write.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::ssd1680::config::{PanelConfig, Rotation};
use crate::ssd1680::error::{DisplayError, Error};
use crate::ssd1680::graphics::Framebuffer;
use crate::ssd1680::interface::{BusyStatus, DisplayInterface};
use crate::ssd1680::rotation;
use crate::ssd1680::sequence::{Sequence, SequenceReport, Step};
use crate::ssd1680::{cmd::Cmd, color::Color, flag::Flag};

/// SSD1680 E-Paper Display Driver
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `BSY` - BUSY input pin
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `DELAY` - Delay provider for timing
pub struct Ssd1680<SPI, BSY, DC, RST, DELAY> {
    /// The display interface
    interface: DisplayInterface<SPI, BSY, DC, RST, DELAY>,
    config: PanelConfig,
    ready: bool,
    /// Portrait buffer reused by every rotated refresh
    physical: Option<Framebuffer>,
}

impl<SPI, BSY, DC, RST, DELAY> Ssd1680<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Create the driver. The configuration is checked, the panel is not touched.
    pub fn new(
        spi: SPI,
        busy: BSY,
        dc: DC,
        rst: RST,
        delay: DELAY,
        config: PanelConfig,
    ) -> Result<Self, Error> {
        config.validate()?;
        let interface = DisplayInterface::new(
            spi,
            busy,
            dc,
            rst,
            delay,
            config.dc_polarity,
            config.busy_polarity,
        );
        Ok(Ssd1680 {
            interface,
            config,
            ready: false,
            physical: None,
        })
    }

    /// Panel configuration in use
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Whether `init()` has succeeded since the last failure or sleep
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Give the bus, pins and delay back
    pub fn release(self) -> (SPI, BSY, DC, RST, DELAY) {
        self.interface.release()
    }

    /// Reset and program the controller.
    ///
    /// A reset line that cannot be driven means the hardware is not there:
    /// [`Error::DeviceNotReady`] before any register write.
    pub fn init(&mut self) -> Result<SequenceReport, Error> {
        log::info!(
            "Initializing e-paper panel {}x{}",
            self.config.width,
            self.config.height
        );
        self.ready = false;

        let sequence = Sequence::initialize(&self.config);
        let report = self.run(&sequence, None)?;
        self.ready = true;

        log::info!("Panel initialization complete");
        Ok(report)
    }

    /// Copy a physical-orientation frame into panel RAM without redrawing
    pub fn stage(&mut self, frame: &[u8]) -> Result<SequenceReport, Error> {
        self.ensure_ready()?;
        self.check_frame(frame)?;
        log::debug!("Staging {} bytes to panel RAM", frame.len());
        self.run(&Sequence::stage(&self.config), Some(frame))
    }

    /// Redraw the panel from whatever is in its RAM
    pub fn activate(&mut self) -> Result<SequenceReport, Error> {
        self.ensure_ready()?;
        log::info!("Activating display update");
        self.run(&Sequence::activate(&self.config), None)
    }

    /// Stage a physical-orientation frame and redraw
    pub fn refresh(&mut self, frame: &[u8]) -> Result<SequenceReport, Error> {
        self.ensure_ready()?;
        self.check_frame(frame)?;
        log::info!("Refreshing panel with {} byte frame", frame.len());
        self.run(&Sequence::refresh(&self.config), Some(frame))
    }

    /// Refresh from a framebuffer in caller orientation.
    ///
    /// With [`Rotation::Rotate90`] the buffer must have the logical size and is
    /// rotated into a portrait buffer first; otherwise it must match the panel.
    pub fn present(&mut self, frame: &Framebuffer) -> Result<SequenceReport, Error> {
        self.ensure_ready()?;

        let (width, height) = self.config.logical_size();
        if frame.width() != u32::from(width) || frame.height() != u32::from(height) {
            return Err(Error::InvalidBuffer {
                expected: usize::from(width).div_ceil(8) * usize::from(height),
                actual: frame.as_bytes().len(),
            });
        }

        match self.config.rotation {
            Rotation::None => self.refresh(frame.as_bytes()),
            Rotation::Rotate90 { .. } => {
                let mut physical = match self.physical.take() {
                    Some(buffer) => buffer,
                    None => Framebuffer::filled(
                        u32::from(self.config.width),
                        u32::from(self.config.height),
                        0x00,
                    ),
                };
                rotation::rotate_into(frame, &mut physical)?;
                let result = self.refresh(physical.as_bytes());
                self.physical = Some(physical);
                result
            }
        }
    }

    /// Fill panel RAM with one color and redraw
    pub fn clear(&mut self, color: Color) -> Result<SequenceReport, Error> {
        self.ensure_ready()?;
        log::info!("Clearing panel to {:?}", color);

        let fill = match color {
            Color::White => Flag::AUTO_WRITE_PATTERN_ALL_WHITE,
            Color::Black => Flag::AUTO_WRITE_PATTERN_ALL_BLACK,
        };
        let stage = Sequence::stage(&self.config);
        let mut report = SequenceReport::default();
        for step in stage.steps() {
            report = match step {
                Step::WriteRam => {
                    let len = self.config.buffer_len();
                    self.transport(|iface| iface.data_x_times(fill, len))?;
                    report.merge(SequenceReport {
                        data_bytes: len,
                        ..Default::default()
                    })
                }
                other => report.merge(self.execute(other, None)?),
            };
        }
        let activate = self.run(&Sequence::activate(&self.config), None)?;
        Ok(report.merge(activate))
    }

    /// Enter deep sleep. RAM is kept, but the controller only answers again
    /// after a hardware reset, so the driver needs `init()` afterwards.
    pub fn sleep(&mut self) -> Result<SequenceReport, Error> {
        self.ensure_ready()?;
        log::info!("Entering deep sleep (0x{:02X})", Cmd::DEEP_SLEEP_MODE);
        let report = self.run(&Sequence::sleep(), None)?;
        self.ready = false;
        Ok(report)
    }

    // ==================== Helper Functions ====================

    fn ensure_ready(&self) -> Result<(), Error> {
        if self.ready {
            Ok(())
        } else {
            log::error!("Panel not initialized, refusing to write registers");
            Err(Error::DeviceNotReady)
        }
    }

    fn check_frame(&self, frame: &[u8]) -> Result<(), Error> {
        let expected = self.config.buffer_len();
        if frame.len() != expected {
            log::error!(
                "Rejecting frame of {} bytes, panel RAM holds {}",
                frame.len(),
                expected
            );
            return Err(Error::InvalidBuffer {
                expected,
                actual: frame.len(),
            });
        }
        Ok(())
    }

    /// Run a transport call; a failure aborts the sequence and invalidates
    /// the panel state.
    fn transport<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut DisplayInterface<SPI, BSY, DC, RST, DELAY>) -> Result<(), DisplayError>,
    {
        f(&mut self.interface).map_err(|e| {
            log::error!("Transport failure, panel needs init: {:?}", e);
            self.ready = false;
            Error::TransportFailure(e)
        })
    }

    fn run(
        &mut self,
        sequence: &Sequence,
        frame: Option<&[u8]>,
    ) -> Result<SequenceReport, Error> {
        let mut report = SequenceReport::default();
        for step in sequence.steps() {
            report = report.merge(self.execute(step, frame)?);
        }
        Ok(report)
    }

    fn execute(&mut self, step: &Step, frame: Option<&[u8]>) -> Result<SequenceReport, Error> {
        let mut report = SequenceReport::default();
        match step {
            Step::HardwareReset => {
                if let Err(e) = self.interface.reset() {
                    log::error!("Reset line not available: {:?}", e);
                    self.ready = false;
                    return Err(Error::DeviceNotReady);
                }
            }
            Step::WaitBusy => {
                let status = self.interface.wait_busy(
                    self.config.busy_max_polls,
                    self.config.busy_poll_interval_ms,
                );
                match status {
                    BusyStatus::Idle => {}
                    BusyStatus::TimedOut { polls } => {
                        log::warn!("{}, continuing", Error::BusyTimeout { polls });
                        report.busy_timeouts = 1;
                        report.last_timeout_polls = polls;
                    }
                    BusyStatus::PinError => {
                        log::error!("BUSY line unreadable, panel needs init");
                        self.ready = false;
                        return Err(Error::DeviceNotReady);
                    }
                }
            }
            Step::Command { opcode, payload } => {
                log::debug!("cmd 0x{:02X} with {} data bytes", opcode, payload.len());
                self.transport(|iface| iface.cmd_with_data(*opcode, payload))?;
                report.commands = 1;
                report.data_bytes = payload.len();
            }
            Step::WriteRam => {
                let frame = frame.ok_or(Error::InvalidBuffer {
                    expected: self.config.buffer_len(),
                    actual: 0,
                })?;
                self.transport(|iface| iface.data_chunked(frame))?;
                report.data_bytes = frame.len();
            }
        }
        Ok(report)
    }
}
