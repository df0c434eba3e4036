//! Display interface using SPI
use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use crate::ssd1680::config::{BusyPolarity, DcPolarity};

/// Settle time on each side of the reset pulse
const RESET_DELAY_MS: u32 = 20;

/// Bytes per SPI transaction when streaming RAM contents
pub const STREAM_CHUNK_SIZE: usize = 128;

/// Outcome of a busy wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyStatus {
    /// BUSY read idle
    Idle,
    /// BUSY stayed at the busy level for every poll
    TimedOut {
        /// Polls performed, always the full budget
        polls: u32,
    },
    /// BUSY could not be read; nothing may be sent until the next init
    PinError,
}

/// SPI + GPIO connection to the panel.
///
/// Chip-select is owned by the [`SpiDevice`]; every `cmd`/`data` call is one
/// SPI transaction, so CS returns to idle after each one.
pub struct DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// SPI device
    spi: SPI,
    /// Busy input, level per `busy_polarity`
    busy: BSY,
    /// Data/Command select, level per `dc_polarity`
    dc: DC,
    /// Pin for Reseting
    rst: RST,
    /// Delay provider for reset pulses and busy polling
    delay: DELAY,
    dc_polarity: DcPolarity,
    busy_polarity: BusyPolarity,
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// Create the interface. Nothing is sent until the first call.
    pub fn new(
        spi: SPI,
        busy: BSY,
        dc: DC,
        rst: RST,
        delay: DELAY,
        dc_polarity: DcPolarity,
        busy_polarity: BusyPolarity,
    ) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            delay,
            dc_polarity,
            busy_polarity,
        }
    }

    /// Give the bus and pins back
    pub fn release(self) -> (SPI, BSY, DC, RST, DELAY) {
        (self.spi, self.busy, self.dc, self.rst, self.delay)
    }
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn select_command(&mut self) -> Result<(), DisplayError> {
        let result = match self.dc_polarity {
            DcPolarity::CommandLow => self.dc.set_low(),
            DcPolarity::CommandHigh => self.dc.set_high(),
        };
        result.map_err(|_| DisplayError::DCError)
    }

    fn select_data(&mut self) -> Result<(), DisplayError> {
        let result = match self.dc_polarity {
            DcPolarity::CommandLow => self.dc.set_high(),
            DcPolarity::CommandHigh => self.dc.set_low(),
        };
        result.map_err(|_| DisplayError::DCError)
    }

    /// Basic function for sending commands
    pub fn cmd(&mut self, command: u8) -> Result<(), DisplayError> {
        self.select_command()?;

        match self.spi.write(&[command]) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::error!("SPI write error for command 0x{:02X}: {:?}", command, e);
                Err(DisplayError::BusWriteError)
            }
        }
    }

    /// Send a single data byte
    pub fn send_data(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.data(&[byte])
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        if data.is_empty() {
            return Ok(());
        }
        self.select_data()?;
        self.spi
            .write(data)
            .map_err(|_| DisplayError::BusWriteError)
    }

    /// Basic function for sending a command and the data belonging to it.
    pub fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Stream a large block (a whole frame) as data, one transaction per chunk
    pub fn data_chunked(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        for chunk in data.chunks(STREAM_CHUNK_SIZE) {
            self.data(chunk)?;
        }
        log::debug!("Completed sending {} bytes of data", data.len());
        Ok(())
    }

    /// Basic function for sending the same byte of data (one u8) multiple times over spi
    /// Used for setting one color for the whole frame
    pub fn data_x_times(&mut self, val: u8, repetitions: usize) -> Result<(), DisplayError> {
        let buffer = [val; STREAM_CHUNK_SIZE];

        let full_chunks = repetitions / STREAM_CHUNK_SIZE;
        let remainder = repetitions % STREAM_CHUNK_SIZE;

        for _ in 0..full_chunks {
            self.data(&buffer)?;
        }
        if remainder > 0 {
            self.data(&buffer[..remainder])?;
        }

        log::debug!("Completed sending {} bytes of 0x{:02X}", repetitions, val);
        Ok(())
    }

    /// Pulse the reset line low, then release it.
    ///
    /// The controller comes out of reset with undefined registers; a full
    /// initialization must follow.
    pub fn reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    /// Poll BUSY every `poll_interval_ms` until idle or `max_polls` reads have
    /// all seen busy.
    ///
    /// A timeout is not an error here: panels sometimes report a stale busy
    /// state, so the caller decides whether to go on. A read failure is
    /// reported as [`BusyStatus::PinError`] on the first poll.
    pub fn wait_busy(&mut self, max_polls: u32, poll_interval_ms: u32) -> BusyStatus {
        for _ in 0..max_polls {
            let level_high = match self.busy.is_high() {
                Ok(level) => level,
                Err(e) => {
                    log::error!("Error reading BUSY pin state: {:?}", e);
                    return BusyStatus::PinError;
                }
            };

            let busy = match self.busy_polarity {
                BusyPolarity::ActiveHigh => level_high,
                BusyPolarity::ActiveLow => !level_high,
            };
            if !busy {
                return BusyStatus::Idle;
            }

            self.delay.delay_ms(poll_interval_ms);
        }

        log::warn!(
            "TIMEOUT waiting for BUSY to clear after {} polls of {} ms",
            max_polls,
            poll_interval_ms
        );
        BusyStatus::TimedOut { polls: max_polls }
    }
}
