//! Pin definitions for the e-paper panel on the ESP32-S3 board
//!
//! Only the SPI panel wiring is listed; the board binary is the single consumer.

/// Pin configuration constants for the panel
pub struct Pins;

#[allow(dead_code)]
impl Pins {
    /// Chip Select pin for SPI display
    pub const CS: u8 = 45;
    /// Data/Command control pin (Low for command, High for data)
    pub const DC: u8 = 46;
    /// Reset pin for display
    pub const RST: u8 = 47;
    /// Busy status pin (High when display is busy)
    pub const BSY: u8 = 48;
    /// SPI Clock pin
    pub const SCK: u8 = 12;
    /// SPI Master Out Slave In
    pub const MOSI: u8 = 11;
    /// Panel power enable
    pub const PWR: u8 = 7;
}
