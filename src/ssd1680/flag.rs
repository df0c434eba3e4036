/// Payload values for the SSD1680 registers in [`super::cmd::Cmd`].
///
/// Only the values the reference 2.13" panel actually needs are listed.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Driver Output Control (0x01), third byte
    pub const DRIVER_OUTPUT_GATE_SCAN_FROM_G0: u8 = 0x00;

    // Data Entry Mode (0x11) flags
    pub const DATA_ENTRY_DECRY_DECRX: u8 = 0x00; // Y decrement, X decrement
    pub const DATA_ENTRY_DECRY_INCRX: u8 = 0x01; // Y decrement, X increment
    pub const DATA_ENTRY_INCRY_DECRX: u8 = 0x02; // Y increment, X decrement
    pub const DATA_ENTRY_INCRY_INCRX: u8 = 0x03; // Y increment, X increment

    // Deep Sleep Mode (0x10) flags
    pub const DEEP_SLEEP_MODE_1: u8 = 0x01; // Retain RAM

    // Temperature Sensor Control (0x18) flags
    pub const INTERNAL_TEMP_SENSOR: u8 = 0x80;

    // Border Waveform Control (0x3C): follow LUT, LUT1
    pub const BORDER_WAVEFORM_FOLLOW_LUT1: u8 = 0x05;

    // Booster Soft Start Control (0x0C), vendor patch. Sent verbatim.
    pub const BOOSTER_SOFT_START_PATCH: [u8; 5] = [0xAE, 0xC7, 0xC3, 0xC0, 0x80];

    // Display Update Control 2 (0x22): clock, analog, load temp, LUT from OTP, display
    pub const DISPLAY_MODE_1: u8 = 0xF7;

    // Whole-byte fills for RAM (1 = white)
    pub const AUTO_WRITE_PATTERN_ALL_WHITE: u8 = 0xFF;
    pub const AUTO_WRITE_PATTERN_ALL_BLACK: u8 = 0x00;
}
