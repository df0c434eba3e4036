//! Panel configuration
//!
//! Everything that differed between the experimental bring-up variants of the
//! panel (geometry, RAM window, rotation, pin polarity, register payloads) is
//! a field here, so there is one sequencer instead of several copies.

use crate::ssd1680::error::Error;
use crate::ssd1680::flag::Flag;
use crate::ssd1680::{HEIGHT, LOGICAL_HEIGHT, LOGICAL_WIDTH, WIDTH};

/// Reference busy-poll budget: 500 polls at 10 ms, a 5 s ceiling.
pub const BUSY_MAX_POLLS: u32 = 500;
/// Reference busy-poll cadence in milliseconds
pub const BUSY_POLL_INTERVAL_MS: u32 = 10;

/// Level of the D/C line that marks a byte as a register opcode.
///
/// The SSD1680 datasheet specifies low for commands; some breakout boards are
/// wired through an inverter. Check against the panel before changing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DcPolarity {
    /// D/C low = command, high = data
    #[default]
    CommandLow,
    /// D/C high = command, low = data
    CommandHigh,
}

/// Level of the BUSY line while the controller is working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusyPolarity {
    /// High = busy, low = idle
    #[default]
    ActiveHigh,
    /// Low = busy, high = idle
    ActiveLow,
}

/// Orientation of the software framebuffer relative to panel RAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Framebuffer already matches panel RAM
    None,
    /// Landscape framebuffer of the given size, rotated 90° clockwise into
    /// portrait panel RAM before streaming.
    Rotate90 {
        /// Logical width in pixels
        width: u16,
        /// Logical height in pixels
        height: u16,
    },
}

/// Geometry, polarity and register payloads for one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    /// Physical width (source lines) in pixels
    pub width: u16,
    /// Physical height (gate lines) in pixels
    pub height: u16,
    /// First addressable byte-column of the RAM window
    pub ram_x_start: u8,
    /// First addressable row of the RAM window
    pub ram_y_start: u16,
    /// Orientation of the caller's framebuffer
    pub rotation: Rotation,
    /// D/C level that marks a command byte
    pub dc_polarity: DcPolarity,
    /// BUSY level while the controller works
    pub busy_polarity: BusyPolarity,
    /// Busy reads before a wait gives up
    pub busy_max_polls: u32,
    /// Pause between busy reads
    pub busy_poll_interval_ms: u32,
    /// Payload of Data Entry Mode (0x11)
    pub data_entry_mode: u8,
    /// Payload of Border Waveform Control (0x3C)
    pub border_waveform: u8,
    /// Payload of Booster Soft Start Control (0x0C)
    pub soft_start: [u8; 5],
    /// Payload of Display Update Control 2 (0x22)
    pub update_control: u8,
}

impl PanelConfig {
    /// Waveshare-style 2.13" 128×250 panel driven from a 248×128 landscape buffer.
    pub const EPD_2IN13: PanelConfig = PanelConfig {
        width: WIDTH,
        height: HEIGHT,
        ram_x_start: 0,
        ram_y_start: 0,
        rotation: Rotation::Rotate90 {
            width: LOGICAL_WIDTH,
            height: LOGICAL_HEIGHT,
        },
        dc_polarity: DcPolarity::CommandLow,
        busy_polarity: BusyPolarity::ActiveHigh,
        busy_max_polls: BUSY_MAX_POLLS,
        busy_poll_interval_ms: BUSY_POLL_INTERVAL_MS,
        data_entry_mode: Flag::DATA_ENTRY_INCRY_INCRX,
        border_waveform: Flag::BORDER_WAVEFORM_FOLLOW_LUT1,
        soft_start: Flag::BOOSTER_SOFT_START_PATCH,
        update_control: Flag::DISPLAY_MODE_1,
    };

    /// Replace the framebuffer orientation
    pub const fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the D/C polarity
    pub const fn with_dc_polarity(mut self, polarity: DcPolarity) -> Self {
        self.dc_polarity = polarity;
        self
    }

    /// Replace the BUSY polarity
    pub const fn with_busy_polarity(mut self, polarity: BusyPolarity) -> Self {
        self.busy_polarity = polarity;
        self
    }

    /// Replace the busy poll budget and cadence
    pub const fn with_busy_timeout(mut self, max_polls: u32, poll_interval_ms: u32) -> Self {
        self.busy_max_polls = max_polls;
        self.busy_poll_interval_ms = poll_interval_ms;
        self
    }

    /// Bytes per physical row
    pub const fn width_bytes(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Exact length of a frame streamed to panel RAM
    pub const fn buffer_len(&self) -> usize {
        self.width_bytes() * self.height as usize
    }

    /// Last addressable byte-column of the RAM window
    pub fn ram_x_end(&self) -> u8 {
        // validate() guarantees the sum fits
        (self.ram_x_start as usize + self.width_bytes() - 1) as u8
    }

    /// Last addressable row of the RAM window
    pub fn ram_y_end(&self) -> u16 {
        self.ram_y_start + (self.height - 1)
    }

    /// Size of the framebuffer callers draw into
    pub fn logical_size(&self) -> (u16, u16) {
        match self.rotation {
            Rotation::None => (self.width, self.height),
            Rotation::Rotate90 { width, height } => (width, height),
        }
    }

    /// Reject configurations that cannot be programmed into the panel
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig("panel size must be non-zero"));
        }
        if self.ram_x_start as usize + self.width_bytes() > usize::from(u8::MAX) + 1 {
            return Err(Error::InvalidConfig("RAM X window exceeds 8-bit address"));
        }
        if self.ram_y_start.checked_add(self.height - 1).is_none() {
            return Err(Error::InvalidConfig("RAM Y window exceeds 16-bit address"));
        }
        if self.busy_max_polls == 0 {
            return Err(Error::InvalidConfig("busy poll budget must be non-zero"));
        }
        if let Rotation::Rotate90 { width, height } = self.rotation {
            if width == 0 || height == 0 {
                return Err(Error::InvalidConfig("logical size must be non-zero"));
            }
            // px = ly must fit the panel width, py = H-1-lx the panel height
            if height > self.width || width > self.height {
                return Err(Error::InvalidConfig(
                    "rotated logical buffer does not fit the panel",
                ));
            }
        }
        Ok(())
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::EPD_2IN13
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_geometry() {
        let config = PanelConfig::default();
        assert_eq!(config.width_bytes(), 16);
        assert_eq!(config.buffer_len(), 4000);
        assert_eq!(config.ram_x_end(), 0x0F);
        assert_eq!(config.ram_y_end(), 249);
        assert_eq!(config.logical_size(), (248, 128));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unrotated_logical_size_is_physical() {
        let config = PanelConfig::default().with_rotation(Rotation::None);
        assert_eq!(config.logical_size(), (128, 250));
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mut config = PanelConfig::default();
        config.height = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = PanelConfig::default().with_rotation(Rotation::Rotate90 {
            width: 251,
            height: 128,
        });
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = PanelConfig::default().with_busy_timeout(0, 10);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = PanelConfig::default();
        config.ram_y_start = u16::MAX;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
