//! Driver error taxonomy

pub use display_interface::DisplayError;

/// Errors reported by the panel driver, the framebuffer and the display surface.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bus or GPIO unavailable, or the panel has not been (re)initialized.
    /// No register write is attempted while in this state.
    #[error("display device not ready")]
    DeviceNotReady,

    /// An SPI or D/C write failed in the middle of a sequence. The panel is left
    /// in an undefined register state and must be initialized again.
    #[error("transport failure: {0:?}")]
    TransportFailure(DisplayError),

    /// BUSY never went idle. Soft: sequences log it and carry on, see
    /// [`super::sequence::SequenceReport::check`].
    #[error("panel still busy after {polls} polls")]
    BusyTimeout {
        /// Number of polls that observed the busy level
        polls: u32,
    },

    /// Read-back, partial window writes and foreign pixel formats.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// Frame length does not match the panel geometry.
    #[error("framebuffer is {actual} bytes, expected {expected}")]
    InvalidBuffer {
        /// `width_bytes * height` of the target
        expected: usize,
        /// Length that was passed in
        actual: usize,
    },

    /// Geometry that cannot be programmed into the RAM window registers.
    #[error("invalid panel configuration: {0}")]
    InvalidConfig(&'static str),
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Error::TransportFailure(e)
    }
}
