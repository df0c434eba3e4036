//! Register sequences for panel bring-up and refresh
//!
//! Sequences are plain data built from a [`PanelConfig`]; the driver walks them
//! step by step. Opcode order and payload bytes are the wire contract with the
//! controller, so a sequence is rebuilt on every call instead of being patched.
//!
//! ## Initialize
//!
//! reset → busy → `0x12` → busy → `0x01` → `0x11` → `0x3C` → `0x18` → `0x0C`
//! → `0x44` → `0x45`
//!
//! ## Refresh
//!
//! Stage: `0x4E` → `0x4F` → `0x24` + frame. Activate: `0x22 F7` → `0x20` → busy.
//! Staging only fills controller RAM; the slow visible redraw starts at `0x20`,
//! so several draws can be batched into one activation.

use crate::ssd1680::cmd::Cmd;
use crate::ssd1680::config::PanelConfig;
use crate::ssd1680::error::Error;
use crate::ssd1680::flag::Flag;

/// One unit of work for the sequencer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Pulse the reset line
    HardwareReset,
    /// Poll BUSY until idle or the configured budget runs out
    WaitBusy,
    /// Register opcode followed by its payload (possibly empty)
    Command {
        /// Register address
        opcode: u8,
        /// Bytes sent with D/C at the data level
        payload: Vec<u8>,
    },
    /// Stream the frame handed to the driver as data bytes, in buffer order
    WriteRam,
}

impl Step {
    fn command(opcode: u8, payload: &[u8]) -> Self {
        Step::Command {
            opcode,
            payload: payload.to_vec(),
        }
    }
}

/// Ordered list of steps
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    steps: Vec<Step>,
}

impl Sequence {
    /// Full bring-up after power on or after a failure
    pub fn initialize(config: &PanelConfig) -> Self {
        let lines = config.height - 1;
        let y_start = config.ram_y_start;
        let y_end = config.ram_y_end();

        Sequence {
            steps: vec![
                Step::HardwareReset,
                Step::WaitBusy,
                Step::command(Cmd::SW_RESET, &[]),
                Step::WaitBusy,
                Step::command(
                    Cmd::DRIVER_CONTROL,
                    &[
                        (lines & 0xFF) as u8,
                        (lines >> 8) as u8,
                        Flag::DRIVER_OUTPUT_GATE_SCAN_FROM_G0,
                    ],
                ),
                Step::command(Cmd::DATA_ENTRY_MODE, &[config.data_entry_mode]),
                Step::command(Cmd::BORDER_WAVEFORM_CONTROL, &[config.border_waveform]),
                Step::command(Cmd::TEMP_CONTROL, &[Flag::INTERNAL_TEMP_SENSOR]),
                Step::command(Cmd::BOOST_SOFT_START_CONTROL, &config.soft_start),
                Step::command(
                    Cmd::SET_RAMX_START_END,
                    &[config.ram_x_start, config.ram_x_end()],
                ),
                Step::command(
                    Cmd::SET_RAMY_START_END,
                    &[
                        (y_start & 0xFF) as u8,
                        (y_start >> 8) as u8,
                        (y_end & 0xFF) as u8,
                        (y_end >> 8) as u8,
                    ],
                ),
            ],
        }
    }

    /// Point the RAM counters at the window origin and write a frame
    pub fn stage(config: &PanelConfig) -> Self {
        let y_start = config.ram_y_start;
        Sequence {
            steps: vec![
                Step::command(Cmd::SET_RAMX_COUNTER, &[config.ram_x_start]),
                Step::command(
                    Cmd::SET_RAMY_COUNTER,
                    &[(y_start & 0xFF) as u8, (y_start >> 8) as u8],
                ),
                Step::command(Cmd::WRITE_BW_DATA, &[]),
                Step::WriteRam,
            ],
        }
    }

    /// Load the LUT from OTP, drive the panel and wait for it to finish
    pub fn activate(config: &PanelConfig) -> Self {
        Sequence {
            steps: vec![
                Step::command(Cmd::DISPLAY_UPDATE_CTRL2, &[config.update_control]),
                Step::command(Cmd::MASTER_ACTIVATE, &[]),
                Step::WaitBusy,
            ],
        }
    }

    /// Stage followed by activate
    pub fn refresh(config: &PanelConfig) -> Self {
        let mut sequence = Self::stage(config);
        sequence.steps.extend(Self::activate(config).steps);
        sequence
    }

    /// Deep sleep, RAM retained. Only a reset wakes the controller.
    pub fn sleep() -> Self {
        Sequence {
            steps: vec![Step::command(Cmd::DEEP_SLEEP_MODE, &[Flag::DEEP_SLEEP_MODE_1])],
        }
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether running this sequence needs a frame
    pub fn writes_ram(&self) -> bool {
        self.steps.iter().any(|s| *s == Step::WriteRam)
    }
}

/// What happened while a sequence ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequenceReport {
    /// Opcodes sent
    pub commands: usize,
    /// Data bytes sent, payloads and RAM contents together
    pub data_bytes: usize,
    /// Busy waits that ran out of polls
    pub busy_timeouts: usize,
    /// Poll budget of the last timed out wait
    pub last_timeout_polls: u32,
}

impl SequenceReport {
    /// Sum of two reports; the later timeout wins
    pub fn merge(mut self, other: SequenceReport) -> Self {
        self.commands += other.commands;
        self.data_bytes += other.data_bytes;
        self.busy_timeouts += other.busy_timeouts;
        if other.busy_timeouts > 0 {
            self.last_timeout_polls = other.last_timeout_polls;
        }
        self
    }

    /// Escalate soft busy timeouts for callers that want them to be fatal
    pub fn check(self) -> Result<Self, Error> {
        if self.busy_timeouts > 0 {
            Err(Error::BusyTimeout {
                polls: self.last_timeout_polls,
            })
        } else {
            Ok(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opcodes(sequence: &Sequence) -> Vec<Option<u8>> {
        sequence
            .steps()
            .iter()
            .map(|s| match s {
                Step::Command { opcode, .. } => Some(*opcode),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initialize_order_and_payloads() {
        let seq = Sequence::initialize(&PanelConfig::default());
        assert_eq!(
            seq.steps(),
            &[
                Step::HardwareReset,
                Step::WaitBusy,
                Step::command(0x12, &[]),
                Step::WaitBusy,
                Step::command(0x01, &[0xF9, 0x00, 0x00]),
                Step::command(0x11, &[0x03]),
                Step::command(0x3C, &[0x05]),
                Step::command(0x18, &[0x80]),
                Step::command(0x0C, &[0xAE, 0xC7, 0xC3, 0xC0, 0x80]),
                Step::command(0x44, &[0x00, 0x0F]),
                Step::command(0x45, &[0x00, 0x00, 0xF9, 0x00]),
            ]
        );
        assert!(!seq.writes_ram());
    }

    #[test]
    fn test_refresh_is_stage_then_activate() {
        let config = PanelConfig::default();
        let seq = Sequence::refresh(&config);
        assert_eq!(
            opcodes(&seq),
            vec![Some(0x4E), Some(0x4F), Some(0x24), None, Some(0x22), Some(0x20), None]
        );
        assert_eq!(seq.steps()[3], Step::WriteRam);
        assert_eq!(seq.steps()[4], Step::command(0x22, &[0xF7]));
        assert_eq!(*seq.steps().last().unwrap(), Step::WaitBusy);
        assert!(seq.writes_ram());
        assert!(!Sequence::activate(&config).writes_ram());
    }

    #[test]
    fn test_window_follows_config() {
        let mut config = PanelConfig::default();
        config.ram_x_start = 1;
        config.ram_y_start = 0x0102;
        config.height = 300;

        let init = Sequence::initialize(&config);
        assert_eq!(init.steps()[4], Step::command(0x01, &[0x2B, 0x01, 0x00]));
        assert_eq!(init.steps()[9], Step::command(0x44, &[0x01, 0x10]));
        // 0x0102 + 299 = 0x022D
        assert_eq!(
            init.steps()[10],
            Step::command(0x45, &[0x02, 0x01, 0x2D, 0x02])
        );

        let stage = Sequence::stage(&config);
        assert_eq!(stage.steps()[0], Step::command(0x4E, &[0x01]));
        assert_eq!(stage.steps()[1], Step::command(0x4F, &[0x02, 0x01]));
    }

    #[test]
    fn test_report_check_escalates_timeouts() {
        let clean = SequenceReport {
            commands: 3,
            ..Default::default()
        };
        assert!(clean.check().is_ok());

        let timed_out = clean.merge(SequenceReport {
            busy_timeouts: 1,
            last_timeout_polls: 500,
            ..Default::default()
        });
        assert_eq!(timed_out.commands, 3);
        assert!(matches!(
            timed_out.check(),
            Err(Error::BusyTimeout { polls: 500 })
        ));
    }
}
