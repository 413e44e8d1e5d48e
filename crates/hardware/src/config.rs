//! Configuration system for the harness.
//!
//! This module defines the parameters of a harness run. It provides:
//! 1. **Defaults:** Baseline timing (868 ticks per bit), FIFO depth and CPU memory sizes.
//! 2. **Structures:** Timing, FIFO and CPU sections, each deserializable on its own.
//! 3. **Budgets:** Tick budgets derived from timing instead of hard-coded loop counts.
//!
//! Configuration is supplied as JSON (`HarnessConfig::from_file`) or taken from `HarnessConfig::default()`.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::common::constants::{FRAME_BITS, MIN_RESET_CYCLES};
use crate::common::error::ConfigError;

/// Default configuration constants for the harness.
mod defaults {
    /// Clock ticks per bit period (100 MHz clock at 115200 baud).
    pub const BAUD_INTERVAL: u32 = 868;

    /// Idle bit periods inserted after each frame before the next start bit.
    pub const IDLE_GAP_BITS: u32 = 1;

    /// Extra frame periods added to every derived tick budget.
    ///
    /// Covers the device's receive-to-transmit latency in loopback runs.
    pub const SLACK_FRAMES: u32 = 3;

    /// Cycles reset is held active.
    pub const RESET_CYCLES: u32 = 2;

    /// Device FIFO depth in entries.
    pub const FIFO_DEPTH: usize = 8;

    /// Program memory size of the CPU model, in words.
    pub const PROGRAM_WORDS: usize = 256;

    /// Data RAM size of the CPU model, in words.
    pub const DATA_WORDS: usize = 256;

    /// Cycles the CPU runs unattended after a load.
    pub const RUN_CYCLES: u64 = 1_000;

    /// Frame periods to wait for a reply byte.
    pub const REPLY_FRAMES: u32 = 4;
}

/// Root configuration for a harness run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarnessConfig {
    /// Serial timing and budgets.
    #[serde(default)]
    pub timing: TimingConfig,
    /// FIFO-backed device parameters.
    #[serde(default)]
    pub fifo: FifoConfig,
    /// CPU device parameters.
    #[serde(default)]
    pub cpu: CpuConfig,
}

impl HarnessConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// Missing sections and fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` for malformed input and `ConfigError::Invalid`
    /// when a value fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise the
    /// errors of [`HarnessConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = text.len(), "read config");
        Self::from_json_str(&text)
    }

    /// Checks every section for values the harness cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as `ConfigError::Invalid`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.baud_interval < 2 {
            return Err(ConfigError::Invalid {
                field: "timing.baud_interval",
                reason: format!("{} leaves no mid-bit sample point", self.timing.baud_interval),
            });
        }
        if self.timing.reset_cycles < MIN_RESET_CYCLES {
            return Err(ConfigError::Invalid {
                field: "timing.reset_cycles",
                reason: format!("reset must be held at least {MIN_RESET_CYCLES} cycles"),
            });
        }
        if self.fifo.depth == 0 {
            return Err(ConfigError::Invalid {
                field: "fifo.depth",
                reason: "depth must be at least 1".into(),
            });
        }
        if self.cpu.program_words == 0 {
            return Err(ConfigError::Invalid {
                field: "cpu.program_words",
                reason: "program memory cannot be empty".into(),
            });
        }
        if self.cpu.data_words == 0 {
            return Err(ConfigError::Invalid {
                field: "cpu.data_words",
                reason: "data memory cannot be empty".into(),
            });
        }
        Ok(())
    }
}

/// Serial timing and tick budget parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Clock ticks per bit period.
    #[serde(default = "TimingConfig::default_baud_interval")]
    pub baud_interval: u32,

    /// Idle bit periods between consecutive frames.
    #[serde(default = "TimingConfig::default_idle_gap_bits")]
    pub idle_gap_bits: u32,

    /// Extra frame periods of slack in every derived budget.
    #[serde(default = "TimingConfig::default_slack_frames")]
    pub slack_frames: u32,

    /// Cycles reset is held active (at least 2).
    #[serde(default = "TimingConfig::default_reset_cycles")]
    pub reset_cycles: u32,
}

impl TimingConfig {
    fn default_baud_interval() -> u32 {
        defaults::BAUD_INTERVAL
    }

    fn default_idle_gap_bits() -> u32 {
        defaults::IDLE_GAP_BITS
    }

    fn default_slack_frames() -> u32 {
        defaults::SLACK_FRAMES
    }

    fn default_reset_cycles() -> u32 {
        defaults::RESET_CYCLES
    }

    /// Ticks one frame occupies on the line, including its idle gap.
    pub fn frame_ticks(&self) -> u64 {
        (FRAME_BITS as u64 + u64::from(self.idle_gap_bits)) * u64::from(self.baud_interval)
    }

    /// Tick budget for transmitting `frames` frames and receiving their echo.
    ///
    /// `(frames * (10 + gap) + slack * 10) * baud`
    pub fn budget_for_frames(&self, frames: usize) -> u64 {
        let slack = u64::from(self.slack_frames) * FRAME_BITS as u64 * u64::from(self.baud_interval);
        frames as u64 * self.frame_ticks() + slack
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            baud_interval: defaults::BAUD_INTERVAL,
            idle_gap_bits: defaults::IDLE_GAP_BITS,
            slack_frames: defaults::SLACK_FRAMES,
            reset_cycles: defaults::RESET_CYCLES,
        }
    }
}

/// Parameters of FIFO-backed devices.
#[derive(Debug, Clone, Deserialize)]
pub struct FifoConfig {
    /// FIFO depth; pointers wrap modulo this value.
    #[serde(default = "FifoConfig::default_depth")]
    pub depth: usize,
}

impl FifoConfig {
    fn default_depth() -> usize {
        defaults::FIFO_DEPTH
    }
}

impl Default for FifoConfig {
    fn default() -> Self {
        Self {
            depth: defaults::FIFO_DEPTH,
        }
    }
}

/// Parameters of the serial-loaded CPU device.
#[derive(Debug, Clone, Deserialize)]
pub struct CpuConfig {
    /// Program memory size in 32-bit words.
    #[serde(default = "CpuConfig::default_program_words")]
    pub program_words: usize,

    /// Data RAM size in 32-bit words.
    #[serde(default = "CpuConfig::default_data_words")]
    pub data_words: usize,

    /// Cycles of unattended execution after the load phase.
    #[serde(default = "CpuConfig::default_run_cycles")]
    pub run_cycles: u64,

    /// Frame periods to wait for a reply byte.
    #[serde(default = "CpuConfig::default_reply_frames")]
    pub reply_frames: u32,
}

impl CpuConfig {
    fn default_program_words() -> usize {
        defaults::PROGRAM_WORDS
    }

    fn default_data_words() -> usize {
        defaults::DATA_WORDS
    }

    fn default_run_cycles() -> u64 {
        defaults::RUN_CYCLES
    }

    fn default_reply_frames() -> u32 {
        defaults::REPLY_FRAMES
    }
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            program_words: defaults::PROGRAM_WORDS,
            data_words: defaults::DATA_WORDS,
            run_cycles: defaults::RUN_CYCLES,
            reply_frames: defaults::REPLY_FRAMES,
        }
    }
}
