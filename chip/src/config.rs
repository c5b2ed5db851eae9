//! Runtime configuration of the interpreter.
use std::{convert::TryFrom, time::Duration};

use crate::{
    definitions::{cpu, timer},
    ConfigError,
};

/// Behaviours the historical CHIP-8 hosts disagree on.
///
/// The default is the modern interpretation with every quirk disabled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// `8XY1`, `8XY2` and `8XY3` reset `VF` to `0`.
    pub logic_resets_flag: bool,
    /// `8XY6` and `8XYE` copy `VY` into `VX` before shifting.
    pub shift_uses_vy: bool,
    /// `FX55` and `FX65` leave `I` at `I + X + 1`.
    pub memory_increments_index: bool,
    /// `FX55` and `FX65` leave `I` at `I + X`.
    /// Ignored while [`memory_increments_index`](Quirks::memory_increments_index) is set.
    pub memory_increments_index_by_x: bool,
}

impl Quirks {
    /// All quirks disabled.
    pub const fn modern() -> Self {
        Self {
            logic_resets_flag: false,
            shift_uses_vy: false,
            memory_increments_index: false,
            memory_increments_index_by_x: false,
        }
    }

    /// The behaviour of the original COSMAC VIP interpreter.
    pub const fn cosmac_vip() -> Self {
        Self {
            logic_resets_flag: true,
            shift_uses_vy: true,
            memory_increments_index: true,
            memory_increments_index_by_x: false,
        }
    }

    /// The behaviour of the CHIP-48 interpreter.
    pub const fn chip48() -> Self {
        Self {
            memory_increments_index_by_x: true,
            ..Self::modern()
        }
    }

    /// The amount `I` moves after storing or loading `V0` to `VX`.
    pub(crate) fn index_advance(&self, x: usize) -> u16 {
        if self.memory_increments_index {
            x as u16 + 1
        } else if self.memory_increments_index_by_x {
            x as u16
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// The amount of instructions executed per second
    pub cycles_per_second: u32,
    /// The amount of frames per second, the timers count down once per frame
    pub frames_per_second: u32,
    pub quirks: Quirks,
    /// Seed for the random number generator used by `CXNN`,
    /// if none is given the generator is seeded from the os.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycles_per_second: cpu::HERTZ,
            frames_per_second: timer::HERTZ,
            quirks: Quirks::default(),
            seed: None,
        }
    }
}

impl Config {
    /// Checks that the timing can actually be driven.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycles_per_second == 0 {
            return Err(ConfigError::ZeroCycles);
        }
        if self.frames_per_second == 0 {
            return Err(ConfigError::ZeroFrames);
        }
        Ok(())
    }

    /// The amount of instructions run in a single frame, rounded to the
    /// nearest integer but at least one.
    ///
    /// # Example
    /// ```rust
    /// # use chip::config::Config;
    /// let config = Config::default();
    /// assert_eq!(config.cycles_per_frame(), 8);
    /// ```
    pub fn cycles_per_frame(&self) -> u32 {
        let fps = u64::from(self.frames_per_second.max(1));
        let cycles = (u64::from(self.cycles_per_second) + fps / 2) / fps;
        u32::try_from(cycles).unwrap_or(u32::MAX).max(1)
    }

    /// The wall clock time a single frame takes.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.frames_per_second.max(1)
    }
}
