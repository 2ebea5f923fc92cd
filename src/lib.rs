//! Driver for the Lumissil IS31FL3197 four-channel RGBW LED controller.
//!
//! The IS31FL3197 drives four LEDs (red, green, blue and white) over a
//! two-wire register bus and can play back configured blink/fade patterns
//! autonomously, without further host intervention. This driver exposes the
//! chip through three coexisting interfaces over the same register file:
//!
//! - **Channel** (`led_*` methods): direct control of a single LED —
//!   on/off, intensity, PWM duty, current band, dimming.
//! - **Color** (`color*` methods): grouped control of all channels with one
//!   call.
//! - **Pattern** (`pattern_*` methods): configuration, start/stop and
//!   monitoring of the autonomous pattern engine, with humanized parameters
//!   (seconds, named gamma curves, loop counts with an "endless" sentinel).
//!
//! The chip allows every channel to be in a different operating mode at any
//! time. Grouped operations (`color`, `pattern_start`, `set_group_mode`)
//! preset the mode for all affected channels at once, overwriting individual
//! settings; afterwards single channels can be diverged again with the
//! channel interface. The driver tracks the last written mode per channel
//! (see [`ModeState`]) so callers can detect mismatched property writes —
//! the registers themselves accept writes in any mode.
//!
//! Blocking and async bus access are both supported through the
//! [`Blocking`]/[`Async`] marker types:
//!
//! ```ignore
//! let mut chip = IS31FL3197::new_blocking(i2c, 0x50);
//! chip.initialize()?;
//! chip.color(255, 0, 0)?;
//! chip.pattern_config(&PatternConfig {
//!     rise_time: 1.04,
//!     fall_time: 1.04,
//!     color_1: Some(Rgb::new(255, 0, 0)),
//!     pattern_loops: Repeat::Endless,
//!     activate: true,
//!     ..PatternConfig::default()
//! })?;
//! ```
//!
//! Shutdown control sequencing and charge pump configuration are not
//! implemented; their registers are rejected on the raw register path.

#![no_std]

use embedded_hal::i2c::ErrorKind;

pub mod mode;
pub mod pattern;
pub mod registers;
pub mod values;

mod is31fl3197;
mod state;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::is31fl3197::{
    Async, AsyncPatternMonitor, Blocking, Mode, PatternMonitor, IS31FL3197,
};
pub use crate::mode::{ChannelMode, ModeState};
pub use crate::pattern::{PatternConfig, PatternStatus, Rgb};
pub use crate::registers::Channel;
pub use crate::values::{Gamma, HoldTimeSelect, Repeat};

/// Driver error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A human-unit input falls outside its documented domain. Raised before
    /// any register write.
    ValueOutOfRange,
    /// An enumerated parameter is not one of the recognized options.
    InvalidEnum,
    /// Access to a register that is reserved or out of the supported map.
    UnknownField,
    /// Opaque failure from the underlying bus, surfaced unchanged and never
    /// retried.
    Transport(ErrorKind),
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(kind) => *kind,
            _ => ErrorKind::Other,
        }
    }
}
