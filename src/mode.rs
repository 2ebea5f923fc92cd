//! Tracked operating mode per channel.
//!
//! The chip keeps the true mode of every channel in its own registers and
//! offers no cheap read-back, so the driver maintains a mirror of the last
//! mode it wrote. Property writes (intensity, PWM, band) are accepted by the
//! hardware in any mode; the tracked mode exists so callers can detect a
//! mismatch, not so the driver can refuse the write.

use crate::registers::Channel;
use crate::Error;

/// Operating mode of a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelMode {
    /// PWM and current source mode; this is what grouped color control uses.
    PwmCurrentSource,
    /// Driven by the autonomous pattern engine. Not available on White.
    Pattern,
    /// Plain current source mode.
    CurrentSource,
}

impl ChannelMode {
    /// Field code of this mode for `channel`.
    ///
    /// # Returns
    /// * `Err(Error::InvalidEnum)` for `Pattern` on White, which has no
    ///   pattern source
    pub(crate) fn code(self, channel: Channel) -> Result<u8, Error> {
        match (self, channel) {
            (ChannelMode::PwmCurrentSource, _) => Ok(0b00),
            (ChannelMode::Pattern, Channel::White) => Err(Error::InvalidEnum),
            (ChannelMode::Pattern, _) => Ok(0b01),
            (ChannelMode::CurrentSource, Channel::White) => Ok(0b1),
            (ChannelMode::CurrentSource, _) => Ok(0b11),
        }
    }
}

/// Last mode written to each channel, `None` until the first explicit mode
/// write (the power-on state is treated as unknown).
///
/// A group-level mode write overwrites the tracked mode of every channel it
/// covers, discarding prior per-channel divergence; a subsequent
/// channel-level write diverges that one channel again. There is no undo —
/// returning to the group mode means re-issuing the group operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeState {
    tracked: [Option<ChannelMode>; 4],
}

impl ModeState {
    pub fn tracked(&self, channel: Channel) -> Option<ChannelMode> {
        self.tracked[channel.index()]
    }

    pub(crate) fn note(&mut self, channels: &[Channel], mode: ChannelMode) {
        for channel in channels {
            self.tracked[channel.index()] = Some(mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_unknown() {
        let state = ModeState::default();
        for channel in Channel::ALL {
            assert_eq!(state.tracked(channel), None);
        }
    }

    #[test]
    fn group_write_overwrites_individual_divergence() {
        let mut state = ModeState::default();
        state.note(&[Channel::Green], ChannelMode::Pattern);
        state.note(&Channel::ALL, ChannelMode::PwmCurrentSource);
        for channel in Channel::ALL {
            assert_eq!(state.tracked(channel), Some(ChannelMode::PwmCurrentSource));
        }
    }

    #[test]
    fn individual_write_diverges_one_channel() {
        let mut state = ModeState::default();
        state.note(&Channel::ALL, ChannelMode::PwmCurrentSource);
        state.note(&[Channel::Green], ChannelMode::Pattern);
        assert_eq!(state.tracked(Channel::Green), Some(ChannelMode::Pattern));
        for channel in [Channel::Red, Channel::Blue, Channel::White] {
            assert_eq!(state.tracked(channel), Some(ChannelMode::PwmCurrentSource));
        }
    }

    #[test]
    fn pattern_mode_has_no_code_on_white() {
        assert_eq!(
            ChannelMode::Pattern.code(Channel::White),
            Err(Error::InvalidEnum)
        );
        assert_eq!(ChannelMode::Pattern.code(Channel::Blue), Ok(0b01));
        assert_eq!(ChannelMode::CurrentSource.code(Channel::White), Ok(0b1));
        assert_eq!(ChannelMode::CurrentSource.code(Channel::Red), Ok(0b11));
    }
}
