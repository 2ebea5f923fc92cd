//! Pattern engine configuration and status.

use crate::registers;
use crate::values::{self, Gamma, HoldTimeSelect, Repeat, RepeatField};
use crate::Error;

/// A color entry for one of the three pattern color slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Complete configuration of the autonomous pattern engine.
///
/// Times are in seconds (0.0..=10.0) and are quantized to the hardware time
/// table; repeat counts take [`Repeat::Endless`] to run indefinitely.
/// `pattern_loops` is the base count (1..=64); with `times16` set the chip
/// multiplies it by 16, for at most 1024 effective loops.
///
/// The whole object is validated before any register is written: an invalid
/// field leaves the chip untouched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatternConfig {
    pub start_time: f32,
    pub rise_time: f32,
    pub hold_time: f32,
    pub fall_time: f32,
    pub between_time: f32,
    pub off_time: f32,
    pub crossfade_time: f32,
    /// Crossfade between the enabled color slots instead of stepping.
    pub crossfade: bool,
    pub gamma: Gamma,
    pub cycles_1: Repeat,
    pub cycles_2: Repeat,
    pub cycles_3: Repeat,
    pub multi_pulse_loops: Repeat,
    pub pattern_loops: Repeat,
    /// Multiply `pattern_loops` by 16 in hardware.
    pub times16: bool,
    pub hold_time_selection: HoldTimeSelect,
    pub hold_time_function: bool,
    pub color_1: Option<Rgb>,
    pub color_2: Option<Rgb>,
    pub color_3: Option<Rgb>,
    /// Start the pattern in the same call once configuration is written.
    pub activate: bool,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            rise_time: 0.0,
            hold_time: 0.0,
            fall_time: 0.0,
            between_time: 0.0,
            off_time: 0.0,
            crossfade_time: 0.0,
            crossfade: false,
            gamma: Gamma::Gamma2p4,
            cycles_1: Repeat::Times(1),
            cycles_2: Repeat::Times(1),
            cycles_3: Repeat::Times(1),
            multi_pulse_loops: Repeat::Times(1),
            pattern_loops: Repeat::Times(1),
            times16: false,
            hold_time_selection: HoldTimeSelect::T4,
            hold_time_function: false,
            color_1: None,
            color_2: None,
            color_3: None,
            activate: false,
        }
    }
}

/// Register image of a validated [`PatternConfig`].
pub(crate) struct EncodedPattern {
    /// Pattern engine registers in write (address) order.
    pub writes: [(u8, u8); 9],
    pub hold_time_select: u8,
    pub hold_time_function: u8,
    pub colors: [Option<Rgb>; 3],
    pub activate: bool,
}

impl PatternConfig {
    /// Validates every field and derives the full register image. Nothing
    /// here touches the bus.
    pub(crate) fn encode(&self) -> Result<EncodedPattern, Error> {
        let ts = values::encode_time(self.start_time)?;
        let t1 = values::encode_time(self.rise_time)?;
        let t2 = values::encode_time(self.hold_time)?;
        let t3 = values::encode_time(self.fall_time)?;
        let t4 = values::encode_time(self.off_time)?;
        let tp = values::encode_time(self.between_time)?;
        let tc = values::encode_time(self.crossfade_time)?;

        let colors = [self.color_1, self.color_2, self.color_3];
        let enable_bits = |selected: [bool; 3]| -> u8 {
            (selected[2] as u8) << 2 | (selected[1] as u8) << 1 | selected[0] as u8
        };
        let crossfade_enable = enable_bits([
            self.crossfade && colors[0].is_some(),
            self.crossfade && colors[1].is_some(),
            self.crossfade && colors[2].is_some(),
        ]);
        let color_enable = enable_bits([
            colors[0].is_some(),
            colors[1].is_some(),
            colors[2].is_some(),
        ]);

        let cct1 = values::encode_repeat(RepeatField::Cycles1, self.cycles_1)?;
        let cct2 = values::encode_repeat(RepeatField::Cycles2, self.cycles_2)?;
        let cct3 = values::encode_repeat(RepeatField::Cycles3, self.cycles_3)?;
        let mtplt =
            values::encode_repeat(RepeatField::MultiPulseLoops, self.multi_pulse_loops)?;
        let plt = values::encode_repeat(RepeatField::PatternLoops, self.pattern_loops)?;

        let writes = [
            (registers::TS_T1_REGISTER, (t1 << 4) | ts),
            (registers::T2_T3_REGISTER, (t3 << 4) | t2),
            (registers::T4_TP_REGISTER, (tp << 4) | t4),
            (registers::CROSSFADE_ENABLE_REGISTER, crossfade_enable),
            (registers::CROSSFADE_TIME_REGISTER, tc),
            (registers::COLOR_ENABLE_REGISTER, color_enable),
            (
                registers::COLOR_CYCLES_REGISTER,
                (cct3 << 4) | (cct2 << 2) | cct1,
            ),
            (
                registers::GAMMA_MULTI_PULSE_REGISTER,
                (mtplt << 4) | (self.gamma.code() << 2),
            ),
            (
                registers::PATTERN_LOOP_REGISTER,
                ((self.times16 as u8) << 7) | plt,
            ),
        ];

        Ok(EncodedPattern {
            writes,
            hold_time_select: self.hold_time_selection.code(),
            hold_time_function: self.hold_time_function as u8,
            colors,
            activate: self.activate,
        })
    }
}

/// One observation of the pattern engine's state register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatternStatus {
    raw: u8,
}

impl PatternStatus {
    pub const fn from_raw(raw: u8) -> Self {
        Self { raw }
    }

    pub const fn raw(self) -> u8 {
        self.raw
    }

    /// Color slot (1..=3) the engine is currently playing, if any.
    pub const fn active_color(self) -> Option<u8> {
        if self.raw & 0b0100_0000 != 0 {
            Some(3)
        } else if self.raw & 0b0010_0000 != 0 {
            Some(2)
        } else if self.raw & 0b0001_0000 != 0 {
            Some(1)
        } else {
            None
        }
    }

    /// Timing phase (TS) the engine is in, 0..=7.
    pub const fn phase(self) -> u8 {
        self.raw & 0b111
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_encodes_reference_bytes() {
        let encoded = PatternConfig::default().encode().unwrap();
        assert_eq!(
            encoded.writes,
            [
                (0x22, 0x00),
                (0x23, 0x00),
                (0x24, 0x00),
                (0x25, 0x00),
                (0x26, 0x00),
                (0x27, 0x00),
                (0x28, 0b01_01_01),
                (0x29, 0b0001_00_00),
                (0x2a, 0x01),
            ]
        );
        assert_eq!(encoded.hold_time_select, 0);
        assert_eq!(encoded.hold_time_function, 0);
        assert!(!encoded.activate);
    }

    #[test]
    fn time_fields_pack_into_shared_bytes() {
        let config = PatternConfig {
            start_time: 0.13,
            rise_time: 1.04,
            hold_time: 0.26,
            fall_time: 2.1,
            off_time: 0.51,
            between_time: 8.3,
            crossfade_time: 0.77,
            ..PatternConfig::default()
        };
        let encoded = config.encode().unwrap();
        assert_eq!(encoded.writes[0], (0x22, 0x61)); // T1 << 4 | TS
        assert_eq!(encoded.writes[1], (0x23, 0x82)); // T3 << 4 | T2
        assert_eq!(encoded.writes[2], (0x24, 0xf4)); // TP << 4 | T4
        assert_eq!(encoded.writes[4], (0x26, 0x05));
    }

    #[test]
    fn crossfade_applies_only_to_populated_slots() {
        let config = PatternConfig {
            crossfade: true,
            color_1: Some(Rgb::new(255, 0, 0)),
            color_3: Some(Rgb::new(0, 0, 255)),
            ..PatternConfig::default()
        };
        let encoded = config.encode().unwrap();
        assert_eq!(encoded.writes[3], (0x25, 0b101));
        assert_eq!(encoded.writes[5], (0x27, 0b101));
    }

    #[test]
    fn endless_counts_encode_to_zero_everywhere() {
        let config = PatternConfig {
            cycles_1: Repeat::Endless,
            cycles_2: Repeat::Endless,
            cycles_3: Repeat::Endless,
            multi_pulse_loops: Repeat::Endless,
            pattern_loops: Repeat::Endless,
            ..PatternConfig::default()
        };
        let encoded = config.encode().unwrap();
        assert_eq!(encoded.writes[6], (0x28, 0x00));
        assert_eq!(encoded.writes[7], (0x29, 0x00));
        assert_eq!(encoded.writes[8], (0x2a, 0x00));
    }

    #[test]
    fn times16_sets_the_high_flag_independently() {
        let config = PatternConfig {
            pattern_loops: Repeat::Times(64),
            times16: true,
            ..PatternConfig::default()
        };
        let encoded = config.encode().unwrap();
        assert_eq!(encoded.writes[8], (0x2a, 0b1100_0000));
    }

    #[test]
    fn oversized_loop_counts_are_rejected() {
        let config = PatternConfig {
            pattern_loops: Repeat::Times(2048),
            ..PatternConfig::default()
        };
        assert_eq!(config.encode().err(), Some(Error::ValueOutOfRange));

        let config = PatternConfig {
            multi_pulse_loops: Repeat::Times(16),
            ..PatternConfig::default()
        };
        assert_eq!(config.encode().err(), Some(Error::ValueOutOfRange));
    }

    #[test]
    fn status_decoding() {
        let status = PatternStatus::from_raw(0b0001_0010);
        assert_eq!(status.active_color(), Some(1));
        assert_eq!(status.phase(), 2);

        let status = PatternStatus::from_raw(0b0100_0101);
        assert_eq!(status.active_color(), Some(3));
        assert_eq!(status.phase(), 5);

        assert_eq!(PatternStatus::from_raw(0).active_color(), None);
    }
}
