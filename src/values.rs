//! Encoders between human units and register field codes.
//!
//! Every encoder validates its input before producing a code, so callers
//! can stage a complete set of field codes before touching the bus.

use crate::Error;

/// Hardware supported pattern durations in milliseconds, indexed by field
/// code 0x0..=0xF. Datasheet values.
pub(crate) const TIME_TABLE_MS: [u16; 16] = [
    30, 130, 260, 380, 510, 770, 1040, 1600, 2100, 2600, 3100, 4200, 5200,
    6200, 7300, 8300,
];

/// Longest accepted time input in seconds.
pub const MAX_TIME_S: f32 = 10.0;

/// Quantizes a duration in seconds to the nearest entry of the hardware
/// time table.
///
/// Exact table entries map to their own code; anything in between maps to
/// the nearer neighbour, with ties resolved toward the lower entry.
///
/// # Returns
/// * `Err(Error::ValueOutOfRange)` if `seconds` is outside `0.0..=10.0`
pub fn encode_time(seconds: f32) -> Result<u8, Error> {
    if !(0.0..=MAX_TIME_S).contains(&seconds) {
        return Err(Error::ValueOutOfRange);
    }
    let ms = (seconds * 1000.0 + 0.5) as i32;

    let mut best = 0usize;
    for (code, &entry) in TIME_TABLE_MS.iter().enumerate() {
        let distance = (ms - entry as i32).unsigned_abs();
        let best_distance = (ms - TIME_TABLE_MS[best] as i32).unsigned_abs();
        if distance < best_distance {
            best = code;
        }
    }
    Ok(best as u8)
}

/// Duration in seconds a time field code stands for.
pub fn decode_time(code: u8) -> f32 {
    TIME_TABLE_MS[(code & 0x0f) as usize] as f32 / 1000.0
}

/// Splits a 12-bit PWM duty cycle into `(low byte, high nibble)`.
pub fn encode_pwm(duty_cycle: u16) -> Result<(u8, u8), Error> {
    if duty_cycle > 4095 {
        return Err(Error::ValueOutOfRange);
    }
    Ok(((duty_cycle & 0xff) as u8, (duty_cycle >> 8) as u8))
}

pub fn decode_pwm(low: u8, high: u8) -> u16 {
    ((high as u16 & 0x0f) << 8) | low as u16
}

/// Maps a current limit band (1..=4, i.e. 25% to 100%) to its 2-bit code.
pub fn encode_current_band(band: u8) -> Result<u8, Error> {
    if (1..=4).contains(&band) {
        Ok(band - 1)
    } else {
        Err(Error::ValueOutOfRange)
    }
}

pub fn decode_current_band(code: u8) -> u8 {
    (code & 0b11) + 1
}

/// Scales `intensity` by `percent` (0..=100). The boundaries are exact:
/// 0% always yields 0, 100% always yields `intensity` unchanged.
pub fn scale_intensity(intensity: u8, percent: u8) -> Result<u8, Error> {
    if percent > 100 {
        return Err(Error::ValueOutOfRange);
    }
    Ok((intensity as u16 * percent as u16 / 100) as u8)
}

/// Gamma correction curve applied by the pattern engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gamma {
    Gamma2p4,
    Gamma3p5,
    Linear,
}

impl Gamma {
    pub const fn code(self) -> u8 {
        match self {
            Gamma::Gamma2p4 => 0b00,
            Gamma::Gamma3p5 => 0b01,
            Gamma::Linear => 0b11,
        }
    }
}

impl TryFrom<&str> for Gamma {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self, Error> {
        match name {
            "2.4" => Ok(Gamma::Gamma2p4),
            "3.5" => Ok(Gamma::Gamma3p5),
            "linear" => Ok(Gamma::Linear),
            _ => Err(Error::InvalidEnum),
        }
    }
}

/// Pattern phase whose hold time applies when the hold time function is
/// active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldTimeSelect {
    T4,
    T2,
}

impl HoldTimeSelect {
    pub const fn code(self) -> u8 {
        match self {
            HoldTimeSelect::T4 => 0b0,
            HoldTimeSelect::T2 => 0b1,
        }
    }
}

impl TryFrom<&str> for HoldTimeSelect {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self, Error> {
        match name {
            "T4" => Ok(HoldTimeSelect::T4),
            "T2" => Ok(HoldTimeSelect::T2),
            _ => Err(Error::InvalidEnum),
        }
    }
}

/// Repeat count for the pattern engine's cycle and loop fields.
///
/// `Endless` means "repeat indefinitely" and encodes to hardware code 0 in
/// every repeat field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Repeat {
    Times(u16),
    Endless,
}

/// The five register fields that hold a repeat count. Each has its own
/// upper bound; the endless sentinel is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RepeatField {
    Cycles1,
    Cycles2,
    Cycles3,
    MultiPulseLoops,
    PatternLoops,
}

impl RepeatField {
    const fn max(self) -> u16 {
        match self {
            RepeatField::Cycles1 | RepeatField::Cycles2 | RepeatField::Cycles3 => 3,
            RepeatField::MultiPulseLoops => 15,
            RepeatField::PatternLoops => 64,
        }
    }
}

/// Encodes a repeat count for `field`. One shared mapping for all five
/// fields keeps the endless sentinel consistent.
pub fn encode_repeat(field: RepeatField, value: Repeat) -> Result<u8, Error> {
    match value {
        Repeat::Endless => Ok(0),
        Repeat::Times(n) if n >= 1 && n <= field.max() => Ok(n as u8),
        Repeat::Times(_) => Err(Error::ValueOutOfRange),
    }
}
