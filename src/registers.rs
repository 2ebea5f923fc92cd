//! Register map of the IS31FL3197.
//!
//! Addresses and field layouts are datasheet facts. The shutdown control
//! register (0x01) and the charge pump registers (0x03, 0x04) are not part
//! of the supported map; [`ensure_supported`] rejects them on the raw
//! register path.

use crate::Error;

pub const MODE_REGISTER: u8 = 0x02;
pub const CURRENT_BAND_REGISTER: u8 = 0x05;
pub const PATTERN_CONTROL_REGISTER: u8 = 0x06;
pub const PATTERN_STATE_REGISTER: u8 = 0x0f;
pub const INTENSITY_REGISTER_BASE: u8 = 0x10;
pub const PWM_REGISTER_BASE: u8 = 0x1a;
pub const TS_T1_REGISTER: u8 = 0x22;
pub const T2_T3_REGISTER: u8 = 0x23;
pub const T4_TP_REGISTER: u8 = 0x24;
pub const CROSSFADE_ENABLE_REGISTER: u8 = 0x25;
pub const CROSSFADE_TIME_REGISTER: u8 = 0x26;
pub const COLOR_ENABLE_REGISTER: u8 = 0x27;
pub const COLOR_CYCLES_REGISTER: u8 = 0x28;
pub const GAMMA_MULTI_PULSE_REGISTER: u8 = 0x29;
pub const PATTERN_LOOP_REGISTER: u8 = 0x2a;
pub const COLOR_UPDATE_REGISTER: u8 = 0x2b;
pub const PWM_UPDATE_REGISTER: u8 = 0x2c;
pub const PATTERN_TIME_UPDATE_REGISTER: u8 = 0x2d;
pub const RESET_REGISTER: u8 = 0x3f;

/// Magic value that triggers the update and reset registers.
pub const UPDATE_KEY: u8 = 0xc5;

/// Shutdown control register; written once during `initialize()` (all
/// outputs enabled, sleep disabled, normal operation), otherwise reserved.
pub(crate) const SHUTDOWN_CONTROL_REGISTER: u8 = 0x01;
pub(crate) const OUTPUT_ENABLE_VALUE: u8 = 0xf1;

const CHARGE_PUMP_REGISTER_A: u8 = 0x03;
const CHARGE_PUMP_REGISTER_B: u8 = 0x04;

/// Registers outside the scope of this driver.
pub const RESERVED_REGISTERS: [u8; 3] = [
    SHUTDOWN_CONTROL_REGISTER,
    CHARGE_PUMP_REGISTER_A,
    CHARGE_PUMP_REGISTER_B,
];

/// Checks that `register` may be accessed through the raw register path.
///
/// # Returns
/// * `Err(Error::UnknownField)` for reserved registers and addresses past
///   the end of the map
pub fn ensure_supported(register: u8) -> Result<(), Error> {
    if register > RESET_REGISTER {
        return Err(Error::UnknownField);
    }
    if RESERVED_REGISTERS.contains(&register) {
        return Err(Error::UnknownField);
    }
    Ok(())
}

/// One of the four LED outputs the chip drives independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Red,
    Green,
    Blue,
    White,
}

impl Channel {
    pub const ALL: [Channel; 4] =
        [Channel::Red, Channel::Green, Channel::Blue, Channel::White];

    /// The three channels grouped operations act on. White is not populated
    /// on common boards (e.g. the Arduino Giga display shield) and has no
    /// pattern source.
    pub const RGB: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    pub const fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
            Channel::White => 3,
        }
    }
}

/// A bit field inside one register.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    pub register: u8,
    pub offset: u8,
    pub width: u8,
}

impl Field {
    pub const fn mask(self) -> u8 {
        ((1u16 << self.width) - 1) as u8
    }

    /// Returns `byte` with this field replaced by `code`, all sibling bits
    /// preserved. A code wider than the field is a programming error.
    pub fn insert(self, byte: u8, code: u8) -> u8 {
        debug_assert!(code <= self.mask());
        (byte & !(self.mask() << self.offset)) | ((code & self.mask()) << self.offset)
    }

    pub fn extract(self, byte: u8) -> u8 {
        (byte >> self.offset) & self.mask()
    }
}

/// Operating mode field of `channel` in the mode register. White only has a
/// one bit field (no pattern source).
pub const fn mode_field(channel: Channel) -> Field {
    match channel {
        Channel::White => Field {
            register: MODE_REGISTER,
            offset: 6,
            width: 1,
        },
        ch => Field {
            register: MODE_REGISTER,
            offset: 2 * ch.index() as u8,
            width: 2,
        },
    }
}

/// Current band (CLB) field of `channel`.
pub const fn current_band_field(channel: Channel) -> Field {
    Field {
        register: CURRENT_BAND_REGISTER,
        offset: 2 * channel.index() as u8,
        width: 2,
    }
}

/// Hold time selection (T4/T2) bit.
pub const HOLD_TIME_SELECT_FIELD: Field = Field {
    register: PATTERN_CONTROL_REGISTER,
    offset: 0,
    width: 1,
};

/// Hold time function bit.
pub const HOLD_TIME_FUNCTION_FIELD: Field = Field {
    register: PATTERN_CONTROL_REGISTER,
    offset: 1,
    width: 1,
};

pub const fn intensity_register(channel: Channel) -> u8 {
    INTENSITY_REGISTER_BASE + channel.index() as u8
}

/// PWM duty registers of `channel` as `(low byte, high nibble)`.
pub const fn pwm_registers(channel: Channel) -> (u8, u8) {
    let base = PWM_REGISTER_BASE + 2 * channel.index() as u8;
    (base, base + 1)
}

/// First of the three registers of pattern color slot `slot` (0-based).
/// Slot 0 shares the channel intensity registers; slot 1 starts one byte
/// later than expected to leave room for the white intensity register.
pub const fn color_table_base(slot: usize) -> u8 {
    const OFFSETS: [u8; 3] = [0, 4, 7];
    INTENSITY_REGISTER_BASE + OFFSETS[slot]
}
