use crate::mode::ModeState;

/// Mirror of the last written register state.
///
/// The packed registers (mode, current band, pattern control) are updated
/// as "mirrored byte, field replaced, rest preserved", so sibling fields
/// are never clobbered and no bus read-back is needed. Intensity and PWM
/// mirrors back the dim operation and keep monitoring cheap.
pub struct State {
    pub mode_register: u8,
    pub current_band_register: u8,
    pub pattern_control_register: u8,
    pub intensity: [u8; 4],
    pub pwm: [u16; 4],
    pub modes: ModeState,
}

impl Default for State {
    // This reflects the presumed register contents after a reset
    fn default() -> Self {
        Self {
            mode_register: 0,
            current_band_register: 0,
            pattern_control_register: 0,
            intensity: [0; 4],
            pwm: [0; 4],
            modes: ModeState::default(),
        }
    }
}
