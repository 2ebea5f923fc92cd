use crate::mode::{ChannelMode, ModeState};
use crate::pattern::{EncodedPattern, PatternConfig, PatternStatus, Rgb};
use crate::registers::{self, Channel};
use crate::state::State;
use crate::values;
use crate::Error;

pub trait Mode {}

#[derive(Debug)]
pub struct Async;
#[derive(Debug)]
pub struct Blocking;

impl Mode for Async {}
impl Mode for Blocking {}

/// Interval between status reads inside `monitor`.
const MONITOR_POLL_INTERVAL_MS: u32 = 100;
const MONITOR_POLLS_PER_SECOND: u32 = 1000 / MONITOR_POLL_INTERVAL_MS;

pub struct IS31FL3197<BUS, M: Mode> {
    bus: BUS,
    address: u8,
    state: State,
    _phantom: core::marker::PhantomData<M>,
}

// General implementation
impl<BUS, M: Mode> IS31FL3197<BUS, M> {
    /// Create a new IS31FL3197 driver
    /// # Arguments
    /// * `bus` - The I2C bus to use
    /// * `address` - The I2C address of the device (80 decimal on the
    ///   Arduino Giga display shield)
    pub fn new(bus: BUS, address: u8) -> Self {
        Self {
            bus,
            address,
            state: State::default(),
            _phantom: core::marker::PhantomData,
        }
    }

    pub fn into_inner(self) -> BUS {
        self.bus
    }

    pub fn inner(&self) -> &BUS {
        &self.bus
    }

    pub fn inner_mut(&mut self) -> &mut BUS {
        &mut self.bus
    }

    /// Last mode written to `channel`, `None` before the first mode write.
    pub fn tracked_mode(&self, channel: Channel) -> Option<ChannelMode> {
        self.state.modes.tracked(channel)
    }

    pub fn mode_state(&self) -> &ModeState {
        &self.state.modes
    }

    /// Last intensity written to `channel`; `led_dim` scales this value.
    pub fn tracked_intensity(&self, channel: Channel) -> u8 {
        self.state.intensity[channel.index()]
    }

    /// Last PWM duty cycle written to `channel`.
    pub fn tracked_pwm(&self, channel: Channel) -> u16 {
        self.state.pwm[channel.index()]
    }

    /// Staged mode register byte for `channels`, validated for every channel
    /// before anything is written.
    fn stage_mode(&self, channels: &[Channel], mode: ChannelMode) -> Result<u8, Error> {
        let mut byte = self.state.mode_register;
        for &channel in channels {
            byte = registers::mode_field(channel).insert(byte, mode.code(channel)?);
        }
        Ok(byte)
    }

    fn stage_current_band(&self, channels: &[Channel], band: u8) -> Result<u8, Error> {
        let code = values::encode_current_band(band)?;
        let mut byte = self.state.current_band_register;
        for &channel in channels {
            byte = registers::current_band_field(channel).insert(byte, code);
        }
        Ok(byte)
    }

    fn stage_pattern_control(&self, encoded: &EncodedPattern) -> u8 {
        let mut byte = self.state.pattern_control_register;
        byte = registers::HOLD_TIME_SELECT_FIELD.insert(byte, encoded.hold_time_select);
        byte = registers::HOLD_TIME_FUNCTION_FIELD.insert(byte, encoded.hold_time_function);
        byte
    }
}

impl<BUS: embedded_hal::i2c::I2c> IS31FL3197<BUS, Blocking> {
    pub fn new_blocking(bus: BUS, address: u8) -> Self {
        Self::new(bus, address)
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), Error> {
        self.bus
            .transaction(
                self.address,
                &mut [
                    embedded_hal::i2c::Operation::Write(&[register]),
                    embedded_hal::i2c::Operation::Write(&[value]),
                ],
            )
            .map_err(|e| Error::Transport(embedded_hal::i2c::Error::kind(&e)))
    }

    fn read(&mut self, register: u8) -> Result<u8, Error> {
        let mut data = [0];
        self.bus
            .transaction(
                self.address,
                &mut [
                    embedded_hal::i2c::Operation::Write(&[register]),
                    embedded_hal::i2c::Operation::Read(&mut data),
                ],
            )
            .map_err(|e| Error::Transport(embedded_hal::i2c::Error::kind(&e)))?;
        Ok(data[0])
    }

    /// Reset the chip and enable all outputs in normal operation. Also
    /// resets the mirrored state to the chip's power-on defaults.
    pub fn initialize(&mut self) -> Result<(), Error> {
        self.write(registers::RESET_REGISTER, registers::UPDATE_KEY)?;
        self.state = State::default();
        // enable all outputs, sleep disable, normal operation
        self.write(
            registers::SHUTDOWN_CONTROL_REGISTER,
            registers::OUTPUT_ENABLE_VALUE,
        )
    }

    /// Raw register write; reserved registers are rejected.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error> {
        registers::ensure_supported(register)?;
        self.write(register, value)
    }

    /// Raw register read; reserved registers are rejected.
    pub fn read_register(&mut self, register: u8) -> Result<u8, Error> {
        registers::ensure_supported(register)?;
        self.read(register)
    }

    fn apply_mode(&mut self, channels: &[Channel], mode: ChannelMode) -> Result<(), Error> {
        let byte = self.stage_mode(channels, mode)?;
        self.write(registers::MODE_REGISTER, byte)?;
        self.state.mode_register = byte;
        self.state.modes.note(channels, mode);
        Ok(())
    }

    fn apply_current_band(&mut self, channels: &[Channel], band: u8) -> Result<(), Error> {
        let byte = self.stage_current_band(channels, band)?;
        self.write(registers::CURRENT_BAND_REGISTER, byte)?;
        self.state.current_band_register = byte;
        Ok(())
    }

    /// Writes one intensity per channel, then latches with the color update
    /// strobe. Channel order in `channels` is the write order.
    fn apply_intensity(&mut self, channels: &[Channel], levels: &[u8]) -> Result<(), Error> {
        for (&channel, &level) in channels.iter().zip(levels) {
            self.write(registers::intensity_register(channel), level)?;
            self.state.intensity[channel.index()] = level;
        }
        self.write(registers::COLOR_UPDATE_REGISTER, registers::UPDATE_KEY)
    }

    fn apply_pwm(&mut self, channels: &[Channel], duty_cycle: u16) -> Result<(), Error> {
        let (low, high) = values::encode_pwm(duty_cycle)?;
        for &channel in channels {
            let (low_register, high_register) = registers::pwm_registers(channel);
            self.write(high_register, high)?;
            self.write(low_register, low)?;
            self.state.pwm[channel.index()] = duty_cycle;
        }
        self.write(registers::PWM_UPDATE_REGISTER, registers::UPDATE_KEY)
    }

    fn config_leds(
        &mut self,
        channels: &[Channel],
        levels: &[u8],
        duty_cycle: u16,
        band: u8,
    ) -> Result<(), Error> {
        self.apply_mode(channels, ChannelMode::PwmCurrentSource)?;
        self.apply_intensity(channels, levels)?;
        self.apply_pwm(channels, duty_cycle)?;
        self.apply_current_band(channels, band)
    }

    // ----- mode manager -----

    /// Set the operating mode for all channels at once, overwriting any
    /// per-channel divergence. `Pattern` covers R, G and B only; White has
    /// no pattern source and keeps its mode.
    pub fn set_group_mode(&mut self, mode: ChannelMode) -> Result<(), Error> {
        let channels: &[Channel] = match mode {
            ChannelMode::Pattern => &Channel::RGB,
            _ => &Channel::ALL,
        };
        self.apply_mode(channels, mode)
    }

    /// Set the operating mode of exactly one channel; the other channels
    /// keep their tracked mode.
    pub fn set_channel_mode(&mut self, channel: Channel, mode: ChannelMode) -> Result<(), Error> {
        self.apply_mode(&[channel], mode)
    }

    // ----- channel interface -----

    /// Intensity, PWM and current band to the max; mode to PWM/current
    /// source.
    pub fn led_on(&mut self, channel: Channel) -> Result<(), Error> {
        self.config_leds(&[channel], &[255], 4095, 4)
    }

    /// Intensity, PWM and current band to the min.
    pub fn led_off(&mut self, channel: Channel) -> Result<(), Error> {
        self.config_leds(&[channel], &[0], 0, 1)
    }

    /// Intensity 0..=255. Does not touch the channel's mode.
    pub fn led_intensity(&mut self, channel: Channel, intensity: u8) -> Result<(), Error> {
        self.apply_intensity(&[channel], &[intensity])
    }

    /// PWM duty cycle 0..=4095.
    pub fn led_pwm(&mut self, channel: Channel, duty_cycle: u16) -> Result<(), Error> {
        self.apply_pwm(&[channel], duty_cycle)
    }

    /// Current limit band 1..=4 (25% to 100%).
    pub fn led_clb(&mut self, channel: Channel, band: u8) -> Result<(), Error> {
        self.apply_current_band(&[channel], band)
    }

    /// Scale the channel's last written intensity by `percent` (0..=100).
    pub fn led_dim(&mut self, channel: Channel, percent: u8) -> Result<(), Error> {
        let scaled = values::scale_intensity(self.state.intensity[channel.index()], percent)?;
        self.apply_intensity(&[channel], &[scaled])
    }

    // ----- color interface -----

    /// Set all three color channels in one call, with PWM and current band
    /// to the max. Intensities are written in R, G, B order.
    pub fn color(&mut self, r: u8, g: u8, b: u8) -> Result<(), Error> {
        self.config_leds(&Channel::RGB, &[r, g, b], 4095, 4)
    }

    /// Like [`color`](Self::color), including the white channel.
    pub fn color_rgbw(&mut self, r: u8, g: u8, b: u8, w: u8) -> Result<(), Error> {
        self.config_leds(&Channel::ALL, &[r, g, b, w], 4095, 4)
    }

    /// Color to black, PWM and current band to the min.
    pub fn color_off(&mut self) -> Result<(), Error> {
        self.config_leds(&Channel::RGB, &[0, 0, 0], 0, 1)
    }

    /// PWM duty cycle 0..=4095 for all color channels.
    pub fn color_pwm(&mut self, duty_cycle: u16) -> Result<(), Error> {
        self.apply_pwm(&Channel::RGB, duty_cycle)
    }

    /// Current limit band 1..=4 for all color channels.
    pub fn color_clb(&mut self, band: u8) -> Result<(), Error> {
        self.apply_current_band(&Channel::RGB, band)
    }

    /// Scale the last written intensity of every color channel by `percent`
    /// (0..=100).
    pub fn color_dim(&mut self, percent: u8) -> Result<(), Error> {
        let levels = [
            values::scale_intensity(self.state.intensity[0], percent)?,
            values::scale_intensity(self.state.intensity[1], percent)?,
            values::scale_intensity(self.state.intensity[2], percent)?,
        ];
        self.apply_intensity(&Channel::RGB, &levels)
    }

    // ----- pattern interface -----

    /// Validate and write a complete pattern configuration.
    ///
    /// Validation happens before the first register write: an invalid field
    /// leaves the chip's prior configuration untouched. Once writes begin
    /// there is no rollback on a transport failure.
    pub fn pattern_config(&mut self, config: &PatternConfig) -> Result<(), Error> {
        let encoded = config.encode()?;

        for (register, value) in encoded.writes {
            self.write(register, value)?;
        }

        let control = self.stage_pattern_control(&encoded);
        self.write(registers::PATTERN_CONTROL_REGISTER, control)?;
        self.state.pattern_control_register = control;

        for (slot, color) in encoded.colors.iter().enumerate() {
            if let Some(color) = color {
                self.write_color_table(slot, *color)?;
            }
        }

        if encoded.activate {
            self.pattern_start()?;
        }
        Ok(())
    }

    fn write_color_table(&mut self, slot: usize, color: Rgb) -> Result<(), Error> {
        let base = registers::color_table_base(slot);
        self.write(base, color.r)?;
        self.write(base + 1, color.g)?;
        self.write(base + 2, color.b)?;
        if slot == 0 {
            // color slot 1 shares the channel intensity registers
            self.state.intensity[0] = color.r;
            self.state.intensity[1] = color.g;
            self.state.intensity[2] = color.b;
        }
        self.write(registers::COLOR_UPDATE_REGISTER, registers::UPDATE_KEY)
    }

    /// Switch R, G, B to pattern mode and latch the configured colors and
    /// times. Requires a prior [`pattern_config`](Self::pattern_config).
    pub fn pattern_start(&mut self) -> Result<(), Error> {
        self.apply_mode(&Channel::RGB, ChannelMode::Pattern)?;
        self.write(registers::COLOR_UPDATE_REGISTER, registers::UPDATE_KEY)?;
        self.write(registers::PATTERN_TIME_UPDATE_REGISTER, registers::UPDATE_KEY)
    }

    /// Abort a running pattern by switching R, G, B back to PWM/current
    /// source mode. With no other writes in between, the pattern can be
    /// restarted with [`pattern_start`](Self::pattern_start).
    pub fn pattern_stop(&mut self) -> Result<(), Error> {
        self.apply_mode(&Channel::RGB, ChannelMode::PwmCurrentSource)
    }

    /// Current limit band 1..=4 while in pattern mode.
    pub fn pattern_clb(&mut self, band: u8) -> Result<(), Error> {
        self.apply_current_band(&Channel::RGB, band)
    }

    /// One status register read, decoded.
    pub fn pattern_status(&mut self) -> Result<PatternStatus, Error> {
        Ok(PatternStatus::from_raw(
            self.read(registers::PATTERN_STATE_REGISTER)?,
        ))
    }

    /// Poll the pattern engine status for up to `seconds`, yielding one
    /// snapshot per poll. The sequence is finite and purely observational;
    /// `monitor(0)` yields nothing. A transport error is yielded once and
    /// ends the sequence.
    pub fn monitor<D: embedded_hal::delay::DelayNs>(
        &mut self,
        seconds: u32,
        delay: D,
    ) -> PatternMonitor<'_, BUS, D> {
        PatternMonitor {
            driver: self,
            delay,
            remaining: seconds.saturating_mul(MONITOR_POLLS_PER_SECOND),
        }
    }
}

/// Finite pull-based sequence of pattern status snapshots.
pub struct PatternMonitor<'a, BUS, D> {
    driver: &'a mut IS31FL3197<BUS, Blocking>,
    delay: D,
    remaining: u32,
}

impl<BUS, D> Iterator for PatternMonitor<'_, BUS, D>
where
    BUS: embedded_hal::i2c::I2c,
    D: embedded_hal::delay::DelayNs,
{
    type Item = Result<PatternStatus, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        match self.driver.pattern_status() {
            Ok(status) => {
                self.delay.delay_ms(MONITOR_POLL_INTERVAL_MS);
                Some(Ok(status))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }
}

impl<BUS: embedded_hal_async::i2c::I2c> IS31FL3197<BUS, Async> {
    pub fn new_async(bus: BUS, address: u8) -> Self {
        Self::new(bus, address)
    }

    async fn write(&mut self, register: u8, value: u8) -> Result<(), Error> {
        self.bus
            .transaction(
                self.address,
                &mut [
                    embedded_hal_async::i2c::Operation::Write(&[register]),
                    embedded_hal_async::i2c::Operation::Write(&[value]),
                ],
            )
            .await
            .map_err(|e| Error::Transport(embedded_hal::i2c::Error::kind(&e)))
    }

    async fn read(&mut self, register: u8) -> Result<u8, Error> {
        let mut data = [0];
        self.bus
            .transaction(
                self.address,
                &mut [
                    embedded_hal_async::i2c::Operation::Write(&[register]),
                    embedded_hal_async::i2c::Operation::Read(&mut data),
                ],
            )
            .await
            .map_err(|e| Error::Transport(embedded_hal::i2c::Error::kind(&e)))?;
        Ok(data[0])
    }

    /// Reset the chip and enable all outputs in normal operation. Also
    /// resets the mirrored state to the chip's power-on defaults.
    pub async fn initialize(&mut self) -> Result<(), Error> {
        self.write(registers::RESET_REGISTER, registers::UPDATE_KEY)
            .await?;
        self.state = State::default();
        // enable all outputs, sleep disable, normal operation
        self.write(
            registers::SHUTDOWN_CONTROL_REGISTER,
            registers::OUTPUT_ENABLE_VALUE,
        )
        .await
    }

    /// Raw register write; reserved registers are rejected.
    pub async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error> {
        registers::ensure_supported(register)?;
        self.write(register, value).await
    }

    /// Raw register read; reserved registers are rejected.
    pub async fn read_register(&mut self, register: u8) -> Result<u8, Error> {
        registers::ensure_supported(register)?;
        self.read(register).await
    }

    async fn apply_mode(&mut self, channels: &[Channel], mode: ChannelMode) -> Result<(), Error> {
        let byte = self.stage_mode(channels, mode)?;
        self.write(registers::MODE_REGISTER, byte).await?;
        self.state.mode_register = byte;
        self.state.modes.note(channels, mode);
        Ok(())
    }

    async fn apply_current_band(&mut self, channels: &[Channel], band: u8) -> Result<(), Error> {
        let byte = self.stage_current_band(channels, band)?;
        self.write(registers::CURRENT_BAND_REGISTER, byte).await?;
        self.state.current_band_register = byte;
        Ok(())
    }

    async fn apply_intensity(
        &mut self,
        channels: &[Channel],
        levels: &[u8],
    ) -> Result<(), Error> {
        for (&channel, &level) in channels.iter().zip(levels) {
            self.write(registers::intensity_register(channel), level)
                .await?;
            self.state.intensity[channel.index()] = level;
        }
        self.write(registers::COLOR_UPDATE_REGISTER, registers::UPDATE_KEY)
            .await
    }

    async fn apply_pwm(&mut self, channels: &[Channel], duty_cycle: u16) -> Result<(), Error> {
        let (low, high) = values::encode_pwm(duty_cycle)?;
        for &channel in channels {
            let (low_register, high_register) = registers::pwm_registers(channel);
            self.write(high_register, high).await?;
            self.write(low_register, low).await?;
            self.state.pwm[channel.index()] = duty_cycle;
        }
        self.write(registers::PWM_UPDATE_REGISTER, registers::UPDATE_KEY)
            .await
    }

    async fn config_leds(
        &mut self,
        channels: &[Channel],
        levels: &[u8],
        duty_cycle: u16,
        band: u8,
    ) -> Result<(), Error> {
        self.apply_mode(channels, ChannelMode::PwmCurrentSource)
            .await?;
        self.apply_intensity(channels, levels).await?;
        self.apply_pwm(channels, duty_cycle).await?;
        self.apply_current_band(channels, band).await
    }

    /// Set the operating mode for all channels at once, overwriting any
    /// per-channel divergence. `Pattern` covers R, G and B only; White has
    /// no pattern source and keeps its mode.
    pub async fn set_group_mode(&mut self, mode: ChannelMode) -> Result<(), Error> {
        let channels: &[Channel] = match mode {
            ChannelMode::Pattern => &Channel::RGB,
            _ => &Channel::ALL,
        };
        self.apply_mode(channels, mode).await
    }

    /// Set the operating mode of exactly one channel; the other channels
    /// keep their tracked mode.
    pub async fn set_channel_mode(
        &mut self,
        channel: Channel,
        mode: ChannelMode,
    ) -> Result<(), Error> {
        self.apply_mode(&[channel], mode).await
    }

    /// Intensity, PWM and current band to the max; mode to PWM/current
    /// source.
    pub async fn led_on(&mut self, channel: Channel) -> Result<(), Error> {
        self.config_leds(&[channel], &[255], 4095, 4).await
    }

    /// Intensity, PWM and current band to the min.
    pub async fn led_off(&mut self, channel: Channel) -> Result<(), Error> {
        self.config_leds(&[channel], &[0], 0, 1).await
    }

    /// Intensity 0..=255. Does not touch the channel's mode.
    pub async fn led_intensity(&mut self, channel: Channel, intensity: u8) -> Result<(), Error> {
        self.apply_intensity(&[channel], &[intensity]).await
    }

    /// PWM duty cycle 0..=4095.
    pub async fn led_pwm(&mut self, channel: Channel, duty_cycle: u16) -> Result<(), Error> {
        self.apply_pwm(&[channel], duty_cycle).await
    }

    /// Current limit band 1..=4 (25% to 100%).
    pub async fn led_clb(&mut self, channel: Channel, band: u8) -> Result<(), Error> {
        self.apply_current_band(&[channel], band).await
    }

    /// Scale the channel's last written intensity by `percent` (0..=100).
    pub async fn led_dim(&mut self, channel: Channel, percent: u8) -> Result<(), Error> {
        let scaled = values::scale_intensity(self.state.intensity[channel.index()], percent)?;
        self.apply_intensity(&[channel], &[scaled]).await
    }

    /// Set all three color channels in one call, with PWM and current band
    /// to the max. Intensities are written in R, G, B order.
    pub async fn color(&mut self, r: u8, g: u8, b: u8) -> Result<(), Error> {
        self.config_leds(&Channel::RGB, &[r, g, b], 4095, 4).await
    }

    /// Like [`color`](Self::color), including the white channel.
    pub async fn color_rgbw(&mut self, r: u8, g: u8, b: u8, w: u8) -> Result<(), Error> {
        self.config_leds(&Channel::ALL, &[r, g, b, w], 4095, 4).await
    }

    /// Color to black, PWM and current band to the min.
    pub async fn color_off(&mut self) -> Result<(), Error> {
        self.config_leds(&Channel::RGB, &[0, 0, 0], 0, 1).await
    }

    /// PWM duty cycle 0..=4095 for all color channels.
    pub async fn color_pwm(&mut self, duty_cycle: u16) -> Result<(), Error> {
        self.apply_pwm(&Channel::RGB, duty_cycle).await
    }

    /// Current limit band 1..=4 for all color channels.
    pub async fn color_clb(&mut self, band: u8) -> Result<(), Error> {
        self.apply_current_band(&Channel::RGB, band).await
    }

    /// Scale the last written intensity of every color channel by `percent`
    /// (0..=100).
    pub async fn color_dim(&mut self, percent: u8) -> Result<(), Error> {
        let levels = [
            values::scale_intensity(self.state.intensity[0], percent)?,
            values::scale_intensity(self.state.intensity[1], percent)?,
            values::scale_intensity(self.state.intensity[2], percent)?,
        ];
        self.apply_intensity(&Channel::RGB, &levels).await
    }

    /// Validate and write a complete pattern configuration.
    ///
    /// Validation happens before the first register write: an invalid field
    /// leaves the chip's prior configuration untouched. Once writes begin
    /// there is no rollback on a transport failure.
    pub async fn pattern_config(&mut self, config: &PatternConfig) -> Result<(), Error> {
        let encoded = config.encode()?;

        for (register, value) in encoded.writes {
            self.write(register, value).await?;
        }

        let control = self.stage_pattern_control(&encoded);
        self.write(registers::PATTERN_CONTROL_REGISTER, control)
            .await?;
        self.state.pattern_control_register = control;

        for (slot, color) in encoded.colors.iter().enumerate() {
            if let Some(color) = color {
                self.write_color_table(slot, *color).await?;
            }
        }

        if encoded.activate {
            self.pattern_start().await?;
        }
        Ok(())
    }

    async fn write_color_table(&mut self, slot: usize, color: Rgb) -> Result<(), Error> {
        let base = registers::color_table_base(slot);
        self.write(base, color.r).await?;
        self.write(base + 1, color.g).await?;
        self.write(base + 2, color.b).await?;
        if slot == 0 {
            // color slot 1 shares the channel intensity registers
            self.state.intensity[0] = color.r;
            self.state.intensity[1] = color.g;
            self.state.intensity[2] = color.b;
        }
        self.write(registers::COLOR_UPDATE_REGISTER, registers::UPDATE_KEY)
            .await
    }

    /// Switch R, G, B to pattern mode and latch the configured colors and
    /// times. Requires a prior [`pattern_config`](Self::pattern_config).
    pub async fn pattern_start(&mut self) -> Result<(), Error> {
        self.apply_mode(&Channel::RGB, ChannelMode::Pattern).await?;
        self.write(registers::COLOR_UPDATE_REGISTER, registers::UPDATE_KEY)
            .await?;
        self.write(
            registers::PATTERN_TIME_UPDATE_REGISTER,
            registers::UPDATE_KEY,
        )
        .await
    }

    /// Abort a running pattern by switching R, G, B back to PWM/current
    /// source mode. With no other writes in between, the pattern can be
    /// restarted with [`pattern_start`](Self::pattern_start).
    pub async fn pattern_stop(&mut self) -> Result<(), Error> {
        self.apply_mode(&Channel::RGB, ChannelMode::PwmCurrentSource)
            .await
    }

    /// Current limit band 1..=4 while in pattern mode.
    pub async fn pattern_clb(&mut self, band: u8) -> Result<(), Error> {
        self.apply_current_band(&Channel::RGB, band).await
    }

    /// One status register read, decoded.
    pub async fn pattern_status(&mut self) -> Result<PatternStatus, Error> {
        Ok(PatternStatus::from_raw(
            self.read(registers::PATTERN_STATE_REGISTER).await?,
        ))
    }

    /// Poll the pattern engine status for up to `seconds`. The async
    /// counterpart of [`monitor`](IS31FL3197::monitor): call
    /// [`next`](AsyncPatternMonitor::next) until it returns `None`.
    pub fn monitor<D: embedded_hal_async::delay::DelayNs>(
        &mut self,
        seconds: u32,
        delay: D,
    ) -> AsyncPatternMonitor<'_, BUS, D> {
        AsyncPatternMonitor {
            driver: self,
            delay,
            remaining: seconds.saturating_mul(MONITOR_POLLS_PER_SECOND),
        }
    }
}

/// Finite pull-based sequence of pattern status snapshots, async flavor.
pub struct AsyncPatternMonitor<'a, BUS, D> {
    driver: &'a mut IS31FL3197<BUS, Async>,
    delay: D,
    remaining: u32,
}

impl<BUS, D> AsyncPatternMonitor<'_, BUS, D>
where
    BUS: embedded_hal_async::i2c::I2c,
    D: embedded_hal_async::delay::DelayNs,
{
    pub async fn next(&mut self) -> Option<Result<PatternStatus, Error>> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        match self.driver.pattern_status().await {
            Ok(status) => {
                self.delay.delay_ms(MONITOR_POLL_INTERVAL_MS).await;
                Some(Ok(status))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }
}
