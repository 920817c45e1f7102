//! RPi-Spark pHAT board support
//!
//! Maps the pHAT's parts onto the Pi's peripherals so application code
//! never deals in BCM numbers. Pin and key tables are always available;
//! the rppal-backed bring-up needs the `rpi` feature.
//!
//! The tone player and the audio router both want BCM 12, so neither is
//! claimed at init. Open one with [`Board::tone_player`] or
//! [`Board::audio_device`], and drop it before opening the other. The
//! audio pins keep whatever function they were last switched to after the
//! device is dropped; the tone pin does not.

pub mod button;
pub mod pins;

pub use button::Button;

#[cfg(feature = "rpi")]
pub use rpi::*;

#[cfg(feature = "rpi")]
mod rpi {
    use core::convert::Infallible;
    use core::fmt;
    use std::time::Duration;

    use log::{info, warn};
    use rppal::gpio::{self, Gpio, InputPin, IoPin, Mode, OutputPin, Trigger};
    use rppal::hal::Delay;
    use rppal::i2c::{self, I2c};
    use rppal::spi::{self, Bus, SimpleHalSpiDevice, SlaveSelect, Spi};

    use super::Button;
    use crate::config::SparkConfig;
    use crate::drivers::audio::{AudioDevice, PinFunction, PinMux};
    use crate::drivers::input::KeyButtons;
    use crate::drivers::mpu6050::{self, Mpu6050};
    use crate::drivers::ssd1306::{self, Ssd1306};
    use crate::drivers::tone::{ToneOutput, TonePlayer};

    // Type Aliases
    pub type Oled = Ssd1306<SimpleHalSpiDevice, OutputPin, OutputPin>;
    pub type Imu = Mpu6050<I2c>;
    pub type Keys = KeyButtons<InputPin>;
    pub type Tone = TonePlayer<OutputPin, Delay>;
    pub type Audio = AudioDevice<IoPin>;

    #[derive(Debug)]
    pub enum BoardError {
        Gpio(gpio::Error),
        Spi(spi::Error),
        I2c(i2c::Error),
        Oled(ssd1306::Error<spi::Error>),
        Imu(mpu6050::Error<i2c::Error>),
        /// The key was never configured (or was removed).
        NoSuchKey(Button),
    }

    impl fmt::Display for BoardError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                BoardError::Gpio(e) => write!(f, "gpio: {}", e),
                BoardError::Spi(e) => write!(f, "spi: {}", e),
                BoardError::I2c(e) => write!(f, "i2c: {}", e),
                BoardError::Oled(e) => write!(f, "oled: {}", e),
                BoardError::Imu(e) => write!(f, "imu: {}", e),
                BoardError::NoSuchKey(b) => write!(f, "key {} is not configured", b),
            }
        }
    }

    impl std::error::Error for BoardError {}

    impl From<gpio::Error> for BoardError {
        fn from(e: gpio::Error) -> Self {
            BoardError::Gpio(e)
        }
    }

    impl From<spi::Error> for BoardError {
        fn from(e: spi::Error) -> Self {
            BoardError::Spi(e)
        }
    }

    impl From<i2c::Error> for BoardError {
        fn from(e: i2c::Error) -> Self {
            BoardError::I2c(e)
        }
    }

    // Software PWM on a plain output; good enough for tones.
    impl ToneOutput for OutputPin {
        type Error = gpio::Error;

        fn start(&mut self, freq_hz: u32, duty_pct: u8) -> Result<(), gpio::Error> {
            self.set_pwm_frequency(freq_hz as f64, duty_pct as f64 / 100.0)
        }

        fn stop(&mut self) -> Result<(), gpio::Error> {
            self.clear_pwm()?;
            self.set_low();
            Ok(())
        }
    }

    impl PinMux for IoPin {
        type Error = Infallible;

        fn set_function(&mut self, function: PinFunction) -> Result<(), Infallible> {
            self.set_mode(match function {
                PinFunction::Audio => Mode::Alt0,
                PinFunction::Output => Mode::Output,
            });
            Ok(())
        }

        // rppal would otherwise put the pin back the way it found it
        fn keep_function_on_drop(&mut self) {
            self.set_reset_on_drop(false);
        }
    }

    /// Everything that can be claimed up front.
    pub struct Board {
        gpio: Gpio,
        config: SparkConfig,
        pub oled: Oled,
        pub imu: Imu,
        pub keys: Keys,
    }

    impl Board {
        /// Open GPIO, SPI0/CE0 and the IMU's I2C bus; initialise the OLED
        /// (left dark) and the IMU (range set, sensors not yet opened).
        pub fn init(config: &SparkConfig) -> Result<Self, BoardError> {
            let gpio = Gpio::new()?;
            let oled = Self::init_oled(&gpio, config)?;
            let imu = Self::init_imu(config)?;
            let keys = Self::init_keys(&gpio, config)?;
            info!(
                "[BOARD] RPi-Spark ready: oled dc={} spi={}Hz, imu bus {} @0x{:02x}",
                config.oled_dc, config.spi_hz, config.imu_bus, config.imu_address
            );
            Ok(Board {
                gpio,
                config: *config,
                oled,
                imu,
                keys,
            })
        }

        fn init_oled(gpio: &Gpio, config: &SparkConfig) -> Result<Oled, BoardError> {
            let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, config.spi_hz, spi::Mode::Mode0)?;
            let dc = gpio.get(config.oled_dc)?.into_output();
            let rst = match config.oled_rst {
                Some(pin) => Some(gpio.get(pin)?.into_output()),
                None => None,
            };
            let mut oled = Ssd1306::new(
                SimpleHalSpiDevice::new(spi),
                dc,
                rst,
                config.mirror_h,
                config.mirror_v,
            );
            oled.init(&mut Delay::new()).map_err(BoardError::Oled)?;
            Ok(oled)
        }

        fn init_imu(config: &SparkConfig) -> Result<Imu, BoardError> {
            let i2c = I2c::with_bus(config.imu_bus)?;
            let mut imu = Mpu6050::new(i2c, config.imu_address).map_err(BoardError::Imu)?;
            imu.set_accel_range(config.accel_range)
                .map_err(BoardError::Imu)?;
            Ok(imu)
        }

        fn init_keys(gpio: &Gpio, config: &SparkConfig) -> Result<Keys, BoardError> {
            let mut keys = KeyButtons::new(config.key_bounce_ms);
            for button in Button::ALL {
                keys.add(button, gpio.get(button.pin())?.into_input_pullup());
            }
            Ok(keys)
        }

        pub fn config(&self) -> &SparkConfig {
            &self.config
        }

        pub fn tone_player(&self) -> Result<Tone, BoardError> {
            let pin = self.gpio.get(self.config.tone_pin)?.into_output_low();
            Ok(TonePlayer::new(pin, Delay::new(), self.config.tone_duty))
        }

        /// Claims the audio pins as outputs. `on()`/`off()` persist past
        /// the device and the process.
        pub fn audio_device(&self) -> Result<Audio, BoardError> {
            let open = |pin: Option<u8>| -> Result<Option<IoPin>, BoardError> {
                match pin {
                    Some(p) => Ok(Some(self.gpio.get(p)?.into_io(Mode::Output))),
                    None => Ok(None),
                }
            };
            Ok(AudioDevice::new(
                open(self.config.audio_right)?,
                open(self.config.audio_left)?,
            ))
        }

        /// Edge-callback mode: `callback(button, pressed)` runs on rppal's
        /// interrupt thread for every debounced edge.
        pub fn watch_key<F>(&mut self, button: Button, callback: F) -> Result<(), BoardError>
        where
            F: FnMut(Button, bool) + Send + 'static,
        {
            let bounce = Duration::from_millis(self.keys.bounce_ms() as u64);
            let pin = self
                .keys
                .pin_mut(button)
                .ok_or(BoardError::NoSuchKey(button))?;
            let mut callback = callback;
            pin.set_async_interrupt(Trigger::Both, Some(bounce), move |event| {
                callback(button, event.trigger == Trigger::FallingEdge)
            })?;
            Ok(())
        }

        /// Drop the callbacks of every listed key. Keys stay pollable.
        pub fn unwatch_keys(&mut self, buttons: &[Button]) {
            for &button in buttons {
                if let Some(pin) = self.keys.pin_mut(button) {
                    if let Err(e) = pin.clear_async_interrupt() {
                        warn!("[BOARD] {} unwatch failed: {}", button, e);
                    }
                }
            }
        }
    }
}
