// Board configuration.
// Text-based key=value format; defaults match the RPi-Spark pHAT wiring.
use alloc::string::String;
use core::fmt::Write as _;

use crate::board::pins;
use crate::drivers::input::{BOUNCE_LONG, BOUNCE_NORMAL, BOUNCE_SHORT_MON};
use crate::drivers::mpu6050::{AccelRange, DEFAULT_ADDRESS};
use crate::drivers::tone::{DUTY_DEFAULT, DUTY_MAX, DUTY_MIN};
use crate::screen::Rotation;

const SPI_HZ_MIN: u32 = 100_000;
const SPI_HZ_MAX: u32 = 10_000_000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SparkConfig {
    // OLED
    pub oled_dc: u8,
    pub oled_rst: Option<u8>, // the pHAT ties reset to 3V3
    pub spi_hz: u32,
    pub mirror_h: bool,
    pub mirror_v: bool,
    pub rotation: Rotation,
    // IMU
    pub imu_bus: u8,
    pub imu_address: u8,
    pub accel_range: AccelRange,
    // keys
    pub key_bounce_ms: u32,
    // sound
    pub tone_pin: u8,
    pub tone_duty: u8, // percent, 5..=50
    pub audio_right: Option<u8>,
    pub audio_left: Option<u8>,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl SparkConfig {
    pub const fn defaults() -> Self {
        Self {
            oled_dc: pins::OLED_DC,
            oled_rst: None,
            spi_hz: pins::OLED_SPI_HZ,
            mirror_h: false,
            mirror_v: false,
            rotation: Rotation::Deg0,
            imu_bus: pins::IMU_I2C_BUS,
            imu_address: DEFAULT_ADDRESS,
            accel_range: AccelRange::G2,
            key_bounce_ms: BOUNCE_NORMAL,
            tone_pin: pins::TONE,
            tone_duty: DUTY_DEFAULT,
            audio_right: Some(pins::AUDIO_R),
            audio_left: Some(pins::AUDIO_L),
        }
    }

    /// Defaults overridden by whatever `text` sets. Unknown keys and
    /// unparsable values are ignored.
    pub fn parse(text: &str) -> Self {
        let mut cfg = Self::defaults();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, val)) = line.split_once('=') {
                cfg.apply(key.trim(), val.trim());
            }
        }
        cfg.sanitize();
        cfg
    }

    pub fn sanitize(&mut self) {
        self.spi_hz = self.spi_hz.clamp(SPI_HZ_MIN, SPI_HZ_MAX);
        self.key_bounce_ms = self.key_bounce_ms.clamp(BOUNCE_SHORT_MON, BOUNCE_LONG * 5);
        self.tone_duty = self.tone_duty.clamp(DUTY_MIN, DUTY_MAX);
        self.imu_address &= 0x7F;
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, w: &mut String) -> core::fmt::Result {
        w.push_str("# spark-phat board config\n");
        w.push_str("# lines starting with # are ignored\n\n");
        writeln!(w, "oled_dc={}", self.oled_dc)?;
        writeln!(w, "oled_rst={}", PinText(self.oled_rst))?;
        writeln!(w, "spi_hz={}", self.spi_hz)?;
        writeln!(w, "mirror_h={}", self.mirror_h as u8)?;
        writeln!(w, "mirror_v={}", self.mirror_v as u8)?;
        writeln!(w, "screen_direction={}", self.rotation.degrees())?;
        w.push('\n');
        writeln!(w, "imu_bus={}", self.imu_bus)?;
        writeln!(w, "imu_address=0x{:02x}", self.imu_address)?;
        writeln!(w, "accel_range={}", self.accel_range.g())?;
        w.push('\n');
        writeln!(w, "key_bounce_ms={}", self.key_bounce_ms)?;
        writeln!(w, "tone_pin={}", self.tone_pin)?;
        writeln!(w, "tone_duty={}", self.tone_duty)?;
        writeln!(w, "audio_right={}", PinText(self.audio_right))?;
        writeln!(w, "audio_left={}", PinText(self.audio_left))
    }

    fn apply(&mut self, key: &str, val: &str) {
        match key {
            "oled_dc" => set(&mut self.oled_dc, parse_u8(val)),
            "oled_rst" => set(&mut self.oled_rst, parse_pin(val)),
            "spi_hz" => set(&mut self.spi_hz, parse_u32(val)),
            "mirror_h" => set(&mut self.mirror_h, parse_bool(val)),
            "mirror_v" => set(&mut self.mirror_v, parse_bool(val)),
            "screen_direction" => set(
                &mut self.rotation,
                parse_u32(val)
                    .and_then(|d| u16::try_from(d).ok())
                    .and_then(Rotation::from_degrees),
            ),
            "imu_bus" => set(&mut self.imu_bus, parse_u8(val)),
            "imu_address" => set(&mut self.imu_address, parse_u8(val)),
            "accel_range" => set(
                &mut self.accel_range,
                parse_u8(val).and_then(AccelRange::from_g),
            ),
            "key_bounce_ms" => set(&mut self.key_bounce_ms, parse_u32(val)),
            "tone_pin" => set(&mut self.tone_pin, parse_u8(val)),
            "tone_duty" => set(&mut self.tone_duty, parse_u8(val)),
            "audio_right" => set(&mut self.audio_right, parse_pin(val)),
            "audio_left" => set(&mut self.audio_left, parse_pin(val)),
            _ => {} // unknown keys ignored for forward compat
        }
    }
}

fn set<T>(slot: &mut T, val: Option<T>) {
    if let Some(v) = val {
        *slot = v;
    }
}

// decimal, or hex with a 0x prefix
fn parse_u32(s: &str) -> Option<u32> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

fn parse_u8(s: &str) -> Option<u8> {
    parse_u32(s).and_then(|v| u8::try_from(v).ok())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// "none" disables an optional pin
fn parse_pin(s: &str) -> Option<Option<u8>> {
    if s.eq_ignore_ascii_case("none") {
        return Some(None);
    }
    parse_u8(s).map(Some)
}

struct PinText(Option<u8>);

impl core::fmt::Display for PinText {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(pin) => write!(f, "{}", pin),
            None => f.write_str("none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_gives_board_defaults() {
        let cfg = SparkConfig::parse("");
        assert_eq!(cfg, SparkConfig::defaults());
        assert_eq!(cfg.oled_dc, 9);
        assert_eq!(cfg.audio_right, Some(13));
        assert_eq!(cfg.audio_left, Some(12));
        assert_eq!(cfg.key_bounce_ms, 100);
    }

    #[test]
    fn overrides_comments_and_unknown_keys() {
        let cfg = SparkConfig::parse(
            "# comment\n\
             mirror_h = 1\n\
             screen_direction=270\r\n\
             imu_address=0x69\n\
             accel_range=8\n\
             audio_left=none\n\
             bogus=42\n\
             tone_pin=abc\n",
        );
        assert!(cfg.mirror_h);
        assert_eq!(cfg.rotation, Rotation::Deg270);
        assert_eq!(cfg.imu_address, 0x69);
        assert_eq!(cfg.accel_range, AccelRange::G8);
        assert_eq!(cfg.audio_left, None);
        assert_eq!(cfg.tone_pin, pins::TONE);
    }

    #[test]
    fn bad_values_are_rejected_or_clamped() {
        let cfg = SparkConfig::parse("screen_direction=45\ntone_duty=90\nkey_bounce_ms=1\nspi_hz=1");
        assert_eq!(cfg.rotation, Rotation::Deg0);
        assert_eq!(cfg.tone_duty, 50);
        assert_eq!(cfg.key_bounce_ms, 10);
        assert_eq!(cfg.spi_hz, SPI_HZ_MIN);
    }

    #[test]
    fn text_reparses_to_same_config() {
        let mut cfg = SparkConfig::defaults();
        cfg.mirror_v = true;
        cfg.rotation = Rotation::Deg90;
        cfg.oled_rst = Some(25);
        cfg.audio_right = None;
        let text = cfg.to_text();
        assert!(text.contains("imu_address=0x68\n"));
        assert_eq!(SparkConfig::parse(&text), cfg);
    }
}
