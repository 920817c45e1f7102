//! BCM |     Function     |      Notes
//! ----+------------------+----------------------------------
//!  2  | I2C1 SDA         | MPU-6050 (0x68)
//!  3  | I2C1 SCL         |
//!  5  | Joystick Up      | Active LOW, internal pullup
//!  6  | Joystick Down    | Active LOW, internal pullup
//!  8  | SPI0 CE0         | OLED chip select
//!  9  | OLED DC          | Data/Command select (shares SPI0 MISO pin)
//! 10  | SPI0 MOSI        | OLED data in
//! 11  | SPI0 SCLK        |
//! 12  | PWM0 / Audio L   | Tone output, or ALT0 to the headphone jack
//! 13  | PWM1 / Audio R   | ALT0 to the headphone jack
//! 22  | Action A         | Active LOW, internal pullup
//! 23  | Action B         | Active LOW, internal pullup
//! 24  | Joystick OK      | Active LOW, internal pullup
//! 26  | Joystick Left    | Active LOW, internal pullup
//! 27  | Joystick Right   | Active LOW, internal pullup

// ----- Joystick -----
pub const JOY_UP: u8 = 5;
pub const JOY_DOWN: u8 = 6;
pub const JOY_LEFT: u8 = 26;
pub const JOY_RIGHT: u8 = 27;
pub const JOY_OK: u8 = 24;

// ----- Action buttons -----
pub const ACT_A: u8 = 22;
pub const ACT_B: u8 = 23;

// ----- OLED (SPI0, CE0) -----
pub const OLED_DC: u8 = 9;
pub const OLED_SPI_HZ: u32 = 2_000_000;

// ----- Audio -----
pub const AUDIO_R: u8 = 13;
pub const AUDIO_L: u8 = 12;
pub const TONE: u8 = 12; // same pin as the left channel, GPIO mode

// ----- IMU -----
pub const IMU_I2C_BUS: u8 = 1;
