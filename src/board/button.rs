//! Keypad layout of the RPi-Spark pHAT
//!
//! ```text
//!              [JOY UP]
//! [JOY LEFT]   [JOY OK]   [JOY RIGHT]        [ACT A]  [ACT B]
//!              [JOY DOWN]
//! ```
//!
//! Every key is a plain GPIO to ground, read with the internal pull-up.

use super::pins;

pub use crate::drivers::input::Button;

impl Button {
    /// BCM pin number.
    pub const fn pin(self) -> u8 {
        match self {
            Button::JoyUp => pins::JOY_UP,
            Button::JoyDown => pins::JOY_DOWN,
            Button::JoyLeft => pins::JOY_LEFT,
            Button::JoyRight => pins::JOY_RIGHT,
            Button::JoyOk => pins::JOY_OK,
            Button::ActA => pins::ACT_A,
            Button::ActB => pins::ACT_B,
        }
    }

    pub fn from_pin(pin: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.pin() == pin)
    }
}
