// PWM tone player
//
// A square wave on one pin, frequency per note, fixed duty cycle. The
// note tables are indexed [key][degree]: key A..G picks the row, the
// seven scale degrees run left to right. Values in Hz.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

pub const DUTY_MIN: u8 = 5;
pub const DUTY_MAX: u8 = 50;
pub const DUTY_DEFAULT: u8 = 20;

#[rustfmt::skip]
pub const TONE_BASS: [[u16; 7]; 7] = [
    [221, 248, 278, 294, 330, 371, 416],
    [248, 278, 294, 330, 371, 416, 467],
    [131, 147, 165, 175, 196, 221, 248],
    [147, 165, 175, 196, 221, 248, 278],
    [165, 175, 196, 221, 248, 278, 312],
    [175, 196, 221, 234, 262, 294, 330],
    [196, 221, 234, 262, 294, 330, 371],
];

#[rustfmt::skip]
pub const TONE_MID: [[u16; 7]; 7] = [
    [441, 495, 556, 589, 661, 742, 833],
    [495, 556, 624, 661, 742, 833, 935],
    [262, 294, 330, 350, 393, 441, 495],
    [294, 330, 350, 393, 441, 495, 556],
    [330, 350, 393, 441, 495, 556, 624],
    [350, 393, 441, 495, 556, 624, 661],
    [393, 441, 495, 556, 624, 661, 742],
];

#[rustfmt::skip]
pub const TONE_TREBLE: [[u16; 7]; 7] = [
    [882,  990, 1112, 1178, 1322, 1484, 1665],
    [990, 1112, 1178, 1322, 1484, 1665, 1869],
    [525,  589,  661,  700,  786,  882,  990],
    [589,  661,  700,  786,  882,  990, 1112],
    [661,  700,  786,  882,  990, 1112, 1248],
    [700,  786,  882,  935, 1049, 1178, 1322],
    [786,  882,  990, 1049, 1178, 1322, 1484],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Bass,
    Mid,
    Treble,
}

impl Scale {
    pub const fn table(self) -> &'static [[u16; 7]; 7] {
        match self {
            Scale::Bass => &TONE_BASS,
            Scale::Mid => &TONE_MID,
            Scale::Treble => &TONE_TREBLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

/// Frequency of scale degree `degree` (0..=6) in `key`; `None` past the table.
pub fn note(scale: Scale, key: Key, degree: usize) -> Option<u16> {
    scale.table()[key as usize].get(degree).copied()
}

/// One entry of a tune. `freq == 0` is a rest of `hold_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub freq: u32,
    pub reps: u32,
    /// How long each repetition sounds.
    pub hold_ms: u32,
    /// Silence after each repetition; 0 runs straight into the next.
    pub mute_ms: u32,
}

impl Tone {
    pub const fn new(freq: u32, reps: u32, hold_ms: u32, mute_ms: u32) -> Self {
        Self {
            freq,
            reps,
            hold_ms,
            mute_ms,
        }
    }

    pub const fn rest(hold_ms: u32) -> Self {
        Self::new(0, 1, hold_ms, 0)
    }
}

impl Default for Tone {
    fn default() -> Self {
        Self::new(0, 1, 100, 0)
    }
}

/// A PWM channel that can be retuned while running.
pub trait ToneOutput {
    type Error;

    /// Start (or retune) the square wave.
    fn start(&mut self, freq_hz: u32, duty_pct: u8) -> Result<(), Self::Error>;

    fn stop(&mut self) -> Result<(), Self::Error>;
}

pub struct TonePlayer<O, D> {
    out: O,
    delay: D,
    duty: u8,
    started: bool,
}

impl<O: ToneOutput, D: DelayNs> TonePlayer<O, D> {
    pub fn new(out: O, delay: D, duty: u8) -> Self {
        let duty = duty.clamp(DUTY_MIN, DUTY_MAX);
        info!("[TONE] player ready, duty {}%", duty);
        Self {
            out,
            delay,
            duty,
            started: false,
        }
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }

    /// Silence the output. Does nothing before the first note.
    pub fn stop(&mut self) -> Result<(), O::Error> {
        if !self.started {
            return Ok(());
        }
        self.out.stop()
    }

    /// Play one tone, blocking for its full length. A rest returns `false`.
    pub fn play_tone(&mut self, tone: Tone) -> Result<bool, O::Error> {
        if tone.freq == 0 {
            self.stop()?;
            self.delay.delay_ms(tone.hold_ms);
            return Ok(false);
        }

        debug!(
            "[TONE] {} Hz x{} ({} ms on, {} ms off)",
            tone.freq, tone.reps, tone.hold_ms, tone.mute_ms
        );
        self.started = true;
        for _ in 0..tone.reps {
            self.out.start(tone.freq, self.duty)?;
            self.delay.delay_ms(tone.hold_ms);
            if tone.mute_ms > 0 {
                self.out.stop()?;
                self.delay.delay_ms(tone.mute_ms);
            }
        }
        Ok(true)
    }

    /// Play every tone in order, then stop.
    pub fn play_tone_list(&mut self, tones: &[Tone]) -> Result<(), O::Error> {
        for &tone in tones {
            self.play_tone(tone)?;
        }
        self.stop()
    }

    pub fn release(self) -> (O, D) {
        (self.out, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDelay, MockPwm, Step, Timeline};
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    fn player(duty: u8) -> (TonePlayer<MockPwm, MockDelay>, Timeline) {
        let t: Timeline = Rc::new(RefCell::new(Vec::new()));
        (
            TonePlayer::new(MockPwm(t.clone()), MockDelay(t.clone()), duty),
            t,
        )
    }

    #[test]
    fn duty_is_clamped() {
        assert_eq!(player(1).0.duty(), 5);
        assert_eq!(player(90).0.duty(), 50);
        assert_eq!(player(20).0.duty(), 20);
    }

    #[test]
    fn rest_before_start_only_waits() {
        let (mut p, t) = player(20);
        assert_eq!(p.play_tone(Tone::rest(30)), Ok(false));
        assert_eq!(*t.borrow(), [Step::Wait(30)]);
    }

    #[test]
    fn reps_with_mute() {
        let (mut p, t) = player(20);
        assert_eq!(p.play_tone(Tone::new(440, 2, 80, 150)), Ok(true));
        assert_eq!(
            *t.borrow(),
            [
                Step::Start(440, 20),
                Step::Wait(80),
                Step::Stop,
                Step::Wait(150),
                Step::Start(440, 20),
                Step::Wait(80),
                Step::Stop,
                Step::Wait(150),
            ]
        );
    }

    #[test]
    fn list_stops_at_end() {
        let (mut p, t) = player(30);
        p.play_tone_list(&[Tone::new(262, 1, 10, 0), Tone::rest(5), Tone::new(294, 1, 10, 0)])
            .unwrap();
        assert_eq!(
            *t.borrow(),
            [
                Step::Start(262, 30),
                Step::Wait(10),
                Step::Stop,
                Step::Wait(5),
                Step::Start(294, 30),
                Step::Wait(10),
                Step::Stop,
            ]
        );
    }

    #[test]
    fn note_lookup() {
        assert_eq!(note(Scale::Mid, Key::C, 0), Some(262));
        assert_eq!(note(Scale::Treble, Key::B, 6), Some(1869));
        assert_eq!(note(Scale::Bass, Key::A, 7), None);
    }
}
