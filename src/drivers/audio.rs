// Audio output routing
//
// The Pi's PWM audio can be brought out on the pHAT's headphone jack by
// switching the channel pins to their ALT0 function. Switching them back
// to plain outputs frees them for the tone player.
//
// The routing outlives the device: pins are told to keep their function
// when dropped, so `on()` followed by a process exit leaves the jack live.

use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinFunction {
    /// ALT0: PWM audio.
    Audio,
    /// Plain GPIO output.
    Output,
}

/// Function select for a single pin.
pub trait PinMux {
    type Error;

    fn set_function(&mut self, function: PinFunction) -> Result<(), Self::Error>;

    /// Leave the pin in its last function when it is released.
    fn keep_function_on_drop(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Right,
    Left,
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Channel::Right => "right",
            Channel::Left => "left",
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Error<E> {
    pub channel: Channel,
    pub source: E,
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "audio {} channel: {:?}", self.channel, self.source)
    }
}

impl<E: core::fmt::Debug> core::error::Error for Error<E> {}

/// A missing channel is simply left alone.
pub struct AudioDevice<P> {
    right: Option<P>,
    left: Option<P>,
}

impl<P: PinMux> AudioDevice<P> {
    pub fn new(mut right: Option<P>, mut left: Option<P>) -> Self {
        for pin in [right.as_mut(), left.as_mut()].into_iter().flatten() {
            pin.keep_function_on_drop();
        }
        Self { right, left }
    }

    /// Route both channels to the jack.
    pub fn on(&mut self) -> Result<(), Error<P::Error>> {
        let r = self.switch(PinFunction::Audio);
        if r.is_ok() {
            info!("[AUDIO] on");
        }
        r
    }

    /// Hand both channels back to GPIO.
    pub fn off(&mut self) -> Result<(), Error<P::Error>> {
        let r = self.switch(PinFunction::Output);
        if r.is_ok() {
            info!("[AUDIO] off");
        }
        r
    }

    pub fn release(self) -> (Option<P>, Option<P>) {
        (self.right, self.left)
    }

    // both channels are tried even if the first fails
    fn switch(&mut self, function: PinFunction) -> Result<(), Error<P::Error>> {
        let mut first = None;
        for (channel, pin) in [
            (Channel::Right, self.right.as_mut()),
            (Channel::Left, self.left.as_mut()),
        ] {
            let Some(pin) = pin else {
                continue;
            };
            if let Err(source) = pin.set_function(function) {
                warn!("[AUDIO] {} channel to {:?} failed", channel, function);
                if first.is_none() {
                    first = Some(Error { channel, source });
                }
            }
        }
        match first {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
