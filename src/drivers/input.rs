// Debounced keypad polling
//
// One GPIO per key, active LOW with pull-ups. Unlike a resistor ladder
// several keys can be down at once, so every key carries its own
// debounce and hold state. The caller supplies the clock (ms since any
// fixed point) so this works with whatever time source the board has.
//
// Events: Press / Release after the bounce window, LongPress after 1s
// held, then Repeat every 150ms until release.

use embedded_hal::digital::InputPin;
use log::{debug, warn};

/// Bounce windows, in ms.
pub const BOUNCE_SHORT_MON: u32 = 10;
pub const BOUNCE_SHORT: u32 = 50;
pub const BOUNCE_NORMAL: u32 = 100;
pub const BOUNCE_LONG: u32 = 200;

const LONG_PRESS_MS: u64 = 1000;
const REPEAT_MS: u64 = 150;

/// The pHAT's keys. Which GPIO each one sits on is board wiring, see
/// `board::button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    // Joystick
    JoyUp,
    JoyDown,
    JoyLeft,
    JoyRight,
    JoyOk,
    // Action buttons
    ActA,
    ActB,
}

impl Button {
    pub const COUNT: usize = 7;

    pub const ALL: [Button; Self::COUNT] = [
        Button::JoyUp,
        Button::JoyDown,
        Button::JoyLeft,
        Button::JoyRight,
        Button::JoyOk,
        Button::ActA,
        Button::ActB,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Button::JoyUp => "Joy Up",
            Button::JoyDown => "Joy Down",
            Button::JoyLeft => "Joy Left",
            Button::JoyRight => "Joy Right",
            Button::JoyOk => "Joy OK",
            Button::ActA => "Act A",
            Button::ActB => "Act B",
        }
    }
}

impl core::fmt::Display for Button {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Press(Button),
    Release(Button),
    LongPress(Button),
    Repeat(Button),
}

impl Event {
    pub const fn button(self) -> Button {
        match self {
            Event::Press(b) | Event::Release(b) | Event::LongPress(b) | Event::Repeat(b) => b,
        }
    }
}

// a release and a press per key can land in the same poll
const QUEUE_LEN: usize = Button::COUNT * 2;

struct EventQueue {
    buf: [Option<Event>; QUEUE_LEN],
}

impl EventQueue {
    const fn new() -> Self {
        Self {
            buf: [None; QUEUE_LEN],
        }
    }

    fn push(&mut self, ev: Event) {
        for slot in self.buf.iter_mut() {
            if slot.is_none() {
                *slot = Some(ev);
                return;
            }
        }
    }

    fn pop(&mut self) -> Option<Event> {
        for slot in self.buf.iter_mut() {
            if let Some(ev) = slot.take() {
                return Some(ev);
            }
        }
        None
    }

    fn is_empty(&self) -> bool {
        self.buf.iter().all(|s| s.is_none())
    }

    fn retain(&mut self, mut keep: impl FnMut(&Event) -> bool) {
        for slot in self.buf.iter_mut() {
            if slot.as_ref().is_some_and(|ev| !keep(ev)) {
                *slot = None;
            }
        }
    }
}

struct Key<P> {
    pin: P,
    stable: bool,
    candidate: bool,
    candidate_since: u64,
    press_since: u64,
    long_press_fired: bool,
    last_repeat: u64,
}

impl<P> Key<P> {
    fn new(pin: P) -> Self {
        Self {
            pin,
            stable: false,
            candidate: false,
            candidate_since: 0,
            press_since: 0,
            long_press_fired: false,
            last_repeat: 0,
        }
    }
}

pub struct KeyButtons<P> {
    keys: [Option<Key<P>>; Button::COUNT],
    bounce_ms: u32,
    queue: EventQueue,
}

impl<P: InputPin> KeyButtons<P> {
    pub fn new(bounce_ms: u32) -> Self {
        Self {
            keys: [const { None }; Button::COUNT],
            bounce_ms,
            queue: EventQueue::new(),
        }
    }

    pub fn with_keys(bounce_ms: u32, keys: impl IntoIterator<Item = (Button, P)>) -> Self {
        let mut kb = Self::new(bounce_ms);
        for (button, pin) in keys {
            kb.add(button, pin);
        }
        kb
    }

    /// Start tracking `button`. A key already configured is replaced.
    pub fn add(&mut self, button: Button, pin: P) {
        self.keys[button.index()] = Some(Key::new(pin));
        debug!("[KEY] {} added", button);
    }

    /// Stop tracking every listed button and drop any queued events for them.
    pub fn remove(&mut self, buttons: &[Button]) {
        for &button in buttons {
            if self.keys[button.index()].take().is_some() {
                debug!("[KEY] {} removed", button);
            }
        }
        self.queue.retain(|ev| !buttons.contains(&ev.button()));
    }

    pub fn is_configured(&self, button: Button) -> bool {
        self.keys[button.index()].is_some()
    }

    pub fn bounce_ms(&self) -> u32 {
        self.bounce_ms
    }

    pub fn pin_mut(&mut self, button: Button) -> Option<&mut P> {
        self.keys[button.index()].as_mut().map(|k| &mut k.pin)
    }

    /// Raw pin level, `true` = high (released). An unconfigured button
    /// reads `false`.
    pub fn read(&mut self, button: Button) -> Result<bool, P::Error> {
        match self.keys[button.index()].as_mut() {
            Some(key) => key.pin.is_high(),
            None => Ok(false),
        }
    }

    /// Undebounced "is it held right now".
    pub fn is_pressed(&mut self, button: Button) -> Result<bool, P::Error> {
        match self.keys[button.index()].as_mut() {
            Some(key) => key.pin.is_low(),
            None => Ok(false),
        }
    }

    pub fn poll(&mut self, now_ms: u64) -> Option<Event> {
        if !self.queue.is_empty() {
            return self.queue.pop();
        }

        let bounce = self.bounce_ms as u64;
        for (button, slot) in Button::ALL.into_iter().zip(self.keys.iter_mut()) {
            let Some(key) = slot.as_mut() else {
                continue;
            };

            let raw = match key.pin.is_low() {
                Ok(low) => low,
                Err(_) => {
                    warn!("[KEY] {} read failed", button);
                    continue;
                }
            };

            if raw != key.candidate {
                key.candidate = raw;
                key.candidate_since = now_ms;
            }

            let debounced = if now_ms.saturating_sub(key.candidate_since) >= bounce {
                key.candidate
            } else {
                key.stable
            };

            if debounced != key.stable {
                key.stable = debounced;
                if debounced {
                    key.press_since = now_ms;
                    key.long_press_fired = false;
                    key.last_repeat = now_ms;
                    self.queue.push(Event::Press(button));
                } else {
                    self.queue.push(Event::Release(button));
                }
                continue;
            }

            if key.stable {
                let held = now_ms.saturating_sub(key.press_since);

                if !key.long_press_fired && held >= LONG_PRESS_MS {
                    key.long_press_fired = true;
                    key.last_repeat = now_ms;
                    self.queue.push(Event::LongPress(button));
                } else if key.long_press_fired
                    && now_ms.saturating_sub(key.last_repeat) >= REPEAT_MS
                {
                    key.last_repeat = now_ms;
                    self.queue.push(Event::Repeat(button));
                }
            }
        }

        self.queue.pop()
    }

    /// Some key has changed level but not yet settled.
    pub fn is_debouncing(&self) -> bool {
        self.keys
            .iter()
            .flatten()
            .any(|k| k.candidate != k.stable)
    }
}
