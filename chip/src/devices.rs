//! The collaborators of the interpreter and the hex keypad.
use crate::{definitions::keyboard, display::DisplayBuffer, DeviceError};

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for showing the frame buffer
pub trait Renderer {
    /// Will display all of the pixels, called once per frame when the buffer changed.
    fn render(&mut self, display: &DisplayBuffer) -> Result<(), DeviceError>;
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for reading the keyboard state changes
pub trait Input {
    /// Returns all the events that happened since the last poll, never blocks.
    fn poll(&mut self) -> Result<Vec<InputEvent>, DeviceError>;
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for the beeper
pub trait Audio {
    /// Called once per frame with whether the sound timer is running.
    fn set_beeping(&mut self, beeping: bool) -> Result<(), DeviceError>;
}

/// A single change reported by an input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The hex key `key` changed its state
    Key { key: usize, pressed: bool },
    /// The user asked to stop the interpreter
    Quit,
}

/// The progress of the `FX0A` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyWait {
    /// No key has been chosen yet
    Idle,
    /// The key was pressed and is delivered as soon as it is released
    AwaitingRelease(usize),
}

impl Default for KeyWait {
    fn default() -> Self {
        KeyWait::Idle
    }
}

/// Will store the current state of the keypad.
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The `8`, `4`, `6`, and
/// `2` keys are typically used for directional input. Three opcodes are used to detect input.
/// One skips an instruction if a specific key is pressed, while another does the same if a
/// specific key is not pressed. The third waits for a key press and release, and then stores
/// it in one of the data registers.
#[derive(Default, Debug, Clone)]
pub struct Keyboard {
    keys: [bool; keyboard::SIZE],
    wait: KeyWait,
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard::default()
    }

    /// Releases every key and forgets a pending wait.
    pub fn reset(&mut self) {
        self.keys = [false; keyboard::SIZE];
        self.wait = KeyWait::Idle;
    }

    /// Sets the state of a single key, keys outside of `0x0-0xF` are ignored.
    pub fn set_pressed(&mut self, key: usize, pressed: bool) {
        match self.keys.get_mut(key) {
            Some(state) => *state = pressed,
            None => log::warn!("Ignoring the unknown key {:#X}.", key),
        }
    }

    /// Overwrites the whole keypad at once.
    pub fn set_mult(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keys = *keys;
    }

    /// Checks the key, only the low nibble of `key` is used.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    pub fn get_keys(&self) -> &[bool] {
        &self.keys
    }

    pub fn wait_state(&self) -> KeyWait {
        self.wait
    }

    /// Advances the `FX0A` state machine by one step and returns the key
    /// once it was pressed and released again.
    ///
    /// While idle the lowest pressed key is picked, after that the picked
    /// key has to be released before it is delivered.
    ///
    /// # Example
    /// ```rust
    /// # use chip::devices::{Keyboard, KeyWait};
    /// let mut keyboard = Keyboard::new();
    /// assert_eq!(keyboard.poll_wait(), None);
    /// keyboard.set_pressed(0x5, true);
    /// assert_eq!(keyboard.poll_wait(), None);
    /// assert_eq!(keyboard.wait_state(), KeyWait::AwaitingRelease(0x5));
    /// keyboard.set_pressed(0x5, false);
    /// assert_eq!(keyboard.poll_wait(), Some(0x5));
    /// assert_eq!(keyboard.wait_state(), KeyWait::Idle);
    /// ```
    pub fn poll_wait(&mut self) -> Option<u8> {
        match self.wait {
            KeyWait::Idle => {
                if let Some(key) = self.keys.iter().position(|&pressed| pressed) {
                    self.wait = KeyWait::AwaitingRelease(key);
                }
                None
            }
            KeyWait::AwaitingRelease(key) if !self.keys[key] => {
                self.wait = KeyWait::Idle;
                Some(key as u8)
            }
            KeyWait::AwaitingRelease(_) => None,
        }
    }
}
