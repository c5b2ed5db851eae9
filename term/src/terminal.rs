//! The terminal implementations of the interpreter devices.
use std::{
    io::{self, Stdout, Write},
    time::Duration,
};

use chip::{
    definitions::{display, keyboard},
    devices::{Audio, Input, InputEvent, Renderer},
    display::DisplayBuffer,
    DeviceError,
};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute, queue, style,
    terminal::{self, ClearType},
};

use crate::keymap;

/// The amount of frames a key stays down after the terminal reported it.
///
/// Terminals only report presses (and repeats while a key is held), so the
/// release has to be synthesized.
const HOLD_FRAMES: u32 = 10;

/// Puts the terminal into raw mode on an alternate screen and restores it
/// when dropped.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        ) {
            let _ = terminal::disable_raw_mode();
            return Err(err.into());
        }
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        if let Err(err) = terminal::disable_raw_mode() {
            log::error!("Unable to restore the terminal: {}", err);
        }
    }
}

/// Converts the frame buffer into lines of half block characters, every
/// character shows two pixel rows.
pub fn render_rows(buffer: &DisplayBuffer) -> Vec<String> {
    buffer
        .rows()
        .chunks(2)
        .map(|pair| {
            (0..display::WIDTH)
                .map(|x| {
                    let top = pair[0][x];
                    let bottom = pair.get(1).map_or(false, |row| row[x]);
                    match (top, bottom) {
                        (true, true) => '█',
                        (true, false) => '▀',
                        (false, true) => '▄',
                        (false, false) => ' ',
                    }
                })
                .collect()
        })
        .collect()
}

/// Draws the frame buffer onto the terminal.
pub struct Screen {
    out: Stdout,
}

impl Screen {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Renderer for Screen {
    fn render(&mut self, buffer: &DisplayBuffer) -> Result<(), DeviceError> {
        for (y, line) in render_rows(buffer).iter().enumerate() {
            queue!(self.out, cursor::MoveTo(0, y as u16), style::Print(line))
                .map_err(io::Error::from)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Keeps track of the keys that are currently held down.
#[derive(Debug, Default)]
pub struct HeldKeys {
    remaining: [u32; keyboard::SIZE],
}

impl HeldKeys {
    /// Registers a press (or a repeat) of the key, a new press is only
    /// reported if the key wasn't already held.
    pub fn press(&mut self, key: usize) -> Option<InputEvent> {
        let remaining = self.remaining.get_mut(key)?;
        let was_held = *remaining > 0;
        *remaining = HOLD_FRAMES;
        if was_held {
            None
        } else {
            Some(InputEvent::Key { key, pressed: true })
        }
    }

    /// Counts all held keys down by a frame and reports the released ones.
    pub fn tick(&mut self) -> Vec<InputEvent> {
        let mut released = Vec::new();
        for (key, remaining) in self.remaining.iter_mut().enumerate() {
            if *remaining > 0 {
                *remaining -= 1;
                if *remaining == 0 {
                    released.push(InputEvent::Key {
                        key,
                        pressed: false,
                    });
                }
            }
        }
        released
    }
}

/// Reads the keyboard without blocking.
#[derive(Debug, Default)]
pub struct Keys {
    held: HeldKeys,
}

impl Keys {
    pub fn new() -> Self {
        Self::default()
    }

    fn translate(&mut self, event: KeyEvent) -> Option<InputEvent> {
        match event.code {
            KeyCode::Esc => Some(InputEvent::Quit),
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(InputEvent::Quit)
            }
            KeyCode::Char(c) => match keymap::hex_key(c) {
                Some(key) => self.held.press(key),
                None => {
                    log::debug!("Ignoring the unmapped key '{}'.", c);
                    None
                }
            },
            _ => None,
        }
    }
}

impl Input for Keys {
    fn poll(&mut self) -> Result<Vec<InputEvent>, DeviceError> {
        let mut events = self.held.tick();
        while event::poll(Duration::from_millis(0)).map_err(io::Error::from)? {
            if let Event::Key(key) = event::read().map_err(io::Error::from)? {
                events.extend(self.translate(key));
            }
        }
        Ok(events)
    }
}

/// Rings the terminal bell whenever the sound timer starts.
#[derive(Debug, Default)]
pub struct Bell {
    beeping: bool,
}

impl Bell {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Audio for Bell {
    fn set_beeping(&mut self, beeping: bool) -> Result<(), DeviceError> {
        if beeping && !self.beeping {
            let mut out = io::stdout();
            out.write_all(b"\x07")?;
            out.flush()?;
        }
        self.beeping = beeping;
        Ok(())
    }
}
