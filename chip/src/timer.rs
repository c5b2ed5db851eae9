use std::{
    thread,
    time::{Duration, Instant},
};

/// Represents a timer inside of the chip
/// infrastructure, it will count down to
/// zero from what ever number it was given,
/// one step per frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    value: u8,
}

impl Timer {
    /// Will create a new timer with the given value.
    pub(crate) fn new(value: u8) -> Self {
        Self { value }
    }

    /// Will set the value from which the timer shall count down from.
    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    /// Will get the value that the counter is currently at.
    pub fn get_value(&self) -> u8 {
        self.value
    }

    /// Counts down by one, stopping at zero.
    pub fn tick(&mut self) {
        self.value = self.value.saturating_sub(1);
    }

    pub fn is_active(&self) -> bool {
        self.value > 0
    }
}

/// Paces the frame loop to a fixed interval.
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    deadline: Instant,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: Instant::now() + interval,
        }
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    /// Restarts the current frame now.
    pub fn reset(&mut self) {
        self.deadline = Instant::now() + self.interval;
    }

    /// Sleeps until the end of the current frame.
    ///
    /// If the loop fell behind by more than a frame the clock starts over
    /// instead of trying to catch up.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.deadline.checked_duration_since(now) {
            thread::sleep(remaining);
            self.deadline += self.interval;
        } else if now - self.deadline > self.interval {
            log::debug!("Frame took too long, skipping ahead.");
            self.deadline = now + self.interval;
        } else {
            self.deadline += self.interval;
        }
    }
}
