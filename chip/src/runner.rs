use std::time::Duration;

use crate::{
    chip8::ChipSet,
    config::Config,
    devices::{Audio, Input, InputEvent, Renderer},
    timer::FrameClock,
    ConfigError, RunError,
};

/// Drives the chip at a fixed frame rate.
///
/// Every frame the pending input is applied, a fixed amount of instructions
/// is run, the display is handed to the renderer if it changed, the timers
/// count down and the beeper is updated.
pub struct Runner<R, I, A>
where
    R: Renderer,
    I: Input,
    A: Audio,
{
    chip: ChipSet,
    renderer: R,
    input: I,
    audio: A,
    cycles_per_frame: u32,
    clock: FrameClock,
}

impl<R, I, A> Runner<R, I, A>
where
    R: Renderer,
    I: Input,
    A: Audio,
{
    pub fn new(
        chip: ChipSet,
        config: &Config,
        renderer: R,
        input: I,
        audio: A,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let cycles_per_frame = config.cycles_per_frame();
        log::info!(
            "Running '{}' with {} instructions per frame at {} frames per second.",
            chip.name(),
            cycles_per_frame,
            config.frames_per_second
        );

        Ok(Self {
            chip,
            renderer,
            input,
            audio,
            cycles_per_frame,
            clock: FrameClock::new(config.frame_duration()),
        })
    }

    /// Runs a single frame without waiting, returns `false` once the input
    /// asked to quit.
    pub fn run_frame(&mut self) -> Result<bool, RunError> {
        let events = self.input.poll().map_err(|source| RunError::Device {
            device: "input",
            source,
        })?;

        for event in events {
            match event {
                InputEvent::Key { key, pressed } => self.chip.set_pressed(key, pressed),
                InputEvent::Quit => {
                    log::info!("Quit requested.");
                    return Ok(false);
                }
            }
        }

        self.chip.frame(self.cycles_per_frame);

        if self.chip.get_display().is_dirty() {
            self.renderer
                .render(self.chip.get_display())
                .map_err(|source| RunError::Device {
                    device: "renderer",
                    source,
                })?;
            self.chip.mark_rendered();
        }

        // the beeper follows the sound timer as it was during this frame
        let beeping = self.chip.is_beeping();
        self.chip.tick_timers();
        self.audio
            .set_beeping(beeping)
            .map_err(|source| RunError::Device {
                device: "audio",
                source,
            })?;

        Ok(true)
    }

    /// Runs frames until the input asks to quit or a device fails.
    pub fn run(&mut self) -> Result<(), RunError> {
        log::debug!("Pacing frames every {:?}.", self.clock.interval());
        self.clock.reset();
        while self.run_frame()? {
            self.clock.wait();
        }
        Ok(())
    }

    pub fn cycles_per_frame(&self) -> u32 {
        self.cycles_per_frame
    }

    /// The wall clock time between two frames.
    pub fn frame_duration(&self) -> Duration {
        self.clock.interval()
    }

    pub fn chipset(&self) -> &ChipSet {
        &self.chip
    }

    pub fn chipset_mut(&mut self) -> &mut ChipSet {
        &mut self.chip
    }

    pub fn into_chipset(self) -> ChipSet {
        self.chip
    }
}
