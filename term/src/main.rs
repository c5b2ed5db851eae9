//! Runs a CHIP-8 rom inside of the terminal.
//!
//! The hex keypad is mapped onto the left hand side of the keyboard:
//!
//! ```text
//! Keypad       Keyboard
//! 1 2 3 C      1 2 3 4
//! 4 5 6 D      Q W E R
//! 7 8 9 E      A S D F
//! A 0 B F      Z X C V
//! ```
//!
//! Press **Escape** to quit.
mod keymap;
mod terminal;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chip::{
    chip8::ChipSet,
    config::{Config, Quirks},
    definitions::{cpu, timer},
    resources::{Rom, RomArchive},
    Runner,
};
use clap::{Parser, ValueEnum};
use env_logger::Env;

use crate::terminal::{Bell, Keys, Screen, TerminalGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// Every quirk disabled
    Modern,
    /// The original COSMAC VIP interpreter
    CosmacVip,
    /// The CHIP-48 interpreter
    Chip48,
}

impl From<Preset> for Quirks {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Modern => Quirks::modern(),
            Preset::CosmacVip => Quirks::cosmac_vip(),
            Preset::Chip48 => Quirks::chip48(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the rom file, or to a zip archive together with `--rom-name`
    rom: PathBuf,

    /// Name of the rom inside of the zip archive
    #[arg(long)]
    rom_name: Option<String>,

    /// List the roms inside of the zip archive and exit
    #[arg(long)]
    list: bool,

    /// Instructions per second
    #[arg(long, default_value_t = cpu::HERTZ)]
    hz: u32,

    /// Frames per second, the timers count down once per frame
    #[arg(long, default_value_t = timer::HERTZ)]
    fps: u32,

    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Start from the quirks of a historical interpreter
    #[arg(long, value_enum, default_value_t = Preset::Modern)]
    preset: Preset,

    /// `8XY1`, `8XY2` and `8XY3` reset `VF`
    #[arg(long)]
    quirk_vf_reset: bool,

    /// `8XY6` and `8XYE` shift `VY` into `VX`
    #[arg(long)]
    quirk_shift: bool,

    /// `FX55` and `FX65` leave `I` at `I + X + 1`
    #[arg(long)]
    quirk_load_store: bool,

    /// `FX55` and `FX65` leave `I` at `I + X`
    #[arg(long)]
    quirk_load_store_x: bool,
}

impl Args {
    fn config(&self) -> Config {
        let mut quirks = Quirks::from(self.preset);
        quirks.logic_resets_flag |= self.quirk_vf_reset;
        quirks.shift_uses_vy |= self.quirk_shift;
        quirks.memory_increments_index |= self.quirk_load_store;
        quirks.memory_increments_index_by_x |= self.quirk_load_store_x;

        Config {
            cycles_per_second: self.hz,
            frames_per_second: self.fps,
            quirks,
            seed: self.seed,
        }
    }

    fn load_rom(&self) -> Result<Rom> {
        match &self.rom_name {
            Some(name) => {
                let mut archive = RomArchive::open(&self.rom)
                    .with_context(|| format!("Unable to open the archive {}", self.rom.display()))?;
                archive
                    .rom(name)
                    .with_context(|| format!("Unable to load '{}' from the archive", name))
            }
            None => Rom::from_file(&self.rom)
                .with_context(|| format!("Unable to load the rom {}", self.rom.display())),
        }
    }
}

fn list_archive(args: &Args) -> Result<()> {
    let archive = RomArchive::open(&args.rom)
        .with_context(|| format!("Unable to open the archive {}", args.rom.display()))?;
    let mut names = archive.file_names();
    names.sort_unstable();
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if args.list {
        return list_archive(&args);
    }

    let config = args.config();
    config.validate().context("Invalid timing")?;
    let rom = args.load_rom()?;

    let chip = ChipSet::new(rom, &config);

    let guard = TerminalGuard::new().context("Unable to set up the terminal")?;
    let mut runner = Runner::new(chip, &config, Screen::new(), Keys::new(), Bell::new())?;
    let res = runner.run();
    drop(guard);

    log::debug!("{}", runner.chipset());
    res.context("The interpreter stopped")
}
