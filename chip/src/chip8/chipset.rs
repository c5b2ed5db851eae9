use std::convert::TryFrom;

use {
    crate::{
        config::{Config, Quirks},
        definitions::{cpu, keyboard, memory},
        devices::{KeyWait, Keyboard},
        display::DisplayBuffer,
        memory::Memory,
        opcode::{Instruction, Opcode, Operation, ProgramCounter, ProgramCounterStep},
        resources::Rom,
        timer::Timer,
        StackError,
    },
    rand::{rngs::StdRng, RngCore, SeedableRng},
    tinyvec::ArrayVec,
};

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// Chip8 CPU.
pub struct ChipSet {
    /// name of the loaded rom
    pub(super) name: String,
    /// the loaded rom, kept around for resetting the chip
    pub(super) rom: Rom,
    /// the last fetched opcode, all two bytes long and stored big-endian
    pub(super) opcode: Opcode,
    /// - `0x000-0x04F` - Used for the built in `4x5` pixel font set (`0-F`)
    /// - `0x050-0x1FF` - Reserved for the interpreter
    /// - `0x200-0xFFF` - Program ROM and work RAM
    pub(super) memory: Memory,
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles as a flag for some
    /// instructions; thus, it should be avoided. In an addition operation, `VF` is the carry flag,
    /// while in subtraction, it is the "no borrow" flag. In the draw instruction `VF` is set upon
    /// pixel collision.
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special register entry
    /// called index `I`, always kept inside of the memory
    pub(super) index_register: u16,
    /// The program counter has the address of the next instruction to be fetched from memory.
    pub(super) program_counter: u16,
    /// The stack is only used to store return addresses when subroutines are called. The original
    /// [RCA 1802](https://de.wikipedia.org/wiki/RCA1802) version allocated `48` bytes for up to
    /// `12` levels of nesting; modern implementations usually have more.
    /// (here we are using `16`)
    pub(super) stack: ArrayVec<[u16; cpu::stack::SIZE]>,
    /// Delay timer: This timer is intended to be used for timing the events of games. Its value
    /// can be set and read.
    /// Counts down once per frame, until it reaches 0.
    pub(super) delay_timer: Timer,
    /// Sound timer: This timer is used for sound effects. When its value is nonzero, a beeping
    /// sound is made.
    /// Counts down once per frame, until it reaches 0.
    pub(super) sound_timer: Timer,
    /// The graphics of the Chip 8 are black and white and the screen has a total of `2048` pixels
    /// `(64 x 32)`.
    pub(super) display: DisplayBuffer,
    pub(super) keyboard: Keyboard,
    pub(super) quirks: Quirks,
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
}

impl ChipSet {
    /// will create a new chipset object
    pub fn new(rom: Rom, config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rom, config.quirks, Box::new(rng))
    }

    /// will create a new chipset object with the given random number generator
    pub fn with_rng(rom: Rom, quirks: Quirks, rng: Box<dyn RngCore + Send>) -> Self {
        let mut ram = Memory::new();
        ram.load_rom(&rom);

        log::debug!(
            "Loaded the rom '{}' with {} bytes.",
            rom.get_name(),
            rom.get_data().len()
        );

        Self {
            name: rom.get_name().to_string(),
            rom,
            opcode: 0,
            memory: ram,
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER,
            stack: ArrayVec::new(),
            delay_timer: Timer::new(0),
            sound_timer: Timer::new(0),
            display: DisplayBuffer::new(),
            keyboard: Keyboard::new(),
            quirks,
            rng,
        }
    }

    /// Puts the chip back into the state right after the rom was loaded.
    pub fn reset(&mut self) {
        self.memory = Memory::new();
        self.memory.load_rom(&self.rom);
        self.opcode = 0;
        self.registers = [0; cpu::register::SIZE];
        self.index_register = 0;
        self.program_counter = cpu::PROGRAM_COUNTER;
        self.stack.clear();
        self.delay_timer = Timer::new(0);
        self.sound_timer = Timer::new(0);
        self.display.clear();
        self.keyboard.reset();
    }

    /// will advance the program by a single instruction
    ///
    /// Opcodes that are not supported are skipped.
    pub fn cycle(&mut self) -> Operation {
        let pointer = self.program_counter;
        self.opcode = self.memory.read_opcode(pointer);
        // move past the instruction before executing it
        self.program_counter = pointer.wrapping_add(memory::opcodes::SIZE) & memory::ADDRESS_MASK;

        match Instruction::try_from(self.opcode) {
            Ok(instruction) => {
                log::trace!("{:#05X}: {}", pointer, instruction);
                let (step, operation) = self.execute(instruction);
                self.step(step);
                operation
            }
            Err(err) => {
                log::debug!("{:#05X}: skipping, {}", pointer, err);
                Operation::None
            }
        }
    }

    /// Runs the given amount of instructions.
    pub fn frame(&mut self, cycles: u32) {
        for _ in 0..cycles {
            self.cycle();
        }
    }

    /// Counts both of the timers down by one step, called once per frame.
    pub fn tick_timers(&mut self) {
        self.delay_timer.tick();
        self.sound_timer.tick();
    }

    /// Will write keyboard data into interncal keyboard representation.
    pub fn set_keyboard(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keyboard.set_mult(keys);
    }

    /// Will set the value of the given key
    pub fn set_pressed(&mut self, key: usize, pressed: bool) {
        self.keyboard.set_pressed(key, pressed)
    }

    /// Will get the current state of the keyboard
    pub fn get_keyboard(&self) -> &[bool] {
        self.keyboard.get_keys()
    }

    /// The progress of a pending `FX0A`
    pub fn key_wait(&self) -> KeyWait {
        self.keyboard.wait_state()
    }

    /// Will return the current frame buffer
    pub fn get_display(&self) -> &DisplayBuffer {
        &self.display
    }

    /// Marks the frame buffer as shown.
    pub fn mark_rendered(&mut self) {
        self.display.mark_clean()
    }

    /// will return the sound timer
    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.get_value()
    }

    /// will return the delay timer
    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.get_value()
    }

    /// A beep is played as long as the sound timer is running
    pub fn is_beeping(&self) -> bool {
        self.sound_timer.is_active()
    }

    /// Reads the register `V{index}`, only the low nibble of the index is used
    pub fn register(&self, index: usize) -> u8 {
        self.registers[index & cpu::register::LAST]
    }

    /// Writes the register `V{index}`, only the low nibble of the index is used
    pub fn set_register(&mut self, index: usize, value: u8) {
        self.registers[index & cpu::register::LAST] = value;
    }

    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    pub fn index_register(&self) -> u16 {
        self.index_register
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// The amount of nested subroutine calls
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Will return the name of the loaded rom
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// Will push the return address to the stack
    pub(super) fn push_stack(&mut self, pointer: u16) -> Result<(), StackError> {
        if self.stack.len() == self.stack.capacity() {
            Err(StackError::Full)
        } else {
            self.stack.push(pointer);
            Ok(())
        }
    }

    /// Will pop the last return address from the stack
    pub(super) fn pop_stack(&mut self) -> Result<u16, StackError> {
        self.stack.pop().ok_or(StackError::Empty)
    }
}

impl ProgramCounter for ChipSet {
    fn step(&mut self, step: ProgramCounterStep) {
        self.program_counter = step.apply(self.program_counter);
    }
}
