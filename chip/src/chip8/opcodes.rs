use tinyvec::ArrayVec;

use super::ChipSet;
use crate::{
    definitions::{cpu, display::fontset, memory},
    opcode::{Arithmetic, Instruction, Operation, ProgramCounterStep},
};

impl ChipSet {
    /// Runs a single decoded instruction, the program counter already points
    /// past it.
    pub(super) fn execute(&mut self, instruction: Instruction) -> (ProgramCounterStep, Operation) {
        let step = match instruction {
            Instruction::Clear => {
                self.display.clear();
                return (ProgramCounterStep::Next, Operation::Draw);
            }
            Instruction::Return => match self.pop_stack() {
                Ok(pointer) => ProgramCounterStep::Jump(pointer),
                Err(err) => {
                    log::warn!("Ignoring the return at {:#05X}: {}", self.program_counter, err);
                    ProgramCounterStep::Next
                }
            },
            Instruction::Jump { nnn } => ProgramCounterStep::Jump(nnn),
            Instruction::Call { nnn } => match self.push_stack(self.program_counter) {
                Ok(_) => ProgramCounterStep::Jump(nnn),
                Err(err) => {
                    log::warn!("Ignoring the call to {:#05X}: {}", nnn, err);
                    ProgramCounterStep::Next
                }
            },
            Instruction::SkipEqualConst { x, nn } => ProgramCounterStep::cond(self.registers[x] == nn),
            Instruction::SkipNotEqualConst { x, nn } => {
                ProgramCounterStep::cond(self.registers[x] != nn)
            }
            Instruction::SkipEqualRegister { x, y } => {
                ProgramCounterStep::cond(self.registers[x] == self.registers[y])
            }
            Instruction::SkipNotEqualRegister { x, y } => {
                ProgramCounterStep::cond(self.registers[x] != self.registers[y])
            }
            Instruction::LoadConst { x, nn } => {
                self.registers[x] = nn;
                ProgramCounterStep::Next
            }
            Instruction::AddConst { x, nn } => {
                // let VX overflow, but ignore carry
                self.registers[x] = self.registers[x].wrapping_add(nn);
                ProgramCounterStep::Next
            }
            Instruction::Arithmetic { op, x, y } => {
                self.arithmetic(op, x, y);
                ProgramCounterStep::Next
            }
            Instruction::SetIndex { nnn } => {
                self.index_register = nnn;
                ProgramCounterStep::Next
            }
            Instruction::JumpOffset { nnn } => {
                ProgramCounterStep::Jump(nnn.wrapping_add(self.registers[0] as u16))
            }
            Instruction::Random { x, nn } => {
                self.random(x, nn);
                ProgramCounterStep::Next
            }
            Instruction::Draw { x, y, n } => {
                self.draw(x, y, n);
                return (ProgramCounterStep::Next, Operation::Draw);
            }
            Instruction::SkipKeyPressed { x } => {
                ProgramCounterStep::cond(self.keyboard.is_pressed(self.registers[x]))
            }
            Instruction::SkipKeyReleased { x } => {
                ProgramCounterStep::cond(!self.keyboard.is_pressed(self.registers[x]))
            }
            Instruction::GetDelayTimer { x } => {
                self.registers[x] = self.delay_timer.get_value();
                ProgramCounterStep::Next
            }
            Instruction::AwaitKey { x } => return self.await_key(x),
            Instruction::SetDelayTimer { x } => {
                self.delay_timer.set_value(self.registers[x]);
                ProgramCounterStep::Next
            }
            Instruction::SetSoundTimer { x } => {
                self.sound_timer.set_value(self.registers[x]);
                ProgramCounterStep::Next
            }
            Instruction::AddIndex { x } => {
                // VF is not affected
                self.index_register =
                    self.index_register.wrapping_add(self.registers[x] as u16) & memory::ADDRESS_MASK;
                ProgramCounterStep::Next
            }
            Instruction::FontCharacter { x } => {
                let character = (self.registers[x] & 0xF) as u16;
                self.index_register = fontset::LOCATION + character * fontset::GLYPH_SIZE;
                ProgramCounterStep::Next
            }
            Instruction::StoreBcd { x } => {
                self.store_bcd(x);
                ProgramCounterStep::Next
            }
            Instruction::StoreRegisters { x } => {
                for offset in 0..=x {
                    let address = self.index_register.wrapping_add(offset as u16);
                    self.memory.write(address, self.registers[offset]);
                }
                self.advance_index(x);
                ProgramCounterStep::Next
            }
            Instruction::LoadRegisters { x } => {
                for offset in 0..=x {
                    let address = self.index_register.wrapping_add(offset as u16);
                    self.registers[offset] = self.memory.read(address);
                }
                self.advance_index(x);
                ProgramCounterStep::Next
            }
        };
        (step, Operation::None)
    }

    /// `8XYT`
    ///
    /// The flag is calculated from the operands before the operation and
    /// written after `VX`, so that it wins if `X` is `F`.
    fn arithmetic(&mut self, op: Arithmetic, x: usize, y: usize) {
        let vx = self.registers[x];
        let vy = self.registers[y];

        let (result, flag) = match op {
            Arithmetic::Assign => (vy, None),
            Arithmetic::Or => (vx | vy, self.logic_flag()),
            Arithmetic::And => (vx & vy, self.logic_flag()),
            Arithmetic::Xor => (vx ^ vy, self.logic_flag()),
            Arithmetic::Add => {
                let (result, carry) = vx.overflowing_add(vy);
                (result, Some(u8::from(carry)))
            }
            Arithmetic::Sub => (vx.wrapping_sub(vy), Some(u8::from(vx >= vy))),
            Arithmetic::SubReverse => (vy.wrapping_sub(vx), Some(u8::from(vy >= vx))),
            Arithmetic::ShiftRight => {
                let source = self.shift_source(vx, vy);
                (source >> 1, Some(source & 0x1))
            }
            Arithmetic::ShiftLeft => {
                let source = self.shift_source(vx, vy);
                (source << 1, Some(source >> 7))
            }
        };

        self.registers[x] = result;
        if let Some(flag) = flag {
            self.registers[cpu::register::LAST] = flag;
        }
    }

    fn logic_flag(&self) -> Option<u8> {
        if self.quirks.logic_resets_flag {
            Some(0)
        } else {
            None
        }
    }

    fn shift_source(&self, vx: u8, vy: u8) -> u8 {
        if self.quirks.shift_uses_vy {
            vy
        } else {
            vx
        }
    }

    /// `CXNN`
    /// Sets VX to the result of a bitwise and operation on a random number and NN.
    fn random(&mut self, x: usize, nn: u8) {
        let mut byte = [0u8; 1];
        self.rng.fill_bytes(&mut byte);
        self.registers[x] = byte[0] & nn;
    }

    /// `DXYN`
    /// Draws a sprite at coordinate `(VX, VY)` that has a width of `8` pixels and a height of
    /// `N` pixels. Each row of `8` pixels is read as bit-coded starting from memory location `I`;
    /// `I` value doesn’t change after the execution of this instruction. `VF` is set to `1` if
    /// any screen pixels are flipped from set to unset when the sprite is drawn, and to `0` if
    /// that doesn’t happen.
    fn draw(&mut self, x: usize, y: usize, n: u8) {
        let vx = self.registers[x];
        let vy = self.registers[y];

        let mut sprite: ArrayVec<[u8; 16]> = ArrayVec::new();
        for row in 0..n as u16 {
            sprite.push(self.memory.read(self.index_register.wrapping_add(row)));
        }

        let collision = self.display.draw_sprite(vx, vy, &sprite);
        self.registers[cpu::register::LAST] = u8::from(collision);
    }

    /// `FX0A`
    /// A key press is awaited and stored in `VX` once the key is released again.
    /// Until then the instruction is repeated.
    fn await_key(&mut self, x: usize) -> (ProgramCounterStep, Operation) {
        match self.keyboard.poll_wait() {
            Some(key) => {
                log::debug!("Received the key {:#X}.", key);
                self.registers[x] = key;
                (ProgramCounterStep::Next, Operation::None)
            }
            None => (ProgramCounterStep::Repeat, Operation::Wait),
        }
    }

    /// `FX33`
    /// Stores the hundreds of `VX` at `I`, the tens at `I + 1` and the ones at `I + 2`.
    fn store_bcd(&mut self, x: usize) {
        let value = self.registers[x];
        let digits = [value / 100, (value / 10) % 10, value % 10];
        for (offset, digit) in digits.iter().enumerate() {
            self.memory
                .write(self.index_register.wrapping_add(offset as u16), *digit);
        }
    }

    /// `FX55` and `FX65` optionally leave `I` behind the touched memory.
    fn advance_index(&mut self, x: usize) {
        let advance = self.quirks.index_advance(x);
        self.index_register = self.index_register.wrapping_add(advance) & memory::ADDRESS_MASK;
    }
}
