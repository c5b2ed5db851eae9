//! Opcode abstractions, functionality and constants.
use std::{convert::TryFrom, fmt};

use crate::{definitions::memory, OpcodeError};

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the first twelve bits
pub(crate) const OPCODE_MASK_FFF0: u16 = OPCODE_MASK_FFFF << 4;

/// the mask for the first eight bits
pub(crate) const OPCODE_MASK_FF00: u16 = OPCODE_MASK_FFFF << 8;

/// the mask for the first four bits
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the last four bits
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FFF0;

/// the mask for the last eight bits
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FF00;

/// the mask for the last twelve bits
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_F000;

/// the size of a single byte
const BYTE_SIZE: u16 = 0x8;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// will build an opcode from data and the given point
/// # Arguments
///
/// - `data` - A slice of u8 data entries used to generate the opcodes
/// - `pointer` - Where in the data the opcode shall be extracted, so `pointer` and `pointer + 1` make
/// the opcode up
///
/// # Example
/// ```rust
/// # use chip::opcode::*;
/// # use chip::OpcodeError;
///  const OPCODES: [Opcode; 2] = [0x00EE, 0x1EDA];
///  const SPLIT_OPCODE: [u8; 4] = [0x00, 0xEE, 0x1E, 0xDA];
///  for (i, val) in OPCODES.iter().enumerate() {
///      let opcode = build_opcode(&SPLIT_OPCODE, i * 2).expect("This will work.");
///      assert_eq!(opcode, *val);
///  }
/// # let pointer = 3;
/// # let err = OpcodeError::MemoryInvalid {pointer, len: SPLIT_OPCODE.len() };
/// # assert_eq!(
/// #    Err(err),
/// #    build_opcode(&SPLIT_OPCODE, pointer)
/// # );
/// ```
pub fn build_opcode(data: &[u8], pointer: usize) -> Result<Opcode, OpcodeError> {
    // controlling that there is no illegal access here
    if pointer + 1 < data.len() {
        Ok(Opcode::from_be_bytes([data[pointer], data[pointer + 1]]))
    } else {
        Err(OpcodeError::MemoryInvalid {
            pointer,
            len: data.len(),
        })
    }
}

/// These are special traits used to filter out information
/// from opcodes
pub trait OpcodeTrait {
    /// this is an opcode extractor that will return the
    /// opcode family `T` shifted down into the lowest nibble
    fn t(&self) -> u8;

    /// this is an opcode extractor for the opcode type `TNNN`
    /// - `T` is the opcode type
    /// - `NNN` is an address
    fn nnn(&self) -> u16;

    /// this is an opcode extractor for the opcode type `TXNN`
    /// - `T` is the opcode type
    /// - `X` is a register index
    /// - `NN` is a constant
    fn xnn(&self) -> (usize, u8);

    /// this is an opcode extractor for the opcode type `TXYN`
    /// - `T` is the opcode type
    /// - `X` is a register index
    /// - `Y` is a register index
    /// - `N` is a opcode subtype or a constant
    fn xyn(&self) -> (usize, usize, u8);

    /// this is an opcode extractor for the opcode type `TXYT`
    /// - `T` is the opcode type
    /// - `X` is a register index
    /// - `Y` is a register index
    fn xy(&self) -> (usize, usize);

    /// this is an opcode extractor for the opcode type `TXTT`
    /// - `T` is the opcode type
    /// - `X` is a register index
    fn x(&self) -> usize;
}

impl OpcodeTrait for Opcode {
    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.t(), 0x1);
    /// ```
    fn t(&self) -> u8 {
        ((self & OPCODE_MASK_F000) >> (3 * BYTE_SIZE / 2)) as u8
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.nnn(), 0xEDA)
    /// ```
    fn nnn(&self) -> u16 {
        self & OPCODE_MASK_0FFF
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.xnn(), (0xE, 0xDA));
    /// ```
    fn xnn(&self) -> (usize, u8) {
        let x = self.x();
        let nn = (self & OPCODE_MASK_00FF) as u8;
        (x, nn)
    }

    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.xyn(), (0xE, 0xD, 0xA));
    /// ```
    fn xyn(&self) -> (usize, usize, u8) {
        let (x, y) = self.xy();
        let n = (self & OPCODE_MASK_000F) as u8;
        (x, y, n)
    }

    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.xy(), (0xE, 0xD));
    /// ```
    fn xy(&self) -> (usize, usize) {
        let x = self.x();
        const MASK: u16 = OPCODE_MASK_00FF ^ OPCODE_MASK_000F;
        const NIBBLE: u16 = BYTE_SIZE / 2;
        let y = ((self & MASK) >> NIBBLE) as usize;
        (x, y)
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.x(), 0xE);
    /// ```
    fn x(&self) -> usize {
        ((self & OPCODE_MASK_0FFF & OPCODE_MASK_FF00) >> BYTE_SIZE) as usize
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents the program steps that the chip can take after an
/// instruction was executed.
///
/// The program counter has already been moved past the instruction during
/// the fetch, so all the steps are relative to the following instruction.
pub enum ProgramCounterStep {
    /// Continue with the following instruction
    Next,
    /// Skip the following instruction
    Skip,
    /// Execute the same instruction again during the next cycle
    Repeat,
    /// Will simply move the program counter to the given location.
    Jump(u16),
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Applies the step to the given (already advanced) program counter.
    /// The result is always kept inside of the memory.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Skip.apply(0x202), 0x204);
    /// assert_eq!(ProgramCounterStep::Repeat.apply(0x202), 0x200);
    /// assert_eq!(ProgramCounterStep::Jump(0x10FE).apply(0x202), 0x0FE);
    /// ```
    #[inline]
    pub fn apply(&self, pc: u16) -> u16 {
        let pc = match *self {
            ProgramCounterStep::Next => pc,
            ProgramCounterStep::Skip => pc.wrapping_add(memory::opcodes::SIZE),
            ProgramCounterStep::Repeat => pc.wrapping_sub(memory::opcodes::SIZE),
            ProgramCounterStep::Jump(pointer) => pointer,
        };
        pc & memory::ADDRESS_MASK
    }
}

/// Represents a step of the program counter
/// this requires the enum ProgramCounterStep
/// to work.
pub trait ProgramCounter {
    /// will move the program counter by a step.
    fn step(&mut self, step: ProgramCounterStep);
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents a command from the interpreter up to the frame driver.
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// The interpreter is waiting for a key to be pressed and released
    Wait,
    /// The display was changed
    Draw,
}

/// The register to register operations of the `8XYT` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arithmetic {
    /// `8XY0` - `Vx = Vy`
    Assign,
    /// `8XY1` - `Vx |= Vy`
    Or,
    /// `8XY2` - `Vx &= Vy`
    And,
    /// `8XY3` - `Vx ^= Vy`
    Xor,
    /// `8XY4` - `Vx += Vy`, `VF` is the carry
    Add,
    /// `8XY5` - `Vx -= Vy`, `VF` is the "no borrow" flag
    Sub,
    /// `8XY6` - `Vx >>= 1`, `VF` is the shifted out bit
    ShiftRight,
    /// `8XY7` - `Vx = Vy - Vx`, `VF` is the "no borrow" flag
    SubReverse,
    /// `8XYE` - `Vx <<= 1`, `VF` is the shifted out bit
    ShiftLeft,
}

impl TryFrom<u8> for Arithmetic {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let op = match value {
            0x0 => Arithmetic::Assign,
            0x1 => Arithmetic::Or,
            0x2 => Arithmetic::And,
            0x3 => Arithmetic::Xor,
            0x4 => Arithmetic::Add,
            0x5 => Arithmetic::Sub,
            0x6 => Arithmetic::ShiftRight,
            0x7 => Arithmetic::SubReverse,
            0xE => Arithmetic::ShiftLeft,
            _ => return Err(()),
        };
        Ok(op)
    }
}

/// A fully decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0` - Clears the screen.
    Clear,
    /// `00EE` - Returns from a subroutine.
    Return,
    /// `1NNN` - Jumps to address `NNN`.
    Jump { nnn: u16 },
    /// `2NNN` - Calls subroutine at `NNN`.
    Call { nnn: u16 },
    /// `3XNN` - Skips the next instruction if `VX` equals `NN`.
    SkipEqualConst { x: usize, nn: u8 },
    /// `4XNN` - Skips the next instruction if `VX` doesn't equal `NN`.
    SkipNotEqualConst { x: usize, nn: u8 },
    /// `5XY0` - Skips the next instruction if `VX` equals `VY`.
    SkipEqualRegister { x: usize, y: usize },
    /// `6XNN` - Sets `VX` to `NN`.
    LoadConst { x: usize, nn: u8 },
    /// `7XNN` - Adds `NN` to `VX`. (Carry flag is not changed)
    AddConst { x: usize, nn: u8 },
    /// `8XYT` - Register to register operations.
    Arithmetic { op: Arithmetic, x: usize, y: usize },
    /// `9XY0` - Skips the next instruction if `VX` doesn't equal `VY`.
    SkipNotEqualRegister { x: usize, y: usize },
    /// `ANNN` - Sets `I` to the address `NNN`.
    SetIndex { nnn: u16 },
    /// `BNNN` - Jumps to the address `NNN` plus `V0`.
    JumpOffset { nnn: u16 },
    /// `CXNN` - Sets `VX` to a random number and `NN`.
    Random { x: usize, nn: u8 },
    /// `DXYN` - Draws a sprite of height `N` at coordinate `(VX, VY)`.
    Draw { x: usize, y: usize, n: u8 },
    /// `EX9E` - Skips the next instruction if the key stored in `VX` is pressed.
    SkipKeyPressed { x: usize },
    /// `EXA1` - Skips the next instruction if the key stored in `VX` isn't pressed.
    SkipKeyReleased { x: usize },
    /// `FX07` - Sets `VX` to the value of the delay timer.
    GetDelayTimer { x: usize },
    /// `FX0A` - A key press and release is awaited, and then stored in `VX`.
    AwaitKey { x: usize },
    /// `FX15` - Sets the delay timer to `VX`.
    SetDelayTimer { x: usize },
    /// `FX18` - Sets the sound timer to `VX`.
    SetSoundTimer { x: usize },
    /// `FX1E` - Adds `VX` to `I`. `VF` is not affected.
    AddIndex { x: usize },
    /// `FX29` - Sets `I` to the location of the glyph for the character in `VX`.
    FontCharacter { x: usize },
    /// `FX33` - Stores the binary-coded decimal representation of `VX` at `I`.
    StoreBcd { x: usize },
    /// `FX55` - Stores `V0` to `VX` (including `VX`) in memory starting at address `I`.
    StoreRegisters { x: usize },
    /// `FX65` - Fills `V0` to `VX` (including `VX`) with values from memory starting at address `I`.
    LoadRegisters { x: usize },
}

impl TryFrom<Opcode> for Instruction {
    type Error = OpcodeError;

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        let err = || OpcodeError::InvalidOpcode(value);

        let nnn = value.nnn();
        let (x, nn) = value.xnn();
        let (_, y, n) = value.xyn();

        let instruction = match value.t() {
            0x0 => match value {
                0x00E0 => Instruction::Clear,
                0x00EE => Instruction::Return,
                // 0NNN machine code routines are not supported
                _ => return Err(err()),
            },
            0x1 => Instruction::Jump { nnn },
            0x2 => Instruction::Call { nnn },
            0x3 => Instruction::SkipEqualConst { x, nn },
            0x4 => Instruction::SkipNotEqualConst { x, nn },
            0x5 if n == 0 => Instruction::SkipEqualRegister { x, y },
            0x6 => Instruction::LoadConst { x, nn },
            0x7 => Instruction::AddConst { x, nn },
            0x8 => {
                let op = Arithmetic::try_from(n).map_err(|_| err())?;
                Instruction::Arithmetic { op, x, y }
            }
            0x9 if n == 0 => Instruction::SkipNotEqualRegister { x, y },
            0xA => Instruction::SetIndex { nnn },
            0xB => Instruction::JumpOffset { nnn },
            0xC => Instruction::Random { x, nn },
            0xD => Instruction::Draw { x, y, n },
            0xE => match nn {
                0x9E => Instruction::SkipKeyPressed { x },
                0xA1 => Instruction::SkipKeyReleased { x },
                _ => return Err(err()),
            },
            0xF => match nn {
                0x07 => Instruction::GetDelayTimer { x },
                0x0A => Instruction::AwaitKey { x },
                0x15 => Instruction::SetDelayTimer { x },
                0x18 => Instruction::SetSoundTimer { x },
                0x1E => Instruction::AddIndex { x },
                0x29 => Instruction::FontCharacter { x },
                0x33 => Instruction::StoreBcd { x },
                0x55 => Instruction::StoreRegisters { x },
                0x65 => Instruction::LoadRegisters { x },
                _ => return Err(err()),
            },
            _ => return Err(err()),
        };
        Ok(instruction)
    }
}

/// Disassembles the instruction into a short mnemonic, mostly used for tracing.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Clear => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump { nnn } => write!(f, "JP {:#05X}", nnn),
            Instruction::Call { nnn } => write!(f, "CALL {:#05X}", nnn),
            Instruction::SkipEqualConst { x, nn } => write!(f, "SE V{:X}, {:#04X}", x, nn),
            Instruction::SkipNotEqualConst { x, nn } => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            Instruction::SkipEqualRegister { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::LoadConst { x, nn } => write!(f, "LD V{:X}, {:#04X}", x, nn),
            Instruction::AddConst { x, nn } => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Instruction::Arithmetic { op, x, y } => {
                let name = match op {
                    Arithmetic::Assign => "LD",
                    Arithmetic::Or => "OR",
                    Arithmetic::And => "AND",
                    Arithmetic::Xor => "XOR",
                    Arithmetic::Add => "ADD",
                    Arithmetic::Sub => "SUB",
                    Arithmetic::ShiftRight => "SHR",
                    Arithmetic::SubReverse => "SUBN",
                    Arithmetic::ShiftLeft => "SHL",
                };
                write!(f, "{} V{:X}, V{:X}", name, x, y)
            }
            Instruction::SkipNotEqualRegister { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Instruction::SetIndex { nnn } => write!(f, "LD I, {:#05X}", nnn),
            Instruction::JumpOffset { nnn } => write!(f, "JP V0, {:#05X}", nnn),
            Instruction::Random { x, nn } => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Instruction::Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {:#03X}", x, y, n),
            Instruction::SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            Instruction::SkipKeyReleased { x } => write!(f, "SKNP V{:X}", x),
            Instruction::GetDelayTimer { x } => write!(f, "LD V{:X}, DT", x),
            Instruction::AwaitKey { x } => write!(f, "LD V{:X}, K", x),
            Instruction::SetDelayTimer { x } => write!(f, "LD DT, V{:X}", x),
            Instruction::SetSoundTimer { x } => write!(f, "LD ST, V{:X}", x),
            Instruction::AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            Instruction::FontCharacter { x } => write!(f, "LD F, V{:X}", x),
            Instruction::StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            Instruction::StoreRegisters { x } => write!(f, "LD [I], V{:X}", x),
            Instruction::LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use super::*;

    #[test]
    fn test_tryfrom_opcode_simple() {
        let value: Opcode = 0x00E0;
        let conv: Result<Instruction, _> = value.try_into();
        assert_eq!(conv, Ok(Instruction::Clear));
    }

    #[test]
    fn test_tryfrom_opcode_simple_fail() {
        let value: Opcode = 0x00E1;
        let conv: Result<Instruction, _> = value.try_into();
        assert_eq!(conv, Err(OpcodeError::InvalidOpcode(value)));
    }

    #[test]
    fn test_tryfrom_opcode_multiple() {
        let tests: &[(Opcode, Result<Instruction, &str>)] = &[
            // Zero
            (0x00E0, Ok(Instruction::Clear)),
            (0x00EE, Ok(Instruction::Return)),
            (0x00E1, Err("")),
            (0x0123, Err("")),
            // One
            (0x1919, Ok(Instruction::Jump { nnn: 0x919 })),
            // Two
            (0x2222, Ok(Instruction::Call { nnn: 0x222 })),
            // Three
            (0x3123, Ok(Instruction::SkipEqualConst { x: 0x1, nn: 0x23 })),
            // Four
            (0x4123, Ok(Instruction::SkipNotEqualConst { x: 0x1, nn: 0x23 })),
            // Five
            (0x5120, Ok(Instruction::SkipEqualRegister { x: 0x1, y: 0x2 })),
            (0x5121, Err("")),
            // Six
            (0x6123, Ok(Instruction::LoadConst { x: 0x1, nn: 0x23 })),
            // Seven
            (0x7123, Ok(Instruction::AddConst { x: 0x1, nn: 0x23 })),
            // Eight
            (
                0x8120,
                Ok(Instruction::Arithmetic {
                    op: Arithmetic::Assign,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x8124,
                Ok(Instruction::Arithmetic {
                    op: Arithmetic::Add,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x8127,
                Ok(Instruction::Arithmetic {
                    op: Arithmetic::SubReverse,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x812E,
                Ok(Instruction::Arithmetic {
                    op: Arithmetic::ShiftLeft,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (0x8128, Err("")),
            (0x812F, Err("")),
            // Nine
            (0x9120, Ok(Instruction::SkipNotEqualRegister { x: 0x1, y: 0x2 })),
            (0x9121, Err("")),
            // A
            (0xA222, Ok(Instruction::SetIndex { nnn: 0x222 })),
            // B
            (0xB222, Ok(Instruction::JumpOffset { nnn: 0x222 })),
            // C
            (0xC123, Ok(Instruction::Random { x: 0x1, nn: 0x23 })),
            // D
            (
                0xD123,
                Ok(Instruction::Draw {
                    x: 0x1,
                    y: 0x2,
                    n: 0x3,
                }),
            ),
            // E
            (0xE19E, Ok(Instruction::SkipKeyPressed { x: 0x1 })),
            (0xE1A1, Ok(Instruction::SkipKeyReleased { x: 0x1 })),
            (0xE111, Err("")),
            // F
            (0xF007, Ok(Instruction::GetDelayTimer { x: 0x0 })),
            (0xF00A, Ok(Instruction::AwaitKey { x: 0x0 })),
            (0xF015, Ok(Instruction::SetDelayTimer { x: 0x0 })),
            (0xF018, Ok(Instruction::SetSoundTimer { x: 0x0 })),
            (0xF01E, Ok(Instruction::AddIndex { x: 0x0 })),
            (0xF029, Ok(Instruction::FontCharacter { x: 0x0 })),
            (0xF033, Ok(Instruction::StoreBcd { x: 0x0 })),
            (0xF055, Ok(Instruction::StoreRegisters { x: 0x0 })),
            (0xF065, Ok(Instruction::LoadRegisters { x: 0x0 })),
            (0xF0AA, Err("")),
        ];
        for &(value, res) in tests {
            let conv: Result<Instruction, _> = value.try_into();
            assert_eq!(conv, res.map_err(|_| OpcodeError::InvalidOpcode(value)));
        }
    }

    #[test]
    fn test_step_apply_wraps() {
        assert_eq!(ProgramCounterStep::Next.apply(0x202), 0x202);
        assert_eq!(ProgramCounterStep::Skip.apply(0xFFE), 0x000);
        assert_eq!(ProgramCounterStep::Repeat.apply(0x000), 0xFFE);
        assert_eq!(ProgramCounterStep::Jump(0x345).apply(0x202), 0x345);
    }

    #[test]
    fn test_disassembly() {
        let tests = [
            (0x00E0, "CLS"),
            (0x1234, "JP 0x234"),
            (0x6A05, "LD VA, 0x05"),
            (0x8AB6, "SHR VA, VB"),
            (0xD015, "DRW V0, V1, 0x5"),
            (0xF30A, "LD V3, K"),
            (0xF555, "LD [I], V5"),
        ];
        for (opcode, expected) in tests {
            let instruction = Instruction::try_from(opcode as Opcode).expect("valid opcode");
            assert_eq!(instruction.to_string(), expected);
        }
    }
}
