//! The ram of the chip.
use crate::{
    definitions::{cpu, display::fontset, memory},
    opcode::Opcode,
    resources::Rom,
};

/// The 4 KiB of byte addressable ram.
///
/// Every address is reduced with [`memory::ADDRESS_MASK`], so reads and
/// writes past the end wrap around to the start.
#[derive(Clone)]
pub struct Memory {
    data: Box<[u8; memory::SIZE]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Creates a zeroed ram with the font already in place.
    ///
    /// # Example
    /// ```rust
    /// # use chip::memory::Memory;
    /// let memory = Memory::new();
    /// assert_eq!(memory.read(0x000), 0xF0);
    /// assert_eq!(memory.read(0x200), 0x00);
    /// ```
    pub fn new() -> Self {
        let mut data = Box::new([0; memory::SIZE]);
        let start = fontset::LOCATION as usize;
        data[start..start + fontset::FONTSET.len()].copy_from_slice(&fontset::FONTSET);
        Self { data }
    }

    /// Copies the rom to the program start.
    /// The rom size has already been checked when the rom was created.
    pub fn load_rom(&mut self, rom: &Rom) {
        let start = cpu::PROGRAM_COUNTER as usize;
        let data = rom.get_data();
        let end = (start + data.len()).min(memory::SIZE);
        self.data[start..end].copy_from_slice(&data[..end - start]);
    }

    #[inline]
    pub fn read(&self, address: u16) -> u8 {
        self.data[(address & memory::ADDRESS_MASK) as usize]
    }

    #[inline]
    pub fn write(&mut self, address: u16, value: u8) {
        self.data[(address & memory::ADDRESS_MASK) as usize] = value;
    }

    /// Reads the big endian opcode at `address`, the second byte wraps to `0x000`
    /// if `address` is the last byte of the ram.
    pub fn read_opcode(&self, address: u16) -> Opcode {
        Opcode::from_be_bytes([self.read(address), self.read(address.wrapping_add(1))])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[..]
    }
}
