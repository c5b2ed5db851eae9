//! The state dump of the [`ChipSet`](super::ChipSet), written at `debug` level when the
//! terminal front end exits.

use super::*;
use crate::definitions::cpu;
use once_cell::sync::Lazy;
use std::fmt;

/// Values per dumped row.
const HEX_PRINT_STEP: usize = 8;

const END_OF_LINE: char = '\n';
const INDENT_FILLAMENT: char = '\t';
const INDENT_SIZE: usize = 2;

fn indent_helper(text: &mut String, indent: usize) {
    for _ in 0..indent {
        text.push(INDENT_FILLAMENT);
    }
}

macro_rules! intformat {
    () => {
        // `0x` followed by four hex digits
        "{:#06X}"
    };
}

macro_rules! rangeformat {
    () => {
        concat!(intformat!(), " - ", intformat!(), " :")
    };
}

static POINTER_LEN: Lazy<usize> = Lazy::new(|| format!(rangeformat!(), 0, 0).len());

static INTEGER_LEN: Lazy<usize> = Lazy::new(|| format!(intformat!(), 0u8).len());

/// Upper bound of a single dumped row.
static LENLINE: Lazy<usize> =
    Lazy::new(|| INDENT_SIZE + HEX_PRINT_STEP * (*INTEGER_LEN + 1) + 1 + *POINTER_LEN);

/// The `from - to :` address column.
mod pointer_print {
    use std::fmt::Write;

    pub(super) fn formatter(
        line: &mut String,
        from: usize,
        to: usize,
    ) -> Result<(), std::fmt::Error> {
        write!(line, rangeformat!(), from, to)
    }
}

/// The memory dump, two bytes per column.
mod opcode_print {
    use super::{integer_print, pointer_print, HEX_PRINT_STEP};
    use crate::{
        definitions::memory,
        opcode::{self, Opcode},
    };
    use once_cell::sync::Lazy;
    use std::fmt::{self, Write};

    /// Bytes covered by a single row.
    const POINTER_INCREMENT: usize = HEX_PRINT_STEP * memory::opcodes::SIZE as usize;
    const FILLER_BASE: &str = "...";

    /// Stands in for a run of rows that are all zero.
    static ZERO_FILLER: Lazy<String> = Lazy::new(|| {
        let zero = format!(intformat!(), 0u16);
        let length = zero.len() * (HEX_PRINT_STEP - 2) + (HEX_PRINT_STEP - 1) - FILLER_BASE.len();
        let filler = " ".repeat(length / 2);
        format!("{}{}{}{}{}", zero, filler, FILLER_BASE, filler, zero)
    });

    struct Row {
        from: usize,
        to: usize,
        data: [Opcode; HEX_PRINT_STEP],
        only_null: bool,
    }

    impl fmt::Display for Row {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut res = String::with_capacity(*super::LENLINE);
            pointer_print::formatter(&mut res, self.from, self.to)?;
            res.push(' ');

            if !self.only_null {
                for entry in self.data.iter() {
                    integer_print::formatter(&mut res, *entry)?;
                    res.push(' ');
                }
                if let Some(index) = res.rfind(' ') {
                    res.truncate(index);
                }
            } else {
                res.push_str(&ZERO_FILLER)
            }
            write!(f, "{}", res)
        }
    }

    /// Dumps the whole memory, addresses count from the start of the slice
    /// and consecutive rows of zeros collapse into one.
    pub(super) fn printer(memory: &[u8], indent: usize) -> Result<String, fmt::Error> {
        let data_last_index = memory.len() - 1;
        let mut rows: Vec<Row> = Vec::with_capacity(memory.len() / POINTER_INCREMENT);

        for from in (0..memory.len()).step_by(POINTER_INCREMENT) {
            let to = (from + POINTER_INCREMENT - 1).min(data_last_index);

            let mut data = [0; HEX_PRINT_STEP];
            let mut only_null = true;

            for (data_index, index) in (from..=to).step_by(memory::opcodes::SIZE as usize).enumerate() {
                data[data_index] = opcode::build_opcode(memory, index).map_err(|_| fmt::Error)?;
                if data[data_index] > 0 {
                    only_null = false;
                }
            }

            let mut row = Row {
                from,
                to,
                data,
                only_null,
            };

            if only_null {
                if let Some(last_row) = rows.last() {
                    if last_row.only_null {
                        row.from = last_row.from;
                        rows.pop();
                    }
                }
            }
            rows.push(row)
        }

        let mut string = String::with_capacity((*super::LENLINE + 1) * rows.len());
        for row in rows {
            super::indent_helper(&mut string, indent);
            write!(string, "{}{}", row, super::END_OF_LINE)?;
        }
        if let Some(index) = string.rfind(super::END_OF_LINE) {
            string.truncate(index);
        }
        Ok(string)
    }
}

/// Registers, stack entries and timers.
mod integer_print {
    use super::{pointer_print, HEX_PRINT_STEP};
    use num_traits::Unsigned;
    use std::fmt::{self, Write};

    pub(super) fn formatter<T>(line: &mut String, data: T) -> Result<(), fmt::Error>
    where
        T: fmt::UpperHex + Unsigned + Copy,
    {
        write!(line, intformat!(), data)
    }

    pub(super) fn printer<T>(data: &[T], indent: usize) -> Result<String, fmt::Error>
    where
        T: fmt::UpperHex + Unsigned + Copy,
    {
        let result_size = *super::LENLINE * (data.len() / HEX_PRINT_STEP + 1);

        let mut res = String::with_capacity(result_size);
        for i in (0..data.len()).step_by(HEX_PRINT_STEP) {
            let n = (i + HEX_PRINT_STEP - 1).min(data.len() - 1);

            super::indent_helper(&mut res, indent);
            pointer_print::formatter(&mut res, i, n)?;

            for entry in &data[i..=n] {
                res.push(' ');
                formatter(&mut res, *entry)?;
            }
            res.push(super::END_OF_LINE);
        }

        if let Some(index) = res.rfind(super::END_OF_LINE) {
            res.truncate(index);
        }

        Ok(res)
    }
}

/// The keypad state.
mod bool_print {
    use super::{pointer_print, END_OF_LINE, HEX_PRINT_STEP};
    use once_cell::sync::Lazy;

    static TRUE: Lazy<String> = Lazy::new(|| formatter("true"));
    static FALSE: Lazy<String> = Lazy::new(|| formatter("false"));

    /// Pads to the width of a hex column.
    fn formatter(message: &str) -> String {
        format!("{:<width$}", message, width = *super::INTEGER_LEN)
    }

    pub(super) fn printer(data: &[bool], indent: usize) -> Result<String, std::fmt::Error> {
        let result_size = *super::LENLINE * (data.len() / HEX_PRINT_STEP + 1);

        let mut res = String::with_capacity(result_size);

        let check_type = |val: bool| if val { &*TRUE } else { &*FALSE };

        for i in (0..data.len()).step_by(HEX_PRINT_STEP) {
            let n = (i + HEX_PRINT_STEP - 1).min(data.len() - 1);
            super::indent_helper(&mut res, indent);

            pointer_print::formatter(&mut res, i, n)?;
            res.push(' ');

            for value in &data[i..n] {
                res.push_str(check_type(*value));
                res.push(' ');
            }
            res.push_str(check_type(data[n]).trim_end());
            res.push(END_OF_LINE);
        }
        if let Some(index) = res.rfind(END_OF_LINE) {
            res.truncate(index);
        }

        Ok(res)
    }
}

fn single_integer<T>(value: T) -> Result<String, fmt::Error>
where
    T: fmt::UpperHex + num_traits::Unsigned + Copy,
{
    let mut line = String::with_capacity(*INTEGER_LEN + INDENT_SIZE);
    indent_helper(&mut line, INDENT_SIZE);
    integer_print::formatter(&mut line, value)?;
    Ok(line)
}

impl fmt::Display for ChipSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut nam = String::with_capacity(INDENT_SIZE + self.name.len());
        indent_helper(&mut nam, INDENT_SIZE);
        nam.push_str(&self.name);

        let mem = opcode_print::printer(self.memory.as_slice(), INDENT_SIZE)?;
        let reg = integer_print::printer(&self.registers, INDENT_SIZE)?;

        // unused stack slots are shown as zero
        let mut stack = [0u16; cpu::stack::SIZE];
        stack[..self.stack.len()].copy_from_slice(&self.stack);

        let sta = integer_print::printer(&stack, INDENT_SIZE)?;
        let key = bool_print::printer(self.keyboard.get_keys(), INDENT_SIZE)?;

        let opc = single_integer(self.opcode)?;
        let prc = single_integer(self.program_counter)?;
        let idx = single_integer(self.index_register)?;
        let dly = single_integer(self.delay_timer.get_value())?;
        let snd = single_integer(self.sound_timer.get_value())?;

        write!(
            f,
            "Chipset {{\n\
                \tProgram Name :\n{}\n\
                \tOpcode :\n{}\n\
                \tProgram Counter :\n{}\n\
                \tIndex Register :\n{}\n\
                \tDelay Timer :\n{}\n\
                \tSound Timer :\n{}\n\
                \tMemory :\n{}\n\
                \tKeyboard :\n{}\n\
                \tStack :\n{}\n\
                \tRegister :\n{}\n\
                }}",
            nam, opc, prc, idx, dly, snd, mem, key, sta, reg
        )
    }
}
