use std::io;

use thiserror::Error;

use crate::opcode::Opcode;

#[derive(Error, Debug)]
pub enum RomError {
    #[error("Unable to read the rom '{name}'.")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("The rom '{name}' is {size} bytes long, but at most {max} bytes fit into memory.")]
    TooLarge {
        name: String,
        size: usize,
        max: usize,
    },
    #[error("Unable to read the rom archive '{0}'.")]
    Archive(#[from] zip::result::ZipError),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    InvalidOpcode(Opcode),
    #[error("Pointer location invalid there can not be an opcode at {pointer}, if data len is {len}")]
    MemoryInvalid { pointer: usize, len: usize },
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Full,
    #[error("Stack is empty!")]
    Empty,
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum ConfigError {
    #[error("The cpu has to execute at least one instruction per second.")]
    ZeroCycles,
    #[error("The frame rate has to be at least one frame per second.")]
    ZeroFrames,
}

/// An error reported by one of the external collaborators
/// (renderer, input source or audio output).
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Device input/output failed.")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Invalid configuration '{0}'.")]
    Config(#[from] ConfigError),
    #[error("The {device} device failed.")]
    Device {
        device: &'static str,
        #[source]
        source: DeviceError,
    },
}
