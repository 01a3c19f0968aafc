//! Error type shared by the cartridge loader, the bus and the CPU core.

use crate::memory::MemoryAddress;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The dispatcher refused to execute an opcode. The program counter is
    /// left pointing at the offending byte.
    #[error("illegal opcode 0x{opcode:02X} at {address}")]
    IllegalOpcode { opcode: u8, address: MemoryAddress },

    /// `step()` was called after the core halted (STP, or an illegal opcode
    /// with halting enabled). Only `initialise()` clears this.
    #[error("CPU is stopped (last PC {address})")]
    Stopped { address: MemoryAddress },

    /// The cartridge declares a mapping the mapper does not implement.
    #[error("invalid mapping configuration (map mode 0x{0:02X})")]
    InvalidMappingConfiguration(u8),

    #[error("invalid ROM image: {0}")]
    InvalidRom(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
