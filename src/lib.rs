//! 65C816 CPU core and system bus for the Super Famicom / SNES.
//!
//! The [`Bus`] maps 24-bit CPU addresses onto work RAM, cartridge ROM and
//! SRAM, and the B-bus register ports. [`Cpu`] executes the full 256-entry
//! instruction set against anything implementing [`CpuBus`].

pub mod bus;
pub mod cartridge;
pub mod config;
pub mod cpu;
pub mod cpu_bus;
pub mod debug_flags;
pub mod error;
pub mod memory;
pub mod ports;

pub use bus::{Bus, Location, Mapper};
pub use cartridge::{Cartridge, RomType};
pub use config::CoreConfig;
pub use cpu::{Cpu, CpuState, StatusFlags, StepEvent, StepOutcome};
pub use cpu_bus::CpuBus;
pub use error::{CoreError, Result};
pub use memory::MemoryAddress;
pub use ports::{PortHandler, PortId};
