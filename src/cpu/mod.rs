//! 65C816 main CPU.

pub mod addressing;
mod alu;
mod execute;
pub mod interrupt;
pub mod opcodes;
mod stack;
pub mod state;


pub use addressing::{AddressingMode, Resolved};
pub use interrupt::Interrupt;
pub use opcodes::{Instruction, Mnemonic, OPCODES};
pub use state::{CpuState, StatusFlags};

use crate::config::CoreConfig;
use crate::cpu_bus::CpuBus;
use crate::debug_flags;
use crate::error::{CoreError, Result};
use crate::memory::MemoryAddress;
use execute::Flow;

/// The only reserved slot in the table (WDM).
const RESERVED_OPCODE: u8 = 0x42;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    Executed { opcode: u8, mnemonic: Mnemonic },
    Interrupt(Interrupt),
    /// Parked by WAI; no instruction was fetched.
    Waiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// PB:PC at the start of the step.
    pub address: MemoryAddress,
    pub event: StepEvent,
    pub cycles: u32,
}

impl StepOutcome {
    pub fn opcode(&self) -> Option<u8> {
        match self.event {
            StepEvent::Executed { opcode, .. } => Some(opcode),
            _ => None,
        }
    }
}

pub struct Cpu {
    state: CpuState,
    strict_reserved: bool,
    halt_on_illegal: bool,
}

impl Cpu {
    pub fn new() -> Self {
        Self::with_config(&CoreConfig::default())
    }

    pub fn with_config(config: &CoreConfig) -> Self {
        Cpu {
            state: CpuState::new(),
            strict_reserved: config.strict_reserved,
            halt_on_illegal: config.halt_on_illegal,
        }
    }

    pub fn state(&self) -> &CpuState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    /// Copy of the register file.
    pub fn snapshot(&self) -> CpuState {
        self.state.clone()
    }

    pub fn cycles(&self) -> u64 {
        self.state.cycles
    }

    /// Power-on reset: documented register defaults, then PC from the
    /// emulation reset vector at $00:FFFC. Clears any halt.
    pub fn initialise<B: CpuBus>(&mut self, bus: &mut B) {
        self.state = CpuState::new();
        self.state.pc = bus.read_u16(MemoryAddress::new(0, interrupt::RESET_VECTOR));
        log::debug!("CPU reset: PC={}", self.state.program_address());
    }

    /// Execute one instruction, or service one pending interrupt.
    pub fn step<B: CpuBus>(&mut self, bus: &mut B) -> Result<StepOutcome> {
        let address = self.state.program_address();
        if self.state.stopped {
            return Err(CoreError::Stopped { address });
        }

        if bus.poll_nmi() {
            bus.acknowledge_nmi();
            let cycles = self.service(bus, Interrupt::Nmi);
            return Ok(self.finish(address, StepEvent::Interrupt(Interrupt::Nmi), cycles));
        }
        if bus.poll_irq() {
            // A masked IRQ still ends WAI; execution resumes after it
            self.state.waiting_for_irq = false;
            if !self.state.flag(StatusFlags::IRQ_DISABLE) {
                let cycles = self.service(bus, Interrupt::Irq);
                return Ok(self.finish(address, StepEvent::Interrupt(Interrupt::Irq), cycles));
            }
        }
        if self.state.waiting_for_irq {
            return Ok(self.finish(address, StepEvent::Waiting, 1));
        }

        let opcode = bus.read_u8(address);
        if opcode == RESERVED_OPCODE && self.strict_reserved {
            if self.halt_on_illegal {
                self.state.stopped = true;
            }
            if !debug_flags::quiet() {
                log::warn!("illegal opcode 0x{:02X} at {}", opcode, address);
            }
            return Err(CoreError::IllegalOpcode { opcode, address });
        }

        let instruction = opcodes::lookup(opcode);
        // Length is fixed by the widths in force when the opcode was fetched
        let length = 1 + instruction.mode.operand_bytes(&self.state);
        let executed = execute::execute(&mut self.state, bus, instruction);
        if executed.flow == Flow::Next {
            self.state.pc = address.offset.wrapping_add(length);
        }

        if debug_flags::trace() {
            let s = &self.state;
            log::trace!(
                "{} {:02X} {:?} {:?} A:{:04X} X:{:04X} Y:{:04X} S:{:04X} D:{:04X} DB:{:02X} P:{:02X} E:{} cyc:{}",
                address,
                opcode,
                instruction.mnemonic,
                instruction.mode,
                s.a,
                s.x,
                s.y,
                s.sp,
                s.dp,
                s.db,
                s.p.bits(),
                s.emulation_mode as u8,
                executed.cycles
            );
        }

        let event = StepEvent::Executed {
            opcode,
            mnemonic: instruction.mnemonic,
        };
        Ok(self.finish(address, event, executed.cycles))
    }

    /// Take a non-maskable interrupt now. Returns the cycles used.
    pub fn nmi<B: CpuBus>(&mut self, bus: &mut B) -> u32 {
        let cycles = self.service(bus, Interrupt::Nmi);
        self.state.cycles = self.state.cycles.wrapping_add(cycles as u64);
        cycles
    }

    /// Take an IRQ now unless I is set. Returns the cycles used, or `None`
    /// when masked.
    pub fn irq<B: CpuBus>(&mut self, bus: &mut B) -> Option<u32> {
        self.state.waiting_for_irq = false;
        if self.state.flag(StatusFlags::IRQ_DISABLE) {
            return None;
        }
        let cycles = self.service(bus, Interrupt::Irq);
        self.state.cycles = self.state.cycles.wrapping_add(cycles as u64);
        Some(cycles)
    }

    fn service<B: CpuBus>(&mut self, bus: &mut B, kind: Interrupt) -> u32 {
        let return_pc = self.state.pc;
        let cycles = interrupt::enter(&mut self.state, bus, kind, return_pc);
        log::debug!(
            "{:?} taken -> {}",
            kind,
            self.state.program_address()
        );
        cycles
    }

    fn finish(&mut self, address: MemoryAddress, event: StepEvent, cycles: u32) -> StepOutcome {
        self.state.cycles = self.state.cycles.wrapping_add(cycles as u64);
        StepOutcome {
            address,
            event,
            cycles,
        }
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
