use super::stack::{push_u16, push_u8};
use super::state::{CpuState, StatusFlags};
use crate::cpu_bus::CpuBus;
use crate::memory::MemoryAddress;

/// Pushed copy of P in emulation mode marks software breaks with bit 4.
const BREAK_FLAG: u8 = 0x10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Brk,
    Cop,
    Nmi,
    Irq,
}

impl Interrupt {
    /// Bank-0 vector address for this interrupt.
    pub fn vector(self, emulation_mode: bool) -> u16 {
        match (self, emulation_mode) {
            (Interrupt::Cop, false) => 0xFFE4,
            (Interrupt::Brk, false) => 0xFFE6,
            (Interrupt::Nmi, false) => 0xFFEA,
            (Interrupt::Irq, false) => 0xFFEE,
            (Interrupt::Cop, true) => 0xFFF4,
            (Interrupt::Nmi, true) => 0xFFFA,
            // BRK shares the IRQ vector; the pushed B bit tells them apart
            (Interrupt::Brk, true) | (Interrupt::Irq, true) => 0xFFFE,
        }
    }
}

pub const RESET_VECTOR: u16 = 0xFFFC;

/// Push the return state and jump through the vector. Returns the cycles
/// consumed (7, plus 1 for the program-bank push in native mode).
pub(crate) fn enter<B: CpuBus>(
    state: &mut CpuState,
    bus: &mut B,
    kind: Interrupt,
    return_pc: u16,
) -> u32 {
    let mut cycles = 7;
    if !state.emulation_mode {
        let pb = state.pb;
        push_u8(state, bus, pb);
        cycles += 1;
    }
    push_u16(state, bus, return_pc);

    let mut status = state.p.bits();
    if state.emulation_mode {
        status |= 0x20;
        if kind == Interrupt::Brk {
            status |= BREAK_FLAG;
        } else {
            status &= !BREAK_FLAG;
        }
    }
    push_u8(state, bus, status);

    state.p.insert(StatusFlags::IRQ_DISABLE);
    state.p.remove(StatusFlags::DECIMAL);
    state.pb = 0;
    state.pc = bus.read_u16(MemoryAddress::new(0, kind.vector(state.emulation_mode)));
    state.waiting_for_irq = false;
    cycles
}
