//! Hardware stack in bank 0. Pushes store then decrement; pulls increment
//! then load. Emulation mode wraps inside page 1.

use super::state::CpuState;
use crate::cpu_bus::CpuBus;
use crate::memory::MemoryAddress;

pub(crate) fn push_u8<B: CpuBus>(state: &mut CpuState, bus: &mut B, value: u8) {
    bus.write_u8(MemoryAddress::new(0, state.sp), value);
    state.set_sp(state.sp.wrapping_sub(1));
}

pub(crate) fn push_u16<B: CpuBus>(state: &mut CpuState, bus: &mut B, value: u16) {
    push_u8(state, bus, (value >> 8) as u8);
    push_u8(state, bus, (value & 0xFF) as u8);
}

pub(crate) fn pull_u8<B: CpuBus>(state: &mut CpuState, bus: &mut B) -> u8 {
    state.set_sp(state.sp.wrapping_add(1));
    bus.read_u8(MemoryAddress::new(0, state.sp))
}

pub(crate) fn pull_u16<B: CpuBus>(state: &mut CpuState, bus: &mut B) -> u16 {
    let lo = pull_u8(state, bus) as u16;
    let hi = pull_u8(state, bus) as u16;
    (hi << 8) | lo
}
