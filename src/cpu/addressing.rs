//! Effective-address calculation for every 65C816 addressing mode.
//!
//! Operand bytes are read from `PB:PC+1..` and the program counter is never
//! touched here; `step()` advances it by [`operand_bytes`] afterwards.
//! Pointer reads from the direct page and the stack stay in bank 0. Indexing
//! a banked base address is a full 24-bit add that carries into the bank.

use super::state::CpuState;
use crate::cpu_bus::CpuBus;
use crate::memory::MemoryAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    /// `#` operand sized by the M flag
    ImmediateM,
    /// `#` operand sized by the X flag
    ImmediateX,
    Immediate8,
    Immediate16,
    Direct,
    DirectX,
    DirectY,
    DirectIndirect,
    DirectIndexedIndirect,
    DirectIndirectIndexed,
    DirectIndirectLong,
    DirectIndirectLongIndexed,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    AbsoluteLong,
    AbsoluteLongX,
    AbsoluteIndirect,
    AbsoluteIndexedIndirect,
    AbsoluteIndirectLong,
    StackRelative,
    StackRelativeIndirectIndexed,
    Relative,
    RelativeLong,
    BlockMove,
}

impl AddressingMode {
    /// Operand bytes that follow the opcode under the current register widths.
    pub fn operand_bytes(self, state: &CpuState) -> u16 {
        use AddressingMode::*;
        match self {
            Implied | Accumulator => 0,
            ImmediateM => {
                if state.memory_is_8bit() {
                    1
                } else {
                    2
                }
            }
            ImmediateX => {
                if state.index_is_8bit() {
                    1
                } else {
                    2
                }
            }
            Immediate8 | Relative => 1,
            Direct
            | DirectX
            | DirectY
            | DirectIndirect
            | DirectIndexedIndirect
            | DirectIndirectIndexed
            | DirectIndirectLong
            | DirectIndirectLongIndexed
            | StackRelative
            | StackRelativeIndirectIndexed => 1,
            Immediate16
            | Absolute
            | AbsoluteX
            | AbsoluteY
            | AbsoluteIndirect
            | AbsoluteIndexedIndirect
            | AbsoluteIndirectLong
            | RelativeLong
            | BlockMove => 2,
            AbsoluteLong | AbsoluteLongX => 3,
        }
    }

    pub fn is_direct_page(self) -> bool {
        use AddressingMode::*;
        matches!(
            self,
            Direct
                | DirectX
                | DirectY
                | DirectIndirect
                | DirectIndexedIndirect
                | DirectIndirectIndexed
                | DirectIndirectLong
                | DirectIndirectLongIndexed
        )
    }

    pub fn is_immediate(self) -> bool {
        use AddressingMode::*;
        matches!(self, ImmediateM | ImmediateX | Immediate8 | Immediate16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub address: MemoryAddress,
    /// Indexing (or a branch) moved the address into another page.
    pub page_crossed: bool,
}

impl Resolved {
    fn at(address: MemoryAddress) -> Self {
        Self {
            address,
            page_crossed: false,
        }
    }
}

#[inline]
fn operand_address(state: &CpuState, n: u16) -> MemoryAddress {
    MemoryAddress::new(state.pb, state.pc.wrapping_add(n))
}

fn operand_u8<B: CpuBus>(state: &CpuState, bus: &mut B) -> u8 {
    bus.read_u8(operand_address(state, 1))
}

fn operand_u16<B: CpuBus>(state: &CpuState, bus: &mut B) -> u16 {
    let lo = bus.read_u8(operand_address(state, 1)) as u16;
    let hi = bus.read_u8(operand_address(state, 2)) as u16;
    (hi << 8) | lo
}

fn operand_u24<B: CpuBus>(state: &CpuState, bus: &mut B) -> u32 {
    let lo = operand_u16(state, bus) as u32;
    let bank = bus.read_u8(operand_address(state, 3)) as u32;
    (bank << 16) | lo
}

/// Direct page offset for `dp + offset`. In emulation mode with DL = 0 the
/// sum wraps inside the page, as on a 6502 zero page.
#[inline]
fn direct_offset(state: &CpuState, offset: u16) -> u16 {
    if state.emulation_mode && state.dp & 0x00FF == 0 {
        (state.dp & 0xFF00) | (offset & 0x00FF)
    } else {
        state.dp.wrapping_add(offset)
    }
}

/// 16-bit pointer stored in the direct page.
fn direct_pointer<B: CpuBus>(state: &CpuState, bus: &mut B, at: u16) -> u16 {
    let lo = bus.read_u8(MemoryAddress::new(0, at)) as u16;
    let hi_at = if state.emulation_mode && state.dp & 0x00FF == 0 {
        (at & 0xFF00) | (at.wrapping_add(1) & 0x00FF)
    } else {
        at.wrapping_add(1)
    };
    let hi = bus.read_u8(MemoryAddress::new(0, hi_at)) as u16;
    (hi << 8) | lo
}

fn indexed(base: MemoryAddress, index: u16) -> Resolved {
    let address = base.wrapping_add_long(index as u32);
    Resolved {
        address,
        page_crossed: (base.to_u24() ^ address.to_u24()) & 0x00FF_FF00 != 0,
    }
}

/// Resolve the effective address for `mode` for the instruction at PB:PC.
///
/// Immediate modes resolve to the operand bytes themselves. Jump-style
/// modes (`(a)`, `(a,X)`, `[a]`, relative) resolve to the control transfer
/// target. Implied, accumulator and block-move forms resolve to the first
/// operand byte and read nothing.
pub fn resolve<B: CpuBus>(state: &CpuState, bus: &mut B, mode: AddressingMode) -> Resolved {
    use AddressingMode::*;
    match mode {
        Implied | Accumulator | BlockMove | ImmediateM | ImmediateX | Immediate8
        | Immediate16 => Resolved::at(operand_address(state, 1)),

        Direct => {
            let op = operand_u8(state, bus) as u16;
            Resolved::at(MemoryAddress::new(0, direct_offset(state, op)))
        }
        DirectX => {
            let op = operand_u8(state, bus) as u16;
            let offset = direct_offset(state, op.wrapping_add(state.index_x()));
            Resolved::at(MemoryAddress::new(0, offset))
        }
        DirectY => {
            let op = operand_u8(state, bus) as u16;
            let offset = direct_offset(state, op.wrapping_add(state.index_y()));
            Resolved::at(MemoryAddress::new(0, offset))
        }
        DirectIndirect => {
            let op = operand_u8(state, bus) as u16;
            let pointer = direct_pointer(state, bus, direct_offset(state, op));
            Resolved::at(MemoryAddress::new(state.db, pointer))
        }
        DirectIndexedIndirect => {
            let op = operand_u8(state, bus) as u16;
            let at = direct_offset(state, op.wrapping_add(state.index_x()));
            let pointer = direct_pointer(state, bus, at);
            Resolved::at(MemoryAddress::new(state.db, pointer))
        }
        DirectIndirectIndexed => {
            let op = operand_u8(state, bus) as u16;
            let pointer = direct_pointer(state, bus, direct_offset(state, op));
            indexed(MemoryAddress::new(state.db, pointer), state.index_y())
        }
        DirectIndirectLong => {
            let op = operand_u8(state, bus) as u16;
            let at = MemoryAddress::new(0, direct_offset(state, op));
            Resolved::at(MemoryAddress::from_u24(bus.read_u24(at)))
        }
        DirectIndirectLongIndexed => {
            let op = operand_u8(state, bus) as u16;
            let at = MemoryAddress::new(0, direct_offset(state, op));
            let base = MemoryAddress::from_u24(bus.read_u24(at));
            indexed(base, state.index_y())
        }

        Absolute => Resolved::at(MemoryAddress::new(state.db, operand_u16(state, bus))),
        AbsoluteX => {
            let base = MemoryAddress::new(state.db, operand_u16(state, bus));
            indexed(base, state.index_x())
        }
        AbsoluteY => {
            let base = MemoryAddress::new(state.db, operand_u16(state, bus));
            indexed(base, state.index_y())
        }
        AbsoluteLong => Resolved::at(MemoryAddress::from_u24(operand_u24(state, bus))),
        AbsoluteLongX => {
            let base = MemoryAddress::from_u24(operand_u24(state, bus));
            Resolved::at(base.wrapping_add_long(state.index_x() as u32))
        }

        // JMP (a): pointer in bank 0, target in the program bank
        AbsoluteIndirect => {
            let pointer = operand_u16(state, bus);
            let target = bus.read_u16(MemoryAddress::new(0, pointer));
            Resolved::at(MemoryAddress::new(state.pb, target))
        }
        // JMP/JSR (a,X): pointer table lives in the program bank
        AbsoluteIndexedIndirect => {
            let base = operand_u16(state, bus);
            let at = MemoryAddress::new(state.pb, base.wrapping_add(state.index_x()));
            let target = bus.read_u16(at);
            Resolved::at(MemoryAddress::new(state.pb, target))
        }
        // JML [a]
        AbsoluteIndirectLong => {
            let pointer = operand_u16(state, bus);
            let target = bus.read_u24(MemoryAddress::new(0, pointer));
            Resolved::at(MemoryAddress::from_u24(target))
        }

        StackRelative => {
            let op = operand_u8(state, bus) as u16;
            Resolved::at(MemoryAddress::new(0, state.sp.wrapping_add(op)))
        }
        StackRelativeIndirectIndexed => {
            let op = operand_u8(state, bus) as u16;
            let pointer = bus.read_u16(MemoryAddress::new(0, state.sp.wrapping_add(op)));
            indexed(MemoryAddress::new(state.db, pointer), state.index_y())
        }

        Relative => {
            let disp = operand_u8(state, bus) as i8;
            let next = state.pc.wrapping_add(2);
            let target = next.wrapping_add(disp as i16 as u16);
            Resolved {
                address: MemoryAddress::new(state.pb, target),
                page_crossed: (next ^ target) & 0xFF00 != 0,
            }
        }
        RelativeLong => {
            let disp = operand_u16(state, bus);
            let next = state.pc.wrapping_add(3);
            Resolved::at(MemoryAddress::new(state.pb, next.wrapping_add(disp)))
        }
    }
}
