use super::addressing::{self, AddressingMode, Resolved};
use super::alu::{self, set_nz, store_a, width_mask};
use super::interrupt::{self, Interrupt};
use super::opcodes::{Instruction, Mnemonic};
use super::stack::{pull_u16, pull_u8, push_u16, push_u8};
use super::state::{CpuState, StatusFlags};
use crate::cpu_bus::CpuBus;
use crate::memory::MemoryAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Fall through; the caller advances PC past the encoded instruction.
    Next,
    /// The handler already loaded PB/PC.
    Jump,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Executed {
    pub flow: Flow,
    pub cycles: u32,
}

fn read_m<B: CpuBus>(state: &CpuState, bus: &mut B, addr: MemoryAddress) -> u16 {
    if state.memory_is_8bit() {
        bus.read_u8(addr) as u16
    } else {
        bus.read_u16(addr)
    }
}

fn write_m<B: CpuBus>(state: &CpuState, bus: &mut B, addr: MemoryAddress, value: u16) {
    if state.memory_is_8bit() {
        bus.write_u8(addr, (value & 0xFF) as u8);
    } else {
        bus.write_u16(addr, value);
    }
}

fn read_x<B: CpuBus>(state: &CpuState, bus: &mut B, addr: MemoryAddress) -> u16 {
    if state.index_is_8bit() {
        bus.read_u8(addr) as u16
    } else {
        bus.read_u16(addr)
    }
}

fn write_x<B: CpuBus>(state: &CpuState, bus: &mut B, addr: MemoryAddress, value: u16) {
    if state.index_is_8bit() {
        bus.write_u8(addr, (value & 0xFF) as u8);
    } else {
        bus.write_u16(addr, value);
    }
}

fn push_m<B: CpuBus>(state: &mut CpuState, bus: &mut B, value: u16) {
    if state.memory_is_8bit() {
        push_u8(state, bus, (value & 0xFF) as u8);
    } else {
        push_u16(state, bus, value);
    }
}

fn push_x<B: CpuBus>(state: &mut CpuState, bus: &mut B, value: u16) {
    if state.index_is_8bit() {
        push_u8(state, bus, (value & 0xFF) as u8);
    } else {
        push_u16(state, bus, value);
    }
}

fn pull_x<B: CpuBus>(state: &mut CpuState, bus: &mut B) -> u16 {
    let value = if state.index_is_8bit() {
        pull_u8(state, bus) as u16
    } else {
        pull_u16(state, bus)
    };
    let is_8bit = state.index_is_8bit();
    set_nz(state, value, is_8bit);
    value
}

/// Load an index register at the current X width.
fn load_index(state: &mut CpuState, value: u16) -> u16 {
    let is_8bit = state.index_is_8bit();
    let value = value & width_mask(is_8bit);
    set_nz(state, value, is_8bit);
    value
}

/// Read-modify-write on the accumulator or on memory at the M width.
fn modify<B, F>(state: &mut CpuState, bus: &mut B, mode: AddressingMode, addr: MemoryAddress, op: F)
where
    B: CpuBus,
    F: FnOnce(&mut CpuState, u16, bool) -> u16,
{
    let is_8bit = state.memory_is_8bit();
    if mode == AddressingMode::Accumulator {
        let value = state.a & width_mask(is_8bit);
        let result = op(state, value, is_8bit);
        store_a(state, result);
    } else {
        let value = read_m(state, bus, addr);
        let result = op(state, value, is_8bit);
        write_m(state, bus, addr, result);
    }
}

fn increment(state: &mut CpuState, value: u16, is_8bit: bool) -> u16 {
    let result = value.wrapping_add(1) & width_mask(is_8bit);
    set_nz(state, result, is_8bit);
    result
}

fn decrement(state: &mut CpuState, value: u16, is_8bit: bool) -> u16 {
    let result = value.wrapping_sub(1) & width_mask(is_8bit);
    set_nz(state, result, is_8bit);
    result
}

/// Extra cycles known before the instruction runs: 16-bit operands, a
/// misaligned direct page and indexed reads that cross a page (always paid
/// with 16-bit index registers).
fn penalties(state: &CpuState, instruction: &Instruction, resolved: &Resolved) -> u32 {
    let mnemonic = instruction.mnemonic;
    let mode = instruction.mode;
    let mut cycles = 0;

    if mnemonic.uses_memory_width() && mode != AddressingMode::Accumulator && !state.memory_is_8bit()
    {
        cycles += if mnemonic.is_read_modify_write() { 2 } else { 1 };
    }
    if mnemonic.uses_index_width() && !state.index_is_8bit() {
        cycles += 1;
    }
    if mode.is_direct_page() && state.dp & 0x00FF != 0 {
        cycles += 1;
    }
    let indexed_read = matches!(
        mode,
        AddressingMode::AbsoluteX | AddressingMode::AbsoluteY | AddressingMode::DirectIndirectIndexed
    );
    if indexed_read && mnemonic.is_read() && (!state.index_is_8bit() || resolved.page_crossed) {
        cycles += 1;
    }
    cycles
}

fn branch(state: &mut CpuState, target: &Resolved, taken: bool) -> (Flow, u32) {
    if !taken {
        return (Flow::Next, 0);
    }
    state.pc = target.address.offset;
    let mut extra = 1;
    if state.emulation_mode && target.page_crossed {
        extra += 1;
    }
    (Flow::Jump, extra)
}

/// MVN/MVP. Moves the whole block in one call: C+1 bytes from `src:X` to
/// `dst:Y`, leaving C = $FFFF and DB = destination bank.
fn block_move<B: CpuBus>(state: &mut CpuState, bus: &mut B, decrement: bool) -> u32 {
    let dst = bus.read_u8(MemoryAddress::new(state.pb, state.pc.wrapping_add(1)));
    let src = bus.read_u8(MemoryAddress::new(state.pb, state.pc.wrapping_add(2)));
    state.db = dst;

    let mask = width_mask(state.index_is_8bit());
    let mut moved = 0u32;
    loop {
        let value = bus.read_u8(MemoryAddress::new(src, state.x));
        bus.write_u8(MemoryAddress::new(dst, state.y), value);
        if decrement {
            state.x = state.x.wrapping_sub(1) & mask;
            state.y = state.y.wrapping_sub(1) & mask;
        } else {
            state.x = state.x.wrapping_add(1) & mask;
            state.y = state.y.wrapping_add(1) & mask;
        }
        state.a = state.a.wrapping_sub(1);
        moved += 1;
        if state.a == 0xFFFF {
            break;
        }
    }
    moved
}

pub(crate) fn execute<B: CpuBus>(
    state: &mut CpuState,
    bus: &mut B,
    instruction: &Instruction,
) -> Executed {
    use Mnemonic::*;

    let mode = instruction.mode;
    let resolved = addressing::resolve(state, bus, mode);
    let addr = resolved.address;
    let mut cycles = instruction.cycles as u32 + penalties(state, instruction, &resolved);
    let mut flow = Flow::Next;

    match instruction.mnemonic {
        // Loads and stores
        LDA => {
            let value = read_m(state, bus, addr);
            let is_8bit = state.memory_is_8bit();
            store_a(state, value);
            set_nz(state, value, is_8bit);
        }
        LDX => {
            let value = read_x(state, bus, addr);
            state.x = load_index(state, value);
        }
        LDY => {
            let value = read_x(state, bus, addr);
            state.y = load_index(state, value);
        }
        STA => write_m(state, bus, addr, state.a),
        STX => write_x(state, bus, addr, state.x),
        STY => write_x(state, bus, addr, state.y),
        STZ => write_m(state, bus, addr, 0),

        // Arithmetic and logic
        ADC => {
            let value = read_m(state, bus, addr);
            alu::adc(state, value);
        }
        SBC => {
            let value = read_m(state, bus, addr);
            alu::sbc(state, value);
        }
        AND | ORA | EOR => {
            let value = read_m(state, bus, addr);
            let result = match instruction.mnemonic {
                AND => state.a & value,
                ORA => state.a | value,
                _ => state.a ^ value,
            };
            let is_8bit = state.memory_is_8bit();
            store_a(state, result);
            set_nz(state, result, is_8bit);
        }
        CMP => {
            let value = read_m(state, bus, addr);
            let (a, is_8bit) = (state.a, state.memory_is_8bit());
            alu::compare(state, a, value, is_8bit);
        }
        CPX => {
            let value = read_x(state, bus, addr);
            let (x, is_8bit) = (state.x, state.index_is_8bit());
            alu::compare(state, x, value, is_8bit);
        }
        CPY => {
            let value = read_x(state, bus, addr);
            let (y, is_8bit) = (state.y, state.index_is_8bit());
            alu::compare(state, y, value, is_8bit);
        }
        BIT => {
            let value = read_m(state, bus, addr);
            alu::bit(state, value, mode.is_immediate());
        }

        // Shifts, rotates, increments
        ASL => modify(state, bus, mode, addr, alu::asl),
        LSR => modify(state, bus, mode, addr, alu::lsr),
        ROL => modify(state, bus, mode, addr, alu::rol),
        ROR => modify(state, bus, mode, addr, alu::ror),
        INC => modify(state, bus, mode, addr, increment),
        DEC => modify(state, bus, mode, addr, decrement),
        TSB | TRB => {
            let set = instruction.mnemonic == TSB;
            modify(state, bus, mode, addr, |s, value, is_8bit| {
                let a = s.a & width_mask(is_8bit);
                s.p.set(StatusFlags::ZERO, a & value == 0);
                if set {
                    value | a
                } else {
                    value & !a
                }
            });
        }
        INX => {
            let value = state.x.wrapping_add(1);
            state.x = load_index(state, value);
        }
        INY => {
            let value = state.y.wrapping_add(1);
            state.y = load_index(state, value);
        }
        DEX => {
            let value = state.x.wrapping_sub(1);
            state.x = load_index(state, value);
        }
        DEY => {
            let value = state.y.wrapping_sub(1);
            state.y = load_index(state, value);
        }

        // Branches
        BCC | BCS | BEQ | BMI | BNE | BPL | BRA | BVC | BVS => {
            let p = state.p;
            let taken = match instruction.mnemonic {
                BCC => !p.contains(StatusFlags::CARRY),
                BCS => p.contains(StatusFlags::CARRY),
                BEQ => p.contains(StatusFlags::ZERO),
                BNE => !p.contains(StatusFlags::ZERO),
                BMI => p.contains(StatusFlags::NEGATIVE),
                BPL => !p.contains(StatusFlags::NEGATIVE),
                BVS => p.contains(StatusFlags::OVERFLOW),
                BVC => !p.contains(StatusFlags::OVERFLOW),
                _ => true,
            };
            let (next, extra) = branch(state, &resolved, taken);
            flow = next;
            cycles += extra;
        }
        BRL => {
            state.pc = addr.offset;
            flow = Flow::Jump;
        }

        // Jumps, calls, returns
        JMP => {
            state.pc = addr.offset;
            flow = Flow::Jump;
        }
        JML => {
            state.pb = addr.bank;
            state.pc = addr.offset;
            flow = Flow::Jump;
        }
        JSR => {
            let ret = state.pc.wrapping_add(2);
            push_u16(state, bus, ret);
            state.pc = addr.offset;
            flow = Flow::Jump;
        }
        JSL => {
            let (ret, bank) = (state.pc.wrapping_add(3), state.pb);
            push_u8(state, bus, bank);
            push_u16(state, bus, ret);
            state.pb = addr.bank;
            state.pc = addr.offset;
            flow = Flow::Jump;
        }
        RTS => {
            state.pc = pull_u16(state, bus).wrapping_add(1);
            flow = Flow::Jump;
        }
        RTL => {
            state.pc = pull_u16(state, bus).wrapping_add(1);
            state.pb = pull_u8(state, bus);
            flow = Flow::Jump;
        }
        RTI => {
            let status = pull_u8(state, bus);
            state.set_status(status);
            state.pc = pull_u16(state, bus);
            if !state.emulation_mode {
                state.pb = pull_u8(state, bus);
                cycles += 1;
            }
            flow = Flow::Jump;
        }
        BRK | COP => {
            let kind = if instruction.mnemonic == BRK {
                Interrupt::Brk
            } else {
                Interrupt::Cop
            };
            let ret = state.pc.wrapping_add(2);
            let entry_cycles = interrupt::enter(state, bus, kind, ret);
            cycles += entry_cycles.saturating_sub(instruction.cycles as u32);
            flow = Flow::Jump;
        }

        // Stack
        PHA => {
            let a = state.a;
            push_m(state, bus, a);
        }
        PHX => {
            let x = state.x;
            push_x(state, bus, x);
        }
        PHY => {
            let y = state.y;
            push_x(state, bus, y);
        }
        PHP => {
            let status = state.p.bits();
            push_u8(state, bus, status);
        }
        PHB => {
            let db = state.db;
            push_u8(state, bus, db);
        }
        PHD => {
            let dp = state.dp;
            push_u16(state, bus, dp);
        }
        PHK => {
            let pb = state.pb;
            push_u8(state, bus, pb);
        }
        PLA => {
            let value = if state.memory_is_8bit() {
                pull_u8(state, bus) as u16
            } else {
                pull_u16(state, bus)
            };
            let is_8bit = state.memory_is_8bit();
            store_a(state, value);
            set_nz(state, value, is_8bit);
        }
        PLX => state.x = pull_x(state, bus),
        PLY => state.y = pull_x(state, bus),
        PLP => {
            let status = pull_u8(state, bus);
            state.set_status(status);
        }
        PLB => {
            let db = pull_u8(state, bus);
            state.db = db;
            set_nz(state, db as u16, true);
        }
        PLD => {
            let dp = pull_u16(state, bus);
            state.dp = dp;
            set_nz(state, dp, false);
        }
        PEA => {
            let value = bus.read_u16(addr);
            push_u16(state, bus, value);
        }
        PEI => {
            let value = bus.read_u16(addr);
            push_u16(state, bus, value);
        }
        PER => push_u16(state, bus, addr.offset),

        // Block moves
        MVN | MVP => {
            let moved = block_move(state, bus, instruction.mnemonic == MVP);
            cycles += 7 * moved.saturating_sub(1);
        }

        // Status register
        CLC => state.p.remove(StatusFlags::CARRY),
        SEC => state.p.insert(StatusFlags::CARRY),
        CLD => state.p.remove(StatusFlags::DECIMAL),
        SED => state.p.insert(StatusFlags::DECIMAL),
        CLI => state.p.remove(StatusFlags::IRQ_DISABLE),
        SEI => state.p.insert(StatusFlags::IRQ_DISABLE),
        CLV => state.p.remove(StatusFlags::OVERFLOW),
        REP => {
            let mask = bus.read_u8(addr);
            state.set_status(state.p.bits() & !mask);
        }
        SEP => {
            let mask = bus.read_u8(addr);
            state.set_status(state.p.bits() | mask);
        }
        XCE => {
            let carry = state.p.contains(StatusFlags::CARRY);
            state.p.set(StatusFlags::CARRY, state.emulation_mode);
            state.set_emulation_mode(carry);
        }

        // Transfers
        TAX | TAY | TXY | TYX | TSX => {
            let source = match instruction.mnemonic {
                TAX | TAY => state.a,
                TXY => state.x,
                TYX => state.y,
                _ => state.sp,
            };
            let value = load_index(state, source);
            if matches!(instruction.mnemonic, TAY | TXY) {
                state.y = value;
            } else {
                state.x = value;
            }
        }
        TXA | TYA => {
            let value = if instruction.mnemonic == TXA {
                state.x
            } else {
                state.y
            };
            let is_8bit = state.memory_is_8bit();
            store_a(state, value);
            set_nz(state, value, is_8bit);
        }
        TXS => state.set_sp(state.x),
        TCS => state.set_sp(state.a),
        TSC => {
            let sp = state.sp;
            state.a = sp;
            set_nz(state, sp, false);
        }
        TCD => {
            let a = state.a;
            state.dp = a;
            set_nz(state, a, false);
        }
        TDC => {
            let dp = state.dp;
            state.a = dp;
            set_nz(state, dp, false);
        }
        XBA => {
            let swapped = state.a.swap_bytes();
            state.a = swapped;
            set_nz(state, swapped, true);
        }

        // Halts and no-ops
        WAI => state.waiting_for_irq = true,
        STP => state.stopped = true,
        WDM | NOP => {}
    }

    Executed { flow, cycles }
}
