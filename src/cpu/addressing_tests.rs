use super::*;
use crate::cpu::addressing::resolve;

/// Native mode, 8-bit registers, PC at $00:8000 with `operand` after the
/// opcode byte.
fn setup(operand: &[u8]) -> (CpuState, TestBus) {
    let mut state = CpuState::new();
    state.emulation_mode = false;
    state.pc = 0x8000;
    let mut bus = TestBus::new();
    bus.load_program(operand, 0x8001);
    (state, bus)
}

fn addr(bank: u8, offset: u16) -> MemoryAddress {
    MemoryAddress::new(bank, offset)
}

#[test]
fn test_immediate_points_at_operand() {
    let (mut state, mut bus) = setup(&[0x12, 0x34]);
    state.pb = 0x05;
    let r = resolve(&state, &mut bus, AddressingMode::ImmediateM);
    assert_eq!(r.address, addr(0x05, 0x8001));
    assert!(!r.page_crossed);
}

#[test]
fn test_direct_page() {
    let (mut state, mut bus) = setup(&[0x10]);
    state.dp = 0x1200;
    let r = resolve(&state, &mut bus, AddressingMode::Direct);
    assert_eq!(r.address, addr(0, 0x1210));
}

#[test]
fn test_direct_page_wraps_in_emulation() {
    let (mut state, mut bus) = setup(&[0xF0]);
    state.emulation_mode = true;
    state.dp = 0x0000;
    state.x = 0x20;
    let r = resolve(&state, &mut bus, AddressingMode::DirectX);
    assert_eq!(r.address, addr(0, 0x0010));
}

#[test]
fn test_direct_page_crosses_page_when_dl_nonzero() {
    let (mut state, mut bus) = setup(&[0xF0]);
    state.emulation_mode = true;
    state.dp = 0x0001;
    state.x = 0x20;
    let r = resolve(&state, &mut bus, AddressingMode::DirectX);
    assert_eq!(r.address, addr(0, 0x0111));
}

#[test]
fn test_direct_indexed_native_16bit_index() {
    let (mut state, mut bus) = setup(&[0x10]);
    state.p.remove(StatusFlags::INDEX_8BIT);
    state.dp = 0xFF00;
    state.y = 0x0200;
    let r = resolve(&state, &mut bus, AddressingMode::DirectY);
    // Wraps within bank 0
    assert_eq!(r.address, addr(0, 0x0110));
}

#[test]
fn test_direct_indirect_uses_data_bank() {
    let (mut state, mut bus) = setup(&[0x20]);
    state.db = 0x7E;
    bus.poke(0x0020, 0x00);
    bus.poke(0x0021, 0x40);
    let r = resolve(&state, &mut bus, AddressingMode::DirectIndirect);
    assert_eq!(r.address, addr(0x7E, 0x4000));
}

#[test]
fn test_direct_indexed_indirect() {
    let (mut state, mut bus) = setup(&[0x20]);
    state.db = 0x01;
    state.x = 0x04;
    bus.poke(0x0024, 0x34);
    bus.poke(0x0025, 0x12);
    let r = resolve(&state, &mut bus, AddressingMode::DirectIndexedIndirect);
    assert_eq!(r.address, addr(0x01, 0x1234));
}

#[test]
fn test_direct_indirect_indexed_carries_into_bank() {
    let (mut state, mut bus) = setup(&[0x30]);
    state.db = 0x7E;
    state.y = 0x10;
    bus.poke(0x0030, 0xF8);
    bus.poke(0x0031, 0xFF);
    let r = resolve(&state, &mut bus, AddressingMode::DirectIndirectIndexed);
    assert_eq!(r.address, addr(0x7F, 0x0008));
    assert!(r.page_crossed);
}

#[test]
fn test_direct_indirect_indexed_same_page() {
    let (mut state, mut bus) = setup(&[0x30]);
    state.y = 0x01;
    bus.poke(0x0030, 0x10);
    bus.poke(0x0031, 0x20);
    let r = resolve(&state, &mut bus, AddressingMode::DirectIndirectIndexed);
    assert_eq!(r.address, addr(0x00, 0x2011));
    assert!(!r.page_crossed);
}

#[test]
fn test_direct_indirect_long() {
    let (mut state, mut bus) = setup(&[0x40]);
    state.db = 0x12;
    bus.load_program(&[0x00, 0x80, 0xC0], 0x0040);
    let r = resolve(&state, &mut bus, AddressingMode::DirectIndirectLong);
    assert_eq!(r.address, addr(0xC0, 0x8000));

    state.y = 0x05;
    let r = resolve(&state, &mut bus, AddressingMode::DirectIndirectLongIndexed);
    assert_eq!(r.address, addr(0xC0, 0x8005));
}

#[test]
fn test_absolute_modes() {
    let (mut state, mut bus) = setup(&[0xF0, 0xFF]);
    state.db = 0x02;
    state.x = 0x20;
    state.y = 0x01;
    let r = resolve(&state, &mut bus, AddressingMode::Absolute);
    assert_eq!(r.address, addr(0x02, 0xFFF0));

    let r = resolve(&state, &mut bus, AddressingMode::AbsoluteX);
    assert_eq!(r.address, addr(0x03, 0x0010));
    assert!(r.page_crossed);

    let r = resolve(&state, &mut bus, AddressingMode::AbsoluteY);
    assert_eq!(r.address, addr(0x02, 0xFFF1));
    assert!(!r.page_crossed);
}

#[test]
fn test_absolute_long_indexed() {
    let (mut state, mut bus) = setup(&[0xFF, 0xFF, 0x7E]);
    state.x = 0x01;
    let r = resolve(&state, &mut bus, AddressingMode::AbsoluteLong);
    assert_eq!(r.address, addr(0x7E, 0xFFFF));
    let r = resolve(&state, &mut bus, AddressingMode::AbsoluteLongX);
    assert_eq!(r.address, addr(0x7F, 0x0000));
}

#[test]
fn test_absolute_indirect_reads_bank_zero() {
    let (mut state, mut bus) = setup(&[0x00, 0x03]);
    state.pb = 0x05;
    bus.load_program(&[0x00, 0x03], 0x05_8001);
    bus.poke(0x00_0300, 0x34);
    bus.poke(0x00_0301, 0x12);
    bus.poke(0x05_0300, 0xFF);
    let r = resolve(&state, &mut bus, AddressingMode::AbsoluteIndirect);
    assert_eq!(r.address, addr(0x05, 0x1234));
}

#[test]
fn test_absolute_indexed_indirect_reads_program_bank() {
    let (mut state, mut bus) = setup(&[]);
    state.pb = 0x05;
    state.x = 0x02;
    bus.load_program(&[0x00, 0x90], 0x05_8001);
    bus.poke(0x05_9002, 0x78);
    bus.poke(0x05_9003, 0x56);
    bus.poke(0x00_9002, 0xFF);
    let r = resolve(&state, &mut bus, AddressingMode::AbsoluteIndexedIndirect);
    assert_eq!(r.address, addr(0x05, 0x5678));
}

#[test]
fn test_absolute_indirect_long() {
    let (state, mut bus) = setup(&[0x00, 0x02]);
    bus.load_program(&[0x56, 0x34, 0x12], 0x0200);
    let r = resolve(&state, &mut bus, AddressingMode::AbsoluteIndirectLong);
    assert_eq!(r.address, addr(0x12, 0x3456));
}

#[test]
fn test_stack_relative() {
    let (mut state, mut bus) = setup(&[0x03]);
    state.sp = 0x1FF0;
    let r = resolve(&state, &mut bus, AddressingMode::StackRelative);
    assert_eq!(r.address, addr(0, 0x1FF3));
}

#[test]
fn test_stack_relative_indirect_indexed() {
    let (mut state, mut bus) = setup(&[0x02]);
    state.sp = 0x01F0;
    state.db = 0x7E;
    state.y = 0x04;
    bus.poke(0x01F2, 0x00);
    bus.poke(0x01F3, 0x20);
    let r = resolve(&state, &mut bus, AddressingMode::StackRelativeIndirectIndexed);
    assert_eq!(r.address, addr(0x7E, 0x2004));
}

#[test]
fn test_relative_branch_targets() {
    let (state, mut bus) = setup(&[0x10]);
    let r = resolve(&state, &mut bus, AddressingMode::Relative);
    assert_eq!(r.address, addr(0, 0x8012));
    assert!(!r.page_crossed);

    let (state, mut bus) = setup(&[0xFC]);
    let r = resolve(&state, &mut bus, AddressingMode::Relative);
    assert_eq!(r.address, addr(0, 0x7FFE));
    assert!(r.page_crossed);
}

#[test]
fn test_relative_long_wraps_in_bank() {
    let (mut state, mut bus) = setup(&[]);
    state.pb = 0x01;
    state.pc = 0xFFF0;
    bus.load_program(&[0x20, 0x00], 0x01_FFF1);
    let r = resolve(&state, &mut bus, AddressingMode::RelativeLong);
    assert_eq!(r.address, addr(0x01, 0x0013));
}

#[test]
fn test_resolve_is_repeatable() {
    let modes = [
        AddressingMode::Direct,
        AddressingMode::DirectIndirectIndexed,
        AddressingMode::DirectIndirectLong,
        AddressingMode::AbsoluteX,
        AddressingMode::AbsoluteLongX,
        AddressingMode::StackRelativeIndirectIndexed,
        AddressingMode::Relative,
    ];
    let (mut state, mut bus) = setup(&[0x44, 0x55, 0x66]);
    state.dp = 0x0100;
    state.x = 0x33;
    state.y = 0x77;
    bus.load_program(&[0x12, 0x34, 0x56], 0x0144);
    for mode in modes {
        let first = resolve(&state, &mut bus, mode);
        let second = resolve(&state, &mut bus, mode);
        assert_eq!(first, second, "{:?}", mode);
    }
    assert_eq!(state.pc, 0x8000);
}

#[test]
fn test_operand_bytes_follow_widths() {
    let mut state = CpuState::new();
    assert_eq!(AddressingMode::ImmediateM.operand_bytes(&state), 1);
    assert_eq!(AddressingMode::ImmediateX.operand_bytes(&state), 1);
    state.emulation_mode = false;
    state.p.remove(StatusFlags::MEMORY_8BIT);
    assert_eq!(AddressingMode::ImmediateM.operand_bytes(&state), 2);
    assert_eq!(AddressingMode::ImmediateX.operand_bytes(&state), 1);
    assert_eq!(AddressingMode::AbsoluteLongX.operand_bytes(&state), 3);
    assert_eq!(AddressingMode::BlockMove.operand_bytes(&state), 2);
}
