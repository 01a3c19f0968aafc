//! Opcode table: one descriptor per byte value, no gaps.

use super::addressing::AddressingMode;

#[allow(clippy::upper_case_acronyms)]
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    ADC, AND, ASL, BCC, BCS, BEQ, BIT, BMI, BNE, BPL, BRA, BRK, BRL, BVC, BVS,
    CLC, CLD, CLI, CLV, CMP, COP, CPX, CPY, DEC, DEX, DEY, EOR, INC, INX, INY,
    JML, JMP, JSL, JSR, LDA, LDX, LDY, LSR, MVN, MVP, NOP, ORA, PEA, PEI, PER,
    PHA, PHB, PHD, PHK, PHP, PHX, PHY, PLA, PLB, PLD, PLP, PLX, PLY, REP, ROL,
    ROR, RTI, RTL, RTS, SBC, SEC, SED, SEI, SEP, STA, STP, STX, STY, STZ, TAX,
    TAY, TCD, TCS, TDC, TRB, TSB, TSC, TSX, TXA, TXS, TXY, TYA, TYX, WAI, WDM,
    XBA, XCE,
}

impl Mnemonic {
    /// Operand width follows the M flag (+1 cycle when 16-bit).
    pub fn uses_memory_width(self) -> bool {
        use Mnemonic::*;
        matches!(
            self,
            ADC | AND | BIT | CMP | EOR | LDA | ORA | SBC | STA | STZ | PHA | PLA
                | ASL | LSR | ROL | ROR | INC | DEC | TSB | TRB
        )
    }

    /// Operand width follows the X flag (+1 cycle when 16-bit).
    pub fn uses_index_width(self) -> bool {
        use Mnemonic::*;
        matches!(
            self,
            CPX | CPY | LDX | LDY | STX | STY | PHX | PHY | PLX | PLY
        )
    }

    /// Read-modify-write on memory costs two extra cycles in 16-bit mode.
    pub fn is_read_modify_write(self) -> bool {
        use Mnemonic::*;
        matches!(self, ASL | LSR | ROL | ROR | INC | DEC | TSB | TRB)
    }

    /// Pure reads pay for an indexed page crossing; stores and RMW already
    /// include that cycle in their base count.
    pub fn is_read(self) -> bool {
        use Mnemonic::*;
        matches!(
            self,
            ADC | AND | BIT | CMP | EOR | LDA | LDX | LDY | ORA | SBC
        )
    }

    pub fn is_branch(self) -> bool {
        use Mnemonic::*;
        matches!(self, BCC | BCS | BEQ | BMI | BNE | BPL | BRA | BVC | BVS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    /// Cycles with 8-bit registers, DL = 0 and no page crossing.
    pub cycles: u8,
}

const fn op(mnemonic: Mnemonic, mode: AddressingMode, cycles: u8) -> Instruction {
    Instruction {
        mnemonic,
        mode,
        cycles,
    }
}

use AddressingMode::*;
use Mnemonic::*;

#[rustfmt::skip]
pub static OPCODES: [Instruction; 256] = [
    /* 00 */ op(BRK, Immediate8, 7),
    /* 01 */ op(ORA, DirectIndexedIndirect, 6),
    /* 02 */ op(COP, Immediate8, 7),
    /* 03 */ op(ORA, StackRelative, 4),
    /* 04 */ op(TSB, Direct, 5),
    /* 05 */ op(ORA, Direct, 3),
    /* 06 */ op(ASL, Direct, 5),
    /* 07 */ op(ORA, DirectIndirectLong, 6),
    /* 08 */ op(PHP, Implied, 3),
    /* 09 */ op(ORA, ImmediateM, 2),
    /* 0A */ op(ASL, Accumulator, 2),
    /* 0B */ op(PHD, Implied, 4),
    /* 0C */ op(TSB, Absolute, 6),
    /* 0D */ op(ORA, Absolute, 4),
    /* 0E */ op(ASL, Absolute, 6),
    /* 0F */ op(ORA, AbsoluteLong, 5),
    /* 10 */ op(BPL, Relative, 2),
    /* 11 */ op(ORA, DirectIndirectIndexed, 5),
    /* 12 */ op(ORA, DirectIndirect, 5),
    /* 13 */ op(ORA, StackRelativeIndirectIndexed, 7),
    /* 14 */ op(TRB, Direct, 5),
    /* 15 */ op(ORA, DirectX, 4),
    /* 16 */ op(ASL, DirectX, 6),
    /* 17 */ op(ORA, DirectIndirectLongIndexed, 6),
    /* 18 */ op(CLC, Implied, 2),
    /* 19 */ op(ORA, AbsoluteY, 4),
    /* 1A */ op(INC, Accumulator, 2),
    /* 1B */ op(TCS, Implied, 2),
    /* 1C */ op(TRB, Absolute, 6),
    /* 1D */ op(ORA, AbsoluteX, 4),
    /* 1E */ op(ASL, AbsoluteX, 7),
    /* 1F */ op(ORA, AbsoluteLongX, 5),
    /* 20 */ op(JSR, Absolute, 6),
    /* 21 */ op(AND, DirectIndexedIndirect, 6),
    /* 22 */ op(JSL, AbsoluteLong, 8),
    /* 23 */ op(AND, StackRelative, 4),
    /* 24 */ op(BIT, Direct, 3),
    /* 25 */ op(AND, Direct, 3),
    /* 26 */ op(ROL, Direct, 5),
    /* 27 */ op(AND, DirectIndirectLong, 6),
    /* 28 */ op(PLP, Implied, 4),
    /* 29 */ op(AND, ImmediateM, 2),
    /* 2A */ op(ROL, Accumulator, 2),
    /* 2B */ op(PLD, Implied, 5),
    /* 2C */ op(BIT, Absolute, 4),
    /* 2D */ op(AND, Absolute, 4),
    /* 2E */ op(ROL, Absolute, 6),
    /* 2F */ op(AND, AbsoluteLong, 5),
    /* 30 */ op(BMI, Relative, 2),
    /* 31 */ op(AND, DirectIndirectIndexed, 5),
    /* 32 */ op(AND, DirectIndirect, 5),
    /* 33 */ op(AND, StackRelativeIndirectIndexed, 7),
    /* 34 */ op(BIT, DirectX, 4),
    /* 35 */ op(AND, DirectX, 4),
    /* 36 */ op(ROL, DirectX, 6),
    /* 37 */ op(AND, DirectIndirectLongIndexed, 6),
    /* 38 */ op(SEC, Implied, 2),
    /* 39 */ op(AND, AbsoluteY, 4),
    /* 3A */ op(DEC, Accumulator, 2),
    /* 3B */ op(TSC, Implied, 2),
    /* 3C */ op(BIT, AbsoluteX, 4),
    /* 3D */ op(AND, AbsoluteX, 4),
    /* 3E */ op(ROL, AbsoluteX, 7),
    /* 3F */ op(AND, AbsoluteLongX, 5),
    /* 40 */ op(RTI, Implied, 6),
    /* 41 */ op(EOR, DirectIndexedIndirect, 6),
    /* 42 */ op(WDM, Immediate8, 2),
    /* 43 */ op(EOR, StackRelative, 4),
    /* 44 */ op(MVP, BlockMove, 7),
    /* 45 */ op(EOR, Direct, 3),
    /* 46 */ op(LSR, Direct, 5),
    /* 47 */ op(EOR, DirectIndirectLong, 6),
    /* 48 */ op(PHA, Implied, 3),
    /* 49 */ op(EOR, ImmediateM, 2),
    /* 4A */ op(LSR, Accumulator, 2),
    /* 4B */ op(PHK, Implied, 3),
    /* 4C */ op(JMP, Absolute, 3),
    /* 4D */ op(EOR, Absolute, 4),
    /* 4E */ op(LSR, Absolute, 6),
    /* 4F */ op(EOR, AbsoluteLong, 5),
    /* 50 */ op(BVC, Relative, 2),
    /* 51 */ op(EOR, DirectIndirectIndexed, 5),
    /* 52 */ op(EOR, DirectIndirect, 5),
    /* 53 */ op(EOR, StackRelativeIndirectIndexed, 7),
    /* 54 */ op(MVN, BlockMove, 7),
    /* 55 */ op(EOR, DirectX, 4),
    /* 56 */ op(LSR, DirectX, 6),
    /* 57 */ op(EOR, DirectIndirectLongIndexed, 6),
    /* 58 */ op(CLI, Implied, 2),
    /* 59 */ op(EOR, AbsoluteY, 4),
    /* 5A */ op(PHY, Implied, 3),
    /* 5B */ op(TCD, Implied, 2),
    /* 5C */ op(JML, AbsoluteLong, 4),
    /* 5D */ op(EOR, AbsoluteX, 4),
    /* 5E */ op(LSR, AbsoluteX, 7),
    /* 5F */ op(EOR, AbsoluteLongX, 5),
    /* 60 */ op(RTS, Implied, 6),
    /* 61 */ op(ADC, DirectIndexedIndirect, 6),
    /* 62 */ op(PER, RelativeLong, 6),
    /* 63 */ op(ADC, StackRelative, 4),
    /* 64 */ op(STZ, Direct, 3),
    /* 65 */ op(ADC, Direct, 3),
    /* 66 */ op(ROR, Direct, 5),
    /* 67 */ op(ADC, DirectIndirectLong, 6),
    /* 68 */ op(PLA, Implied, 4),
    /* 69 */ op(ADC, ImmediateM, 2),
    /* 6A */ op(ROR, Accumulator, 2),
    /* 6B */ op(RTL, Implied, 6),
    /* 6C */ op(JMP, AbsoluteIndirect, 5),
    /* 6D */ op(ADC, Absolute, 4),
    /* 6E */ op(ROR, Absolute, 6),
    /* 6F */ op(ADC, AbsoluteLong, 5),
    /* 70 */ op(BVS, Relative, 2),
    /* 71 */ op(ADC, DirectIndirectIndexed, 5),
    /* 72 */ op(ADC, DirectIndirect, 5),
    /* 73 */ op(ADC, StackRelativeIndirectIndexed, 7),
    /* 74 */ op(STZ, DirectX, 4),
    /* 75 */ op(ADC, DirectX, 4),
    /* 76 */ op(ROR, DirectX, 6),
    /* 77 */ op(ADC, DirectIndirectLongIndexed, 6),
    /* 78 */ op(SEI, Implied, 2),
    /* 79 */ op(ADC, AbsoluteY, 4),
    /* 7A */ op(PLY, Implied, 4),
    /* 7B */ op(TDC, Implied, 2),
    /* 7C */ op(JMP, AbsoluteIndexedIndirect, 6),
    /* 7D */ op(ADC, AbsoluteX, 4),
    /* 7E */ op(ROR, AbsoluteX, 7),
    /* 7F */ op(ADC, AbsoluteLongX, 5),
    /* 80 */ op(BRA, Relative, 2),
    /* 81 */ op(STA, DirectIndexedIndirect, 6),
    /* 82 */ op(BRL, RelativeLong, 4),
    /* 83 */ op(STA, StackRelative, 4),
    /* 84 */ op(STY, Direct, 3),
    /* 85 */ op(STA, Direct, 3),
    /* 86 */ op(STX, Direct, 3),
    /* 87 */ op(STA, DirectIndirectLong, 6),
    /* 88 */ op(DEY, Implied, 2),
    /* 89 */ op(BIT, ImmediateM, 2),
    /* 8A */ op(TXA, Implied, 2),
    /* 8B */ op(PHB, Implied, 3),
    /* 8C */ op(STY, Absolute, 4),
    /* 8D */ op(STA, Absolute, 4),
    /* 8E */ op(STX, Absolute, 4),
    /* 8F */ op(STA, AbsoluteLong, 5),
    /* 90 */ op(BCC, Relative, 2),
    /* 91 */ op(STA, DirectIndirectIndexed, 6),
    /* 92 */ op(STA, DirectIndirect, 5),
    /* 93 */ op(STA, StackRelativeIndirectIndexed, 7),
    /* 94 */ op(STY, DirectX, 4),
    /* 95 */ op(STA, DirectX, 4),
    /* 96 */ op(STX, DirectY, 4),
    /* 97 */ op(STA, DirectIndirectLongIndexed, 6),
    /* 98 */ op(TYA, Implied, 2),
    /* 99 */ op(STA, AbsoluteY, 5),
    /* 9A */ op(TXS, Implied, 2),
    /* 9B */ op(TXY, Implied, 2),
    /* 9C */ op(STZ, Absolute, 4),
    /* 9D */ op(STA, AbsoluteX, 5),
    /* 9E */ op(STZ, AbsoluteX, 5),
    /* 9F */ op(STA, AbsoluteLongX, 5),
    /* A0 */ op(LDY, ImmediateX, 2),
    /* A1 */ op(LDA, DirectIndexedIndirect, 6),
    /* A2 */ op(LDX, ImmediateX, 2),
    /* A3 */ op(LDA, StackRelative, 4),
    /* A4 */ op(LDY, Direct, 3),
    /* A5 */ op(LDA, Direct, 3),
    /* A6 */ op(LDX, Direct, 3),
    /* A7 */ op(LDA, DirectIndirectLong, 6),
    /* A8 */ op(TAY, Implied, 2),
    /* A9 */ op(LDA, ImmediateM, 2),
    /* AA */ op(TAX, Implied, 2),
    /* AB */ op(PLB, Implied, 4),
    /* AC */ op(LDY, Absolute, 4),
    /* AD */ op(LDA, Absolute, 4),
    /* AE */ op(LDX, Absolute, 4),
    /* AF */ op(LDA, AbsoluteLong, 5),
    /* B0 */ op(BCS, Relative, 2),
    /* B1 */ op(LDA, DirectIndirectIndexed, 5),
    /* B2 */ op(LDA, DirectIndirect, 5),
    /* B3 */ op(LDA, StackRelativeIndirectIndexed, 7),
    /* B4 */ op(LDY, DirectX, 4),
    /* B5 */ op(LDA, DirectX, 4),
    /* B6 */ op(LDX, DirectY, 4),
    /* B7 */ op(LDA, DirectIndirectLongIndexed, 6),
    /* B8 */ op(CLV, Implied, 2),
    /* B9 */ op(LDA, AbsoluteY, 4),
    /* BA */ op(TSX, Implied, 2),
    /* BB */ op(TYX, Implied, 2),
    /* BC */ op(LDY, AbsoluteX, 4),
    /* BD */ op(LDA, AbsoluteX, 4),
    /* BE */ op(LDX, AbsoluteY, 4),
    /* BF */ op(LDA, AbsoluteLongX, 5),
    /* C0 */ op(CPY, ImmediateX, 2),
    /* C1 */ op(CMP, DirectIndexedIndirect, 6),
    /* C2 */ op(REP, Immediate8, 3),
    /* C3 */ op(CMP, StackRelative, 4),
    /* C4 */ op(CPY, Direct, 3),
    /* C5 */ op(CMP, Direct, 3),
    /* C6 */ op(DEC, Direct, 5),
    /* C7 */ op(CMP, DirectIndirectLong, 6),
    /* C8 */ op(INY, Implied, 2),
    /* C9 */ op(CMP, ImmediateM, 2),
    /* CA */ op(DEX, Implied, 2),
    /* CB */ op(WAI, Implied, 3),
    /* CC */ op(CPY, Absolute, 4),
    /* CD */ op(CMP, Absolute, 4),
    /* CE */ op(DEC, Absolute, 6),
    /* CF */ op(CMP, AbsoluteLong, 5),
    /* D0 */ op(BNE, Relative, 2),
    /* D1 */ op(CMP, DirectIndirectIndexed, 5),
    /* D2 */ op(CMP, DirectIndirect, 5),
    /* D3 */ op(CMP, StackRelativeIndirectIndexed, 7),
    /* D4 */ op(PEI, Direct, 6),
    /* D5 */ op(CMP, DirectX, 4),
    /* D6 */ op(DEC, DirectX, 6),
    /* D7 */ op(CMP, DirectIndirectLongIndexed, 6),
    /* D8 */ op(CLD, Implied, 2),
    /* D9 */ op(CMP, AbsoluteY, 4),
    /* DA */ op(PHX, Implied, 3),
    /* DB */ op(STP, Implied, 3),
    /* DC */ op(JML, AbsoluteIndirectLong, 6),
    /* DD */ op(CMP, AbsoluteX, 4),
    /* DE */ op(DEC, AbsoluteX, 7),
    /* DF */ op(CMP, AbsoluteLongX, 5),
    /* E0 */ op(CPX, ImmediateX, 2),
    /* E1 */ op(SBC, DirectIndexedIndirect, 6),
    /* E2 */ op(SEP, Immediate8, 3),
    /* E3 */ op(SBC, StackRelative, 4),
    /* E4 */ op(CPX, Direct, 3),
    /* E5 */ op(SBC, Direct, 3),
    /* E6 */ op(INC, Direct, 5),
    /* E7 */ op(SBC, DirectIndirectLong, 6),
    /* E8 */ op(INX, Implied, 2),
    /* E9 */ op(SBC, ImmediateM, 2),
    /* EA */ op(NOP, Implied, 2),
    /* EB */ op(XBA, Implied, 3),
    /* EC */ op(CPX, Absolute, 4),
    /* ED */ op(SBC, Absolute, 4),
    /* EE */ op(INC, Absolute, 6),
    /* EF */ op(SBC, AbsoluteLong, 5),
    /* F0 */ op(BEQ, Relative, 2),
    /* F1 */ op(SBC, DirectIndirectIndexed, 5),
    /* F2 */ op(SBC, DirectIndirect, 5),
    /* F3 */ op(SBC, StackRelativeIndirectIndexed, 7),
    /* F4 */ op(PEA, Immediate16, 5),
    /* F5 */ op(SBC, DirectX, 4),
    /* F6 */ op(INC, DirectX, 6),
    /* F7 */ op(SBC, DirectIndirectLongIndexed, 6),
    /* F8 */ op(SED, Implied, 2),
    /* F9 */ op(SBC, AbsoluteY, 4),
    /* FA */ op(PLX, Implied, 4),
    /* FB */ op(XCE, Implied, 2),
    /* FC */ op(JSR, AbsoluteIndexedIndirect, 8),
    /* FD */ op(SBC, AbsoluteX, 4),
    /* FE */ op(INC, AbsoluteX, 7),
    /* FF */ op(SBC, AbsoluteLongX, 5),
];

#[inline]
pub fn lookup(opcode: u8) -> &'static Instruction {
    &OPCODES[opcode as usize]
}
