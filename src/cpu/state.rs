use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::memory::MemoryAddress;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct StatusFlags: u8 {
        const CARRY = 0x01;
        const ZERO = 0x02;
        const IRQ_DISABLE = 0x04;
        const DECIMAL = 0x08;
        const INDEX_8BIT = 0x10;
        const MEMORY_8BIT = 0x20;
        const OVERFLOW = 0x40;
        const NEGATIVE = 0x80;
    }
}

/// Status value after reset: M, X and I set.
pub const POWER_ON_STATUS: u8 = 0x34;

/// Register file of the 65C816.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuState {
    pub a: u16,
    pub x: u16,
    pub y: u16,
    pub sp: u16,
    pub dp: u16,
    pub db: u8,
    pub pb: u8,
    pub pc: u16,
    pub p: StatusFlags,
    pub emulation_mode: bool,
    pub cycles: u64,
    pub waiting_for_irq: bool,
    pub stopped: bool,
}

impl CpuState {
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0x01FF,
            dp: 0,
            db: 0,
            pb: 0,
            pc: 0,
            p: StatusFlags::from_bits_truncate(POWER_ON_STATUS),
            emulation_mode: true,
            cycles: 0,
            waiting_for_irq: false,
            stopped: false,
        }
    }

    #[inline]
    pub fn memory_is_8bit(&self) -> bool {
        self.emulation_mode || self.p.contains(StatusFlags::MEMORY_8BIT)
    }

    #[inline]
    pub fn index_is_8bit(&self) -> bool {
        self.emulation_mode || self.p.contains(StatusFlags::INDEX_8BIT)
    }

    /// X as seen by address arithmetic at the current index width.
    #[inline]
    pub fn index_x(&self) -> u16 {
        if self.index_is_8bit() {
            self.x & 0x00FF
        } else {
            self.x
        }
    }

    #[inline]
    pub fn index_y(&self) -> u16 {
        if self.index_is_8bit() {
            self.y & 0x00FF
        } else {
            self.y
        }
    }

    #[inline]
    pub fn program_address(&self) -> MemoryAddress {
        MemoryAddress::new(self.pb, self.pc)
    }

    #[inline]
    pub fn flag(&self, flag: StatusFlags) -> bool {
        self.p.contains(flag)
    }

    /// Load P from a raw byte (PLP, RTI, REP, SEP). Emulation mode pins M/X
    /// and an 8-bit index width drops the high bytes of X and Y.
    pub fn set_status(&mut self, value: u8) {
        self.p = StatusFlags::from_bits_truncate(value);
        if self.emulation_mode {
            self.p.insert(StatusFlags::MEMORY_8BIT | StatusFlags::INDEX_8BIT);
        }
        if self.p.contains(StatusFlags::INDEX_8BIT) {
            self.x &= 0x00FF;
            self.y &= 0x00FF;
        }
    }

    /// Stack pointer write; emulation mode keeps it in page 1.
    pub fn set_sp(&mut self, value: u16) {
        self.sp = if self.emulation_mode {
            0x0100 | (value & 0x00FF)
        } else {
            value
        };
    }

    pub fn set_emulation_mode(&mut self, on: bool) {
        self.emulation_mode = on;
        if on {
            self.p.insert(StatusFlags::MEMORY_8BIT | StatusFlags::INDEX_8BIT);
            self.x &= 0x00FF;
            self.y &= 0x00FF;
            self.sp = 0x0100 | (self.sp & 0x00FF);
        }
    }
}

impl Default for CpuState {
    fn default() -> Self {
        Self::new()
    }
}
