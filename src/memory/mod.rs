use std::fmt;

/// Size of the on-board work RAM (banks $7E-$7F).
pub const WRAM_SIZE: usize = 0x20000;

/// A 24-bit bus address split into its bank and 16-bit offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MemoryAddress {
    pub bank: u8,
    pub offset: u16,
}

impl MemoryAddress {
    pub const fn new(bank: u8, offset: u16) -> Self {
        Self { bank, offset }
    }

    pub const fn from_u24(addr: u32) -> Self {
        Self {
            bank: ((addr >> 16) & 0xFF) as u8,
            offset: (addr & 0xFFFF) as u16,
        }
    }

    pub const fn to_u24(self) -> u32 {
        ((self.bank as u32) << 16) | (self.offset as u32)
    }

    /// Advance the offset, wrapping inside the current bank.
    pub const fn wrapping_add_offset(self, n: u16) -> Self {
        Self {
            bank: self.bank,
            offset: self.offset.wrapping_add(n),
        }
    }

    /// Advance across the whole 24-bit space, carrying into the bank.
    pub const fn wrapping_add_long(self, n: u32) -> Self {
        Self::from_u24(self.to_u24().wrapping_add(n) & 0x00FF_FFFF)
    }
}

impl From<u32> for MemoryAddress {
    fn from(addr: u32) -> Self {
        Self::from_u24(addr)
    }
}

impl From<MemoryAddress> for u32 {
    fn from(addr: MemoryAddress) -> Self {
        addr.to_u24()
    }
}

impl fmt::Display for MemoryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:02X}:{:04X}", self.bank, self.offset)
    }
}

/// 128KB of system work RAM. The low 8KB is shadowed into every system bank
/// by the mapper; the rest is only reachable through banks $7E-$7F.
pub struct Wram {
    ram: Box<[u8]>,
}

impl Wram {
    pub fn new() -> Self {
        Wram {
            ram: vec![0; WRAM_SIZE].into_boxed_slice(),
        }
    }

    pub fn read(&self, index: usize) -> u8 {
        self.ram[index % WRAM_SIZE]
    }

    pub fn write(&mut self, index: usize, data: u8) {
        self.ram[index % WRAM_SIZE] = data;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.ram
    }

    /// Copy `data` into RAM starting at `index` (wrapping at the end).
    pub fn load(&mut self, index: usize, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            self.write(index + i, byte);
        }
    }
}

impl Default for Wram {
    fn default() -> Self {
        Self::new()
    }
}
