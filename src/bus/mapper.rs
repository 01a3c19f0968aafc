use crate::cartridge::RomType;
use crate::memory::MemoryAddress;
use crate::ports::PortId;

/// Concrete backing store an address resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    SystemRam(usize),
    CartridgeRom(usize),
    CartridgeSram(usize),
    Peripheral(PortId, u16),
    OpenBus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    LoRom,
    HiRom,
}

/// Bank/offset decoder for one cartridge layout. The strategy is fixed at
/// construction and never re-evaluated per access.
#[derive(Debug, Clone)]
pub struct Mapper {
    rom_type: RomType,
    strategy: Strategy,
    // Ex layouts keep the "slow" half (banks $00-$7D) 4MB into the image.
    extended_base: usize,
    rom_size: usize,
    sram_size: usize,
}

impl Mapper {
    pub fn new(rom_type: RomType, rom_size: usize, sram_size: usize) -> Self {
        let strategy = if rom_type.is_hirom() {
            Strategy::HiRom
        } else {
            Strategy::LoRom
        };
        Self {
            rom_type,
            strategy,
            extended_base: if rom_type.is_extended() { 0x40_0000 } else { 0 },
            rom_size,
            sram_size,
        }
    }

    pub fn rom_type(&self) -> RomType {
        self.rom_type
    }

    pub fn resolve(&self, addr: MemoryAddress) -> Location {
        match self.strategy {
            Strategy::LoRom => self.resolve_lorom(addr.bank, addr.offset),
            Strategy::HiRom => self.resolve_hirom(addr.bank, addr.offset),
        }
    }

    fn resolve_lorom(&self, bank: u8, offset: u16) -> Location {
        let fast = bank & 0x80 != 0;
        let b = bank & 0x7F;
        // Ex layout: fast banks read the first 4MB, slow banks the second.
        let base = if fast { 0 } else { self.extended_base };

        match b {
            0x00..=0x3F => match offset {
                0x0000..=0x5FFF => system_area(offset),
                // Expansion area; nothing fitted on a plain cartridge
                0x6000..=0x7FFF => Location::OpenBus,
                _ => self.rom(base + (b as usize) * 0x8000 + (offset as usize - 0x8000)),
            },
            0x40..=0x6F => self.rom(base + (b as usize) * 0x8000 + (offset as usize & 0x7FFF)),
            0x7E..=0x7F if !fast => {
                Location::SystemRam((b as usize - 0x7E) * 0x10000 + offset as usize)
            }
            // $70-$7D, and $F0-$FF on the fast side
            _ => {
                if offset < 0x8000 {
                    self.sram((b as usize - 0x70) * 0x8000 + offset as usize)
                } else {
                    self.rom(base + (b as usize) * 0x8000 + (offset as usize - 0x8000))
                }
            }
        }
    }

    fn resolve_hirom(&self, bank: u8, offset: u16) -> Location {
        match bank {
            0x00..=0x3F | 0x80..=0xBF => {
                let b = (bank & 0x3F) as usize;
                match offset {
                    0x0000..=0x5FFF => system_area(offset),
                    0x6000..=0x7FFF => {
                        if b < 0x20 {
                            // Reserved window (coprocessor space on some boards)
                            Location::OpenBus
                        } else {
                            self.sram((b - 0x20) * 0x2000 + (offset as usize - 0x6000))
                        }
                    }
                    _ => {
                        let base = if bank & 0x80 != 0 { 0 } else { self.extended_base };
                        self.rom(base + b * 0x10000 + offset as usize)
                    }
                }
            }
            0x40..=0x7D => {
                self.rom(self.extended_base + (bank as usize - 0x40) * 0x10000 + offset as usize)
            }
            0x7E..=0x7F => Location::SystemRam((bank as usize - 0x7E) * 0x10000 + offset as usize),
            // $C0-$FD mirror $40-$7D; $FE-$FF finish the last 128KB
            0xC0..=0xFF => self.rom((bank as usize - 0xC0) * 0x10000 + offset as usize),
        }
    }

    fn rom(&self, index: usize) -> Location {
        if self.rom_size == 0 {
            return Location::OpenBus;
        }
        Location::CartridgeRom(mirror(index, self.rom_size))
    }

    fn sram(&self, index: usize) -> Location {
        if self.sram_size == 0 {
            return Location::OpenBus;
        }
        Location::CartridgeSram(index % self.sram_size)
    }
}

/// Shared layout of the low 24KB of every system bank.
fn system_area(offset: u16) -> Location {
    match offset {
        0x0000..=0x1FFF => Location::SystemRam(offset as usize),
        _ => match PortId::decode(offset) {
            Some((id, port_offset)) => Location::Peripheral(id, port_offset),
            None => Location::OpenBus,
        },
    }
}

/// Fold a linear ROM index into an image that is not a power of two in size.
/// Power-of-two images reduce to a plain modulo; odd sizes repeat their
/// trailing chunk the way the cartridge address decoder does.
pub fn mirror(index: usize, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    let mut addr = index;
    let mut size = size;
    let mut base = 0usize;
    let mut mask = 1usize << 24;
    while addr >= size {
        while addr & mask == 0 {
            mask >>= 1;
        }
        addr -= mask;
        if size > mask {
            size -= mask;
            base += mask;
        }
        mask >>= 1;
    }
    base + addr
}
