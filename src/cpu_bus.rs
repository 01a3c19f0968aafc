//! Trait representing the minimal bus interface required by the 65C816 core.

use crate::memory::MemoryAddress;

/// Multi-byte helpers read and write little-endian and advance the offset
/// without carrying into the bank byte.
pub trait CpuBus {
    fn read_u8(&mut self, addr: MemoryAddress) -> u8;
    fn write_u8(&mut self, addr: MemoryAddress, value: u8);

    fn read_u16(&mut self, addr: MemoryAddress) -> u16 {
        let lo = self.read_u8(addr) as u16;
        let hi = self.read_u8(addr.wrapping_add_offset(1)) as u16;
        (hi << 8) | lo
    }
    fn read_u24(&mut self, addr: MemoryAddress) -> u32 {
        let lo = self.read_u16(addr) as u32;
        let bank = self.read_u8(addr.wrapping_add_offset(2)) as u32;
        (bank << 16) | lo
    }
    fn write_u16(&mut self, addr: MemoryAddress, value: u16) {
        self.write_u8(addr, (value & 0xFF) as u8);
        self.write_u8(addr.wrapping_add_offset(1), (value >> 8) as u8);
    }
    fn write_u32(&mut self, addr: MemoryAddress, value: u32) {
        self.write_u16(addr, (value & 0xFFFF) as u16);
        self.write_u16(addr.wrapping_add_offset(2), (value >> 16) as u16);
    }

    fn poll_nmi(&mut self) -> bool {
        false
    }
    fn acknowledge_nmi(&mut self) {}
    fn poll_irq(&mut self) -> bool {
        false
    }
}
