//! Memory-mapped peripheral ports.
//!
//! The bus does not interpret any register semantics. It only recognises the
//! fixed B-bus / CPU I/O windows in banks $00-$3F/$80-$BF and forwards the
//! access to whatever handler is attached for that block. Unattached blocks
//! behave as open bus.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortId {
    /// $2100-$213F
    Ppu,
    /// $2140-$217F, four ports mirrored. The sound DSP sits behind this.
    Apu,
    /// $2180-$2183
    Wram,
    /// $4016-$4017 and $4200-$421F
    CpuIo,
    /// $4300-$437F
    Dma,
}

impl PortId {
    pub const ALL: [PortId; 5] = [
        PortId::Ppu,
        PortId::Apu,
        PortId::Wram,
        PortId::CpuIo,
        PortId::Dma,
    ];

    fn index(self) -> usize {
        match self {
            PortId::Ppu => 0,
            PortId::Apu => 1,
            PortId::Wram => 2,
            PortId::CpuIo => 3,
            PortId::Dma => 4,
        }
    }

    /// Map a system-area offset ($2000-$5FFF) to its port block and the
    /// offset inside that block.
    pub fn decode(offset: u16) -> Option<(PortId, u16)> {
        match offset {
            0x2100..=0x213F => Some((PortId::Ppu, offset - 0x2100)),
            0x2140..=0x217F => Some((PortId::Apu, (offset - 0x2140) & 0x03)),
            0x2180..=0x2183 => Some((PortId::Wram, offset - 0x2180)),
            0x4016..=0x4017 | 0x4200..=0x421F => Some((PortId::CpuIo, offset - 0x4000)),
            0x4300..=0x437F => Some((PortId::Dma, offset - 0x4300)),
            _ => None,
        }
    }
}

/// A peripheral register block. On reads `data` arrives holding the current
/// open-bus value; a handler that leaves it untouched models a write-only or
/// partially driven register.
pub trait PortHandler {
    fn port_access(&mut self, offset: u16, data: &mut u8, is_write: bool);
}

impl<T: PortHandler> PortHandler for Rc<RefCell<T>> {
    fn port_access(&mut self, offset: u16, data: &mut u8, is_write: bool) {
        self.borrow_mut().port_access(offset, data, is_write);
    }
}

#[derive(Default)]
pub struct Ports {
    handlers: [Option<Box<dyn PortHandler>>; 5],
}

impl Ports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, id: PortId, handler: Box<dyn PortHandler>) {
        self.handlers[id.index()] = Some(handler);
    }

    pub fn detach(&mut self, id: PortId) -> Option<Box<dyn PortHandler>> {
        self.handlers[id.index()].take()
    }

    pub fn is_attached(&self, id: PortId) -> bool {
        self.handlers[id.index()].is_some()
    }

    /// Forward an access. Returns false when nothing is attached.
    pub fn access(&mut self, id: PortId, offset: u16, data: &mut u8, is_write: bool) -> bool {
        match self.handlers[id.index()].as_mut() {
            Some(handler) => {
                handler.port_access(offset, data, is_write);
                true
            }
            None => false,
        }
    }
}

/// CPU <-> sound-core mailbox ($2140-$2143 on the CPU side, $F4-$F7 on the
/// sound side). Each direction has its own latch: the CPU reads what the
/// sound core last wrote and vice versa.
#[derive(Debug, Default, Clone)]
pub struct ApuPorts {
    cpu_to_apu: [u8; 4],
    apu_to_cpu: [u8; 4],
}

impl ApuPorts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sound-core side read of a CPU-written port.
    pub fn read_from_cpu(&self, port: usize) -> u8 {
        self.cpu_to_apu[port & 3]
    }

    /// Sound-core side write, visible to subsequent CPU reads.
    pub fn write_to_cpu(&mut self, port: usize, value: u8) {
        self.apu_to_cpu[port & 3] = value;
    }
}

impl PortHandler for ApuPorts {
    fn port_access(&mut self, offset: u16, data: &mut u8, is_write: bool) {
        let port = (offset & 3) as usize;
        if is_write {
            self.cpu_to_apu[port] = *data;
        } else {
            *data = self.apu_to_cpu[port];
        }
    }
}
