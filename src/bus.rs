//! System bus: the single path for every CPU memory access.

pub mod mapper;

#[cfg(test)]
mod tests;

use crate::cartridge::{Cartridge, RomType};
use crate::config::CoreConfig;
use crate::cpu_bus::CpuBus;
use crate::debug_flags;
use crate::error::{CoreError, Result};
use crate::memory::{MemoryAddress, Wram};
use crate::ports::{PortHandler, PortId, Ports};

pub use mapper::{Location, Mapper};

pub type OpenBusHook = Box<dyn FnMut(MemoryAddress, u8)>;

pub struct Bus {
    wram: Wram,
    cartridge: Cartridge,
    mapper: Mapper,
    ports: Ports,
    // Last value driven onto the data bus
    open_bus: u8,
    open_bus_reads: u64,
    open_bus_hook: Option<OpenBusHook>,
    nmi_pending: bool,
    irq_line: bool,
}

impl Bus {
    pub fn new(cartridge: Cartridge) -> Result<Self> {
        let rom_type = cartridge.mapping_mode();
        // Ex layouts only differ from the plain ones above 4MB
        if rom_type.is_extended() && cartridge.size() <= 0x40_0000 {
            return Err(CoreError::InvalidMappingConfiguration(rom_type.map_mode()));
        }
        let mapper = Mapper::new(rom_type, cartridge.size(), cartridge.sram_size());
        log::debug!(
            "bus: {:?} mapper, rom {} bytes, sram {} bytes",
            rom_type,
            cartridge.size(),
            cartridge.sram_size()
        );
        Ok(Bus {
            wram: Wram::new(),
            cartridge,
            mapper,
            ports: Ports::new(),
            open_bus: 0,
            open_bus_reads: 0,
            open_bus_hook: None,
            nmi_pending: false,
            irq_line: false,
        })
    }

    /// Build a cartridge from a raw image using the configured layout and
    /// wire it to a fresh bus.
    pub fn from_config(image: Vec<u8>, config: &CoreConfig) -> Result<Self> {
        let mut cartridge = Cartridge::from_bytes(image, config.rom_type)?;
        if let Some(size) = config.sram_size {
            cartridge.resize_sram(size);
        }
        Self::new(cartridge)
    }

    pub fn rom_type(&self) -> RomType {
        self.mapper.rom_type()
    }

    pub fn resolve(&self, addr: MemoryAddress) -> Location {
        self.mapper.resolve(addr)
    }

    pub fn attach_port(&mut self, id: PortId, handler: Box<dyn PortHandler>) {
        self.ports.attach(id, handler);
    }

    pub fn detach_port(&mut self, id: PortId) -> Option<Box<dyn PortHandler>> {
        self.ports.detach(id)
    }

    pub fn open_bus(&self) -> u8 {
        self.open_bus
    }

    pub fn open_bus_reads(&self) -> u64 {
        self.open_bus_reads
    }

    pub fn set_open_bus_hook(&mut self, hook: OpenBusHook) {
        self.open_bus_hook = Some(hook);
    }

    pub fn clear_open_bus_hook(&mut self) {
        self.open_bus_hook = None;
    }

    pub fn wram(&self) -> &Wram {
        &self.wram
    }

    pub fn wram_mut(&mut self) -> &mut Wram {
        &mut self.wram
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    pub fn cartridge_mut(&mut self) -> &mut Cartridge {
        &mut self.cartridge
    }

    /// Latch an NMI edge. It stays pending until the CPU takes it.
    pub fn raise_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// IRQ is level triggered; the line stays asserted until cleared.
    pub fn set_irq_line(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    fn read_open_bus(&mut self, addr: MemoryAddress) -> u8 {
        let value = self.open_bus;
        self.open_bus_reads = self.open_bus_reads.wrapping_add(1);
        if debug_flags::open_bus() {
            log::debug!("open bus read at {} -> 0x{:02X}", addr, value);
        }
        if let Some(hook) = self.open_bus_hook.as_mut() {
            hook(addr, value);
        }
        value
    }
}

impl CpuBus for Bus {
    fn read_u8(&mut self, addr: MemoryAddress) -> u8 {
        let value = match self.mapper.resolve(addr) {
            Location::SystemRam(index) => self.wram.read(index),
            Location::CartridgeRom(index) => self.cartridge.read_byte(index),
            Location::CartridgeSram(index) => self.cartridge.read_sram(index),
            Location::Peripheral(id, offset) => {
                // Undriven register bits float to the previous bus value
                let mut data = self.open_bus;
                if self.ports.access(id, offset, &mut data, false) {
                    data
                } else {
                    self.read_open_bus(addr)
                }
            }
            Location::OpenBus => self.read_open_bus(addr),
        };
        self.open_bus = value;
        value
    }

    fn write_u8(&mut self, addr: MemoryAddress, value: u8) {
        match self.mapper.resolve(addr) {
            Location::SystemRam(index) => self.wram.write(index, value),
            Location::CartridgeSram(index) => self.cartridge.write_sram(index, value),
            Location::CartridgeRom(_) => {
                if debug_flags::mapper() {
                    log::debug!("ignored ROM write at {} (0x{:02X})", addr, value);
                }
            }
            Location::Peripheral(id, offset) => {
                let mut data = value;
                self.ports.access(id, offset, &mut data, true);
            }
            Location::OpenBus => {
                if debug_flags::mapper() {
                    log::debug!("write to unmapped {} (0x{:02X})", addr, value);
                }
            }
        }
        self.open_bus = value;
    }

    fn poll_nmi(&mut self) -> bool {
        self.nmi_pending
    }

    fn acknowledge_nmi(&mut self) {
        self.nmi_pending = false;
    }

    fn poll_irq(&mut self) -> bool {
        self.irq_line
    }
}
