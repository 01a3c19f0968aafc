use super::*;
use crate::ports::ApuPorts;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn lorom_bus(size: usize) -> Bus {
    let mut rom = vec![0u8; size];
    rom[0x0000] = 0x11;
    if size > 0x8000 {
        rom[0x8000] = 0x22;
    }
    // 8KB SRAM
    rom[0x7FC0 + 0x18] = 0x03;
    let cart = Cartridge::from_bytes(rom, RomType::LoRom).unwrap();
    Bus::new(cart).unwrap()
}

fn hirom_bus() -> Bus {
    let mut rom = vec![0u8; 0x20000];
    rom[0x8000] = 0x5A;
    rom[0x1_0000] = 0x6B;
    let mut cart = Cartridge::from_bytes(rom, RomType::HiRom).unwrap();
    cart.resize_sram(0x2000);
    Bus::new(cart).unwrap()
}

#[test]
fn test_lorom_bank_layout() {
    let bus = lorom_bus(0x20000);
    assert_eq!(
        bus.resolve(MemoryAddress::new(0x00, 0x8000)),
        Location::CartridgeRom(0)
    );
    assert_eq!(
        bus.resolve(MemoryAddress::new(0x01, 0x8000)),
        Location::CartridgeRom(0x8000)
    );
    // FastROM mirror
    assert_eq!(
        bus.resolve(MemoryAddress::new(0x81, 0x8000)),
        Location::CartridgeRom(0x8000)
    );
    assert_eq!(
        bus.resolve(MemoryAddress::new(0x00, 0x1FFF)),
        Location::SystemRam(0x1FFF)
    );
    assert_eq!(
        bus.resolve(MemoryAddress::new(0x7F, 0x0010)),
        Location::SystemRam(0x1_0010)
    );
    assert_eq!(
        bus.resolve(MemoryAddress::new(0x00, 0x6000)),
        Location::OpenBus
    );
    assert_eq!(
        bus.resolve(MemoryAddress::new(0x70, 0x0004)),
        Location::CartridgeSram(4)
    );
    assert_eq!(
        bus.resolve(MemoryAddress::new(0x00, 0x2118)),
        Location::Peripheral(PortId::Ppu, 0x18)
    );
}

#[test]
fn test_lorom_reads_rom_bytes() {
    let mut bus = lorom_bus(0x20000);
    assert_eq!(bus.read_u8(MemoryAddress::new(0x00, 0x8000)), 0x11);
    assert_eq!(bus.read_u8(MemoryAddress::new(0x01, 0x8000)), 0x22);
    // 128KB image repeats every four banks
    assert_eq!(bus.read_u8(MemoryAddress::new(0x05, 0x8000)), 0x22);
}

#[test]
fn test_hirom_fastrom_mirror() {
    let mut bus = hirom_bus();
    let slow = bus.read_u8(MemoryAddress::new(0x00, 0x8000));
    let fast = bus.read_u8(MemoryAddress::new(0xC0, 0x8000));
    assert_eq!(slow, 0x5A);
    assert_eq!(slow, fast);
    assert_eq!(bus.read_u8(MemoryAddress::new(0x41, 0x0000)), 0x6B);
    assert_eq!(bus.read_u8(MemoryAddress::new(0x81, 0x0000)), 0x00); // WRAM shadow
}

#[test]
fn test_hirom_sram_window() {
    let mut bus = hirom_bus();
    assert_eq!(
        bus.resolve(MemoryAddress::new(0x10, 0x6000)),
        Location::OpenBus
    );
    bus.write_u8(MemoryAddress::new(0x30, 0x6001), 0x99);
    assert_eq!(bus.cartridge().read_sram(1), 0x99);
    assert_eq!(bus.read_u8(MemoryAddress::new(0xB0, 0x6001)), 0x99);
}

#[test]
fn test_open_bus_persists_across_unmapped_reads() {
    let mut bus = lorom_bus(0x20000);
    assert_eq!(bus.read_u8(MemoryAddress::new(0x01, 0x8000)), 0x22);

    let first = bus.read_u8(MemoryAddress::new(0x00, 0x6000));
    assert_eq!(first, 0x22);
    let second = bus.read_u8(MemoryAddress::new(0x00, 0x7ABC));
    assert_eq!(second, first);
    assert_eq!(bus.open_bus_reads(), 2);
}

#[test]
fn test_open_bus_tracks_writes() {
    let mut bus = lorom_bus(0x8000);
    bus.write_u8(MemoryAddress::new(0x7E, 0x0000), 0xC3);
    assert_eq!(bus.read_u8(MemoryAddress::new(0x00, 0x6000)), 0xC3);
}

#[test]
fn test_open_bus_hook_sees_reads() {
    let mut bus = lorom_bus(0x8000);
    let seen = Rc::new(Cell::new(None));
    let sink = seen.clone();
    bus.set_open_bus_hook(Box::new(move |addr, value| sink.set(Some((addr, value)))));

    bus.write_u8(MemoryAddress::new(0x00, 0x0000), 0x42);
    bus.read_u8(MemoryAddress::new(0x00, 0x5000));
    assert_eq!(seen.get(), Some((MemoryAddress::new(0x00, 0x5000), 0x42)));
}

#[test]
fn test_rom_is_read_only() {
    let mut bus = lorom_bus(0x8000);
    bus.write_u8(MemoryAddress::new(0x00, 0x8000), 0xEE);
    assert_eq!(bus.read_u8(MemoryAddress::new(0x00, 0x8000)), 0x11);
}

#[test]
fn test_peripheral_forwarding() {
    let mut bus = lorom_bus(0x8000);
    let apu = Rc::new(RefCell::new(ApuPorts::new()));
    bus.attach_port(PortId::Apu, Box::new(apu.clone()));

    bus.write_u8(MemoryAddress::new(0x00, 0x2141), 0x55);
    assert_eq!(apu.borrow().read_from_cpu(1), 0x55);

    apu.borrow_mut().write_to_cpu(0, 0xAA);
    // $2144 mirrors $2140
    assert_eq!(bus.read_u8(MemoryAddress::new(0x80, 0x2144)), 0xAA);
    assert_eq!(bus.open_bus_reads(), 0);
}

#[test]
fn test_unattached_port_reads_open_bus() {
    let mut bus = lorom_bus(0x8000);
    bus.read_u8(MemoryAddress::new(0x00, 0x8000));
    assert_eq!(bus.read_u8(MemoryAddress::new(0x00, 0x2137)), 0x11);
    assert_eq!(bus.open_bus_reads(), 1);
}

#[test]
fn test_word_access_wraps_within_bank() {
    let mut bus = lorom_bus(0x8000);
    bus.write_u8(MemoryAddress::new(0x7E, 0xFFFF), 0x34);
    bus.write_u8(MemoryAddress::new(0x7E, 0x0000), 0x12);
    assert_eq!(bus.read_u16(MemoryAddress::new(0x7E, 0xFFFF)), 0x1234);
    // No carry into bank $7F
    assert_eq!(bus.read_u8(MemoryAddress::new(0x7F, 0x0000)), 0x00);
}

#[test]
fn test_long_and_dword_access() {
    let mut bus = lorom_bus(0x8000);
    bus.write_u32(MemoryAddress::new(0x7F, 0x1000), 0xDEAD_BEEF);
    assert_eq!(bus.read_u8(MemoryAddress::new(0x7F, 0x1000)), 0xEF);
    assert_eq!(bus.read_u8(MemoryAddress::new(0x7F, 0x1003)), 0xDE);
    assert_eq!(bus.read_u24(MemoryAddress::new(0x7F, 0x1001)), 0xDE_ADBE);
    assert_eq!(bus.read_u16(MemoryAddress::new(0x7F, 0x1002)), 0xDEAD);
}

#[test]
fn test_lorom_sram_mirrors_by_size() {
    let mut bus = lorom_bus(0x8000);
    bus.write_u8(MemoryAddress::new(0x70, 0x0003), 0x77);
    assert_eq!(bus.read_u8(MemoryAddress::new(0x70, 0x2003)), 0x77);
    assert_eq!(bus.read_u8(MemoryAddress::new(0xF0, 0x0003)), 0x77);
}

#[test]
fn test_extended_mode_requires_large_rom() {
    let cart = Cartridge::from_bytes(vec![0u8; 0x10000], RomType::ExHiRom).unwrap();
    assert!(matches!(
        Bus::new(cart),
        Err(CoreError::InvalidMappingConfiguration(0x35))
    ));
}

#[test]
fn test_extended_lorom_slow_banks_use_upper_half() {
    let mapper = Mapper::new(RomType::ExLoRom, 0x60_0000, 0);
    assert_eq!(
        mapper.resolve(MemoryAddress::new(0x80, 0x8000)),
        Location::CartridgeRom(0)
    );
    assert_eq!(
        mapper.resolve(MemoryAddress::new(0x00, 0x8000)),
        Location::CartridgeRom(0x40_0000)
    );
}

#[test]
fn test_mirror_non_power_of_two() {
    assert_eq!(mapper::mirror(0x1234, 0x8000), 0x1234);
    assert_eq!(mapper::mirror(0x9234, 0x8000), 0x1234);
    // 3MB: the last 1MB repeats
    assert_eq!(mapper::mirror(0x30_0000, 0x30_0000), 0x20_0000);
}

#[test]
fn test_from_config_overrides_sram() {
    let config = CoreConfig {
        rom_type: RomType::HiRom,
        sram_size: Some(0x800),
        ..CoreConfig::default()
    };
    let bus = Bus::from_config(vec![0u8; 0x10000], &config).unwrap();
    assert_eq!(bus.rom_type(), RomType::HiRom);
    assert_eq!(bus.cartridge().sram_size(), 0x800);
}
