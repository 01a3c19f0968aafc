use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Cartridge address-mapping convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RomType {
    HiRom,
    LoRom,
    LoRomFastRom,
    HiRomFastRom,
    ExLoRom,
    ExHiRom,
}

impl RomType {
    /// Decode the map-mode byte stored at $FFD5 / $7FD5.
    pub fn from_map_mode(map_mode: u8) -> Result<Self> {
        match map_mode {
            0x20 => Ok(RomType::LoRom),
            0x21 => Ok(RomType::HiRom),
            0x30 => Ok(RomType::LoRomFastRom),
            0x31 => Ok(RomType::HiRomFastRom),
            0x32 => Ok(RomType::ExLoRom),
            0x35 => Ok(RomType::ExHiRom),
            other => Err(CoreError::InvalidMappingConfiguration(other)),
        }
    }

    pub fn map_mode(self) -> u8 {
        match self {
            RomType::LoRom => 0x20,
            RomType::HiRom => 0x21,
            RomType::LoRomFastRom => 0x30,
            RomType::HiRomFastRom => 0x31,
            RomType::ExLoRom => 0x32,
            RomType::ExHiRom => 0x35,
        }
    }

    pub fn is_hirom(self) -> bool {
        matches!(
            self,
            RomType::HiRom | RomType::HiRomFastRom | RomType::ExHiRom
        )
    }

    pub fn is_fastrom(self) -> bool {
        self.map_mode() & 0x10 != 0
    }

    pub fn is_extended(self) -> bool {
        matches!(self, RomType::ExLoRom | RomType::ExHiRom)
    }

    /// File offset of the internal header ($xFC0) for this layout.
    pub fn header_base(self) -> usize {
        match self {
            RomType::LoRom | RomType::LoRomFastRom => 0x7FC0,
            RomType::HiRom | RomType::HiRomFastRom => 0xFFC0,
            RomType::ExLoRom => 0x40_7FC0,
            RomType::ExHiRom => 0x40_FFC0,
        }
    }
}

impl Default for RomType {
    fn default() -> Self {
        RomType::LoRom
    }
}

#[derive(Debug, Clone)]
pub struct CartridgeHeader {
    pub title: String,
    pub map_mode: u8,
    pub chipset: u8,
    pub rom_size: usize,
    pub sram_size: usize,
    pub country: u8,
    pub version: u8,
    pub checksum: u16,
    pub checksum_complement: u16,
}

impl CartridgeHeader {
    pub fn checksums_match(&self) -> bool {
        self.checksum ^ self.checksum_complement == 0xFFFF
    }
}

/// ROM image plus battery SRAM. ROM is never written once loaded.
pub struct Cartridge {
    rom: Vec<u8>,
    sram: Vec<u8>,
    rom_type: RomType,
    header: Option<CartridgeHeader>,
    pub has_copier_header: bool,
}

impl Cartridge {
    pub fn load_from_file<P: AsRef<Path>>(path: P, rom_type: RomType) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        Self::from_bytes(data, rom_type)
    }

    pub fn from_bytes(mut data: Vec<u8>, rom_type: RomType) -> Result<Self> {
        let has_copier_header = data.len() % 1024 == 512;
        if has_copier_header {
            data.drain(0..512);
        }

        if data.is_empty() {
            return Err(CoreError::InvalidRom("ROM image is empty".to_string()));
        }

        let header = parse_header(&data, rom_type.header_base());
        let sram_size = header.as_ref().map(|h| h.sram_size).unwrap_or(0);

        if let Some(ref h) = header {
            if !h.checksums_match() && !crate::debug_flags::quiet() {
                log::warn!(
                    "header checksum pair mismatch: 0x{:04X} ^ 0x{:04X} != 0xFFFF",
                    h.checksum,
                    h.checksum_complement
                );
            }
            if h.map_mode & 0x37 != rom_type.map_mode() && !crate::debug_flags::quiet() {
                log::debug!(
                    "header map mode 0x{:02X} differs from configured {:?}",
                    h.map_mode,
                    rom_type
                );
            }
        }

        log::debug!(
            "cartridge: {} bytes, {:?}, title {:?}, sram {} bytes",
            data.len(),
            rom_type,
            header.as_ref().map(|h| h.title.as_str()).unwrap_or(""),
            sram_size
        );

        Ok(Cartridge {
            rom: data,
            sram: vec![0; sram_size],
            rom_type,
            header,
            has_copier_header,
        })
    }

    /// Byte at a linear ROM offset. Offsets past the end read as $FF.
    pub fn read_byte(&self, rom_offset: usize) -> u8 {
        self.rom.get(rom_offset).copied().unwrap_or(0xFF)
    }

    pub fn size(&self) -> usize {
        self.rom.len()
    }

    pub fn mapping_mode(&self) -> RomType {
        self.rom_type
    }

    pub fn header(&self) -> Option<&CartridgeHeader> {
        self.header.as_ref()
    }

    pub fn sram_size(&self) -> usize {
        self.sram.len()
    }

    /// Replace the SRAM backing with a zeroed buffer of `size` bytes.
    pub fn resize_sram(&mut self, size: usize) {
        self.sram = vec![0; size];
    }

    pub fn read_sram(&self, index: usize) -> u8 {
        self.sram.get(index).copied().unwrap_or(0xFF)
    }

    pub fn write_sram(&mut self, index: usize, value: u8) {
        if let Some(cell) = self.sram.get_mut(index) {
            *cell = value;
        }
    }

    pub fn sram(&self) -> &[u8] {
        &self.sram
    }
}

fn parse_header(rom: &[u8], base: usize) -> Option<CartridgeHeader> {
    if rom.len() < base + 0x20 {
        return None;
    }
    let h = &rom[base..base + 0x20];

    let title = extract_title(&h[0x00..0x15]);
    let rom_size_code = h[0x17];
    let ram_size_code = h[0x18];

    Some(CartridgeHeader {
        title,
        map_mode: h[0x15],
        chipset: h[0x16],
        rom_size: if rom_size_code <= 0x0D {
            1024usize << rom_size_code
        } else {
            0
        },
        sram_size: decode_sram_size(ram_size_code),
        country: h[0x19],
        version: h[0x1B],
        checksum_complement: u16::from_le_bytes([h[0x1C], h[0x1D]]),
        checksum: u16::from_le_bytes([h[0x1E], h[0x1F]]),
    })
}

fn extract_title(title_bytes: &[u8]) -> String {
    let mut title = String::new();
    for &byte in title_bytes {
        if byte == 0x00 {
            break;
        } else if (0x20..=0x7E).contains(&byte) {
            title.push(byte as char);
        } else if byte >= 0x80 {
            title.push('?');
        }
    }
    title.trim().to_string()
}

// SRAM size is "1 << N kilobytes"; 0 and $FF mean none. Anything above 128KB
// is treated as garbage.
fn decode_sram_size(size_code: u8) -> usize {
    if size_code == 0x00 || size_code > 0x07 {
        return 0;
    }
    1024usize << size_code
}

/// Plausibility score of a header candidate at `base`. Higher is better.
pub fn score_header(rom: &[u8], base: usize) -> u32 {
    if rom.len() < base + 0x20 {
        return 0;
    }
    let h = &rom[base..base + 0x20];
    let mut score: u32 = 0;

    let complement = u16::from_le_bytes([h[0x1C], h[0x1D]]);
    let checksum = u16::from_le_bytes([h[0x1E], h[0x1F]]);
    if checksum ^ complement == 0xFFFF {
        score += 8;
    }

    let map_mode = h[0x15];
    if RomType::from_map_mode(map_mode & 0x37).is_ok() {
        score += 2;
    }

    if h[0x16] <= 0x37 {
        score += 1;
    }

    let rom_size = h[0x17];
    if (0x08..=0x0D).contains(&rom_size) {
        score += 2;
        let expected = 1024usize << rom_size;
        if rom.len() >= expected / 2 && rom.len() <= expected * 2 {
            score += 2;
        }
    }

    if h[0x18] <= 0x07 {
        score += 1;
    }

    if h[0x19] <= 0x0D {
        score += 1;
    }

    if h[0x00..0x15]
        .iter()
        .all(|&b| (0x20..=0x7E).contains(&b) || b == 0x00)
    {
        score += 2;
    }

    // Reset vector should point into the upper half of bank 0
    if let Some(vector) = rom.get(base + 0x3C..base + 0x3E) {
        if u16::from_le_bytes([vector[0], vector[1]]) >= 0x8000 {
            score += 2;
        }
    }

    score
}

/// Best-effort layout detection. The core never calls this on its own; the
/// mapping mode is always passed in explicitly.
pub fn detect_rom_type(rom: &[u8]) -> Option<RomType> {
    let lo = score_header(rom, 0x7FC0);
    let hi = score_header(rom, 0xFFC0);
    let ex_hi = score_header(rom, 0x40_FFC0);

    if ex_hi > 6 && ex_hi >= hi && ex_hi >= lo {
        return Some(RomType::ExHiRom);
    }
    let (base, score) = if hi > lo { (0xFFC0, hi) } else { (0x7FC0, lo) };
    if score <= 4 {
        return None;
    }
    let map_mode = rom[base + 0x15] & 0x37;
    match RomType::from_map_mode(map_mode) {
        Ok(rom_type) if rom_type.is_hirom() == (base == 0xFFC0) => Some(rom_type),
        _ if base == 0xFFC0 => Some(RomType::HiRom),
        _ => Some(RomType::LoRom),
    }
}
