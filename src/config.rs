use crate::cartridge::RomType;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Structural settings for one core instance. Nothing here is guessed from
/// the ROM; the host decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub rom_type: RomType,
    /// Overrides the SRAM size declared in the cartridge header.
    pub sram_size: Option<usize>,
    /// Report WDM ($42) as an illegal opcode instead of a two-byte no-op.
    pub strict_reserved: bool,
    /// Refuse further steps after an illegal opcode.
    pub halt_on_illegal: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            rom_type: RomType::LoRom,
            sram_size: None,
            strict_reserved: false,
            halt_on_illegal: true,
        }
    }
}

impl CoreConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_defaults() {
        let cfg = CoreConfig::default();
        assert_eq!(cfg.rom_type, RomType::LoRom);
        assert!(!cfg.strict_reserved);
        assert!(cfg.halt_on_illegal);
        assert_eq!(cfg.sram_size, None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg = CoreConfig::from_json_str(r#"{ "rom_type": "HiRomFastRom", "strict_reserved": true }"#)
            .unwrap();
        assert_eq!(cfg.rom_type, RomType::HiRomFastRom);
        assert!(cfg.strict_reserved);
        assert!(cfg.halt_on_illegal);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        assert!(matches!(
            CoreConfig::from_json_str("{ rom_type: 3 }"),
            Err(CoreError::Config(_))
        ));
    }
}
