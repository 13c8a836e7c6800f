// Licensed under the Apache-2.0 license

use crate::FakeEfuse;
use nvm_config::EfuseMemoryMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

/// Register contents of an eFUSE block, keyed by byte offset.
///
/// Stored as JSON, the same way the emulated OTP persists its partitions
/// between runs.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EfuseSnapshot {
    #[serde(default)]
    pub cache: BTreeMap<u32, u32>,
    #[serde(default)]
    pub ctrl: BTreeMap<u32, u32>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot access snapshot file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("offset 0x{0:x} is not word aligned")]
    Misaligned(u32),
    #[error("offset 0x{0:x} is outside the register block")]
    OutOfRange(u32),
}

impl EfuseSnapshot {
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Rejects offsets that could not name a register in `map`.
    pub fn check(&self, map: &EfuseMemoryMap) -> Result<(), SnapshotError> {
        let blocks: [(&BTreeMap<u32, u32>, fn(&EfuseMemoryMap, u32) -> bool); 2] = [
            (&self.cache, EfuseMemoryMap::cache_contains),
            (&self.ctrl, EfuseMemoryMap::ctrl_contains),
        ];
        for (regs, contains) in blocks {
            for &offset in regs.keys() {
                if offset % nvm_registers::WORD_LEN != 0 {
                    return Err(SnapshotError::Misaligned(offset));
                }
                if !contains(map, offset) {
                    return Err(SnapshotError::OutOfRange(offset));
                }
            }
        }
        Ok(())
    }
}

impl FakeEfuse {
    pub fn from_snapshot(
        map: EfuseMemoryMap,
        snapshot: &EfuseSnapshot,
    ) -> Result<Self, SnapshotError> {
        snapshot.check(&map)?;
        let efuse = FakeEfuse::with_memory_map(map);
        for (&offset, &value) in snapshot.cache.iter() {
            efuse.program_cache_word(offset, value);
        }
        for (&offset, &value) in snapshot.ctrl.iter() {
            efuse.set_ctrl_register(offset, value);
        }
        Ok(efuse)
    }

    /// Captures the non-zero registers.
    pub fn snapshot(&self) -> EfuseSnapshot {
        let non_zero = |regs: &BTreeMap<u32, u32>| -> BTreeMap<u32, u32> {
            regs.iter()
                .filter(|(_, value)| **value != 0)
                .map(|(offset, value)| (*offset, *value))
                .collect()
        };
        EfuseSnapshot {
            cache: non_zero(&self.cache.borrow()),
            ctrl: non_zero(&self.ctrl.borrow()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvm_registers::{efuse_cache, efuse_ctrl};

    #[test]
    fn test_save_and_load() {
        let efuse = FakeEfuse::blank();
        efuse.program_cache_word(efuse_cache::PPK1_HASH_OFFSET + 12, 1);
        efuse.set_cache_parity_error(true);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("efuse.json");
        efuse.snapshot().save(&path).unwrap();

        let loaded = EfuseSnapshot::load(&path).unwrap();
        assert_eq!(loaded, efuse.snapshot());
        let restored = FakeEfuse::from_snapshot(EfuseMemoryMap::default(), &loaded).unwrap();
        assert_eq!(restored.cache_word(efuse_cache::PPK1_HASH_OFFSET + 12), 1);
        assert_eq!(restored.ctrl_register(efuse_ctrl::ISR_REG_OFFSET), 0x10);
        assert_eq!(
            restored.ctrl_register(efuse_ctrl::AES_USR_KEY1_CRC_REG_OFFSET),
            efuse_ctrl::CRC_AES_ZEROS
        );
    }

    #[test]
    fn test_missing_sections_default_to_zero() {
        let snapshot: EfuseSnapshot = serde_json::from_str(r#"{"cache": {"256": 7}}"#).unwrap();
        assert_eq!(snapshot.cache[&256], 7);
        assert!(snapshot.ctrl.is_empty());
    }

    #[test]
    fn test_rejects_bad_offsets() {
        let mut snapshot = EfuseSnapshot::default();
        snapshot.cache.insert(0x102, 1);
        assert!(matches!(
            FakeEfuse::from_snapshot(EfuseMemoryMap::default(), &snapshot),
            Err(SnapshotError::Misaligned(0x102))
        ));

        let mut snapshot = EfuseSnapshot::default();
        snapshot.ctrl.insert(0x2000, 1);
        assert!(matches!(
            snapshot.check(&EfuseMemoryMap::default()),
            Err(SnapshotError::OutOfRange(0x2000))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            EfuseSnapshot::load(&dir.path().join("absent.json")),
            Err(SnapshotError::Io(_))
        ));
    }
}
