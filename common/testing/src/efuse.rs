/*++

Licensed under the Apache-2.0 license.

File Name:

    efuse.rs

Abstract:

    Fake eFUSE cache and controller register file.
    Cache words are set-only: programming ORs into the current value.

--*/

use nvm_config::EfuseMemoryMap;
use nvm_registers::efuse_cache;
use nvm_registers::efuse_ctrl::{self, bits::Isr, bits::Status};
use std::cell::RefCell;
use std::collections::BTreeMap;
use tock_registers::fields::{Field, FieldValue};
use versal_bsp::{RegisterRead, RegisterWrite};

/// One register access seen by the fake.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Access {
    pub base: u32,
    pub offset: u32,
}

#[derive(Default)]
pub struct FakeEfuse {
    map: EfuseMemoryMap,
    pub(crate) cache: RefCell<BTreeMap<u32, u32>>,
    pub(crate) ctrl: RefCell<BTreeMap<u32, u32>>,
    reads: RefCell<Vec<Access>>,
    writes: RefCell<Vec<(Access, u32)>>,
}

impl FakeEfuse {
    /// An eFUSE block with every register reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_memory_map(map: EfuseMemoryMap) -> Self {
        FakeEfuse {
            map,
            ..Default::default()
        }
    }

    /// A never-programmed device: the cache is all zero and the CRC engine
    /// has confirmed the zero key for all three AES key slots.
    pub fn blank() -> Self {
        let efuse = Self::new();
        efuse.load_zero_key_crcs();
        efuse
    }

    pub fn memory_map(&self) -> EfuseMemoryMap {
        self.map
    }

    /// Loads the zero-key reference CRC into every key CRC register and
    /// reports done/pass for each of them.
    pub fn load_zero_key_crcs(&self) {
        for offset in [
            efuse_ctrl::AES_CRC_REG_OFFSET,
            efuse_ctrl::AES_USR_KEY0_CRC_REG_OFFSET,
            efuse_ctrl::AES_USR_KEY1_CRC_REG_OFFSET,
        ] {
            self.set_ctrl_register(offset, efuse_ctrl::CRC_AES_ZEROS);
        }
        self.set_status(
            Status::AesCrcDone::SET
                + Status::AesCrcPass::SET
                + Status::AesUserKey0CrcDone::SET
                + Status::AesUserKey0CrcPass::SET
                + Status::AesUserKey1CrcDone::SET
                + Status::AesUserKey1CrcPass::SET,
        );
    }

    /// Burns `value` into the cache word at `offset`. Bits already set stay
    /// set; there is no way to clear them.
    pub fn program_cache_word(&self, offset: u32, value: u32) {
        *self.cache.borrow_mut().entry(offset).or_insert(0) |= value;
    }

    /// Burns consecutive cache words starting at `offset`.
    pub fn program_cache_words(&self, offset: u32, words: &[u32]) {
        for (i, word) in words.iter().enumerate() {
            self.program_cache_word(offset + (i as u32) * nvm_registers::WORD_LEN, *word);
        }
    }

    pub fn cache_word(&self, offset: u32) -> u32 {
        self.cache.borrow().get(&offset).copied().unwrap_or(0)
    }

    pub fn program_security_control(&self, value: u32) {
        self.program_cache_word(efuse_cache::SECURITY_CTRL_OFFSET, value);
    }

    pub fn set_ctrl_register(&self, offset: u32, value: u32) {
        self.ctrl.borrow_mut().insert(offset, value);
    }

    pub fn ctrl_register(&self, offset: u32) -> u32 {
        self.ctrl.borrow().get(&offset).copied().unwrap_or(0)
    }

    /// Sets the status bits named by `bits`, leaving the others alone.
    pub fn set_status(&self, bits: FieldValue<u32, Status::Register>) {
        let status = self.ctrl_register(efuse_ctrl::STATUS_REG_OFFSET);
        self.set_ctrl_register(efuse_ctrl::STATUS_REG_OFFSET, status | bits.value);
    }

    pub fn clear_status(&self, field: Field<u32, Status::Register>) {
        let status = self.ctrl_register(efuse_ctrl::STATUS_REG_OFFSET);
        self.set_ctrl_register(
            efuse_ctrl::STATUS_REG_OFFSET,
            status & !(field.mask << field.shift),
        );
    }

    pub fn set_cache_parity_error(&self, error: bool) {
        let isr = self.ctrl_register(efuse_ctrl::ISR_REG_OFFSET);
        let bit = Isr::CacheError::SET.value;
        let isr = if error { isr | bit } else { isr & !bit };
        self.set_ctrl_register(efuse_ctrl::ISR_REG_OFFSET, isr);
    }

    /// Every read issued since construction or the last `clear_access_log`.
    pub fn reads(&self) -> Vec<Access> {
        self.reads.borrow().clone()
    }

    pub fn writes(&self) -> Vec<(Access, u32)> {
        self.writes.borrow().clone()
    }

    pub fn clear_access_log(&self) {
        self.reads.borrow_mut().clear();
        self.writes.borrow_mut().clear();
    }
}

impl RegisterRead for FakeEfuse {
    fn read_register(&self, base: u32, offset: u32) -> u32 {
        self.reads.borrow_mut().push(Access { base, offset });
        if base == self.map.cache_offset {
            self.cache_word(offset)
        } else if base == self.map.ctrl_offset {
            self.ctrl_register(offset)
        } else {
            0
        }
    }
}

impl RegisterWrite for FakeEfuse {
    /// Writes land in the controller block. The cache is a read-only shadow
    /// of the fuse array, so writes to it are dropped.
    fn write_register(&self, base: u32, offset: u32, value: u32) {
        self.writes
            .borrow_mut()
            .push((Access { base, offset }, value));
        if base == self.map.ctrl_offset {
            self.set_ctrl_register(offset, value);
        }
    }
}
