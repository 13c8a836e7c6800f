/*++

Licensed under the Apache-2.0 license.

File Name:

    guard.rs

Abstract:

    Decides whether an eFUSE write request may proceed, given the live
    contents of the eFUSE cache and controller.

--*/

use crate::error::{EfuseError, EfuseResult};
use crate::types::{AesKeyType, CrcCheck, FuseSlot, Iv, IvType, PpkType, WriteRequest};
use nvm_config::EfuseMemoryMap;
use nvm_registers::efuse_cache::{self, bits::SecurityControl};
use nvm_registers::efuse_ctrl::{self, bits::Isr, bits::Status};
use nvm_registers::WORD_LEN;
use tock_registers::LocalRegisterCopy;
use versal_bsp::{HexWord, RegisterRead};

type SecurityControlWord = LocalRegisterCopy<u32, SecurityControl::Register>;

/// Read-only gatekeeper for eFUSE programming.
///
/// The guard only ever reads; `R` is bound by `RegisterRead` so it cannot
/// issue writes. Nothing is cached between calls.
pub struct EfuseGuard<R: RegisterRead> {
    regs: R,
    map: EfuseMemoryMap,
}

impl<R: RegisterRead> EfuseGuard<R> {
    pub fn new(regs: R) -> Self {
        Self::with_memory_map(regs, EfuseMemoryMap::default())
    }

    pub fn with_memory_map(regs: R, map: EfuseMemoryMap) -> Self {
        EfuseGuard { regs, map }
    }

    pub fn validate(&self, request: &WriteRequest) -> EfuseResult<()> {
        match request {
            WriteRequest::AesKey(key_type) => self.validate_aes_key_write(*key_type),
            WriteRequest::PpkHash(ppk_type) => self.validate_ppk_hash_write(*ppk_type),
            WriteRequest::Iv(iv_type, iv) => self.validate_iv_write(*iv_type, iv),
        }
    }

    /// Checks that an AES key slot is still blank and writable.
    ///
    /// The CRC check runs before the lock check, so a programmed slot is
    /// reported as such even when it is also locked.
    pub fn validate_aes_key_write(&self, key_type: AesKeyType) -> EfuseResult<()> {
        let sec_ctrl = self.security_control();
        self.check_aes_key(sec_ctrl, key_type)
    }

    /// Same as [`Self::validate_aes_key_write`] for a raw ABI tag.
    pub fn validate_aes_key_write_req(&self, key_type: u32) -> EfuseResult<()> {
        let sec_ctrl = self.security_control();
        let key_type = AesKeyType::try_from(key_type).map_err(|_| EfuseError::InvalidParam)?;
        self.check_aes_key(sec_ctrl, key_type)
    }

    /// Checks that a PPK hash slot is still all zero and writable.
    pub fn validate_ppk_hash_write(&self, ppk_type: PpkType) -> EfuseResult<()> {
        let sec_ctrl = self.security_control();
        self.check_ppk_hash(sec_ctrl, ppk_type)
    }

    /// Same as [`Self::validate_ppk_hash_write`] for a raw ABI tag.
    pub fn validate_ppk_hash_write_req(&self, ppk_type: u32) -> EfuseResult<()> {
        let sec_ctrl = self.security_control();
        let ppk_type = PpkType::try_from(ppk_type).map_err(|_| EfuseError::InvalidParam)?;
        self.check_ppk_hash(sec_ctrl, ppk_type)
    }

    /// Checks an IV request.
    ///
    /// The black IV can only be written once, so its rows must all be zero.
    /// The IV ranges accept any value that keeps every bit already burnt.
    pub fn validate_iv_write(&self, iv_type: IvType, iv: &Iv) -> EfuseResult<()> {
        let slot = FuseSlot::Iv(iv_type);
        let layout = iv_type.layout();
        match iv_type {
            IvType::BlackIv => self.check_zero_range(slot, layout.cache_offset, layout.rows),
            IvType::MetaHeaderIvRange | IvType::PlmIvRange | IvType::DataPartitionIvRange => {
                self.check_iv_no_revert(slot, layout.cache_offset, iv)
            }
        }
    }

    /// Same as [`Self::validate_iv_write`] for a raw ABI tag. An unknown tag
    /// is rejected before any register is read.
    pub fn validate_iv_write_req(&self, iv_type: u32, iv: &Iv) -> EfuseResult<()> {
        let iv_type = IvType::try_from(iv_type).map_err(|_| EfuseError::InvalidParam)?;
        self.validate_iv_write(iv_type, iv)
    }

    fn security_control(&self) -> SecurityControlWord {
        LocalRegisterCopy::new(self.read_cache(efuse_cache::SECURITY_CTRL_OFFSET))
    }

    fn read_cache(&self, offset: u32) -> u32 {
        self.regs.read_register(self.map.cache_offset, offset)
    }

    fn read_ctrl(&self, offset: u32) -> u32 {
        self.regs.read_register(self.map.ctrl_offset, offset)
    }

    fn check_aes_key(
        &self,
        sec_ctrl: SecurityControlWord,
        key_type: AesKeyType,
    ) -> EfuseResult<()> {
        let slot = FuseSlot::Key(key_type);
        let layout = key_type.layout();

        if !self.key_crc_is_zero_key(&layout.crc) {
            log::warn!("eFUSE {:?} already programmed", slot);
            return Err(EfuseError::AlreadyProgrammed(slot));
        }

        if sec_ctrl.is_set(SecurityControl::AesDis) || sec_ctrl.is_set(layout.write_lock) {
            log::warn!(
                "eFUSE {:?} protected, security control {}",
                slot,
                HexWord(sec_ctrl.get())
            );
            return Err(EfuseError::FuseProtected(slot));
        }

        log::debug!("eFUSE {:?} may be programmed", slot);
        Ok(())
    }

    fn check_ppk_hash(
        &self,
        sec_ctrl: SecurityControlWord,
        ppk_type: PpkType,
    ) -> EfuseResult<()> {
        let slot = FuseSlot::Ppk(ppk_type);
        let layout = ppk_type.layout();

        self.check_zero_range(slot, layout.cache_offset, layout.rows)?;

        if sec_ctrl.is_set(layout.write_lock) {
            log::warn!(
                "eFUSE {:?} protected, security control {}",
                slot,
                HexWord(sec_ctrl.get())
            );
            return Err(EfuseError::FuseProtected(slot));
        }

        log::debug!("eFUSE {:?} may be programmed", slot);
        Ok(())
    }

    /// True if the CRC engine compared the key slot against the all-zero key
    /// and found a match.
    ///
    /// Only reads: controller bring-up must already have loaded
    /// `CRC_AES_ZEROS` into the slot's CRC register, otherwise a blank slot
    /// reports as programmed.
    fn key_crc_is_zero_key(&self, crc: &CrcCheck) -> bool {
        if self.read_ctrl(crc.reg_offset) != efuse_ctrl::CRC_AES_ZEROS {
            return false;
        }
        let status = LocalRegisterCopy::<u32, Status::Register>::new(
            self.read_ctrl(efuse_ctrl::STATUS_REG_OFFSET),
        );
        status.is_set(crc.done) && status.is_set(crc.pass)
    }

    /// Fails unless `rows` cache words starting at `cache_offset` are all
    /// zero. A cache parity fault reported by the controller wins over
    /// anything found in the words, so it is checked before reading them.
    fn check_zero_range(&self, slot: FuseSlot, cache_offset: u32, rows: u32) -> EfuseResult<()> {
        let isr = LocalRegisterCopy::<u32, Isr::Register>::new(
            self.read_ctrl(efuse_ctrl::ISR_REG_OFFSET),
        );
        if isr.is_set(Isr::CacheError) {
            log::warn!("eFUSE cache parity error, ISR {}", HexWord(isr.get()));
            return Err(EfuseError::CacheParity);
        }

        for row in 0..rows {
            let offset = cache_offset + row * WORD_LEN;
            let word = self.read_cache(offset);
            if word != 0 {
                log::warn!(
                    "eFUSE {:?} already programmed: cache 0x{:x} = {}",
                    slot,
                    offset,
                    HexWord(word)
                );
                return Err(EfuseError::AlreadyProgrammed(slot));
            }
        }
        Ok(())
    }

    /// Fails at the first word where the request would clear a bit that is
    /// already set in the cache.
    fn check_iv_no_revert(&self, slot: FuseSlot, cache_offset: u32, iv: &Iv) -> EfuseResult<()> {
        for (i, &requested) in iv.iter().enumerate() {
            let offset = cache_offset + (i as u32) * WORD_LEN;
            let current = self.read_cache(offset);
            if current & requested != current {
                log::warn!(
                    "eFUSE {:?} cannot revert bits: cache 0x{:x} = {}, requested {}",
                    slot,
                    offset,
                    HexWord(current),
                    HexWord(requested)
                );
                return Err(EfuseError::BitCannotRevert(slot));
            }
        }
        Ok(())
    }
}
