/*++

Licensed under the Apache-2.0 license.

File Name:

    error.rs

Abstract:

    Error type returned by the eFUSE write-request guard.

--*/

use crate::types::{FuseSlot, IvType};
use core::fmt;

pub type EfuseResult<T> = Result<T, EfuseError>;

/// Why a write request was refused. Slot-specific failures carry the slot
/// they refer to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EfuseError {
    /// Request tag outside the defined set.
    InvalidParam,
    /// The controller flagged a cache parity fault while scanning the cache.
    CacheParity,
    /// The target region already holds non-zero content.
    AlreadyProgrammed(FuseSlot),
    /// A disable or write-lock bit protects the target region.
    FuseProtected(FuseSlot),
    /// The requested value would need an already-set bit cleared.
    BitCannotRevert(FuseSlot),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EfuseErrorKind {
    InvalidParam,
    CacheParity,
    AlreadyProgrammed,
    FuseProtected,
    BitCannotRevert,
}

/// Numeric codes of the vendor eFUSE library.
///
/// Only for the boundary with callers that still expect packed codes; the
/// guard itself never deals in these.
pub mod legacy {
    pub const ERR_INVALID_PARAM: u32 = 0x2;
    pub const ERR_CACHE_PARITY: u32 = 0xE;
    pub const ERR_BIT_CANT_REVERT: u32 = 0xF0;

    pub const ERR_AES_ALREADY_PRGMD: u32 = 0x8000;
    pub const ERR_PPK0_HASH_ALREADY_PRGMD: u32 = 0x8030;
    pub const ERR_BLK_OBFUS_IV_ALREADY_PRGMD: u32 = 0x8060;

    pub const ERR_WRITE_AES_KEY: u32 = 0x8100;
    pub const ERR_WRITE_PPK0_HASH: u32 = 0x8400;
    pub const ERR_WRITE_META_HEADER_IV_RANGE: u32 = 0x8800;

    pub const ERR_FUSE_PROTECTED: u32 = 0x0008_0000;
    pub const ERR_BEFORE_PROGRAMMING: u32 = 0x0080_0000;

    pub const ERROR_NIBBLE_SHIFT: u32 = 4;
    pub const ERROR_BYTE_SHIFT: u32 = 8;
}

impl EfuseError {
    pub fn kind(&self) -> EfuseErrorKind {
        match self {
            EfuseError::InvalidParam => EfuseErrorKind::InvalidParam,
            EfuseError::CacheParity => EfuseErrorKind::CacheParity,
            EfuseError::AlreadyProgrammed(_) => EfuseErrorKind::AlreadyProgrammed,
            EfuseError::FuseProtected(_) => EfuseErrorKind::FuseProtected,
            EfuseError::BitCannotRevert(_) => EfuseErrorKind::BitCannotRevert,
        }
    }

    pub fn slot(&self) -> Option<FuseSlot> {
        match self {
            EfuseError::InvalidParam | EfuseError::CacheParity => None,
            EfuseError::AlreadyProgrammed(slot)
            | EfuseError::FuseProtected(slot)
            | EfuseError::BitCannotRevert(slot) => Some(*slot),
        }
    }

    /// The packed numeric code the vendor library reports for this error.
    pub fn code(&self) -> u32 {
        use legacy::*;
        match self {
            EfuseError::InvalidParam => ERR_INVALID_PARAM,
            EfuseError::CacheParity => ERR_CACHE_PARITY,
            EfuseError::AlreadyProgrammed(slot) => already_programmed_code(*slot),
            EfuseError::FuseProtected(slot) => ERR_FUSE_PROTECTED | write_error_code(*slot),
            EfuseError::BitCannotRevert(slot) => {
                ERR_BEFORE_PROGRAMMING | ERR_BIT_CANT_REVERT | write_error_code(*slot)
            }
        }
    }
}

fn already_programmed_code(slot: FuseSlot) -> u32 {
    use legacy::*;
    match slot {
        FuseSlot::Key(key_type) => {
            ERR_AES_ALREADY_PRGMD + (u32::from(key_type) << ERROR_NIBBLE_SHIFT)
        }
        FuseSlot::Ppk(ppk_type) => {
            ERR_PPK0_HASH_ALREADY_PRGMD + (u32::from(ppk_type) << ERROR_NIBBLE_SHIFT)
        }
        FuseSlot::Iv(IvType::BlackIv) => ERR_BLK_OBFUS_IV_ALREADY_PRGMD,
        // IV ranges have no dedicated code; report the range write error.
        FuseSlot::Iv(_) => write_error_code(slot),
    }
}

fn write_error_code(slot: FuseSlot) -> u32 {
    use legacy::*;
    match slot {
        FuseSlot::Key(key_type) => ERR_WRITE_AES_KEY + (u32::from(key_type) << ERROR_BYTE_SHIFT),
        FuseSlot::Ppk(ppk_type) => {
            ERR_WRITE_PPK0_HASH + (u32::from(ppk_type) << ERROR_BYTE_SHIFT)
        }
        FuseSlot::Iv(iv_type) => {
            ERR_WRITE_META_HEADER_IV_RANGE + (u32::from(iv_type) << ERROR_BYTE_SHIFT)
        }
    }
}

impl From<EfuseError> for u32 {
    fn from(err: EfuseError) -> u32 {
        err.code()
    }
}

impl fmt::Display for EfuseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EfuseError::InvalidParam => write!(f, "invalid request type"),
            EfuseError::CacheParity => write!(f, "eFUSE cache parity error"),
            EfuseError::AlreadyProgrammed(slot) => write!(f, "{slot:?} is already programmed"),
            EfuseError::FuseProtected(slot) => write!(f, "{slot:?} is write protected"),
            EfuseError::BitCannotRevert(slot) => {
                write!(f, "{slot:?} request would clear programmed bits")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AesKeyType, PpkType};

    #[test]
    fn test_kind_and_slot() {
        let err = EfuseError::FuseProtected(PpkType::Ppk2.into());
        assert_eq!(err.kind(), EfuseErrorKind::FuseProtected);
        assert_eq!(err.slot(), Some(FuseSlot::Ppk(PpkType::Ppk2)));
        assert_eq!(EfuseError::CacheParity.slot(), None);
    }

    #[test]
    fn test_already_programmed_codes_step_by_nibble() {
        let code = |slot: FuseSlot| EfuseError::AlreadyProgrammed(slot).code();
        assert_eq!(code(AesKeyType::AesKey.into()), 0x8000);
        assert_eq!(code(AesKeyType::UserKey0.into()), 0x8010);
        assert_eq!(code(AesKeyType::UserKey1.into()), 0x8020);
        assert_eq!(code(PpkType::Ppk0.into()), 0x8030);
        assert_eq!(code(PpkType::Ppk1.into()), 0x8040);
        assert_eq!(code(PpkType::Ppk2.into()), 0x8050);
        assert_eq!(code(IvType::BlackIv.into()), 0x8060);
    }

    #[test]
    fn test_protected_codes_are_or_combined() {
        let code = |slot: FuseSlot| EfuseError::FuseProtected(slot).code();
        assert_eq!(code(AesKeyType::AesKey.into()), 0x0008_8100);
        assert_eq!(code(AesKeyType::UserKey1.into()), 0x0008_8300);
        assert_eq!(code(PpkType::Ppk1.into()), 0x0008_8500);
    }

    #[test]
    fn test_revert_codes() {
        let code = |iv_type: IvType| EfuseError::BitCannotRevert(iv_type.into()).code();
        assert_eq!(code(IvType::MetaHeaderIvRange), 0x0080_88F0);
        assert_eq!(code(IvType::PlmIvRange), 0x0080_8AF0);
        assert_eq!(code(IvType::DataPartitionIvRange), 0x0080_8BF0);
    }

    #[test]
    fn test_codes_are_distinct() {
        let mut codes = vec![
            EfuseError::InvalidParam.code(),
            EfuseError::CacheParity.code(),
        ];
        for key_type in [AesKeyType::AesKey, AesKeyType::UserKey0, AesKeyType::UserKey1] {
            codes.push(EfuseError::AlreadyProgrammed(key_type.into()).code());
            codes.push(EfuseError::FuseProtected(key_type.into()).code());
        }
        for ppk_type in [PpkType::Ppk0, PpkType::Ppk1, PpkType::Ppk2] {
            codes.push(EfuseError::AlreadyProgrammed(ppk_type.into()).code());
            codes.push(EfuseError::FuseProtected(ppk_type.into()).code());
        }
        codes.push(EfuseError::AlreadyProgrammed(IvType::BlackIv.into()).code());
        for iv_type in [
            IvType::MetaHeaderIvRange,
            IvType::PlmIvRange,
            IvType::DataPartitionIvRange,
        ] {
            codes.push(EfuseError::BitCannotRevert(iv_type.into()).code());
        }
        let count = codes.len();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), count);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", EfuseError::AlreadyProgrammed(PpkType::Ppk1.into())),
            "Ppk(Ppk1) is already programmed"
        );
        assert_eq!(u32::from(EfuseError::InvalidParam), 0x2);
    }
}
