// Licensed under the Apache-2.0 license

use nvm_registers::efuse_cache::{self, bits::SecurityControl};
use nvm_registers::efuse_ctrl::{self, bits::Status};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use tock_registers::fields::Field;

pub use nvm_registers::efuse_cache::IV_LEN_IN_WORDS;

/// IV value requested for programming, one word per cache row.
pub type Iv = [u32; IV_LEN_IN_WORDS];

/// AES key slots. The discriminants are the vendor ABI tags.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
pub enum AesKeyType {
    AesKey = 0,
    UserKey0 = 1,
    UserKey1 = 2,
}

/// Primary public key hash slots.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
pub enum PpkType {
    Ppk0 = 0,
    Ppk1 = 1,
    Ppk2 = 2,
}

/// IV fuse ranges.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
pub enum IvType {
    MetaHeaderIvRange = 0,
    BlackIv = 1,
    PlmIvRange = 2,
    DataPartitionIvRange = 3,
}

/// Identifies the fuse region a request or an error refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FuseSlot {
    Key(AesKeyType),
    Ppk(PpkType),
    Iv(IvType),
}

impl From<AesKeyType> for FuseSlot {
    fn from(key_type: AesKeyType) -> Self {
        FuseSlot::Key(key_type)
    }
}

impl From<PpkType> for FuseSlot {
    fn from(ppk_type: PpkType) -> Self {
        FuseSlot::Ppk(ppk_type)
    }
}

impl From<IvType> for FuseSlot {
    fn from(iv_type: IvType) -> Self {
        FuseSlot::Iv(iv_type)
    }
}

/// Where the CRC engine reports on an AES key slot.
#[derive(Clone, Copy)]
pub struct CrcCheck {
    /// Controller register holding the reference CRC for the slot.
    pub reg_offset: u32,
    pub done: Field<u32, Status::Register>,
    pub pass: Field<u32, Status::Register>,
}

/// AES key slot. Keys are not shadowed in the cache; the CRC engine reports
/// whether a slot still holds the zero key.
#[derive(Clone, Copy)]
pub struct KeyLayout {
    pub write_lock: Field<u32, SecurityControl::Register>,
    pub crc: CrcCheck,
}

/// PPK hash slot in the eFUSE cache.
#[derive(Clone, Copy)]
pub struct PpkLayout {
    pub cache_offset: u32,
    pub rows: u32,
    pub write_lock: Field<u32, SecurityControl::Register>,
}

/// IV region in the eFUSE cache.
#[derive(Clone, Copy)]
pub struct IvLayout {
    pub cache_offset: u32,
    pub rows: u32,
}

static AES_KEY_LAYOUT: [KeyLayout; 3] = [
    KeyLayout {
        write_lock: SecurityControl::AesWrLk,
        crc: CrcCheck {
            reg_offset: efuse_ctrl::AES_CRC_REG_OFFSET,
            done: Status::AesCrcDone,
            pass: Status::AesCrcPass,
        },
    },
    KeyLayout {
        write_lock: SecurityControl::UsrKey0WrLk,
        crc: CrcCheck {
            reg_offset: efuse_ctrl::AES_USR_KEY0_CRC_REG_OFFSET,
            done: Status::AesUserKey0CrcDone,
            pass: Status::AesUserKey0CrcPass,
        },
    },
    KeyLayout {
        write_lock: SecurityControl::UsrKey1WrLk,
        crc: CrcCheck {
            reg_offset: efuse_ctrl::AES_USR_KEY1_CRC_REG_OFFSET,
            done: Status::AesUserKey1CrcDone,
            pass: Status::AesUserKey1CrcPass,
        },
    },
];

static PPK_LAYOUT: [PpkLayout; 3] = [
    PpkLayout {
        cache_offset: efuse_cache::PPK0_HASH_OFFSET,
        rows: efuse_cache::PPK_HASH_NUM_OF_CACHE_ROWS,
        write_lock: SecurityControl::Ppk0WrLk,
    },
    PpkLayout {
        cache_offset: efuse_cache::PPK1_HASH_OFFSET,
        rows: efuse_cache::PPK_HASH_NUM_OF_CACHE_ROWS,
        write_lock: SecurityControl::Ppk1WrLk,
    },
    PpkLayout {
        cache_offset: efuse_cache::PPK2_HASH_OFFSET,
        rows: efuse_cache::PPK_HASH_NUM_OF_CACHE_ROWS,
        write_lock: SecurityControl::Ppk2WrLk,
    },
];

// Indexed by `IvType` discriminant.
static IV_LAYOUT: [IvLayout; 4] = [
    IvLayout {
        cache_offset: efuse_cache::METAHEADER_IV_RANGE_OFFSET,
        rows: IV_LEN_IN_WORDS as u32,
    },
    IvLayout {
        cache_offset: efuse_cache::BLACK_IV_OFFSET,
        rows: efuse_cache::IV_NUM_OF_CACHE_ROWS,
    },
    IvLayout {
        cache_offset: efuse_cache::PLM_IV_RANGE_OFFSET,
        rows: IV_LEN_IN_WORDS as u32,
    },
    IvLayout {
        cache_offset: efuse_cache::DATA_PARTITION_IV_OFFSET,
        rows: IV_LEN_IN_WORDS as u32,
    },
];

impl AesKeyType {
    pub fn layout(self) -> &'static KeyLayout {
        &AES_KEY_LAYOUT[u32::from(self) as usize]
    }
}

impl PpkType {
    pub fn layout(self) -> &'static PpkLayout {
        &PPK_LAYOUT[u32::from(self) as usize]
    }
}

impl IvType {
    pub fn layout(self) -> &'static IvLayout {
        &IV_LAYOUT[u32::from(self) as usize]
    }
}

/// A logical eFUSE write request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteRequest {
    AesKey(AesKeyType),
    PpkHash(PpkType),
    Iv(IvType, Iv),
}

impl WriteRequest {
    pub fn slot(&self) -> FuseSlot {
        match self {
            WriteRequest::AesKey(key_type) => (*key_type).into(),
            WriteRequest::PpkHash(ppk_type) => (*ppk_type).into(),
            WriteRequest::Iv(iv_type, _) => (*iv_type).into(),
        }
    }
}
