/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Register map of the Versal Net eFUSE cache and eFUSE controller.
    Offsets are relative to the block bases in `nvm_config::EfuseMemoryMap`.

--*/

#![cfg_attr(target_os = "none", no_std)]

/// Size of one eFUSE cache row in bytes.
pub const WORD_LEN: u32 = 4;

pub mod efuse_ctrl {
    /// Controller status: CRC engine results for the AES key slots.
    pub const STATUS_REG_OFFSET: u32 = 0x10;
    /// Interrupt status: cache load and cache parity results.
    pub const ISR_REG_OFFSET: u32 = 0x48;
    pub const AES_CRC_REG_OFFSET: u32 = 0x5C;
    pub const AES_USR_KEY0_CRC_REG_OFFSET: u32 = 0x60;
    pub const AES_USR_KEY1_CRC_REG_OFFSET: u32 = 0x64;

    /// CRC of an AES key slot that holds all zeros.
    pub const CRC_AES_ZEROS: u32 = 0x6858_A3D5;

    pub mod bits {
        use tock_registers::register_bitfields;

        register_bitfields![u32,
            pub Status [
                CacheDone OFFSET(5) NUMBITS(1) [],
                AesCrcDone OFFSET(6) NUMBITS(1) [],
                AesCrcPass OFFSET(7) NUMBITS(1) [],
                AesUserKey0CrcDone OFFSET(8) NUMBITS(1) [],
                AesUserKey0CrcPass OFFSET(9) NUMBITS(1) [],
                AesUserKey1CrcDone OFFSET(10) NUMBITS(1) [],
                AesUserKey1CrcPass OFFSET(11) NUMBITS(1) [],
            ],
            pub Isr [
                PgmDone OFFSET(0) NUMBITS(1) [],
                RdDone OFFSET(1) NUMBITS(1) [],
                CacheDone OFFSET(2) NUMBITS(1) [],
                CacheError OFFSET(4) NUMBITS(1) [],
                ApbSlvErr OFFSET(31) NUMBITS(1) [],
            ],
        ];
    }
}

pub mod efuse_cache {
    pub const SECURITY_CTRL_OFFSET: u32 = 0xAC;
    pub const PPK0_HASH_OFFSET: u32 = 0x100;
    pub const PPK1_HASH_OFFSET: u32 = 0x120;
    pub const PPK2_HASH_OFFSET: u32 = 0x140;
    pub const METAHEADER_IV_RANGE_OFFSET: u32 = 0x180;
    pub const BLACK_IV_OFFSET: u32 = 0x1D0;
    pub const PLM_IV_RANGE_OFFSET: u32 = 0x1DC;
    pub const DATA_PARTITION_IV_OFFSET: u32 = 0x1E8;

    pub const PPK_HASH_NUM_OF_CACHE_ROWS: u32 = 8;
    pub const IV_NUM_OF_CACHE_ROWS: u32 = 3;
    pub const IV_LEN_IN_WORDS: usize = 3;

    pub mod bits {
        use tock_registers::register_bitfields;

        register_bitfields![u32,
            pub SecurityControl [
                AesDis OFFSET(0) NUMBITS(1) [],
                JtagErrOutDis OFFSET(1) NUMBITS(1) [],
                JtagDis OFFSET(2) NUMBITS(1) [],
                HwtstbitsDis OFFSET(3) NUMBITS(1) [],
                IpDisWrLk OFFSET(5) NUMBITS(1) [],
                Ppk0WrLk OFFSET(6) NUMBITS(1) [],
                Ppk0Invld OFFSET(7) NUMBITS(2) [],
                Ppk1WrLk OFFSET(9) NUMBITS(1) [],
                Ppk1Invld OFFSET(10) NUMBITS(2) [],
                Ppk2WrLk OFFSET(12) NUMBITS(1) [],
                Ppk2Invld OFFSET(13) NUMBITS(2) [],
                AesCrcLk OFFSET(15) NUMBITS(2) [],
                AesWrLk OFFSET(17) NUMBITS(1) [],
                UsrKey0CrcLk OFFSET(18) NUMBITS(1) [],
                UsrKey0WrLk OFFSET(19) NUMBITS(1) [],
                UsrKey1CrcLk OFFSET(20) NUMBITS(1) [],
                UsrKey1WrLk OFFSET(21) NUMBITS(1) [],
                SecDbgDis OFFSET(23) NUMBITS(2) [],
                SecLockDbgDis OFFSET(25) NUMBITS(2) [],
                BootEnvWrLk OFFSET(27) NUMBITS(1) [],
                RegInitDis OFFSET(30) NUMBITS(2) [],
            ],
        ];
    }
}
