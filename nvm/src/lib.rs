/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    eFUSE write-request validation for Versal Net.

    Every check here only reads the eFUSE cache and controller. Nothing
    stops another agent from programming a fuse between validation and the
    write that follows it, so callers must validate immediately before
    programming, with nothing in between.

--*/

#![cfg_attr(target_os = "none", no_std)]

mod error;
mod guard;
mod types;

pub use error::{legacy, EfuseError, EfuseErrorKind, EfuseResult};
pub use guard::EfuseGuard;
pub use types::{
    AesKeyType, CrcCheck, FuseSlot, Iv, IvLayout, IvType, KeyLayout, PpkLayout, PpkType,
    WriteRequest, IV_LEN_IN_WORDS,
};
