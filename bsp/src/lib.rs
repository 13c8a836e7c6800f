// Licensed under the Apache-2.0 license

#![cfg_attr(target_os = "none", no_std)]

mod mem;
pub use mem::*;
pub mod pmu;
mod regs;
pub use regs::*;
mod reset;
pub use reset::*;

use core::fmt::{Display, Write};

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Formats bytes as upper-case hex without pulling in `alloc`.
pub struct HexBytes<'a>(pub &'a [u8]);
impl Display for HexBytes<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for &x in self.0.iter() {
            f.write_char(HEX_DIGITS[usize::from(x >> 4)] as char)?;
            f.write_char(HEX_DIGITS[usize::from(x & 0xf)] as char)?;
        }
        Ok(())
    }
}

/// Formats a register word as eight upper-case hex digits.
pub struct HexWord(pub u32);
impl Display for HexWord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        HexBytes(&self.0.to_be_bytes()).fmt(f)
    }
}
