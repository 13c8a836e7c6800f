// Licensed under the Apache-2.0 license

/// Read side of the register access layer.
///
/// `base` is the block base address and `offset` the byte offset of a 32-bit
/// register inside it. Implementations must not cache values: every call
/// observes the current hardware state.
pub trait RegisterRead {
    fn read_register(&self, base: u32, offset: u32) -> u32;
}

/// Write side of the register access layer.
pub trait RegisterWrite: RegisterRead {
    fn write_register(&self, base: u32, offset: u32, value: u32);
}

impl<T: RegisterRead + ?Sized> RegisterRead for &T {
    fn read_register(&self, base: u32, offset: u32) -> u32 {
        (**self).read_register(base, offset)
    }
}

impl<T: RegisterWrite + ?Sized> RegisterWrite for &T {
    fn write_register(&self, base: u32, offset: u32, value: u32) {
        (**self).write_register(base, offset, value)
    }
}

/// Memory-mapped register access through volatile loads and stores.
pub struct Mmio {
    /// Added to every physical address; non-zero when the register blocks
    /// are remapped into a different window of the address space.
    window: usize,
}

impl Mmio {
    /// # Safety
    ///
    /// Every `base + offset` passed to the returned accessor must be a mapped,
    /// word-aligned device register.
    pub const unsafe fn new() -> Self {
        Mmio { window: 0 }
    }

    /// # Safety
    ///
    /// Every `window + base + offset` passed to the returned accessor must be
    /// a mapped, word-aligned device register.
    pub const unsafe fn with_window(window: usize) -> Self {
        Mmio { window }
    }

    fn addr(&self, base: u32, offset: u32) -> usize {
        self.window
            .wrapping_add(base as usize)
            .wrapping_add(offset as usize)
    }
}

impl RegisterRead for Mmio {
    fn read_register(&self, base: u32, offset: u32) -> u32 {
        // Safety: guaranteed by the contract of `Mmio::new`.
        unsafe { core::ptr::read_volatile(self.addr(base, offset) as *const u32) }
    }
}

impl RegisterWrite for Mmio {
    fn write_register(&self, base: u32, offset: u32, value: u32) {
        // Safety: guaranteed by the contract of `Mmio::new`.
        unsafe { core::ptr::write_volatile(self.addr(base, offset) as *mut u32, value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mmio_on_plain_memory() {
        let mut block = [0u32; 4];
        let mmio = unsafe { Mmio::with_window(block.as_mut_ptr() as usize) };
        mmio.write_register(0, 8, 0xdead_beef);
        assert_eq!(mmio.read_register(0, 8), 0xdead_beef);
        assert_eq!(mmio.read_register(0, 4), 0);
        assert_eq!(block[2], 0xdead_beef);
    }

    #[test]
    fn test_reads_through_reference() {
        let block = [0u32, 0x55aa_55aa];
        let mmio = unsafe { Mmio::with_window(block.as_ptr() as usize) };
        fn read_second<R: RegisterRead>(regs: R) -> u32 {
            regs.read_register(0, 4)
        }
        assert_eq!(read_second(&mmio), 0x55aa_55aa);
    }
}
