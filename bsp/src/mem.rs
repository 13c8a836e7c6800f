// Licensed under the Apache-2.0 license

const WORD_ALIGN_MASK: usize = core::mem::size_of::<u32>() - 1;

/// Copies `len` bytes from `src` to `dst` with volatile accesses.
///
/// When both pointers are word aligned the bulk of the copy is done a word at
/// a time; any tail (or the whole copy, if unaligned) goes byte by byte.
///
/// # Safety
///
/// `src` must be valid for `len` bytes of reads and `dst` for `len` bytes of
/// writes. The regions must not overlap.
pub unsafe fn mem_copy(dst: *mut u8, src: *const u8, len: usize) {
    let mut dst = dst;
    let mut src = src;
    let mut remaining = len;

    if (dst as usize) & WORD_ALIGN_MASK == 0 && (src as usize) & WORD_ALIGN_MASK == 0 {
        while remaining >= core::mem::size_of::<u32>() {
            core::ptr::write_volatile(
                dst as *mut u32,
                core::ptr::read_volatile(src as *const u32),
            );
            dst = dst.add(core::mem::size_of::<u32>());
            src = src.add(core::mem::size_of::<u32>());
            remaining -= core::mem::size_of::<u32>();
        }
    }
    while remaining > 0 {
        core::ptr::write_volatile(dst, core::ptr::read_volatile(src));
        dst = dst.add(1);
        src = src.add(1);
        remaining -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_copy_with_tail() {
        let src: [u32; 3] = [0x0403_0201, 0x0807_0605, 0x0c0b_0a09];
        let mut dst = [0u32; 3];
        unsafe { mem_copy(dst.as_mut_ptr() as *mut u8, src.as_ptr() as *const u8, 10) };
        assert_eq!(dst[0], src[0]);
        assert_eq!(dst[1], src[1]);
        // only the low two bytes of the last word are copied
        assert_eq!(dst[2].to_le_bytes(), [0x09, 0x0a, 0, 0]);
    }

    #[test]
    fn test_unaligned_copy() {
        let src = [1u8, 2, 3, 4, 5, 6, 7];
        let mut dst = [0u8; 8];
        unsafe { mem_copy(dst.as_mut_ptr().add(1), src.as_ptr(), src.len()) };
        assert_eq!(dst, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_zero_length() {
        let src = [0xffu8; 4];
        let mut dst = [0u8; 4];
        unsafe { mem_copy(dst.as_mut_ptr(), src.as_ptr(), 0) };
        assert_eq!(dst, [0; 4]);
    }
}
