// Licensed under the Apache-2.0 license

use crate::RegisterWrite;

pub const RESET_SET: u32 = 1;
pub const RESET_UNSET: u32 = 0;

/// Places the block whose reset register is at `base + offset` in reset.
pub fn set_reset(regs: &impl RegisterWrite, base: u32, offset: u32) {
    regs.write_register(base, offset, RESET_SET);
}

/// Pulses the reset line: asserts it, then releases it.
pub fn release_reset(regs: &impl RegisterWrite, base: u32, offset: u32) {
    regs.write_register(base, offset, RESET_SET);
    regs.write_register(base, offset, RESET_UNSET);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegisterRead;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        writes: RefCell<Vec<(u32, u32, u32)>>,
    }

    impl RegisterRead for Recorder {
        fn read_register(&self, _base: u32, _offset: u32) -> u32 {
            0
        }
    }

    impl RegisterWrite for Recorder {
        fn write_register(&self, base: u32, offset: u32, value: u32) {
            self.writes.borrow_mut().push((base, offset, value));
        }
    }

    #[test]
    fn test_set_reset() {
        let regs = Recorder::default();
        set_reset(&regs, 0xF11E_0000, 0x40);
        assert_eq!(*regs.writes.borrow(), vec![(0xF11E_0000, 0x40, 1)]);
    }

    #[test]
    fn test_release_reset_pulses() {
        let regs = Recorder::default();
        release_reset(&regs, 0xF11E_0000, 0x40);
        assert_eq!(
            *regs.writes.borrow(),
            vec![(0xF11E_0000, 0x40, 1), (0xF11E_0000, 0x40, 0)]
        );
    }
}
