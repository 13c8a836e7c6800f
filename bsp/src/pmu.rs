/*++

Licensed under the Apache-2.0 license.

File Name:

    pmu.rs

Abstract:

    Cortex-R5/R52 performance monitor event counters, accessed through the
    CP15 c9 registers.

--*/

use tock_registers::fields::FieldValue;
use tock_registers::LocalRegisterCopy;

pub mod bits {
    use tock_registers::register_bitfields;

    register_bitfields![u32,
        pub Pmcr [
            /// Enable all counters
            E OFFSET(0) NUMBITS(1) [],
            /// Reset all event counters (write-only)
            P OFFSET(1) NUMBITS(1) [],
            /// Reset the cycle counter (write-only)
            C OFFSET(2) NUMBITS(1) [],
            D OFFSET(3) NUMBITS(1) [],
            X OFFSET(4) NUMBITS(1) [],
            DP OFFSET(5) NUMBITS(1) [],
            N OFFSET(11) NUMBITS(5) [],
            IDCODE OFFSET(16) NUMBITS(8) [],
            IMP OFFSET(24) NUMBITS(8) [],
        ],
        pub CntEnSet [
            P OFFSET(0) NUMBITS(4) [],
            C OFFSET(31) NUMBITS(1) [],
        ],
        pub CntEnClr [
            P OFFSET(0) NUMBITS(4) [],
            C OFFSET(31) NUMBITS(1) [],
        ],
        pub PmSelr [
            SEL OFFSET(0) NUMBITS(5) [],
        ],
        pub XevTyper [
            EVT_COUNT OFFSET(0) NUMBITS(16) [],
        ],
        pub PmXevCntr [
            COUNT OFFSET(0) NUMBITS(32) [],
        ],
    ];
}

use bits::{CntEnClr, CntEnSet, PmSelr, Pmcr, XevTyper};

/// PMU registers in the CP15 c9 space.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PmuRegister {
    Pmcr,
    CntEnSet,
    CntEnClr,
    PmSelr,
    XevTyper,
    PmXevCntr,
}

/// Coprocessor access to the PMU registers.
pub trait PmuAccess {
    fn read_pmu(&self, reg: PmuRegister) -> u32;
    fn write_pmu(&self, reg: PmuRegister, value: u32);
}

impl<T: PmuAccess + ?Sized> PmuAccess for &T {
    fn read_pmu(&self, reg: PmuRegister) -> u32 {
        (**self).read_pmu(reg)
    }

    fn write_pmu(&self, reg: PmuRegister, value: u32) {
        (**self).write_pmu(reg, value)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PmuCore {
    CortexR5,
    CortexR52,
}

impl PmuCore {
    pub fn counters(self) -> u32 {
        match self {
            PmuCore::CortexR5 => 3,
            PmuCore::CortexR52 => 4,
        }
    }

    /// Largest event number the core's event type register can hold.
    pub fn max_event(self) -> u32 {
        match self {
            PmuCore::CortexR5 => 0xFF,
            PmuCore::CortexR52 => 0xFFFF,
        }
    }

    fn counter_mask(self) -> u32 {
        (1 << self.counters()) - 1
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PmuError {
    /// Every event counter is already set up.
    NoFreeCounter,
    InvalidCounter(u32),
    InvalidEvent(u32),
}

/// Event counter allocator.
///
/// Counters handed out by `set_up_event` stay reserved until `disable_event`
/// releases them.
pub struct Pmu<C: PmuAccess> {
    cp: C,
    core: PmuCore,
    in_use: u32,
}

impl<C: PmuAccess> Pmu<C> {
    pub fn new(cp: C, core: PmuCore) -> Self {
        Pmu { cp, core, in_use: 0 }
    }

    pub fn core(&self) -> PmuCore {
        self.core
    }

    /// Starts counting `event` on the lowest free counter and returns its id.
    /// The counter starts from zero; the others keep running.
    pub fn set_up_event(&mut self, event: u32) -> Result<u32, PmuError> {
        if event > self.core.max_event() {
            return Err(PmuError::InvalidEvent(event));
        }
        let counter = (0..self.core.counters())
            .find(|&id| self.in_use & (1 << id) == 0)
            .ok_or(PmuError::NoFreeCounter)?;
        self.in_use |= 1 << counter;

        self.select(counter);
        self.cp
            .write_pmu(PmuRegister::XevTyper, XevTyper::EVT_COUNT.val(event).value);
        self.cp.write_pmu(PmuRegister::PmXevCntr, 0);
        self.cp
            .write_pmu(PmuRegister::CntEnSet, CntEnSet::P.val(1 << counter).value);
        self.modify_pmcr(Pmcr::E::SET);
        Ok(counter)
    }

    /// Stops `counter` and makes it available to `set_up_event` again.
    pub fn disable_event(&mut self, counter: u32) -> Result<(), PmuError> {
        self.check_counter(counter)?;
        self.cp
            .write_pmu(PmuRegister::CntEnClr, CntEnClr::P.val(1 << counter).value);
        self.in_use &= !(1 << counter);
        Ok(())
    }

    pub fn event_count(&self, counter: u32) -> Result<u32, PmuError> {
        self.check_counter(counter)?;
        self.select(counter);
        Ok(self.cp.read_pmu(PmuRegister::PmXevCntr))
    }

    /// Enables the counters that have an event set up.
    pub fn enable_counters(&self) {
        self.modify_pmcr(Pmcr::E::SET);
        self.cp
            .write_pmu(PmuRegister::CntEnSet, CntEnSet::P.val(self.in_use).value);
    }

    pub fn disable_counters(&self) {
        self.cp.write_pmu(
            PmuRegister::CntEnClr,
            CntEnClr::P.val(self.core.counter_mask()).value,
        );
    }

    /// Zeroes every event counter.
    pub fn reset_counters(&self) {
        self.modify_pmcr(Pmcr::P::SET);
    }

    fn check_counter(&self, counter: u32) -> Result<(), PmuError> {
        if counter >= self.core.counters() {
            return Err(PmuError::InvalidCounter(counter));
        }
        Ok(())
    }

    fn select(&self, counter: u32) {
        self.cp
            .write_pmu(PmuRegister::PmSelr, PmSelr::SEL.val(counter).value);
    }

    fn modify_pmcr(&self, field: FieldValue<u32, Pmcr::Register>) {
        let mut pmcr =
            LocalRegisterCopy::<u32, Pmcr::Register>::new(self.cp.read_pmu(PmuRegister::Pmcr));
        pmcr.modify(field);
        self.cp.write_pmu(PmuRegister::Pmcr, pmcr.get());
    }
}

/// CP15 accessor for code running on the R5/R52 itself.
#[cfg(target_arch = "arm")]
pub struct Cp15 {
    _private: (),
}

#[cfg(target_arch = "arm")]
impl Cp15 {
    /// # Safety
    ///
    /// The caller must run at a privilege level allowed to access the PMU
    /// and must be the only user of the event counters.
    pub const unsafe fn new() -> Self {
        Cp15 { _private: () }
    }
}

#[cfg(target_arch = "arm")]
macro_rules! mrc_c9 {
    ($crm:literal, $op2:literal) => {{
        let value: u32;
        // Safety: guaranteed by the contract of `Cp15::new`.
        unsafe {
            core::arch::asm!(
                concat!("mrc p15, 0, {}, c9, ", $crm, ", ", $op2),
                out(reg) value,
                options(nomem, nostack, preserves_flags),
            );
        }
        value
    }};
}

#[cfg(target_arch = "arm")]
macro_rules! mcr_c9 {
    ($crm:literal, $op2:literal, $value:expr) => {{
        let value: u32 = $value;
        // Safety: guaranteed by the contract of `Cp15::new`.
        unsafe {
            core::arch::asm!(
                concat!("mcr p15, 0, {}, c9, ", $crm, ", ", $op2),
                in(reg) value,
                options(nostack, preserves_flags),
            );
        }
    }};
}

#[cfg(target_arch = "arm")]
impl PmuAccess for Cp15 {
    fn read_pmu(&self, reg: PmuRegister) -> u32 {
        match reg {
            PmuRegister::Pmcr => mrc_c9!("c12", "0"),
            PmuRegister::CntEnSet => mrc_c9!("c12", "1"),
            PmuRegister::CntEnClr => mrc_c9!("c12", "2"),
            PmuRegister::PmSelr => mrc_c9!("c12", "5"),
            PmuRegister::XevTyper => mrc_c9!("c13", "1"),
            PmuRegister::PmXevCntr => mrc_c9!("c13", "2"),
        }
    }

    fn write_pmu(&self, reg: PmuRegister, value: u32) {
        match reg {
            PmuRegister::Pmcr => mcr_c9!("c12", "0", value),
            PmuRegister::CntEnSet => mcr_c9!("c12", "1", value),
            PmuRegister::CntEnClr => mcr_c9!("c12", "2", value),
            PmuRegister::PmSelr => mcr_c9!("c12", "5", value),
            PmuRegister::XevTyper => mcr_c9!("c13", "1", value),
            PmuRegister::PmXevCntr => mcr_c9!("c13", "2", value),
        }
    }
}
