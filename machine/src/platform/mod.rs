/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Board support and board selection.

pub mod fsp2;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Platform interfaces.
pub mod interface {
    use {crate::exception::asynchronous::IRQNumber, core::fmt};

    /// Stops the whole system.
    pub trait Halt {
        /// Report `args` as the fatal condition and never return.
        fn halt(&self, args: fmt::Arguments) -> !;
    }

    /// Chip level reset.
    pub trait SystemReset {
        fn reset_system(&self, command: Option<&str>) -> !;
    }

    /// Decrementer calibration against the timebase frequency from the device tree.
    pub trait Timebase {
        fn calibrate_decr(&self);
    }

    /// A board description the boot code can select at run time.
    pub trait Machine {
        /// Board name, for the boot log.
        fn name(&self) -> &'static str;

        /// Detect the board and bring it to a known state. Returns false when this is not
        /// the running board, in which case nothing was touched.
        fn probe(&self) -> bool;

        /// Early boot progress indicator.
        fn progress(&self, message: &str, code: u16);

        /// Bring up the interrupt controllers and install board interrupts.
        fn init_irq(&'static self);

        /// Pending interrupt line, if any.
        fn get_irq(&self) -> Option<IRQNumber>;

        fn restart(&self, command: Option<&str>) -> !;

        fn calibrate_decr(&self);
    }
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Pick the running board: the first machine whose probe succeeds.
///
/// Probing stops at the first match, boards listed after it are never probed.
pub fn select_machine(
    machines: &[&'static (dyn interface::Machine + Sync)],
) -> Option<&'static (dyn interface::Machine + Sync)> {
    machines.iter().copied().find(|machine| machine.probe())
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
