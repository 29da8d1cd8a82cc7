/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Operator-visible output stream.
//!
//! The board code never owns a console. It borrows whatever the boot code registered with
//! it, so fault reports land wherever udbg output goes on the running system.

pub mod null_console;

pub use null_console::{NullConsole, NULL_CONSOLE};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Console interfaces.
pub mod interface {
    use core::fmt;

    /// Console write functions.
    ///
    /// Lines are appended in call order. Implementations must not allocate or block, they
    /// are called from the fatal error interrupt.
    pub trait Write {
        /// Write a Rust format string.
        fn write_fmt(&self, args: fmt::Arguments) -> fmt::Result;
    }
}
