/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Kernel halt.

use {crate::platform::interface::Halt, core::fmt};

/// Halts by panicking with the fatal message.
///
/// The binary's panic handler prints the message and parks the core in [`crate::cpu::endless_sleep`].
pub struct KernelPanic;

pub static KERNEL_PANIC: KernelPanic = KernelPanic;

impl Halt for KernelPanic {
    fn halt(&self, args: fmt::Arguments) -> ! {
        panic!("{}", args)
    }
}

/// Panic handler body for kernel binaries.
pub fn handler(console: &dyn crate::console::interface::Write, info: &core::panic::PanicInfo) -> ! {
    crate::println!(console, "Kernel panic - not syncing: {}", info);
    crate::cpu::endless_sleep()
}
