/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

/// Loop forever in wait state.
#[inline]
pub fn endless_sleep() -> ! {
    loop {
        // SAFETY: `wait` only stops instruction fetch until the next interrupt.
        unsafe { core::arch::asm!("wait", options(nomem, nostack)) };
    }
}
