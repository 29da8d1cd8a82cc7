/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! External interrupt masking through MSR[EE].

/// Mask external interrupts on this CPU and return the previous MSR.
#[inline]
pub fn local_irq_mask_save() -> u32 {
    let msr: u32;
    // SAFETY: reads the MSR and clears EE, no memory is touched.
    unsafe {
        core::arch::asm!(
            "mfmsr {msr}",
            "wrteei 0",
            msr = out(reg) msr,
            options(nostack, preserves_flags)
        );
    }
    msr
}

/// Put MSR[EE] back the way [`local_irq_mask_save`] found it.
#[inline]
pub fn local_irq_restore(saved: u32) {
    // SAFETY: `wrtee` only copies EE from `saved` into the MSR.
    unsafe {
        core::arch::asm!(
            "wrtee {saved}",
            saved = in(reg) saved,
            options(nostack, preserves_flags)
        );
    }
}
