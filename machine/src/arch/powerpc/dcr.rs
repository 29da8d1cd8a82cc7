/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Device control register bus of the running core.

use crate::platform::fsp2::dcr::interface::DcrBus;

/// The DCR bus, accessed through the indexed `mfdcrx`/`mtdcrx` forms so that DCR numbers
/// need not be immediates.
pub struct Dcr;

impl DcrBus for Dcr {
    #[inline]
    fn mfdcr(&self, dcrn: u32) -> u32 {
        let value: u32;
        // SAFETY: DCR reads have no memory side effects visible to Rust.
        unsafe {
            core::arch::asm!(
                "mfdcrx {value}, {dcrn}",
                value = out(reg) value,
                dcrn = in(reg) dcrn,
                options(nomem, nostack, preserves_flags)
            );
        }
        value
    }

    #[inline]
    fn mtdcr(&self, dcrn: u32, value: u32) {
        // SAFETY: see `mfdcr`; the caller owns the meaning of the write.
        unsafe {
            core::arch::asm!(
                "mtdcrx {dcrn}, {value}",
                dcrn = in(reg) dcrn,
                value = in(reg) value,
                options(nostack, preserves_flags)
            );
        }
    }
}
