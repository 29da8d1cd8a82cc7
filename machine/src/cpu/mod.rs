// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2020-2022 Andre Richter <andre.o.richter@gmail.com>

//! Processor code.

cfg_if::cfg_if! {
    if #[cfg(target_arch = "powerpc")] {
        pub use crate::arch::powerpc::cpu::endless_sleep;
    } else {
        /// Loop forever. Host builds have no wait state to enter.
        #[inline]
        pub fn endless_sleep() -> ! {
            loop {
                core::hint::spin_loop();
            }
        }
    }
}
