/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

cfg_if::cfg_if! {
    if #[cfg(target_arch = "powerpc")] {
        pub mod powerpc;
        pub use powerpc::*;
    }
}
