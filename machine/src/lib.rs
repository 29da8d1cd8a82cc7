/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! FSP-2 board support.
//!
//! Arms the chip error detection logic at probe time and turns the chip's fatal
//! error interrupts into a register dump followed by a system halt.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "powerpc", feature(asm_experimental_arch))]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::enum_variant_names)]
#![allow(clippy::nonstandard_macro_braces)] // https://github.com/shepmaster/snafu/issues/296

#[macro_use]
pub mod macros;

/// Architecture-specific code.
pub mod arch;
pub mod console;
pub mod cpu;
pub mod device_tree;
pub mod drivers;
pub mod exception;
pub mod panic;
pub mod platform;
pub mod sync;
