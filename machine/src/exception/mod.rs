// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2020-2022 Andre Richter <andre.o.richter@gmail.com>

//! Asynchronous exception handling.
//!
//! Only what the board code needs to hook its handlers into the platform interrupt layer.

pub mod asynchronous;
