/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Implementation of PPC476 kernel functions.

pub mod cpu;
pub mod dcr;
pub mod exception;
