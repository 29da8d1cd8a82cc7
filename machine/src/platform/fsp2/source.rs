/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Fatal error interrupt sources.

use {
    super::diagnostics::{self, Column, Section},
    crate::device_tree::interface::DeviceNode,
};

/// A chip error domain that raises a fatal interrupt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorSource {
    BusError,
    CmuError,
    ConfigError,
    OpbdError,
    /// Uncorrectable DDR error reported by the memory controller.
    MemoryUncorrectable,
    /// The chassis asked for a chip reset.
    ResetWarning,
}

impl ErrorSource {
    /// Order in which interrupt lines are installed.
    pub const BINDING_ORDER: [Self; 6] = [
        Self::CmuError,
        Self::BusError,
        Self::ConfigError,
        Self::OpbdError,
        Self::MemoryUncorrectable,
        Self::ResetWarning,
    ];

    /// Order in which a firing node is matched.
    pub const DISPATCH_ORDER: [Self; 6] = [
        Self::BusError,
        Self::CmuError,
        Self::ConfigError,
        Self::OpbdError,
        Self::MemoryUncorrectable,
        Self::ResetWarning,
    ];

    /// Device tree compatible string of the interrupt node.
    pub const fn compatible(self) -> &'static str {
        match self {
            Self::BusError => "ibm,bus-error-irq",
            Self::CmuError => "ibm,cmu-error-irq",
            Self::ConfigError => "ibm,conf-error-irq",
            Self::OpbdError => "ibm,opbd-error-irq",
            Self::MemoryUncorrectable => "ibm,mc-ue-irq",
            Self::ResetWarning => "ibm,reset-warning-irq",
        }
    }

    /// Report title, also the fatal message.
    pub const fn label(self) -> &'static str {
        match self {
            Self::BusError => "Bus Error",
            Self::CmuError => "CMU Error",
            Self::ConfigError => "Configuration Logic Error",
            Self::OpbdError => "OPBD Error",
            Self::MemoryUncorrectable => "DDR: Uncorrectable Error",
            Self::ResetWarning => "Reset Warning",
        }
    }

    /// Registers dumped before halting.
    pub fn sections(self) -> &'static [Section] {
        match self {
            Self::BusError => &diagnostics::BUS_ERROR,
            Self::CmuError => &diagnostics::CMU_ERROR,
            Self::ConfigError => &diagnostics::CONF_ERROR,
            Self::MemoryUncorrectable => &diagnostics::MC_UE,
            // The OPB bridge has nothing readable, the reset status is decoded instead.
            Self::OpbdError | Self::ResetWarning => &[],
        }
    }

    /// Label alignment of the report. The memory error report lines up as one block.
    pub const fn column(self) -> Column {
        match self {
            Self::MemoryUncorrectable => Column::Shared,
            _ => Column::PerSection,
        }
    }

    /// The source a node belongs to. Exact compatible match, first in dispatch order wins.
    pub fn from_node<N: DeviceNode>(node: &N) -> Option<Self> {
        Self::DISPATCH_ORDER
            .iter()
            .copied()
            .find(|source| node.is_compatible(source.compatible()))
    }
}
