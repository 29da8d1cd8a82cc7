/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Device tree queries used by the board code.
//!
//! The board only ever asks two questions: "is the root compatible with X" and "which nodes
//! are compatible with X". Those are the [`interface::DeviceTree`] trait, implemented here over
//! a flattened blob with fdt-rs.

use {
    fdt_rs::{
        base::{DevTree, DevTreeNode},
        error::{DevTreeError, Result as DevTreeResult},
        prelude::{PropReader, *},
    },
    shrinkwraprs::Shrinkwrap,
};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Device tree interfaces.
pub mod interface {
    /// A hardware node found in the device tree.
    ///
    /// Nodes are handed to interrupt handlers as context, hence `Clone` and cheap.
    pub trait DeviceNode: Clone {
        /// Node name, for diagnostics.
        fn name(&self) -> &str;

        /// True when one entry of the node's `compatible` list equals `compatible` exactly.
        fn is_compatible(&self, compatible: &str) -> bool;
    }

    pub trait DeviceTree {
        type Node: DeviceNode;

        /// Check the root node's `compatible` list.
        fn root_is_compatible(&self, compatible: &str) -> bool;

        /// Call `f` for every node advertising `compatible`, in tree order.
        fn for_each_compatible_node(&self, compatible: &str, f: &mut dyn FnMut(Self::Node));
    }
}

/// Flattened device tree as passed by the boot firmware.
#[derive(Shrinkwrap)]
pub struct FlatDeviceTree<'dt>(pub DevTree<'dt>);

/// The parts of a flattened tree node the board code looks at.
#[derive(Copy, Clone, Debug)]
pub struct FdtNode<'dt> {
    name: &'dt str,
    /// Raw `compatible` property: NUL separated strings.
    compatible: &'dt [u8],
    /// First cell of the `interrupts` property.
    interrupt: Option<u32>,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl<'dt> FlatDeviceTree<'dt> {
    /// Wrap a flattened device tree blob.
    ///
    /// # Safety
    ///
    /// `blob` must start with a device tree header and stay mapped for `'dt`.
    pub unsafe fn new(blob: &'dt [u8]) -> Result<Self, DevTreeError> {
        Ok(Self(DevTree::new(blob)?))
    }
}

impl<'dt> FdtNode<'dt> {
    fn from_node(node: &DevTreeNode<'_, 'dt>) -> DevTreeResult<Self> {
        let mut this = Self {
            name: node.name()?,
            compatible: &[],
            interrupt: None,
        };

        let mut props = node.props();
        while let Some(prop) = props.next()? {
            match prop.name()? {
                "compatible" => this.compatible = prop.propbuf(),
                "interrupts" => this.interrupt = prop.u32(0).ok(),
                _ => {}
            }
        }

        Ok(this)
    }

    /// Hardware interrupt specifier, if the node has one.
    pub fn interrupt(&self) -> Option<u32> {
        self.interrupt
    }

    /// Iterate the node's `compatible` list.
    pub fn compatible(&self) -> impl Iterator<Item = &'dt str> {
        self.compatible
            .split(|&b| b == 0)
            .filter(|s| !s.is_empty())
            .filter_map(|s| core::str::from_utf8(s).ok())
    }
}

impl<'dt> interface::DeviceNode for FdtNode<'dt> {
    fn name(&self) -> &str {
        self.name
    }

    fn is_compatible(&self, compatible: &str) -> bool {
        self.compatible().any(|c| c == compatible)
    }
}

impl<'dt> interface::DeviceTree for FlatDeviceTree<'dt> {
    type Node = FdtNode<'dt>;

    fn root_is_compatible(&self, compatible: &str) -> bool {
        use interface::DeviceNode;

        match self.root() {
            Ok(Some(root)) => FdtNode::from_node(&root)
                .map(|root| root.is_compatible(compatible))
                .unwrap_or(false),
            _ => false,
        }
    }

    fn for_each_compatible_node(&self, compatible: &str, f: &mut dyn FnMut(Self::Node)) {
        let mut nodes = self.compatible_nodes(compatible);
        // A parse error ends the walk; nodes after a corrupt one are unreachable anyway.
        while let Ok(Some(node)) = nodes.next() {
            if let Ok(node) = FdtNode::from_node(&node) {
                f(node);
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
