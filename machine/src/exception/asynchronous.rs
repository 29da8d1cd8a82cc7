// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2020-2022 Andre Richter <andre.o.richter@gmail.com>

//! Asynchronous exception handling.

use {core::fmt, snafu::Snafu};

cfg_if::cfg_if! {
    if #[cfg(target_arch = "powerpc")] {
        pub use crate::arch::powerpc::exception::{local_irq_mask_save, local_irq_restore};
    } else if #[cfg(test)] {
        use std::cell::Cell;

        std::thread_local! {
            static MASKED: Cell<bool> = Cell::new(false);
        }

        /// Host stand-in: tracks the masked state per test thread.
        pub fn local_irq_mask_save() -> u32 {
            MASKED.with(|masked| masked.replace(true)) as u32
        }

        pub fn local_irq_restore(saved: u32) {
            MASKED.with(|masked| masked.set(saved != 0));
        }

        /// Whether the calling thread currently has interrupts masked.
        pub fn local_irq_masked() -> bool {
            MASKED.with(Cell::get)
        }
    } else {
        /// Host builds have no interrupts to mask.
        pub fn local_irq_mask_save() -> u32 {
            0
        }

        pub fn local_irq_restore(_saved: u32) {}
    }
}

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Raw value the interrupt mapping layer returns for "this node has no usable interrupt".
pub const NO_IRQ: u32 = 0;

/// A mapped, usable platform interrupt line. Never equal to [`NO_IRQ`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct IRQNumber(u32);

/// What a handler did with the interrupt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IRQReturn {
    /// The interrupt was not ours.
    NotHandled,
    Handled,
}

#[derive(Debug, Snafu)]
pub enum IRQError {
    #[snafu(display("interrupt line {} is already claimed", irq))]
    Busy { irq: u32 },
}

/// Interrupt descriptor: who handles which line, and with which context.
pub struct IRQHandlerDescriptor<C: 'static> {
    /// The IRQ number.
    number: IRQNumber,

    /// Descriptive name.
    name: &'static str,

    /// Reference to handler trait object.
    handler: &'static (dyn interface::IRQHandler<C> + Sync),

    /// Passed back to the handler on every invocation.
    context: C,
}

/// IRQ management interfaces.
pub mod interface {
    use super::*;

    /// Implemented by types that handle IRQs.
    ///
    /// Called from interrupt context: must not block or allocate.
    pub trait IRQHandler<C> {
        /// Called when the corresponding interrupt is asserted.
        fn handle(&self, irq: IRQNumber, context: &C) -> IRQReturn;
    }

    /// IRQ management functions of the platform interrupt layer.
    ///
    /// `N` is the device tree node type interrupts are resolved from and handed back to
    /// handlers as context.
    pub trait IRQManager<N: 'static> {
        /// Bring up the interrupt controller cascade described by the device tree.
        fn init_tree(&self);

        /// Map interrupt `index` of `node` to a platform line, or [`NO_IRQ`].
        fn parse_and_map(&self, node: &N, index: usize) -> u32;

        /// Install a handler on its line.
        fn request_irq(&self, descriptor: IRQHandlerDescriptor<N>) -> Result<(), IRQError>;

        /// The highest priority pending line, if any.
        fn get_irq(&self) -> Option<IRQNumber>;
    }
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl IRQNumber {
    /// Accepts anything but the [`NO_IRQ`] sentinel.
    pub const fn new(raw: u32) -> Option<Self> {
        if raw == NO_IRQ {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Return the wrapped number.
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Executes the provided closure while external interrupts are masked on this CPU.
#[inline]
pub fn exec_with_irq_masked<T>(f: impl FnOnce() -> T) -> T {
    let saved = local_irq_mask_save();
    let ret = f();
    local_irq_restore(saved);

    ret
}

impl fmt::Display for IRQNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<C: 'static> IRQHandlerDescriptor<C> {
    /// Create an instance.
    pub fn new(
        number: IRQNumber,
        name: &'static str,
        handler: &'static (dyn interface::IRQHandler<C> + Sync),
        context: C,
    ) -> Self {
        Self {
            number,
            name,
            handler,
            context,
        }
    }

    /// Return the number.
    pub const fn number(&self) -> IRQNumber {
        self.number
    }

    /// Return the name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Return the context handed to the handler.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Run the handler for this line. Called by the interrupt layer's dispatch.
    pub fn dispatch(&self) -> IRQReturn {
        self.handler.handle(self.number, &self.context)
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_irq_sentinel_is_rejected() {
        assert_eq!(IRQNumber::new(NO_IRQ), None);
        assert_eq!(IRQNumber::new(17).map(IRQNumber::get), Some(17));
    }

    struct Echo;

    impl interface::IRQHandler<u32> for Echo {
        fn handle(&self, irq: IRQNumber, context: &u32) -> IRQReturn {
            if irq.get() == *context {
                IRQReturn::Handled
            } else {
                IRQReturn::NotHandled
            }
        }
    }

    static ECHO: Echo = Echo;

    #[test]
    fn dispatch_passes_line_and_context() {
        let line = IRQNumber::new(5).unwrap();

        let matching = IRQHandlerDescriptor::new(line, "echo", &ECHO, 5);
        let other = IRQHandlerDescriptor::new(line, "echo", &ECHO, 6);

        assert_eq!(matching.dispatch(), IRQReturn::Handled);
        assert_eq!(other.dispatch(), IRQReturn::NotHandled);
    }

    #[test]
    fn masking_nests_and_restores() {
        assert!(!local_irq_masked());

        exec_with_irq_masked(|| {
            assert!(local_irq_masked());
            exec_with_irq_masked(|| assert!(local_irq_masked()));
            assert!(local_irq_masked());
        });

        assert!(!local_irq_masked());
    }

    #[test]
    fn errors_name_the_line() {
        assert_eq!(
            IRQError::Busy { irq: 12 }.to_string(),
            "interrupt line 12 is already claimed"
        );
    }
}
