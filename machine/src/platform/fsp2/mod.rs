/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! IBM FSP-2 service processor board.
//!
//! The board arms the chip error detection logic when probed, installs a fatal handler on
//! every error interrupt the device tree describes, and populates the on-chip buses once
//! the interrupt tree is up.

pub mod arming;
pub mod dcr;
pub mod diagnostics;
pub mod error_irq;
pub mod regs;
pub mod source;

use {
    self::{
        dcr::{interface::DcrBus, RegisterSpaces},
        error_irq::{bind_error_irqs, ErrorIrqHandler},
    },
    crate::{
        console::interface::Write,
        device_tree::interface::DeviceTree,
        drivers::{interface::BusProber, BusProbe, ProbeError},
        exception::asynchronous::{interface::IRQManager, IRQNumber},
        platform::interface::{Halt, Machine, SystemReset, Timebase},
    },
};

pub use {error_irq::HandlerState, source::ErrorSource};

/// Device tree root compatible string of the board.
pub const COMPATIBLE: &str = "ibm,fsp2";

/// Buses populated by [`Fsp2::device_probe`].
pub static BUSES: [&str; 3] = ["ibm,plb4", "ibm,plb6", "ibm,opb"];

/// Everything the board needs from the rest of the kernel.
pub struct Services {
    pub console: &'static (dyn Write + Sync),
    pub halt: &'static (dyn Halt + Sync),
    pub reset: &'static (dyn SystemReset + Sync),
    pub timebase: &'static (dyn Timebase + Sync),
}

/// The FSP-2 machine.
pub struct Fsp2<B: 'static, T: 'static, M: 'static> {
    spaces: &'static RegisterSpaces<B>,
    tree: &'static T,
    irqs: &'static M,
    console: &'static (dyn Write + Sync),
    reset: &'static (dyn SystemReset + Sync),
    timebase: &'static (dyn Timebase + Sync),
    error_irq: ErrorIrqHandler<B>,
    bus_probe: BusProbe,
}

impl<B, T, M> Fsp2<B, T, M>
where
    B: DcrBus,
    T: DeviceTree,
    M: IRQManager<T::Node>,
{
    pub fn new(
        spaces: &'static RegisterSpaces<B>,
        tree: &'static T,
        irqs: &'static M,
        services: Services,
    ) -> Self {
        Self {
            spaces,
            tree,
            irqs,
            console: services.console,
            reset: services.reset,
            timebase: services.timebase,
            error_irq: ErrorIrqHandler::new(spaces, services.console, services.halt),
            bus_probe: BusProbe::new(&BUSES),
        }
    }

    /// The shared fatal error handler.
    pub fn error_irq(&self) -> &ErrorIrqHandler<B> {
        &self.error_irq
    }

    /// Populate the on-chip buses. Runs once, late in boot.
    pub fn device_probe(&self, prober: &dyn BusProber) -> Result<(), ProbeError> {
        self.bus_probe.init(prober)
    }
}

impl<B, T, M> Machine for Fsp2<B, T, M>
where
    B: DcrBus + Sync,
    T: DeviceTree + Sync,
    T::Node: 'static,
    M: IRQManager<T::Node> + Sync,
{
    fn name(&self) -> &'static str {
        "FSP-2"
    }

    fn probe(&self) -> bool {
        arming::arm_error_detection(self.tree, self.spaces, self.console)
    }

    fn progress(&self, message: &str, _code: u16) {
        crate::println!(self.console, "{}", message);
    }

    fn init_irq(&'static self) {
        self.irqs.init_tree();

        let report = bind_error_irqs(self.tree, self.irqs, &self.error_irq, self.console);
        crate::info!(
            self.console,
            "FSP-2: {} error interrupts bound, {} skipped",
            report.bound,
            report.skipped
        );
    }

    fn get_irq(&self) -> Option<IRQNumber> {
        self.irqs.get_irq()
    }

    fn restart(&self, command: Option<&str>) -> ! {
        self.reset.reset_system(command)
    }

    fn calibrate_decr(&self) {
        self.timebase.calibrate_decr()
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
