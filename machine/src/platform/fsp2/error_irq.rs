/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Fatal error interrupts.
//!
//! Every error interrupt node in the device tree gets the same handler, with the node as
//! context. The handler works out which domain fired, dumps its registers and halts.

use {
    super::{
        dcr::{interface::DcrBus, Register, RegisterSpaces},
        diagnostics,
        regs::{CMUN_CRCS, CRCS},
        source::ErrorSource,
    },
    crate::{
        console::interface::Write,
        device_tree::interface::{DeviceNode, DeviceTree},
        exception::asynchronous::{
            interface::{IRQHandler, IRQManager},
            IRQHandlerDescriptor, IRQNumber, IRQReturn,
        },
        platform::interface::Halt,
    },
    core::sync::atomic::{AtomicU8, Ordering},
    tock_registers::interfaces::Readable,
};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Where the handler is in its run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum HandlerState {
    Idle = 0,
    Dispatching = 1,
    Reporting = 2,
    Halted = 3,
}

/// The shared error interrupt handler.
pub struct ErrorIrqHandler<B: 'static> {
    spaces: &'static RegisterSpaces<B>,
    console: &'static (dyn Write + Sync),
    halt: &'static (dyn Halt + Sync),
    state: AtomicU8,
}

/// Outcome of installing the error interrupts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingReport {
    /// Lines with the handler installed.
    pub bound: usize,
    /// Nodes left without a handler.
    pub skipped: usize,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl HandlerState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Dispatching,
            2 => Self::Reporting,
            3 => Self::Halted,
            _ => Self::Idle,
        }
    }
}

impl<B: DcrBus> ErrorIrqHandler<B> {
    pub const fn new(
        spaces: &'static RegisterSpaces<B>,
        console: &'static (dyn Write + Sync),
        halt: &'static (dyn Halt + Sync),
    ) -> Self {
        Self {
            spaces,
            console,
            halt,
            state: AtomicU8::new(HandlerState::Idle as u8),
        }
    }

    pub fn state(&self) -> HandlerState {
        HandlerState::from_raw(self.state.load(Ordering::Acquire))
    }

    fn enter(&self, state: HandlerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Claim the handler for one dispatch. Fails once a fault is being reported.
    fn begin_dispatch(&self) -> bool {
        self.state
            .compare_exchange(
                HandlerState::Idle as u8,
                HandlerState::Dispatching as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Report `source` and stop the system.
    fn report_and_halt(&self, source: ErrorSource) -> ! {
        self.enter(HandlerState::Reporting);

        if source == ErrorSource::ResetWarning {
            let cmu = self.spaces.cmu();
            let crcs = Register::<_, CRCS::Register>::new(&cmu, CMUN_CRCS).extract();

            self.enter(HandlerState::Halted);
            if crcs.matches_all(CRCS::STAT::ChipResetB) {
                self.halt
                    .halt(format_args!("Received chassis-initiated reset request"))
            }
            self.halt
                .halt(format_args!("Unknown external reset: CRCS=0x{:x}", crcs.get()))
        }

        diagnostics::report(
            self.console,
            self.spaces,
            source.label(),
            source.sections(),
            source.column(),
        );

        self.enter(HandlerState::Halted);
        self.halt.halt(format_args!("{}", source.label()))
    }
}

impl<B: DcrBus, N: DeviceNode> IRQHandler<N> for ErrorIrqHandler<B> {
    fn handle(&self, irq: IRQNumber, node: &N) -> IRQReturn {
        // Another CPU already owns the fault report and is about to halt the system.
        if !self.begin_dispatch() {
            return IRQReturn::NotHandled;
        }

        match ErrorSource::from_node(node) {
            Some(source) => self.report_and_halt(source),
            None => {
                crate::warn!(
                    self.console,
                    "unrecognized fault source {} on interrupt {}",
                    node.name(),
                    irq
                );
                self.enter(HandlerState::Idle);
                IRQReturn::NotHandled
            }
        }
    }
}

/// Install `handler` on the interrupt of every error node in `tree`.
///
/// A node whose interrupt cannot be mapped or requested is logged and skipped, the
/// remaining nodes and sources are still bound.
pub fn bind_error_irqs<T, M>(
    tree: &T,
    irqs: &M,
    handler: &'static (dyn IRQHandler<T::Node> + Sync),
    console: &dyn Write,
) -> BindingReport
where
    T: DeviceTree,
    T::Node: 'static,
    M: IRQManager<T::Node>,
{
    let mut report = BindingReport::default();

    for source in ErrorSource::BINDING_ORDER {
        tree.for_each_compatible_node(source.compatible(), &mut |node| {
            let Some(number) = IRQNumber::new(irqs.parse_and_map(&node, 0)) else {
                crate::warn!(
                    console,
                    "device tree node {} is missing a valid interrupt",
                    node.name()
                );
                report.skipped += 1;
                return;
            };

            let descriptor = IRQHandlerDescriptor::new(
                number,
                source.compatible(),
                handler,
                node.clone(),
            );
            match irqs.request_irq(descriptor) {
                Ok(()) => report.bound += 1,
                Err(e) => {
                    crate::warn!(
                        console,
                        "request_irq failed: node={} irq={}: {}",
                        node.name(),
                        number,
                        e
                    );
                    report.skipped += 1;
                }
            }
        });
    }

    report
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            exception::asynchronous::IRQError,
            platform::fsp2::regs::*,
            tests::{
                halt_message, MockBus, MockNode, MockTree, RecordingConsole,
                RecordingIrqs, CAPTURING_HALT,
            },
        },
    };

    fn handler() -> (&'static ErrorIrqHandler<MockBus>, &'static RecordingConsole) {
        handler_over(MockBus::new())
    }

    fn handler_over(
        bus: MockBus,
    ) -> (&'static ErrorIrqHandler<MockBus>, &'static RecordingConsole) {
        let spaces: &'static RegisterSpaces<MockBus> =
            Box::leak(Box::new(RegisterSpaces::new(bus)));
        let console: &'static RecordingConsole = Box::leak(Box::new(RecordingConsole::new()));
        let handler: &'static ErrorIrqHandler<MockBus> = Box::leak(Box::new(
            ErrorIrqHandler::new(spaces, console, &CAPTURING_HALT),
        ));
        (handler, console)
    }

    fn fire(handler: &ErrorIrqHandler<MockBus>, node: MockNode) -> String {
        halt_message(|| {
            handler.handle(IRQNumber::new(5).unwrap(), &node);
        })
        .expect("handler returned instead of halting")
    }

    #[test]
    fn chassis_reset_request_is_recognised() {
        let (handler, console) = handler();
        handler.spaces.bus().preset_cmu(CMUN_CRCS, CRCS_STAT_CHIP_RST_B | 0x1234);

        let message = fire(handler, MockNode::new("rst", &["ibm,reset-warning-irq"]));

        assert_eq!(message, "Received chassis-initiated reset request");
        assert_eq!(handler.state(), HandlerState::Halted);
        assert!(console.lines().is_empty());
    }

    #[test]
    fn other_reset_status_is_reported_raw() {
        let (handler, _) = handler();
        handler.spaces.bus().preset_cmu(CMUN_CRCS, 0x3000_00a5);

        let message = fire(handler, MockNode::new("rst", &["ibm,reset-warning-irq"]));

        assert_eq!(message, "Unknown external reset: CRCS=0x300000a5");
    }

    #[test]
    fn bus_error_dumps_every_register_in_order_then_halts() {
        let (handler, console) = handler_over(MockBus::echoing());

        let message = fire(handler, MockNode::new("bus", &["ibm,bus-error-irq"]));

        assert_eq!(message, "Bus Error");
        assert_eq!(handler.state(), HandlerState::Halted);
        assert_eq!(
            console.lines(),
            vec![
                    "Bus Error",
                    "L2 Controller:",
                    "MCK:      0x00000120",
                    "INT:      0x00000150",
                    "PLBSTAT0: 0x00000300",
                    "PLBSTAT1: 0x00000304",
                    "ARRSTAT0: 0x00000500",
                    "ARRSTAT1: 0x00000504",
                    "ARRSTAT2: 0x00000508",
                    "CPUSTAT:  0x00000700",
                    "RACSTAT0: 0x00000900",
                    "WACSTAT0: 0x00000d00",
                    "WACSTAT1: 0x00000d04",
                    "WACSTAT2: 0x00000d08",
                    "WDFSTAT:  0x00000f00",
                    "LOG0:     0x00000180",
                    "LOG1:     0x00000184",
                    "LOG2:     0x00000188",
                    "LOG3:     0x0000018c",
                    "LOG4:     0x00000190",
                    "LOG5:     0x00000194",
                    "",
                    "PLB6 Controller:",
                    "BC_SHD: 0x11111310",
                    "BC_ERR: 0x1111130b",
                    "",
                    "PLB6-to-PLB4 Bridge:",
                    "ESR:  0x11111351",
                    "EARH: 0x11111353",
                    "EARL: 0x11111354",
                    "",
                    "PLB4-to-PLB6 Bridge:",
                    "ESR:  0x11111321",
                    "EARH: 0x11111323",
                    "EARL: 0x11111324",
                    "",
                    "PLB6-to-MCIF Bridge:",
                    "BESR0: 0x11111380",
                    "BESR1: 0x11111381",
                    "BEARH: 0x11111383",
                    "BEARL: 0x11111382",
                    "",
                    "PLB4 Arbiter:",
                    "P0ESRH: 0x00000013",
                    "P0ESRL: 0x00000012",
                    "P0EARH: 0x00000015",
                    "P0EARL: 0x00000014",
                    "P1ESRH: 0x0000001b",
                    "P1ESRL: 0x0000001a",
                    "P1EARH: 0x0000001d",
                    "P1EARL: 0x0000001c",
                    "",
                    "PLBOPB Bridge 0:",
                    "GESR0: 0x00000020",
                    "GESR1: 0x00000024",
                    "GESR2: 0x0000002c",
                    "GEARU: 0x00000023",
                    "GEAR:  0x00000022",
                    "",
                    "PLBOPB Bridge 1:",
                    "GESR0: 0x00000030",
                    "GESR1: 0x00000034",
                    "GESR2: 0x0000003c",
                    "GEARU: 0x00000033",
                    "GEAR:  0x00000032",
                    "",
                    "PLBOPB Bridge 2:",
                    "GESR0: 0x00000040",
                    "GESR1: 0x00000044",
                    "GESR2: 0x0000004c",
                    "GEARU: 0x00000043",
                    "GEAR:  0x00000042",
                    "",
                    "PLBOPB Bridge 3:",
                    "GESR0: 0x00000050",
                    "GESR1: 0x00000054",
                    "GESR2: 0x0000005c",
                    "GEARU: 0x00000053",
                    "GEAR:  0x00000052",
                    "",
                    "PLB4-to-AHB Bridge:",
                    "ESR:   0x00000403",
                    "SEUAR: 0x00000401",
                    "SELAR: 0x00000402",
                    "",
                    "AHB-to-PLB4 Bridge:",
                    "ESR: 0x00000408",
                    "EAR: 0x00000409",
            ]
        );
    }

    #[test]
    fn config_error_dumps_fir_and_parity_registers() {
        let (handler, console) = handler_over(MockBus::echoing());

        let message = fire(handler, MockNode::new("conf", &["ibm,conf-error-irq"]));

        assert_eq!(message, "Configuration Logic Error");
        assert_eq!(
            console.lines(),
            vec![
                    "Configuration Logic Error",
                    "CONF_FIR: 0x0000803a",
                    "RPERR0:   0x0000804d",
                    "RPERR1:   0x0000804e",
            ]
        );
    }

    #[test]
    fn memory_error_lines_up_every_register_in_one_column() {
        let (handler, console) = handler_over(MockBus::echoing());

        let message = fire(handler, MockNode::new("mcue", &["ibm,mc-ue-irq"]));

        assert_eq!(message, "DDR: Uncorrectable Error");
        assert_eq!(
            console.lines(),
            vec![
                    "DDR: Uncorrectable Error",
                    "DDR3/4 Controller:",
                    "MCSTAT:            0x11120010",
                    "MCOPT1:            0x11120020",
                    "MCOPT2:            0x11120021",
                    "PHYSTAT:           0x11120032",
                    "CFGR0:             0x11120040",
                    "CFGR1:             0x11120041",
                    "CFGR2:             0x11120042",
                    "CFGR3:             0x11120043",
                    "SCRUB_CNTL:        0x111200aa",
                    "ECCERR_PORT0:      0x111200f0",
                    "ECCERR_ADDR_PORT0: 0x111200e0",
                    "ECCERR_CNT_PORT0:  0x111200e4",
                    "ECC_CHECK_PORT0:   0x111200e8",
                    "",
                    "Memory Controller Wrapper:",
                    "MCER0:             0x11111800",
                    "MCER1:             0x11111801",
                    "",
                    "PLB6-to-MCIF Bridge:",
                    "BESR:              0x11111380",
                    "BEARL:             0x11111382",
                    "BEARH:             0x11111383",
            ]
        );
    }

    #[test]
    fn halted_state_survives_later_interrupts() {
        let (handler, console) = handler();
        fire(handler, MockNode::new("bus", &["ibm,bus-error-irq"]));
        let reported = console.lines();

        let unknown = handler.handle(
            IRQNumber::new(9).unwrap(),
            &MockNode::new("gpio", &["ibm,gpio"]),
        );
        let second = handler.handle(
            IRQNumber::new(14).unwrap(),
            &MockNode::new("opbd", &["ibm,opbd-error-irq"]),
        );

        assert_eq!(unknown, IRQReturn::NotHandled);
        assert_eq!(second, IRQReturn::NotHandled);
        assert_eq!(handler.state(), HandlerState::Halted);
        assert_eq!(console.lines(), reported);
    }

    #[test]
    fn cmu_error_reads_fir_through_the_cmu_window() {
        let (handler, console) = handler();
        handler.spaces.bus().preset_cmu(CMUN_FIR0, 0x3000_0000);

        let message = fire(handler, MockNode::new("cmu", &["ibm,cmu-error-irq"]));

        assert_eq!(message, "CMU Error");
        assert_eq!(console.lines(), vec!["CMU Error", "FIR0: 0x30000000"]);
    }

    #[test]
    fn opbd_error_halts_without_registers() {
        let (handler, console) = handler();

        let message = fire(handler, MockNode::new("opbd", &["ibm,opbd-error-irq"]));

        assert_eq!(message, "OPBD Error");
        assert_eq!(console.lines(), vec!["OPBD Error"]);
    }

    #[test]
    fn unknown_node_is_logged_and_not_handled() {
        let (handler, console) = handler();
        let node = MockNode::new("gpio", &["ibm,gpio"]);

        let result = handler.handle(IRQNumber::new(9).unwrap(), &node);

        assert_eq!(result, IRQReturn::NotHandled);
        assert_eq!(handler.state(), HandlerState::Idle);
        assert_eq!(
            console.lines(),
            vec!["[W] unrecognized fault source gpio on interrupt 9"]
        );
    }

    fn error_tree() -> MockTree {
        MockTree::new(&["ibm,fsp2"])
            .with_node(MockNode::new("cmu", &["ibm,cmu-error-irq"]).with_irq(10))
            .with_node(MockNode::new("bus0", &["ibm,bus-error-irq"]).with_irq(11))
            .with_node(MockNode::new("bus1", &["ibm,bus-error-irq"]).with_irq(12))
            .with_node(MockNode::new("conf", &["ibm,conf-error-irq"]).with_irq(13))
            .with_node(MockNode::new("opbd", &["ibm,opbd-error-irq"]).with_irq(14))
            .with_node(MockNode::new("mcue", &["ibm,mc-ue-irq"]).with_irq(15))
            .with_node(MockNode::new("rst", &["ibm,reset-warning-irq"]).with_irq(16))
            .with_node(MockNode::new("uart", &["ns16550"]).with_irq(17))
    }

    #[test]
    fn every_error_node_is_bound_in_binding_order() {
        let (handler, console) = handler();
        let tree = error_tree();
        let irqs = RecordingIrqs::new();

        let report = bind_error_irqs(&tree, &irqs, handler, console);

        assert_eq!(report, BindingReport { bound: 7, skipped: 0 });
        assert_eq!(
            irqs.bound_nodes(),
            vec!["cmu", "bus0", "bus1", "conf", "opbd", "mcue", "rst"]
        );
        assert_eq!(
            irqs.queried(),
            vec!["cmu", "bus0", "bus1", "conf", "opbd", "mcue", "rst"]
        );
        assert_eq!(
            irqs.bound_names(),
            vec![
                "ibm,cmu-error-irq",
                "ibm,bus-error-irq",
                "ibm,bus-error-irq",
                "ibm,conf-error-irq",
                "ibm,opbd-error-irq",
                "ibm,mc-ue-irq",
                "ibm,reset-warning-irq",
            ]
        );
    }

    #[test]
    fn node_without_interrupt_is_skipped_and_binding_continues() {
        let (handler, console) = handler();
        let tree = MockTree::new(&["ibm,fsp2"])
            .with_node(MockNode::new("cmu", &["ibm,cmu-error-irq"]))
            .with_node(MockNode::new("bus0", &["ibm,bus-error-irq"]))
            .with_node(MockNode::new("bus1", &["ibm,bus-error-irq"]).with_irq(12))
            .with_node(MockNode::new("rst", &["ibm,reset-warning-irq"]).with_irq(16));
        let irqs = RecordingIrqs::new();

        let report = bind_error_irqs(&tree, &irqs, handler, console);

        assert_eq!(report, BindingReport { bound: 2, skipped: 2 });
        assert_eq!(irqs.bound_nodes(), vec!["bus1", "rst"]);
        assert_eq!(
            console.lines(),
            vec![
                "[W] device tree node cmu is missing a valid interrupt",
                "[W] device tree node bus0 is missing a valid interrupt",
            ]
        );
    }

    #[test]
    fn request_failure_skips_only_that_node() {
        let (handler, console) = handler();
        let tree = error_tree();
        let irqs = RecordingIrqs::new().failing(13, IRQError::Busy { irq: 13 });

        let report = bind_error_irqs(&tree, &irqs, handler, console);

        assert_eq!(report, BindingReport { bound: 6, skipped: 1 });
        assert!(!irqs.bound_nodes().contains(&"conf".to_string()));
        assert_eq!(
            console.lines(),
            vec!["[W] request_irq failed: node=conf irq=13: interrupt line 13 is already claimed"]
        );
    }

    #[test]
    fn bound_line_halts_with_its_own_node() {
        let (handler, console) = handler();
        let tree = error_tree();
        let irqs = RecordingIrqs::new();
        bind_error_irqs(&tree, &irqs, handler, console);

        let message = halt_message(|| {
            irqs.fire(15);
        });

        assert_eq!(message.as_deref(), Some("DDR: Uncorrectable Error"));
        assert_eq!(console.lines()[0], "DDR: Uncorrectable Error");
    }
}
