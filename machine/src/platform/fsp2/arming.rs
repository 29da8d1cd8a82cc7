/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Boot time error detection setup.

use {
    super::{
        dcr::{
            interface::{DcrBus, RegisterSpace},
            Register, RegisterSpaces,
        },
        regs::*,
        COMPATIBLE,
    },
    crate::{console::interface::Write, device_tree::interface::DeviceTree},
    tock_registers::interfaces::{ReadWriteable, Writeable},
};

/// Arm the chip error detection the fatal error handler reports on.
///
/// Returns false, without touching any register, when the device tree root is not an FSP-2.
/// Must run once, before interrupts are enabled.
pub fn arm_error_detection<T: DeviceTree, B: DcrBus>(
    tree: &T,
    spaces: &RegisterSpaces<B>,
    console: &dyn Write,
) -> bool {
    if !tree.root_is_compatible(COMPATIBLE) {
        return false;
    }

    let dcr = spaces.dcr();
    let cmu = spaces.cmu();
    let l2 = spaces.l2();

    // Clear BC_ERR and mask snoopable request PLB errors.
    Register::<_, PLB6_CR0::Register>::new(&dcr, DCRN_PLB6_CR0)
        .modify(PLB6_CR0::SNOOP_ERR_MASK::SET);
    dcr.write(DCRN_PLB6_HD, PLB6_PENDING_CLEAR);
    dcr.write(DCRN_PLB6_SHD, PLB6_PENDING_CLEAR);

    // The power-on TVS sleep setting gates the sensor reset. The sensor then returns erratic
    // values which latch spurious (parity) errors in FIR0 before the CMU interrupt is unmasked.
    Register::<_, TVS1::Register>::new(&cmu, CMUN_TVS1).modify(TVS1::UNDOZE::SET);
    Register::<_, FIR0::Register>::new(&cmu, CMUN_FIR0).modify(FIR0::TVS::SET + FIR0::TVSPAR::SET);

    for (reg, value) in L2_MCK_ENABLES {
        l2.write(reg, value);
    }
    l2.write(L2PLBINTEN1, L2_PLB_INT_ENABLE);

    // Everything the L2 subsystems report, except the external machine check input (UIC0.1).
    l2.write(L2MCKEN, L2_MCKEN_ARMED);
    l2.write(L2INTEN, L2_INTEN_ARMED);

    Register::<_, CONF_EIR::Register>::new(&dcr, DCRN_CONF_EIR_RS).write(CONF_EIR::PARITY::SET);

    crate::info!(console, "FSP-2: chip error detection armed");
    true
}
