/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! FSP-2 register map.
//!
//! DCR numbers are absolute. CMU and L2 register ids are indices into their indirect spaces
//! and only mean something through the matching address/data DCR pair.

use {static_assertions::const_assert_eq, tock_registers::register_bitfields};

//--------------------------------------------------------------------------------------------------
// Indirect space windows
//--------------------------------------------------------------------------------------------------

/// Chip management unit address/data pair.
pub const DCRN_CMU_ADDR: u32 = 0x00c;
pub const DCRN_CMU_DATA: u32 = 0x00d;

/// L2 cache controller address/data pair.
pub const DCRN_L2CDCRAI: u32 = 0x1111_1100;
pub const DCRN_L2CDCRDI: u32 = 0x1111_1104;

//--------------------------------------------------------------------------------------------------
// PLB4 arbiter
//--------------------------------------------------------------------------------------------------

pub const DCRN_PLB4_P0ESRL: u32 = 0x012;
pub const DCRN_PLB4_P0ESRH: u32 = 0x013;
pub const DCRN_PLB4_P0EARL: u32 = 0x014;
pub const DCRN_PLB4_P0EARH: u32 = 0x015;
pub const DCRN_PLB4_P1ESRL: u32 = 0x01a;
pub const DCRN_PLB4_P1ESRH: u32 = 0x01b;
pub const DCRN_PLB4_P1EARL: u32 = 0x01c;
pub const DCRN_PLB4_P1EARH: u32 = 0x01d;

//--------------------------------------------------------------------------------------------------
// PLB4-to-OPB bridges, four instances
//--------------------------------------------------------------------------------------------------

pub const DCRN_PLB4OPB0_BASE: u32 = 0x020;
pub const DCRN_PLB4OPB1_BASE: u32 = 0x030;
pub const DCRN_PLB4OPB2_BASE: u32 = 0x040;
pub const DCRN_PLB4OPB3_BASE: u32 = 0x050;

/// Offsets from a bridge base.
pub const PLB4OPB_GESR0: u32 = 0x0;
pub const PLB4OPB_GEAR: u32 = 0x2;
pub const PLB4OPB_GEARU: u32 = 0x3;
pub const PLB4OPB_GESR1: u32 = 0x4;
pub const PLB4OPB_GESR2: u32 = 0xc;

//--------------------------------------------------------------------------------------------------
// PLB4/AHB bridges
//--------------------------------------------------------------------------------------------------

pub const DCRN_PLB4AHB_BASE: u32 = 0x400;
pub const DCRN_PLB4AHB_SEUAR: u32 = DCRN_PLB4AHB_BASE + 1;
pub const DCRN_PLB4AHB_SELAR: u32 = DCRN_PLB4AHB_BASE + 2;
pub const DCRN_PLB4AHB_ESR: u32 = DCRN_PLB4AHB_BASE + 3;
pub const DCRN_AHBPLB4_ESR: u32 = DCRN_PLB4AHB_BASE + 8;
pub const DCRN_AHBPLB4_EAR: u32 = DCRN_PLB4AHB_BASE + 9;

//--------------------------------------------------------------------------------------------------
// PLB6 bus controller and its bridges
//--------------------------------------------------------------------------------------------------

pub const DCRN_PLB6_BASE: u32 = 0x1111_1300;
pub const DCRN_PLB6_CR0: u32 = DCRN_PLB6_BASE;
pub const DCRN_PLB6_ERR: u32 = DCRN_PLB6_BASE + 0x0b;
pub const DCRN_PLB6_HD: u32 = DCRN_PLB6_BASE + 0x0e;
pub const DCRN_PLB6_SHD: u32 = DCRN_PLB6_BASE + 0x10;

pub const DCRN_PLB4PLB6_BASE: u32 = 0x1111_1320;
pub const DCRN_PLB4PLB6_ESR: u32 = DCRN_PLB4PLB6_BASE + 1;
pub const DCRN_PLB4PLB6_EARH: u32 = DCRN_PLB4PLB6_BASE + 3;
pub const DCRN_PLB4PLB6_EARL: u32 = DCRN_PLB4PLB6_BASE + 4;

pub const DCRN_PLB6PLB4_BASE: u32 = 0x1111_1350;
pub const DCRN_PLB6PLB4_ESR: u32 = DCRN_PLB6PLB4_BASE + 1;
pub const DCRN_PLB6PLB4_EARH: u32 = DCRN_PLB6PLB4_BASE + 3;
pub const DCRN_PLB6PLB4_EARL: u32 = DCRN_PLB6PLB4_BASE + 4;

pub const DCRN_PLB6MCIF_BASE: u32 = 0x1111_1380;
pub const DCRN_PLB6MCIF_BESR0: u32 = DCRN_PLB6MCIF_BASE;
pub const DCRN_PLB6MCIF_BESR1: u32 = DCRN_PLB6MCIF_BASE + 1;
pub const DCRN_PLB6MCIF_BEARL: u32 = DCRN_PLB6MCIF_BASE + 2;
pub const DCRN_PLB6MCIF_BEARH: u32 = DCRN_PLB6MCIF_BASE + 3;

//--------------------------------------------------------------------------------------------------
// Configuration logic
//--------------------------------------------------------------------------------------------------

pub const DCRN_CONF_BASE: u32 = 0x8000;
pub const DCRN_CONF_FIR_RWC: u32 = DCRN_CONF_BASE + 0x3a;
pub const DCRN_CONF_EIR_RS: u32 = DCRN_CONF_BASE + 0x3e;
pub const DCRN_CONF_RPERR0: u32 = DCRN_CONF_BASE + 0x4d;
pub const DCRN_CONF_RPERR1: u32 = DCRN_CONF_BASE + 0x4e;

//--------------------------------------------------------------------------------------------------
// DDR3/4 memory controller and its wrapper
//--------------------------------------------------------------------------------------------------

pub const DCRN_DDR34_BASE: u32 = 0x1112_0000;
pub const DCRN_DDR34_MCSTAT: u32 = 0x10;
pub const DCRN_DDR34_MCOPT1: u32 = 0x20;
pub const DCRN_DDR34_MCOPT2: u32 = 0x21;
pub const DCRN_DDR34_PHYSTAT: u32 = 0x32;
pub const DCRN_DDR34_CFGR0: u32 = 0x40;
pub const DCRN_DDR34_CFGR1: u32 = 0x41;
pub const DCRN_DDR34_CFGR2: u32 = 0x42;
pub const DCRN_DDR34_CFGR3: u32 = 0x43;
pub const DCRN_DDR34_SCRUB_CNTL: u32 = 0xaa;
pub const DCRN_DDR34_ECCERR_ADDR_PORT0: u32 = 0xe0;
pub const DCRN_DDR34_ECCERR_COUNT_PORT0: u32 = 0xe4;
pub const DCRN_DDR34_ECC_CHECK_PORT0: u32 = 0xe8;
pub const DCRN_DDR34_ECCERR_PORT0: u32 = 0xf0;

pub const DCRN_CW_BASE: u32 = 0x1111_1800;
pub const DCRN_CW_MCER0: u32 = 0x00;
pub const DCRN_CW_MCER1: u32 = 0x01;

//--------------------------------------------------------------------------------------------------
// CMU indirect registers
//--------------------------------------------------------------------------------------------------

/// Chip reset control/status.
pub const CMUN_CRCS: u32 = 0x00;
/// Fault isolation register 0.
pub const CMUN_FIR0: u32 = 0x3b;
/// Thermal/voltage sensor control 1.
pub const CMUN_TVS1: u32 = 0x62;

//--------------------------------------------------------------------------------------------------
// L2 indirect registers
//--------------------------------------------------------------------------------------------------

pub const L2MCK: u32 = 0x120;
pub const L2MCKEN: u32 = 0x130;
pub const L2INT: u32 = 0x150;
pub const L2INTEN: u32 = 0x160;
pub const L2LOG0: u32 = 0x180;
pub const L2LOG1: u32 = 0x184;
pub const L2LOG2: u32 = 0x188;
pub const L2LOG3: u32 = 0x18c;
pub const L2LOG4: u32 = 0x190;
pub const L2LOG5: u32 = 0x194;
pub const L2PLBSTAT0: u32 = 0x300;
pub const L2PLBSTAT1: u32 = 0x304;
pub const L2PLBMCKEN0: u32 = 0x330;
pub const L2PLBMCKEN1: u32 = 0x334;
pub const L2PLBINTEN1: u32 = 0x364;
pub const L2ARRSTAT0: u32 = 0x500;
pub const L2ARRSTAT1: u32 = 0x504;
pub const L2ARRSTAT2: u32 = 0x508;
pub const L2ARRMCKEN0: u32 = 0x530;
pub const L2ARRMCKEN1: u32 = 0x534;
pub const L2ARRMCKEN2: u32 = 0x538;
pub const L2CPUSTAT: u32 = 0x700;
pub const L2CPUMCKEN: u32 = 0x730;
pub const L2RACSTAT0: u32 = 0x900;
pub const L2RACMCKEN0: u32 = 0x930;
pub const L2WACSTAT0: u32 = 0xd00;
pub const L2WACSTAT1: u32 = 0xd04;
pub const L2WACSTAT2: u32 = 0xd08;
pub const L2WACMCKEN0: u32 = 0xd30;
pub const L2WACMCKEN1: u32 = 0xd34;
pub const L2WACMCKEN2: u32 = 0xd38;
pub const L2WDFSTAT: u32 = 0xf00;
pub const L2WDFMCKEN: u32 = 0xf30;

//--------------------------------------------------------------------------------------------------
// Arming patterns
//--------------------------------------------------------------------------------------------------

/// Clears every pending-error bit of the PLB6 HD/SHD status registers.
pub const PLB6_PENDING_CLEAR: u32 = 0xffff_0000;

/// First-level L2 machine check enables, in write order.
pub const L2_MCK_ENABLES: [(u32, u32); 11] = [
    (L2PLBMCKEN0, 0xffff_ffff),
    (L2PLBMCKEN1, 0x0000_ffff),
    (L2ARRMCKEN0, 0xffff_ffff),
    (L2ARRMCKEN1, 0xffff_ffff),
    (L2ARRMCKEN2, 0xffff_f000),
    (L2CPUMCKEN, 0xffff_ffff),
    (L2RACMCKEN0, 0xffff_ffff),
    (L2WACMCKEN0, 0xffff_ffff),
    (L2WACMCKEN1, 0xffff_ffff),
    (L2WACMCKEN2, 0xffff_ffff),
    (L2WDFMCKEN, 0xffff_ffff),
];

/// First-level L2 interrupt enable: PLB slave errors.
pub const L2_PLB_INT_ENABLE: u32 = 0xffff_0000;

/// Global L2 machine check enable: every subsystem.
pub const L2_MCKEN_ARMED: u32 = 0x0000_07ff;
/// Global L2 interrupt enable: every subsystem but the external machine check input (UIC0.1).
pub const L2_INTEN_ARMED: u32 = 0x0000_04ff;

// Interrupts are only ever raised for sources that also raise machine checks.
const_assert_eq!(L2_INTEN_ARMED & !L2_MCKEN_ARMED, 0);

//--------------------------------------------------------------------------------------------------
// Bit fields
//--------------------------------------------------------------------------------------------------

register_bitfields! {
    u32,

    /// PLB6 bus controller configuration 0.
    pub PLB6_CR0 [
        /// Mask bus errors raised for snoopable requests.
        SNOOP_ERR_MASK OFFSET(29) NUMBITS(1) []
    ],

    /// CMU thermal/voltage sensor control.
    pub TVS1 [
        /// Release the sensor from its power-on sleep configuration.
        UNDOZE OFFSET(2) NUMBITS(1) []
    ],

    /// CMU fault isolation register 0. Writing 1 clears a bit.
    pub FIR0 [
        TVS OFFSET(29) NUMBITS(1) [],
        TVSPAR OFFSET(28) NUMBITS(1) []
    ],

    /// CMU chip reset control/status.
    pub CRCS [
        STAT OFFSET(28) NUMBITS(4) [
            PowerOn = 0x1,
            PinHardReset = 0x2,
            PCIe = 0x3,
            CrcsSystem = 0x4,
            DbcrSystem = 0x5,
            HostSystem = 0x6,
            ChipResetB = 0x7,
            CrcsChip = 0x8,
            DbcrChip = 0x9,
            HostChip = 0xa,
            PfcChip = 0xb,
            CrcsCore = 0xc,
            DbcrCore = 0xd,
            HostCore = 0xe,
            PfcSys = 0xf
        ]
    ],

    /// Configuration logic error injection/enable register, set side.
    pub CONF_EIR [
        /// Register parity error detection.
        PARITY OFFSET(31) NUMBITS(1) []
    ]
}

/// Status value of a reset requested by the chassis through the CHIP_RST_B pin.
pub const CRCS_STAT_CHIP_RST_B: u32 = 0x7000_0000;
