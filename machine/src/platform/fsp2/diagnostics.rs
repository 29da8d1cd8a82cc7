/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Fault report register tables.
//!
//! Each error domain lists the registers to read, grouped by sub-controller. Reports are
//! printed in table order, one `NAME: 0x%08x` line per register, labels padded to a common
//! column inside a section.

use {
    super::{
        dcr::{
            interface::{DcrBus, RegisterSpace},
            RegisterSpaces,
        },
        regs::*,
    },
    crate::console::interface::Write,
};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Which space a register lives in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Space {
    Dcr,
    Cmu,
    L2,
}

/// One register line of a report.
#[derive(Debug)]
pub struct Entry {
    pub label: &'static str,
    pub space: Space,
    pub reg: u32,
}

/// Registers of one sub-controller.
#[derive(Debug)]
pub struct Section {
    /// Printed above the registers, after a blank line unless it opens the report.
    pub header: Option<&'static str>,
    pub entries: &'static [Entry],
}

/// A register value captured for a report.
#[derive(Copy, Clone, Debug)]
pub struct Reading {
    pub section: &'static Section,
    pub entry: &'static Entry,
    pub value: u32,
    /// Position of `section` in the report.
    pub section_index: usize,
    /// First register of its section.
    pub opens_section: bool,
}

/// How labels are aligned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Column {
    /// Each section pads to its own widest label.
    PerSection,
    /// One column across the whole report.
    Shared,
}

/// Reads a report's registers lazily, in table order.
pub struct Snapshot<'a, B> {
    spaces: &'a RegisterSpaces<B>,
    sections: &'static [Section],
    section: usize,
    entry: usize,
}

//--------------------------------------------------------------------------------------------------
// Register tables
//--------------------------------------------------------------------------------------------------

impl Entry {
    const fn dcr(label: &'static str, reg: u32) -> Self {
        Self {
            label,
            space: Space::Dcr,
            reg,
        }
    }

    const fn cmu(label: &'static str, reg: u32) -> Self {
        Self {
            label,
            space: Space::Cmu,
            reg,
        }
    }

    const fn l2(label: &'static str, reg: u32) -> Self {
        Self {
            label,
            space: Space::L2,
            reg,
        }
    }
}

const fn plb4opb(base: u32) -> [Entry; 5] {
    [
        Entry::dcr("GESR0", base + PLB4OPB_GESR0),
        Entry::dcr("GESR1", base + PLB4OPB_GESR1),
        Entry::dcr("GESR2", base + PLB4OPB_GESR2),
        Entry::dcr("GEARU", base + PLB4OPB_GEARU),
        Entry::dcr("GEAR", base + PLB4OPB_GEAR),
    ]
}

static L2_CONTROLLER: [Entry; 19] = [
    Entry::l2("MCK", L2MCK),
    Entry::l2("INT", L2INT),
    Entry::l2("PLBSTAT0", L2PLBSTAT0),
    Entry::l2("PLBSTAT1", L2PLBSTAT1),
    Entry::l2("ARRSTAT0", L2ARRSTAT0),
    Entry::l2("ARRSTAT1", L2ARRSTAT1),
    Entry::l2("ARRSTAT2", L2ARRSTAT2),
    Entry::l2("CPUSTAT", L2CPUSTAT),
    Entry::l2("RACSTAT0", L2RACSTAT0),
    Entry::l2("WACSTAT0", L2WACSTAT0),
    Entry::l2("WACSTAT1", L2WACSTAT1),
    Entry::l2("WACSTAT2", L2WACSTAT2),
    Entry::l2("WDFSTAT", L2WDFSTAT),
    Entry::l2("LOG0", L2LOG0),
    Entry::l2("LOG1", L2LOG1),
    Entry::l2("LOG2", L2LOG2),
    Entry::l2("LOG3", L2LOG3),
    Entry::l2("LOG4", L2LOG4),
    Entry::l2("LOG5", L2LOG5),
];

static PLB6_CONTROLLER: [Entry; 2] = [
    Entry::dcr("BC_SHD", DCRN_PLB6_SHD),
    Entry::dcr("BC_ERR", DCRN_PLB6_ERR),
];

static PLB6_TO_PLB4: [Entry; 3] = [
    Entry::dcr("ESR", DCRN_PLB6PLB4_ESR),
    Entry::dcr("EARH", DCRN_PLB6PLB4_EARH),
    Entry::dcr("EARL", DCRN_PLB6PLB4_EARL),
];

static PLB4_TO_PLB6: [Entry; 3] = [
    Entry::dcr("ESR", DCRN_PLB4PLB6_ESR),
    Entry::dcr("EARH", DCRN_PLB4PLB6_EARH),
    Entry::dcr("EARL", DCRN_PLB4PLB6_EARL),
];

static PLB6_TO_MCIF: [Entry; 4] = [
    Entry::dcr("BESR0", DCRN_PLB6MCIF_BESR0),
    Entry::dcr("BESR1", DCRN_PLB6MCIF_BESR1),
    Entry::dcr("BEARH", DCRN_PLB6MCIF_BEARH),
    Entry::dcr("BEARL", DCRN_PLB6MCIF_BEARL),
];

static PLB4_ARBITER: [Entry; 8] = [
    Entry::dcr("P0ESRH", DCRN_PLB4_P0ESRH),
    Entry::dcr("P0ESRL", DCRN_PLB4_P0ESRL),
    Entry::dcr("P0EARH", DCRN_PLB4_P0EARH),
    Entry::dcr("P0EARL", DCRN_PLB4_P0EARL),
    Entry::dcr("P1ESRH", DCRN_PLB4_P1ESRH),
    Entry::dcr("P1ESRL", DCRN_PLB4_P1ESRL),
    Entry::dcr("P1EARH", DCRN_PLB4_P1EARH),
    Entry::dcr("P1EARL", DCRN_PLB4_P1EARL),
];

static PLB4OPB0: [Entry; 5] = plb4opb(DCRN_PLB4OPB0_BASE);
static PLB4OPB1: [Entry; 5] = plb4opb(DCRN_PLB4OPB1_BASE);
static PLB4OPB2: [Entry; 5] = plb4opb(DCRN_PLB4OPB2_BASE);
static PLB4OPB3: [Entry; 5] = plb4opb(DCRN_PLB4OPB3_BASE);

static PLB4_TO_AHB: [Entry; 3] = [
    Entry::dcr("ESR", DCRN_PLB4AHB_ESR),
    Entry::dcr("SEUAR", DCRN_PLB4AHB_SEUAR),
    Entry::dcr("SELAR", DCRN_PLB4AHB_SELAR),
];

static AHB_TO_PLB4: [Entry; 2] = [
    Entry::dcr("ESR", DCRN_AHBPLB4_ESR),
    Entry::dcr("EAR", DCRN_AHBPLB4_EAR),
];

/// Bus error: every bus controller and bridge on the path between the core and memory.
pub static BUS_ERROR: [Section; 12] = [
    Section {
        header: Some("L2 Controller:"),
        entries: &L2_CONTROLLER,
    },
    Section {
        header: Some("PLB6 Controller:"),
        entries: &PLB6_CONTROLLER,
    },
    Section {
        header: Some("PLB6-to-PLB4 Bridge:"),
        entries: &PLB6_TO_PLB4,
    },
    Section {
        header: Some("PLB4-to-PLB6 Bridge:"),
        entries: &PLB4_TO_PLB6,
    },
    Section {
        header: Some("PLB6-to-MCIF Bridge:"),
        entries: &PLB6_TO_MCIF,
    },
    Section {
        header: Some("PLB4 Arbiter:"),
        entries: &PLB4_ARBITER,
    },
    Section {
        header: Some("PLBOPB Bridge 0:"),
        entries: &PLB4OPB0,
    },
    Section {
        header: Some("PLBOPB Bridge 1:"),
        entries: &PLB4OPB1,
    },
    Section {
        header: Some("PLBOPB Bridge 2:"),
        entries: &PLB4OPB2,
    },
    Section {
        header: Some("PLBOPB Bridge 3:"),
        entries: &PLB4OPB3,
    },
    Section {
        header: Some("PLB4-to-AHB Bridge:"),
        entries: &PLB4_TO_AHB,
    },
    Section {
        header: Some("AHB-to-PLB4 Bridge:"),
        entries: &AHB_TO_PLB4,
    },
];

static CMU_FIR: [Entry; 1] = [Entry::cmu("FIR0", CMUN_FIR0)];

pub static CMU_ERROR: [Section; 1] = [Section {
    header: None,
    entries: &CMU_FIR,
}];

static CONF_FIR: [Entry; 3] = [
    Entry::dcr("CONF_FIR", DCRN_CONF_FIR_RWC),
    Entry::dcr("RPERR0", DCRN_CONF_RPERR0),
    Entry::dcr("RPERR1", DCRN_CONF_RPERR1),
];

pub static CONF_ERROR: [Section; 1] = [Section {
    header: None,
    entries: &CONF_FIR,
}];

static DDR34_CONTROLLER: [Entry; 13] = [
    Entry::dcr("MCSTAT", DCRN_DDR34_BASE + DCRN_DDR34_MCSTAT),
    Entry::dcr("MCOPT1", DCRN_DDR34_BASE + DCRN_DDR34_MCOPT1),
    Entry::dcr("MCOPT2", DCRN_DDR34_BASE + DCRN_DDR34_MCOPT2),
    Entry::dcr("PHYSTAT", DCRN_DDR34_BASE + DCRN_DDR34_PHYSTAT),
    Entry::dcr("CFGR0", DCRN_DDR34_BASE + DCRN_DDR34_CFGR0),
    Entry::dcr("CFGR1", DCRN_DDR34_BASE + DCRN_DDR34_CFGR1),
    Entry::dcr("CFGR2", DCRN_DDR34_BASE + DCRN_DDR34_CFGR2),
    Entry::dcr("CFGR3", DCRN_DDR34_BASE + DCRN_DDR34_CFGR3),
    Entry::dcr("SCRUB_CNTL", DCRN_DDR34_BASE + DCRN_DDR34_SCRUB_CNTL),
    Entry::dcr("ECCERR_PORT0", DCRN_DDR34_BASE + DCRN_DDR34_ECCERR_PORT0),
    Entry::dcr(
        "ECCERR_ADDR_PORT0",
        DCRN_DDR34_BASE + DCRN_DDR34_ECCERR_ADDR_PORT0,
    ),
    Entry::dcr(
        "ECCERR_CNT_PORT0",
        DCRN_DDR34_BASE + DCRN_DDR34_ECCERR_COUNT_PORT0,
    ),
    Entry::dcr(
        "ECC_CHECK_PORT0",
        DCRN_DDR34_BASE + DCRN_DDR34_ECC_CHECK_PORT0,
    ),
];

static MC_WRAPPER: [Entry; 2] = [
    Entry::dcr("MCER0", DCRN_CW_BASE + DCRN_CW_MCER0),
    Entry::dcr("MCER1", DCRN_CW_BASE + DCRN_CW_MCER1),
];

static MCIF_SUMMARY: [Entry; 3] = [
    Entry::dcr("BESR", DCRN_PLB6MCIF_BESR0),
    Entry::dcr("BEARL", DCRN_PLB6MCIF_BEARL),
    Entry::dcr("BEARH", DCRN_PLB6MCIF_BEARH),
];

/// Uncorrectable memory error: controller, wrapper and the bus interface in front of them.
pub static MC_UE: [Section; 3] = [
    Section {
        header: Some("DDR3/4 Controller:"),
        entries: &DDR34_CONTROLLER,
    },
    Section {
        header: Some("Memory Controller Wrapper:"),
        entries: &MC_WRAPPER,
    },
    Section {
        header: Some("PLB6-to-MCIF Bridge:"),
        entries: &MCIF_SUMMARY,
    },
];

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl Section {
    /// Label column width.
    pub fn label_width(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.label.len())
            .max()
            .unwrap_or(0)
    }
}

impl<'a, B: DcrBus> Snapshot<'a, B> {
    pub fn new(spaces: &'a RegisterSpaces<B>, sections: &'static [Section]) -> Self {
        Self {
            spaces,
            sections,
            section: 0,
            entry: 0,
        }
    }
}

impl<'a, B: DcrBus> Iterator for Snapshot<'a, B> {
    type Item = Reading;

    fn next(&mut self) -> Option<Reading> {
        loop {
            let section = self.sections.get(self.section)?;
            let Some(entry) = section.entries.get(self.entry) else {
                self.section += 1;
                self.entry = 0;
                continue;
            };

            let value = match entry.space {
                Space::Dcr => self.spaces.dcr().read(entry.reg),
                Space::Cmu => self.spaces.cmu().read(entry.reg),
                Space::L2 => self.spaces.l2().read(entry.reg),
            };
            let reading = Reading {
                section,
                entry,
                value,
                section_index: self.section,
                opens_section: self.entry == 0,
            };
            self.entry += 1;
            return Some(reading);
        }
    }
}

/// Print a fault report: the title line, then every register of `sections`.
pub fn report<B: DcrBus>(
    console: &dyn Write,
    spaces: &RegisterSpaces<B>,
    title: &str,
    sections: &'static [Section],
    column: Column,
) {
    let shared_width = sections.iter().map(Section::label_width).max().unwrap_or(0);

    crate::println!(console, "{}", title);

    for reading in Snapshot::new(spaces, sections) {
        if reading.opens_section {
            if let Some(header) = reading.section.header {
                let gap = if reading.section_index > 0 { "\n" } else { "" };
                crate::println!(console, "{}{}", gap, header);
            }
        }
        let width = match column {
            Column::PerSection => reading.section.label_width(),
            Column::Shared => shared_width,
        };
        crate::println!(
            console,
            "{}:{:pad$}0x{:08x}",
            reading.entry.label,
            "",
            reading.value,
            pad = width - reading.entry.label.len() + 1
        );
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::tests::{MockBus, RecordingConsole},
    };

    #[test]
    fn labels_line_up_within_a_section() {
        let spaces = RegisterSpaces::new(MockBus::new());
        spaces.bus().preset(DCRN_CONF_FIR_RWC, 0x8000_0001);
        let console = RecordingConsole::new();

        report(
            &console,
            &spaces,
            "Configuration Logic Error",
            &CONF_ERROR,
            Column::PerSection,
        );

        assert_eq!(
            console.lines(),
            vec![
                "Configuration Logic Error",
                "CONF_FIR: 0x80000001",
                "RPERR0:   0x00000000",
                "RPERR1:   0x00000000",
            ]
        );
    }

    #[test]
    fn later_headers_are_separated_by_a_blank_line() {
        let spaces = RegisterSpaces::new(MockBus::new());
        let console = RecordingConsole::new();

        report(
            &console,
            &spaces,
            "DDR: Uncorrectable Error",
            &MC_UE,
            Column::Shared,
        );

        let lines = console.lines();
        assert_eq!(lines[0], "DDR: Uncorrectable Error");
        assert_eq!(lines[1], "DDR3/4 Controller:");
        assert_eq!(lines[2], "MCSTAT:            0x00000000");
        let wrapper = lines
            .iter()
            .position(|l| l == "Memory Controller Wrapper:")
            .unwrap();
        assert_eq!(lines[wrapper - 1], "");
        assert_eq!(lines[wrapper + 1], "MCER0:             0x00000000");
    }

    #[test]
    fn per_section_column_restarts_at_each_header() {
        let spaces = RegisterSpaces::new(MockBus::new());
        let console = RecordingConsole::new();

        report(&console, &spaces, "DDR: Uncorrectable Error", &MC_UE, Column::PerSection);

        let lines = console.lines();
        assert!(lines.contains(&"MCER0: 0x00000000".to_string()));
        assert!(lines.contains(&"BESR:  0x00000000".to_string()));
    }

    #[test]
    fn snapshot_reads_each_space_once_in_table_order() {
        let spaces = RegisterSpaces::new(MockBus::new());
        spaces.bus().preset_l2(L2MCK, 0x11);
        spaces.bus().preset_l2(L2LOG5, 0x55);

        let readings: Vec<_> = Snapshot::new(&spaces, &BUS_ERROR).collect();

        assert_eq!(readings[0].entry.label, "MCK");
        assert_eq!(readings[0].value, 0x11);
        assert!(readings[0].opens_section);
        assert_eq!(readings[18].entry.label, "LOG5");
        assert_eq!(readings[18].value, 0x55);
        assert_eq!(readings[19].entry.label, "BC_SHD");
        assert_eq!(readings[19].section_index, 1);
        assert_eq!(readings.len(), 19 + 2 + 3 + 3 + 4 + 8 + 4 * 5 + 3 + 2);
    }

    #[test]
    fn arbiter_reports_both_address_halves() {
        let labels: Vec<_> = PLB4_ARBITER.iter().map(|e| e.label).collect();

        assert_eq!(
            labels,
            ["P0ESRH", "P0ESRL", "P0EARH", "P0EARL", "P1ESRH", "P1ESRL", "P1EARH", "P1EARL"]
        );
    }
}
