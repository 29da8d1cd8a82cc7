/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Deferred device probing.
//!
//! Children of the on-chip buses are turned into devices once, late in boot, after the
//! interrupt tree is up.

use {
    core::sync::atomic::{AtomicBool, Ordering},
    snafu::Snafu,
};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

pub mod interface {
    /// Bus enumeration provided by the platform device layer.
    pub trait BusProber {
        /// Create devices for the children of every node compatible with one of `buses`.
        fn populate(&self, buses: &[&'static str]) -> Result<(), &'static str>;
    }
}

#[derive(Debug, Snafu)]
pub enum ProbeError {
    #[snafu(display("buses were already probed"))]
    AlreadyProbed,
    #[snafu(display("bus probe failed: {}", reason))]
    Populate { reason: &'static str },
}

/// One-shot probe of a fixed set of bus types.
pub struct BusProbe {
    buses: &'static [&'static str],
    done: AtomicBool,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl BusProbe {
    pub const fn new(buses: &'static [&'static str]) -> Self {
        Self {
            buses,
            done: AtomicBool::new(false),
        }
    }

    /// Bus compatible strings this probe covers.
    pub fn buses(&self) -> &'static [&'static str] {
        self.buses
    }

    /// Whether [`BusProbe::init`] already ran.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Populate the buses.
    ///
    /// Only the first call reaches `prober`, whatever its outcome. Later calls report
    /// [`ProbeError::AlreadyProbed`].
    pub fn init(&self, prober: &dyn interface::BusProber) -> Result<(), ProbeError> {
        if self.done.swap(true, Ordering::AcqRel) {
            return Err(ProbeError::AlreadyProbed);
        }

        prober
            .populate(self.buses)
            .map_err(|reason| ProbeError::Populate { reason })
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use {super::*, crate::tests::RecordingProber};

    static BUSES: [&str; 2] = ["ibm,plb4", "ibm,opb"];

    #[test]
    fn populates_once() {
        let probe = BusProbe::new(&BUSES);
        let prober = RecordingProber::new(Ok(()));

        assert!(probe.init(&prober).is_ok());
        assert!(matches!(probe.init(&prober), Err(ProbeError::AlreadyProbed)));

        assert!(probe.is_done());
        assert_eq!(prober.calls(), vec![vec!["ibm,plb4", "ibm,opb"]]);
    }

    #[test]
    fn failure_is_reported_and_not_retried() {
        let probe = BusProbe::new(&BUSES);
        let prober = RecordingProber::new(Err("no memory"));

        let err = probe.init(&prober).unwrap_err();
        assert_eq!(err.to_string(), "bus probe failed: no memory");
        assert!(matches!(probe.init(&prober), Err(ProbeError::AlreadyProbed)));
        assert_eq!(prober.calls().len(), 1);
    }
}
