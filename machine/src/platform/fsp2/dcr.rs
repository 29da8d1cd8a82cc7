/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Device control register access.
//!
//! Three spaces hang off the DCR bus: the bus itself, addressed by DCR number, and the CMU
//! and L2 controller spaces, each reached through an address/data DCR pair.

use {
    super::regs,
    crate::sync::{interface::Mutex, IRQSafeSpinLock},
    core::marker::PhantomData,
    tock_registers::{
        interfaces::{Readable, Writeable},
        RegisterLongName,
    },
};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Register access interfaces.
pub mod interface {
    /// Raw DCR bus.
    pub trait DcrBus {
        /// Move from DCR.
        fn mfdcr(&self, dcrn: u32) -> u32;

        /// Move to DCR.
        fn mtdcr(&self, dcrn: u32, value: u32);
    }

    /// A flat space of 32-bit registers.
    ///
    /// Register ids are not range checked. An id that does not exist in the space is a
    /// hardware-defined access, not a software error.
    pub trait RegisterSpace {
        fn read(&self, reg: u32) -> u32;
        fn write(&self, reg: u32, value: u32);
    }
}

/// DCR numbers used as register ids.
pub struct DirectSpace<'s, B> {
    bus: &'s B,
}

/// A space reached through an address/data DCR pair.
///
/// Each access selects the register through `addr` and then transfers through `data`.
/// The pair runs under the space lock, so two accesses never interleave.
pub struct IndirectSpace<'s, B> {
    bus: &'s B,
    lock: &'s IRQSafeSpinLock<()>,
    addr: u32,
    data: u32,
}

/// Owner of the DCR bus handle and of the indirect space locks.
pub struct RegisterSpaces<B> {
    bus: B,
    cmu_lock: IRQSafeSpinLock<()>,
    l2_lock: IRQSafeSpinLock<()>,
}

/// A single register of a space, usable with tock-registers bitfield operations.
pub struct Register<'s, S, R: RegisterLongName = ()> {
    space: &'s S,
    reg: u32,
    associated_register: PhantomData<R>,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl<B: interface::DcrBus> RegisterSpaces<B> {
    pub const fn new(bus: B) -> Self {
        Self {
            bus,
            cmu_lock: IRQSafeSpinLock::new(()),
            l2_lock: IRQSafeSpinLock::new(()),
        }
    }

    /// The raw bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Plain DCR space.
    pub fn dcr(&self) -> DirectSpace<'_, B> {
        DirectSpace { bus: &self.bus }
    }

    /// Chip management unit space.
    pub fn cmu(&self) -> IndirectSpace<'_, B> {
        IndirectSpace {
            bus: &self.bus,
            lock: &self.cmu_lock,
            addr: regs::DCRN_CMU_ADDR,
            data: regs::DCRN_CMU_DATA,
        }
    }

    /// L2 cache controller space.
    pub fn l2(&self) -> IndirectSpace<'_, B> {
        IndirectSpace {
            bus: &self.bus,
            lock: &self.l2_lock,
            addr: regs::DCRN_L2CDCRAI,
            data: regs::DCRN_L2CDCRDI,
        }
    }
}

impl<'s, B: interface::DcrBus> interface::RegisterSpace for DirectSpace<'s, B> {
    fn read(&self, reg: u32) -> u32 {
        self.bus.mfdcr(reg)
    }

    fn write(&self, reg: u32, value: u32) {
        self.bus.mtdcr(reg, value)
    }
}

impl<'s, B: interface::DcrBus> interface::RegisterSpace for IndirectSpace<'s, B> {
    fn read(&self, reg: u32) -> u32 {
        self.lock.lock(|_| {
            self.bus.mtdcr(self.addr, reg);
            self.bus.mfdcr(self.data)
        })
    }

    fn write(&self, reg: u32, value: u32) {
        self.lock.lock(|_| {
            self.bus.mtdcr(self.addr, reg);
            self.bus.mtdcr(self.data, value);
        })
    }
}

impl<'s, S: interface::RegisterSpace, R: RegisterLongName> Register<'s, S, R> {
    pub const fn new(space: &'s S, reg: u32) -> Self {
        Self {
            space,
            reg,
            associated_register: PhantomData,
        }
    }
}

impl<'s, S: interface::RegisterSpace, R: RegisterLongName> Readable for Register<'s, S, R> {
    type T = u32;
    type R = R;

    #[inline]
    fn get(&self) -> Self::T {
        self.space.read(self.reg)
    }
}

impl<'s, S: interface::RegisterSpace, R: RegisterLongName> Writeable for Register<'s, S, R> {
    type T = u32;
    type R = R;

    #[inline]
    fn set(&self, value: Self::T) {
        self.space.write(self.reg, value)
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
