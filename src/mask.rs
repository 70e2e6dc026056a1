/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! CPU affinity masks backed by the native `cpu_set_t`
//!
//! This module only exists on operating systems that define `cpu_set_t`.
//! The masks are plain values owned by the caller: nothing here allocates them,
//! keeps a reference to them, or applies them to a thread.

use core::fmt::{Debug, Formatter};

pub use libc::cpu_set_t;
use libc::{CPU_ISSET, CPU_SET, CPU_SETSIZE, CPU_ZERO};

use crate::affinity::CpuId;
use crate::errors::AffinityError;

/// The number of CPUs a `cpu_set_t` can hold
#[allow(clippy::cast_sign_loss)]
pub const CPU_MASK_CAPACITY: usize = CPU_SETSIZE as usize;

/// Resets every bit of the mask, so that no CPU is selected
pub fn cpu_zero(set: &mut cpu_set_t) {
    unsafe { CPU_ZERO(set) };
}

/// Selects the CPU `cpu` in the mask, leaving other bits unchanged
///
/// # Safety
///
/// `cpu` must be lower than [`CPU_MASK_CAPACITY`].
/// Nothing is checked here, see [`AffinityMask::set`] for the checked version.
pub unsafe fn cpu_set(cpu: usize, set: &mut cpu_set_t) {
    unsafe { CPU_SET(cpu, set) };
}

/// Operations on a native CPU affinity mask
pub trait AffinityMask {
    /// Resets every bit of the mask
    fn clear(&mut self);

    /// Selects a CPU without checking the index
    ///
    /// # Safety
    ///
    /// `cpu` must be lower than [`CPU_MASK_CAPACITY`].
    unsafe fn set_unchecked(&mut self, cpu: usize);

    /// Selects a CPU
    ///
    /// # Errors
    ///
    /// Returns `AffinityError::OutOfRange` when `cpu` does not fit in the mask.
    /// The mask is not modified in this case.
    fn set(&mut self, cpu: usize) -> Result<(), AffinityError> {
        if cpu >= CPU_MASK_CAPACITY {
            return Err(AffinityError::OutOfRange {
                cpu,
                capacity: CPU_MASK_CAPACITY,
            });
        }
        unsafe { self.set_unchecked(cpu) };
        Ok(())
    }

    /// Tests whether a CPU is selected, out of range indices are never selected
    #[must_use]
    fn is_set(&self, cpu: usize) -> bool;

    /// Gets the number of selected CPUs
    #[must_use]
    fn count(&self) -> usize {
        (0..CPU_MASK_CAPACITY).filter(|&cpu| self.is_set(cpu)).count()
    }
}

impl AffinityMask for cpu_set_t {
    #[inline]
    fn clear(&mut self) {
        cpu_zero(self);
    }

    #[inline]
    unsafe fn set_unchecked(&mut self, cpu: usize) {
        unsafe { cpu_set(cpu, self) };
    }

    #[inline]
    fn is_set(&self, cpu: usize) -> bool {
        cpu < CPU_MASK_CAPACITY && unsafe { CPU_ISSET(cpu, self) }
    }
}

/// An owned CPU affinity mask
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct CpuMask {
    raw: cpu_set_t,
}

impl CpuMask {
    /// Creates an empty mask
    #[must_use]
    pub fn new() -> Self {
        let mut set = unsafe { core::mem::zeroed::<cpu_set_t>() };
        cpu_zero(&mut set);
        Self { raw: set }
    }

    /// Creates a mask with the given CPUs selected
    ///
    /// # Errors
    ///
    /// Returns `AffinityError::OutOfRange` for the first CPU that does not fit in the mask.
    pub fn from_cpus<I>(cpus: I) -> Result<Self, AffinityError>
    where
        I: IntoIterator<Item = CpuId>,
    {
        let mut mask = Self::new();
        for cpu in cpus {
            mask.set(cpu.index())?;
        }
        Ok(mask)
    }

    /// Wraps a native mask
    #[must_use]
    pub fn from_raw(set: cpu_set_t) -> Self {
        Self { raw: set }
    }

    /// Gets the native mask
    #[must_use]
    pub fn into_raw(self) -> cpu_set_t {
        self.raw
    }

    /// Gets a reference to the native mask, to pass to the OS
    #[must_use]
    pub fn as_raw(&self) -> &cpu_set_t {
        &self.raw
    }

    /// Gets a mutable reference to the native mask, to be filled by the OS
    #[must_use]
    pub fn as_raw_mut(&mut self) -> &mut cpu_set_t {
        &mut self.raw
    }

    /// Gets the number of CPUs this mask can hold
    #[must_use]
    pub const fn capacity(&self) -> usize {
        CPU_MASK_CAPACITY
    }

    /// Resets every bit of the mask
    #[inline]
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Selects a CPU
    ///
    /// # Errors
    ///
    /// Returns `AffinityError::OutOfRange` when `cpu` does not fit in the mask.
    #[inline]
    pub fn set(&mut self, cpu: usize) -> Result<(), AffinityError> {
        AffinityMask::set(&mut self.raw, cpu)
    }

    /// Selects a CPU without checking the index
    ///
    /// # Safety
    ///
    /// `cpu` must be lower than [`CPU_MASK_CAPACITY`].
    #[inline]
    pub unsafe fn set_unchecked(&mut self, cpu: usize) {
        unsafe { self.raw.set_unchecked(cpu) };
    }

    /// Tests whether a CPU is selected
    #[must_use]
    #[inline]
    pub fn is_set(&self, cpu: usize) -> bool {
        self.raw.is_set(cpu)
    }

    /// Gets the number of selected CPUs
    #[must_use]
    pub fn count(&self) -> usize {
        self.raw.count()
    }

    /// Gets whether no CPU is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(0..CPU_MASK_CAPACITY).any(|cpu| self.is_set(cpu))
    }

    /// Iterates over the selected CPUs, in ascending order
    pub fn iter(&self) -> impl Iterator<Item = CpuId> + '_ {
        (0..CPU_MASK_CAPACITY)
            .filter(|&cpu| self.is_set(cpu))
            .map(CpuId::new)
    }
}

impl Default for CpuMask {
    fn default() -> Self {
        Self::new()
    }
}

impl From<cpu_set_t> for CpuMask {
    fn from(set: cpu_set_t) -> Self {
        Self::from_raw(set)
    }
}

impl AffinityMask for CpuMask {
    fn clear(&mut self) {
        self.raw.clear();
    }

    unsafe fn set_unchecked(&mut self, cpu: usize) {
        unsafe { self.raw.set_unchecked(cpu) };
    }

    fn is_set(&self, cpu: usize) -> bool {
        self.raw.is_set(cpu)
    }
}

impl PartialEq for CpuMask {
    fn eq(&self, other: &Self) -> bool {
        (0..CPU_MASK_CAPACITY).all(|cpu| self.is_set(cpu) == other.is_set(cpu))
    }
}

impl Eq for CpuMask {}

impl Debug for CpuMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter().map(CpuId::index)).finish()
    }
}
