/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! API for the processor affinity of the calling thread

use alloc::vec::Vec;
use core::fmt::Display;

use tracing::{debug, warn};

use crate::errors::AffinityError;

/// The identifier of a logical CPU, as enumerated by the operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct CpuId(usize);

impl CpuId {
    /// Creates the identifier for the CPU at a zero-based index
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Gets the zero-based index of this CPU
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for CpuId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<CpuId> for usize {
    fn from(cpu: CpuId) -> Self {
        cpu.0
    }
}

impl Display for CpuId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "cpu{}", self.0)
    }
}

/// Gets the CPUs the calling thread is allowed to run on, in ascending order
///
/// # Errors
///
/// Returns an error when the operating system rejects the call,
/// or when the platform has no processor affinity API.
pub fn get_processor_affinity() -> Result<Vec<CpuId>, AffinityError> {
    imp::get_processor_affinity().inspect_err(|error| warn!(%error, "failed to get the processor affinity"))
}

/// Restricts the calling thread to the given CPUs
///
/// Returns the affinity that is effectively applied, as read back from the operating system.
///
/// # Errors
///
/// Returns `AffinityError::OutOfRange` when a CPU does not fit in the platform's mask,
/// in which case the operating system is not called.
/// Returns `AffinityError::ErrorCode` when the operating system rejects the mask,
/// for example when it selects no available CPU.
pub fn set_processor_affinity(cpus: &[CpuId]) -> Result<Vec<CpuId>, AffinityError> {
    imp::set_processor_affinity(cpus)
        .inspect_err(|error| warn!(?cpus, %error, "failed to set the processor affinity"))?;
    let effective = get_processor_affinity()?;
    debug!(requested = ?cpus, effective = ?effective, "processor affinity applied");
    Ok(effective)
}

/// Pins the calling thread to a single CPU
///
/// # Errors
///
/// Same as [`set_processor_affinity`].
pub fn set_for_current(cpu: CpuId) -> Result<(), AffinityError> {
    imp::set_processor_affinity(&[cpu])
        .inspect_err(|error| warn!(%cpu, %error, "failed to pin the current thread"))?;
    debug!(%cpu, "current thread pinned");
    Ok(())
}

/// Gets the number of logical CPUs configured on this machine
///
/// CPU identifiers below this count are valid for this machine,
/// even though some of them may be offline or excluded from the affinity of the calling thread.
///
/// # Errors
///
/// Returns an error when the count cannot be obtained from the operating system.
pub fn cpu_count() -> Result<usize, AffinityError> {
    imp::cpu_count()
}

#[cfg(any(target_os = "android", target_os = "linux"))]
use linux as imp;
#[cfg(not(any(target_os = "android", target_os = "linux", windows)))]
use unsupported as imp;
#[cfg(windows)]
use windows as imp;

#[cfg(any(target_os = "android", target_os = "linux"))]
mod linux {
    use alloc::vec::Vec;

    use libc::{c_int, cpu_set_t};

    use super::CpuId;
    use crate::errors::AffinityError;
    use crate::mask::CpuMask;

    pub fn get_processor_affinity() -> Result<Vec<CpuId>, AffinityError> {
        let mut mask = CpuMask::new();
        check(get_affinity_mask(mask.as_raw_mut()))?;
        Ok(mask.iter().collect())
    }

    pub fn set_processor_affinity(cpus: &[CpuId]) -> Result<(), AffinityError> {
        let mask = CpuMask::from_cpus(cpus.iter().copied())?;
        check(set_affinity_mask(mask.as_raw()))
    }

    pub fn cpu_count() -> Result<usize, AffinityError> {
        let count = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_CONF) };
        match usize::try_from(count) {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(AffinityError::ErrorCode(last_errno())),
        }
    }

    fn check(status: c_int) -> Result<(), AffinityError> {
        if status == 0 {
            Ok(())
        } else {
            Err(AffinityError::ErrorCode(status))
        }
    }

    /// Reads the affinity of the calling thread, returns an error number
    #[cfg(target_os = "linux")]
    fn get_affinity_mask(set: &mut cpu_set_t) -> c_int {
        unsafe { libc::pthread_getaffinity_np(libc::pthread_self(), core::mem::size_of::<cpu_set_t>(), set) }
    }

    /// Applies the affinity to the calling thread, returns an error number
    #[cfg(target_os = "linux")]
    fn set_affinity_mask(set: &cpu_set_t) -> c_int {
        unsafe { libc::pthread_setaffinity_np(libc::pthread_self(), core::mem::size_of::<cpu_set_t>(), set) }
    }

    #[cfg(target_os = "android")]
    fn get_affinity_mask(set: &mut cpu_set_t) -> c_int {
        // 0 is the calling thread
        if unsafe { libc::sched_getaffinity(0, core::mem::size_of::<cpu_set_t>(), set) } == 0 {
            0
        } else {
            last_errno()
        }
    }

    #[cfg(target_os = "android")]
    fn set_affinity_mask(set: &cpu_set_t) -> c_int {
        if unsafe { libc::sched_setaffinity(0, core::mem::size_of::<cpu_set_t>(), set) } == 0 {
            0
        } else {
            last_errno()
        }
    }

    #[cfg(target_os = "linux")]
    fn last_errno() -> c_int {
        unsafe { *libc::__errno_location() }
    }

    #[cfg(target_os = "android")]
    fn last_errno() -> c_int {
        unsafe { *libc::__errno() }
    }
}

#[cfg(windows)]
mod windows {
    use alloc::vec::Vec;

    use windows_sys::Win32::Foundation::GetLastError;
    use windows_sys::Win32::System::SystemInformation::GROUP_AFFINITY;
    use windows_sys::Win32::System::Threading::{
        ALL_PROCESSOR_GROUPS, GetActiveProcessorCount, GetCurrentThread, GetThreadGroupAffinity, SetThreadAffinityMask,
    };

    use super::CpuId;
    use crate::errors::AffinityError;

    /// The number of CPUs in a processor group mask
    const MASK_CAPACITY: usize = usize::BITS as usize;

    pub fn get_processor_affinity() -> Result<Vec<CpuId>, AffinityError> {
        let mut affinity = unsafe { core::mem::zeroed::<GROUP_AFFINITY>() };
        if unsafe { GetThreadGroupAffinity(GetCurrentThread(), &mut affinity) } == 0 {
            return Err(last_error());
        }
        let mask = affinity.Mask;
        Ok((0..MASK_CAPACITY)
            .filter(|&bit| (mask >> bit) & 1 == 1)
            .map(CpuId::new)
            .collect())
    }

    pub fn set_processor_affinity(cpus: &[CpuId]) -> Result<(), AffinityError> {
        let mut mask: usize = 0;
        for cpu in cpus {
            let index = cpu.index();
            if index >= MASK_CAPACITY {
                return Err(AffinityError::OutOfRange {
                    cpu: index,
                    capacity: MASK_CAPACITY,
                });
            }
            mask |= 1 << index;
        }
        if unsafe { SetThreadAffinityMask(GetCurrentThread(), mask) } == 0 {
            return Err(last_error());
        }
        Ok(())
    }

    pub fn cpu_count() -> Result<usize, AffinityError> {
        match unsafe { GetActiveProcessorCount(ALL_PROCESSOR_GROUPS) } {
            0 => Err(last_error()),
            count => Ok(count as usize),
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn last_error() -> AffinityError {
        AffinityError::ErrorCode(unsafe { GetLastError() } as i32)
    }
}

#[cfg(not(any(target_os = "android", target_os = "linux", windows)))]
mod unsupported {
    use alloc::vec::Vec;

    use super::CpuId;
    use crate::errors::AffinityError;

    pub fn get_processor_affinity() -> Result<Vec<CpuId>, AffinityError> {
        Err(AffinityError::PlatformNotSupported)
    }

    pub fn set_processor_affinity(_cpus: &[CpuId]) -> Result<(), AffinityError> {
        Err(AffinityError::PlatformNotSupported)
    }

    pub fn cpu_count() -> Result<usize, AffinityError> {
        Err(AffinityError::PlatformNotSupported)
    }
}
