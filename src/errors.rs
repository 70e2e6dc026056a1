/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! Definition of errors for this crate

use core::fmt::Display;

/// Error when reading or changing the processor affinity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffinityError {
    /// The operating system rejected the call with this error code
    ErrorCode(i32),
    /// The CPU index does not fit in the affinity mask
    OutOfRange {
        /// The requested CPU index
        cpu: usize,
        /// The number of CPUs the mask can hold
        capacity: usize,
    },
    /// There is no processor affinity API on this platform
    PlatformNotSupported,
}

impl Display for AffinityError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ErrorCode(code) => write!(f, "processor affinity call failed with error code {code}"),
            Self::OutOfRange { cpu, capacity } => {
                write!(f, "cpu {cpu} is out of range: the mask holds {capacity} cpus")
            }
            Self::PlatformNotSupported => write!(f, "processor affinity is not supported on this platform"),
        }
    }
}

impl core::error::Error for AffinityError {}

impl AffinityError {
    /// Gets the error code reported by the operating system, if any
    #[must_use]
    pub fn error_code(&self) -> Option<i32> {
        match self {
            Self::ErrorCode(code) => Some(*code),
            _ => None,
        }
    }

    /// Tests whether the cause of the error is an invalid CPU index
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /// Tests whether the cause of the error is the platform lacking an affinity API
    #[must_use]
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::PlatformNotSupported)
    }
}
