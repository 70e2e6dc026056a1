/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! Prelude for cpuset

pub use crate::affinity::{CpuId, cpu_count, get_processor_affinity, set_for_current, set_processor_affinity};
pub use crate::errors::AffinityError;
#[cfg(any(target_os = "android", target_os = "linux"))]
pub use crate::mask::{AffinityMask, CPU_MASK_CAPACITY, CpuMask, cpu_set, cpu_set_t, cpu_zero};
