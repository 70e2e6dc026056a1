/*******************************************************************************
 * Copyright (c) 2024 Cénotélie Opérations SAS (cenotelie.fr)
 ******************************************************************************/

//! # Cpuset
//!
//! CPU affinity masks and thread pinning.
//!
//! On operating systems that define a native `cpu_set_t` (Linux and Android),
//! the [`mask`] module gives direct access to the two primitives needed to build an affinity mask:
//! clearing a mask and selecting one CPU in it.
//! The mask is owned by the caller and is only mutated in place.
//! The module does not exist on other platforms, callers must gate their use of it with `cfg`.
//!
//! The [`affinity`] module builds on top of it to read and change the affinity of the calling thread.
//! On Windows, it uses the native processor group affinity instead.
//! On other platforms, its functions fail with `AffinityError::PlatformNotSupported`.
//!
//!
//! ## Example
//!
//! Build a mask for CPUs 0 and 2.
//! ```
//! # #[cfg(any(target_os = "android", target_os = "linux"))]
//! # {
//! use cpuset::mask::{cpu_set_t, cpu_set, cpu_zero, AffinityMask};
//!
//! let mut set: cpu_set_t = unsafe { core::mem::zeroed() };
//! cpu_zero(&mut set);
//! // SAFETY: both indices are lower than the mask's capacity
//! unsafe {
//!     cpu_set(0, &mut set);
//!     cpu_set(2, &mut set);
//! }
//! assert!(set.is_set(0));
//! assert!(!set.is_set(1));
//! assert!(set.is_set(2));
//! assert_eq!(set.count(), 2);
//! # }
//! ```
//!
//! Pin the current thread to the first CPU it is allowed to run on.
//! ```
//! use cpuset::affinity::{get_processor_affinity, set_for_current};
//!
//! if let Ok(cpus) = get_processor_affinity() {
//!     set_for_current(cpus[0]).unwrap();
//! }
//! ```
//!
//!
//! ## `no-std` support
//!
//! `cpuset` is compatible with `no-std` context, having a `std` feature which is activated by default.
//! The crate still requires `alloc`.
//!
//!
//! ## License
//!
//! Copyright 2024 Cénotélie Opérations SAS
//!
//! Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the “Software”), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
//!
//! The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
//!
//! THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
//!

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::module_name_repetitions)]

extern crate alloc;

pub mod affinity;
pub mod errors;
#[cfg(any(target_os = "android", target_os = "linux"))]
pub mod mask;
pub mod prelude;

#[cfg(test)]
mod tests;
