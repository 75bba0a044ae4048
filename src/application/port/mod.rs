// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! These traits use only domain types, so the processor stays independent of
//! the concrete engine binding.
//!
//! # Available Ports
//!
//! - [`backend`]: the super-resolution engine

pub mod backend;

pub use backend::{BackendError, Job, JobOutput, SrBackend};
