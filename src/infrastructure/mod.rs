// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! # Available Adapters
//!
//! - [`stdio`]: Console output suppression around native calls
//! - `sr_vulkan`: The `sr_vulkan` engine (implements [`SrBackend`]),
//!   behind the `sr-vulkan` feature
//!
//! [`SrBackend`]: crate::application::port::SrBackend

#[cfg(feature = "sr-vulkan")]
pub mod sr_vulkan;
pub mod stdio;

#[cfg(feature = "sr-vulkan")]
pub use sr_vulkan::SrVulkanBackend;
pub use stdio::{suppress_output, OutputSuppressor};
