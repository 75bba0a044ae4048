// SPDX-License-Identifier: MPL-2.0
//! Domain layer - pure types with no dependency on the engine or the filesystem.
//!
//! # Modules
//!
//! - [`device`]: Execution device ([`Device`](device::Device))
//! - [`model`]: Model naming ([`ModelId`](model::ModelId),
//!   [`ModelFamily`](model::ModelFamily), [`normalize_model_name`](model::normalize_model_name))

pub mod device;
pub mod model;
