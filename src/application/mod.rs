// SPDX-License-Identifier: MPL-2.0
//! Application layer.
//!
//! - [`port`]: trait definitions that infrastructure implements
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports

pub mod port;
