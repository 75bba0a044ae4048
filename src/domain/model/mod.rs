// SPDX-License-Identifier: MPL-2.0
//! Model naming types.
//!
//! - [`normalize_model_name`] / [`bare_model_name`]: canonical spelling of names
//! - [`ModelId`]: the integer the engine selects a network by
//! - [`ModelFamily`]: grouping used when listing models

mod family;
mod name;

pub use family::ModelFamily;
pub use name::{bare_model_name, normalize_model_name, MODEL_PREFIX};

use std::fmt;

/// Integer identifier the engine uses to select a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(i32);

impl ModelId {
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw value passed to the engine.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
