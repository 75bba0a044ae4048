// SPDX-License-Identifier: MPL-2.0
//! Model registry.
//!
//! Maps model names to the integer ids the engine selects networks by. The
//! registry is derived once from the engine's `MODEL_*` constants
//! ([`catalog::MODEL_CONSTANTS`]) and shared process-wide afterwards.
//!
//! # Name Resolution
//!
//! [`find_model_id`] normalizes the query (see
//! [`normalize_model_name`](crate::domain::model::normalize_model_name)) and
//! tries, in order:
//! 1. An exact match against a registry key
//! 2. Substring containment in either direction; when several keys match,
//!    the shortest key wins, ties going to the first-declared one

pub mod catalog;

use std::fmt;
use std::sync::OnceLock;

use crate::application::port::{BackendError, SrBackend};
use crate::domain::model::{bare_model_name, ModelFamily, ModelId};

pub use crate::domain::model::normalize_model_name;

/// Prefix of the engine constants that name networks.
pub const CONSTANT_PREFIX: &str = "MODEL_";

/// Description reported for models the engine knows.
const KNOWN_MODEL_DESCRIPTION: &str = "sr_vulkan model";

/// Description reported for names that resolve to nothing.
const UNKNOWN_MODEL_DESCRIPTION: &str = "Unknown model";

static LIBRARY_MODELS: OnceLock<ModelRegistry> = OnceLock::new();

/// Immutable name → id mapping, in engine declaration order.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    entries: Vec<(String, ModelId)>,
}

impl ModelRegistry {
    /// Builds a registry from `(constant name, value)` pairs.
    ///
    /// Only `MODEL_*` constants are kept. The prefix is stripped and the rest
    /// lower-cased (`MODEL_REALSR_DF2K_UP4X` → `realsr_df2k_up4x`). Constants
    /// that are empty after stripping, or that repeat an earlier name, are
    /// skipped.
    pub fn from_constants<'a, I>(constants: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, i32)>,
    {
        let mut entries: Vec<(String, ModelId)> = Vec::new();
        for (constant, value) in constants {
            let Some(stripped) = constant.strip_prefix(CONSTANT_PREFIX) else {
                continue;
            };
            let name = stripped.to_lowercase();
            if name.is_empty() || entries.iter().any(|(existing, _)| *existing == name) {
                continue;
            }
            entries.push((name, ModelId::new(value)));
        }
        Self { entries }
    }

    /// Builds a registry from the constants the engine exposes.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be scanned.
    pub fn from_backend<B: SrBackend>(backend: &mut B) -> Result<Self, BackendError> {
        let constants = backend.model_constants()?;
        Ok(Self::from_constants(
            constants.iter().map(|(name, value)| (name.as_str(), *value)),
        ))
    }

    /// Registry over the built-in [`catalog`] table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_constants(catalog::MODEL_CONSTANTS.iter().copied())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, id)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ModelId)> + '_ {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Looks up a registry key verbatim.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<ModelId> {
        self.iter().find(|(name, _)| *name == key).map(|(_, id)| id)
    }

    /// Resolves a loosely spelled model name to its id.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ModelId> {
        let query = bare_model_name(name);
        if let Some(id) = self.get(&query) {
            return Some(id);
        }
        // Every key contains the empty string.
        if query.is_empty() {
            return None;
        }
        self.iter()
            .filter(|(key, _)| key.contains(query.as_str()) || query.contains(key))
            .min_by_key(|(key, _)| key.len())
            .map(|(_, id)| id)
    }

    /// Groups keys by [`ModelFamily`], in family listing order.
    ///
    /// Keys that belong to no known family are left out.
    #[must_use]
    pub fn categories(&self) -> Vec<(ModelFamily, Vec<&str>)> {
        ModelFamily::ALL
            .into_iter()
            .filter_map(|family| {
                let members: Vec<&str> = self
                    .iter()
                    .map(|(name, _)| name)
                    .filter(|name| ModelFamily::classify(name) == Some(family))
                    .collect();
                (!members.is_empty()).then_some((family, members))
            })
            .collect()
    }

    /// Renders [`categories`](Self::categories) as a human-readable listing.
    ///
    /// ```text
    /// REALCUGAN:
    ///   - realcugan_pro_conservative_up2x
    ///   ...
    ///
    /// WAIFU2X:
    ///   - waifu2x_cunet_up2x
    /// ```
    #[must_use]
    pub fn format_categories(&self) -> String {
        let mut lines = Vec::new();
        for (family, members) in self.categories() {
            lines.push(format!("{}:", family.label()));
            lines.extend(members.into_iter().map(|name| format!("  - {name}")));
            lines.push(String::new());
        }
        lines.join("\n")
    }
}

/// Returns the process-wide registry.
///
/// If [`load_library_models`] has not run yet, the registry is fixed to the
/// built-in [`catalog`] table.
pub fn get_library_models() -> &'static ModelRegistry {
    LIBRARY_MODELS.get_or_init(|| {
        let registry = ModelRegistry::builtin();
        log::debug!("Model registry populated with {} built-in models", registry.len());
        registry
    })
}

/// Returns the process-wide registry, scanning `backend` on first use.
///
/// Once populated the registry is never rebuilt, whichever backend is passed
/// later.
pub fn load_library_models<B: SrBackend>(backend: &mut B) -> &'static ModelRegistry {
    LIBRARY_MODELS.get_or_init(|| scan_or_builtin(backend))
}

/// Engine constants when the engine exposes any, the built-in table otherwise.
fn scan_or_builtin<B: SrBackend>(backend: &mut B) -> ModelRegistry {
    match ModelRegistry::from_backend(backend) {
        Ok(registry) if !registry.is_empty() => {
            log::debug!("Model registry populated with {} engine models", registry.len());
            registry
        }
        Ok(_) => {
            log::warn!("Engine exposes no {CONSTANT_PREFIX}* constants, using built-in model table");
            ModelRegistry::builtin()
        }
        Err(err) => {
            log::warn!("Could not scan engine models ({err}), using built-in model table");
            ModelRegistry::builtin()
        }
    }
}

/// Resolves a model name against the process-wide registry.
///
/// # Example
///
/// ```
/// use sr_bindings::models::find_model_id;
///
/// assert_eq!(find_model_id("RealESRGAN-x4plus"), find_model_id("realesrgan_x4plus"));
/// assert!(find_model_id("totally_unknown_model_xyz").is_none());
/// ```
#[must_use]
pub fn find_model_id(name: &str) -> Option<ModelId> {
    get_library_models().find(name)
}

/// Returns every registry key, in declaration order.
#[must_use]
pub fn get_all_model_names() -> Vec<String> {
    get_library_models()
        .iter()
        .map(|(name, _)| name.to_string())
        .collect()
}

/// What the registry knows about a model name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// The name as the caller supplied it.
    pub name: String,
    /// Resolved id, `None` when the name is unknown.
    pub id: Option<ModelId>,
    pub description: &'static str,
}

impl fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{} (id {id}): {}", self.name, self.description),
            None => write!(f, "{}: {}", self.name, self.description),
        }
    }
}

/// Describes a model name.
#[must_use]
pub fn get_model_info(model: &str) -> ModelInfo {
    let id = find_model_id(model);
    ModelInfo {
        name: model.to_string(),
        id,
        description: if id.is_some() {
            KNOWN_MODEL_DESCRIPTION
        } else {
            UNKNOWN_MODEL_DESCRIPTION
        },
    }
}

/// Human-readable listing of all models grouped by family.
#[must_use]
pub fn get_model_categories_formatted() -> String {
    get_library_models().format_categories()
}
