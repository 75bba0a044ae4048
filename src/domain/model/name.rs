// SPDX-License-Identifier: MPL-2.0
//! Model name normalization.
//!
//! Callers spell model names loosely (`RealESRGAN-x4plus`, `waifu2x cunet up2x`,
//! `model_realcugan_se_conservative_up2x`). Everything is reduced to one
//! canonical form before it is compared against the registry.

/// Prefix every normalized model name carries.
pub const MODEL_PREFIX: &str = "model_";

/// Normalizes a caller-supplied model name.
///
/// Lower-cases the name, turns spaces and hyphens into underscores and makes
/// sure the result starts with `model_`. Total and idempotent.
///
/// # Example
///
/// ```
/// use sr_bindings::domain::model::normalize_model_name;
///
/// assert_eq!(normalize_model_name("RealESRGAN-x4plus"), "model_realesrgan_x4plus");
/// assert_eq!(
///     normalize_model_name("model_realesrgan_x4plus"),
///     "model_realesrgan_x4plus"
/// );
/// ```
#[must_use]
pub fn normalize_model_name(name: &str) -> String {
    let lowered: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect();

    if lowered.starts_with(MODEL_PREFIX) {
        lowered
    } else {
        format!("{MODEL_PREFIX}{lowered}")
    }
}

/// Returns the normalized name without its `model_` prefix.
///
/// This is the form registry keys are stored in.
#[must_use]
pub fn bare_model_name(name: &str) -> String {
    let normalized = normalize_model_name(name);
    normalized
        .strip_prefix(MODEL_PREFIX)
        .map_or_else(|| normalized.clone(), str::to_string)
}
