// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Job**: Scale, model, tiling and output encoding
//! - **Device**: GPU selection and the CPU sentinel
//! - **Engine Slots**: Queue identifiers passed to the engine
//! - **Polling**: Result polling budget

// ==========================================================================
// Job Defaults
// ==========================================================================

/// Default upscale factor.
pub const DEFAULT_SCALE: f32 = 2.0;

/// Smallest upscale factor accepted from the command line.
pub const MIN_SCALE: f32 = 1.0;

/// Largest upscale factor accepted from the command line.
pub const MAX_SCALE: f32 = 16.0;

/// Model used when the caller names none.
pub const DEFAULT_MODEL: &str = "realesrgan_x4plus";

/// Default tile edge, in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 400;

/// Default encoding of the produced image.
pub const DEFAULT_OUTPUT_FORMAT: &str = "webp";

// ==========================================================================
// Device Defaults
// ==========================================================================

/// GPU index used when none is configured.
pub const DEFAULT_GPU_ID: i32 = 0;

/// Device id that selects CPU mode in `initSet`.
pub const CPU_DEVICE_ID: i32 = -1;

// ==========================================================================
// Engine Slots
// ==========================================================================

/// Backend slot every job is submitted to.
pub const SUBMIT_BACKEND_SLOT: i32 = 1;

/// Slot argument passed when polling for results.
pub const POLL_SLOT: i32 = 0;

// ==========================================================================
// Polling Defaults
// ==========================================================================

/// Number of polls before a job is considered timed out.
pub const MAX_POLL_ATTEMPTS: u32 = 60;

/// Delay between two polls, in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 1_000;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_SCALE > 0.0);
    assert!(MAX_SCALE > MIN_SCALE);
    assert!(DEFAULT_SCALE >= MIN_SCALE);
    assert!(DEFAULT_SCALE <= MAX_SCALE);

    assert!(DEFAULT_TILE_SIZE > 0);
    assert!(DEFAULT_GPU_ID >= 0);
    assert!(CPU_DEVICE_ID < 0);
    assert!(SUBMIT_BACKEND_SLOT != POLL_SLOT);

    assert!(MAX_POLL_ATTEMPTS > 0);
    assert!(POLL_INTERVAL_MS > 0);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_defaults_are_valid() {
        assert_eq!(DEFAULT_SCALE, 2.0);
        assert!(DEFAULT_SCALE >= MIN_SCALE);
        assert!(DEFAULT_SCALE <= MAX_SCALE);
        assert_eq!(DEFAULT_TILE_SIZE, 400);
        assert_eq!(DEFAULT_OUTPUT_FORMAT, "webp");
        assert_eq!(DEFAULT_MODEL, "realesrgan_x4plus");
    }

    #[test]
    fn poll_budget_is_about_a_minute() {
        let total_ms = u64::from(MAX_POLL_ATTEMPTS) * POLL_INTERVAL_MS;
        assert_eq!(total_ms, 60_000);
    }
}
