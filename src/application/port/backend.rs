// SPDX-License-Identifier: MPL-2.0
//! Super-resolution engine port.
//!
//! This module defines the [`SrBackend`] trait, the seam between the processor
//! and the native engine. The primitives mirror the engine's own surface
//! one-to-one: initialize, pick a device, submit a job, poll for a result, stop.
//!
//! # Design Notes
//!
//! - Status codes stay integers, as the engine reports them; interpreting them
//!   (negative = failure, non-positive submission = rejected) is the caller's job
//! - [`BackendError`] is reserved for the binding layer itself failing
//!   (e.g. the extension module cannot be imported)
//! - Methods take `&mut self`: the engine is stateful and single-job

use std::fmt;
use std::path::Path;

use crate::domain::model::ModelId;

// =============================================================================
// BackendError
// =============================================================================

/// Errors raised by the binding layer, as opposed to status codes reported
/// by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The engine module could not be loaded.
    Unavailable(String),

    /// A call into the engine raised an error.
    CallFailed {
        /// Engine primitive that failed (e.g. `"add"`).
        call: &'static str,
        /// Error message reported by the binding.
        message: String,
    },

    /// The engine returned a value of an unexpected shape.
    UnexpectedResponse(String),
}

impl BackendError {
    /// Creates a [`BackendError::CallFailed`] for the given primitive.
    pub fn call_failed(call: &'static str, message: impl Into<String>) -> Self {
        BackendError::CallFailed {
            call,
            message: message.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unavailable(msg) => write!(f, "engine unavailable: {msg}"),
            BackendError::CallFailed { call, message } => {
                write!(f, "engine call `{call}` failed: {message}")
            }
            BackendError::UnexpectedResponse(msg) => {
                write!(f, "unexpected engine response: {msg}")
            }
        }
    }
}

impl std::error::Error for BackendError {}

// =============================================================================
// Job / JobOutput
// =============================================================================

/// A single image submission.
#[derive(Debug, Clone, Copy)]
pub struct Job<'a> {
    /// Encoded input image, as read from disk.
    pub data: &'a [u8],
    /// Network to run.
    pub model: ModelId,
    /// Queue the engine routes the job to.
    pub backend_slot: i32,
    /// Requested upscale factor.
    pub scale: f32,
    /// Tile edge the engine splits large images into.
    pub tile_size: u32,
    /// Encoding of the produced image (e.g. `"webp"`).
    pub format: &'a str,
}

/// A finished job as handed back by [`SrBackend::load`].
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutput {
    /// Encoded output image.
    pub data: Vec<u8>,
    /// Encoding of `data`.
    pub format: String,
    /// Identifier the engine assigned to the result.
    pub result_id: String,
    /// Engine-side processing time, in seconds.
    pub elapsed_secs: f64,
}

impl JobOutput {
    /// An output without bytes is treated the same as no output at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// =============================================================================
// SrBackend Trait
// =============================================================================

/// Port for the native super-resolution engine.
///
/// Infrastructure adapters implement this trait; tests use scripted doubles.
///
/// # Example
///
/// ```ignore
/// use sr_bindings::application::port::SrBackend;
///
/// fn warm_up(backend: &mut impl SrBackend) -> bool {
///     matches!(backend.init(), Ok(status) if status >= 0)
/// }
/// ```
pub trait SrBackend {
    /// Global engine initialization. Negative status means no usable GPU.
    ///
    /// # Errors
    ///
    /// Returns an error if the binding fails.
    fn init(&mut self) -> Result<i32, BackendError>;

    /// Selects the execution device. `gpu_id` is `-1` together with
    /// `Some(cores)` for CPU mode. Negative status means failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the binding fails.
    fn init_set(&mut self, gpu_id: i32, cpu_cores: Option<u32>) -> Result<i32, BackendError>;

    /// Number of CPU cores the engine would use in CPU mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the binding fails.
    fn cpu_core_count(&mut self) -> Result<u32, BackendError>;

    /// Every integer `MODEL_*` constant the engine exposes, as
    /// `(constant name, value)` pairs in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the binding fails.
    fn model_constants(&mut self) -> Result<Vec<(String, i32)>, BackendError>;

    /// Points the engine at a directory holding the model files.
    ///
    /// # Errors
    ///
    /// Returns an error if the binding fails.
    fn set_model_path(&mut self, path: &Path) -> Result<(), BackendError>;

    /// Queues a job. A non-positive result means the engine rejected it.
    ///
    /// # Errors
    ///
    /// Returns an error if the binding fails.
    fn add(&mut self, job: &Job<'_>) -> Result<i64, BackendError>;

    /// Non-blocking poll for a finished job.
    ///
    /// # Errors
    ///
    /// Returns an error if the binding fails.
    fn load(&mut self, slot: i32) -> Result<Option<JobOutput>, BackendError>;

    /// Shuts the engine session down.
    ///
    /// # Errors
    ///
    /// Returns an error if the binding fails.
    fn stop(&mut self) -> Result<(), BackendError>;
}

impl<B: SrBackend + ?Sized> SrBackend for &mut B {
    fn init(&mut self) -> Result<i32, BackendError> {
        (**self).init()
    }

    fn init_set(&mut self, gpu_id: i32, cpu_cores: Option<u32>) -> Result<i32, BackendError> {
        (**self).init_set(gpu_id, cpu_cores)
    }

    fn cpu_core_count(&mut self) -> Result<u32, BackendError> {
        (**self).cpu_core_count()
    }

    fn model_constants(&mut self) -> Result<Vec<(String, i32)>, BackendError> {
        (**self).model_constants()
    }

    fn set_model_path(&mut self, path: &Path) -> Result<(), BackendError> {
        (**self).set_model_path(path)
    }

    fn add(&mut self, job: &Job<'_>) -> Result<i64, BackendError> {
        (**self).add(job)
    }

    fn load(&mut self, slot: i32) -> Result<Option<JobOutput>, BackendError> {
        (**self).load(slot)
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        (**self).stop()
    }
}
