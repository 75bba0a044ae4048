// SPDX-License-Identifier: MPL-2.0
//! Functional surface: one call per image, outcome as `(success, message)`.
//!
//! On success the message is the engine's processing time in seconds with
//! two decimals (e.g. `"1.23"`); on failure it is the
//! [`ProcessError`](crate::media::upscale::ProcessError) message.

use std::path::PathBuf;

use crate::application::port::SrBackend;
use crate::config::defaults::{
    DEFAULT_GPU_ID, DEFAULT_MODEL, DEFAULT_OUTPUT_FORMAT, DEFAULT_SCALE, DEFAULT_TILE_SIZE,
};
use crate::media::upscale::{ImageProcessor, ProcessOptions, ProcessReport, ProcessResult};
use crate::paths;

pub use crate::models::{
    find_model_id, get_all_model_names, get_library_models, get_model_categories_formatted,
    get_model_info, normalize_model_name, ModelInfo,
};

#[cfg(feature = "sr-vulkan")]
use crate::infrastructure::sr_vulkan::SrVulkanBackend;

/// Everything needed to upscale one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub scale: f32,
    pub model: String,
    pub gpu_id: i32,
    pub cpu_mode: bool,
    /// Model directory; falls back to `SR_MODEL_PATH` when unset.
    pub model_path: Option<PathBuf>,
    pub tile_size: u32,
    pub output_format: String,
}

impl Default for ProcessRequest {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            output_path: PathBuf::new(),
            scale: DEFAULT_SCALE,
            model: DEFAULT_MODEL.to_string(),
            gpu_id: DEFAULT_GPU_ID,
            cpu_mode: false,
            model_path: None,
            tile_size: DEFAULT_TILE_SIZE,
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
        }
    }
}

impl ProcessRequest {
    /// A request with default settings.
    #[must_use]
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    fn options(&self) -> ProcessOptions {
        ProcessOptions {
            scale: self.scale,
            model: self.model.clone(),
            tile_size: self.tile_size,
            output_format: self.output_format.clone(),
        }
    }
}

/// Runs `request` on `backend` and returns the full report.
///
/// # Errors
///
/// See [`ProcessError`](crate::media::upscale::ProcessError).
pub fn run<B: SrBackend>(backend: B, request: &ProcessRequest) -> ProcessResult<ProcessReport> {
    let mut processor = ImageProcessor::new(backend)
        .with_gpu_id(request.gpu_id)
        .with_cpu_mode(request.cpu_mode)
        .with_model_path(paths::resolve_model_path(request.model_path.clone(), None));
    processor.process(&request.input_path, &request.output_path, &request.options())
}

/// Runs `request` on `backend`, reporting the outcome as `(success, message)`.
pub fn process_image_with<B: SrBackend>(backend: B, request: &ProcessRequest) -> (bool, String) {
    match run(backend, request) {
        Ok(report) => (true, format!("{:.2}", report.elapsed_secs)),
        Err(err) => {
            log::error!("Processing {} failed: {err}", request.input_path.display());
            (false, err.to_string())
        }
    }
}

/// Populates the model registry from the `sr_vulkan` engine's constants.
#[cfg(feature = "sr-vulkan")]
pub fn load_engine_models() -> &'static crate::models::ModelRegistry {
    let mut backend = SrVulkanBackend::new();
    crate::infrastructure::stdio::suppress_output(|| {
        crate::models::load_library_models(&mut backend)
    })
}

/// Runs `request` on the `sr_vulkan` engine.
#[cfg(feature = "sr-vulkan")]
pub fn process_image(request: &ProcessRequest) -> (bool, String) {
    process_image_with(SrVulkanBackend::new(), request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::JobOutput;
    use crate::test_utils::{Call, MockBackend};
    use tempfile::tempdir;

    #[test]
    fn request_defaults() {
        let request = ProcessRequest::new("in.png", "out.webp");
        assert_eq!(request.scale, 2.0);
        assert_eq!(request.model, "realesrgan_x4plus");
        assert_eq!(request.gpu_id, 0);
        assert!(!request.cpu_mode);
        assert_eq!(request.model_path, None);
        assert_eq!(request.tile_size, 400);
        assert_eq!(request.output_format, "webp");
    }

    #[test]
    fn success_message_is_elapsed_with_two_decimals() {
        let dir = tempdir().expect("tempdir");
        let input = dir.path().join("in.png");
        std::fs::write(&input, b"abc").expect("write input");
        let mut backend = MockBackend::new().with_polls(vec![Some(JobOutput {
            data: b"out".to_vec(),
            format: "webp".to_string(),
            result_id: "7".to_string(),
            elapsed_secs: 3.14159,
        })]);

        let request = ProcessRequest::new(&input, dir.path().join("out.webp"));
        let outcome = process_image_with(&mut backend, &request);

        assert_eq!(outcome, (true, "3.14".to_string()));
        assert_eq!(backend.count(&Call::Stop), 1);
    }

    #[test]
    fn failure_is_reported_as_message() {
        let dir = tempdir().expect("tempdir");
        let input = dir.path().join("missing.png");
        let request = ProcessRequest::new(&input, dir.path().join("out.webp"));

        let (ok, message) = process_image_with(MockBackend::new(), &request);

        assert!(!ok);
        assert_eq!(message, format!("Input file not found: {}", input.display()));
    }

    #[test]
    fn explicit_model_path_reaches_engine() {
        let mut backend = MockBackend {
            init_status: -1,
            cpu_status: -1,
            ..MockBackend::new()
        };
        let request = ProcessRequest {
            model_path: Some(PathBuf::from("/opt/models")),
            ..ProcessRequest::new("in.png", "out.png")
        };

        let (ok, message) = process_image_with(&mut backend, &request);

        assert!(!ok);
        assert_eq!(message, "Initialization failed");
        assert_eq!(
            backend.calls.first(),
            Some(&Call::SetModelPath(PathBuf::from("/opt/models")))
        );
    }
}
