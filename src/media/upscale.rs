// SPDX-License-Identifier: MPL-2.0
//! Super-resolution of a single image through an [`SrBackend`].
//!
//! This module provides functionality for:
//! - Bringing the engine up on a GPU, falling back to CPU when no GPU answers
//! - Submitting one image and polling until the engine hands a result back
//! - Writing the result next to the requested output, then renaming it in place
//!
//! Every engine call runs with console output suppressed, the engine being
//! very chatty on descriptors 1 and 2.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::application::port::{BackendError, Job, JobOutput, SrBackend};
use crate::config::defaults::{
    CPU_DEVICE_ID, DEFAULT_GPU_ID, DEFAULT_MODEL, DEFAULT_OUTPUT_FORMAT, DEFAULT_SCALE,
    DEFAULT_TILE_SIZE, MAX_POLL_ATTEMPTS, POLL_INTERVAL_MS, POLL_SLOT, SUBMIT_BACKEND_SLOT,
};
use crate::domain::device::Device;
use crate::infrastructure::stdio::suppress_output;
use crate::models;

/// Result type for processing operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Errors that can occur while processing an image.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessError {
    /// Neither the GPU nor the CPU could be initialized.
    InitializationFailed,
    /// The input path does not exist.
    InputNotFound(String),
    /// The model name resolves to no known model.
    UnknownModel(String),
    /// The engine rejected the submission.
    SubmitFailed,
    /// No result arrived within the poll budget.
    Timeout,
    /// Reading the input or writing the output failed.
    Io(String),
    /// The binding layer failed.
    Backend(BackendError),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::InitializationFailed => write!(f, "Initialization failed"),
            ProcessError::InputNotFound(path) => write!(f, "Input file not found: {path}"),
            ProcessError::UnknownModel(name) => write!(f, "Unknown model: {name}"),
            ProcessError::SubmitFailed => write!(f, "Failed to add task"),
            ProcessError::Timeout => write!(f, "Processing timeout"),
            ProcessError::Io(msg) => write!(f, "I/O error: {msg}"),
            ProcessError::Backend(err) => write!(f, "Backend error: {err}"),
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::Backend(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ProcessError {
    fn from(err: io::Error) -> Self {
        ProcessError::Io(err.to_string())
    }
}

impl From<BackendError> for ProcessError {
    fn from(err: BackendError) -> Self {
        ProcessError::Backend(err)
    }
}

/// Lifecycle of an [`ImageProcessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessorState {
    #[default]
    Uninitialized,
    Initialized(Device),
    /// The last initialization attempt failed; the next job retries it.
    Failed,
}

/// How long to wait for a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    /// Sleep between two consecutive polls.
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_POLL_ATTEMPTS,
            interval: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }
}

impl PollPolicy {
    /// Polls back to back, without sleeping.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            interval: Duration::ZERO,
        }
    }
}

/// Per-job parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOptions {
    pub scale: f32,
    /// Model name, in any spelling [`models::find_model_id`] accepts.
    pub model: String,
    pub tile_size: u32,
    /// Encoding requested from the engine (e.g. `"webp"`, `"png"`).
    pub output_format: String,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            model: DEFAULT_MODEL.to_string(),
            tile_size: DEFAULT_TILE_SIZE,
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
        }
    }
}

/// Outcome of a successful job.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReport {
    pub output_path: PathBuf,
    /// Engine-side processing time, in seconds.
    pub elapsed_secs: f64,
    pub format: String,
    pub result_id: String,
    pub device: Device,
    /// Input `(width, height)`, when the header could be read.
    pub input_dimensions: Option<(u32, u32)>,
}

/// Drives one engine session: init, submit, poll, write, stop.
///
/// # Example
///
/// ```ignore
/// let mut processor = ImageProcessor::new(backend).with_gpu_id(1);
/// let report = processor.process(input, output, &ProcessOptions::default())?;
/// println!("{:.2}", report.elapsed_secs);
/// ```
pub struct ImageProcessor<B: SrBackend> {
    backend: B,
    gpu_id: i32,
    cpu_mode: bool,
    model_path: Option<PathBuf>,
    poll: PollPolicy,
    state: ProcessorState,
}

impl<B: SrBackend> ImageProcessor<B> {
    /// Creates an uninitialized processor targeting the default GPU.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            gpu_id: DEFAULT_GPU_ID,
            cpu_mode: false,
            model_path: None,
            poll: PollPolicy::default(),
            state: ProcessorState::Uninitialized,
        }
    }

    #[must_use]
    pub fn with_gpu_id(mut self, gpu_id: i32) -> Self {
        self.gpu_id = gpu_id;
        self
    }

    /// Skips the GPU attempt entirely.
    #[must_use]
    pub fn with_cpu_mode(mut self, cpu_mode: bool) -> Self {
        self.cpu_mode = cpu_mode;
        self
    }

    /// Directory the engine loads model files from.
    #[must_use]
    pub fn with_model_path(mut self, model_path: Option<PathBuf>) -> Self {
        self.model_path = model_path;
        self
    }

    #[must_use]
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    #[must_use]
    pub fn state(&self) -> ProcessorState {
        self.state
    }

    /// The device the engine runs on, once initialized.
    #[must_use]
    pub fn device(&self) -> Option<Device> {
        match self.state {
            ProcessorState::Initialized(device) => Some(device),
            _ => None,
        }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Initializes the engine and selects a device.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::InitializationFailed`] if neither the GPU nor
    /// the CPU fallback comes up, or if the binding fails.
    pub fn init(&mut self) -> ProcessResult<Device> {
        match self.select_device() {
            Ok(Some(device)) => {
                log::info!("Engine initialized on {device}");
                self.state = ProcessorState::Initialized(device);
                Ok(device)
            }
            Ok(None) => {
                log::error!("Engine initialization failed on every device");
                self.state = ProcessorState::Failed;
                Err(ProcessError::InitializationFailed)
            }
            Err(err) => {
                log::error!("Engine initialization failed: {err}");
                self.state = ProcessorState::Failed;
                Err(ProcessError::InitializationFailed)
            }
        }
    }

    fn select_device(&mut self) -> Result<Option<Device>, BackendError> {
        if let Some(path) = self.model_path.as_deref() {
            log::debug!("Using model directory {}", path.display());
            engine_call(&mut self.backend, |b| b.set_model_path(path))?;
        }

        let mut cpu_mode = self.cpu_mode;
        let status = engine_call(&mut self.backend, SrBackend::init)?;
        if status < 0 {
            log::warn!("Engine init returned {status}, switching to CPU mode");
            cpu_mode = true;
        }

        if !cpu_mode {
            let gpu_id = self.gpu_id;
            let status = engine_call(&mut self.backend, |b| b.init_set(gpu_id, None))?;
            if status >= 0 {
                return Ok(Some(Device::Gpu(gpu_id)));
            }
            log::warn!("GPU #{gpu_id} unavailable (status {status}), falling back to CPU");
        }

        let cores = engine_call(&mut self.backend, SrBackend::cpu_core_count)?;
        let status = engine_call(&mut self.backend, |b| b.init_set(CPU_DEVICE_ID, Some(cores)))?;
        if status < 0 {
            log::warn!("CPU initialization returned {status}");
            return Ok(None);
        }
        Ok(Some(Device::Cpu { cores }))
    }

    /// Upscales `input` and writes the result to `output`.
    ///
    /// Initializes the engine first if needed. Once the job is submitted the
    /// engine session is stopped before returning, whatever the outcome.
    ///
    /// # Errors
    ///
    /// See [`ProcessError`] for the failure modes.
    pub fn process(
        &mut self,
        input: &Path,
        output: &Path,
        options: &ProcessOptions,
    ) -> ProcessResult<ProcessReport> {
        let device = match self.state {
            ProcessorState::Initialized(device) => device,
            ProcessorState::Uninitialized | ProcessorState::Failed => self.init()?,
        };

        if !input.exists() {
            return Err(ProcessError::InputNotFound(input.display().to_string()));
        }
        let model = engine_call(&mut self.backend, |b| models::load_library_models(b))
            .find(&options.model)
            .ok_or_else(|| ProcessError::UnknownModel(options.model.clone()))?;

        let data = fs::read(input)?;
        let input_dimensions = probe_dimensions(input);
        log::info!(
            "Submitting {} ({} bytes) with model {model} at x{}",
            input.display(),
            data.len(),
            options.scale
        );

        let job = Job {
            data: &data,
            model,
            backend_slot: SUBMIT_BACKEND_SLOT,
            scale: options.scale,
            tile_size: options.tile_size,
            format: &options.output_format,
        };
        let submitted = engine_call(&mut self.backend, |b| b.add(&job))?;
        if submitted <= 0 {
            log::error!("Engine rejected the job (add returned {submitted})");
            return Err(ProcessError::SubmitFailed);
        }

        let outcome = self.await_result().and_then(|result| {
            write_output(&result, output)?;
            Ok(ProcessReport {
                output_path: output.to_path_buf(),
                elapsed_secs: result.elapsed_secs,
                format: result.format,
                result_id: result.result_id,
                device,
                input_dimensions,
            })
        });
        self.shutdown();
        outcome
    }

    fn await_result(&mut self) -> ProcessResult<JobOutput> {
        let attempts = self.poll.max_attempts;
        for attempt in 1..=attempts {
            if attempt > 1 {
                thread::sleep(self.poll.interval);
            }
            match engine_call(&mut self.backend, |b| b.load(POLL_SLOT))? {
                Some(result) if !result.is_empty() => {
                    log::debug!("Result {} received after {attempt} poll(s)", result.result_id);
                    return Ok(result);
                }
                _ => log::debug!("No result yet ({attempt}/{attempts})"),
            }
        }
        log::error!("No result after {attempts} polls");
        Err(ProcessError::Timeout)
    }

    fn shutdown(&mut self) {
        if let Err(err) = engine_call(&mut self.backend, SrBackend::stop) {
            log::warn!("Failed to stop engine session: {err}");
        }
    }
}

/// Runs one engine primitive with console output suppressed.
fn engine_call<B: SrBackend, T>(backend: &mut B, call: impl FnOnce(&mut B) -> T) -> T {
    suppress_output(|| call(backend))
}

/// Best-effort read of the input's pixel dimensions.
fn probe_dimensions(input: &Path) -> Option<(u32, u32)> {
    match image_rs::image_dimensions(input) {
        Ok((width, height)) => {
            log::debug!("Input is {width}x{height}");
            Some((width, height))
        }
        Err(err) => {
            log::debug!("Could not read input dimensions: {err}");
            None
        }
    }
}

/// Writes `result` to `{result_id}.{format}` beside `output`, then renames it.
///
/// An existing file under the temporary name is left untouched and the write
/// fails, unless that name is the output itself.
fn write_output(result: &JobOutput, output: &Path) -> ProcessResult<()> {
    let temp = temp_output_path(result, output);
    let temp_is_output = temp.file_name() == output.file_name();
    let mut file = OpenOptions::new()
        .write(true)
        .create(temp_is_output)
        .truncate(temp_is_output)
        .create_new(!temp_is_output)
        .open(&temp)
        .map_err(|err| match err.kind() {
            io::ErrorKind::AlreadyExists => {
                ProcessError::Io(format!("{} already exists", temp.display()))
            }
            _ => err.into(),
        })?;
    if let Err(err) = file.write_all(&result.data) {
        drop(file);
        let _ = fs::remove_file(&temp);
        return Err(err.into());
    }
    drop(file);
    if !temp_is_output {
        if let Err(err) = fs::rename(&temp, output) {
            let _ = fs::remove_file(&temp);
            return Err(err.into());
        }
    }
    log::info!("Wrote {} ({} bytes)", output.display(), result.data.len());
    Ok(())
}

fn temp_output_path(result: &JobOutput, output: &Path) -> PathBuf {
    let dir = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    dir.join(format!("{}.{}", result.result_id, result.format))
}
