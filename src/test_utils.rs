// SPDX-License-Identifier: MPL-2.0
//! Test utilities: float comparisons and a scripted engine double.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

// Re-export approx macros for convenient use in tests
pub use approx::assert_abs_diff_eq;

use crate::application::port::{BackendError, Job, JobOutput, SrBackend};
use crate::domain::model::ModelId;
use crate::models::catalog::MODEL_CONSTANTS;

/// One recorded call into [`MockBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Init,
    InitSet(i32, Option<u32>),
    CpuCoreCount,
    SetModelPath(PathBuf),
    Add {
        model: ModelId,
        slot: i32,
        scale: f32,
        tile_size: u32,
        format: String,
        /// Length of the submitted data.
        len: usize,
    },
    Load(i32),
    Stop,
}

/// Engine double answering from fixed statuses and a queue of poll results.
///
/// Once `polls` is drained every further `load` returns `None`.
#[derive(Debug)]
pub struct MockBackend {
    pub init_status: i32,
    pub gpu_status: i32,
    pub cpu_status: i32,
    pub cpu_cores: u32,
    pub add_result: i64,
    /// Answer to `model_constants`; the built-in table by default.
    pub model_constants: Vec<(String, i32)>,
    pub polls: VecDeque<Option<JobOutput>>,
    /// Primitive that raises a binding error instead of answering.
    pub fail_on: Option<&'static str>,
    pub calls: Vec<Call>,
}

impl MockBackend {
    /// A healthy engine with one GPU and 8 CPU cores.
    pub fn new() -> Self {
        Self {
            init_status: 0,
            gpu_status: 0,
            cpu_status: 0,
            cpu_cores: 8,
            add_result: 1,
            model_constants: MODEL_CONSTANTS
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect(),
            polls: VecDeque::new(),
            fail_on: None,
            calls: Vec::new(),
        }
    }

    pub fn with_polls(mut self, polls: Vec<Option<JobOutput>>) -> Self {
        self.polls = polls.into();
        self
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    fn record(&mut self, name: &'static str, call: Call) -> Result<(), BackendError> {
        self.calls.push(call);
        if self.fail_on == Some(name) {
            return Err(BackendError::call_failed(name, "scripted failure"));
        }
        Ok(())
    }
}

impl SrBackend for MockBackend {
    fn init(&mut self) -> Result<i32, BackendError> {
        self.record("init", Call::Init)?;
        Ok(self.init_status)
    }

    fn init_set(&mut self, gpu_id: i32, cpu_cores: Option<u32>) -> Result<i32, BackendError> {
        self.record("initSet", Call::InitSet(gpu_id, cpu_cores))?;
        Ok(if cpu_cores.is_some() {
            self.cpu_status
        } else {
            self.gpu_status
        })
    }

    fn cpu_core_count(&mut self) -> Result<u32, BackendError> {
        self.record("getCpuCoreNum", Call::CpuCoreCount)?;
        Ok(self.cpu_cores)
    }

    fn model_constants(&mut self) -> Result<Vec<(String, i32)>, BackendError> {
        if self.fail_on == Some("dir") {
            return Err(BackendError::call_failed("dir", "scripted failure"));
        }
        Ok(self.model_constants.clone())
    }

    fn set_model_path(&mut self, path: &Path) -> Result<(), BackendError> {
        self.record("setModelPath", Call::SetModelPath(path.to_path_buf()))
    }

    fn add(&mut self, job: &Job<'_>) -> Result<i64, BackendError> {
        self.record(
            "add",
            Call::Add {
                model: job.model,
                slot: job.backend_slot,
                scale: job.scale,
                tile_size: job.tile_size,
                format: job.format.to_string(),
                len: job.data.len(),
            },
        )?;
        Ok(self.add_result)
    }

    fn load(&mut self, slot: i32) -> Result<Option<JobOutput>, BackendError> {
        self.record("load", Call::Load(slot))?;
        Ok(self.polls.pop_front().flatten())
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        self.record("stop", Call::Stop)
    }
}
