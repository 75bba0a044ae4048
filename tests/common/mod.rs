// SPDX-License-Identifier: MPL-2.0
//! Shared engine double for integration tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use sr_bindings::application::port::{BackendError, Job, JobOutput, SrBackend};
use sr_bindings::models::catalog::MODEL_CONSTANTS;

/// Log of primitive names, shared with the test after the backend is moved.
pub type CallLog = Rc<RefCell<Vec<String>>>;

/// Healthy engine that answers polls from a script and records every call.
pub struct RecordingBackend {
    pub polls: VecDeque<Option<JobOutput>>,
    pub log: CallLog,
}

impl RecordingBackend {
    pub fn new(polls: Vec<Option<JobOutput>>) -> (Self, CallLog) {
        let log = CallLog::default();
        let backend = Self {
            polls: polls.into(),
            log: Rc::clone(&log),
        };
        (backend, log)
    }

    fn record(&self, call: &str) {
        self.log.borrow_mut().push(call.to_string());
    }
}

impl SrBackend for RecordingBackend {
    fn init(&mut self) -> Result<i32, BackendError> {
        self.record("init");
        Ok(0)
    }

    fn init_set(&mut self, _gpu_id: i32, _cpu_cores: Option<u32>) -> Result<i32, BackendError> {
        self.record("initSet");
        Ok(0)
    }

    fn cpu_core_count(&mut self) -> Result<u32, BackendError> {
        self.record("getCpuCoreNum");
        Ok(4)
    }

    fn model_constants(&mut self) -> Result<Vec<(String, i32)>, BackendError> {
        self.record("dir");
        Ok(MODEL_CONSTANTS
            .iter()
            .map(|(name, value)| ((*name).to_string(), *value))
            .collect())
    }

    fn set_model_path(&mut self, _path: &Path) -> Result<(), BackendError> {
        self.record("setModelPath");
        Ok(())
    }

    fn add(&mut self, _job: &Job<'_>) -> Result<i64, BackendError> {
        self.record("add");
        Ok(1)
    }

    fn load(&mut self, _slot: i32) -> Result<Option<JobOutput>, BackendError> {
        self.record("load");
        Ok(self.polls.pop_front().flatten())
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        self.record("stop");
        Ok(())
    }
}

pub fn result(data: &[u8], elapsed_secs: f64) -> JobOutput {
    JobOutput {
        data: data.to_vec(),
        format: "webp".to_string(),
        result_id: "1001".to_string(),
        elapsed_secs,
    }
}

pub fn count(log: &CallLog, call: &str) -> usize {
    log.borrow().iter().filter(|c| *c == call).count()
}
