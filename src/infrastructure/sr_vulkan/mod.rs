// SPDX-License-Identifier: MPL-2.0
//! `sr_vulkan` engine adapter implementing the [`SrBackend`] port.
//!
//! The engine ships as a CPython extension module, so the adapter embeds the
//! interpreter through `pyo3` and calls the module's functions directly.
//! The module is imported on every call; CPython caches it in `sys.modules`
//! after the first import.
//!
//! [`SrBackend`]: crate::application::port::SrBackend

use std::path::Path;

use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict, PyInt, PyModule};

use crate::application::port::{BackendError, Job, JobOutput, SrBackend};
use crate::models::CONSTANT_PREFIX;

/// Python import path of the engine module.
pub const ENGINE_MODULE: &str = "sr_vulkan.sr_vulkan";

/// Engine adapter backed by the `sr_vulkan` extension module.
///
/// # Example
///
/// ```ignore
/// use sr_bindings::infrastructure::sr_vulkan::SrVulkanBackend;
/// use sr_bindings::media::upscale::ImageProcessor;
///
/// let mut processor = ImageProcessor::new(SrVulkanBackend::new());
/// processor.init()?;
/// ```
#[derive(Debug, Clone)]
pub struct SrVulkanBackend {
    module: String,
}

impl Default for SrVulkanBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SrVulkanBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::with_module(ENGINE_MODULE)
    }

    /// Uses a different import path, e.g. a vendored build of the engine.
    #[must_use]
    pub fn with_module(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
        }
    }

    /// Imports the engine module and runs `f` against it.
    fn with_engine<T>(
        &self,
        call: &'static str,
        f: impl for<'py> FnOnce(&Bound<'py, PyModule>) -> PyResult<T>,
    ) -> Result<T, BackendError> {
        Python::attach(|py| {
            let module = py
                .import(self.module.as_str())
                .map_err(|e| BackendError::Unavailable(e.to_string()))?;
            f(&module).map_err(|e| BackendError::call_failed(call, e.to_string()))
        })
    }
}

impl SrBackend for SrVulkanBackend {
    fn init(&mut self) -> Result<i32, BackendError> {
        self.with_engine("init", |m| m.call_method0("init")?.extract())
    }

    fn init_set(&mut self, gpu_id: i32, cpu_cores: Option<u32>) -> Result<i32, BackendError> {
        self.with_engine("initSet", |m| {
            let status = match cpu_cores {
                Some(cores) => m.call_method1("initSet", (gpu_id, cores))?,
                None => m.call_method1("initSet", (gpu_id,))?,
            };
            status.extract()
        })
    }

    fn cpu_core_count(&mut self) -> Result<u32, BackendError> {
        self.with_engine("getCpuCoreNum", |m| m.call_method0("getCpuCoreNum")?.extract())
    }

    fn model_constants(&mut self) -> Result<Vec<(String, i32)>, BackendError> {
        self.with_engine("dir", |m| {
            let mut constants = Vec::new();
            for attr in m.dir()?.iter() {
                let name: String = attr.extract()?;
                if !name.starts_with(CONSTANT_PREFIX) {
                    continue;
                }
                // Unreadable or non-integer attributes are not model ids.
                let Ok(value) = m.getattr(name.as_str()) else {
                    continue;
                };
                if !value.is_instance_of::<PyInt>() {
                    continue;
                }
                if let Ok(id) = value.extract::<i32>() {
                    constants.push((name, id));
                }
            }
            Ok(constants)
        })
    }

    fn set_model_path(&mut self, path: &Path) -> Result<(), BackendError> {
        let path = path.to_string_lossy().into_owned();
        self.with_engine("setModelPath", |m| {
            m.call_method1("setModelPath", (path,))?;
            Ok(())
        })
    }

    fn add(&mut self, job: &Job<'_>) -> Result<i64, BackendError> {
        self.with_engine("add", |m| {
            let py = m.py();
            let kwargs = PyDict::new(py);
            kwargs.set_item("tileSize", job.tile_size)?;
            kwargs.set_item("format", job.format)?;
            let data = PyBytes::new(py, job.data);
            m.call_method(
                "add",
                (data, job.model.value(), job.backend_slot, job.scale),
                Some(&kwargs),
            )?
            .extract()
        })
    }

    fn load(&mut self, slot: i32) -> Result<Option<JobOutput>, BackendError> {
        self.with_engine("load", |m| {
            let info = m.call_method1("load", (slot,))?;
            if info.is_none() || !info.is_truthy()? {
                return Ok(Ok(None));
            }
            Ok(parse_result(&info))
        })?
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        self.with_engine("stop", |m| {
            m.call_method0("stop")?;
            Ok(())
        })
    }
}

/// Unpacks a `(bytes, format, result_id, elapsed_secs)` tuple from `load`.
fn parse_result(info: &Bound<'_, PyAny>) -> Result<Option<JobOutput>, BackendError> {
    let unexpected = |e: PyErr| BackendError::UnexpectedResponse(e.to_string());
    let (data, format, result_id, elapsed_secs): (Bound<'_, PyAny>, String, Bound<'_, PyAny>, f64) =
        info.extract().map_err(unexpected)?;
    if !data.is_truthy().map_err(unexpected)? {
        return Ok(None);
    }
    let data = data
        .downcast::<PyBytes>()
        .map_err(|e| unexpected(e.into()))?
        .as_bytes()
        .to_vec();
    Ok(Some(JobOutput {
        data,
        format,
        result_id: result_id.to_string(),
        elapsed_secs,
    }))
}
