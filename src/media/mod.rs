// SPDX-License-Identifier: MPL-2.0
//! Image processing on top of the engine port.

pub mod upscale;

pub use upscale::{
    ImageProcessor, PollPolicy, ProcessError, ProcessOptions, ProcessReport, ProcessResult,
    ProcessorState,
};
