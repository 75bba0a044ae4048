// SPDX-License-Identifier: MPL-2.0
//! `sr_bindings` drives the `sr_vulkan` super-resolution engine (Real-CUGAN,
//! Real-ESRGAN, RealSR and waifu2x networks).
//!
//! It resolves model names to engine model IDs, brings the engine up on a GPU
//! or the CPU, submits one image, polls for the result and writes it to disk.
//! The engine itself is reached through the [`SrBackend`] port; the
//! `sr-vulkan` feature provides the real adapter.
//!
//! [`SrBackend`]: application::port::SrBackend

#![doc(html_root_url = "https://docs.rs/sr_bindings/0.2.0")]

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod media;
pub mod models;
pub mod paths;

#[cfg(test)]
mod test_utils;

pub use api::{process_image_with, ProcessRequest};
#[cfg(feature = "sr-vulkan")]
pub use api::process_image;
