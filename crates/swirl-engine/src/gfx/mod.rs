//! Graphics capability layer.
//!
//! `Backend` is the seam between the viewer and the GPU. The production
//! implementation is [`WgpuBackend`]; tests use a recording double.

mod backend;
mod color;
pub mod reflect;
mod wgpu_backend;

#[cfg(test)]
pub(crate) mod recording;

pub use backend::{AttribLocation, Backend, BuildStatus, StageKind, UniformLocation};
pub use color::Color;
pub use wgpu_backend::{WgpuBackend, WgpuBuffer, WgpuProgram, WgpuStage};
