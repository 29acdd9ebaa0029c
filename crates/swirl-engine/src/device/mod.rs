//! GPU device + surface management.
//!
//! Creates the wgpu device and queue, configures the window surface, and
//! acquires frames for the runtime to encode into.

mod gpu;
mod init;

pub use gpu::{Gpu, GpuFrame, SurfaceErrorAction};
pub use init::GpuInit;
