//! Per-frame drawing and the loop that drives it.

mod driver;
mod schedule;

pub use driver::FrameDriver;
pub use schedule::{FrameLoop, FrameScheduler, LoopHandle};
