//! Time subsystem.
//!
//! Provides stable, testable frame timing without coupling to the runtime:
//! - a `ClockSource` supplies elapsed time (real or hand-driven)
//! - a `FrameClock` turns readings into monotonic `FrameTime` snapshots

mod clock;
mod frame_clock;

pub use clock::{ClockSource, ManualClock, SystemClock};
pub use frame_clock::{FrameClock, FrameTime};
