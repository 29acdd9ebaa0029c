//! Pointer tracking.
//!
//! Holds the fixed-size coordinate array streamed to the `pointers` uniform.

mod buffer;
mod tracker;

pub use buffer::{MAX_POINTERS, POINTER_COMPONENTS, POINTER_SCALARS, PointerBuffer};
pub use tracker::PointerTracker;
