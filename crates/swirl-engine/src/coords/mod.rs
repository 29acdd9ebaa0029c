//! Coordinate types shared by input handling and the frame driver.
//!
//! Two spaces are in play:
//! - screen space: logical pixels, origin top-left, +Y down (input events)
//! - device space: physical pixels, origin bottom-left, +Y up (shader uniforms)
//!
//! The pointer tracker converts from the first to the second.

mod metrics;
mod point;

pub use metrics::SurfaceMetrics;
pub use point::ScreenPoint;
