//! Input subsystem.
//!
//! Public API is platform-agnostic. The runtime translates native window
//! events into `InputEvent`s through [`platform`] and feeds them to an
//! [`InputAdapter`].

mod adapter;
pub mod platform;
mod types;

pub use adapter::InputAdapter;
pub use types::{InputEvent, PointerPrecision};
