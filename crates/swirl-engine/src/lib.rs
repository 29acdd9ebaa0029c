//! Swirl engine crate.
//!
//! Drives a single full-screen fragment shader: builds the program, streams
//! the clock and pointer state into it every frame, and turns native mouse
//! and touch input into pointer coordinates.

pub mod coords;
pub mod device;
pub mod frame;
pub mod geometry;
pub mod gfx;
pub mod input;
pub mod logging;
pub mod pointer;
pub mod program;
pub mod time;
pub mod window;
