//! Program builder.
//!
//! Compiles the vertex and fragment stages, links them and resolves the
//! attribute and uniform locations the frame driver writes. Build failures
//! are logged and swallowed so the viewer stays interactive.

mod builder;
mod error;

pub use builder::{ProgramHandle, ProgramLocations, ShaderSources, build_program, compile, link};
pub use error::BuildFailure;
