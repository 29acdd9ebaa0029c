//! Static geometry: the full-screen quad the fragment stage is run over.

mod quad;

pub use quad::{FULLSCREEN_QUAD, GeometryHandle, QUAD_COMPONENTS, QUAD_VERTEX_COUNT};
