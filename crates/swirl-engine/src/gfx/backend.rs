use anyhow::Result;

use super::Color;

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub fn label(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
        }
    }
}

/// Outcome of a compile or link step: a status flag plus the info log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildStatus {
    pub success: bool,
    pub log: String,
}

impl BuildStatus {
    pub fn ok() -> Self {
        Self {
            success: true,
            log: String::new(),
        }
    }

    pub fn failed(log: impl Into<String>) -> Self {
        Self {
            success: false,
            log: log.into(),
        }
    }
}

/// Resolved vertex attribute location.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttribLocation(pub u32);

/// Resolved uniform location.
///
/// Writes through a `None` location are ignored, matching the graphics API
/// contract for names the program does not expose.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub u32);

/// Capability interface over a GPU context.
///
/// Everything that touches the GPU goes through this trait, so setup and the
/// per-frame path can run against a test double. The call surface mirrors an
/// immediate-mode graphics API: resources are created and destroyed
/// explicitly, state is bound, then a draw is issued.
///
/// Resource creation may fail (`Err`). Compile and link never fail at the call
/// level; they report through [`BuildStatus`] instead.
pub trait Backend {
    type Stage;
    type Program;
    type Buffer;

    fn create_stage(&mut self, kind: StageKind) -> Result<Self::Stage>;
    fn compile_stage(&mut self, stage: &mut Self::Stage, source: &str) -> BuildStatus;
    fn destroy_stage(&mut self, stage: Self::Stage);

    fn create_program(&mut self) -> Result<Self::Program>;
    fn link_program(
        &mut self,
        program: &mut Self::Program,
        vertex: &Self::Stage,
        fragment: &Self::Stage,
    ) -> BuildStatus;
    fn attrib_location(&self, program: &Self::Program, name: &str) -> Option<AttribLocation>;
    fn uniform_location(&self, program: &Self::Program, name: &str) -> Option<UniformLocation>;
    fn destroy_program(&mut self, program: Self::Program);

    /// Uploads static vertex data.
    fn create_vertex_buffer(&mut self, vertices: &[f32]) -> Result<Self::Buffer>;
    fn destroy_buffer(&mut self, buffer: Self::Buffer);

    fn set_viewport(&mut self, width: u32, height: u32);
    fn clear(&mut self, color: Color);
    fn use_program(&mut self, program: &Self::Program);
    fn bind_vertex_buffer(
        &mut self,
        buffer: &Self::Buffer,
        attrib: Option<AttribLocation>,
        components: u32,
    );

    fn uniform_f32(&mut self, location: Option<UniformLocation>, value: f32);
    fn uniform_vec2(&mut self, location: Option<UniformLocation>, value: [f32; 2]);
    /// Writes a flat `x, y, x, y, ...` slice into a `vec2` array uniform.
    fn uniform_vec2_array(&mut self, location: Option<UniformLocation>, values: &[f32]);

    fn draw_triangles(&mut self, first: u32, count: u32);
}
