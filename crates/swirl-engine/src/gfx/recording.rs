//! Recording [`Backend`] test double.
//!
//! Records every call, exposes a configurable set of attribute and uniform
//! names, and can be told to fail at creation, compile or link time.

use anyhow::Result;

use super::{AttribLocation, Backend, BuildStatus, Color, StageKind, UniformLocation};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateStage(StageKind),
    CompileStage(StageKind),
    DestroyStage(StageKind),
    CreateProgram,
    LinkProgram,
    DestroyProgram,
    CreateBuffer(usize),
    DestroyBuffer,
    Viewport(u32, u32),
    Clear(Color),
    UseProgram { linked: bool },
    BindVertexBuffer { attrib: Option<AttribLocation>, components: u32 },
    UniformF32(Option<UniformLocation>, f32),
    UniformVec2(Option<UniformLocation>, [f32; 2]),
    UniformVec2Array(Option<UniformLocation>, Vec<f32>),
    Draw { first: u32, count: u32 },
}

pub(crate) struct RecStage {
    kind: StageKind,
    compiled: bool,
}

pub(crate) struct RecProgram {
    linked: bool,
}

pub(crate) struct RecBuffer;

pub(crate) struct RecordingBackend {
    pub calls: Vec<Call>,
    pub attribs: Vec<&'static str>,
    pub uniforms: Vec<&'static str>,
    pub reject_compile: Option<StageKind>,
    pub reject_link: bool,
    pub fail_create_program: bool,
    pub fail_create_buffer: bool,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            attribs: vec!["position"],
            uniforms: vec!["time", "resolution", "pointers"],
            reject_compile: None,
            reject_link: false,
            fail_create_program: false,
            fail_create_buffer: false,
        }
    }
}

impl RecordingBackend {
    /// Calls recorded since the most recent `clear`, inclusive.
    pub fn last_frame(&self) -> &[Call] {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, Call::Clear(_)))
            .unwrap_or(0);
        &self.calls[start..]
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl Backend for RecordingBackend {
    type Stage = RecStage;
    type Program = RecProgram;
    type Buffer = RecBuffer;

    fn create_stage(&mut self, kind: StageKind) -> Result<RecStage> {
        self.calls.push(Call::CreateStage(kind));
        Ok(RecStage { kind, compiled: false })
    }

    fn compile_stage(&mut self, stage: &mut RecStage, source: &str) -> BuildStatus {
        self.calls.push(Call::CompileStage(stage.kind));
        if self.reject_compile == Some(stage.kind) || source.trim().is_empty() {
            stage.compiled = false;
            return BuildStatus::failed("error: 1:1: unexpected token");
        }
        stage.compiled = true;
        BuildStatus::ok()
    }

    fn destroy_stage(&mut self, stage: RecStage) {
        self.calls.push(Call::DestroyStage(stage.kind));
    }

    fn create_program(&mut self) -> Result<RecProgram> {
        self.calls.push(Call::CreateProgram);
        anyhow::ensure!(!self.fail_create_program, "program allocation refused");
        Ok(RecProgram { linked: false })
    }

    fn link_program(
        &mut self,
        program: &mut RecProgram,
        vertex: &RecStage,
        fragment: &RecStage,
    ) -> BuildStatus {
        self.calls.push(Call::LinkProgram);
        program.linked = vertex.compiled && fragment.compiled && !self.reject_link;
        if program.linked {
            BuildStatus::ok()
        } else {
            BuildStatus::failed("error: program did not link")
        }
    }

    fn attrib_location(&self, program: &RecProgram, name: &str) -> Option<AttribLocation> {
        if !program.linked {
            return None;
        }
        self.attribs
            .iter()
            .position(|n| *n == name)
            .map(|i| AttribLocation(i as u32))
    }

    fn uniform_location(&self, program: &RecProgram, name: &str) -> Option<UniformLocation> {
        if !program.linked {
            return None;
        }
        self.uniforms
            .iter()
            .position(|n| *n == name)
            .map(|i| UniformLocation(i as u32))
    }

    fn destroy_program(&mut self, _program: RecProgram) {
        self.calls.push(Call::DestroyProgram);
    }

    fn create_vertex_buffer(&mut self, vertices: &[f32]) -> Result<RecBuffer> {
        self.calls.push(Call::CreateBuffer(vertices.len()));
        anyhow::ensure!(!self.fail_create_buffer, "buffer allocation refused");
        Ok(RecBuffer)
    }

    fn destroy_buffer(&mut self, _buffer: RecBuffer) {
        self.calls.push(Call::DestroyBuffer);
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::Viewport(width, height));
    }

    fn clear(&mut self, color: Color) {
        self.calls.push(Call::Clear(color));
    }

    fn use_program(&mut self, program: &RecProgram) {
        self.calls.push(Call::UseProgram { linked: program.linked });
    }

    fn bind_vertex_buffer(
        &mut self,
        _buffer: &RecBuffer,
        attrib: Option<AttribLocation>,
        components: u32,
    ) {
        self.calls.push(Call::BindVertexBuffer { attrib, components });
    }

    fn uniform_f32(&mut self, location: Option<UniformLocation>, value: f32) {
        self.calls.push(Call::UniformF32(location, value));
    }

    fn uniform_vec2(&mut self, location: Option<UniformLocation>, value: [f32; 2]) {
        self.calls.push(Call::UniformVec2(location, value));
    }

    fn uniform_vec2_array(&mut self, location: Option<UniformLocation>, values: &[f32]) {
        self.calls.push(Call::UniformVec2Array(location, values.to_vec()));
    }

    fn draw_triangles(&mut self, first: u32, count: u32) {
        self.calls.push(Call::Draw { first, count });
    }
}
