use anyhow::{Context, Result};

use crate::gfx::{AttribLocation, Backend, StageKind, UniformLocation};

use super::error::BuildFailure;

/// Vertex and fragment source text for the viewer program.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// Locations the frame driver writes every frame.
///
/// A `None` entry means the program does not expose that name; writes to it
/// are dropped by the backend.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ProgramLocations {
    pub position: Option<AttribLocation>,
    pub time: Option<UniformLocation>,
    pub resolution: Option<UniformLocation>,
    pub pointers: Option<UniformLocation>,
}

/// A linked (or link-attempted) program plus its resolved locations.
pub struct ProgramHandle<P> {
    program: P,
    locations: ProgramLocations,
    failures: Vec<BuildFailure>,
}

impl<P> ProgramHandle<P> {
    #[inline]
    pub fn program(&self) -> &P {
        &self.program
    }

    #[inline]
    pub fn locations(&self) -> ProgramLocations {
        self.locations
    }

    /// Compile and link failures recorded while building, in order.
    #[inline]
    pub fn failures(&self) -> &[BuildFailure] {
        &self.failures
    }

    #[inline]
    pub fn is_healthy(&self) -> bool {
        self.failures.is_empty()
    }

    /// Releases the GPU program.
    pub fn destroy<B>(self, backend: &mut B)
    where
        B: Backend<Program = P>,
    {
        backend.destroy_program(self.program);
    }
}

/// Creates and compiles one stage.
///
/// A compile failure is logged and returned alongside the stage; the stage is
/// still usable as a link input (the link will then fail as well).
pub fn compile<B: Backend>(
    backend: &mut B,
    source: &str,
    kind: StageKind,
) -> Result<(B::Stage, Option<BuildFailure>)> {
    let mut stage = backend
        .create_stage(kind)
        .with_context(|| format!("failed to create {} stage", kind.label()))?;

    let status = backend.compile_stage(&mut stage, source);
    if status.success {
        log::debug!("{} stage compiled", kind.label());
        return Ok((stage, None));
    }

    let failure = BuildFailure::ShaderCompile {
        stage: kind,
        log: status.log,
    };
    log::error!("{failure}");
    Ok((stage, Some(failure)))
}

/// Links two stages into a new program. A link failure is logged and returned
/// alongside the program.
pub fn link<B: Backend>(
    backend: &mut B,
    vertex: &B::Stage,
    fragment: &B::Stage,
) -> Result<(B::Program, Option<BuildFailure>)> {
    let mut program = backend
        .create_program()
        .context("failed to create program")?;

    let status = backend.link_program(&mut program, vertex, fragment);
    if status.success {
        log::debug!("program linked");
        return Ok((program, None));
    }

    let failure = BuildFailure::ProgramLink { log: status.log };
    log::error!("{failure}");
    Ok((program, Some(failure)))
}

/// Compiles both stages, links them and resolves the viewer's locations.
///
/// Only resource creation failures are returned as errors. Compile and link
/// failures are logged, recorded on the handle and otherwise ignored.
pub fn build_program<B: Backend>(
    backend: &mut B,
    sources: &ShaderSources,
) -> Result<ProgramHandle<B::Program>> {
    let mut failures = Vec::new();

    let (vs, vs_failure) = compile(backend, &sources.vertex, StageKind::Vertex)?;
    failures.extend(vs_failure);

    let (fs, fs_failure) = match compile(backend, &sources.fragment, StageKind::Fragment) {
        Ok(v) => v,
        Err(e) => {
            backend.destroy_stage(vs);
            return Err(e);
        }
    };
    failures.extend(fs_failure);

    let linked = link(backend, &vs, &fs);
    backend.destroy_stage(vs);
    backend.destroy_stage(fs);

    let (program, link_failure) = linked?;
    failures.extend(link_failure);

    let locations = ProgramLocations {
        position: backend.attrib_location(&program, "position"),
        time: backend.uniform_location(&program, "time"),
        resolution: backend.uniform_location(&program, "resolution"),
        pointers: backend.uniform_location(&program, "pointers"),
    };

    if failures.is_empty() {
        log::info!("shader program ready");
    }
    log::debug!("program locations: {locations:?}");

    Ok(ProgramHandle {
        program,
        locations,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::recording::{Call, RecordingBackend};

    fn sources() -> ShaderSources {
        ShaderSources::new("vertex source", "fragment source")
    }

    #[test]
    fn healthy_build_resolves_all_locations() {
        let mut backend = RecordingBackend::default();
        let handle = build_program(&mut backend, &sources()).unwrap();

        assert!(handle.is_healthy());
        assert_eq!(
            handle.locations(),
            ProgramLocations {
                position: Some(AttribLocation(0)),
                time: Some(UniformLocation(0)),
                resolution: Some(UniformLocation(1)),
                pointers: Some(UniformLocation(2)),
            }
        );
    }

    #[test]
    fn stages_are_compiled_linked_then_released() {
        let mut backend = RecordingBackend::default();
        build_program(&mut backend, &sources()).unwrap();

        assert_eq!(
            backend.calls,
            [
                Call::CreateStage(StageKind::Vertex),
                Call::CompileStage(StageKind::Vertex),
                Call::CreateStage(StageKind::Fragment),
                Call::CompileStage(StageKind::Fragment),
                Call::CreateProgram,
                Call::LinkProgram,
                Call::DestroyStage(StageKind::Vertex),
                Call::DestroyStage(StageKind::Fragment),
            ]
        );
    }

    #[test]
    fn compile_failure_is_recorded_and_link_still_runs() {
        let mut backend = RecordingBackend {
            reject_compile: Some(StageKind::Fragment),
            ..Default::default()
        };
        let handle = build_program(&mut backend, &sources()).unwrap();

        assert_eq!(backend.count(|c| *c == Call::LinkProgram), 1);
        assert_eq!(handle.failures().len(), 2);
        assert!(matches!(
            &handle.failures()[0],
            BuildFailure::ShaderCompile { stage: StageKind::Fragment, log } if log.contains("unexpected token")
        ));
        assert!(matches!(handle.failures()[1], BuildFailure::ProgramLink { .. }));
    }

    #[test]
    fn empty_source_fails_to_compile() {
        let mut backend = RecordingBackend::default();
        let (_stage, failure) = compile(&mut backend, "   ", StageKind::Vertex).unwrap();
        assert!(matches!(failure, Some(BuildFailure::ShaderCompile { stage: StageKind::Vertex, .. })));
    }

    #[test]
    fn link_failure_leaves_locations_unresolved() {
        let mut backend = RecordingBackend {
            reject_link: true,
            ..Default::default()
        };
        let handle = build_program(&mut backend, &sources()).unwrap();

        assert_eq!(handle.failures(), [BuildFailure::ProgramLink { log: "error: program did not link".into() }]);
        assert_eq!(handle.locations(), ProgramLocations::default());
    }

    #[test]
    fn missing_uniform_name_resolves_to_none() {
        let mut backend = RecordingBackend {
            uniforms: vec!["time", "resolution"],
            ..Default::default()
        };
        let handle = build_program(&mut backend, &sources()).unwrap();

        assert!(handle.is_healthy());
        assert_eq!(handle.locations().pointers, None);
        assert_eq!(handle.locations().time, Some(UniformLocation(0)));
    }

    #[test]
    fn program_creation_failure_propagates_and_releases_stages() {
        let mut backend = RecordingBackend {
            fail_create_program: true,
            ..Default::default()
        };
        let err = build_program(&mut backend, &sources()).err().unwrap();

        assert!(format!("{err:#}").contains("program allocation refused"));
        assert_eq!(backend.count(|c| matches!(c, Call::DestroyStage(_))), 2);
    }

    #[test]
    fn failure_display_includes_stage_and_log() {
        let f = BuildFailure::ShaderCompile {
            stage: StageKind::Vertex,
            log: "1:4: bad".into(),
        };
        assert_eq!(f.to_string(), "vertex shader failed to compile:\n1:4: bad");
    }
}
