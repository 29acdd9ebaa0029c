use std::fmt;

use crate::gfx::StageKind;

/// A shader build step that reported failure.
///
/// Build failures are diagnostics, not errors in the control-flow sense: they
/// are logged and the viewer keeps running with whatever the GPU makes of the
/// broken program.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildFailure {
    ShaderCompile { stage: StageKind, log: String },
    ProgramLink { log: String },
}

impl fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildFailure::ShaderCompile { stage, log } => {
                write!(f, "{} shader failed to compile:\n{}", stage.label(), log)
            }
            BuildFailure::ProgramLink { log } => write!(f, "program failed to link:\n{log}"),
        }
    }
}

impl std::error::Error for BuildFailure {}
