//! WGSL compilation and reflection.
//!
//! Compile = parse + validate with naga. Link = check that a vertex and a
//! fragment module fit together and collect the layout the pipeline needs:
//! entry points, vertex inputs and named uniform globals.

use std::collections::BTreeSet;

/// A WGSL module that parsed and validated.
#[derive(Debug, Clone)]
pub struct CompiledModule {
    pub source: String,
    pub module: naga::Module,
}

/// A named `var<uniform>` global in bind group 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformSlot {
    pub name: String,
    pub binding: u32,
    /// Size of the bound type in bytes.
    pub size: u32,
    /// Element stride when the uniform is an array.
    pub stride: Option<u32>,
}

/// A location-bound vertex entry point argument of `f32` components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexInput {
    pub name: String,
    pub location: u32,
    pub components: u32,
}

/// Everything a render pipeline needs from a linked vertex/fragment pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramLayout {
    pub vertex_entry: String,
    pub fragment_entry: String,
    /// Sorted by binding.
    pub uniforms: Vec<UniformSlot>,
    /// Sorted by location.
    pub inputs: Vec<VertexInput>,
}

impl ProgramLayout {
    pub fn uniform(&self, name: &str) -> Option<&UniformSlot> {
        self.uniforms.iter().find(|u| u.name == name)
    }

    pub fn input(&self, name: &str) -> Option<&VertexInput> {
        self.inputs.iter().find(|i| i.name == name)
    }
}

/// Parses and validates WGSL. On failure returns the rendered diagnostic.
pub fn compile_wgsl(source: &str) -> Result<CompiledModule, String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    validator
        .validate(&module)
        .map_err(|e| error_chain(&e))?;

    Ok(CompiledModule {
        source: source.to_string(),
        module,
    })
}

/// Checks that `vertex` and `fragment` form a usable program.
pub fn link_modules(vertex: &naga::Module, fragment: &naga::Module) -> Result<ProgramLayout, String> {
    let vs_entry = entry_point(vertex, naga::ShaderStage::Vertex)
        .ok_or("vertex stage has no @vertex entry point")?;
    let fs_entry = entry_point(fragment, naga::ShaderStage::Fragment)
        .ok_or("fragment stage has no @fragment entry point")?;

    if fs_entry.function.result.is_none() {
        return Err(format!("fragment entry point `{}` writes no color output", fs_entry.name));
    }

    let written = output_locations(vertex, vs_entry);
    for loc in input_locations(fragment, fs_entry) {
        if !written.contains(&loc) {
            return Err(format!(
                "fragment input @location({loc}) is not written by the vertex stage"
            ));
        }
    }

    let mut uniforms = uniform_slots(vertex)?;
    for slot in uniform_slots(fragment)? {
        merge_uniform(&mut uniforms, slot)?;
    }
    uniforms.sort_by_key(|u| u.binding);

    let mut inputs = vertex_inputs(vertex, vs_entry)?;
    inputs.sort_by_key(|i| i.location);

    Ok(ProgramLayout {
        vertex_entry: vs_entry.name.clone(),
        fragment_entry: fs_entry.name.clone(),
        uniforms,
        inputs,
    })
}

fn entry_point(module: &naga::Module, stage: naga::ShaderStage) -> Option<&naga::EntryPoint> {
    module.entry_points.iter().find(|ep| ep.stage == stage)
}

/// Collects named uniform globals. Only bind group 0 is supported.
pub fn uniform_slots(module: &naga::Module) -> Result<Vec<UniformSlot>, String> {
    let mut out = Vec::new();

    for (_, var) in module.global_variables.iter() {
        if !matches!(var.space, naga::AddressSpace::Uniform) {
            continue;
        }

        let name = var.name.clone().unwrap_or_default();
        let Some(binding) = var.binding.as_ref() else {
            return Err(format!("uniform `{name}` has no @binding"));
        };
        if binding.group != 0 {
            return Err(format!(
                "uniform `{name}` is in @group({}); only @group(0) is supported",
                binding.group
            ));
        }

        let inner = &module.types[var.ty].inner;
        let stride = match inner {
            naga::TypeInner::Array { stride, .. } => Some(*stride),
            _ => None,
        };

        out.push(UniformSlot {
            name,
            binding: binding.binding,
            size: inner.size(module.to_ctx()),
            stride,
        });
    }

    Ok(out)
}

fn merge_uniform(slots: &mut Vec<UniformSlot>, slot: UniformSlot) -> Result<(), String> {
    if let Some(existing) = slots.iter().find(|s| s.binding == slot.binding) {
        if *existing != slot {
            return Err(format!(
                "uniform @binding({}) is declared as `{}` ({} bytes) in the vertex stage \
                 but `{}` ({} bytes) in the fragment stage",
                slot.binding, existing.name, existing.size, slot.name, slot.size
            ));
        }
        return Ok(());
    }

    if !slot.name.is_empty() && slots.iter().any(|s| s.name == slot.name) {
        return Err(format!("uniform `{}` is bound to different slots across stages", slot.name));
    }

    slots.push(slot);
    Ok(())
}

fn vertex_inputs(module: &naga::Module, entry: &naga::EntryPoint) -> Result<Vec<VertexInput>, String> {
    let mut out = Vec::new();

    for arg in &entry.function.arguments {
        let location = match &arg.binding {
            Some(naga::Binding::Location { location, .. }) => *location,
            Some(naga::Binding::BuiltIn(_)) => continue,
            None => return Err("struct-typed vertex inputs are not supported".to_string()),
        };

        let name = arg.name.clone().unwrap_or_default();
        let components = match &module.types[arg.ty].inner {
            naga::TypeInner::Scalar(s) if is_f32(*s) => 1,
            naga::TypeInner::Vector { size, scalar } if is_f32(*scalar) => *size as u32,
            _ => {
                return Err(format!(
                    "vertex input `{name}` must be an f32 scalar or vector"
                ));
            }
        };

        out.push(VertexInput {
            name,
            location,
            components,
        });
    }

    Ok(out)
}

fn is_f32(s: naga::Scalar) -> bool {
    s.kind == naga::ScalarKind::Float && s.width == 4
}

fn output_locations(module: &naga::Module, entry: &naga::EntryPoint) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    if let Some(result) = &entry.function.result {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

fn input_locations(module: &naga::Module, entry: &naga::EntryPoint) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    for arg in &entry.function.arguments {
        collect_locations(module, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    if let Some(naga::Binding::Location { location, .. }) = &m.binding {
                        out.insert(*location);
                    }
                }
            }
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        text.push_str(": ");
        text.push_str(&s.to_string());
        source = s.source();
    }
    text
}
