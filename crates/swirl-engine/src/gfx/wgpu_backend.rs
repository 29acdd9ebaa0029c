use std::collections::HashMap;
use std::num::NonZeroU64;
use std::ops::Range;

use anyhow::Result;
use wgpu::util::DeviceExt;

use super::reflect::{self, CompiledModule, ProgramLayout, UniformSlot, VertexInput};
use super::{AttribLocation, Backend, BuildStatus, Color, StageKind, UniformLocation};

/// A shader stage: its kind and, once compiled, the validated module.
pub struct WgpuStage {
    kind: StageKind,
    compiled: Option<CompiledModule>,
}

/// A program object. `linked` is `None` until a link succeeds.
pub struct WgpuProgram {
    label: String,
    linked: Option<LinkedProgram>,
}

/// An uploaded vertex buffer.
pub struct WgpuBuffer {
    buffer: wgpu::Buffer,
}

#[derive(Clone)]
struct LinkedProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group: Option<wgpu::BindGroup>,
    uniforms: Vec<(UniformSlot, wgpu::Buffer)>,
    inputs: Vec<VertexInput>,
}

struct PendingDraw {
    program: LinkedProgram,
    vertex_buffers: Vec<wgpu::Buffer>,
    vertices: Range<u32>,
}

#[derive(Default)]
struct PendingFrame {
    clear: Option<Color>,
    draws: Vec<PendingDraw>,
}

/// [`Backend`] implemented on wgpu.
///
/// Compile and link run through naga so failures surface as logs instead of
/// device validation errors. Per-frame calls are recorded and turned into a
/// single render pass by [`WgpuBackend::encode`].
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,

    viewport: (u32, u32),
    current: Option<LinkedProgram>,
    vertex_bindings: HashMap<u32, wgpu::Buffer>,
    frame: PendingFrame,

    next_program: u64,
    warned_unbound_input: bool,
}

impl WgpuBackend {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            queue,
            format,
            viewport: (0, 0),
            current: None,
            vertex_bindings: HashMap::new(),
            frame: PendingFrame::default(),
            next_program: 0,
            warned_unbound_input: false,
        }
    }

    /// Records the calls made since the last `encode` into one render pass on
    /// `view`. `target_size` is the size of `view` in pixels.
    pub fn encode(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        target_size: (u32, u32),
    ) {
        let frame = std::mem::take(&mut self.frame);

        let load = match frame.clear {
            Some(c) => wgpu::LoadOp::Clear(c.to_wgpu()),
            None => wgpu::LoadOp::Load,
        };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("swirl frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        // The viewport may briefly lag a resize; never exceed the target.
        let w = self.viewport.0.min(target_size.0);
        let h = self.viewport.1.min(target_size.1);
        if w == 0 || h == 0 {
            return;
        }
        rpass.set_viewport(0.0, 0.0, w as f32, h as f32, 0.0, 1.0);

        for draw in &frame.draws {
            rpass.set_pipeline(&draw.program.pipeline);
            if let Some(bind_group) = draw.program.bind_group.as_ref() {
                rpass.set_bind_group(0, bind_group, &[]);
            }
            for (slot, buffer) in draw.vertex_buffers.iter().enumerate() {
                rpass.set_vertex_buffer(slot as u32, buffer.slice(..));
            }
            rpass.draw(draw.vertices.clone(), 0..1);
        }
    }

    fn create_pipeline(
        &self,
        label: &str,
        vertex: &CompiledModule,
        fragment: &CompiledModule,
        layout: ProgramLayout,
    ) -> LinkedProgram {
        let vs = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("swirl vertex stage"),
            source: wgpu::ShaderSource::Wgsl(vertex.source.as_str().into()),
        });
        let fs = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("swirl fragment stage"),
            source: wgpu::ShaderSource::Wgsl(fragment.source.as_str().into()),
        });

        let uniforms: Vec<(UniformSlot, wgpu::Buffer)> = layout
            .uniforms
            .iter()
            .map(|slot| {
                let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(slot.name.as_str()),
                    size: uniform_buffer_size(slot.size),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                (slot.clone(), buffer)
            })
            .collect();

        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = uniforms
            .iter()
            .map(|(slot, _)| wgpu::BindGroupLayoutEntry {
                binding: slot.binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(slot.size as u64),
                },
                count: None,
            })
            .collect();

        let bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("swirl uniforms bgl"),
                    entries: &layout_entries,
                });

        let bind_group = (!uniforms.is_empty()).then(|| {
            let entries: Vec<wgpu::BindGroupEntry> = uniforms
                .iter()
                .map(|(slot, buffer)| wgpu::BindGroupEntry {
                    binding: slot.binding,
                    resource: buffer.as_entire_binding(),
                })
                .collect();

            self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("swirl uniforms bind group"),
                layout: &bind_group_layout,
                entries: &entries,
            })
        });

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> = if bind_group.is_some() {
            vec![&bind_group_layout]
        } else {
            Vec::new()
        };

        let pipeline_layout =
            self.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("swirl pipeline layout"),
                    bind_group_layouts: &bind_group_layouts,
                    immediate_size: 0,
                });

        // One buffer per vertex input, tightly packed.
        let attributes: Vec<[wgpu::VertexAttribute; 1]> = layout
            .inputs
            .iter()
            .map(|input| {
                [wgpu::VertexAttribute {
                    format: vertex_format(input.components),
                    offset: 0,
                    shader_location: input.location,
                }]
            })
            .collect();

        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = layout
            .inputs
            .iter()
            .zip(attributes.iter())
            .map(|(input, attrs)| wgpu::VertexBufferLayout {
                array_stride: (input.components as u64) * std::mem::size_of::<f32>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(layout.vertex_entry.as_str()),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(layout.fragment_entry.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        LinkedProgram {
            pipeline,
            bind_group,
            uniforms,
            inputs: layout.inputs,
        }
    }

    fn current_uniform(&self, location: Option<UniformLocation>) -> Option<&(UniformSlot, wgpu::Buffer)> {
        let location = location?;
        self.current
            .as_ref()?
            .uniforms
            .iter()
            .find(|(slot, _)| slot.binding == location.0)
    }

    fn write_uniform(&self, location: Option<UniformLocation>, bytes: &[u8]) {
        let Some((slot, buffer)) = self.current_uniform(location) else { return };
        let len = bytes.len().min(slot.size as usize);
        self.queue.write_buffer(buffer, 0, &bytes[..len]);
    }
}

impl Backend for WgpuBackend {
    type Stage = WgpuStage;
    type Program = WgpuProgram;
    type Buffer = WgpuBuffer;

    fn create_stage(&mut self, kind: StageKind) -> Result<WgpuStage> {
        Ok(WgpuStage {
            kind,
            compiled: None,
        })
    }

    fn compile_stage(&mut self, stage: &mut WgpuStage, source: &str) -> BuildStatus {
        match reflect::compile_wgsl(source) {
            Ok(module) => {
                stage.compiled = Some(module);
                BuildStatus::ok()
            }
            Err(log) => {
                stage.compiled = None;
                BuildStatus::failed(log)
            }
        }
    }

    fn destroy_stage(&mut self, stage: WgpuStage) {
        drop(stage);
    }

    fn create_program(&mut self) -> Result<WgpuProgram> {
        let label = format!("swirl program #{}", self.next_program);
        self.next_program += 1;
        Ok(WgpuProgram {
            label,
            linked: None,
        })
    }

    fn link_program(
        &mut self,
        program: &mut WgpuProgram,
        vertex: &WgpuStage,
        fragment: &WgpuStage,
    ) -> BuildStatus {
        program.linked = None;

        if vertex.kind != StageKind::Vertex || fragment.kind != StageKind::Fragment {
            return BuildStatus::failed("stages attached in the wrong slots");
        }
        let Some(vs) = vertex.compiled.as_ref() else {
            return BuildStatus::failed("vertex stage did not compile");
        };
        let Some(fs) = fragment.compiled.as_ref() else {
            return BuildStatus::failed("fragment stage did not compile");
        };

        match reflect::link_modules(&vs.module, &fs.module) {
            Ok(layout) => {
                program.linked = Some(self.create_pipeline(&program.label, vs, fs, layout));
                BuildStatus::ok()
            }
            Err(log) => BuildStatus::failed(log),
        }
    }

    fn attrib_location(&self, program: &WgpuProgram, name: &str) -> Option<AttribLocation> {
        let linked = program.linked.as_ref()?;
        linked
            .inputs
            .iter()
            .find(|i| i.name == name)
            .map(|i| AttribLocation(i.location))
    }

    fn uniform_location(&self, program: &WgpuProgram, name: &str) -> Option<UniformLocation> {
        let linked = program.linked.as_ref()?;
        linked
            .uniforms
            .iter()
            .find(|(slot, _)| slot.name == name)
            .map(|(slot, _)| UniformLocation(slot.binding))
    }

    fn destroy_program(&mut self, program: WgpuProgram) {
        if let Some(linked) = program.linked {
            for (_, buffer) in &linked.uniforms {
                buffer.destroy();
            }
        }
    }

    fn create_vertex_buffer(&mut self, vertices: &[f32]) -> Result<WgpuBuffer> {
        anyhow::ensure!(!vertices.is_empty(), "vertex data is empty");

        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("swirl vertex buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Ok(WgpuBuffer { buffer })
    }

    fn destroy_buffer(&mut self, buffer: WgpuBuffer) {
        self.vertex_bindings.retain(|_, b| *b != buffer.buffer);
        buffer.buffer.destroy();
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn clear(&mut self, color: Color) {
        // A clear discards everything recorded before it.
        self.frame.draws.clear();
        self.frame.clear = Some(color);
    }

    fn use_program(&mut self, program: &WgpuProgram) {
        self.current = program.linked.clone();
    }

    fn bind_vertex_buffer(
        &mut self,
        buffer: &WgpuBuffer,
        attrib: Option<AttribLocation>,
        components: u32,
    ) {
        let Some(attrib) = attrib else { return };

        if let Some(input) = self
            .current
            .as_ref()
            .and_then(|p| p.inputs.iter().find(|i| i.location == attrib.0))
        {
            if input.components != components {
                log::warn!(
                    "vertex input `{}` expects {} components, buffer provides {}",
                    input.name,
                    input.components,
                    components
                );
                return;
            }
        }

        self.vertex_bindings.insert(attrib.0, buffer.buffer.clone());
    }

    fn uniform_f32(&mut self, location: Option<UniformLocation>, value: f32) {
        self.write_uniform(location, bytemuck::bytes_of(&value));
    }

    fn uniform_vec2(&mut self, location: Option<UniformLocation>, value: [f32; 2]) {
        self.write_uniform(location, bytemuck::cast_slice(&value));
    }

    fn uniform_vec2_array(&mut self, location: Option<UniformLocation>, values: &[f32]) {
        let Some((slot, _)) = self.current_uniform(location) else { return };
        let bytes = pack_vec2_array(slot, values);
        self.write_uniform(location, &bytes);
    }

    fn draw_triangles(&mut self, first: u32, count: u32) {
        let Some(program) = self.current.clone() else {
            log::trace!("draw without a linked program; skipped");
            return;
        };

        let mut vertex_buffers = Vec::with_capacity(program.inputs.len());
        for input in &program.inputs {
            match self.vertex_bindings.get(&input.location) {
                Some(buffer) => vertex_buffers.push(buffer.clone()),
                None => {
                    if !self.warned_unbound_input {
                        log::warn!("vertex input `{}` has no buffer bound; draw skipped", input.name);
                        self.warned_unbound_input = true;
                    }
                    return;
                }
            }
        }

        self.frame.draws.push(PendingDraw {
            program,
            vertex_buffers,
            vertices: first..first + count,
        });
    }
}

/// Lays `x, y` pairs out at the slot's element stride, zero-filling the rest.
fn pack_vec2_array(slot: &UniformSlot, values: &[f32]) -> Vec<u8> {
    const PAIR_BYTES: usize = 2 * std::mem::size_of::<f32>();

    let size = slot.size as usize;
    let stride = slot.stride.map_or(PAIR_BYTES, |s| s as usize).max(PAIR_BYTES);
    let mut bytes = vec![0u8; size];

    for (i, pair) in values.chunks_exact(2).enumerate() {
        let at = i * stride;
        if at + PAIR_BYTES > size {
            break;
        }
        bytes[at..at + PAIR_BYTES].copy_from_slice(bytemuck::cast_slice(pair));
    }

    bytes
}

fn uniform_buffer_size(size: u32) -> u64 {
    // Uniform bindings are 16-byte aligned.
    (size.max(16) as u64 + 15) & !15
}

fn vertex_format(components: u32) -> wgpu::VertexFormat {
    match components {
        1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        3 => wgpu::VertexFormat::Float32x3,
        _ => wgpu::VertexFormat::Float32x4,
    }
}
