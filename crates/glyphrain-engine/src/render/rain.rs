use std::fmt;
use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::uniforms::EffectUniforms;

/// Shader stage tag carried by compile errors.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors raised while building the effect pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },
    #[error("render pipeline failed to link: {log}")]
    Link { log: String },
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    pos: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Clip-space quad in triangle-strip order: two triangles cover the whole
/// surface.
const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [-1.0, 1.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [-1.0, -1.0] },
    QuadVertex { pos: [1.0, -1.0] },
];

/// Fullscreen matrix-rain pass.
///
/// Exactly one pipeline, one quad vertex buffer and one uniform buffer exist
/// per instance; nothing is recompiled or reallocated after construction.
pub struct RainRenderer {
    pipeline: wgpu::RenderPipeline,
    quad_vbo: wgpu::Buffer,
    uniform_ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl RainRenderer {
    /// Compiles both shader stages, links the pipeline and uploads the
    /// static quad.
    ///
    /// Each stage compiles independently; a failed stage stops construction
    /// before linking is attempted.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self, PipelineError> {
        let vertex = compile_shader(
            device,
            ShaderStage::Vertex,
            include_str!("shaders/quad.wgsl"),
        )?;
        let fragment = compile_shader(
            device,
            ShaderStage::Fragment,
            include_str!("shaders/rain.wgsl"),
        )?;

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("glyphrain effect bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(uniform_min_binding_size()),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glyphrain effect pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("glyphrain effect pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    // The effect overwrites every pixel; no blending, as in
                    // the source contract.
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
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
        if let Some(err) = pollster::block_on(error_scope.pop()) {
            return Err(PipelineError::Link {
                log: err.to_string(),
            });
        }

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glyphrain quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glyphrain effect ubo"),
            size: std::mem::size_of::<EffectUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glyphrain effect bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_ubo.as_entire_binding(),
            }],
        });

        Ok(Self {
            pipeline,
            quad_vbo,
            uniform_ubo,
            bind_group,
        })
    }

    /// Records one frame tick: upload the uniform snapshot, clear to opaque
    /// black and draw the quad.
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        uniforms: &EffectUniforms,
    ) {
        queue.write_buffer(&self.uniform_ubo, 0, bytemuck::bytes_of(uniforms));

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glyphrain effect pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
    }
}

/// Compiles one WGSL module under a validation error scope.
///
/// A captured validation error becomes a typed compile failure carrying the
/// backend's diagnostic text; the partially built module is dropped.
fn compile_shader(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, PipelineError> {
    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "glyphrain vertex shader",
            ShaderStage::Fragment => "glyphrain fragment shader",
        }),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    if let Some(err) = pollster::block_on(error_scope.pop()) {
        drop(module);
        return Err(PipelineError::ShaderCompile {
            stage,
            log: err.to_string(),
        });
    }

    Ok(module)
}

/// Minimum binding size for the effect uniform buffer.
///
/// `EffectUniforms` is 64 bytes, so the size is non-zero by construction.
fn uniform_min_binding_size() -> NonZeroU64 {
    NonZeroU64::new(std::mem::size_of::<EffectUniforms>() as u64)
        .expect("EffectUniforms has non-zero size by construction")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_spans_clip_space() {
        for v in QUAD_VERTICES {
            assert_eq!(v.pos[0].abs(), 1.0);
            assert_eq!(v.pos[1].abs(), 1.0);
        }
    }

    #[test]
    fn quad_strip_order_covers_both_triangles() {
        // Triangle strip: (0,1,2) and (1,2,3) must be the two half-quads.
        let [a, b, c, d] = QUAD_VERTICES;
        assert_eq!((a.pos, b.pos), ([-1.0, 1.0], [1.0, 1.0]));
        assert_eq!((c.pos, d.pos), ([-1.0, -1.0], [1.0, -1.0]));
    }

    #[test]
    fn ubo_binding_size_matches_block() {
        assert_eq!(uniform_min_binding_size().get(), 64);
    }

    #[test]
    fn stage_labels_read_naturally() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
