//! Patch tessellation render pipelines.
//!
//! Two fully configured variants, one per patch domain, built once at
//! startup and selected by a plain match every frame. Each variant carries a
//! solid and a wireframe pipeline because wgpu bakes the triangle fill mode
//! into the pipeline object; the two differ only in `polygon_mode`. The
//! tessellation configuration is shared: clockwise output winding, no
//! culling, factor values capped at 64 by the kernels.

use crate::config::PatchTopology;
use crate::renderer::geometry::PatchGeometry;
use crate::renderer::pipelines::factors::{FactorStage, TESS_FACTOR_BUFFER_SIZE};
use crate::renderer::FramePlan;

/// Precomputed pipeline/resource triple for one patch domain. The bind group
/// pairs the shared factor record with this domain's control-point buffer.
struct PatchVariant {
    solid: wgpu::RenderPipeline,
    wire: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
}

pub struct PatchRenderer {
    triangle: PatchVariant,
    quad: PatchVariant,
}

impl PatchRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_fmt: wgpu::TextureFormat,
        geometry: &PatchGeometry,
        factors: &FactorStage,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Patch Render BGL"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(TESS_FACTOR_BUFFER_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shaders/patch.wgsl"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/patch.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Patch Render PipelineLayout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let make_pipeline = |label: &str, vertex_entry: &str, polygon_mode: wgpu::PolygonMode| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: vertex_entry,
                    buffers: &[],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_patch",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_fmt,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Cw,
                    cull_mode: None,
                    polygon_mode,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let make_variant = |topology: PatchTopology, name: &str, vertex_entry: &str| {
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Patch Bind Group {name}")),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: factors.factor_buffer().as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: geometry.control_points(topology).as_entire_binding(),
                    },
                ],
            });

            PatchVariant {
                solid: make_pipeline(
                    &format!("Patch Pipeline {name}"),
                    vertex_entry,
                    wgpu::PolygonMode::Fill,
                ),
                wire: make_pipeline(
                    &format!("Patch Pipeline {name} Wireframe"),
                    vertex_entry,
                    wgpu::PolygonMode::Line,
                ),
                bind_group,
            }
        };

        Self {
            triangle: make_variant(PatchTopology::Triangle, "Triangle", "vs_patch_triangle"),
            quad: make_variant(PatchTopology::Quad, "Quad", "vs_patch_quad"),
        }
    }

    /// Encode the tessellation draw for this frame. Vertex count comes from
    /// the indirect arguments the factor kernel wrote earlier in the same
    /// submission.
    pub fn draw<'a>(
        &'a self,
        rpass: &mut wgpu::RenderPass<'a>,
        plan: &FramePlan,
        indirect: &'a wgpu::Buffer,
    ) {
        let variant = match plan.topology {
            PatchTopology::Triangle => &self.triangle,
            PatchTopology::Quad => &self.quad,
        };

        // Wireframe swaps the fill mode only; bindings are identical.
        let pipeline = if plan.wireframe {
            &variant.wire
        } else {
            &variant.solid
        };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &variant.bind_group, &[]);
        rpass.draw_indirect(indirect, 0);
    }
}
