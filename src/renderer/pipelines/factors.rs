//! Tessellation factor stage.
//!
//! One compute pipeline per patch domain, both wrapping entry points of the
//! same kernel module. A dispatch writes two GPU records: the packed
//! half-precision factor buffer read by the patch evaluator, and the
//! `draw_indirect` argument buffer consumed by the render pass of the same
//! submission. The CPU never reads either back.

use crate::config::PatchTopology;
use crate::renderer::FramePlan;
use wgpu::util::DeviceExt;

/// Size of the packed factor record: four `u32` words (edge pairs, inside
/// pair, grid resolution).
pub const TESS_FACTOR_BUFFER_SIZE: u64 = 16;

/// Arguments for [`wgpu::RenderPass::draw_indirect`], written on the GPU by
/// the factor kernels. Field order and widths are fixed by WebGPU.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawIndirectArgs {
    pub vertex_count: u32,
    pub instance_count: u32,
    pub first_vertex: u32,
    pub first_instance: u32,
}

// Compile-time layout validation.
const _: [(); 16] = [(); core::mem::size_of::<DrawIndirectArgs>()];
const _: [(); 4] = [(); core::mem::align_of::<DrawIndirectArgs>()];

/// The two scalar kernel inputs, padded to a 16-byte uniform slot.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Default)]
struct FactorInputs {
    edge: f32,
    inside: f32,
    _pad: [f32; 2],
}

pub struct FactorStage {
    triangle: wgpu::ComputePipeline,
    quad: wgpu::ComputePipeline,
    inputs_ubo: wgpu::Buffer,
    factor_buffer: wgpu::Buffer,
    indirect_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl FactorStage {
    pub fn new(device: &wgpu::Device) -> Self {
        let inputs_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Factor Inputs UBO"),
            size: std::mem::size_of::<FactorInputs>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let factor_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Tessellation Factors"),
            size: TESS_FACTOR_BUFFER_SIZE,
            usage: wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        });

        // Seeded with an empty draw so the first frame is well defined even
        // if a backend reorders the initial submission.
        let indirect_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Patch Draw Indirect Args"),
            contents: bytemuck::bytes_of(&DrawIndirectArgs {
                vertex_count: 0,
                instance_count: 1,
                first_vertex: 0,
                first_instance: 0,
            }),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::INDIRECT,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Factor Stage BGL"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<FactorInputs>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(TESS_FACTOR_BUFFER_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<DrawIndirectArgs>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Factor Stage Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: inputs_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: factor_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: indirect_buffer.as_entire_binding(),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shaders/tess_factors.wgsl"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../../shaders/tess_factors.wgsl").into(),
            ),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Factor Stage PipelineLayout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let make_pipeline = |label: &str, entry_point: &str| {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            })
        };

        let triangle = make_pipeline("Factor Pipeline Triangle", "tess_factors_triangle");
        let quad = make_pipeline("Factor Pipeline Quad", "tess_factors_quad");

        Self {
            triangle,
            quad,
            inputs_ubo,
            factor_buffer,
            indirect_buffer,
            bind_group,
        }
    }

    /// Factor record shared with the patch evaluator.
    pub fn factor_buffer(&self) -> &wgpu::Buffer {
        &self.factor_buffer
    }

    /// Indirect argument buffer consumed by the patch draw.
    pub fn indirect_buffer(&self) -> &wgpu::Buffer {
        &self.indirect_buffer
    }

    /// Encode the factor computation for this frame. The compute pass is
    /// closed before returning, so the caller's render pass always follows
    /// it in submission order.
    pub fn dispatch(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        plan: &FramePlan,
    ) {
        queue.write_buffer(
            &self.inputs_ubo,
            0,
            bytemuck::bytes_of(&FactorInputs {
                edge: plan.edge_factor,
                inside: plan.inside_factor,
                _pad: [0.0; 2],
            }),
        );

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Compute Tessellation Factors"),
            timestamp_writes: None,
        });
        pass.set_pipeline(match plan.topology {
            PatchTopology::Triangle => &self.triangle,
            PatchTopology::Quad => &self.quad,
        });
        pass.set_bind_group(0, &self.bind_group, &[]);

        let (x, y, z) = plan.factor_workgroups;
        pass.dispatch_workgroups(x, y, z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// CPU mirror of the kernels' fractional-even rounding.
    fn quantize_even(f: f32) -> f32 {
        (2.0 * (f * 0.5).ceil()).clamp(2.0, 64.0)
    }

    #[test]
    fn indirect_args_offsets_match_webgpu_spec() {
        assert_eq!(core::mem::size_of::<DrawIndirectArgs>(), 16);
        assert_eq!(core::mem::align_of::<DrawIndirectArgs>(), 4);
        assert_eq!(core::mem::offset_of!(DrawIndirectArgs, vertex_count), 0);
        assert_eq!(core::mem::offset_of!(DrawIndirectArgs, instance_count), 4);
        assert_eq!(core::mem::offset_of!(DrawIndirectArgs, first_vertex), 8);
        assert_eq!(core::mem::offset_of!(DrawIndirectArgs, first_instance), 12);
    }

    #[test]
    fn factor_record_is_four_words() {
        assert_eq!(TESS_FACTOR_BUFFER_SIZE, 16);
    }

    #[test]
    fn quantization_rounds_up_to_even_within_limits() {
        assert_eq!(quantize_even(2.0), 2.0);
        assert_eq!(quantize_even(4.0), 4.0);
        assert_eq!(quantize_even(7.3), 8.0);
        assert_eq!(quantize_even(8.0), 8.0);
        assert_eq!(quantize_even(63.1), 64.0);
        assert_eq!(quantize_even(64.0), 64.0);
        // Inputs are clamped upstream, but the kernel clamps too.
        assert_eq!(quantize_even(0.1), 2.0);
        assert_eq!(quantize_even(100.0), 64.0);
    }

    #[test]
    fn vertex_counts_follow_grid_resolution() {
        // Scenario from the frame tests: edge 8.0, inside 4.0 -> n = 8.
        let n = quantize_even(8.0f32.max(4.0)) as u32;
        assert_eq!(n, 8);
        assert_eq!(3 * n * n, 192); // triangle domain
        assert_eq!(6 * n * n, 384); // quad domain
    }
}
