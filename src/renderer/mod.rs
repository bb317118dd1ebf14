//! The main rendering orchestrator. Owns the GPU context, the static patch
//! geometry, and the pipeline state cache, and encodes the two-stage frame
//! workload: tessellation factor computation, then patch rasterization.

pub mod context;
pub mod geometry;
pub mod pipelines;

use self::{
    context::GfxContext,
    geometry::PatchGeometry,
    pipelines::{factors::FactorStage, patch::PatchRenderer},
};
use crate::config::{PatchTopology, TessConfig};
use std::sync::Arc;
use winit::window::Window;

/// Everything the per-frame encoding reads from the configuration snapshot,
/// resolved before any commands are recorded. Pipeline and buffer selection
/// follow `topology`; the factor dispatch is a single workgroup because the
/// kernel only derives a handful of factor values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePlan {
    pub topology: PatchTopology,
    pub wireframe: bool,
    pub edge_factor: f32,
    pub inside_factor: f32,
    pub control_point_count: u32,
    pub factor_workgroups: (u32, u32, u32),
    pub patch_count: u32,
    pub instance_count: u32,
}

impl FramePlan {
    pub fn for_config(config: &TessConfig) -> Self {
        Self {
            topology: config.topology,
            wireframe: config.wireframe,
            edge_factor: TessConfig::clamp_factor(config.edge_factor),
            inside_factor: TessConfig::clamp_factor(config.inside_factor),
            control_point_count: config.topology.control_point_count(),
            factor_workgroups: (1, 1, 1),
            patch_count: 1,
            instance_count: 1,
        }
    }
}

/// Owns all rendering-related state.
pub struct Renderer {
    pub gfx: GfxContext,
    pub geometry: PatchGeometry,
    pub factors: FactorStage,
    pub patch: PatchRenderer,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;

        let geometry = PatchGeometry::new(&gfx.device);
        let factors = FactorStage::new(&gfx.device);
        let patch = PatchRenderer::new(&gfx.device, gfx.config.format, &geometry, &factors);

        let egui_renderer = egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1, false);

        Ok(Self {
            gfx,
            geometry,
            factors,
            patch,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
        }
    }

    /// Encode and submit one frame's unit of work against the given drawable
    /// view. The factor dispatch always precedes the patch draw inside the
    /// same submission, which is what makes the factor write visible to the
    /// draw without explicit synchronization.
    pub fn render(&mut self, swap_view: &wgpu::TextureView, config: &TessConfig) {
        let plan = FramePlan::for_config(config);

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Tessellation Pass"),
            });

        // Stage 1: derive tessellation factors and indirect draw arguments.
        self.factors.dispatch(&self.gfx.queue, &mut encoder, &plan);

        // Stage 2: tessellate and rasterize the patch.
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Tessellate and Render"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.03,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.patch
                .draw(&mut rpass, &plan, self.factors.indirect_buffer());
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_frame_uses_triangle_path() {
        let plan = FramePlan::for_config(&TessConfig {
            topology: PatchTopology::Triangle,
            wireframe: false,
            edge_factor: 8.0,
            inside_factor: 4.0,
        });

        assert_eq!(plan.topology, PatchTopology::Triangle);
        assert_eq!(plan.control_point_count, 3);
        assert_eq!(plan.factor_workgroups, (1, 1, 1));
        assert_eq!(plan.patch_count, 1);
        assert_eq!(plan.instance_count, 1);
        assert!(!plan.wireframe);
        assert_eq!(plan.edge_factor, 8.0);
        assert_eq!(plan.inside_factor, 4.0);
    }

    #[test]
    fn quad_wireframe_frame_uses_quad_path_with_outline_fill() {
        let plan = FramePlan::for_config(&TessConfig {
            topology: PatchTopology::Quad,
            wireframe: true,
            edge_factor: 2.0,
            inside_factor: 2.0,
        });

        assert_eq!(plan.topology, PatchTopology::Quad);
        assert_eq!(plan.control_point_count, 4);
        assert!(plan.wireframe);
    }

    #[test]
    fn wireframe_changes_only_the_fill_mode() {
        let config = TessConfig {
            topology: PatchTopology::Triangle,
            wireframe: false,
            edge_factor: 16.0,
            inside_factor: 12.0,
        };
        let solid = FramePlan::for_config(&config);
        let wire = FramePlan::for_config(&TessConfig {
            wireframe: true,
            ..config
        });

        assert_eq!(
            FramePlan {
                wireframe: true,
                ..solid
            },
            wire
        );
    }

    #[test]
    fn topology_switch_takes_effect_on_the_next_plan() {
        let mut config = TessConfig::default();
        let first = FramePlan::for_config(&config);
        config.topology = PatchTopology::Quad;
        let second = FramePlan::for_config(&config);

        assert_eq!(first.control_point_count, 3);
        assert_eq!(second.control_point_count, 4);
        // Control points never mix across domains: the count always follows
        // the plan's own topology.
        assert_eq!(
            second.control_point_count,
            second.topology.control_point_count()
        );
    }

    #[test]
    fn out_of_range_factors_are_clamped_in_the_plan() {
        let plan = FramePlan::for_config(&TessConfig {
            topology: PatchTopology::Quad,
            wireframe: false,
            edge_factor: 0.0,
            inside_factor: 500.0,
        });

        assert_eq!(plan.edge_factor, crate::config::MIN_TESS_FACTOR);
        assert_eq!(plan.inside_factor, crate::config::MAX_TESS_FACTOR);
    }
}
