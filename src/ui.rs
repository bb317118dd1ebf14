//! Configuration side panel.
//!
//! Mutates the app's [`TessConfig`] between frames; the renderer only ever
//! sees the snapshot taken at the start of a frame.

use crate::config::{PatchTopology, TessConfig, MAX_TESS_FACTOR, MIN_TESS_FACTOR};

pub fn draw_controls(ctx: &egui::Context, config: &mut TessConfig) {
    egui::SidePanel::right("tessellation-controls")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Tessellation");
            ui.separator();

            ui.horizontal(|ui| {
                ui.selectable_value(&mut config.topology, PatchTopology::Triangle, "Triangle");
                ui.selectable_value(&mut config.topology, PatchTopology::Quad, "Quad");
            });

            ui.checkbox(&mut config.wireframe, "Wireframe");

            ui.add(
                egui::Slider::new(&mut config.edge_factor, MIN_TESS_FACTOR..=MAX_TESS_FACTOR)
                    .text("Edge Factor"),
            );
            ui.add(
                egui::Slider::new(&mut config.inside_factor, MIN_TESS_FACTOR..=MAX_TESS_FACTOR)
                    .text("Inside Factor"),
            );
        });
}
