//! Interactive viewer for a single GPU-tessellated patch.
//!
//! Renders a triangle or quad patch whose tessellation density and fill
//! style are controlled live from a side panel. Each frame submits one unit
//! of work: a compute dispatch deriving the tessellation factors, then a
//! render pass that evaluates and rasterizes the subdivided patch.

pub mod app;
pub mod config;
pub mod renderer;
pub mod ui;

#[cfg(test)]
mod wgsl_tests;
