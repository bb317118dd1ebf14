//! User-facing tessellation parameters.
//!
//! The configuration panel mutates a [`TessConfig`] between frames; the
//! renderer reads one by-value snapshot per frame. A change therefore takes
//! effect at the start of the next frame, never mid-frame.

/// Hard limits on the edge/inside tessellation factors. The render pipelines
/// are built for a maximum factor of 64; the kernels clamp to the same range.
pub const MIN_TESS_FACTOR: f32 = 2.0;
pub const MAX_TESS_FACTOR: f32 = 64.0;

/// The closed set of patch domains the viewer supports. Each variant maps to
/// its own control-point buffer, factor kernel, and render pipeline, resolved
/// once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchTopology {
    Triangle,
    Quad,
}

impl PatchTopology {
    /// Control points defining the coarse (pre-tessellation) patch.
    pub fn control_point_count(self) -> u32 {
        match self {
            PatchTopology::Triangle => 3,
            PatchTopology::Quad => 4,
        }
    }
}

/// Snapshot of the user-controlled rendering parameters.
#[derive(Clone, Copy, Debug)]
pub struct TessConfig {
    pub topology: PatchTopology,
    pub wireframe: bool,
    pub edge_factor: f32,
    pub inside_factor: f32,
}

impl Default for TessConfig {
    fn default() -> Self {
        Self {
            topology: PatchTopology::Triangle,
            wireframe: false,
            edge_factor: 2.0,
            inside_factor: 2.0,
        }
    }
}

impl TessConfig {
    /// The sliders already enforce the valid range; this is the backstop for
    /// values arriving from anywhere else.
    pub fn clamp_factor(value: f32) -> f32 {
        value.clamp(MIN_TESS_FACTOR, MAX_TESS_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_point_count_matches_topology() {
        assert_eq!(PatchTopology::Triangle.control_point_count(), 3);
        assert_eq!(PatchTopology::Quad.control_point_count(), 4);
    }

    #[test]
    fn default_config_matches_startup_state() {
        let config = TessConfig::default();
        assert_eq!(config.topology, PatchTopology::Triangle);
        assert!(!config.wireframe);
        assert_eq!(config.edge_factor, MIN_TESS_FACTOR);
        assert_eq!(config.inside_factor, MIN_TESS_FACTOR);
    }

    #[test]
    fn clamp_factor_maps_into_valid_range() {
        assert_eq!(TessConfig::clamp_factor(0.5), MIN_TESS_FACTOR);
        assert_eq!(TessConfig::clamp_factor(8.0), 8.0);
        assert_eq!(TessConfig::clamp_factor(1000.0), MAX_TESS_FACTOR);
    }
}
