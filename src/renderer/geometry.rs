//! Static control-point geometry for the two supported patch domains.
//!
//! Both buffers are uploaded once at startup and never mutated. The vertex
//! stage pulls them as read-only storage, one `vec4<f32>` per control point.

use wgpu::util::DeviceExt;

use crate::config::PatchTopology;

/// Triangle patch control points in clip space, fixed winding:
/// lower-left → upper-middle → lower-right.
pub const TRIANGLE_CONTROL_POINTS: [[f32; 4]; 3] = [
    [-0.8, -0.8, 0.0, 1.0],
    [0.0, 0.8, 0.0, 1.0],
    [0.8, -0.8, 0.0, 1.0],
];

/// Quad patch control points in clip space, fixed winding:
/// upper-left → upper-right → lower-right → lower-left.
pub const QUAD_CONTROL_POINTS: [[f32; 4]; 4] = [
    [-0.8, 0.8, 0.0, 1.0],
    [0.8, 0.8, 0.0, 1.0],
    [0.8, -0.8, 0.0, 1.0],
    [-0.8, -0.8, 0.0, 1.0],
];

/// Owns the per-topology control-point buffers for the lifetime of the
/// renderer. Exposes read-only handles; there are no mutation operations.
pub struct PatchGeometry {
    triangle: wgpu::Buffer,
    quad: wgpu::Buffer,
}

impl PatchGeometry {
    pub fn new(device: &wgpu::Device) -> Self {
        let triangle = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Control Points Triangle"),
            contents: bytemuck::cast_slice(&TRIANGLE_CONTROL_POINTS),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Control Points Quad"),
            contents: bytemuck::cast_slice(&QUAD_CONTROL_POINTS),
            usage: wgpu::BufferUsages::STORAGE,
        });

        Self { triangle, quad }
    }

    /// Read-only control-point buffer for the given topology.
    pub fn control_points(&self, topology: PatchTopology) -> &wgpu::Buffer {
        match topology {
            PatchTopology::Triangle => &self.triangle,
            PatchTopology::Quad => &self.quad,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_point_counts_match_topologies() {
        assert_eq!(
            TRIANGLE_CONTROL_POINTS.len() as u32,
            PatchTopology::Triangle.control_point_count()
        );
        assert_eq!(
            QUAD_CONTROL_POINTS.len() as u32,
            PatchTopology::Quad.control_point_count()
        );
    }

    #[test]
    fn triangle_winding_is_lower_left_upper_middle_lower_right() {
        let [a, b, c] = TRIANGLE_CONTROL_POINTS;
        // Lower-left: negative x, negative y.
        assert!(a[0] < 0.0 && a[1] < 0.0);
        // Upper-middle: centered x, positive y.
        assert_eq!(b[0], 0.0);
        assert!(b[1] > 0.0);
        // Lower-right: positive x, negative y.
        assert!(c[0] > 0.0 && c[1] < 0.0);
    }

    #[test]
    fn quad_winding_is_clockwise_from_upper_left() {
        let [ul, ur, lr, ll] = QUAD_CONTROL_POINTS;
        assert!(ul[0] < 0.0 && ul[1] > 0.0);
        assert!(ur[0] > 0.0 && ur[1] > 0.0);
        assert!(lr[0] > 0.0 && lr[1] < 0.0);
        assert!(ll[0] < 0.0 && ll[1] < 0.0);
    }

    #[test]
    fn control_points_are_homogeneous_clip_positions() {
        for point in TRIANGLE_CONTROL_POINTS.iter().chain(&QUAD_CONTROL_POINTS) {
            assert_eq!(point[2], 0.0);
            assert_eq!(point[3], 1.0);
        }
    }
}
