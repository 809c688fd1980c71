//! Five-point subdivision of a hexagon edge

use glam::Vec3;

use crate::metrics::HexMetrics;

/// Five evenly spaced points along one edge, `v1` and `v5` being the corners
///
/// The middle point `v3` is where a river channel or road runs through.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeVertices {
    pub v1: Vec3,
    pub v2: Vec3,
    pub v3: Vec3,
    pub v4: Vec3,
    pub v5: Vec3,
}

impl EdgeVertices {
    /// Subdivide the segment into quarters
    pub fn new(corner1: Vec3, corner2: Vec3) -> Self {
        Self {
            v1: corner1,
            v2: corner1.lerp(corner2, 0.25),
            v3: corner1.lerp(corner2, 0.5),
            v4: corner1.lerp(corner2, 0.75),
            v5: corner2,
        }
    }

    /// Subdivide with custom spacing for the outer two points
    ///
    /// `v2` sits at `outer_step` and `v4` at `1 - outer_step`; used to widen
    /// the river channel through a cell.
    pub fn with_outer_step(corner1: Vec3, corner2: Vec3, outer_step: f32) -> Self {
        Self {
            v1: corner1,
            v2: corner1.lerp(corner2, outer_step),
            v3: corner1.lerp(corner2, 0.5),
            v4: corner1.lerp(corner2, 1.0 - outer_step),
            v5: corner2,
        }
    }

    /// Terrace-interpolate every point between two edges
    pub fn terrace_lerp(a: &EdgeVertices, b: &EdgeVertices, step: u32, metrics: &HexMetrics) -> Self {
        Self {
            v1: metrics.terrace_lerp(a.v1, b.v1, step),
            v2: metrics.terrace_lerp(a.v2, b.v2, step),
            v3: metrics.terrace_lerp(a.v3, b.v3, step),
            v4: metrics.terrace_lerp(a.v4, b.v4, step),
            v5: metrics.terrace_lerp(a.v5, b.v5, step),
        }
    }

    #[inline]
    pub fn to_array(&self) -> [Vec3; 5] {
        [self.v1, self.v2, self.v3, self.v4, self.v5]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HexMapConfig;
    use crate::direction::HexDirection;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quarter_subdivision() {
        let e = EdgeVertices::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 8.0));
        assert_eq!(e.v2, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(e.v3, Vec3::new(2.0, 0.0, 4.0));
        assert_eq!(e.v4, Vec3::new(3.0, 0.0, 6.0));
        assert_eq!(e.v5, Vec3::new(4.0, 0.0, 8.0));
    }

    #[test]
    fn test_outer_step() {
        let e = EdgeVertices::with_outer_step(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0), 1.0 / 6.0);
        assert_abs_diff_eq!(e.v2.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(e.v3.x, 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(e.v4.x, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_bridged_edges_meet_neighbour() {
        // A cell's bridged edge must coincide with the neighbour's own solid
        // edge, taken in reverse order.
        let metrics = HexMetrics::new(HexMapConfig::default());
        let center = Vec3::ZERO;
        for d in HexDirection::ALL {
            let neighbour_center = center + metrics.solid_edge_middle(d) * 2.0 + metrics.bridge(d);
            let e = EdgeVertices::new(
                center + metrics.first_solid_corner(d),
                center + metrics.second_solid_corner(d),
            );
            let bridge = metrics.bridge(d);
            let e2 = EdgeVertices::new(e.v1 + bridge, e.v5 + bridge);
            let o = d.opposite();
            let theirs = EdgeVertices::new(
                neighbour_center + metrics.second_solid_corner(o),
                neighbour_center + metrics.first_solid_corner(o),
            );
            for (a, b) in e2.to_array().iter().zip(theirs.to_array().iter()) {
                assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-3);
                assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn test_terrace_lerp_endpoints() {
        let metrics = HexMetrics::new(HexMapConfig::default());
        let a = EdgeVertices::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        let b = EdgeVertices::new(Vec3::new(0.0, 5.0, 4.0), Vec3::new(10.0, 5.0, 4.0));
        assert_eq!(EdgeVertices::terrace_lerp(&a, &b, 0, &metrics), a);
        assert_eq!(EdgeVertices::terrace_lerp(&a, &b, metrics.terrace_steps(), &metrics), b);
    }
}
