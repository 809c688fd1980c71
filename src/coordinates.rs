//! Cube coordinates for hexagon cells

use std::fmt;

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::metrics::HexMetrics;

/// Cube coordinates of a cell; `y` is derived as `-x - z`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HexCoordinates {
    x: i32,
    z: i32,
}

impl HexCoordinates {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Convert offset (row-shifted) grid coordinates to cube coordinates
    pub fn from_offset_coordinates(x: i32, z: i32) -> Self {
        Self::new(x - z.div_euclid(2), z)
    }

    /// Find the coordinates of the cell containing a world position
    pub fn from_position(position: Vec3, metrics: &HexMetrics) -> Self {
        let mut x = position.x / (metrics.inner_radius() * 2.0);
        let mut y = -x;
        let offset = position.z / (metrics.outer_radius() * 3.0);
        x -= offset;
        y -= offset;

        let mut ix = x.round() as i32;
        let iy = y.round() as i32;
        let mut iz = (-x - y).round() as i32;

        if ix + iy + iz != 0 {
            let dx = (x - ix as f32).abs();
            let dy = (y - iy as f32).abs();
            let dz = (-x - y - iz as f32).abs();

            if dx > dy && dx > dz {
                ix = -iy - iz;
            } else if dz > dy {
                iz = -ix - iy;
            }
        }

        Self::new(ix, iz)
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        -self.x - self.z
    }

    #[inline]
    pub fn z(&self) -> i32 {
        self.z
    }

    /// Offset column of these coordinates
    #[inline]
    pub fn offset_x(&self) -> i32 {
        self.x + self.z.div_euclid(2)
    }

    /// Number of cell steps between two coordinates
    pub fn distance_to(&self, other: HexCoordinates) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y() - other.y()).unsigned_abs();
        let dz = (self.z - other.z).unsigned_abs();
        (dx + dy + dz) / 2
    }
}

impl fmt::Display for HexCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y(), self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HexMapConfig;

    #[test]
    fn test_offset_conversion_round_trip() {
        for z in 0..6 {
            for x in 0..6 {
                let c = HexCoordinates::from_offset_coordinates(x, z);
                assert_eq!(c.offset_x(), x);
                assert_eq!(c.z(), z);
                assert_eq!(c.x() + c.y() + c.z(), 0);
            }
        }
    }

    #[test]
    fn test_from_position_finds_cell_centers() {
        let metrics = HexMetrics::new(HexMapConfig::default());
        for z in 0..5 {
            for x in 0..5 {
                let position = Vec3::new(
                    (x as f32 + z as f32 * 0.5 - (z / 2) as f32) * metrics.inner_radius() * 2.0,
                    0.0,
                    z as f32 * metrics.outer_radius() * 1.5,
                );
                let expected = HexCoordinates::from_offset_coordinates(x, z);
                assert_eq!(HexCoordinates::from_position(position, &metrics), expected);
                // Slightly off-center still lands in the same cell
                let nudged = position + Vec3::new(2.0, 0.0, -1.5);
                assert_eq!(HexCoordinates::from_position(nudged, &metrics), expected);
            }
        }
    }

    #[test]
    fn test_distance() {
        let a = HexCoordinates::new(0, 0);
        assert_eq!(a.distance_to(HexCoordinates::new(2, -1)), 2);
        assert_eq!(a.distance_to(a), 0);
        assert_eq!(a.to_string(), "(0, 0, 0)");
    }
}
