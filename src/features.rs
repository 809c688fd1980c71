//! Urban feature placement
//!
//! Features are not meshed; the triangulator only decides where they go and
//! how they are rotated. The consumer instantiates whatever model it likes at
//! each [`FeatureInstance`].

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::HexCell;
use crate::metrics::HexMetrics;

/// Placement of one feature
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureInstance {
    /// Perturbed position on the cell surface
    pub position: Vec3,
    /// Rotation around the Y axis, in degrees
    pub rotation_y: f32,
}

/// Collects feature placements for one chunk
#[derive(Debug, Clone, Default)]
pub struct FeatureManager {
    instances: Vec<FeatureInstance>,
}

impl FeatureManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Hand out the collected placements, leaving the manager empty
    pub fn apply(&mut self) -> Vec<FeatureInstance> {
        std::mem::take(&mut self.instances)
    }

    /// Place a feature at `position` if the cell's urban level admits it
    ///
    /// The hash grid decides deterministically: a feature appears when
    /// `hash.a < urban_level × 0.25`.
    pub fn add_feature(&mut self, metrics: &HexMetrics, cell: &HexCell, position: Vec3) {
        let hash = metrics.sample_hash_grid(position);
        if hash.a >= cell.urban_level as f32 * 0.25 {
            return;
        }
        self.instances.push(FeatureInstance {
            position: metrics.perturb(position),
            rotation_y: 360.0 * hash.b,
        });
    }

    #[inline]
    pub fn instances(&self) -> &[FeatureInstance] {
        &self.instances
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HexMapConfig;
    use crate::coordinates::HexCoordinates;
    use glam::Vec4;

    fn cell_with_urban(level: u8) -> HexCell {
        let mut cell = HexCell::new(0, HexCoordinates::new(0, 0), Vec3::ZERO, Vec4::ONE);
        cell.urban_level = level;
        cell
    }

    #[test]
    fn test_no_features_at_urban_zero() {
        let metrics = HexMetrics::new(HexMapConfig::default());
        let mut features = FeatureManager::new();
        let cell = cell_with_urban(0);
        for i in 0..50 {
            features.add_feature(&metrics, &cell, Vec3::new(i as f32 * 4.0, 0.0, i as f32 * 3.0));
        }
        assert!(features.is_empty());
    }

    #[test]
    fn test_urban_level_threshold() {
        // Level 3 admits every hash below 0.75
        let metrics = HexMetrics::new(HexMapConfig::default());
        let mut features = FeatureManager::new();
        let cell = cell_with_urban(3);
        let mut expected = 0;
        for i in 0..50 {
            let p = Vec3::new(i as f32 * 4.0, 0.0, i as f32 * 3.0);
            if metrics.sample_hash_grid(p).a < 0.75 {
                expected += 1;
            }
            features.add_feature(&metrics, &cell, p);
        }
        assert_eq!(features.len(), expected);
        for f in features.instances() {
            assert!((0.0..360.0).contains(&f.rotation_y));
        }
    }

    #[test]
    fn test_apply_drains() {
        let metrics = HexMetrics::new(HexMapConfig::default());
        let mut features = FeatureManager::new();
        let cell = cell_with_urban(3);
        for i in 0..20 {
            features.add_feature(&metrics, &cell, Vec3::new(i as f32 * 5.0, 0.0, 0.0));
        }
        let count = features.len();
        let out = features.apply();
        assert_eq!(out.len(), count);
        assert!(features.is_empty());
    }
}
