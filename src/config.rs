//! Hex map configuration and builder
//!
//! This module provides the geometric constants used by the triangulation
//! engine together with the map layout (chunk counts and sizes).

use glam::Vec4;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{HexMapError, Result};

/// Map size presets, expressed in chunks
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapSize {
    /// 4 × 3 chunks
    #[default]
    Small,
    /// 8 × 6 chunks
    Medium,
    /// 12 × 9 chunks
    Large,
    /// Custom chunk counts
    Custom {
        /// Chunks along the X axis
        chunk_count_x: usize,
        /// Chunks along the Z axis
        chunk_count_z: usize,
    },
}

impl MapSize {
    /// Number of chunks along X and Z
    pub fn chunk_counts(self) -> (usize, usize) {
        match self {
            MapSize::Small => (4, 3),
            MapSize::Medium => (8, 6),
            MapSize::Large => (12, 9),
            MapSize::Custom {
                chunk_count_x,
                chunk_count_z,
            } => (chunk_count_x, chunk_count_z),
        }
    }

    /// Get a human-readable name for this map size
    pub fn name(self) -> &'static str {
        match self {
            MapSize::Small => "Small",
            MapSize::Medium => "Medium",
            MapSize::Large => "Large",
            MapSize::Custom { .. } => "Custom",
        }
    }
}

/// Configuration for hex map geometry and layout
///
/// The same configuration (including the seed) always produces the same noise
/// field and hash grid, hence bit-identical meshes for identical cells.
///
/// # Example
///
/// ```rust
/// use rust_hex_map::*;
///
/// let config = HexMapConfigBuilder::new()
///     .seed(42)
///     .map_size(MapSize::Small)
///     .terraces_per_slope(3)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.terrace_steps(), 7);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexMapConfig {
    /// Seed for the perturbation noise field and the feature hash grid
    pub seed: u32,

    /// Map size preset (number of chunks)
    pub map_size: MapSize,

    /// Distance from a cell center to its corners
    pub outer_radius: f32,

    /// Fraction of the hexagon that belongs to the cell alone
    ///
    /// The remaining `1 - solid_factor` is the bridge region blended with
    /// the neighbour.
    pub solid_factor: f32,

    /// Fraction of the hexagon covered by the open water surface
    pub water_factor: f32,

    /// World height of one elevation level
    pub elevation_step: f32,

    /// Number of flat terraces on a one-level slope
    pub terraces_per_slope: u32,

    /// Maximum horizontal vertex displacement
    pub cell_perturb_strength: f32,

    /// Maximum per-cell vertical displacement
    pub elevation_perturb_strength: f32,

    /// World-to-noise coordinate scale
    pub noise_scale: f32,

    /// Stream bed depth, in elevation levels (negative)
    pub stream_bed_elevation_offset: f32,

    /// Water and river surface offset, in elevation levels (negative)
    pub water_elevation_offset: f32,

    /// Cells per chunk along X
    pub chunk_size_x: usize,

    /// Cells per chunk along Z
    pub chunk_size_z: usize,

    /// Side length of the feature hash grid
    pub hash_grid_size: usize,

    /// World-to-hash-grid coordinate scale
    pub hash_grid_scale: f32,

    /// Side length of the generated noise field, in texels
    pub noise_size: usize,

    /// Color assigned to freshly created cells
    pub default_color: Vec4,
}

impl HexMapConfig {
    /// Number of strips in a terraced slope (`2 × terraces + 1`)
    #[inline]
    pub fn terrace_steps(&self) -> u32 {
        self.terraces_per_slope * 2 + 1
    }

    /// Cell counts along X and Z for the whole map
    #[inline]
    pub fn cell_counts(&self) -> (usize, usize) {
        let (cx, cz) = self.map_size.chunk_counts();
        (cx * self.chunk_size_x, cz * self.chunk_size_z)
    }

    /// Total number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        let (x, z) = self.cell_counts();
        x * z
    }

    /// Total number of chunks
    #[inline]
    pub fn chunk_count(&self) -> usize {
        let (x, z) = self.map_size.chunk_counts();
        x * z
    }

    /// Check the settings a grid cannot be laid out without
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the map has no chunks, a chunk has no cells,
    /// or the noise field or hash grid is too small to sample
    pub fn validate(&self) -> Result<()> {
        let (cx, cz) = self.map_size.chunk_counts();
        if cx == 0 || cz == 0 {
            return Err(HexMapError::InvalidConfig(format!(
                "Map must contain at least one chunk (got {}x{})",
                cx, cz
            )));
        }
        if self.chunk_size_x == 0 || self.chunk_size_z == 0 {
            return Err(HexMapError::InvalidConfig(format!(
                "Chunk size must be non-zero (got {}x{})",
                self.chunk_size_x, self.chunk_size_z
            )));
        }
        if self.noise_size < 4 {
            return Err(HexMapError::InvalidConfig(format!(
                "Noise size must be >= 4 (got {})",
                self.noise_size
            )));
        }
        if self.hash_grid_size == 0 || self.hash_grid_scale <= 0.0 {
            return Err(HexMapError::InvalidConfig(format!(
                "Hash grid needs a non-zero size and positive scale (got {}, {})",
                self.hash_grid_size, self.hash_grid_scale
            )));
        }
        Ok(())
    }
}

impl Default for HexMapConfig {
    fn default() -> Self {
        HexMapConfigBuilder::new().seed(1234).build_unchecked()
    }
}

/// Builder for creating HexMapConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_hex_map::*;
///
/// // Use defaults
/// let config = HexMapConfigBuilder::new().build().unwrap();
///
/// // Customize
/// let config = HexMapConfigBuilder::new()
///     .seed(7)
///     .map_size(MapSize::Custom { chunk_count_x: 2, chunk_count_z: 2 })
///     .solid_factor(0.8)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.cell_count(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct HexMapConfigBuilder {
    seed: Option<u32>,
    map_size: MapSize,
    outer_radius: f32,
    solid_factor: f32,
    water_factor: f32,
    elevation_step: f32,
    terraces_per_slope: u32,
    cell_perturb_strength: f32,
    elevation_perturb_strength: f32,
    noise_scale: f32,
    stream_bed_elevation_offset: f32,
    water_elevation_offset: f32,
    chunk_size_x: usize,
    chunk_size_z: usize,
    hash_grid_size: usize,
    hash_grid_scale: f32,
    noise_size: usize,
    default_color: Vec4,
}

impl HexMapConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - map_size: Small (4 × 3 chunks of 5 × 5 cells)
    /// - outer_radius: 10, solid_factor: 0.75, water_factor: 0.6
    /// - elevation_step: 5, terraces_per_slope: 2
    /// - perturbation: 4 horizontal, 1.5 vertical, noise scale 0.003
    /// - stream bed offset -1.75, water surface offset -0.5
    pub fn new() -> Self {
        Self {
            seed: None,
            map_size: MapSize::default(),
            outer_radius: 10.0,
            solid_factor: 0.75,
            water_factor: 0.6,
            elevation_step: 5.0,
            terraces_per_slope: 2,
            cell_perturb_strength: 4.0,
            elevation_perturb_strength: 1.5,
            noise_scale: 0.003,
            stream_bed_elevation_offset: -1.75,
            water_elevation_offset: -0.5,
            chunk_size_x: 5,
            chunk_size_z: 5,
            hash_grid_size: 256,
            hash_grid_scale: 0.25,
            noise_size: 256,
            default_color: Vec4::ONE,
        }
    }

    /// Set the seed for the noise field and hash grid
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the map size preset
    pub fn map_size(mut self, size: MapSize) -> Self {
        self.map_size = size;
        self
    }

    /// Set the hexagon outer radius
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if radius <= 0.0
    pub fn outer_radius(mut self, radius: f32) -> Result<Self> {
        if radius <= 0.0 {
            return Err(HexMapError::InvalidConfig(format!(
                "Outer radius must be positive (got {})",
                radius
            )));
        }
        self.outer_radius = radius;
        Ok(self)
    }

    /// Set the solid factor
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless 0.0 < factor < 1.0
    pub fn solid_factor(mut self, factor: f32) -> Result<Self> {
        if !(factor > 0.0 && factor < 1.0) {
            return Err(HexMapError::InvalidConfig(format!(
                "Solid factor must be in (0, 1) (got {})",
                factor
            )));
        }
        self.solid_factor = factor;
        Ok(self)
    }

    /// Set the water factor
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless 0.0 < factor < 1.0
    pub fn water_factor(mut self, factor: f32) -> Result<Self> {
        if !(factor > 0.0 && factor < 1.0) {
            return Err(HexMapError::InvalidConfig(format!(
                "Water factor must be in (0, 1) (got {})",
                factor
            )));
        }
        self.water_factor = factor;
        Ok(self)
    }

    /// Set the world height of one elevation level
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if step <= 0.0
    pub fn elevation_step(mut self, step: f32) -> Result<Self> {
        if step <= 0.0 {
            return Err(HexMapError::InvalidConfig(format!(
                "Elevation step must be positive (got {})",
                step
            )));
        }
        self.elevation_step = step;
        Ok(self)
    }

    /// Set the number of terraces per slope
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless 1 <= terraces <= 8
    pub fn terraces_per_slope(mut self, terraces: u32) -> Result<Self> {
        if !(1..=8).contains(&terraces) {
            return Err(HexMapError::InvalidConfig(format!(
                "Terraces per slope must be in 1..=8 (got {})",
                terraces
            )));
        }
        self.terraces_per_slope = terraces;
        Ok(self)
    }

    /// Set horizontal and vertical perturbation strengths
    ///
    /// Zero disables perturbation, which is handy for exact geometry checks.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either strength is negative
    pub fn perturbation(mut self, cell_strength: f32, elevation_strength: f32) -> Result<Self> {
        if cell_strength < 0.0 || elevation_strength < 0.0 {
            return Err(HexMapError::InvalidConfig(format!(
                "Perturbation strengths must be >= 0 (got {}, {})",
                cell_strength, elevation_strength
            )));
        }
        self.cell_perturb_strength = cell_strength;
        self.elevation_perturb_strength = elevation_strength;
        Ok(self)
    }

    /// Set the world-to-noise scale
    pub fn noise_scale(mut self, scale: f32) -> Self {
        self.noise_scale = scale;
        self
    }

    /// Set stream bed and water surface offsets, in elevation levels
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless stream_bed < water_surface <= 0.0
    pub fn water_offsets(mut self, stream_bed: f32, water_surface: f32) -> Result<Self> {
        if !(stream_bed < water_surface && water_surface <= 0.0) {
            return Err(HexMapError::InvalidConfig(format!(
                "Stream bed offset must lie below the water offset, both <= 0 (got {}, {})",
                stream_bed, water_surface
            )));
        }
        self.stream_bed_elevation_offset = stream_bed;
        self.water_elevation_offset = water_surface;
        Ok(self)
    }

    /// Set the chunk dimensions in cells
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is zero
    pub fn chunk_size(mut self, size_x: usize, size_z: usize) -> Result<Self> {
        if size_x == 0 || size_z == 0 {
            return Err(HexMapError::InvalidConfig(format!(
                "Chunk size must be non-zero (got {}x{})",
                size_x, size_z
            )));
        }
        self.chunk_size_x = size_x;
        self.chunk_size_z = size_z;
        Ok(self)
    }

    /// Set the noise field resolution
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if size < 4
    pub fn noise_size(mut self, size: usize) -> Result<Self> {
        if size < 4 {
            return Err(HexMapError::InvalidConfig(format!(
                "Noise size must be >= 4 (got {})",
                size
            )));
        }
        self.noise_size = size;
        Ok(self)
    }

    /// Set the hash grid size and scale
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if size is zero or scale is not positive
    pub fn hash_grid(mut self, size: usize, scale: f32) -> Result<Self> {
        if size == 0 || scale <= 0.0 {
            return Err(HexMapError::InvalidConfig(format!(
                "Hash grid needs a non-zero size and positive scale (got {}, {})",
                size, scale
            )));
        }
        self.hash_grid_size = size;
        self.hash_grid_scale = scale;
        Ok(self)
    }

    /// Set the color of newly created cells
    pub fn default_color(mut self, color: Vec4) -> Self {
        self.default_color = color;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the map has no chunks
    pub fn build(self) -> Result<HexMapConfig> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    fn build_unchecked(self) -> HexMapConfig {
        HexMapConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            map_size: self.map_size,
            outer_radius: self.outer_radius,
            solid_factor: self.solid_factor,
            water_factor: self.water_factor,
            elevation_step: self.elevation_step,
            terraces_per_slope: self.terraces_per_slope,
            cell_perturb_strength: self.cell_perturb_strength,
            elevation_perturb_strength: self.elevation_perturb_strength,
            noise_scale: self.noise_scale,
            stream_bed_elevation_offset: self.stream_bed_elevation_offset,
            water_elevation_offset: self.water_elevation_offset,
            chunk_size_x: self.chunk_size_x,
            chunk_size_z: self.chunk_size_z,
            hash_grid_size: self.hash_grid_size,
            hash_grid_scale: self.hash_grid_scale,
            noise_size: self.noise_size,
            default_color: self.default_color,
        }
    }
}

impl Default for HexMapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_size_chunk_counts() {
        assert_eq!(MapSize::Small.chunk_counts(), (4, 3));
        assert_eq!(MapSize::Medium.chunk_counts(), (8, 6));
        assert_eq!(MapSize::Large.chunk_counts(), (12, 9));
        let custom = MapSize::Custom {
            chunk_count_x: 2,
            chunk_count_z: 7,
        };
        assert_eq!(custom.chunk_counts(), (2, 7));
        assert_eq!(custom.name(), "Custom");
    }

    #[test]
    fn test_builder_defaults() {
        let config = HexMapConfigBuilder::new().build().unwrap();
        assert_eq!(config.map_size, MapSize::Small);
        assert_eq!(config.solid_factor, 0.75);
        assert_eq!(config.terraces_per_slope, 2);
        assert_eq!(config.terrace_steps(), 5);
        assert_eq!(config.cell_counts(), (20, 15));
        assert_eq!(config.chunk_count(), 12);
    }

    #[test]
    fn test_builder_custom() {
        let config = HexMapConfigBuilder::new()
            .seed(42)
            .map_size(MapSize::Medium)
            .outer_radius(5.0)
            .unwrap()
            .chunk_size(3, 4)
            .unwrap()
            .perturbation(0.0, 0.0)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.outer_radius, 5.0);
        assert_eq!(config.cell_counts(), (24, 24));
        assert_eq!(config.cell_perturb_strength, 0.0);
    }

    #[test]
    fn test_builder_rejects_invalid_values() {
        assert!(HexMapConfigBuilder::new().outer_radius(0.0).is_err());
        assert!(HexMapConfigBuilder::new().solid_factor(1.0).is_err());
        assert!(HexMapConfigBuilder::new().solid_factor(0.0).is_err());
        assert!(HexMapConfigBuilder::new().water_factor(1.5).is_err());
        assert!(HexMapConfigBuilder::new().terraces_per_slope(0).is_err());
        assert!(HexMapConfigBuilder::new().terraces_per_slope(9).is_err());
        assert!(HexMapConfigBuilder::new().perturbation(-1.0, 0.0).is_err());
        assert!(HexMapConfigBuilder::new().water_offsets(-0.5, -1.0).is_err());
        assert!(HexMapConfigBuilder::new().chunk_size(0, 5).is_err());
        assert!(HexMapConfigBuilder::new().noise_size(2).is_err());
        assert!(HexMapConfigBuilder::new().hash_grid(0, 0.25).is_err());
    }

    #[test]
    fn test_empty_map_rejected() {
        let result = HexMapConfigBuilder::new()
            .map_size(MapSize::Custom {
                chunk_count_x: 0,
                chunk_count_z: 3,
            })
            .build();
        assert!(matches!(result, Err(HexMapError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_catches_edited_fields() {
        let mut config = HexMapConfig::default();
        assert_eq!(config.validate(), Ok(()));

        config.chunk_size_z = 0;
        assert!(matches!(config.validate(), Err(HexMapError::InvalidConfig(_))));

        let config = HexMapConfig {
            hash_grid_size: 0,
            ..HexMapConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_is_deterministic() {
        assert_eq!(HexMapConfig::default(), HexMapConfig::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = HexMapConfigBuilder::new()
            .seed(12345)
            .map_size(MapSize::Large)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: HexMapConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
