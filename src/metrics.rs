//! Hexagon geometry, terrace interpolation and vertex perturbation
//!
//! [`HexMetrics`] bundles the configuration with the derived corner table, the
//! perturbation noise field and the feature hash grid. It is immutable once
//! built and shared read-only by every triangulation pass.

use glam::{Vec3, Vec4};

use crate::config::HexMapConfig;
use crate::direction::HexDirection;
use crate::noise::{HashGrid, HexHash, NoiseSource};

/// Ratio of inner to outer radius (cos 30°)
pub const OUTER_TO_INNER: f32 = 0.866025404;

/// Ratio of outer to inner radius
pub const INNER_TO_OUTER: f32 = 1.0 / OUTER_TO_INNER;

/// Elevation relation between two cells sharing an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexEdgeType {
    /// Same elevation
    Flat,
    /// One level apart; rendered as terraces
    Slope,
    /// More than one level apart
    Cliff,
}

/// Classify the edge between two elevations
///
/// Total and symmetric: `edge_type(a, b) == edge_type(b, a)`.
#[inline]
pub fn edge_type(elevation1: i32, elevation2: i32) -> HexEdgeType {
    match elevation1.abs_diff(elevation2) {
        0 => HexEdgeType::Flat,
        1 => HexEdgeType::Slope,
        _ => HexEdgeType::Cliff,
    }
}

/// Interpolation that returns `a` exactly at `t = 0` and `b` exactly at `t = 1`
#[inline]
fn lerp_exact(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Derived hexagon geometry for one configuration
#[derive(Debug, Clone)]
pub struct HexMetrics {
    config: HexMapConfig,
    inner_radius: f32,
    corners: [Vec3; 7],
    noise: NoiseSource,
    hash_grid: HashGrid,
}

impl HexMetrics {
    /// Build metrics, generating the noise field and hash grid from the seed
    pub fn new(config: HexMapConfig) -> Self {
        let outer = config.outer_radius;
        let inner = outer * OUTER_TO_INNER;
        let corners = [
            Vec3::new(0.0, 0.0, outer),
            Vec3::new(inner, 0.0, 0.5 * outer),
            Vec3::new(inner, 0.0, -0.5 * outer),
            Vec3::new(0.0, 0.0, -outer),
            Vec3::new(-inner, 0.0, -0.5 * outer),
            Vec3::new(-inner, 0.0, 0.5 * outer),
            Vec3::new(0.0, 0.0, outer),
        ];

        Self {
            noise: NoiseSource::generate(config.noise_size, config.seed),
            hash_grid: HashGrid::new(config.hash_grid_size, config.hash_grid_scale, config.seed),
            config,
            inner_radius: inner,
            corners,
        }
    }

    #[inline]
    pub fn config(&self) -> &HexMapConfig {
        &self.config
    }

    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.config.outer_radius
    }

    #[inline]
    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    #[inline]
    pub fn solid_factor(&self) -> f32 {
        self.config.solid_factor
    }

    #[inline]
    pub fn blend_factor(&self) -> f32 {
        1.0 - self.config.solid_factor
    }

    #[inline]
    pub fn water_factor(&self) -> f32 {
        self.config.water_factor
    }

    #[inline]
    pub fn water_blend_factor(&self) -> f32 {
        1.0 - self.config.water_factor
    }

    #[inline]
    pub fn terrace_steps(&self) -> u32 {
        self.config.terrace_steps()
    }

    // ------------------------------------------------------------------
    // Corner table
    // ------------------------------------------------------------------

    #[inline]
    pub fn first_corner(&self, direction: HexDirection) -> Vec3 {
        self.corners[direction.index()]
    }

    #[inline]
    pub fn second_corner(&self, direction: HexDirection) -> Vec3 {
        self.corners[direction.index() + 1]
    }

    #[inline]
    pub fn first_solid_corner(&self, direction: HexDirection) -> Vec3 {
        self.first_corner(direction) * self.solid_factor()
    }

    #[inline]
    pub fn second_solid_corner(&self, direction: HexDirection) -> Vec3 {
        self.second_corner(direction) * self.solid_factor()
    }

    /// Middle of the solid edge facing `direction`
    #[inline]
    pub fn solid_edge_middle(&self, direction: HexDirection) -> Vec3 {
        (self.first_corner(direction) + self.second_corner(direction)) * (0.5 * self.solid_factor())
    }

    /// Offset from a solid edge to the matching solid edge of the neighbour
    #[inline]
    pub fn bridge(&self, direction: HexDirection) -> Vec3 {
        (self.first_corner(direction) + self.second_corner(direction)) * self.blend_factor()
    }

    #[inline]
    pub fn first_water_corner(&self, direction: HexDirection) -> Vec3 {
        self.first_corner(direction) * self.water_factor()
    }

    #[inline]
    pub fn second_water_corner(&self, direction: HexDirection) -> Vec3 {
        self.second_corner(direction) * self.water_factor()
    }

    #[inline]
    pub fn water_bridge(&self, direction: HexDirection) -> Vec3 {
        (self.first_corner(direction) + self.second_corner(direction)) * self.water_blend_factor()
    }

    // ------------------------------------------------------------------
    // Terraces
    // ------------------------------------------------------------------

    /// Position of terrace step `step` between `a` and `b`
    ///
    /// X/Z advance linearly per step while Y advances only on odd steps,
    /// producing flat treads joined by risers.
    pub fn terrace_lerp(&self, a: Vec3, b: Vec3, step: u32) -> Vec3 {
        let h = step as f32 / self.terrace_steps() as f32;
        let v = ((step + 1) / 2) as f32 / (self.config.terraces_per_slope + 1) as f32;
        Vec3::new(
            lerp_exact(a.x, b.x, h),
            lerp_exact(a.y, b.y, v),
            lerp_exact(a.z, b.z, h),
        )
    }

    /// Color of terrace step `step`, using the horizontal fraction only
    pub fn terrace_lerp_color(&self, a: Vec4, b: Vec4, step: u32) -> Vec4 {
        let h = step as f32 / self.terrace_steps() as f32;
        a * (1.0 - h) + b * h
    }

    // ------------------------------------------------------------------
    // Heights
    // ------------------------------------------------------------------

    /// Perturbed Y of a cell center at `elevation`
    ///
    /// Sampled once per cell at its unperturbed position.
    pub fn cell_y(&self, elevation: i32, position: Vec3) -> f32 {
        let sample = self.sample_noise(position);
        elevation as f32 * self.config.elevation_step
            + (sample.y * 2.0 - 1.0) * self.config.elevation_perturb_strength
    }

    #[inline]
    pub fn stream_bed_y(&self, elevation: i32) -> f32 {
        (elevation as f32 + self.config.stream_bed_elevation_offset) * self.config.elevation_step
    }

    #[inline]
    pub fn river_surface_y(&self, elevation: i32) -> f32 {
        (elevation as f32 + self.config.water_elevation_offset) * self.config.elevation_step
    }

    #[inline]
    pub fn water_surface_y(&self, water_level: i32) -> f32 {
        (water_level as f32 + self.config.water_elevation_offset) * self.config.elevation_step
    }

    // ------------------------------------------------------------------
    // Noise
    // ------------------------------------------------------------------

    /// Four noise channels in [0, 1] at a world position (Y ignored)
    #[inline]
    pub fn sample_noise(&self, position: Vec3) -> Vec4 {
        self.noise.sample_bilinear(
            position.x * self.config.noise_scale,
            position.z * self.config.noise_scale,
        )
    }

    /// Displace X and Z by the noise field; Y is left untouched
    ///
    /// Pure: equal inputs give bit-identical outputs, so vertices computed
    /// independently by two neighbouring cells still meet.
    pub fn perturb(&self, position: Vec3) -> Vec3 {
        let sample = self.sample_noise(position);
        let strength = self.config.cell_perturb_strength;
        Vec3::new(
            position.x + (sample.x * 2.0 - 1.0) * strength,
            position.y,
            position.z + (sample.z * 2.0 - 1.0) * strength,
        )
    }

    #[inline]
    pub fn sample_hash_grid(&self, position: Vec3) -> HexHash {
        self.hash_grid.sample(position)
    }
}
