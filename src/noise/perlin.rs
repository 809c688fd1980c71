//! Periodic 2D Perlin noise
//!
//! Gradient noise whose lattice wraps every `period` cells, so a field sampled
//! over one period tiles seamlessly. Uses the standard Ken Perlin permutation
//! table.

/// Fractal settings for tileable noise
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerlinConfig {
    /// Lattice period of the first octave (the field repeats after this many cells)
    pub base_period: i32,
    /// Number of octaves for fractal detail layers
    pub octaves: usize,
    /// Amplitude decay per octave (controls roughness)
    pub persistence: f32,
}

impl Default for PerlinConfig {
    fn default() -> Self {
        Self {
            base_period: 4,
            octaves: 4,
            persistence: 0.5,
        }
    }
}

// ============================================================================
// PERMUTATION TABLE
// ============================================================================
// Standard 256-element permutation table from Ken Perlin's reference implementation.
// This table must remain unchanged to keep noise fields deterministic.
const PERM: [u32; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Hash a lattice point, wrapped to the period, with a seed
#[inline]
fn hash(x: i32, y: i32, period: i32, seed: u32) -> u32 {
    let seed_hash = (seed.wrapping_mul(1103515245).wrapping_add(12345)) >> 16;
    let ix = ((x.rem_euclid(period) as u32) ^ seed_hash) & 255;
    let iy = ((y.rem_euclid(period) as u32) ^ (seed_hash >> 8)) & 255;
    let a = PERM[ix as usize];
    PERM[((a + iy) & 255) as usize]
}

/// Dot product of one of eight lattice gradients with (x, y)
#[inline]
fn gradient(hash_value: u32, x: f32, y: f32) -> f32 {
    match hash_value & 7 {
        0 => x,
        1 => -x,
        2 => y,
        3 => -y,
        4 => (x + y) * 0.5,
        5 => (-x + y) * 0.5,
        6 => (x - y) * 0.5,
        _ => (-x - y) * 0.5,
    }
}

/// Quintic smoothstep (6t⁵ - 15t⁴ + 10t³)
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Sample periodic 2D Perlin noise, roughly in [-1, 1]
pub fn perlin_2d(x: f32, y: f32, period: i32, seed: u32) -> f32 {
    let period = period.max(1);
    let x0 = (x.floor() as i32).rem_euclid(period);
    let y0 = (y.floor() as i32).rem_euclid(period);
    let xf = x - x.floor();
    let yf = y - y.floor();

    let u = fade(xf);
    let v = fade(yf);

    let g00 = gradient(hash(x0, y0, period, seed), xf, yf);
    let g10 = gradient(hash(x0 + 1, y0, period, seed), xf - 1.0, yf);
    let g01 = gradient(hash(x0, y0 + 1, period, seed), xf, yf - 1.0);
    let g11 = gradient(hash(x0 + 1, y0 + 1, period, seed), xf - 1.0, yf - 1.0);

    lerp(lerp(g00, g10, u), lerp(g01, g11, u), v)
}

/// Tileable fractal noise in [0, 1] for normalized coordinates (u, v)
///
/// One unit of `u`/`v` spans exactly one period at every octave, so
/// `sample_tileable(u + 1, v) == sample_tileable(u, v)` up to rounding.
pub fn sample_tileable(u: f32, v: f32, seed: u32, config: &PerlinConfig) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut period = config.base_period.max(1);
    let mut max_value = 0.0;

    for octave in 0..config.octaves {
        let p = period as f32;
        let octave_seed = seed.wrapping_add((octave as u32).wrapping_mul(7919));
        value += perlin_2d(u * p, v * p, period, octave_seed) * amplitude;
        max_value += amplitude;

        period = period.saturating_mul(2);
        amplitude *= config.persistence;
    }

    if max_value == 0.0 {
        return 0.5;
    }
    (((value / max_value) + 1.0) * 0.5).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_determinism() {
        let config = PerlinConfig::default();
        let a = sample_tileable(0.31, 0.77, 42, &config);
        let b = sample_tileable(0.31, 0.77, 42, &config);
        assert_eq!(a, b, "Same seed and position must produce identical results");
    }

    #[test]
    fn test_range() {
        let config = PerlinConfig::default();
        for i in 0..50 {
            let u = i as f32 * 0.037;
            let v = i as f32 * 0.053;
            let value = sample_tileable(u, v, 12345, &config);
            assert!((0.0..=1.0).contains(&value), "value {} out of range", value);
        }
    }

    #[test]
    fn test_lattice_wraps_with_period() {
        for &(x, y) in &[(0.25, 0.5), (1.75, 2.1), (3.3, 0.9)] {
            let a = perlin_2d(x, y, 4, 9);
            let b = perlin_2d(x + 4.0, y, 4, 9);
            let c = perlin_2d(x, y - 8.0, 4, 9);
            assert_abs_diff_eq!(a, b, epsilon = 1e-5);
            assert_abs_diff_eq!(a, c, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_zero_at_lattice_points() {
        assert_eq!(perlin_2d(2.0, 3.0, 8, 1), 0.0);
    }

    #[test]
    fn test_many_octaves_with_large_period() {
        let config = PerlinConfig {
            base_period: i32::MAX / 2,
            octaves: 40,
            persistence: 0.9,
        };
        let value = sample_tileable(0.37, 0.81, 5, &config);
        assert!((0.0..=1.0).contains(&value));
        assert!(perlin_2d(1.0e12, -1.0e12, i32::MAX, 5).is_finite());
    }

    #[test]
    fn test_non_positive_period_acts_as_one() {
        assert_eq!(perlin_2d(0.3, 0.6, 0, 2), perlin_2d(0.3, 0.6, 1, 2));
        assert_eq!(perlin_2d(0.3, 0.6, -5, 2), perlin_2d(0.3, 0.6, 1, 2));
    }

    #[test]
    fn test_different_seeds() {
        let config = PerlinConfig::default();
        let differs = (0..16).any(|i| {
            let u = 0.1 + i as f32 * 0.05;
            sample_tileable(u, 0.4, 42, &config) != sample_tileable(u, 0.4, 999, &config)
        });
        assert!(differs, "Different seeds should produce different values");
    }
}
