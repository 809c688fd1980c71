//! Deterministic noise sources
//!
//! [`NoiseSource`] is a tileable four-channel field sampled bilinearly, used to
//! perturb vertices. [`HashGrid`] is a seeded table of random values used to
//! place features.

mod hash;
mod perlin;

pub use hash::{HashGrid, HexHash};
pub use perlin::{perlin_2d, sample_tileable, PerlinConfig};

use glam::Vec4;

/// A square, tileable RGBA noise field with values in [0, 1]
///
/// Each channel is an independent fractal Perlin layer. Sampling wraps in both
/// directions, so the field covers the whole plane.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    size: usize,
    texels: Vec<Vec4>,
}

impl NoiseSource {
    /// Generate a `size × size` field from a seed
    pub fn generate(size: usize, seed: u32) -> Self {
        Self::generate_with_config(size, seed, &PerlinConfig::default())
    }

    /// Generate a field with explicit fractal settings
    pub fn generate_with_config(size: usize, seed: u32, config: &PerlinConfig) -> Self {
        let size = size.max(1);
        let inv = 1.0 / size as f32;
        let channel_seeds = [
            seed,
            seed.wrapping_add(1000),
            seed.wrapping_add(2000),
            seed.wrapping_add(3000),
        ];

        let mut texels = Vec::with_capacity(size * size);
        for j in 0..size {
            for i in 0..size {
                let u = i as f32 * inv;
                let v = j as f32 * inv;
                texels.push(Vec4::new(
                    sample_tileable(u, v, channel_seeds[0], config),
                    sample_tileable(u, v, channel_seeds[1], config),
                    sample_tileable(u, v, channel_seeds[2], config),
                    sample_tileable(u, v, channel_seeds[3], config),
                ));
            }
        }

        Self { size, texels }
    }

    /// Side length in texels
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn texel(&self, x: i64, y: i64) -> Vec4 {
        let size = self.size as i64;
        let x = x.rem_euclid(size) as usize;
        let y = y.rem_euclid(size) as usize;
        self.texels[y * self.size + x]
    }

    /// Bilinear sample at normalized coordinates, wrapping outside [0, 1)
    ///
    /// Texel centers sit at `(i + 0.5) / size`, matching texture sampling
    /// conventions.
    pub fn sample_bilinear(&self, u: f32, v: f32) -> Vec4 {
        let size = self.size as f32;
        let x = u * size - 0.5;
        let y = v * size - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;
        let ix = x0 as i64;
        let iy = y0 as i64;

        let bottom = self.texel(ix, iy).lerp(self.texel(ix + 1, iy), tx);
        let top = self.texel(ix, iy + 1).lerp(self.texel(ix + 1, iy + 1), tx);
        bottom.lerp(top, ty)
    }
}
