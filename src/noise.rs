//! Tileable 2D noise field.
//!
//! The smoke reads one scalar per lookup from a grayscale texture that wraps
//! seamlessly in both axes. The same texels are uploaded to the GPU and
//! sampled here on the CPU with the same rules the GPU sampler follows
//! (linear filtering between texel centers, repeat addressing), so the CPU
//! reference shading matches what the shader sees.
//!
//! ```ignore
//! let noise = NoiseField::perlin(256, 8, 5, 7);
//! let n = noise.sample(Vec2::new(0.25, 1.75)); // same as (0.25, 0.75)
//! ```

use std::f32::consts::TAU;
use std::path::Path;

use glam::Vec2;

use crate::error::AssetError;
use crate::textures::{AddressMode, FilterMode, TextureConfig};

/// Side length of the procedural field used when no image is supplied.
pub const DEFAULT_SIZE: u32 = 256;
/// Lattice cells across the base octave of the procedural field.
pub const DEFAULT_PERIOD: u32 = 8;
pub const DEFAULT_OCTAVES: u32 = 5;
pub const DEFAULT_SEED: u32 = 0x5EED;

/// A grayscale, tileable scalar field.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseField {
    width: u32,
    height: u32,
    /// One byte per texel, row-major, top row first.
    values: Vec<u8>,
}

impl NoiseField {
    /// Build a field from one byte per texel.
    pub fn from_values(values: Vec<u8>, width: u32, height: u32) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize;
        if values.len() != expected || expected == 0 {
            return Err(AssetError::SizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Take the red channel of an RGBA texture.
    pub fn from_texture(texture: &TextureConfig) -> Result<Self, AssetError> {
        let values = texture.data.chunks_exact(4).map(|px| px[0]).collect();
        Self::from_values(values, texture.width, texture.height)
    }

    /// Load a noise image. Only the red channel is used.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let texture = TextureConfig::from_file(path)?;
        Self::from_texture(&texture)
    }

    /// Generate periodic gradient noise with fractal octaves.
    ///
    /// `period` is the number of lattice cells across the base octave;
    /// each further octave doubles both frequency and period, so every
    /// octave tiles over the same texture and the sum tiles too. The
    /// result is stretched to the full `0..=255` range.
    pub fn perlin(size: u32, period: u32, octaves: u32, seed: u32) -> Self {
        let size = size.max(1);
        let period = period.max(1);
        let octaves = octaves.max(1);

        let mut raw = Vec::with_capacity((size * size) as usize);
        for py in 0..size {
            for px in 0..size {
                let x = (px as f32 + 0.5) / size as f32 * period as f32;
                let y = (py as f32 + 0.5) / size as f32 * period as f32;

                let mut sum = 0.0;
                let mut amplitude = 1.0;
                for octave in 0..octaves {
                    let scale = (1u32 << octave) as f32;
                    let octave_period = period << octave;
                    sum += amplitude
                        * gradient_noise(x * scale, y * scale, octave_period, seed.wrapping_add(octave));
                    amplitude *= 0.5;
                }
                raw.push(sum);
            }
        }

        let (min, max) = raw
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let span = (max - min).max(f32::EPSILON);
        let values = raw
            .iter()
            .map(|v| (((v - min) / span) * 255.0).round() as u8)
            .collect();

        Self {
            width: size,
            height: size,
            values,
        }
    }

    /// The procedural field used when no noise image is configured.
    pub fn procedural_default() -> Self {
        Self::perlin(DEFAULT_SIZE, DEFAULT_PERIOD, DEFAULT_OCTAVES, DEFAULT_SEED)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel value in `[0, 1]` with wrapping integer coordinates.
    pub fn texel(&self, x: i64, y: i64) -> f32 {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.values[y * self.width as usize + x] as f32 / 255.0
    }

    /// Bilinear sample with repeat wrapping, in `[0, 1]`.
    ///
    /// Texel centers sit at `(i + 0.5) / width`, which is where a GPU
    /// sampler places them.
    pub fn sample(&self, uv: Vec2) -> f32 {
        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.rem_euclid(1.0);

        let x = u * self.width as f32 - 0.5;
        let y = v * self.height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = lerp(self.texel(x0, y0), self.texel(x0 + 1, y0), fx);
        let bottom = lerp(self.texel(x0, y0 + 1), self.texel(x0 + 1, y0 + 1), fx);
        lerp(top, bottom, fy)
    }

    /// Grayscale RGBA texture for upload, set to repeat in both axes.
    pub fn to_texture_config(&self) -> TextureConfig {
        let mut data = Vec::with_capacity(self.values.len() * 4);
        for &v in &self.values {
            data.extend_from_slice(&[v, v, v, 255]);
        }
        TextureConfig {
            data,
            width: self.width,
            height: self.height,
            filter: FilterMode::Linear,
            address_mode: AddressMode::Repeat,
            anisotropy: 1,
            srgb: false,
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Hash a lattice point to a pseudo-random u32.
fn hash_lattice(x: u32, y: u32, seed: u32) -> u32 {
    let mut n = x
        .wrapping_mul(374761393)
        .wrapping_add(y.wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1013904223));
    n = (n ^ (n >> 13)).wrapping_mul(1274126177);
    n ^ (n >> 16)
}

fn lattice_gradient(ix: i64, iy: i64, period: u32, seed: u32) -> Vec2 {
    let x = ix.rem_euclid(period as i64) as u32;
    let y = iy.rem_euclid(period as i64) as u32;
    let angle = hash_lattice(x, y, seed) as f32 / u32::MAX as f32 * TAU;
    Vec2::new(angle.cos(), angle.sin())
}

/// Gradient noise whose lattice repeats every `period` cells.
fn gradient_noise(x: f32, y: f32, period: u32, seed: u32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let f = Vec2::new(x - x0, y - y0);
    let (ix, iy) = (x0 as i64, y0 as i64);

    let d00 = lattice_gradient(ix, iy, period, seed).dot(f);
    let d10 = lattice_gradient(ix + 1, iy, period, seed).dot(f - Vec2::X);
    let d01 = lattice_gradient(ix, iy + 1, period, seed).dot(f - Vec2::Y);
    let d11 = lattice_gradient(ix + 1, iy + 1, period, seed).dot(f - Vec2::ONE);

    let u = fade(f.x);
    let v = fade(f.y);
    lerp(lerp(d00, d10, u), lerp(d01, d11, u), v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perlin_is_deterministic() {
        let a = NoiseField::perlin(32, 4, 3, 11);
        let b = NoiseField::perlin(32, 4, 3, 11);
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_changes_field() {
        let a = NoiseField::perlin(32, 4, 3, 11);
        let b = NoiseField::perlin(32, 4, 3, 12);
        assert_ne!(a, b);
    }

    #[test]
    fn test_full_range_used() {
        let field = NoiseField::perlin(64, 4, 4, 1);
        assert!(field.values.contains(&0));
        assert!(field.values.contains(&255));
    }

    #[test]
    fn test_opposite_edges_continue() {
        // Across the wrap seam the step between neighbors should be no
        // larger than the steepest step anywhere inside the field.
        let field = NoiseField::perlin(64, 4, 3, 3);
        let size = field.width() as i64;

        let mut max_inner: f32 = 0.0;
        let mut max_seam: f32 = 0.0;
        for y in 0..size {
            for x in 0..size - 1 {
                max_inner = max_inner.max((field.texel(x, y) - field.texel(x + 1, y)).abs());
            }
            max_seam = max_seam.max((field.texel(size - 1, y) - field.texel(0, y)).abs());
        }
        assert!(max_seam <= max_inner + 1.0 / 255.0);
    }

    #[test]
    fn test_sample_wraps() {
        let field = NoiseField::perlin(32, 4, 2, 5);
        let uv = Vec2::new(0.3, 0.7);
        let a = field.sample(uv);
        let b = field.sample(uv + Vec2::new(1.0, -2.0));
        assert!((a - b).abs() < 1e-4);
    }

    #[test]
    fn test_sample_hits_texel_centers() {
        let values = vec![0, 255, 255, 0];
        let field = NoiseField::from_values(values, 2, 2).unwrap();
        assert_eq!(field.sample(Vec2::new(0.25, 0.25)), 0.0);
        assert_eq!(field.sample(Vec2::new(0.75, 0.25)), 1.0);
        // Halfway between two texel centers
        assert!((field.sample(Vec2::new(0.5, 0.25)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sample_in_unit_range() {
        let field = NoiseField::procedural_default();
        for i in 0..100 {
            let t = i as f32 * 0.137;
            let v = field.sample(Vec2::new(t, -t * 1.3));
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_texture_roundtrip_uses_red_channel() {
        let field = NoiseField::perlin(16, 2, 2, 9);
        let tex = field.to_texture_config();
        assert_eq!(tex.address_mode, AddressMode::Repeat);
        assert_eq!(tex.format(), wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(NoiseField::from_texture(&tex).unwrap(), field);
    }

    #[test]
    fn test_from_values_rejects_bad_length() {
        assert!(NoiseField::from_values(vec![0; 3], 2, 2).is_err());
        assert!(NoiseField::from_values(vec![], 0, 0).is_err());
    }
}
