//! Texture loading and sampling configuration.
//!
//! A [`TextureConfig`] is plain CPU-side data: RGBA8 pixels plus how the GPU
//! should sample them. The noise field and the baked model's color maps both
//! end up here before upload.
//!
//! # Supported Formats
//!
//! - PNG (recommended)
//! - JPEG

use std::path::Path;

use crate::error::AssetError;

/// Filter mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Smooth linear filtering (default). Good for gradients and noise.
    #[default]
    Linear,
    /// Sharp nearest-neighbor filtering.
    Nearest,
}

impl From<FilterMode> for wgpu::FilterMode {
    fn from(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Linear => wgpu::FilterMode::Linear,
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
        }
    }
}

/// Address mode for texture wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// Clamp to edge color (default). Coordinates outside 0-1 use edge pixels.
    #[default]
    ClampToEdge,
    /// Repeat/tile the texture. Coordinates wrap around.
    Repeat,
}

impl From<AddressMode> for wgpu::AddressMode {
    fn from(mode: AddressMode) -> Self {
        match mode {
            AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            AddressMode::Repeat => wgpu::AddressMode::Repeat,
        }
    }
}

/// Pixels plus sampling state for a single texture.
#[derive(Debug, Clone)]
pub struct TextureConfig {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// Filter mode for magnification/minification.
    pub filter: FilterMode,
    /// Address mode for UV coordinates outside 0-1.
    pub address_mode: AddressMode,
    /// Maximum anisotropy, `1` disables anisotropic filtering.
    pub anisotropy: u16,
    /// Whether the pixels are sRGB-encoded color (as opposed to data).
    pub srgb: bool,
}

impl TextureConfig {
    /// Create a texture configuration from raw RGBA data.
    ///
    /// # Example
    ///
    /// ```ignore
    /// // 2x2 checkerboard
    /// let data = vec![
    ///     255, 255, 255, 255,
    ///     0, 0, 0, 255,
    ///     0, 0, 0, 255,
    ///     255, 255, 255, 255,
    /// ];
    /// let tex = TextureConfig::from_rgba(data, 2, 2)?;
    /// ```
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(AssetError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            filter: FilterMode::Linear,
            address_mode: AddressMode::ClampToEdge,
            anisotropy: 1,
            srgb: false,
        })
    }

    /// Load a texture from an image file.
    ///
    /// ```ignore
    /// let tex = TextureConfig::from_file("assets/perlin.png")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let img = image::open(path.as_ref())?.into_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(img.into_raw(), width, height)
    }

    /// Create a solid color texture (1x1 pixel).
    pub fn solid(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            data: vec![r, g, b, a],
            width: 1,
            height: 1,
            filter: FilterMode::Nearest,
            address_mode: AddressMode::ClampToEdge,
            anisotropy: 1,
            srgb: true,
        }
    }

    /// Set the filter mode.
    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Set the address mode for UV wrapping.
    ///
    /// ```ignore
    /// let tex = TextureConfig::from_file("perlin.png")?
    ///     .with_address_mode(AddressMode::Repeat);
    /// ```
    pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode = mode;
        self
    }

    /// Set the anisotropy clamp. Values are clamped to `1..=16`.
    pub fn with_anisotropy(mut self, anisotropy: u16) -> Self {
        self.anisotropy = anisotropy.clamp(1, 16);
        self
    }

    /// Mark the pixels as sRGB color.
    pub fn with_srgb(mut self, srgb: bool) -> Self {
        self.srgb = srgb;
        self
    }

    /// GPU texel format for these pixels.
    pub fn format(&self) -> wgpu::TextureFormat {
        if self.srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        }
    }

    /// Sampler for this texture.
    ///
    /// wgpu only accepts an anisotropy clamp above 1 when every filter is
    /// linear, so nearest filtering always drops back to 1.
    pub fn sampler_descriptor(&self) -> wgpu::SamplerDescriptor<'static> {
        let address: wgpu::AddressMode = self.address_mode.into();
        let filter: wgpu::FilterMode = self.filter.into();
        let anisotropy_clamp = match self.filter {
            FilterMode::Linear => self.anisotropy.max(1),
            FilterMode::Nearest => 1,
        };
        wgpu::SamplerDescriptor {
            label: Some("Texture Sampler"),
            address_mode_u: address,
            address_mode_v: address,
            address_mode_w: address,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: filter,
            anisotropy_clamp,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_size_mismatch() {
        let err = TextureConfig::from_rgba(vec![0; 12], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            AssetError::SizeMismatch {
                expected: 16,
                actual: 12
            }
        ));
    }

    #[test]
    fn test_builder_chain() {
        let tex = TextureConfig::solid(255, 0, 0, 255)
            .with_filter(FilterMode::Linear)
            .with_address_mode(AddressMode::Repeat)
            .with_anisotropy(8);
        let desc = tex.sampler_descriptor();
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::Repeat);
        assert_eq!(desc.anisotropy_clamp, 8);
    }

    #[test]
    fn test_nearest_disables_anisotropy() {
        let tex = TextureConfig::solid(0, 0, 0, 255).with_anisotropy(8);
        assert_eq!(tex.sampler_descriptor().anisotropy_clamp, 1);
    }

    #[test]
    fn test_anisotropy_clamped() {
        let tex = TextureConfig::solid(0, 0, 0, 255).with_anisotropy(64);
        assert_eq!(tex.anisotropy, 16);
    }

    #[test]
    fn test_format_follows_srgb_flag() {
        let tex = TextureConfig::solid(0, 0, 0, 255);
        assert_eq!(tex.format(), wgpu::TextureFormat::Rgba8UnormSrgb);
        assert_eq!(tex.with_srgb(false).format(), wgpu::TextureFormat::Rgba8Unorm);
    }

    #[test]
    fn test_address_modes_map_to_wgpu() {
        assert_eq!(wgpu::AddressMode::from(AddressMode::default()), wgpu::AddressMode::ClampToEdge);
        assert_eq!(wgpu::AddressMode::from(AddressMode::Repeat), wgpu::AddressMode::Repeat);
    }

    #[test]
    fn test_missing_file() {
        let err = TextureConfig::from_file("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, AssetError::ImageLoad(_) | AssetError::Io(_)));
    }
}
