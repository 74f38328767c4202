//! Tunable smoke constants and the base smoke color.
//!
//! None of these numbers is "correct"; they are art-directable defaults.
//! Every field can be overridden from a JSON file, and any field the file
//! omits keeps its default:
//!
//! ```json
//! { "twist": 4.0, "density_range": [0.35, 0.95] }
//! ```
//!
//! Constants are baked into the generated WGSL, so changing them means
//! rebuilding the smoke pipeline. The base color is the one value that
//! changes at runtime and travels through the uniform buffer instead.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ParamsError;

/// Base smoke color, RGB in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmokeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl SmokeColor {
    /// Warm coffee brown.
    pub const DEFAULT: SmokeColor = SmokeColor { r: 0.6, g: 0.3, b: 0.2 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Clamp every channel into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }
}

impl Default for SmokeColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Every tunable constant of the smoke effect.
///
/// Ranges are `[low, high]` pairs fed to `smoothstep`; scales and offsets
/// are `[u, v]` pairs applied to the plume UV before a noise lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeParams {
    /// Twist angle in radians reached at the top of the plume.
    pub twist: f32,
    /// U scale of the wind lookup. Small values keep the whole plume
    /// swaying together.
    pub wind_u_scale: f32,
    /// V scale of the wind lookup.
    pub wind_frequency: f32,
    /// Wind scroll speed in UV units per second.
    pub wind_speed: f32,
    /// Horizontal displacement reached at the top of the plume.
    pub wind_strength: f32,
    /// Height exponent of the wind displacement.
    pub wind_exponent: f32,

    pub density_scale: [f32; 2],
    /// Density and shadow scroll speed in UV units per second.
    pub density_speed: f32,
    pub density_range: [f32; 2],

    pub shadow_scale: [f32; 2],
    pub shadow_offset: [f32; 2],
    pub shadow_range: [f32; 2],
    /// Maximum darkening, `0` disables the shadow term.
    pub shadow_strength: f32,
    /// How much weaker the shadow is at the top than at the base.
    pub shadow_height_bias: f32,

    /// Width of the horizontal fade at both sides, in U.
    pub edge_fade: f32,
    /// Height of the fade at the base, in V.
    pub base_fade: f32,
    /// V at which the fade towards the top begins.
    pub top_fade_start: f32,

    /// NDC radius around the pointer that swirls the density lookup.
    pub pointer_radius: f32,
    pub pointer_strength: f32,
}

impl Default for SmokeParams {
    fn default() -> Self {
        Self {
            twist: 2.5,
            wind_u_scale: 0.05,
            wind_frequency: 0.2,
            wind_speed: 0.01,
            wind_strength: 10.0,
            wind_exponent: 2.0,

            density_scale: [0.5, 0.3],
            density_speed: 0.03,
            density_range: [0.4, 1.0],

            shadow_scale: [0.8, 0.45],
            shadow_offset: [0.5, 0.5],
            shadow_range: [0.3, 0.9],
            shadow_strength: 0.45,
            shadow_height_bias: 0.6,

            edge_fade: 0.1,
            base_fade: 0.1,
            top_fade_start: 0.4,

            pointer_radius: 0.25,
            pointer_strength: 0.6,
        }
    }
}

impl SmokeParams {
    /// Create parameters with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load parameters from a JSON file and validate them.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ParamsError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Parse parameters from JSON text and validate them.
    pub fn from_json_str(text: &str) -> Result<Self, ParamsError> {
        let params: SmokeParams = serde_json::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    /// Set the twist angle at the top of the plume.
    pub fn with_twist(mut self, radians: f32) -> Self {
        self.twist = radians;
        self
    }

    /// Set wind scroll speed and strength.
    pub fn with_wind(mut self, speed: f32, strength: f32) -> Self {
        self.wind_speed = speed;
        self.wind_strength = strength;
        self
    }

    /// Set the density scroll speed.
    pub fn with_density_speed(mut self, speed: f32) -> Self {
        self.density_speed = speed;
        self
    }

    /// Set the smoothstep range that maps noise to density.
    pub fn with_density_range(mut self, low: f32, high: f32) -> Self {
        self.density_range = [low, high];
        self
    }

    /// Set shadow strength.
    pub fn with_shadow_strength(mut self, strength: f32) -> Self {
        self.shadow_strength = strength;
        self
    }

    /// Set the pointer swirl radius and strength.
    pub fn with_pointer(mut self, radius: f32, strength: f32) -> Self {
        self.pointer_radius = radius;
        self.pointer_strength = strength;
        self
    }

    /// Check that every range and width is usable.
    ///
    /// A degenerate smoothstep range divides by zero, and a zero-width
    /// fade would stop hiding the rectangular mesh boundary.
    pub fn validate(&self) -> Result<(), ParamsError> {
        for (name, value) in self.scalars() {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite { name, value });
            }
        }

        check_range("density_range", self.density_range)?;
        check_range("shadow_range", self.shadow_range)?;

        check_fade("edge_fade", self.edge_fade, 0.5)?;
        check_fade("base_fade", self.base_fade, 1.0)?;
        check_within("top_fade_start", self.top_fade_start, 0.0, 0.999)?;
        check_within("shadow_strength", self.shadow_strength, 0.0, 0.999)?;
        check_within("shadow_height_bias", self.shadow_height_bias, 0.0, 1.0)?;

        check_positive("wind_speed", self.wind_speed.abs())?;
        check_positive("density_speed", self.density_speed.abs())?;
        check_positive("wind_exponent", self.wind_exponent)?;
        check_positive("pointer_radius", self.pointer_radius)?;

        Ok(())
    }

    fn scalars(&self) -> [(&'static str, f32); 24] {
        [
            ("twist", self.twist),
            ("wind_u_scale", self.wind_u_scale),
            ("wind_frequency", self.wind_frequency),
            ("wind_speed", self.wind_speed),
            ("wind_strength", self.wind_strength),
            ("wind_exponent", self.wind_exponent),
            ("density_scale.u", self.density_scale[0]),
            ("density_scale.v", self.density_scale[1]),
            ("density_speed", self.density_speed),
            ("density_range.low", self.density_range[0]),
            ("density_range.high", self.density_range[1]),
            ("shadow_scale.u", self.shadow_scale[0]),
            ("shadow_scale.v", self.shadow_scale[1]),
            ("shadow_offset.u", self.shadow_offset[0]),
            ("shadow_offset.v", self.shadow_offset[1]),
            ("shadow_range.low", self.shadow_range[0]),
            ("shadow_range.high", self.shadow_range[1]),
            ("shadow_strength", self.shadow_strength),
            ("shadow_height_bias", self.shadow_height_bias),
            ("edge_fade", self.edge_fade),
            ("base_fade", self.base_fade),
            ("top_fade_start", self.top_fade_start),
            ("pointer_radius", self.pointer_radius),
            ("pointer_strength", self.pointer_strength),
        ]
    }

    /// Time shift after which the density and shadow lookups repeat.
    pub fn density_period(&self) -> f32 {
        1.0 / self.density_speed.abs()
    }

    /// Time shift after which the wind lookup repeats.
    pub fn wind_period(&self) -> f32 {
        1.0 / self.wind_speed.abs()
    }
}

fn check_range(name: &'static str, range: [f32; 2]) -> Result<(), ParamsError> {
    if range[0] < range[1] {
        Ok(())
    } else {
        Err(ParamsError::InvalidRange {
            name,
            low: range[0],
            high: range[1],
        })
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), ParamsError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ParamsError::NonPositive { name, value })
    }
}

fn check_fade(name: &'static str, value: f32, max: f32) -> Result<(), ParamsError> {
    check_positive(name, value)?;
    check_within(name, value, 0.0, max)
}

fn check_within(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ParamsError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ParamsError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
