//! CPU reference model of the smoke effect.
//!
//! [`SmokeEffect`] evaluates exactly the math the generated WGSL runs on the
//! GPU (see [`crate::shader`]), one vertex or one fragment at a time. Every
//! input is explicit: the plume UV, the fragment's position in normalized
//! device coordinates, and a [`FrameParams`] that stays fixed for the whole
//! frame.
//!
//! # Vertex stage
//!
//! 1. Twist (x, z) around the vertical axis by `v * twist`.
//! 2. Push (x, z) by two wind samples taken from a noise column that
//!    scrolls down over time, scaled by `v^wind_exponent` so the base stays
//!    put while the top sways.
//!
//! # Fragment stage
//!
//! 1. Swirl the density lookup around the pointer, if there is one.
//! 2. Density: scrolling noise sample remapped with `smoothstep`.
//! 3. Shadow: a second, phase-shifted sample darkens the base color,
//!    more at the base than at the top.
//! 4. Falloff: fade alpha to zero at the left, right, bottom and top edges.
//!
//! The output is `(color * shadow, density * falloff)`.

use glam::{Vec2, Vec3, Vec4};

use crate::error::ParamsError;
use crate::noise::NoiseField;
use crate::params::{SmokeColor, SmokeParams};

/// U offsets of the two wind lookups. Far apart so x and z sway
/// independently.
pub const WIND_COLUMNS: [f32; 2] = [0.25, 0.75];

/// Lower bound on `v` before raising it to the wind exponent.
pub const MIN_WIND_HEIGHT: f32 = 0.0001;

/// Shading inputs that stay fixed for a whole frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Seconds since start.
    pub time: f32,
    /// Base smoke color.
    pub color: SmokeColor,
    /// Pointer position in NDC, `None` until the pointer first moves.
    pub pointer: Option<Vec2>,
}

impl FrameParams {
    /// Frame at `time` with the default color and no pointer.
    pub fn at(time: f32) -> Self {
        Self {
            time,
            color: SmokeColor::DEFAULT,
            pointer: None,
        }
    }

    pub fn with_color(mut self, color: SmokeColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_pointer(mut self, pointer: Vec2) -> Self {
        self.pointer = Some(pointer);
        self
    }
}

impl Default for FrameParams {
    fn default() -> Self {
        Self::at(0.0)
    }
}

/// Hermite smoothstep, matching WGSL's `smoothstep(low, high, x)`.
pub fn smoothstep(low: f32, high: f32, x: f32) -> f32 {
    let t = ((x - low) / (high - low)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Rotate a 2D vector counter-clockwise.
pub fn rotate2d(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(c * v.x - s * v.y, s * v.x + c * v.y)
}

/// The smoke effect: tunable constants plus the noise they sample.
#[derive(Debug, Clone)]
pub struct SmokeEffect {
    params: SmokeParams,
    noise: NoiseField,
}

impl SmokeEffect {
    /// Validate `params` and pair them with a noise field.
    pub fn new(params: SmokeParams, noise: NoiseField) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self { params, noise })
    }

    pub fn params(&self) -> &SmokeParams {
        &self.params
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    // ========== Vertex stage ==========

    /// Twist the (x, z) position by an angle proportional to height.
    pub fn twist(&self, position: Vec3, v: f32) -> Vec3 {
        let xz = rotate2d(Vec2::new(position.x, position.z), v * self.params.twist);
        Vec3::new(xz.x, position.y, xz.y)
    }

    /// Horizontal (x, z) wind displacement for a vertex.
    pub fn wind_offset(&self, uv: Vec2, time: f32) -> Vec2 {
        let p = &self.params;
        let scroll = uv.y * p.wind_frequency - time * p.wind_speed;
        let column = uv.x * p.wind_u_scale;
        let wind = Vec2::new(
            self.noise.sample(Vec2::new(column + WIND_COLUMNS[0], scroll)) - 0.5,
            self.noise.sample(Vec2::new(column + WIND_COLUMNS[1], scroll)) - 0.5,
        );
        wind * uv.y.max(MIN_WIND_HEIGHT).powf(p.wind_exponent) * p.wind_strength
    }

    /// Local-space position after twist and wind.
    pub fn displace_vertex(&self, position: Vec3, uv: Vec2, time: f32) -> Vec3 {
        let twisted = self.twist(position, uv.y);
        let wind = self.wind_offset(uv, time);
        Vec3::new(twisted.x + wind.x, twisted.y, twisted.z + wind.y)
    }

    // ========== Fragment stage ==========

    /// UV displacement applied to the density lookup near the pointer.
    pub fn pointer_swirl(&self, ndc: Vec2, pointer: Option<Vec2>) -> Vec2 {
        let Some(pointer) = pointer else {
            return Vec2::ZERO;
        };
        let to_fragment = ndc - pointer;
        let influence = 1.0 - smoothstep(0.0, self.params.pointer_radius, to_fragment.length());
        to_fragment.perp() * influence * self.params.pointer_strength
    }

    /// Density in `[0, 1]` before falloff.
    pub fn density(&self, uv: Vec2, ndc: Vec2, frame: &FrameParams) -> f32 {
        let p = &self.params;
        let scroll = frame.time * p.density_speed;
        let lookup = Vec2::new(uv.x * p.density_scale[0], uv.y * p.density_scale[1] - scroll)
            + self.pointer_swirl(ndc, frame.pointer);
        smoothstep(p.density_range[0], p.density_range[1], self.noise.sample(lookup))
    }

    /// Multiplicative shadow factor in `(0, 1]` applied to the base color.
    pub fn shadow(&self, uv: Vec2, time: f32) -> f32 {
        let p = &self.params;
        let scroll = time * p.density_speed;
        let lookup = Vec2::new(
            uv.x * p.shadow_scale[0] + p.shadow_offset[0],
            uv.y * p.shadow_scale[1] + p.shadow_offset[1] - scroll,
        );
        let height_weight = lerp(1.0, 1.0 - p.shadow_height_bias, uv.y);
        let occlusion =
            smoothstep(p.shadow_range[0], p.shadow_range[1], self.noise.sample(lookup)) * height_weight;
        1.0 - p.shadow_strength * occlusion
    }

    /// Alpha attenuation hiding the plume's rectangular boundary.
    ///
    /// Exactly zero at `u = 0`, `u = 1`, `v = 0`, `v = 1` and everywhere
    /// outside the unit square.
    pub fn falloff(&self, uv: Vec2) -> f32 {
        let p = &self.params;
        smoothstep(0.0, p.edge_fade, uv.x)
            * (1.0 - smoothstep(1.0 - p.edge_fade, 1.0, uv.x))
            * smoothstep(0.0, p.base_fade, uv.y)
            * (1.0 - smoothstep(p.top_fade_start, 1.0, uv.y))
    }

    /// Final RGBA for a fragment.
    pub fn shade_fragment(&self, uv: Vec2, ndc: Vec2, frame: &FrameParams) -> Vec4 {
        let rgb = frame.color.to_vec3() * self.shadow(uv, frame.time);
        let alpha = self.density(uv, ndc, frame) * self.falloff(uv);
        rgb.extend(alpha)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
