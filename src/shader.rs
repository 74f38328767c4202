//! WGSL generation and GPU uniform layouts.
//!
//! The smoke shader is generated from [`SmokeParams`]: every tunable
//! constant is emitted as a WGSL `const`, so the GPU runs the same numbers
//! as the CPU reference in [`crate::shading`]. Only per-frame values
//! (matrices, time, color, pointer, resolution) travel through the uniform
//! buffer.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::params::SmokeParams;
use crate::shading::{FrameParams, MIN_WIND_HEIGHT, WIND_COLUMNS};

/// Per-frame uniforms for the smoke pass.
///
/// Mirrors the WGSL `SmokeUniforms` struct; the trailing padding rounds the
/// size up to the 16-byte multiple WGSL uses for uniform structs.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SmokeUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub time: f32,
    pub pointer: [f32; 2],
    pub resolution: [f32; 2],
    /// 1.0 when `pointer` holds a real position, 0.0 otherwise.
    pub pointer_active: f32,
    pub _padding: [f32; 3],
}

impl SmokeUniforms {
    pub fn new(view_proj: Mat4, model: Mat4, frame: &FrameParams, resolution: (u32, u32)) -> Self {
        let (pointer, pointer_active) = match frame.pointer {
            Some(p) => (p.to_array(), 1.0),
            None => ([0.0; 2], 0.0),
        };
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            color: frame.color.to_array(),
            time: frame.time,
            pointer,
            resolution: [resolution.0.max(1) as f32, resolution.1.max(1) as f32],
            pointer_active,
            _padding: [0.0; 3],
        }
    }
}

/// Per-frame uniforms for the baked model pass.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ModelUniforms {
    pub view_proj: [[f32; 4]; 4],
}

/// Format an `f32` as a WGSL float literal.
///
/// `Debug` always keeps a decimal point or an exponent, so integral values
/// never turn into integer literals.
pub fn wgsl_f32(value: f32) -> String {
    format!("{:?}", value)
}

/// Generate the smoke vertex + fragment shader for a parameter set.
pub fn smoke_shader(params: &SmokeParams) -> String {
    let p = params;
    let f = wgsl_f32;
    format!(
        r#"struct SmokeUniforms {{
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    color: vec3<f32>,
    time: f32,
    pointer: vec2<f32>,
    resolution: vec2<f32>,
    pointer_active: f32,
}};

@group(0) @binding(0)
var<uniform> uniforms: SmokeUniforms;

@group(0) @binding(1)
var noise_texture: texture_2d<f32>;

@group(0) @binding(2)
var noise_sampler: sampler;

const TWIST: f32 = {twist};
const WIND_U_SCALE: f32 = {wind_u_scale};
const WIND_FREQUENCY: f32 = {wind_frequency};
const WIND_SPEED: f32 = {wind_speed};
const WIND_STRENGTH: f32 = {wind_strength};
const WIND_EXPONENT: f32 = {wind_exponent};
const WIND_COLUMN_X: f32 = {wind_column_x};
const WIND_COLUMN_Z: f32 = {wind_column_z};
const MIN_WIND_HEIGHT: f32 = {min_wind_height};

const DENSITY_SCALE: vec2<f32> = vec2<f32>({density_scale_u}, {density_scale_v});
const DENSITY_SPEED: f32 = {density_speed};
const DENSITY_LOW: f32 = {density_low};
const DENSITY_HIGH: f32 = {density_high};

const SHADOW_SCALE: vec2<f32> = vec2<f32>({shadow_scale_u}, {shadow_scale_v});
const SHADOW_OFFSET: vec2<f32> = vec2<f32>({shadow_offset_u}, {shadow_offset_v});
const SHADOW_LOW: f32 = {shadow_low};
const SHADOW_HIGH: f32 = {shadow_high};
const SHADOW_STRENGTH: f32 = {shadow_strength};
const SHADOW_TOP_WEIGHT: f32 = {shadow_top_weight};

const EDGE_FADE: f32 = {edge_fade};
const EDGE_FADE_END: f32 = {edge_fade_end};
const BASE_FADE: f32 = {base_fade};
const TOP_FADE_START: f32 = {top_fade_start};

const POINTER_RADIUS: f32 = {pointer_radius};
const POINTER_STRENGTH: f32 = {pointer_strength};

struct VertexInput {{
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
}};

struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}};

fn rotate2d(v: vec2<f32>, angle: f32) -> vec2<f32> {{
    let s = sin(angle);
    let c = cos(angle);
    return vec2<f32>(c * v.x - s * v.y, s * v.x + c * v.y);
}}

fn sample_noise(uv: vec2<f32>) -> f32 {{
    return textureSampleLevel(noise_texture, noise_sampler, uv, 0.0).r;
}}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {{
    var position = in.position;

    // Twist
    let twisted = rotate2d(vec2<f32>(position.x, position.z), in.uv.y * TWIST);
    position.x = twisted.x;
    position.z = twisted.y;

    // Wind
    let scroll = in.uv.y * WIND_FREQUENCY - uniforms.time * WIND_SPEED;
    let column = in.uv.x * WIND_U_SCALE;
    var wind = vec2<f32>(
        sample_noise(vec2<f32>(column + WIND_COLUMN_X, scroll)) - 0.5,
        sample_noise(vec2<f32>(column + WIND_COLUMN_Z, scroll)) - 0.5,
    );
    wind *= pow(max(in.uv.y, MIN_WIND_HEIGHT), WIND_EXPONENT) * WIND_STRENGTH;
    position.x += wind.x;
    position.z += wind.y;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * uniforms.model * vec4<f32>(position, 1.0);
    out.uv = in.uv;
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    let uv = in.uv;
    let ndc = vec2<f32>(
        in.clip_position.x / uniforms.resolution.x * 2.0 - 1.0,
        1.0 - in.clip_position.y / uniforms.resolution.y * 2.0,
    );

    // Pointer swirl
    let to_fragment = ndc - uniforms.pointer;
    let influence = (1.0 - smoothstep(0.0, POINTER_RADIUS, length(to_fragment))) * uniforms.pointer_active;
    let swirl = vec2<f32>(-to_fragment.y, to_fragment.x) * influence * POINTER_STRENGTH;

    // Density
    let scroll = uniforms.time * DENSITY_SPEED;
    let density_uv = vec2<f32>(uv.x * DENSITY_SCALE.x, uv.y * DENSITY_SCALE.y - scroll) + swirl;
    let density = smoothstep(DENSITY_LOW, DENSITY_HIGH, sample_noise(density_uv));

    // Shadow
    let shadow_uv = vec2<f32>(
        uv.x * SHADOW_SCALE.x + SHADOW_OFFSET.x,
        uv.y * SHADOW_SCALE.y + SHADOW_OFFSET.y - scroll,
    );
    let occlusion = smoothstep(SHADOW_LOW, SHADOW_HIGH, sample_noise(shadow_uv))
        * mix(1.0, SHADOW_TOP_WEIGHT, uv.y);
    let color = uniforms.color * (1.0 - SHADOW_STRENGTH * occlusion);

    // Edge and height falloff
    let falloff = smoothstep(0.0, EDGE_FADE, uv.x)
        * (1.0 - smoothstep(EDGE_FADE_END, 1.0, uv.x))
        * smoothstep(0.0, BASE_FADE, uv.y)
        * (1.0 - smoothstep(TOP_FADE_START, 1.0, uv.y));

    return vec4<f32>(color, density * falloff);
}}
"#,
        twist = f(p.twist),
        wind_u_scale = f(p.wind_u_scale),
        wind_frequency = f(p.wind_frequency),
        wind_speed = f(p.wind_speed),
        wind_strength = f(p.wind_strength),
        wind_exponent = f(p.wind_exponent),
        wind_column_x = f(WIND_COLUMNS[0]),
        wind_column_z = f(WIND_COLUMNS[1]),
        min_wind_height = f(MIN_WIND_HEIGHT),
        density_scale_u = f(p.density_scale[0]),
        density_scale_v = f(p.density_scale[1]),
        density_speed = f(p.density_speed),
        density_low = f(p.density_range[0]),
        density_high = f(p.density_range[1]),
        shadow_scale_u = f(p.shadow_scale[0]),
        shadow_scale_v = f(p.shadow_scale[1]),
        shadow_offset_u = f(p.shadow_offset[0]),
        shadow_offset_v = f(p.shadow_offset[1]),
        shadow_low = f(p.shadow_range[0]),
        shadow_high = f(p.shadow_range[1]),
        shadow_strength = f(p.shadow_strength),
        shadow_top_weight = f(1.0 - p.shadow_height_bias),
        edge_fade = f(p.edge_fade),
        edge_fade_end = f(1.0 - p.edge_fade),
        base_fade = f(p.base_fade),
        top_fade_start = f(p.top_fade_start),
        pointer_radius = f(p.pointer_radius),
        pointer_strength = f(p.pointer_strength),
    )
}

/// Unlit textured shader for the baked model. The lighting is already in
/// the texture.
pub const MODEL_SHADER: &str = r#"struct ModelUniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: ModelUniforms;

@group(1) @binding(0)
var base_color: texture_2d<f32>;

@group(1) @binding(1)
var base_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(in.position, 1.0);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(base_color, base_sampler, in.uv);
    return vec4<f32>(texel.rgb, 1.0);
}
"#;
