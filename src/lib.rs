//! # Coffee Smoke
//!
//! A small real-time scene: a baked coffee cup with a wisp of smoke rising
//! out of it. The smoke is a tall subdivided plane, twisted and pushed
//! around by wind in the vertex shader, then given density, shadow and soft
//! edges in the fragment shader. Every shape comes from lookups into one
//! tileable noise texture that scrolls with time.
//!
//! ## Quick Start
//!
//! ```ignore
//! use coffee_smoke::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     Viewer::new()
//!         .with_model("static/bakedModel.glb")
//!         .with_noise_texture("static/perlin.png")
//!         .run()
//! }
//! ```
//!
//! ## Layout
//!
//! The shading math exists twice, kept in lockstep:
//!
//! - [`shading`] is a CPU reference over explicit inputs. It is what the
//!   tests check.
//! - [`shader`] generates the WGSL the GPU runs, with every tunable from
//!   [`SmokeParams`] baked in as a constant.
//!
//! Per-frame inputs (time, color, pointer) are collected by
//! [`scene::SceneState`] into an immutable [`FrameParams`]. The base color
//! is the only value that changes at runtime, through the "Smoke Color"
//! picker in the debug panel (feature `egui`, on by default).
//!
//! ## Tuning
//!
//! All constants live in [`SmokeParams`] and can be loaded from JSON:
//!
//! ```ignore
//! let params = SmokeParams::from_json_file("smoke.json")?;
//! Viewer::new().with_params(params).run()?;
//! ```

pub mod camera;
pub mod control;
pub mod error;
pub mod gpu;
pub mod input;
pub mod mesh;
pub mod model;
pub mod noise;
pub mod params;
pub mod scene;
pub mod shader;
pub mod shading;
pub mod textures;
pub mod time;
#[cfg(feature = "egui")]
pub mod ui;
pub mod viewer;
pub mod viewport;

pub use error::{AssetError, GpuError, ParamsError, ViewerError};
pub use glam::{Vec2, Vec3, Vec4};
pub use noise::NoiseField;
pub use params::{SmokeColor, SmokeParams};
pub use shading::{FrameParams, SmokeEffect};
pub use viewer::Viewer;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use coffee_smoke::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::OrbitCamera;
    pub use crate::control::ColorControl;
    pub use crate::error::{AssetError, GpuError, ParamsError, ViewerError};
    pub use crate::mesh::PlumeMesh;
    pub use crate::model::BakedModel;
    pub use crate::noise::NoiseField;
    pub use crate::params::{SmokeColor, SmokeParams};
    pub use crate::scene::{Frame, SceneState};
    pub use crate::shading::{FrameParams, SmokeEffect};
    pub use crate::textures::{AddressMode, FilterMode, TextureConfig};
    pub use crate::time::FrameClock;
    pub use crate::viewer::Viewer;
    pub use crate::viewport::Viewport;
    pub use crate::{Vec2, Vec3, Vec4};
    #[cfg(feature = "egui")]
    pub use egui;
}
