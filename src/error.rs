//! Error types for the viewer.
//!
//! The shading math itself cannot fail. Everything here comes from the
//! edges of the program: GPU setup, asset loading, and parameter files.

use std::path::PathBuf;

/// Errors that can occur during GPU initialization.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; ensure your system has a GPU with Vulkan/Metal/DX12/GL support")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported no usable formats for this adapter.
    #[error("surface is not supported by the selected adapter")]
    UnsupportedSurface,
}

/// Errors that can occur while loading the noise texture or the baked model.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Failed to read a file from disk.
    #[error("failed to read asset file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to decode an image.
    #[error("failed to decode image: {0}")]
    ImageLoad(#[from] image::ImageError),
    /// Failed to parse or import a glTF scene.
    #[error("failed to import glTF scene: {0}")]
    Gltf(#[from] gltf::Error),
    /// The scene has no object with the requested name.
    #[error("object '{name}' not found in {path}")]
    MissingObject { name: String, path: PathBuf },
    /// The scene contains no scenes or no drawable primitives.
    #[error("no drawable geometry in {0}")]
    EmptyScene(PathBuf),
    /// A primitive is missing a required vertex attribute.
    #[error("mesh primitive is missing the {0} attribute")]
    MissingAttribute(&'static str),
    /// An embedded image uses a pixel format we do not upload.
    #[error("unsupported image format {0}")]
    UnsupportedImageFormat(String),
    /// Raw RGBA data does not match the declared dimensions.
    #[error("RGBA data size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Errors that can occur while loading or validating smoke parameters.
#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    /// Failed to read the parameter file.
    #[error("failed to read parameter file: {0}")]
    Io(#[from] std::io::Error),
    /// The parameter file is not valid JSON for [`SmokeParams`](crate::SmokeParams).
    #[error("invalid parameter file: {0}")]
    Json(#[from] serde_json::Error),
    /// NaN or infinity, which would not survive WGSL generation.
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },
    /// A smoothstep range whose low edge is not below its high edge.
    #[error("{name}: low edge {low} must be below high edge {high}")]
    InvalidRange { name: &'static str, low: f32, high: f32 },
    /// A value that has to be strictly positive.
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    /// A value outside its allowed interval.
    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Errors that can occur when running the viewer.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Smoke parameters were rejected.
    #[error("smoke parameters: {0}")]
    Params(#[from] ParamsError),
}
