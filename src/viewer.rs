//! Viewer builder and runner.
//!
//! ```ignore
//! use coffee_smoke::prelude::*;
//!
//! Viewer::new()
//!     .with_noise_texture("static/perlin.png")
//!     .with_model("static/bakedModel.glb")
//!     .with_smoke_color(SmokeColor::new(0.6, 0.3, 0.2))
//!     .run()?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::ViewerError;
use crate::gpu::GpuState;
use crate::mesh::PlumeMesh;
use crate::model::{BakedModel, DEFAULT_OBJECT_NAME};
use crate::noise::NoiseField;
use crate::params::{SmokeColor, SmokeParams};
use crate::scene::SceneState;
use crate::viewport::Viewport;

/// A coffee smoke viewer.
///
/// Use method chaining to configure, then call `.run()` to open the window.
#[derive(Debug, Clone)]
pub struct Viewer {
    noise_path: Option<PathBuf>,
    model_path: Option<PathBuf>,
    object_name: String,
    params: SmokeParams,
    window_size: (u32, u32),
    smoke_color: SmokeColor,
    title: String,
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            noise_path: None,
            model_path: None,
            object_name: DEFAULT_OBJECT_NAME.to_string(),
            params: SmokeParams::default(),
            window_size: (1280, 720),
            smoke_color: SmokeColor::DEFAULT,
            title: "Coffee Smoke".to_string(),
        }
    }

    /// Load the noise field from an image instead of generating it.
    pub fn with_noise_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.noise_path = Some(path.into());
        self
    }

    /// Draw a baked glTF/GLB model under the smoke.
    pub fn with_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Name of the object that must exist in the model.
    pub fn with_object_name(mut self, name: impl Into<String>) -> Self {
        self.object_name = name.into();
        self
    }

    pub fn with_params(mut self, params: SmokeParams) -> Self {
        self.params = params;
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width.max(1), height.max(1));
        self
    }

    pub fn with_smoke_color(mut self, color: SmokeColor) -> Self {
        self.smoke_color = color;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn params(&self) -> &SmokeParams {
        &self.params
    }

    /// Open the window and run until it is closed.
    ///
    /// Bad parameters and GPU setup failures are errors. A noise image
    /// or model that fails to load is logged and replaced by the
    /// procedural noise or skipped, respectively.
    pub fn run(self) -> Result<(), ViewerError> {
        self.params.validate()?;

        let assets = Assets {
            noise: load_noise(self.noise_path.as_deref()),
            model: self
                .model_path
                .as_deref()
                .and_then(|path| load_model(path, &self.object_name)),
            mesh: PlumeMesh::coffee_plume(),
            params: self.params,
        };

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            window: None,
            gpu_state: None,
            scene: None,
            assets,
            title: self.title,
            window_size: self.window_size,
            smoke_color: self.smoke_color,
            error: None,
        };
        event_loop.run_app(&mut app)?;

        match app.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the noise image, or fall back to the procedural field.
pub fn load_noise(path: Option<&Path>) -> NoiseField {
    let Some(path) = path else {
        info!("Using procedural noise");
        return NoiseField::procedural_default();
    };
    match NoiseField::from_file(path) {
        Ok(noise) => {
            info!(
                "Loaded noise {} ({}x{})",
                path.display(),
                noise.width(),
                noise.height()
            );
            noise
        }
        Err(err) => {
            warn!("Failed to load noise {}: {err}; using procedural noise", path.display());
            NoiseField::procedural_default()
        }
    }
}

/// Load the baked model, or `None` if it can't be used.
pub fn load_model(path: &Path, object_name: &str) -> Option<BakedModel> {
    match BakedModel::load(path, object_name) {
        Ok(model) => Some(model),
        Err(err) => {
            warn!("Failed to load model {}: {err}; rendering smoke only", path.display());
            None
        }
    }
}

struct Assets {
    noise: NoiseField,
    model: Option<BakedModel>,
    mesh: PlumeMesh,
    params: SmokeParams,
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    scene: Option<SceneState>,
    assets: Assets,
    title: String,
    window_size: (u32, u32),
    smoke_color: SmokeColor,
    error: Option<ViewerError>,
}

impl App {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(self.window_size.0, self.window_size.1));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let viewport = Viewport::from_physical(window.inner_size(), window.scale_factor());

        let gpu_state = pollster::block_on(GpuState::new(
            window.clone(),
            viewport.drawable_size(),
            &self.assets.params,
            &self.assets.noise,
            &self.assets.mesh,
            self.assets.model.as_ref(),
        ))?;

        info!(
            "Viewer ready: {}x{} drawable, pixel ratio {}",
            viewport.drawable_size().0,
            viewport.drawable_size().1,
            viewport.pixel_ratio()
        );

        self.scene = Some(SceneState::new(viewport, self.assets.params.clone(), self.smoke_color));
        self.gpu_state = Some(gpu_state);
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                error!("Failed to start viewer: {err}");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let (Some(window), Some(gpu_state), Some(scene)) =
            (&self.window, &mut self.gpu_state, &mut self.scene)
        else {
            return;
        };

        #[cfg(feature = "egui")]
        let consumed = gpu_state.egui_mut().on_window_event(window, &event);
        #[cfg(not(feature = "egui"))]
        let consumed = false;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                let viewport = Viewport::from_physical(physical_size, window.scale_factor());
                let (width, height) = viewport.drawable_size();
                debug!("Resized to {width}x{height} (aspect {:.3})", viewport.aspect());
                scene.set_viewport(viewport);
                gpu_state.resize(width, height);
            }
            WindowEvent::RedrawRequested => {
                let frame = scene.advance();

                #[cfg(feature = "egui")]
                let result = gpu_state.render(&frame, window, |ctx| {
                    crate::ui::smoke_panel(ctx, scene.color_control_mut());
                });
                #[cfg(not(feature = "egui"))]
                let result = gpu_state.render(&frame);

                match result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("GPU out of memory");
                        event_loop.exit();
                    }
                    Err(e) => error!("Render error: {e:?}"),
                }
                window.request_redraw();
            }
            ref other => {
                let viewport = *scene.viewport();
                scene.pointer_mut().handle_event_under_ui(other, &viewport, consumed);
            }
        }
    }
}
