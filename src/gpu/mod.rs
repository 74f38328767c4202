//! GPU state and per-frame rendering.
//!
//! Frame order: the baked model (opaque, writes depth), then the smoke
//! plume (blended, reads depth only), then the debug panel on top.
//!
//! The scene is drawn multisampled and resolved into the surface; the panel
//! is painted single-sampled after the resolve.

#[cfg(feature = "egui")]
pub mod egui_integration;
pub mod model_pass;
pub mod smoke_pass;
pub mod texture;

use std::sync::Arc;

use tracing::info;
use winit::window::Window;

use crate::error::GpuError;
use crate::mesh::PlumeMesh;
use crate::model::BakedModel;
use crate::noise::NoiseField;
use crate::params::SmokeParams;
use crate::scene::Frame;
use crate::shader::{ModelUniforms, SmokeUniforms};

#[cfg(feature = "egui")]
use egui_integration::EguiIntegration;
use model_pass::ModelPass;
use smoke_pass::SmokePass;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Scene MSAA sample count when the surface format supports it.
pub const MSAA_SAMPLES: u32 = 4;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};

/// Everything needed to draw one frame.
pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    depth_texture: wgpu::TextureView,
    /// Multisampled color target, absent when rendering single-sampled.
    msaa_texture: Option<wgpu::TextureView>,
    smoke: SmokePass,
    model: Option<ModelPass>,
    #[cfg(feature = "egui")]
    egui: EguiIntegration,
}

impl GpuState {
    /// Set up the device and both passes.
    ///
    /// `drawable_size` is the surface size in pixels; `model` is skipped
    /// when absent.
    pub async fn new(
        window: Arc<Window>,
        drawable_size: (u32, u32),
        params: &SmokeParams,
        noise: &NoiseField,
        mesh: &PlumeMesh,
        model: Option<&BakedModel>,
    ) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!("Using adapter {} ({:?})", adapter_info.name, adapter_info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format =
            pick_surface_format(&surface_caps.formats).ok_or(GpuError::UnsupportedSurface)?;
        let sample_count = pick_sample_count(adapter.get_texture_format_features(surface_format).flags);
        info!("Surface {surface_format:?}, {sample_count}x MSAA");
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(GpuError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: drawable_size.0.max(1),
            height: drawable_size.1.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config, sample_count);
        let msaa_texture = create_msaa_texture(&device, &config, sample_count);

        let smoke = SmokePass::new(&device, &queue, surface_format, sample_count, params, noise, mesh);
        let model = model.map(|model| ModelPass::new(&device, &queue, surface_format, sample_count, model));

        #[cfg(feature = "egui")]
        let egui = EguiIntegration::new(&device, surface_format, &window);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sample_count,
            depth_texture,
            msaa_texture,
            smoke,
            model,
            #[cfg(feature = "egui")]
            egui,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config, self.sample_count);
            self.msaa_texture = create_msaa_texture(&self.device, &self.config, self.sample_count);
        }
    }

    /// Reconfigure the surface at its current size, e.g. after it was lost.
    pub fn reconfigure(&mut self) {
        self.resize(self.config.width, self.config.height);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    #[cfg(feature = "egui")]
    pub fn egui_mut(&mut self) -> &mut EguiIntegration {
        &mut self.egui
    }

    fn update_uniforms(&self, frame: &Frame) {
        let smoke = SmokeUniforms::new(frame.view_proj, frame.plume_model, &frame.params, self.size());
        self.smoke.update(&self.queue, &smoke);

        if let Some(model) = &self.model {
            let uniforms = ModelUniforms {
                view_proj: frame.view_proj.to_cols_array_2d(),
            };
            model.update(&self.queue, &uniforms);
        }
    }

    /// Draw the scene, then the debug panel built by `ui`.
    #[cfg(feature = "egui")]
    pub fn render(
        &mut self,
        frame: &Frame,
        window: &Window,
        ui: impl FnMut(&egui::Context),
    ) -> Result<(), wgpu::SurfaceError> {
        let egui_output = self.egui.run(window, frame.drawable_scale, ui);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        self.update_uniforms(frame);
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.draw_scene(&mut encoder, &view);

        self.egui
            .prepare(&self.device, &self.queue, &mut encoder, &egui_output, &screen_descriptor);
        self.egui.paint(&mut encoder, &view, &egui_output, &screen_descriptor);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.egui.cleanup(&egui_output);

        Ok(())
    }

    /// Draw the scene.
    #[cfg(not(feature = "egui"))]
    pub fn render(&mut self, frame: &Frame) -> Result<(), wgpu::SurfaceError> {
        self.update_uniforms(frame);
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.draw_scene(&mut encoder, &view);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn draw_scene(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        // Multisampled: draw into the MSAA target, resolve into `view`.
        let color_attachment = match &self.msaa_texture {
            Some(msaa) => wgpu::RenderPassColorAttachment {
                view: msaa,
                resolve_target: Some(view),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Discard,
                },
            },
            None => wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            },
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // Opaque first so the smoke depth-tests against the cup.
        if let Some(model) = &self.model {
            model.draw(&mut render_pass);
        }
        self.smoke.draw(&mut render_pass);
    }
}

/// Prefer a non-sRGB surface: colors are written out exactly as shaded.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

fn pick_sample_count(flags: wgpu::TextureFormatFeatureFlags) -> u32 {
    if flags.sample_count_supported(MSAA_SAMPLES) {
        MSAA_SAMPLES
    } else {
        1
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_msaa_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("MSAA Color Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{TextureFormat, TextureFormatFeatureFlags};

    #[test]
    fn test_surface_prefers_non_srgb() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(pick_surface_format(&formats), Some(TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn test_surface_falls_back_to_first() {
        let formats = [TextureFormat::Rgba8UnormSrgb];
        assert_eq!(pick_surface_format(&formats), Some(TextureFormat::Rgba8UnormSrgb));
        assert_eq!(pick_surface_format(&[]), None);
    }

    #[test]
    fn test_msaa_when_supported() {
        let flags = TextureFormatFeatureFlags::MULTISAMPLE_X2 | TextureFormatFeatureFlags::MULTISAMPLE_X4;
        assert_eq!(pick_sample_count(flags), MSAA_SAMPLES);
    }

    #[test]
    fn test_single_sample_without_support() {
        assert_eq!(pick_sample_count(TextureFormatFeatureFlags::empty()), 1);
        assert_eq!(pick_sample_count(TextureFormatFeatureFlags::MULTISAMPLE_X2), 1);
    }
}
