//! Drawable surface sizing.
//!
//! Sizes are tracked in logical pixels plus a device pixel ratio. The
//! drawable is rendered at `min(ratio, 2)` so very dense displays don't
//! pay for pixels nobody can tell apart.

use winit::dpi::PhysicalSize;

/// Highest device pixel ratio the drawable is rendered at.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
    device_pixel_ratio: f64,
}

impl Viewport {
    /// A viewport of `width × height` logical pixels.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            device_pixel_ratio: sanitize_ratio(device_pixel_ratio),
        }
    }

    /// Build from a winit physical size and scale factor.
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let scale_factor = sanitize_ratio(scale_factor);
        Self::new(
            size.width as f64 / scale_factor,
            size.height as f64 / scale_factor,
            scale_factor,
        )
    }

    /// Resize in logical pixels, keeping the pixel ratio.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        self.device_pixel_ratio = sanitize_ratio(ratio);
    }

    pub fn logical_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Ratio the drawable is actually rendered at.
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
    }

    /// Drawable pixels per physical window pixel; below 1 once the ratio
    /// is capped.
    ///
    /// UI laid out at the window's scale factor must be multiplied by this
    /// to land on the drawable.
    pub fn drawable_scale(&self) -> f32 {
        (self.pixel_ratio() / self.device_pixel_ratio) as f32
    }

    /// Drawable size in pixels, never zero.
    pub fn drawable_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        (
            ((self.width * ratio).round() as u32).max(1),
            ((self.height * ratio).round() as u32).max(1),
        )
    }

    /// Projection aspect ratio.
    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }

    /// Map a cursor position in physical window pixels to NDC.
    ///
    /// x runs from -1 at the left to 1 at the right; y from 1 at the top
    /// to -1 at the bottom.
    pub fn physical_to_ndc(&self, x: f64, y: f64) -> glam::Vec2 {
        let width = self.width * self.device_pixel_ratio;
        let height = self.height * self.device_pixel_ratio;
        glam::Vec2::new(
            (x / width * 2.0 - 1.0) as f32,
            (-(y / height) * 2.0 + 1.0) as f32,
        )
    }
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_updates_aspect_and_drawable() {
        let mut viewport = Viewport::new(800.0, 600.0, 1.0);
        assert_eq!(viewport.drawable_size(), (800, 600));

        viewport.resize(1600.0, 900.0);
        assert!((viewport.aspect() - 1600.0 / 900.0).abs() < 1e-6);
        assert_eq!(viewport.drawable_size(), (1600, 900));
    }

    #[test]
    fn test_pixel_ratio_capped_at_two() {
        let viewport = Viewport::new(1600.0, 900.0, 3.0);
        assert_eq!(viewport.pixel_ratio(), 2.0);
        assert_eq!(viewport.drawable_size(), (3200, 1800));
    }

    #[test]
    fn test_fractional_ratio() {
        let viewport = Viewport::new(1001.0, 500.0, 1.5);
        assert_eq!(viewport.drawable_size(), (1502, 750));
    }

    #[test]
    fn test_from_physical() {
        let viewport = Viewport::from_physical(PhysicalSize::new(2400, 1350), 1.5);
        assert_eq!(viewport.logical_size(), (1600.0, 900.0));
        assert_eq!(viewport.drawable_size(), (2400, 1350));
    }

    #[test]
    fn test_minimized_window_never_zero() {
        let viewport = Viewport::from_physical(PhysicalSize::new(0, 0), 1.0);
        assert_eq!(viewport.drawable_size(), (1, 1));
    }

    #[test]
    fn test_ndc_corners() {
        let viewport = Viewport::new(800.0, 600.0, 2.0);
        assert_eq!(viewport.physical_to_ndc(0.0, 0.0), glam::Vec2::new(-1.0, 1.0));
        assert_eq!(viewport.physical_to_ndc(1600.0, 1200.0), glam::Vec2::new(1.0, -1.0));
        assert_eq!(viewport.physical_to_ndc(800.0, 600.0), glam::Vec2::ZERO);
    }

    #[test]
    fn test_bad_ratio_falls_back() {
        let viewport = Viewport::new(10.0, 10.0, f64::NAN);
        assert_eq!(viewport.device_pixel_ratio(), 1.0);
    }

    #[test]
    fn test_drawable_scale_follows_cap() {
        assert_eq!(Viewport::new(800.0, 600.0, 1.5).drawable_scale(), 1.0);

        let viewport = Viewport::from_physical(PhysicalSize::new(2400, 1350), 3.0);
        let (width, height) = viewport.drawable_size();
        assert_eq!((width, height), (1600, 900));

        // Logical points laid out at the window scale must cover the drawable.
        let points_per_pixel = 3.0 * viewport.drawable_scale();
        let (logical_width, logical_height) = viewport.logical_size();
        assert!((logical_width as f32 * points_per_pixel - width as f32).abs() < 1e-3);
        assert!((logical_height as f32 * points_per_pixel - height as f32).abs() < 1e-3);
    }
}
