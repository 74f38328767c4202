//! State carried between frames.
//!
//! [`SceneState`] collects everything that can change while the viewer
//! runs: window size, camera, pointer, clock and the smoke color. Once per
//! frame it is folded into an immutable [`Frame`] that the renderer reads.

use std::cell::Cell;
use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::camera::OrbitCamera;
use crate::control::ColorControl;
use crate::input::PointerInput;
use crate::params::{SmokeColor, SmokeParams};
use crate::shading::FrameParams;
use crate::time::FrameClock;
use crate::viewport::Viewport;

/// Height of the plume base above the table.
pub const PLUME_HEIGHT: f32 = 1.83;

/// Label of the color picker in the debug panel.
pub const SMOKE_COLOR_LABEL: &str = "Smoke Color";

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub params: FrameParams,
    pub view_proj: Mat4,
    pub plume_model: Mat4,
    pub drawable_size: (u32, u32),
    /// See [`Viewport::drawable_scale`].
    pub drawable_scale: f32,
}

#[derive(Debug)]
pub struct SceneState {
    viewport: Viewport,
    camera: OrbitCamera,
    pointer: PointerInput,
    clock: FrameClock,
    color_control: ColorControl,
    shading_color: Rc<Cell<SmokeColor>>,
    params: SmokeParams,
    plume_model: Mat4,
}

impl SceneState {
    pub fn new(viewport: Viewport, params: SmokeParams, color: SmokeColor) -> Self {
        let color = color.clamped();
        let shading_color = Rc::new(Cell::new(color));
        let mut color_control = ColorControl::new(SMOKE_COLOR_LABEL, color);
        let sink = Rc::clone(&shading_color);
        color_control.on_change(move |c| sink.set(c));

        Self {
            viewport,
            camera: OrbitCamera::coffee_view(),
            pointer: PointerInput::new(),
            clock: FrameClock::new(),
            color_control,
            shading_color,
            params,
            plume_model: Mat4::from_translation(Vec3::new(0.0, PLUME_HEIGHT, 0.0)),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn pointer(&self) -> &PointerInput {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerInput {
        &mut self.pointer
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn params(&self) -> &SmokeParams {
        &self.params
    }

    pub fn color_control(&self) -> &ColorControl {
        &self.color_control
    }

    pub fn color_control_mut(&mut self) -> &mut ColorControl {
        &mut self.color_control
    }

    /// Color the next frame will shade with.
    pub fn shading_color(&self) -> SmokeColor {
        self.shading_color.get()
    }

    /// Resize the drawable, in logical pixels.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
        self.pointer.refresh(&self.viewport);
    }

    /// Replace the viewport, e.g. after a winit resize or scale change.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.pointer.refresh(&self.viewport);
    }

    /// Sample the clock and build this frame.
    pub fn advance(&mut self) -> Frame {
        let time = self.clock.update();
        self.frame(time)
    }

    /// Build the frame for `time` seconds since start.
    ///
    /// Applies pending camera drags, then snapshots color and pointer.
    pub fn frame(&mut self, time: f32) -> Frame {
        let drag = self.pointer.take_drag();
        if drag != glam::Vec2::ZERO {
            self.camera.drag(drag.x, drag.y);
        }
        self.camera.update();

        let mut params = FrameParams::at(time).with_color(self.shading_color.get());
        if let Some(ndc) = self.pointer.ndc() {
            params = params.with_pointer(ndc);
        }

        Frame {
            params,
            view_proj: self.camera.view_proj(self.viewport.aspect()),
            plume_model: self.plume_model,
            drawable_size: self.viewport.drawable_size(),
            drawable_scale: self.viewport.drawable_scale(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> SceneState {
        SceneState::new(
            Viewport::new(800.0, 600.0, 1.0),
            SmokeParams::default(),
            SmokeColor::DEFAULT,
        )
    }

    #[test]
    fn test_initial_frame() {
        let mut scene = scene();
        let frame = scene.frame(0.0);
        assert_eq!(frame.params.time, 0.0);
        assert_eq!(frame.params.color, SmokeColor::DEFAULT);
        assert_eq!(frame.params.pointer, None);
        assert_eq!(frame.drawable_size, (800, 600));
        assert_eq!(frame.plume_model.w_axis.y, PLUME_HEIGHT);
    }

    #[test]
    fn test_color_edit_reaches_next_frame() {
        let mut scene = scene();
        let teal = SmokeColor::new(0.0, 0.5, 0.5);
        assert!(scene.color_control_mut().set(teal));
        assert_eq!(scene.shading_color(), teal);
        assert_eq!(scene.frame(1.0).params.color, teal);
    }

    #[test]
    fn test_pointer_reaches_frame() {
        let mut scene = scene();
        let viewport = *scene.viewport();
        scene.pointer_mut().cursor_moved(400.0, 300.0, &viewport);
        assert_eq!(scene.frame(0.5).params.pointer, Some(glam::Vec2::ZERO));
    }

    #[test]
    fn test_resize_keeps_params() {
        let mut scene = scene();
        let before = scene.params().clone();
        scene.resize(1600.0, 900.0);
        let frame = scene.frame(0.0);
        assert_eq!(frame.drawable_size, (1600, 900));
        assert!((scene.viewport().aspect() - 1600.0 / 900.0).abs() < 1e-6);
        assert_eq!(*scene.params(), before);
    }

    #[test]
    fn test_dense_display_frame_scales_panel() {
        let mut scene = scene();
        scene.set_viewport(Viewport::new(800.0, 450.0, 3.0));
        let frame = scene.frame(0.0);
        assert_eq!(frame.drawable_size, (1600, 900));
        assert!((frame.drawable_scale - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_drag_orbits_camera() {
        let mut scene = scene();
        let viewport = *scene.viewport();
        let yaw = scene.camera().yaw;
        scene.pointer_mut().cursor_moved(100.0, 100.0, &viewport);
        scene.pointer_mut().left_button(true);
        scene.pointer_mut().cursor_moved(200.0, 100.0, &viewport);
        scene.frame(0.0);
        assert!(scene.camera().yaw < yaw);
    }
}
