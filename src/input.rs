//! Pointer tracking.
//!
//! Two things come from the pointer: its position in normalized device
//! coordinates, which drives the swirl in the smoke, and left-button drags,
//! which orbit the camera.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};

use crate::viewport::Viewport;

#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    physical: Option<Vec2>,
    ndc: Option<Vec2>,
    dragging: bool,
    drag_delta: Vec2,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer position in NDC, or `None` while it is outside the window.
    pub fn ndc(&self) -> Option<Vec2> {
        self.ndc
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Drag distance in physical pixels accumulated since the last call.
    pub fn take_drag(&mut self) -> Vec2 {
        std::mem::take(&mut self.drag_delta)
    }

    /// Cursor moved to `(x, y)` physical pixels.
    pub fn cursor_moved(&mut self, x: f64, y: f64, viewport: &Viewport) {
        let position = Vec2::new(x as f32, y as f32);
        if self.dragging {
            if let Some(previous) = self.physical {
                self.drag_delta += position - previous;
            }
        }
        self.physical = Some(position);
        self.ndc = Some(viewport.physical_to_ndc(x, y));
    }

    pub fn cursor_left(&mut self) {
        self.physical = None;
        self.ndc = None;
        self.dragging = false;
    }

    pub fn left_button(&mut self, pressed: bool) {
        self.dragging = pressed;
    }

    /// Recompute NDC after the window changes size.
    pub fn refresh(&mut self, viewport: &Viewport) {
        if let Some(p) = self.physical {
            self.ndc = Some(viewport.physical_to_ndc(p.x as f64, p.y as f64));
        }
    }

    /// Process a winit window event. Returns `true` if it was a pointer event.
    pub fn handle_event(&mut self, event: &WindowEvent, viewport: &Viewport) -> bool {
        self.handle_event_under_ui(event, viewport, false)
    }

    /// Like [`handle_event`](Self::handle_event), for events the debug panel
    /// may have consumed.
    ///
    /// With `captured` set only button releases and the cursor leaving get
    /// through, so a drag that ends over the panel still ends.
    pub fn handle_event_under_ui(&mut self, event: &WindowEvent, viewport: &Viewport, captured: bool) -> bool {
        match PointerEvent::from_window_event(event) {
            Some(pointer_event) => {
                self.apply(pointer_event, viewport, captured);
                true
            }
            None => false,
        }
    }

    pub fn apply(&mut self, event: PointerEvent, viewport: &Viewport, captured: bool) {
        match event {
            PointerEvent::Moved { x, y } if !captured => self.cursor_moved(x, y, viewport),
            PointerEvent::Left => self.cursor_left(),
            PointerEvent::LeftButton { pressed } if !pressed || !captured => self.left_button(pressed),
            _ => {}
        }
    }
}

/// The pointer events the scene reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Cursor at `(x, y)` physical pixels.
    Moved { x: f64, y: f64 },
    Left,
    LeftButton { pressed: bool },
}

impl PointerEvent {
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(Self::Moved {
                x: position.x,
                y: position.y,
            }),
            WindowEvent::CursorLeft { .. } => Some(Self::Left),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => Some(Self::LeftButton {
                pressed: *state == ElementState::Pressed,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_pointer_until_moved() {
        let input = PointerInput::new();
        assert_eq!(input.ndc(), None);
    }

    #[test]
    fn test_center_is_origin() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        let mut input = PointerInput::new();
        input.cursor_moved(400.0, 300.0, &viewport);
        assert_eq!(input.ndc(), Some(Vec2::ZERO));
    }

    #[test]
    fn test_y_points_up() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        let mut input = PointerInput::new();
        input.cursor_moved(400.0, 0.0, &viewport);
        assert_eq!(input.ndc(), Some(Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn test_leaving_clears_pointer() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        let mut input = PointerInput::new();
        input.cursor_moved(10.0, 10.0, &viewport);
        input.left_button(true);
        input.cursor_left();
        assert_eq!(input.ndc(), None);
        assert!(!input.is_dragging());
    }

    #[test]
    fn test_drag_accumulates_only_while_held() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        let mut input = PointerInput::new();
        input.cursor_moved(100.0, 100.0, &viewport);
        input.cursor_moved(110.0, 100.0, &viewport);
        assert_eq!(input.take_drag(), Vec2::ZERO);

        input.left_button(true);
        input.cursor_moved(120.0, 105.0, &viewport);
        input.cursor_moved(130.0, 110.0, &viewport);
        assert_eq!(input.take_drag(), Vec2::new(20.0, 10.0));
        assert_eq!(input.take_drag(), Vec2::ZERO);
    }

    #[test]
    fn test_refresh_after_resize() {
        let mut viewport = Viewport::new(800.0, 600.0, 1.0);
        let mut input = PointerInput::new();
        input.cursor_moved(400.0, 300.0, &viewport);
        viewport.resize(1600.0, 900.0);
        input.refresh(&viewport);
        let ndc = input.ndc().unwrap();
        assert!((ndc - Vec2::new(-0.5, 1.0 / 3.0)).length() < 1e-6);
    }

    #[test]
    fn test_release_over_panel_ends_drag() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        let mut input = PointerInput::new();
        input.apply(PointerEvent::Moved { x: 100.0, y: 100.0 }, &viewport, false);
        input.apply(PointerEvent::LeftButton { pressed: true }, &viewport, false);
        assert!(input.is_dragging());

        input.apply(PointerEvent::LeftButton { pressed: false }, &viewport, true);
        assert!(!input.is_dragging());

        input.apply(PointerEvent::Moved { x: 150.0, y: 120.0 }, &viewport, false);
        assert_eq!(input.take_drag(), Vec2::ZERO);
    }

    #[test]
    fn test_panel_keeps_presses_and_moves() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        let mut input = PointerInput::new();
        input.apply(PointerEvent::LeftButton { pressed: true }, &viewport, true);
        assert!(!input.is_dragging());

        input.apply(PointerEvent::Moved { x: 400.0, y: 300.0 }, &viewport, true);
        assert_eq!(input.ndc(), None);

        input.apply(PointerEvent::Moved { x: 400.0, y: 300.0 }, &viewport, false);
        input.apply(PointerEvent::Left, &viewport, true);
        assert_eq!(input.ndc(), None);
    }
}
