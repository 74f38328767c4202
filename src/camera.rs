//! Orbit camera for viewing the cup.

use glam::{Mat4, Vec3};

/// Fraction of the pending rotation applied per update.
pub const DEFAULT_DAMPING: f32 = 0.05;
/// Radians of rotation per pixel dragged.
pub const ROTATE_SPEED: f32 = 0.005;
/// Pending rotation below this is dropped.
const SETTLE_EPSILON: f32 = 1e-6;

/// Orbit camera with damped rotation around a target.
///
/// Zoom is intentionally absent. Pitch is the elevation above the
/// horizontal plane through the target; keeping it at or above zero keeps
/// the camera from dipping under the table.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Elevation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub damping: f32,
    pending_yaw: f32,
    pending_pitch: f32,
}

impl OrbitCamera {
    /// Place the camera at `position` looking at `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            target,
            fov_y_degrees: 25.0,
            near: 0.1,
            far: 100.0,
            min_pitch: 0.0,
            max_pitch: 1.5,
            damping: DEFAULT_DAMPING,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
        }
    }

    /// The coffee scene's starting view.
    pub fn coffee_view() -> Self {
        Self::looking_at(Vec3::new(8.0, 10.0, 12.0), Vec3::new(0.0, 2.0, 0.0))
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Queue a rotation from a pointer drag in pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.pending_yaw -= dx * ROTATE_SPEED;
        self.pending_pitch += dy * ROTATE_SPEED;
    }

    /// Apply one step of damped rotation. Call once per frame.
    pub fn update(&mut self) {
        let yaw_step = self.pending_yaw * self.damping;
        let pitch_step = self.pending_pitch * self.damping;
        self.yaw += yaw_step;
        self.pitch = (self.pitch + pitch_step).clamp(self.min_pitch, self.max_pitch);
        self.pending_yaw -= yaw_step;
        self.pending_pitch -= pitch_step;

        if self.pending_yaw.abs() < SETTLE_EPSILON {
            self.pending_yaw = 0.0;
        }
        if self.pending_pitch.abs() < SETTLE_EPSILON {
            self.pending_pitch = 0.0;
        }
    }

    /// Whether a drag is still being eased in.
    pub fn is_moving(&self) -> bool {
        self.pending_yaw != 0.0 || self.pending_pitch != 0.0
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::coffee_view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looking_at_roundtrips_position() {
        let camera = OrbitCamera::coffee_view();
        let pos = camera.position();
        assert!((pos - Vec3::new(8.0, 10.0, 12.0)).length() < 1e-4);
    }

    #[test]
    fn test_damping_converges_to_full_drag() {
        let mut camera = OrbitCamera::coffee_view();
        let start = camera.yaw;
        camera.drag(-100.0, 0.0);
        for _ in 0..1000 {
            camera.update();
        }
        assert!(!camera.is_moving());
        assert!((camera.yaw - start - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_first_update_moves_only_a_fraction() {
        let mut camera = OrbitCamera::coffee_view();
        let start = camera.yaw;
        camera.drag(-100.0, 0.0);
        camera.update();
        assert!((camera.yaw - start - 0.5 * DEFAULT_DAMPING).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_never_below_horizon() {
        let mut camera = OrbitCamera::coffee_view();
        camera.drag(0.0, -100_000.0);
        for _ in 0..500 {
            camera.update();
            assert!(camera.pitch >= 0.0);
            assert!(camera.position().y >= camera.target.y - 1e-4);
        }
    }

    #[test]
    fn test_projection_uses_aspect() {
        let camera = OrbitCamera::coffee_view();
        let wide = camera.projection_matrix(16.0 / 9.0);
        let square = camera.projection_matrix(1.0);
        // x scale is focal / aspect
        assert!((square.x_axis.x / wide.x_axis.x - 16.0 / 9.0).abs() < 1e-4);
    }
}
