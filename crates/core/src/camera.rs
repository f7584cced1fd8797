//! Fly-through camera driven by Euler angles.
//!
//! Yaw and pitch are kept in degrees. A yaw of -90° looks down -Z.

use glam::{Mat4, UVec2, Vec3};
use serde::{Deserialize, Serialize};

/// Default yaw in degrees (looking down -Z).
pub const DEFAULT_YAW: f32 = -90.0;
/// Default pitch in degrees.
pub const DEFAULT_PITCH: f32 = 0.0;
/// Default movement speed in world units per second.
pub const DEFAULT_SPEED: f32 = 2.5;
/// Default mouse sensitivity in degrees per pixel.
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
/// Default vertical field of view in degrees.
pub const DEFAULT_ZOOM: f32 = 45.0;

/// Field of view limits in degrees.
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;

/// Movement speed limits in world units per second.
pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 50.0;

/// Pitch limit used when constraining mouse look.
const PITCH_LIMIT: f32 = 89.0;

/// Camera-relative movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Projection used to map view space to clip space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

/// Clip planes and orthographic extent shared by both projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// World units per viewport pixel in orthographic mode.
    pub ortho_scale: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 100.0,
            ortho_scale: 0.01,
        }
    }
}

/// Free-flying first-person camera.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    /// Eye position in world space.
    pub position: Vec3,
    /// World up direction.
    world_up: Vec3,
    /// Yaw in degrees.
    yaw: f32,
    /// Pitch in degrees.
    pitch: f32,
    /// Movement speed in units per second.
    movement_speed: f32,
    /// Degrees of rotation per pixel of mouse motion.
    mouse_sensitivity: f32,
    /// Vertical field of view in degrees.
    zoom: f32,

    // Derived basis
    front: Vec3,
    right: Vec3,
    up: Vec3,

    // Values restored by the reset operations
    home_position: Vec3,
    home_yaw: f32,
    home_pitch: f32,
    home_speed: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl FlyCamera {
    /// Create a camera at `position` with default orientation.
    pub fn new(position: Vec3) -> Self {
        Self::with_orientation(position, DEFAULT_YAW, DEFAULT_PITCH)
    }

    /// Create a camera with explicit yaw and pitch in degrees.
    pub fn with_orientation(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            world_up: Vec3::Y,
            yaw,
            pitch,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            home_position: position,
            home_yaw: yaw,
            home_pitch: pitch,
            home_speed: DEFAULT_SPEED,
        };
        camera.update_vectors();
        camera
    }

    /// Set movement speed and make it the value `reset_speed` restores.
    pub fn set_base_speed(&mut self, speed: f32) {
        let speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        self.movement_speed = speed;
        self.home_speed = speed;
    }

    pub fn set_mouse_sensitivity(&mut self, sensitivity: f32) {
        self.mouse_sensitivity = sensitivity;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Move the camera along its own axes for `delta_time` seconds.
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let offset = match direction {
            CameraMovement::Forward => self.front,
            CameraMovement::Backward => -self.front,
            CameraMovement::Left => -self.right,
            CameraMovement::Right => self.right,
            CameraMovement::Up => self.up,
            CameraMovement::Down => -self.up,
        };
        self.position += offset * velocity;
    }

    /// Turn the camera by a mouse offset in pixels (y positive = up).
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Narrow or widen the field of view by a scroll offset.
    pub fn adjust_zoom(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Speed up or slow down by a scroll offset.
    pub fn adjust_movement_speed(&mut self, y_offset: f32) {
        self.movement_speed = (self.movement_speed + y_offset).clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Return to the starting position and orientation.
    pub fn reset_position(&mut self) {
        self.position = self.home_position;
        self.yaw = self.home_yaw;
        self.pitch = self.home_pitch;
        self.update_vectors();
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = DEFAULT_ZOOM;
    }

    pub fn reset_speed(&mut self) {
        self.movement_speed = self.home_speed;
    }

    /// Get the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Get the projection matrix for a viewport in pixels.
    pub fn projection_matrix(&self, mode: ProjectionMode, viewport: UVec2, lens: &Lens) -> Mat4 {
        let width = viewport.x.max(1) as f32;
        let height = viewport.y.max(1) as f32;

        match mode {
            ProjectionMode::Perspective => {
                let aspect = if viewport.y == 0 { 1.0 } else { width / height };
                Mat4::perspective_rh(self.zoom.to_radians(), aspect, lens.near, lens.far)
            }
            ProjectionMode::Orthographic => {
                let half_w = width * lens.ortho_scale;
                let half_h = height * lens.ortho_scale;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, lens.near, lens.far)
            }
        }
    }

    /// Recompute front, right and up from yaw and pitch.
    fn update_vectors(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();

        self.front = Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_camera_defaults() {
        let camera = FlyCamera::new(Vec3::new(0.0, 3.0, 18.0));
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), 0.0);
        assert_eq!(camera.zoom(), 45.0);
        assert_eq!(camera.movement_speed(), 2.5);
        assert!(approx(camera.front(), Vec3::NEG_Z));
        assert!(approx(camera.right(), Vec3::X));
        assert!(approx(camera.up(), Vec3::Y));
    }

    #[test]
    fn test_keyboard_movement() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        camera.process_keyboard(CameraMovement::Forward, 2.0);
        assert!(approx(camera.position, Vec3::new(0.0, 0.0, -5.0)));

        camera.process_keyboard(CameraMovement::Right, 1.0);
        assert!(approx(camera.position, Vec3::new(2.5, 0.0, -5.0)));

        camera.process_keyboard(CameraMovement::Up, 0.4);
        assert!(approx(camera.position, Vec3::new(2.5, 1.0, -5.0)));

        camera.process_keyboard(CameraMovement::Down, 0.4);
        camera.process_keyboard(CameraMovement::Left, 1.0);
        camera.process_keyboard(CameraMovement::Backward, 2.0);
        assert!(approx(camera.position, Vec3::ZERO));
    }

    #[test]
    fn test_mouse_look() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        // 900 px * 0.1 = 90 degrees to the right: now facing +X.
        camera.process_mouse_movement(900.0, 0.0, true);
        assert!(approx(camera.front(), Vec3::X));
        assert!(approx(camera.right(), Vec3::Z));
    }

    #[test]
    fn test_pitch_constrained() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        camera.process_mouse_movement(0.0, 5000.0, true);
        assert_eq!(camera.pitch(), 89.0);
        assert!(camera.front().y > 0.99);
        // Basis stays orthonormal near the pole.
        assert!(camera.front().dot(camera.up()).abs() < 1e-5);

        camera.process_mouse_movement(0.0, -20000.0, true);
        assert_eq!(camera.pitch(), -89.0);
    }

    #[test]
    fn test_pitch_unconstrained() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        camera.process_mouse_movement(0.0, 1000.0, false);
        assert!((camera.pitch() - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_limits() {
        let mut camera = FlyCamera::default();
        camera.adjust_zoom(10.0);
        assert_eq!(camera.zoom(), 35.0);
        camera.adjust_zoom(100.0);
        assert_eq!(camera.zoom(), MIN_ZOOM);
        camera.adjust_zoom(-100.0);
        assert_eq!(camera.zoom(), MAX_ZOOM);
        camera.adjust_zoom(20.0);
        camera.reset_zoom();
        assert_eq!(camera.zoom(), DEFAULT_ZOOM);
    }

    #[test]
    fn test_speed_limits_and_reset() {
        let mut camera = FlyCamera::default();
        camera.adjust_movement_speed(1.0);
        assert_eq!(camera.movement_speed(), 3.5);
        camera.adjust_movement_speed(-10.0);
        assert_eq!(camera.movement_speed(), MIN_SPEED);
        camera.adjust_movement_speed(1000.0);
        assert_eq!(camera.movement_speed(), MAX_SPEED);
        camera.reset_speed();
        assert_eq!(camera.movement_speed(), DEFAULT_SPEED);

        camera.set_base_speed(4.0);
        camera.adjust_movement_speed(2.0);
        camera.reset_speed();
        assert_eq!(camera.movement_speed(), 4.0);
    }

    #[test]
    fn test_reset_position() {
        let start = Vec3::new(0.0, 3.0, 18.0);
        let mut camera = FlyCamera::new(start);
        camera.process_keyboard(CameraMovement::Forward, 3.0);
        camera.process_mouse_movement(120.0, -45.0, true);
        camera.reset_position();
        assert_eq!(camera.position, start);
        assert_eq!(camera.yaw(), DEFAULT_YAW);
        assert!(approx(camera.front(), Vec3::NEG_Z));
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = FlyCamera::new(Vec3::new(1.0, 2.0, 3.0));
        let view = camera.view_matrix();
        assert!(approx(view.transform_point3(camera.position), Vec3::ZERO));
        // A point in front of the camera lands on -Z in view space.
        let ahead = view.transform_point3(camera.position + camera.front() * 4.0);
        assert!(approx(ahead, Vec3::new(0.0, 0.0, -4.0)));
    }

    #[test]
    fn test_perspective_projection() {
        let camera = FlyCamera::default();
        let lens = Lens::default();
        let viewport = UVec2::new(800, 600);
        let proj = camera.projection_matrix(ProjectionMode::Perspective, viewport, &lens);
        let expected = Mat4::perspective_rh(45f32.to_radians(), 800.0 / 600.0, 0.1, 100.0);
        assert!(proj.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_orthographic_projection() {
        let camera = FlyCamera::default();
        let lens = Lens::default();
        let viewport = UVec2::new(800, 600);
        let proj = camera.projection_matrix(ProjectionMode::Orthographic, viewport, &lens);
        // Right edge of the view volume is at x = 8 world units.
        let edge = proj.project_point3(Vec3::new(8.0, 6.0, -1.0));
        assert!((edge.x - 1.0).abs() < 1e-5);
        assert!((edge.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_viewport() {
        let camera = FlyCamera::default();
        let lens = Lens::default();
        let proj = camera.projection_matrix(ProjectionMode::Perspective, UVec2::new(800, 0), &lens);
        assert!(proj.is_finite());
    }
}
