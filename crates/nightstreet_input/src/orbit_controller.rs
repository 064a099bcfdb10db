//! Orbit camera controller
//!
//! Controls:
//! - Left drag: orbit around the target
//! - Right drag: pan the target in screen space
//! - Mouse wheel: dolly toward / away from the target
//!
//! With damping enabled, input is applied gradually: each update consumes a
//! `damping_factor` fraction of the pending motion and keeps the rest for the
//! next frame, which gives the camera inertia.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use winit::event::{ElementState, MouseButton};

/// Smallest distance kept between the polar angle and the poles
const POLE_EPSILON: f32 = 1e-6;

/// Orbit controller for handling input
pub struct OrbitController {
    // Button state
    rotating: bool,
    panning: bool,

    // Pending motion not yet applied to the camera
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
    pending_pan: (f32, f32),

    viewport_height: f32,

    // Configuration
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_enabled: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            rotating: false,
            panning: false,

            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            pending_pan: (0.0, 0.0),

            viewport_height: 720.0,

            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            damping_enabled: false,
            damping_factor: 0.05,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }

    /// Set the viewport height in pixels (drag distances are relative to it)
    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;

        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right | MouseButton::Middle => self.panning = pressed,
            _ => {}
        }
    }

    /// Process mouse movement in pixels
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        let (dx, dy) = (delta_x as f32, delta_y as f32);
        if self.rotating {
            // A full-height drag turns the camera once around
            self.rotate_left(TAU * dx / self.viewport_height * self.rotate_speed);
            self.rotate_up(TAU * dy / self.viewport_height * self.rotate_speed);
        } else if self.panning {
            self.pending_pan.0 += dx * self.pan_speed;
            self.pending_pan.1 += dy * self.pan_speed;
        }
    }

    /// Process scroll input in lines (positive = away from the user = zoom in)
    pub fn process_scroll(&mut self, lines: f32) {
        if lines == 0.0 {
            return;
        }
        let step = 0.95f32.powf(self.zoom_speed * lines.abs());
        if lines > 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// Queue an orbit around the vertical axis
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    /// Queue an orbit toward the top pole
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Apply pending motion to the camera
    ///
    /// Returns true if the camera moved.
    pub fn update<C: OrbitControl>(&mut self, camera: &mut C) -> bool {
        if !self.has_pending_motion() {
            return false;
        }

        let eye = camera.eye();
        let mut target = camera.target();
        let offset = eye - target;

        // Pan in the camera's screen plane, scaled so the target tracks the cursor
        if self.pending_pan != (0.0, 0.0) {
            let forward = (-offset).normalize_or_zero();
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward);
            let world_per_pixel =
                2.0 * offset.length() * (camera.fov_y() * 0.5).tan() / self.viewport_height;
            self.pan_offset += (-right * self.pending_pan.0 + up * self.pending_pan.1) * world_per_pixel;
            self.pending_pan = (0.0, 0.0);
        }

        let mut radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        let step = if self.damping_enabled { self.damping_factor } else { 1.0 };
        theta += self.delta_theta * step;
        phi += self.delta_phi * step;
        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        target += self.pan_offset * step;

        let new_offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let new_eye = target + new_offset;

        if self.damping_enabled {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.look_from(new_eye, target);
        true
    }

    fn has_pending_motion(&self) -> bool {
        const REST: f32 = 1e-6;
        self.delta_theta.abs() > REST
            || self.delta_phi.abs() > REST
            || (self.scale - 1.0).abs() > REST
            || self.pan_offset.length() > REST
            || self.pending_pan != (0.0, 0.0)
    }

    /// Drop all pending motion
    pub fn stop(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;
        self.pending_pan = (0.0, 0.0);
    }

    /// Check if any drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.rotating || self.panning
    }

    /// Builder: set rotation speed
    pub fn with_rotate_speed(mut self, speed: f32) -> Self {
        self.rotate_speed = speed;
        self
    }

    /// Builder: set zoom speed
    pub fn with_zoom_speed(mut self, speed: f32) -> Self {
        self.zoom_speed = speed;
        self
    }

    /// Builder: set pan speed
    pub fn with_pan_speed(mut self, speed: f32) -> Self {
        self.pan_speed = speed;
        self
    }

    /// Builder: enable damping with the given factor
    pub fn with_damping(mut self, enabled: bool, factor: f32) -> Self {
        self.damping_enabled = enabled;
        self.damping_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Builder: clamp the distance to the target
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }
}

/// Trait for camera control
/// Allows the controller to work with different camera implementations
pub trait OrbitControl {
    fn eye(&self) -> Vec3;
    fn target(&self) -> Vec3;
    /// Vertical field of view in radians
    fn fov_y(&self) -> f32;
    fn look_from(&mut self, eye: Vec3, target: Vec3);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCamera {
        eye: Vec3,
        target: Vec3,
    }

    impl OrbitControl for TestCamera {
        fn eye(&self) -> Vec3 {
            self.eye
        }
        fn target(&self) -> Vec3 {
            self.target
        }
        fn fov_y(&self) -> f32 {
            45f32.to_radians()
        }
        fn look_from(&mut self, eye: Vec3, target: Vec3) {
            self.eye = eye;
            self.target = target;
        }
    }

    fn camera() -> TestCamera {
        TestCamera {
            eye: Vec3::new(8.0, 3.0, 4.5),
            target: Vec3::new(1.0, 0.0, 0.0),
        }
    }

    #[test]
    fn test_idle_update_does_not_move() {
        let mut cam = camera();
        let mut controller = OrbitController::new().with_damping(true, 0.05);
        assert!(!controller.update(&mut cam));
        assert_eq!(cam.eye, Vec3::new(8.0, 3.0, 4.5));
    }

    #[test]
    fn test_rotation_preserves_distance() {
        let mut cam = camera();
        let radius = cam.eye.distance(cam.target);
        let mut controller = OrbitController::new();
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.process_mouse_motion(120.0, -40.0);
        assert!(controller.update(&mut cam));
        assert!((cam.eye.distance(cam.target) - radius).abs() < 1e-4);
        assert_eq!(cam.target, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_motion_without_button_is_ignored() {
        let mut cam = camera();
        let mut controller = OrbitController::new();
        controller.process_mouse_motion(120.0, -40.0);
        assert!(!controller.update(&mut cam));
    }

    #[test]
    fn test_damping_spreads_motion_over_frames() {
        let mut damped_cam = camera();
        let mut instant_cam = camera();
        let mut damped = OrbitController::new().with_damping(true, 0.05);
        let mut instant = OrbitController::new();
        for c in [&mut damped, &mut instant] {
            c.rotate_left(0.5);
        }

        damped.update(&mut damped_cam);
        instant.update(&mut instant_cam);
        let first_step = damped_cam.eye.distance(camera().eye);
        assert!(first_step < instant_cam.eye.distance(camera().eye));

        // Remaining motion keeps the camera drifting toward the undamped result
        for _ in 0..400 {
            damped.update(&mut damped_cam);
        }
        assert!(damped_cam.eye.distance(instant_cam.eye) < 1e-3);
    }

    #[test]
    fn test_polar_angle_clamped() {
        let mut cam = camera();
        let mut controller = OrbitController::new();
        controller.rotate_up(10.0);
        controller.update(&mut cam);
        let offset = cam.eye - cam.target;
        assert!(offset.y > 0.0, "camera flipped over the pole: {:?}", offset);
        assert!(offset.x.is_finite() && offset.z.is_finite());
    }

    #[test]
    fn test_scroll_zooms_in_and_out() {
        let mut cam = camera();
        let start = cam.eye.distance(cam.target);
        let mut controller = OrbitController::new();

        controller.process_scroll(1.0);
        controller.update(&mut cam);
        let closer = cam.eye.distance(cam.target);
        assert!((closer - start * 0.95).abs() < 1e-4);

        controller.process_scroll(-1.0);
        controller.update(&mut cam);
        assert!((cam.eye.distance(cam.target) - start).abs() < 1e-4);
    }

    #[test]
    fn test_distance_limits() {
        let mut cam = camera();
        let mut controller = OrbitController::new().with_distance_limits(2.0, 5.0);
        controller.process_scroll(100.0);
        controller.update(&mut cam);
        assert!((cam.eye.distance(cam.target) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_pan_moves_eye_and_target_together() {
        let mut cam = camera();
        let before = cam.eye - cam.target;
        let mut controller = OrbitController::new();
        controller.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        controller.process_mouse_motion(50.0, 0.0);
        assert!(controller.update(&mut cam));
        assert_ne!(cam.target, Vec3::new(1.0, 0.0, 0.0));
        assert!(((cam.eye - cam.target) - before).length() < 1e-4);
    }

    #[test]
    fn test_stop_clears_pending_motion() {
        let mut cam = camera();
        let mut controller = OrbitController::new().with_damping(true, 0.05);
        controller.rotate_left(1.0);
        controller.stop();
        assert!(!controller.update(&mut cam));
    }

    #[test]
    fn test_button_tracking() {
        let mut controller = OrbitController::new();
        assert!(!controller.is_dragging());
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(controller.is_dragging());
        controller.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(!controller.is_dragging());
    }
}
