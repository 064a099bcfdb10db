//! Perspective camera looking at a target point
//!
//! The camera remembers the pose it was created with so it can be reset.
//! [`nightstreet_input::OrbitController`] drives it through [`OrbitControl`].

use glam::{Mat4, Vec3};
use nightstreet_input::OrbitControl;

/// Perspective camera with a look-at target
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
    home: (Vec3, Vec3),
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees,
            near,
            far,
            aspect,
            home: (Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO),
        }
    }

    /// Builder: place the camera and record the pose as its home
    pub fn looking_at(mut self, eye: Vec3, target: Vec3) -> Self {
        self.eye = eye;
        self.target = target;
        self.home = (eye, target);
        self
    }

    /// Update the aspect ratio from a viewport size
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Return to the initial pose
    pub fn reset(&mut self) {
        (self.eye, self.target) = self.home;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection into wgpu clip space (depth in [0, 1])
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn distance_to_target(&self) -> f32 {
        self.eye.distance(self.target)
    }
}

impl OrbitControl for PerspectiveCamera {
    fn eye(&self) -> Vec3 {
        self.eye
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn fov_y(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    fn look_from(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        self.target = target;
    }
}
