//! 3D Transform (position, rotation, scale)
//!
//! A Transform represents the local placement of a scene node relative to its parent.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A 3D transform with position, rotation, and per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position relative to the parent
    pub position: Vec3,
    /// Rotation as a unit quaternion
    pub rotation: Quat,
    /// Per-axis scale factor
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create an identity transform (no translation, rotation, or scale change)
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform from position components
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_position(Vec3::new(x, y, z))
    }

    /// Builder: set rotation from Euler angles applied in intrinsic X, Y, Z order
    pub fn with_rotation_euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        self
    }

    /// Builder: set per-axis scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local-to-parent matrix
    ///
    /// Applies scale, then rotation, then translation.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Transform a point from local space to parent space
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation * (p * self.scale) + self.position
    }

    /// Compose two transforms: result = self * other
    ///
    /// The composed transform applies `other` first, then `self`. Exact for
    /// uniform scales; non-uniform scale combined with rotation should go
    /// through [`Transform::matrix`] instead.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            position: self.transform_point(other.position),
            rotation: (self.rotation * other.rotation).normalize(),
            scale: self.scale * other.scale,
        }
    }

    /// Translate the transform by an offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < EPSILON
    }

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(t.transform_point(p), p));
    }

    #[test]
    fn test_translation() {
        let t = Transform::from_xyz(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(t.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_non_uniform_scale() {
        let t = Transform::identity().with_scale(Vec3::new(1.1, 1.0, 1.0));
        let p = t.transform_point(Vec3::new(0.5, 0.5, 0.5));
        assert!(vec_approx_eq(p, Vec3::new(0.55, 0.5, 0.5)));
    }

    #[test]
    fn test_plane_laid_flat() {
        // A plane facing +Z rotated -90 degrees about X faces +Y
        let t = Transform::identity().with_rotation_euler(-PI / 2.0, 0.0, 0.0);
        let normal = t.rotation * Vec3::Z;
        assert!(vec_approx_eq(normal, Vec3::Y), "got {:?}", normal);
    }

    #[test]
    fn test_transform_order() {
        let t = Transform {
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: Quat::from_rotation_z(PI / 2.0),
            scale: Vec3::splat(2.0),
        };
        // X * 2 = (2, 0, 0), rotated 90 about Z = (0, 2, 0), + (10, 0, 0)
        let p = t.transform_point(Vec3::X);
        assert!(vec_approx_eq(p, Vec3::new(10.0, 2.0, 0.0)), "got {:?}", p);
    }

    #[test]
    fn test_matrix_matches_transform_point() {
        let t = Transform::from_xyz(1.0, -2.0, 0.5)
            .with_rotation_euler(0.3, 0.7, -0.2)
            .with_scale(Vec3::new(1.02, 1.0, 1.02));
        let p = Vec3::new(0.3, 0.4, -0.9);
        assert!(vec_approx_eq(t.matrix().transform_point3(p), t.transform_point(p)));
    }

    #[test]
    fn test_compose() {
        let parent = Transform::from_xyz(0.0, 0.06, 0.0);
        let child = Transform::from_xyz(-0.5, 0.0, -0.25);
        let composed = parent.compose(&child);
        assert!(vec_approx_eq(composed.position, Vec3::new(-0.5, 0.06, -0.25)));
        let p = Vec3::new(0.1, 0.2, 0.3);
        assert!(vec_approx_eq(
            composed.transform_point(p),
            parent.transform_point(child.transform_point(p))
        ));
    }

    #[test]
    fn test_translate() {
        let mut t = Transform::from_xyz(0.0, 0.0, -0.25);
        t.translate(Vec3::new(0.0, 0.0, 7.0));
        assert!(vec_approx_eq(t.position, Vec3::new(0.0, 0.0, 6.75)));
    }
}
