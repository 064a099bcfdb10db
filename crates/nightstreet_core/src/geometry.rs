//! Geometry primitives
//!
//! CPU-side indexed triangle meshes for the three primitive shapes the scene is
//! built from. All primitives are centered on their local origin:
//!
//! - [`Primitive::Box`] spans `width × height × depth` along X, Y, Z
//! - [`Primitive::Plane`] spans `width × height` in the XY plane, facing +Z
//! - [`Primitive::Cylinder`] is a (possibly tapered) prism along Y
//!
//! Texture coordinates follow the convention where `v` grows upward; the
//! shader flips them when sampling.

use std::f32::consts::TAU;
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::resource::ResourceId;

/// Shared handle to an immutable geometry
pub type GeometryRef = Rc<Geometry>;

/// A mesh vertex with everything the standard material needs
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// Tangent (xyz) and bitangent sign (w)
    pub tangent: [f32; 4],
}

/// Shape parameters for a primitive
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Box { width: f32, height: f32, depth: f32 },
    Plane { width: f32, height: f32 },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box enclosing a set of points
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Box enclosing this box after an affine transform
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = (0..8).map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            matrix.transform_point3(corner)
        });
        Self::from_points(corners)
    }
}

/// An indexed triangle mesh generated from a [`Primitive`]
#[derive(Debug)]
pub struct Geometry {
    id: ResourceId,
    primitive: Primitive,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    bounds: Aabb,
}

impl Geometry {
    /// Generate the mesh for a primitive
    pub fn new(primitive: Primitive) -> Self {
        let mut builder = MeshBuilder::default();
        match primitive {
            Primitive::Box { width, height, depth } => {
                let half = Vec3::new(width, height, depth) * 0.5;
                for (normal, u, v) in BOX_FACES {
                    builder.quad(normal * half.dot(normal.abs()), u * half.dot(u.abs()), v * half.dot(v.abs()), normal, u);
                }
            }
            Primitive::Plane { width, height } => {
                builder.quad(Vec3::ZERO, Vec3::X * width * 0.5, Vec3::Y * height * 0.5, Vec3::Z, Vec3::X);
            }
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => builder.cylinder(radius_top, radius_bottom, height, radial_segments.max(3)),
        }

        let bounds = Aabb::from_points(builder.vertices.iter().map(|v| Vec3::from(v.position)));
        Self {
            id: ResourceId::next(),
            primitive,
            vertices: builder.vertices,
            indices: builder.indices,
            bounds,
        }
    }

    /// Convenience constructor for a box
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::new(Primitive::Box { width, height, depth })
    }

    /// Convenience constructor for a plane
    pub fn plane(width: f32, height: f32) -> Self {
        Self::new(Primitive::Plane { width, height })
    }

    /// Convenience constructor for a cylinder
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        Self::new(Primitive::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
        })
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Local bounding box
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

// (outward normal, u direction, v direction) with u × v = normal
const BOX_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

#[derive(Default)]
struct MeshBuilder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn push(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2], tangent: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(Vertex {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
            tangent: tangent.extend(1.0).to_array(),
        });
        index
    }

    /// Four-vertex face spanning `center ± u ± v`
    fn quad(&mut self, center: Vec3, u: Vec3, v: Vec3, normal: Vec3, tangent: Vec3) {
        let a = self.push(center - u - v, normal, [0.0, 0.0], tangent);
        let b = self.push(center + u - v, normal, [1.0, 0.0], tangent);
        let c = self.push(center - u + v, normal, [0.0, 1.0], tangent);
        let d = self.push(center + u + v, normal, [1.0, 1.0], tangent);
        self.indices.extend_from_slice(&[a, b, c, c, b, d]);
    }

    fn cylinder(&mut self, radius_top: f32, radius_bottom: f32, height: f32, segments: u32) {
        let half = height * 0.5;
        let slope = if height > 0.0 { (radius_bottom - radius_top) / height } else { 0.0 };

        // Torso: row 0 at the top, row 1 at the bottom
        let mut rows = [Vec::new(), Vec::new()];
        for (row, (radius, y, v)) in [(radius_top, half, 1.0), (radius_bottom, -half, 0.0)]
            .into_iter()
            .enumerate()
        {
            for x in 0..=segments {
                let u = x as f32 / segments as f32;
                let (sin, cos) = (u * TAU).sin_cos();
                let normal = Vec3::new(sin, slope, cos).normalize();
                let tangent = Vec3::new(cos, 0.0, -sin);
                let index = self.push(Vec3::new(radius * sin, y, radius * cos), normal, [u, v], tangent);
                rows[row].push(index);
            }
        }
        for x in 0..segments as usize {
            let (a, b) = (rows[0][x], rows[1][x]);
            let (c, d) = (rows[1][x + 1], rows[0][x + 1]);
            self.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        if radius_top > 0.0 {
            self.cap(radius_top, half, segments, true);
        }
        if radius_bottom > 0.0 {
            self.cap(radius_bottom, -half, segments, false);
        }
    }

    fn cap(&mut self, radius: f32, y: f32, segments: u32, top: bool) {
        let (normal, sign) = if top { (Vec3::Y, 1.0) } else { (Vec3::NEG_Y, -1.0) };
        let center = self.push(Vec3::new(0.0, y, 0.0), normal, [0.5, 0.5], Vec3::X);
        let first = self.vertices.len() as u32;
        for x in 0..=segments {
            let (sin, cos) = (x as f32 / segments as f32 * TAU).sin_cos();
            let uv = [cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5];
            self.push(Vec3::new(radius * sin, y, radius * cos), normal, uv, Vec3::X);
        }
        for x in 0..segments {
            let (i, j) = (first + x, first + x + 1);
            if top {
                self.indices.extend_from_slice(&[center, i, j]);
            } else {
                self.indices.extend_from_slice(&[center, j, i]);
            }
        }
    }
}
