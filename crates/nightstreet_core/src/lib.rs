//! Core types for the night street scene
//!
//! This crate provides the foundational types for building a 3D scene:
//!
//! - [`Transform`] - Position, rotation, and scale relative to a parent
//! - [`Geometry`] - Indexed meshes generated from box, plane, and cylinder primitives
//! - [`Texture`] / [`TextureLoader`] - Lazily decoded images with sampling settings
//! - [`Material`] - Shared standard material with interior-mutable parameters
//! - [`PointLight`], [`AmbientLight`], [`FogExp2`] - Lighting model
//! - [`SceneGraph`] - Slotmap-backed node tree with a name registry
//! - [`NodeKey`] - Generational key to a node in the graph

mod color;
mod geometry;
mod lighting;
mod material;
mod node;
mod resource;
mod scene_graph;
mod texture;
mod texture_error;
mod transform;

pub use color::Color;
pub use geometry::{Aabb, Geometry, GeometryRef, Primitive, Vertex};
pub use lighting::{point_light_attenuation, AmbientLight, Environment, FogExp2, PointLight};
pub use material::{Material, MaterialMaps, MaterialParams, MaterialRef};
pub use node::{DirtyFlags, Mesh, Node, NodeKey, NodeKind};
pub use resource::ResourceId;
pub use scene_graph::{DisposeReport, GraphError, SceneGraph};
pub use texture::{
    AssetTextureLoader, ColorSpace, Texture, TextureImage, TextureLoader, TextureRef,
    TextureSettings, TextureSource, Wrap,
};
pub use texture_error::TextureError;
pub use transform::Transform;

// Re-export the math library used throughout the public API
pub use glam;
