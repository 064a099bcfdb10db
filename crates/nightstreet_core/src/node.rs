//! Scene nodes
//!
//! A Node is one element of the scene tree: a group, a mesh, or a light.

use bitflags::bitflags;
use slotmap::new_key_type;

use crate::geometry::GeometryRef;
use crate::lighting::{AmbientLight, PointLight};
use crate::material::MaterialRef;
use crate::transform::Transform;

new_key_type! {
    /// Generational handle to a node in a [`SceneGraph`](crate::SceneGraph)
    pub struct NodeKey;
}

bitflags! {
    /// Flags indicating what changed in the graph since the last frame
    ///
    /// Renderers use these to skip rebuilding draw data when nothing moved.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// A node transform, light, or visibility changed
        const TRANSFORM = 1 << 0;
        /// Nodes were added, removed, or re-parented
        const STRUCTURE = 1 << 1;
        /// Material parameters changed
        const MATERIAL = 1 << 2;
        /// Everything needs rebuilding
        const ALL = Self::TRANSFORM.bits() | Self::STRUCTURE.bits() | Self::MATERIAL.bits();
    }
}

/// A renderable surface: shared geometry drawn with a shared material
#[derive(Clone, Debug)]
pub struct Mesh {
    pub geometry: GeometryRef,
    pub material: MaterialRef,
}

/// What a node is
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Pure transform node
    Group,
    Mesh(Mesh),
    PointLight(PointLight),
    AmbientLight(AmbientLight),
}

/// A node in the scene tree
///
/// Each node has:
/// - An optional name (registered in the graph for lookup)
/// - A transform relative to its parent
/// - A kind (group, mesh, light)
/// - A visibility flag that hides the whole subtree
#[derive(Debug)]
pub struct Node {
    name: Option<String>,
    /// Placement relative to the parent
    pub transform: Transform,
    pub kind: NodeKind,
    pub visible: bool,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            transform: Transform::identity(),
            kind,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Empty group
    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    /// Mesh node
    pub fn mesh(geometry: GeometryRef, material: MaterialRef) -> Self {
        Self::new(NodeKind::Mesh(Mesh { geometry, material }))
    }

    pub fn point_light(light: PointLight) -> Self {
        Self::new(NodeKind::PointLight(light))
    }

    pub fn ambient_light(light: AmbientLight) -> Self {
        Self::new(NodeKind::AmbientLight(light))
    }

    /// Set the name of this node (for lookup)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_point_light(&self) -> Option<&PointLight> {
        match &self.kind {
            NodeKind::PointLight(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_point_light_mut(&mut self) -> Option<&mut PointLight> {
        match &mut self.kind {
            NodeKind::PointLight(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_ambient_light_mut(&mut self) -> Option<&mut AmbientLight> {
        match &mut self.kind {
            NodeKind::AmbientLight(light) => Some(light),
            _ => None,
        }
    }

    /// Copy of this node without tree links
    pub(crate) fn detached_copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            transform: self.transform,
            kind: self.kind.clone(),
            visible: self.visible,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::material::{Material, MaterialParams};
    use std::rc::Rc;

    #[test]
    fn test_dirty_flags() {
        let mut flags = DirtyFlags::NONE;
        assert!(flags.is_empty());
        flags |= DirtyFlags::TRANSFORM;
        assert!(flags.contains(DirtyFlags::TRANSFORM));
        assert!(!flags.contains(DirtyFlags::STRUCTURE));
        assert!(DirtyFlags::ALL.contains(DirtyFlags::MATERIAL));
    }

    #[test]
    fn test_typed_accessors() {
        let mesh = Node::mesh(
            Rc::new(Geometry::cuboid(1.0, 1.0, 1.0)),
            Rc::new(Material::new(MaterialParams::default())),
        );
        assert!(mesh.as_mesh().is_some());
        assert!(mesh.as_point_light().is_none());

        let mut light = Node::point_light(PointLight::default()).with_name("lamp");
        assert_eq!(light.name(), Some("lamp"));
        light.as_point_light_mut().unwrap().intensity = 3.1;
        assert_eq!(light.as_point_light().unwrap().intensity, 3.1);
    }

    #[test]
    fn test_detached_copy_shares_resources() {
        let geometry = Rc::new(Geometry::cuboid(1.0, 1.0, 1.0));
        let material = Rc::new(Material::new(MaterialParams::default()));
        let node = Node::mesh(geometry.clone(), material.clone()).with_name("leg");
        let copy = node.detached_copy();
        let mesh = copy.as_mesh().unwrap();
        assert!(Rc::ptr_eq(&mesh.geometry, &geometry));
        assert!(Rc::ptr_eq(&mesh.material, &material));
        assert_eq!(copy.name(), Some("leg"));
        assert!(copy.parent().is_none());
    }
}
