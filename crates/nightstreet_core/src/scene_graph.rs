//! Scene graph
//!
//! The SceneGraph owns every node in a slotmap and links them into a strict
//! tree: each node has at most one parent. Nodes can live detached (no
//! parent, not the root) while a builder assembles a subtree; only nodes
//! reachable from [`SceneGraph::root`] are rendered.
//!
//! Names are indexed in a registry at insertion time, so lookups like "every
//! street light bulb" are a hash lookup plus a typed match on [`NodeKind`].

use std::collections::HashMap;

use glam::Mat4;
use slotmap::SlotMap;

use crate::geometry::Aabb;
use crate::lighting::Environment;
use crate::node::{DirtyFlags, Node, NodeKey, NodeKind};

/// Error for invalid tree edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// The key does not refer to a live node
    StaleKey(NodeKey),
    /// Attaching would make a node its own ancestor
    Cycle { parent: NodeKey, child: NodeKey },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::StaleKey(key) => write!(f, "Node {:?} does not exist", key),
            GraphError::Cycle { parent, child } => {
                write!(f, "Cannot attach {:?} under its own descendant {:?}", child, parent)
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// What a disposal released
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisposeReport {
    /// Nodes removed from the graph
    pub nodes: usize,
    /// Mesh nodes among them (each dropped one geometry and one material reference)
    pub meshes: usize,
}

/// A tree of scene nodes
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, Node>,
    root: NodeKey,
    names: HashMap<String, Vec<NodeKey>>,
    dirty: DirtyFlags,
    /// Background color and fog
    pub environment: Environment,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding only an empty root group
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::group());
        Self {
            nodes,
            root,
            names: HashMap::new(),
            dirty: DirtyFlags::ALL,
            environment: Environment::default(),
        }
    }

    /// The root of the rendered tree
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Insert a detached node
    pub fn add(&mut self, node: Node) -> NodeKey {
        let name = node.name().map(str::to_owned);
        let key = self.nodes.insert(node);
        if let Some(name) = name {
            self.names.entry(name).or_default().push(key);
        }
        key
    }

    /// Insert a node as the last child of `parent`
    ///
    /// If `parent` is stale the node stays detached.
    pub fn add_child(&mut self, parent: NodeKey, node: Node) -> NodeKey {
        let key = self.add(node);
        if let Err(e) = self.attach(parent, key) {
            log::warn!("add_child: {}", e);
        }
        key
    }

    /// Make `child` the last child of `parent`, detaching it from any previous parent
    pub fn attach(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), GraphError> {
        if !self.nodes.contains_key(parent) {
            return Err(GraphError::StaleKey(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(GraphError::StaleKey(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(GraphError::Cycle { parent, child });
        }

        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        self.dirty |= DirtyFlags::STRUCTURE;
        Ok(())
    }

    /// Remove `key` from its parent's children; the subtree stays in the graph
    pub fn detach(&mut self, key: NodeKey) {
        let Some(parent) = self.nodes.get_mut(key).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|&c| c != key);
        }
        self.dirty |= DirtyFlags::STRUCTURE;
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Mutable access; marks the graph's transforms dirty
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        let node = self.nodes.get_mut(key)?;
        self.dirty |= DirtyFlags::TRANSFORM;
        Some(node)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(key).map(Node::children).unwrap_or(&[])
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(Node::parent)
    }

    /// Number of live nodes, including the root and detached nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all live nodes
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }

    /// True if `ancestor` is `key` or lies on its parent chain
    pub fn is_ancestor(&self, ancestor: NodeKey, key: NodeKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.parent(k);
        }
        false
    }

    /// `key` followed by all its descendants, depth first
    pub fn descendants(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            if let Some(node) = self.nodes.get(k) {
                out.push(k);
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Local-to-world matrix of a node
    pub fn world_matrix(&self, key: NodeKey) -> Option<Mat4> {
        let mut matrix = self.nodes.get(key)?.transform.matrix();
        let mut current = self.parent(key);
        while let Some(k) = current {
            let node = &self.nodes[k];
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        Some(matrix)
    }

    /// World-space box around every mesh in the subtree
    pub fn world_bounds(&self, key: NodeKey) -> Option<Aabb> {
        let boxes: Vec<Aabb> = self
            .descendants(key)
            .into_iter()
            .filter_map(|k| {
                let mesh = self.nodes[k].as_mesh()?;
                Some(mesh.geometry.bounds().transformed(&self.world_matrix(k)?))
            })
            .collect();
        if boxes.is_empty() {
            return None;
        }
        Some(Aabb::from_points(boxes.iter().flat_map(|b| [b.min, b.max])))
    }

    /// Visible nodes reachable from the root with their world matrices
    ///
    /// Invisible nodes hide their whole subtree.
    pub fn visible_world_matrices(&self) -> Vec<(NodeKey, Mat4)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, Mat4::IDENTITY)];
        while let Some((key, parent_matrix)) = stack.pop() {
            let node = &self.nodes[key];
            if !node.visible {
                continue;
            }
            let matrix = parent_matrix * node.transform.matrix();
            out.push((key, matrix));
            stack.extend(node.children.iter().rev().map(|&c| (c, matrix)));
        }
        out
    }

    /// Deep-copy a subtree
    ///
    /// Geometry and materials are shared with the original. The copy is
    /// detached and its names are registered.
    pub fn clone_subtree(&mut self, key: NodeKey) -> Option<NodeKey> {
        let copy = self.nodes.get(key)?.detached_copy();
        let children = self.nodes[key].children.clone();
        let new_key = self.add(copy);
        for child in children {
            if let Some(child_copy) = self.clone_subtree(child) {
                self.nodes[child_copy].parent = Some(new_key);
                self.nodes[new_key].children.push(child_copy);
            }
        }
        Some(new_key)
    }

    /// Detach and remove a subtree, dropping its resource references
    ///
    /// Disposing the root clears the scene but keeps the root itself.
    pub fn dispose_subtree(&mut self, key: NodeKey) -> DisposeReport {
        let mut report = DisposeReport::default();
        if !self.contains(key) {
            return report;
        }
        self.detach(key);
        let doomed = self.descendants(key);
        for k in doomed {
            if k == self.root {
                self.nodes[k].children.clear();
                continue;
            }
            if let Some(node) = self.nodes.remove(k) {
                if let Some(name) = node.name() {
                    self.unregister(name, k);
                }
                report.nodes += 1;
                if matches!(node.kind, NodeKind::Mesh(_)) {
                    report.meshes += 1;
                }
            }
        }
        self.dirty |= DirtyFlags::STRUCTURE;
        report
    }

    /// Change a node's registered name
    pub fn rename(&mut self, key: NodeKey, name: Option<String>) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        let old = node.name().map(str::to_owned);
        node.set_name(name.clone());
        if let Some(old) = old {
            self.unregister(&old, key);
        }
        if let Some(name) = name {
            self.names.entry(name).or_default().push(key);
        }
    }

    fn unregister(&mut self, name: &str, key: NodeKey) {
        if let Some(keys) = self.names.get_mut(name) {
            keys.retain(|&k| k != key);
            if keys.is_empty() {
                self.names.remove(name);
            }
        }
    }

    /// Every live node registered under `name`
    pub fn find_by_name(&self, name: &str) -> &[NodeKey] {
        self.names.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes named `name` inside the subtree rooted at `root`
    pub fn find_in_subtree(&self, root: NodeKey, name: &str) -> Vec<NodeKey> {
        self.find_by_name(name)
            .iter()
            .copied()
            .filter(|&k| self.is_ancestor(root, k))
            .collect()
    }

    /// Point light nodes inside a subtree
    pub fn point_lights_in(&self, root: NodeKey) -> Vec<NodeKey> {
        self.descendants(root)
            .into_iter()
            .filter(|&k| matches!(self.nodes[k].kind, NodeKind::PointLight(_)))
            .collect()
    }

    /// Changes since the last [`SceneGraph::clear_dirty`]
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::lighting::PointLight;
    use crate::material::{Material, MaterialParams};
    use crate::transform::Transform;
    use glam::Vec3;
    use std::rc::Rc;

    fn make_mesh() -> Node {
        Node::mesh(
            Rc::new(Geometry::cuboid(1.0, 1.0, 1.0)),
            Rc::new(Material::new(MaterialParams::default())),
        )
    }

    #[test]
    fn test_new_graph_has_root() {
        let graph = SceneGraph::new();
        assert_eq!(graph.len(), 1);
        assert!(graph.children(graph.root()).is_empty());
        assert!(graph.dirty().contains(DirtyFlags::STRUCTURE));
    }

    #[test]
    fn test_add_child_links_both_ways() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let child = graph.add_child(root, Node::group());
        assert_eq!(graph.children(root), &[child]);
        assert_eq!(graph.parent(child), Some(root));
    }

    #[test]
    fn test_attach_reparents() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add_child(root, Node::group());
        let b = graph.add_child(root, Node::group());
        let leaf = graph.add_child(a, Node::group());

        graph.attach(b, leaf).unwrap();
        assert!(graph.children(a).is_empty());
        assert_eq!(graph.children(b), &[leaf]);
        assert_eq!(graph.parent(leaf), Some(b));
    }

    #[test]
    fn test_attach_rejects_cycle() {
        let mut graph = SceneGraph::new();
        let a = graph.add(Node::group());
        let b = graph.add_child(a, Node::group());
        assert_eq!(graph.attach(b, a), Err(GraphError::Cycle { parent: b, child: a }));
        assert_eq!(graph.attach(a, a), Err(GraphError::Cycle { parent: a, child: a }));
    }

    #[test]
    fn test_attach_rejects_stale_key() {
        let mut graph = SceneGraph::new();
        let a = graph.add(Node::group());
        graph.dispose_subtree(a);
        let root = graph.root();
        assert_eq!(graph.attach(root, a), Err(GraphError::StaleKey(a)));
    }

    #[test]
    fn test_world_matrix_chains_parents() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph.add_child(root, Node::group().with_transform(Transform::from_xyz(0.0, 0.06, 0.0)));
        let light = graph.add_child(group, Node::group().with_transform(Transform::from_xyz(-0.5, 0.0, -0.25)));
        let p = graph.world_matrix(light).unwrap().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(-0.5, 0.06, -0.25)).length() < 1e-6);
    }

    #[test]
    fn test_world_bounds_of_group() {
        let mut graph = SceneGraph::new();
        let group = graph.add(Node::group().with_transform(Transform::from_xyz(10.0, 0.0, 0.0)));
        graph.add_child(group, make_mesh().with_transform(Transform::from_xyz(0.0, 0.5, 0.0)));
        graph.add_child(group, make_mesh().with_transform(Transform::from_xyz(0.0, 1.5, 0.0)));
        let bounds = graph.world_bounds(group).unwrap();
        assert!((bounds.min - Vec3::new(9.5, 0.0, -0.5)).length() < 1e-6);
        assert!((bounds.max - Vec3::new(10.5, 2.0, 0.5)).length() < 1e-6);
        assert!(graph.world_bounds(graph.root()).is_none());
    }

    #[test]
    fn test_name_registry() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add_child(root, Node::point_light(PointLight::default()).with_name("bulb"));
        let b = graph.add_child(root, Node::point_light(PointLight::default()).with_name("bulb"));
        assert_eq!(graph.find_by_name("bulb"), &[a, b]);
        assert!(graph.find_by_name("missing").is_empty());

        graph.rename(a, Some("spare".to_string()));
        assert_eq!(graph.find_by_name("bulb"), &[b]);
        assert_eq!(graph.find_by_name("spare"), &[a]);
    }

    #[test]
    fn test_clone_subtree_shares_resources_and_registers_names() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let lamp = graph.add(Node::group().with_transform(Transform::from_xyz(-0.5, 0.0, -0.25)));
        let body = graph.add_child(lamp, make_mesh());
        let bulb = graph.add_child(lamp, Node::point_light(PointLight::default()).with_name("bulb"));
        graph.attach(root, lamp).unwrap();

        let copy = graph.clone_subtree(lamp).unwrap();
        assert!(graph.parent(copy).is_none());
        assert_eq!(graph.children(copy).len(), 2);

        let copied_body = graph.children(copy)[0];
        let original = graph.get(body).unwrap().as_mesh().unwrap();
        let cloned = graph.get(copied_body).unwrap().as_mesh().unwrap();
        assert!(Rc::ptr_eq(&original.material, &cloned.material));
        assert!(Rc::ptr_eq(&original.geometry, &cloned.geometry));

        assert_eq!(graph.find_by_name("bulb").len(), 2);
        assert_eq!(graph.find_in_subtree(lamp, "bulb"), vec![bulb]);
        assert_eq!(graph.find_in_subtree(copy, "bulb").len(), 1);
    }

    #[test]
    fn test_dispose_releases_resources() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let geometry = Rc::new(Geometry::cuboid(0.0085, 0.0085, 0.0085));
        let material = Rc::new(Material::new(MaterialParams::default()));
        let swarm = graph.add_child(root, Node::group().with_name("swarm"));
        for _ in 0..5 {
            graph.add_child(swarm, Node::mesh(geometry.clone(), material.clone()));
        }
        let weak_geometry = Rc::downgrade(&geometry);
        let weak_material = Rc::downgrade(&material);
        drop(geometry);
        drop(material);

        let report = graph.dispose_subtree(swarm);
        assert_eq!(report, DisposeReport { nodes: 6, meshes: 5 });
        assert!(weak_geometry.upgrade().is_none());
        assert!(weak_material.upgrade().is_none());
        assert!(graph.children(root).is_empty());
        assert!(graph.find_by_name("swarm").is_empty());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_dispose_root_keeps_root() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph.add_child(root, make_mesh());
        let report = graph.dispose_subtree(root);
        assert_eq!(report.nodes, 1);
        assert!(graph.contains(root));
        assert!(graph.children(root).is_empty());
    }

    #[test]
    fn test_visible_world_matrices_skip_hidden_subtrees() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let shown = graph.add_child(root, make_mesh());
        let hidden = graph.add_child(root, Node::group());
        graph.add_child(hidden, make_mesh());
        graph.get_mut(hidden).unwrap().visible = false;
        graph.add(make_mesh()); // detached

        let keys: Vec<NodeKey> = graph.visible_world_matrices().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![root, shown]);
    }

    #[test]
    fn test_point_lights_in_uses_node_kind() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph.add_child(root, make_mesh().with_name("bulb"));
        let light = graph.add_child(root, Node::point_light(PointLight::default()));
        assert_eq!(graph.point_lights_in(root), vec![light]);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut graph = SceneGraph::new();
        graph.clear_dirty();
        assert!(graph.dirty().is_empty());

        let root = graph.root();
        let key = graph.add_child(root, Node::group());
        assert!(graph.dirty().contains(DirtyFlags::STRUCTURE));
        graph.clear_dirty();

        graph.get_mut(key).unwrap().transform.position.y = 1.0;
        assert_eq!(graph.dirty(), DirtyFlags::TRANSFORM);
    }
}
