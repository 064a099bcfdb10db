//! Night street scene assembly
//!
//! Places every object builder's output into one graph and keeps handles to
//! the nodes and materials the debug panel tunes.

use std::rc::Rc;

use glam::Vec3;
use nightstreet_core::{
    AmbientLight, Color, Material, MaterialParams, MaterialRef, Node, NodeKey, SceneGraph, TextureLoader,
    Transform,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::params::{apply_ambient, apply_background, apply_fog, SceneParams};
use crate::objects::measurements::STREET;
use crate::objects::{build_chair, build_grass, build_street, build_street_light, FireflySwarm, POINT_LIGHT_NAME};

/// Street center along Z
pub const STREET_Z: f32 = 3.25;
/// Offset between the two rows of street lights
pub const LIGHT_ROW_SPACING: f32 = 7.0;
/// Positions of the street lights in one row
pub const LIGHT_ROW: [Vec3; 3] = [
    Vec3::new(-0.5, 0.0, -0.25),
    Vec3::new(6.0, 0.0, -0.25),
    Vec3::new(-6.0, 0.0, -0.25),
];

/// Nodes and shared resources that stay tunable after assembly
#[derive(Debug)]
pub struct SceneHandles {
    pub grass: NodeKey,
    pub chair: NodeKey,
    pub street: NodeKey,
    pub street_lights: [NodeKey; 2],
    /// Glow material shared by every lamp
    pub lamp_material: MaterialRef,
    /// Every street light bulb, both rows
    pub point_lights: Vec<NodeKey>,
    pub ambient: NodeKey,
    pub fireflies: FireflySwarm,
    pub rng: StdRng,
}

/// Builds the night street into a scene graph
pub struct SceneAssembler<'a> {
    loader: &'a dyn TextureLoader,
    params: &'a SceneParams,
}

impl<'a> SceneAssembler<'a> {
    pub fn new(loader: &'a dyn TextureLoader, params: &'a SceneParams) -> Self {
        Self { loader, params }
    }

    /// Build the whole scene under the graph root
    pub fn assemble(&self, graph: &mut SceneGraph) -> SceneHandles {
        let root = graph.root();
        let curb_height = STREET.sidewalk.height;

        apply_background(graph, &self.params.background);
        apply_fog(graph, &self.params.fog);

        let grass = build_grass(graph, self.loader);
        self.attach(graph, root, grass);

        let chair = build_chair(graph, self.loader);
        if let Some(node) = graph.get_mut(chair) {
            node.transform.translate(Vec3::new(0.0, curb_height, 0.0));
        }
        self.attach(graph, root, chair);

        let street = build_street(graph, self.loader);
        if let Some(node) = graph.get_mut(street) {
            node.transform.position.z = STREET_Z;
        }
        self.attach(graph, root, street);

        let lamp_material = Rc::new(Material::new(MaterialParams::default().with_emissive(
            Color::from_hex(self.params.lamps.color),
            self.params.lamps.intensity,
        )));
        let row = self.build_light_row(graph, &lamp_material, curb_height);
        self.attach(graph, root, row);
        let second_row = match graph.clone_subtree(row) {
            Some(copy) => {
                if let Some(node) = graph.get_mut(copy) {
                    node.transform.position.z += LIGHT_ROW_SPACING;
                }
                self.attach(graph, root, copy);
                copy
            }
            None => row,
        };

        let mut point_lights = graph.find_in_subtree(row, POINT_LIGHT_NAME);
        point_lights.extend(graph.find_in_subtree(second_row, POINT_LIGHT_NAME));

        let ambient = graph.add_child(root, Node::ambient_light(AmbientLight::default()).with_name("ambientLight"));
        apply_ambient(graph, ambient, &self.params.ambient);

        let mut rng = match self.params.fireflies.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let fireflies = FireflySwarm::spawn(graph, root, self.params.fireflies.amount, &mut rng);
        if let Some(node) = graph.get_mut(fireflies.root) {
            node.transform.position.z = STREET_Z;
        }

        log::info!(
            "Assembled scene: {} nodes, {} street lights, {} fireflies",
            graph.len(),
            point_lights.len(),
            fireflies.len()
        );

        SceneHandles {
            grass,
            chair,
            street,
            street_lights: [row, second_row],
            lamp_material,
            point_lights,
            ambient,
            fireflies,
            rng,
        }
    }

    fn build_light_row(&self, graph: &mut SceneGraph, lamp_material: &MaterialRef, lift: f32) -> NodeKey {
        let row = graph.add(
            Node::group()
                .with_name("streetLights")
                .with_transform(Transform::from_xyz(0.0, lift, 0.0)),
        );
        let first = build_street_light(graph, self.loader, lamp_material, self.params.street_light.light());
        self.attach(graph, row, first);

        let mut lights = vec![first];
        for _ in 1..LIGHT_ROW.len() {
            if let Some(copy) = graph.clone_subtree(first) {
                self.attach(graph, row, copy);
                lights.push(copy);
            }
        }
        for (key, position) in lights.into_iter().zip(LIGHT_ROW) {
            if let Some(node) = graph.get_mut(key) {
                node.transform.position = position;
            }
        }
        row
    }

    fn attach(&self, graph: &mut SceneGraph, parent: NodeKey, child: NodeKey) {
        if let Err(e) = graph.attach(parent, child) {
            log::warn!("Scene assembly: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::test_support::RecordingLoader;

    fn seeded() -> SceneParams {
        let mut params = SceneParams::default();
        params.fireflies.seed = Some(9);
        params
    }

    fn assemble() -> (SceneGraph, SceneHandles) {
        let mut graph = SceneGraph::new();
        let loader = RecordingLoader::default();
        let params = seeded();
        let handles = SceneAssembler::new(&loader, &params).assemble(&mut graph);
        (graph, handles)
    }

    #[test]
    fn test_six_street_lights_in_two_rows() {
        let (graph, handles) = assemble();
        assert_eq!(handles.point_lights.len(), 6);
        assert_eq!(graph.find_by_name("streetLight").len(), 6);

        let [a, b] = handles.street_lights;
        let za = graph.get(a).unwrap().transform.position.z;
        let zb = graph.get(b).unwrap().transform.position.z;
        assert!((zb - za - LIGHT_ROW_SPACING).abs() < 1e-6);
    }

    #[test]
    fn test_lights_stand_on_sidewalk() {
        let (graph, handles) = assemble();
        for row in handles.street_lights {
            for &light in graph.children(row) {
                let bounds = graph.world_bounds(light).unwrap();
                assert!((bounds.min.y - STREET.sidewalk.height).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_point_light_world_position() {
        let (graph, handles) = assemble();
        let first = handles.point_lights[0];
        let world = graph.world_matrix(first).unwrap().transform_point3(Vec3::ZERO);
        // -0.5 + -0.1 on X, -0.25 + 0.1 on Z
        assert!((world.x + 0.6).abs() < 1e-5);
        assert!((world.z + 0.15).abs() < 1e-5);
        let light = graph.get(first).unwrap().as_point_light().unwrap();
        assert_eq!(light.distance, 3.5);
    }

    #[test]
    fn test_placement_offsets() {
        let (graph, handles) = assemble();
        assert_eq!(graph.get(handles.street).unwrap().transform.position.z, STREET_Z);
        assert_eq!(graph.get(handles.fireflies.root).unwrap().transform.position.z, STREET_Z);
        let chair = graph.get(handles.chair).unwrap().transform.position;
        assert!((chair - Vec3::new(0.0, 0.06, -0.5)).length() < 1e-6);
        assert_eq!(graph.parent(handles.grass), Some(graph.root()));
    }

    #[test]
    fn test_environment_and_shared_lamp() {
        let (graph, handles) = assemble();
        assert_eq!(graph.environment.background.to_hex(), 0x04050e);
        assert!(graph.environment.fog.is_some());
        assert_eq!(handles.fireflies.len(), 40);

        let lamps = graph.find_by_name("lamp");
        assert_eq!(lamps.len(), 6);
        for &lamp in lamps {
            let mesh = graph.get(lamp).unwrap().as_mesh().unwrap();
            assert!(Rc::ptr_eq(&mesh.material, &handles.lamp_material));
        }
        assert_eq!(handles.lamp_material.params().emissive_intensity, 2.0);
    }

    #[test]
    fn test_street_light_textures_loaded_once() {
        let mut graph = SceneGraph::new();
        let loader = RecordingLoader::default();
        let params = seeded();
        SceneAssembler::new(&loader, &params).assemble(&mut graph);
        let street_light_loads = loader
            .paths
            .borrow()
            .iter()
            .filter(|p| p.starts_with("street_light/"))
            .count();
        assert_eq!(street_light_loads, 3);
    }
}
