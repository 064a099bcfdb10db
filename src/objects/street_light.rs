//! Lantern-style street light with a point light under the lamp

use std::f32::consts::FRAC_PI_4;
use std::rc::Rc;

use glam::Vec3;
use nightstreet_core::{
    Material, MaterialRef, Node, NodeKey, PointLight, SceneGraph, TextureLoader, Transform,
};

use super::measurements::{StreetLightMeasurements, STREET_LIGHT};
use super::{color_arm_normal, stack, Tiling};

/// Registry name of each street light's point light
pub const POINT_LIGHT_NAME: &str = "streetLightPointLight";

/// Vertical centers of the stacked parts
#[derive(Clone, Copy, Debug)]
pub struct StreetLightLayout {
    pub foundation: f32,
    pub base: f32,
    pub pole: f32,
    pub pole_cap: f32,
    pub lamp_base: f32,
    pub lamp: f32,
    pub roof_base: f32,
    pub roof_peak: f32,
    pub finial: f32,
    pub light: Vec3,
}

impl StreetLightLayout {
    pub fn new(m: &StreetLightMeasurements) -> Self {
        let foundation = m.foundation.height / 2.0;
        let base = stack(foundation, m.foundation.height, m.base.height);
        let pole = stack(base, m.base.height, m.pole.height);
        let pole_cap = stack(pole, m.pole.height, m.pole_cap.height);
        let lamp_base = stack(pole_cap, m.pole_cap.height, m.lamp_base.height);
        let lamp = stack(lamp_base, m.lamp_base.height, m.lamp.height);
        let roof_base = stack(lamp, m.lamp.height, m.roof_base.height);
        let roof_peak = stack(roof_base, m.roof_base.height, m.roof_peak.height);
        let finial = stack(roof_peak, m.roof_peak.height, m.finial.height);
        let [dx, dy, dz] = m.light_offset;

        Self {
            foundation,
            base,
            pole,
            pole_cap,
            lamp_base,
            lamp,
            roof_base,
            roof_peak,
            finial,
            light: Vec3::new(dx, lamp + dy, dz),
        }
    }

    /// Center heights with their part heights, bottom to top
    pub fn stacked(&self, m: &StreetLightMeasurements) -> [(f32, f32); 9] {
        [
            (self.foundation, m.foundation.height),
            (self.base, m.base.height),
            (self.pole, m.pole.height),
            (self.pole_cap, m.pole_cap.height),
            (self.lamp_base, m.lamp_base.height),
            (self.lamp, m.lamp.height),
            (self.roof_base, m.roof_base.height),
            (self.roof_peak, m.roof_peak.height),
            (self.finial, m.finial.height),
        ]
    }
}

/// Build one street light at the origin
///
/// `lamp_material` is shared with the caller so the lamp glow can be tuned
/// for every light at once.
pub fn build_street_light(
    graph: &mut SceneGraph,
    loader: &dyn TextureLoader,
    lamp_material: &MaterialRef,
    light: PointLight,
) -> NodeKey {
    let m = &STREET_LIGHT;
    let layout = StreetLightLayout::new(m);
    let pole = Rc::new(Material::textured(color_arm_normal(
        loader,
        "street_light",
        Tiling::repeat(2.0, 2.0),
    )));
    let root = graph.add(Node::group().with_name("streetLight"));

    let parts = [
        ("foundation", Rc::new(m.foundation.geometry()), layout.foundation),
        ("base", Rc::new(m.base.geometry()), layout.base),
        ("pole", Rc::new(m.pole.geometry()), layout.pole),
        ("poleCap", Rc::new(m.pole_cap.geometry()), layout.pole_cap),
        ("lampBase", Rc::new(m.lamp_base.geometry()), layout.lamp_base),
    ];
    for (name, geometry, y) in parts {
        graph.add_child(
            root,
            Node::mesh(geometry, pole.clone())
                .with_name(name)
                .with_transform(Transform::from_xyz(0.0, y, 0.0)),
        );
    }

    graph.add_child(
        root,
        Node::mesh(Rc::new(m.lamp.geometry()), lamp_material.clone())
            .with_name("lamp")
            .with_transform(Transform::from_xyz(0.0, layout.lamp, 0.0)),
    );

    let roof = graph.add_child(root, Node::group().with_name("lampRoof"));
    graph.add_child(
        roof,
        Node::mesh(Rc::new(m.roof_base.geometry()), pole.clone())
            .with_transform(Transform::from_xyz(0.0, layout.roof_base, 0.0)),
    );
    graph.add_child(
        roof,
        Node::mesh(Rc::new(m.roof_peak.geometry()), pole.clone())
            .with_transform(Transform::from_xyz(0.0, layout.roof_peak, 0.0)),
    );
    graph.add_child(
        roof,
        Node::mesh(Rc::new(m.finial.geometry()), pole.clone()).with_transform(
            Transform::from_xyz(0.0, layout.finial, 0.0).with_rotation_euler(FRAC_PI_4, FRAC_PI_4, 0.0),
        ),
    );

    graph.add_child(
        root,
        Node::point_light(light)
            .with_name(POINT_LIGHT_NAME)
            .with_transform(Transform::from_position(layout.light)),
    );

    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::test_support::{RecordingLoader, EPSILON};
    use crate::objects::test_support::tables::{self, seeded, TABLE_EPSILON};
    use nightstreet_core::MaterialParams;

    fn lamp() -> MaterialRef {
        Rc::new(Material::new(MaterialParams::default()))
    }

    #[test]
    fn test_parts_abut() {
        let m = &STREET_LIGHT;
        let stacked = StreetLightLayout::new(m).stacked(m);
        assert!((stacked[0].0 - stacked[0].1 / 2.0).abs() < EPSILON);
        for pair in stacked.windows(2) {
            let (below, below_h) = pair[0];
            let (above, above_h) = pair[1];
            assert!((below + below_h / 2.0 - (above - above_h / 2.0)).abs() < EPSILON);
        }
    }

    #[test]
    fn test_any_table_stacks_from_ground() {
        for m in seeded(tables::street_light) {
            let layout = StreetLightLayout::new(&m);
            let stacked = layout.stacked(&m);
            assert!((stacked[0].0 - stacked[0].1 / 2.0).abs() < TABLE_EPSILON);
            for pair in stacked.windows(2) {
                let (below, below_h) = pair[0];
                let (above, above_h) = pair[1];
                assert!((below + below_h / 2.0 - (above - above_h / 2.0)).abs() < TABLE_EPSILON);
            }
            let [dx, dy, dz] = m.light_offset;
            assert!((layout.light - Vec3::new(dx, layout.lamp + dy, dz)).length() < TABLE_EPSILON);
        }
    }

    #[test]
    fn test_light_below_lamp_center() {
        let layout = StreetLightLayout::new(&STREET_LIGHT);
        assert!((layout.lamp - 2.3575).abs() < 1e-4);
        assert!((layout.light - Vec3::new(-0.1, 2.1075, 0.1)).length() < 1e-4);
    }

    #[test]
    fn test_build_registers_point_light() {
        let mut graph = SceneGraph::new();
        let light = build_street_light(&mut graph, &RecordingLoader::default(), &lamp(), PointLight::default());

        let lights = graph.find_in_subtree(light, POINT_LIGHT_NAME);
        assert_eq!(lights.len(), 1);
        assert_eq!(graph.point_lights_in(light), lights);
        // 6 stacked meshes, 3 roof meshes, the roof group, the light and the root
        assert_eq!(graph.descendants(light).len(), 12);
    }

    #[test]
    fn test_clone_shares_materials_and_registers_light() {
        let mut graph = SceneGraph::new();
        let glow = lamp();
        let original = build_street_light(&mut graph, &RecordingLoader::default(), &glow, PointLight::default());
        let copy = graph.clone_subtree(original).unwrap();

        assert_eq!(graph.find_by_name(POINT_LIGHT_NAME).len(), 2);
        let lamp_of = |root| {
            let key = graph.find_in_subtree(root, "lamp")[0];
            graph.get(key).unwrap().as_mesh().unwrap().material.clone()
        };
        assert!(Rc::ptr_eq(&lamp_of(original), &lamp_of(copy)));
        assert!(Rc::ptr_eq(&lamp_of(copy), &glow));
        let pole_of = |root| {
            let key = graph.find_in_subtree(root, "pole")[0];
            graph.get(key).unwrap().as_mesh().unwrap().material.clone()
        };
        assert!(Rc::ptr_eq(&pole_of(original), &pole_of(copy)));
    }
}
