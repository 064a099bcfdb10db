//! Asphalt road with curbs, sidewalks and lane markings

use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use nightstreet_core::{Material, MaterialParams, Node, NodeKey, SceneGraph, TextureLoader, Transform};

use super::measurements::{StreetMeasurements, STREET};
use super::{color_arm_normal, Tiling};

/// Part centers in street-local space
///
/// The asphalt is centered on `z = 0`. Curbs and sidewalks come in mirrored
/// pairs, listed negative side first.
#[derive(Clone, Copy, Debug)]
pub struct StreetLayout {
    pub asphalt_y: f32,
    pub curb_y: f32,
    /// Curbs along the asphalt edges
    pub inner_curbs_z: [f32; 2],
    pub sidewalk_y: f32,
    pub sidewalks_z: [f32; 2],
    /// Curbs along the outer sidewalk edges
    pub outer_curbs_z: [f32; 2],
    pub markings_y: f32,
    pub markings_x: [f32; 3],
}

impl StreetLayout {
    pub fn new(m: &StreetMeasurements) -> Self {
        let inner_curb = m.asphalt.depth / 2.0 + m.curb.depth / 2.0;
        let sidewalk = inner_curb + m.curb.depth / 2.0 + m.sidewalk.depth / 2.0;
        let outer_curb = sidewalk + m.sidewalk.depth / 2.0 + m.curb.depth / 2.0;

        Self {
            asphalt_y: m.asphalt.height / 2.0,
            curb_y: m.curb.height / 2.0,
            inner_curbs_z: [-inner_curb, inner_curb],
            sidewalk_y: m.sidewalk.height / 2.0,
            sidewalks_z: [-sidewalk, sidewalk],
            outer_curbs_z: [-outer_curb, outer_curb],
            markings_y: m.asphalt.height + m.marking_lift,
            markings_x: [0.0, m.marking_spacing, -m.marking_spacing],
        }
    }
}

/// Build the street group, centered on the origin
pub fn build_street(graph: &mut SceneGraph, loader: &dyn TextureLoader) -> NodeKey {
    let m = &STREET;
    let layout = StreetLayout::new(m);

    let street = graph.add(Node::group().with_name("street"));

    let asphalt = Rc::new(Material::textured(color_arm_normal(loader, "asphalt", Tiling::repeat(4.0, 4.0))));
    graph.add_child(
        street,
        Node::mesh(Rc::new(m.asphalt.geometry()), asphalt)
            .with_name("asphalt")
            .with_transform(Transform::from_xyz(0.0, layout.asphalt_y, 0.0)),
    );

    let curb_material = Rc::new(Material::textured(color_arm_normal(
        loader,
        "street_curb",
        Tiling::repeat(40.0, 1.0),
    )));
    let curb_geometry = Rc::new(m.curb.geometry());
    let sidewalk_material = Rc::new(Material::textured(color_arm_normal(
        loader,
        "sidewalk",
        Tiling::repeat(15.0, 2.0),
    )));
    let sidewalk_geometry = Rc::new(m.sidewalk.geometry());

    for z in layout.inner_curbs_z {
        graph.add_child(
            street,
            Node::mesh(curb_geometry.clone(), curb_material.clone())
                .with_name("curb")
                .with_transform(Transform::from_xyz(0.0, layout.curb_y, z)),
        );
    }
    for z in layout.sidewalks_z {
        graph.add_child(
            street,
            Node::mesh(sidewalk_geometry.clone(), sidewalk_material.clone())
                .with_name("sidewalk")
                .with_transform(Transform::from_xyz(0.0, layout.sidewalk_y, z)),
        );
    }
    for z in layout.outer_curbs_z {
        graph.add_child(
            street,
            Node::mesh(curb_geometry.clone(), curb_material.clone())
                .with_name("curb")
                .with_transform(Transform::from_xyz(0.0, layout.curb_y, z)),
        );
    }

    let markings = graph.add_child(
        street,
        Node::group()
            .with_name("roadMarkings")
            .with_transform(Transform::from_xyz(0.0, layout.markings_y, 0.0)),
    );
    let marking_geometry = Rc::new(m.road_marking.geometry());
    let paint = Rc::new(Material::new(MaterialParams::default()));
    for x in layout.markings_x {
        graph.add_child(
            markings,
            Node::mesh(marking_geometry.clone(), paint.clone())
                .with_transform(Transform::from_xyz(x, 0.0, 0.0).with_rotation_euler(-FRAC_PI_2, 0.0, 0.0)),
        );
    }

    street
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::test_support::{RecordingLoader, EPSILON};
    use crate::objects::test_support::tables::{self, seeded, TABLE_EPSILON};

    #[test]
    fn test_inner_curbs_abut_asphalt() {
        let m = &STREET;
        let layout = StreetLayout::new(m);
        let curb_inner_edge = layout.inner_curbs_z[1] - m.curb.depth / 2.0;
        assert!((curb_inner_edge - m.asphalt.depth / 2.0).abs() < EPSILON);
        assert!((layout.inner_curbs_z[1] - 2.55).abs() < EPSILON);
    }

    #[test]
    fn test_sidewalk_abuts_curbs_on_both_sides() {
        let m = &STREET;
        let layout = StreetLayout::new(m);
        let sidewalk = layout.sidewalks_z[1];
        let inner = layout.inner_curbs_z[1] + m.curb.depth / 2.0;
        let outer = layout.outer_curbs_z[1] - m.curb.depth / 2.0;
        assert!((sidewalk - m.sidewalk.depth / 2.0 - inner).abs() < EPSILON);
        assert!((sidewalk + m.sidewalk.depth / 2.0 - outer).abs() < EPSILON);
        assert!((layout.outer_curbs_z[1] - 4.65).abs() < EPSILON);
    }

    #[test]
    fn test_pairs_mirror_across_centerline() {
        let layout = StreetLayout::new(&STREET);
        for pair in [layout.inner_curbs_z, layout.sidewalks_z, layout.outer_curbs_z] {
            assert!((pair[0] + pair[1]).abs() < EPSILON);
        }
        assert!((layout.markings_x[1] + layout.markings_x[2]).abs() < EPSILON);
    }

    #[test]
    fn test_any_table_abuts_and_mirrors() {
        for m in seeded(tables::street) {
            let layout = StreetLayout::new(&m);
            let curb = m.curb.depth / 2.0;
            let sidewalk = m.sidewalk.depth / 2.0;

            assert!((layout.inner_curbs_z[1] - curb - m.asphalt.depth / 2.0).abs() < TABLE_EPSILON);
            assert!((layout.sidewalks_z[1] - sidewalk - (layout.inner_curbs_z[1] + curb)).abs() < TABLE_EPSILON);
            assert!((layout.outer_curbs_z[1] - curb - (layout.sidewalks_z[1] + sidewalk)).abs() < TABLE_EPSILON);

            for pair in [layout.inner_curbs_z, layout.sidewalks_z, layout.outer_curbs_z] {
                assert!((pair[0] + pair[1]).abs() < TABLE_EPSILON);
            }
            assert!((layout.markings_x[1] + layout.markings_x[2]).abs() < TABLE_EPSILON);
            assert!(layout.markings_y > m.asphalt.height);
        }
    }

    #[test]
    fn test_markings_sit_above_asphalt() {
        let layout = StreetLayout::new(&STREET);
        assert!((layout.markings_y - 0.06).abs() < EPSILON);
    }

    #[test]
    fn test_build_street_counts() {
        let mut graph = SceneGraph::new();
        let loader = RecordingLoader::default();
        let street = build_street(&mut graph, &loader);

        assert_eq!(graph.find_in_subtree(street, "curb").len(), 4);
        assert_eq!(graph.find_in_subtree(street, "sidewalk").len(), 2);
        let markings = graph.find_in_subtree(street, "roadMarkings")[0];
        assert_eq!(graph.children(markings).len(), 3);
        // asphalt, curb and sidewalk each load one texture set
        assert_eq!(loader.paths.borrow().len(), 9);

        let bounds = graph.world_bounds(street).unwrap();
        assert!((bounds.size().z - 9.4).abs() < 1e-4);
    }
}
