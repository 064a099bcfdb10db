//! Park bench built from boxes

use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use glam::Vec3;
use nightstreet_core::{Material, Node, NodeKey, SceneGraph, TextureLoader, Transform};

use super::measurements::{ChairMeasurements, CHAIR};
use super::{color_arm_normal, stack, Tiling};

const TILING: Tiling = Tiling::repeat(0.45, 3.0).rotated(FRAC_PI_2);

/// Part centers in chair-local space
///
/// The chair's origin is the outer corner of the first leg on the ground;
/// the seat spans `[0, seat.width]` on X and `[0, seat.depth]` on Z.
#[derive(Clone, Copy, Debug)]
pub struct ChairLayout {
    pub legs: [Vec3; 4],
    pub seat: Vec3,
    pub back_posts: [Vec3; 2],
    pub backrest: Vec3,
}

impl ChairLayout {
    pub fn new(m: &ChairMeasurements) -> Self {
        let leg_y = m.leg.height / 2.0;
        let near_x = m.leg.width / 2.0;
        let far_x = m.seat.width - m.leg.width / 2.0;
        let near_z = m.leg.depth / 2.0;
        let far_z = m.seat.depth - m.leg.depth / 2.0;

        let seat_y = stack(leg_y, m.leg.height, m.seat.height);
        let post_y = stack(seat_y, m.seat.height, m.back_post.height);

        Self {
            legs: [
                Vec3::new(near_x, leg_y, near_z),
                Vec3::new(far_x, leg_y, near_z),
                Vec3::new(near_x, leg_y, far_z),
                Vec3::new(far_x, leg_y, far_z),
            ],
            seat: Vec3::new(m.seat.width / 2.0, seat_y, m.seat.depth / 2.0),
            back_posts: [
                Vec3::new(m.seat.width - m.back_post.width / 2.0, post_y, near_z),
                Vec3::new(m.back_post.width / 2.0, post_y, near_z),
            ],
            backrest: Vec3::new(
                m.backrest.width / 2.0,
                m.height() - m.backrest.height / 2.0 - m.backrest_inset,
                m.back_post.depth + m.backrest.depth / 2.0,
            ),
        }
    }
}

/// Build the chair with its root at `z = offset_z`
pub fn build_chair(graph: &mut SceneGraph, loader: &dyn TextureLoader) -> NodeKey {
    let m = &CHAIR;
    let layout = ChairLayout::new(m);
    let material = Rc::new(Material::textured(color_arm_normal(loader, "chair", TILING)));

    let chair = graph.add(
        Node::group()
            .with_name("chair")
            .with_transform(Transform::from_xyz(0.0, 0.0, m.offset_z)),
    );

    let legs = graph.add_child(chair, Node::group().with_name("chairLegs"));
    let leg_geometry = Rc::new(m.leg.geometry());
    for position in layout.legs {
        graph.add_child(
            legs,
            Node::mesh(leg_geometry.clone(), material.clone()).with_transform(Transform::from_position(position)),
        );
    }

    graph.add_child(
        chair,
        Node::mesh(Rc::new(m.seat.geometry()), material.clone())
            .with_name("chairSeat")
            .with_transform(
                Transform::from_position(layout.seat).with_scale(Vec3::new(m.seat_overhang, 1.0, m.seat_overhang)),
            ),
    );

    let back = graph.add_child(chair, Node::group().with_name("chairBack"));
    let post_geometry = Rc::new(m.back_post.geometry());
    for position in layout.back_posts {
        graph.add_child(
            back,
            Node::mesh(post_geometry.clone(), material.clone()).with_transform(Transform::from_position(position)),
        );
    }
    graph.add_child(
        back,
        Node::mesh(Rc::new(m.backrest.geometry()), material)
            .with_name("chairBackrest")
            .with_transform(
                Transform::from_position(layout.backrest).with_scale(Vec3::new(m.backrest_scale_x, 1.0, 1.0)),
            ),
    );

    chair
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::test_support::{RecordingLoader, EPSILON};
    use crate::objects::test_support::tables::{self, seeded, TABLE_EPSILON};
    use nightstreet_core::NodeKind;

    #[test]
    fn test_seat_rests_on_legs() {
        let m = &CHAIR;
        let layout = ChairLayout::new(m);
        let leg_top = layout.legs[0].y + m.leg.height / 2.0;
        let seat_bottom = layout.seat.y - m.seat.height / 2.0;
        assert!((leg_top - seat_bottom).abs() < EPSILON);
    }

    #[test]
    fn test_posts_rest_on_seat() {
        let m = &CHAIR;
        let layout = ChairLayout::new(m);
        let seat_top = layout.seat.y + m.seat.height / 2.0;
        for post in layout.back_posts {
            assert!((post.y - m.back_post.height / 2.0 - seat_top).abs() < EPSILON);
        }
        // Top of the posts is the chair height
        assert!((layout.back_posts[0].y + m.back_post.height / 2.0 - m.height()).abs() < EPSILON);
    }

    #[test]
    fn test_legs_mirror_across_seat_midlines() {
        let m = &CHAIR;
        let layout = ChairLayout::new(m);
        let mid_x = m.seat.width / 2.0;
        let mid_z = m.seat.depth / 2.0;
        let [a, b, c, d] = layout.legs;
        assert!((a.x + b.x - 2.0 * mid_x).abs() < EPSILON);
        assert!((c.x + d.x - 2.0 * mid_x).abs() < EPSILON);
        assert!((a.z + c.z - 2.0 * mid_z).abs() < EPSILON);
        assert!((b.z + d.z - 2.0 * mid_z).abs() < EPSILON);
        let [p, q] = layout.back_posts;
        assert!((p.x + q.x - 2.0 * mid_x).abs() < EPSILON);
    }

    #[test]
    fn test_any_table_stacks_and_mirrors() {
        for m in seeded(tables::chair) {
            let layout = ChairLayout::new(&m);
            let mid_x = m.seat.width / 2.0;
            let mid_z = m.seat.depth / 2.0;

            for leg in layout.legs {
                assert!((leg.y - m.leg.height / 2.0).abs() < TABLE_EPSILON);
                assert!((leg.y + m.leg.height / 2.0 - (layout.seat.y - m.seat.height / 2.0)).abs() < TABLE_EPSILON);
            }
            let seat_top = layout.seat.y + m.seat.height / 2.0;
            for post in layout.back_posts {
                assert!((post.y - m.back_post.height / 2.0 - seat_top).abs() < TABLE_EPSILON);
            }

            let [a, b, c, d] = layout.legs;
            assert!((a.x + b.x - 2.0 * mid_x).abs() < TABLE_EPSILON);
            assert!((c.x + d.x - 2.0 * mid_x).abs() < TABLE_EPSILON);
            assert!((a.z + c.z - 2.0 * mid_z).abs() < TABLE_EPSILON);
            let [p, q] = layout.back_posts;
            assert!((p.x + q.x - 2.0 * mid_x).abs() < TABLE_EPSILON);
            assert!((layout.seat.x - mid_x).abs() < TABLE_EPSILON);
        }
    }

    #[test]
    fn test_backrest_placement() {
        let layout = ChairLayout::new(&CHAIR);
        assert!((layout.backrest.y - 0.64).abs() < EPSILON);
        assert!((layout.backrest.z - 0.055).abs() < EPSILON);
    }

    #[test]
    fn test_build_chair_shares_one_material() {
        let mut graph = SceneGraph::new();
        let loader = RecordingLoader::default();
        let chair = build_chair(&mut graph, &loader);

        let meshes: Vec<_> = graph
            .descendants(chair)
            .into_iter()
            .filter_map(|k| match &graph.get(k)?.kind {
                NodeKind::Mesh(mesh) => Some(mesh.material.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(meshes.len(), 8);
        assert!(meshes.iter().all(|m| Rc::ptr_eq(m, &meshes[0])));
        assert_eq!(loader.paths.borrow().len(), 3);
        assert_eq!(graph.get(chair).unwrap().transform.position.z, -0.5);
        assert!(graph.parent(chair).is_none());
    }
}
