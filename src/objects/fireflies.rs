//! Fireflies circling above the street
//!
//! Each firefly follows a closed-form orbit around its swarm root, so the
//! position at any time depends only on the elapsed time and the firefly's
//! random parameters.

use std::f32::consts::TAU;
use std::rc::Rc;

use glam::Vec3;
use nightstreet_core::{
    Color, DisposeReport, Material, MaterialParams, MaterialRef, Node, NodeKey, SceneGraph, Transform,
};
use rand::Rng;

use super::measurements::FIREFLY;

/// Orbit parameters of one firefly
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Firefly {
    /// Starting angle in radians
    pub phase: f32,
    /// Angular speed in radians per second
    pub speed: f32,
    pub radius: f32,
    /// `1.0` counter-clockwise, `-1.0` clockwise
    pub direction: f32,
}

impl Firefly {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            phase: rng.random::<f32>() * TAU,
            speed: 0.01 + rng.random::<f32>() * 0.2,
            radius: 0.5 + rng.random::<f32>() * 9.0,
            direction: if rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 },
        }
    }

    /// Position relative to the swarm root after `t` seconds
    ///
    /// Height stays within `[-1, 2]`.
    pub fn position_at(&self, t: f32) -> Vec3 {
        let angle = (t * self.speed + self.phase) * self.direction;
        let y = angle.sin() * (angle * 1.25).sin() * (angle * 3.0).sin() + 1.0;
        Vec3::new(angle.cos() * self.radius, y, angle.sin() * self.radius)
    }
}

/// A group of fireflies sharing one geometry and one glowing material
#[derive(Debug)]
pub struct FireflySwarm {
    pub root: NodeKey,
    pub particles: Vec<(NodeKey, Firefly)>,
}

impl FireflySwarm {
    /// Create `amount` fireflies under a new group attached to `parent`
    pub fn spawn<R: Rng>(graph: &mut SceneGraph, parent: NodeKey, amount: usize, rng: &mut R) -> Self {
        let root = graph.add_child(parent, Node::group().with_name("fireflies"));
        let geometry = Rc::new(FIREFLY.geometry());
        let material = glow_material();

        let particles = (0..amount)
            .map(|_| {
                let firefly = Firefly::random(rng);
                let key = graph.add_child(
                    root,
                    Node::mesh(geometry.clone(), material.clone())
                        .with_transform(Transform::from_position(firefly.position_at(0.0))),
                );
                (key, firefly)
            })
            .collect();

        log::debug!("Spawned {} fireflies", amount);
        Self { root, particles }
    }

    /// Move every firefly to its position at `elapsed` seconds
    pub fn update(&self, graph: &mut SceneGraph, elapsed: f32) {
        for (key, firefly) in &self.particles {
            if let Some(node) = graph.get_mut(*key) {
                node.transform.position = firefly.position_at(elapsed);
            }
        }
    }

    /// Replace the swarm with `amount` new fireflies
    ///
    /// The old subtree, its geometry and its material are released before the
    /// new swarm is created. The new root takes the old root's parent and
    /// local transform.
    pub fn respawn<R: Rng>(&mut self, graph: &mut SceneGraph, amount: usize, rng: &mut R) -> DisposeReport {
        let parent = graph.parent(self.root).unwrap_or_else(|| graph.root());
        let transform = graph.get(self.root).map(|n| n.transform).unwrap_or_default();

        let report = graph.dispose_subtree(self.root);
        *self = Self::spawn(graph, parent, amount, rng);
        if let Some(node) = graph.get_mut(self.root) {
            node.transform = transform;
        }

        log::debug!("Respawned fireflies: released {} nodes", report.nodes);
        report
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

fn glow_material() -> MaterialRef {
    Rc::new(Material::new(
        MaterialParams::default().with_emissive(Color::from_hex(0xffff00), 1.0),
    ))
}
