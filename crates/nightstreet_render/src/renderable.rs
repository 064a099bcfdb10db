//! Draw list extraction
//!
//! Flattens the visible part of a [`SceneGraph`] into per-frame draw data:
//! mesh instances with world matrices, point lights with world positions,
//! and the summed ambient term. Nothing here touches the GPU.

use std::rc::Rc;

use glam::{Mat4, Vec3};
use nightstreet_core::{Color, GeometryRef, MaterialRef, NodeKey, NodeKind, PointLight, SceneGraph};

/// One mesh instance to draw
#[derive(Clone, Debug)]
pub struct DrawItem {
    pub node: NodeKey,
    pub geometry: GeometryRef,
    pub material: MaterialRef,
    pub world: Mat4,
}

impl DrawItem {
    /// World-space origin of the instance
    pub fn origin(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }
}

/// A point light resolved to world space
#[derive(Clone, Copy, Debug)]
pub struct LightInstance {
    pub position: Vec3,
    pub light: PointLight,
}

/// A run of instances sharing geometry and material
#[derive(Clone, Debug)]
pub struct Batch {
    pub geometry: GeometryRef,
    pub material: MaterialRef,
    pub first_instance: u32,
    pub instance_count: u32,
}

/// Everything needed to draw one frame
#[derive(Debug, Default)]
pub struct DrawList {
    pub opaque: Vec<DrawItem>,
    pub transparent: Vec<DrawItem>,
    pub point_lights: Vec<LightInstance>,
    /// Sum of ambient `color × intensity`
    pub ambient: Color,
}

impl DrawList {
    /// Collect the visible scene
    pub fn from_scene(graph: &SceneGraph) -> Self {
        let mut list = Self {
            ambient: Color::BLACK,
            ..Default::default()
        };

        for (key, world) in graph.visible_world_matrices() {
            let Some(node) = graph.get(key) else { continue };
            match &node.kind {
                NodeKind::Group => {}
                NodeKind::Mesh(mesh) => {
                    let item = DrawItem {
                        node: key,
                        geometry: mesh.geometry.clone(),
                        material: mesh.material.clone(),
                        world,
                    };
                    if mesh.material.is_transparent() {
                        list.transparent.push(item);
                    } else {
                        list.opaque.push(item);
                    }
                }
                NodeKind::PointLight(light) => list.point_lights.push(LightInstance {
                    position: world.transform_point3(Vec3::ZERO),
                    light: *light,
                }),
                NodeKind::AmbientLight(light) => {
                    let c = light.color.scaled(light.intensity);
                    list.ambient = Color::linear(list.ambient.r + c.r, list.ambient.g + c.g, list.ambient.b + c.b);
                }
            }
        }

        // Group opaque instances so shared resources form contiguous runs
        list.opaque
            .sort_by_key(|item| (item.material.id(), item.geometry.id()));
        list
    }

    /// Order transparent items back to front as seen from `eye`
    pub fn sort_transparent(&mut self, eye: Vec3) {
        self.transparent.sort_by(|a, b| {
            let da = a.origin().distance_squared(eye);
            let db = b.origin().distance_squared(eye);
            db.total_cmp(&da)
        });
    }

    /// Keep the `max` lights closest to `eye`
    pub fn limit_lights(&mut self, eye: Vec3, max: usize) {
        if self.point_lights.len() > max {
            self.point_lights.sort_by(|a, b| {
                a.position
                    .distance_squared(eye)
                    .total_cmp(&b.position.distance_squared(eye))
            });
            self.point_lights.truncate(max);
        }
    }

    /// Opaque items followed by transparent items
    pub fn instances(&self) -> impl Iterator<Item = &DrawItem> {
        self.opaque.iter().chain(self.transparent.iter())
    }

    /// Batches over [`DrawList::instances`]; the second vector covers the transparent tail
    pub fn batches(&self) -> (Vec<Batch>, Vec<Batch>) {
        let opaque = batch_runs(&self.opaque, 0);
        let transparent = batch_runs(&self.transparent, self.opaque.len() as u32);
        (opaque, transparent)
    }

    pub fn instance_count(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }
}

fn batch_runs(items: &[DrawItem], base: u32) -> Vec<Batch> {
    let mut batches: Vec<Batch> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if let Some(last) = batches.last_mut() {
            if Rc::ptr_eq(&last.geometry, &item.geometry) && Rc::ptr_eq(&last.material, &item.material) {
                last.instance_count += 1;
                continue;
            }
        }
        batches.push(Batch {
            geometry: item.geometry.clone(),
            material: item.material.clone(),
            first_instance: base + i as u32,
            instance_count: 1,
        });
    }
    batches
}
