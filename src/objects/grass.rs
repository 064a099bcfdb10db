//! Ground plane with alpha-cut grass

use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use nightstreet_core::{ColorSpace, Material, MaterialMaps, Node, NodeKey, SceneGraph, TextureLoader, Transform};

use super::measurements::GRASS;
use super::Tiling;

const TILING: Tiling = Tiling::repeat(6.0, 6.0);

/// Build the grass plane, lying flat just below street level
pub fn build_grass(graph: &mut SceneGraph, loader: &dyn TextureLoader) -> NodeKey {
    let color = TILING
        .apply(loader.load("grass/color.webp"))
        .with_color_space(ColorSpace::Srgb);
    let ao = TILING.apply(loader.load("grass/ao.webp"));
    let roughness = TILING.apply(loader.load("grass/roughness.webp"));
    let normal = TILING.apply(loader.load("grass/normal.webp"));
    // The alpha map covers the whole plane once
    let alpha = loader.load("grass/alpha.webp");

    let maps = MaterialMaps {
        color: Some(Rc::new(color)),
        ao: Some(Rc::new(ao)),
        roughness: Some(Rc::new(roughness)),
        metalness: None,
        normal: Some(Rc::new(normal)),
        alpha: Some(Rc::new(alpha)),
    };
    let material = Rc::new(Material::textured(maps).with_transparency(true));

    graph.add(
        Node::mesh(Rc::new(GRASS.geometry()), material)
            .with_name("grass")
            .with_transform(Transform::from_xyz(0.0, -0.001, 2.0).with_rotation_euler(-FRAC_PI_2, 0.0, 0.0)),
    )
}
