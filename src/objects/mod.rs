//! Procedural scene objects
//!
//! Each builder inserts a fully positioned subtree into the scene graph and
//! returns its detached root. Part offsets are chained along one axis:
//! a part sits on top of (or beside) the previous one at
//! `previous_center + previous_extent / 2 + extent / 2`.

pub mod chair;
pub mod fireflies;
pub mod grass;
pub mod measurements;
pub mod street;
pub mod street_light;

pub use chair::{build_chair, ChairLayout};
pub use fireflies::{Firefly, FireflySwarm};
pub use grass::build_grass;
pub use street::{build_street, StreetLayout};
pub use street_light::{build_street_light, StreetLightLayout, POINT_LIGHT_NAME};

use std::rc::Rc;

use nightstreet_core::{ColorSpace, MaterialMaps, Texture, TextureLoader};

/// Center of a part stacked directly after one centered at `previous`
pub fn stack(previous: f32, previous_extent: f32, extent: f32) -> f32 {
    previous + previous_extent / 2.0 + extent / 2.0
}

/// UV settings shared by every map of a surface
#[derive(Clone, Copy, Debug)]
pub(crate) struct Tiling {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
}

impl Tiling {
    pub const fn repeat(x: f32, y: f32) -> Self {
        Self { x, y, rotation: 0.0 }
    }

    pub const fn rotated(self, rotation: f32) -> Self {
        Self { rotation, ..self }
    }

    pub fn apply(&self, texture: Texture) -> Texture {
        texture.tiled(self.x, self.y).with_rotation(self.rotation)
    }
}

/// Load `<dir>/color.webp`, `<dir>/arm.webp` and `<dir>/normal.webp`
pub(crate) fn color_arm_normal(loader: &dyn TextureLoader, dir: &str, tiling: Tiling) -> MaterialMaps {
    let color = tiling
        .apply(loader.load(&format!("{dir}/color.webp")))
        .with_color_space(ColorSpace::Srgb);
    let arm = tiling.apply(loader.load(&format!("{dir}/arm.webp")));
    let normal = tiling.apply(loader.load(&format!("{dir}/normal.webp")));
    MaterialMaps::color_arm_normal(Rc::new(color), Rc::new(arm), Rc::new(normal))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;

    use nightstreet_core::{Texture, TextureLoader};

    /// Loader that records requested paths and returns solid textures
    #[derive(Default)]
    pub struct RecordingLoader {
        pub paths: RefCell<Vec<String>>,
    }

    impl TextureLoader for RecordingLoader {
        fn load(&self, path: &str) -> Texture {
            self.paths.borrow_mut().push(path.to_string());
            Texture::solid([255; 4])
        }
    }

    pub const EPSILON: f32 = 1e-5;

    pub mod tables {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        use crate::objects::measurements::{
            BoxSize, ChairMeasurements, CylinderSize, PlaneSize, StreetLightMeasurements, StreetMeasurements,
        };

        /// Tolerance for layouts built from arbitrary tables
        pub const TABLE_EPSILON: f32 = 1e-4;

        fn extent(rng: &mut StdRng) -> f32 {
            rng.random_range(0.01..3.0)
        }

        fn cuboid(rng: &mut StdRng) -> BoxSize {
            BoxSize::new(extent(rng), extent(rng), extent(rng))
        }

        fn cylinder(rng: &mut StdRng) -> CylinderSize {
            CylinderSize::new(extent(rng), extent(rng), extent(rng), rng.random_range(3..16))
        }

        /// Seeded tables with positive extents
        pub fn seeded<T>(make: impl Fn(&mut StdRng) -> T) -> Vec<T> {
            (0..32u64).map(|seed| make(&mut StdRng::seed_from_u64(seed))).collect()
        }

        pub fn chair(rng: &mut StdRng) -> ChairMeasurements {
            let seat = cuboid(rng);
            // Legs and posts fit under the seat
            let leg = BoxSize::new(
                seat.width * rng.random_range(0.05..0.4),
                extent(rng),
                seat.depth * rng.random_range(0.05..0.4),
            );
            let back_post = BoxSize::new(leg.width, extent(rng), leg.depth);
            ChairMeasurements {
                leg,
                seat,
                back_post,
                backrest: BoxSize::new(seat.width, back_post.height * rng.random_range(0.1..0.9), extent(rng)),
                backrest_inset: back_post.height * rng.random_range(0.0..0.1),
                seat_overhang: rng.random_range(1.0..1.2),
                backrest_scale_x: rng.random_range(1.0..1.2),
                offset_z: -extent(rng),
            }
        }

        pub fn street(rng: &mut StdRng) -> StreetMeasurements {
            let width = extent(rng) * 5.0;
            StreetMeasurements {
                asphalt: BoxSize::new(width, extent(rng), extent(rng)),
                curb: BoxSize::new(width, extent(rng), extent(rng)),
                sidewalk: BoxSize::new(width, extent(rng), extent(rng)),
                road_marking: PlaneSize {
                    width: extent(rng),
                    height: extent(rng),
                },
                marking_spacing: extent(rng),
                marking_lift: extent(rng) * 0.01,
            }
        }

        pub fn street_light(rng: &mut StdRng) -> StreetLightMeasurements {
            StreetLightMeasurements {
                foundation: cylinder(rng),
                base: cylinder(rng),
                pole: cylinder(rng),
                pole_cap: cuboid(rng),
                lamp_base: cylinder(rng),
                lamp: cylinder(rng),
                roof_base: cylinder(rng),
                roof_peak: cylinder(rng),
                finial: cuboid(rng),
                light_offset: [-extent(rng), -extent(rng), extent(rng)],
            }
        }
    }
}
