//! GPU-compatible data types for the mesh pipeline
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4};
use nightstreet_core::{MaterialMaps, MaterialParams, TextureSettings};

/// Lights beyond this count are dropped, nearest kept
pub const MAX_POINT_LIGHTS: usize = 8;

/// Number of texture slots per material
pub const MATERIAL_MAP_SLOTS: usize = 6;

/// Bit in [`MaterialUniforms::map_flags`] set when a normal map is bound
pub const FLAG_NORMAL_MAP: u32 = 1 << 4;

/// Per-instance transform
/// Layout: 112 bytes (model matrix + normal matrix as three vec4 columns)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
}

impl InstanceRaw {
    pub fn from_world(world: &Mat4) -> Self {
        let n = Mat3::from_mat4(*world).inverse().transpose();
        Self {
            model: world.to_cols_array_2d(),
            normal: [
                n.x_axis.extend(0.0).to_array(),
                n.y_axis.extend(0.0).to_array(),
                n.z_axis.extend(0.0).to_array(),
            ],
        }
    }
}

/// A point light as seen by the shader
/// Layout: 48 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct PointLightRaw {
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub distance: f32,
    pub decay: f32,
    pub _padding: [f32; 3],
}

/// Per-frame scene uniforms
/// Layout: 560 bytes total (must match mesh.wgsl SceneUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub eye: [f32; 3],
    pub light_count: u32,
    /// Summed ambient radiance
    pub ambient: [f32; 3],
    pub fog_density: f32,
    pub fog_color: [f32; 3],
    /// 1 when fog is applied
    pub fog_enabled: u32,
    pub point_lights: [PointLightRaw; MAX_POINT_LIGHTS],
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0; 3],
            light_count: 0,
            ambient: [0.0; 3],
            fog_density: 0.0,
            fog_color: [0.0; 3],
            fog_enabled: 0,
            point_lights: [PointLightRaw::default(); MAX_POINT_LIGHTS],
        }
    }
}

/// Per-material uniforms
/// Layout: 240 bytes (must match mesh.wgsl MaterialUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MaterialUniforms {
    pub color: [f32; 3],
    pub opacity: f32,
    /// Emissive color premultiplied by intensity
    pub emissive: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    /// Bit `i` set when slot `i` has a texture
    pub map_flags: u32,
    pub _padding: [f32; 2],
    /// Two rows per slot, each `[a, b, c, 0]`
    pub uv_transforms: [[f32; 4]; MATERIAL_MAP_SLOTS * 2],
}

impl MaterialUniforms {
    pub fn new(params: &MaterialParams, maps: &MaterialMaps) -> Self {
        let mut map_flags = 0;
        let mut uv_transforms = [[0.0; 4]; MATERIAL_MAP_SLOTS * 2];
        for (slot, map) in maps.slots().iter().enumerate() {
            let settings = match map {
                Some(texture) => {
                    map_flags |= 1 << slot;
                    texture.settings
                }
                None => TextureSettings::default(),
            };
            let [r0, r1] = settings.uv_transform();
            uv_transforms[slot * 2] = [r0[0], r0[1], r0[2], 0.0];
            uv_transforms[slot * 2 + 1] = [r1[0], r1[1], r1[2], 0.0];
        }

        Self {
            color: params.color.to_array(),
            opacity: params.opacity,
            emissive: params.emissive.scaled(params.emissive_intensity).to_array(),
            roughness: params.roughness,
            metalness: params.metalness,
            map_flags,
            _padding: [0.0; 2],
            uv_transforms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;
    use std::rc::Rc;

    use glam::{Quat, Vec3};
    use nightstreet_core::{Color, Texture};

    #[test]
    fn test_instance_raw_size() {
        assert_eq!(size_of::<InstanceRaw>(), 112);
    }

    #[test]
    fn test_point_light_raw_size() {
        assert_eq!(size_of::<PointLightRaw>(), 48);
    }

    #[test]
    fn test_scene_uniforms_size() {
        assert_eq!(size_of::<SceneUniforms>(), 560);
    }

    #[test]
    fn test_material_uniforms_size() {
        assert_eq!(size_of::<MaterialUniforms>(), 240);
    }

    #[test]
    fn test_normal_matrix_undoes_nonuniform_scale() {
        let world = Mat4::from_scale_rotation_translation(
            Vec3::new(1.02, 1.0, 1.02),
            Quat::IDENTITY,
            Vec3::new(0.5, 0.3, 0.17),
        );
        let raw = InstanceRaw::from_world(&world);
        assert!((raw.normal[0][0] - 1.0 / 1.02).abs() < 1e-5);
        assert!((raw.normal[1][1] - 1.0).abs() < 1e-5);
        assert_eq!(raw.model[3], [0.5, 0.3, 0.17, 1.0]);
    }

    #[test]
    fn test_material_uniforms_flags_and_emissive() {
        let params = MaterialParams::default().with_emissive(Color::linear(1.0, 1.0, 0.0), 2.0);
        let maps = MaterialMaps {
            color: Some(Rc::new(Texture::solid([255; 4]).with_repeat(4.0, 4.0))),
            normal: Some(Rc::new(Texture::solid([127, 127, 255, 255]))),
            ..Default::default()
        };
        let uniforms = MaterialUniforms::new(&params, &maps);

        assert_eq!(uniforms.map_flags, 1 | FLAG_NORMAL_MAP);
        assert_eq!(uniforms.emissive, [2.0, 2.0, 0.0]);
        assert_eq!(uniforms.uv_transforms[0], [4.0, 0.0, 0.0, 0.0]);
        assert_eq!(uniforms.uv_transforms[1], [0.0, 4.0, 0.0, 0.0]);
        // Absent slots get the identity transform
        assert_eq!(uniforms.uv_transforms[2], [1.0, 0.0, 0.0, 0.0]);
    }
}
