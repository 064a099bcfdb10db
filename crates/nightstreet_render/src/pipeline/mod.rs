//! Rendering pipeline components

pub mod mesh_pipeline;
pub mod types;

pub use mesh_pipeline::{DrawCall, MeshPipeline, DEPTH_FORMAT};
pub use types::{
    InstanceRaw, MaterialUniforms, PointLightRaw, SceneUniforms, FLAG_NORMAL_MAP, MATERIAL_MAP_SLOTS,
    MAX_POINT_LIGHTS,
};
