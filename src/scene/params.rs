//! Tunable scene parameters
//!
//! Colors are stored as `0xRRGGBB` sRGB integers so they read naturally in
//! TOML and environment overrides. The `apply_*` functions push a parameter
//! block into the live scene.

use nightstreet_core::{Color, FogExp2, MaterialRef, NodeKey, SceneGraph};
use serde::{Deserialize, Serialize};

/// Every tunable value of the night street scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    pub background: BackgroundParams,
    pub fog: FogParams,
    pub lamps: LampParams,
    pub street_light: StreetLightParams,
    pub ambient: AmbientParams,
    pub fireflies: FireflyParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundParams {
    pub color: u32,
}

impl Default for BackgroundParams {
    fn default() -> Self {
        Self { color: 0x04050e }
    }
}

/// Exponential-squared fog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogParams {
    pub color: u32,
    pub density: f32,
}

impl Default for FogParams {
    fn default() -> Self {
        Self {
            color: 0x5761ea,
            density: 0.027,
        }
    }
}

/// Glow of the shared lamp material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LampParams {
    pub color: u32,
    pub intensity: f32,
}

impl Default for LampParams {
    fn default() -> Self {
        Self {
            color: 0xadb3ff,
            intensity: 2.0,
        }
    }
}

/// Point light under every street lamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreetLightParams {
    pub color: u32,
    pub intensity: f32,
    pub distance: f32,
    pub decay: f32,
}

impl Default for StreetLightParams {
    fn default() -> Self {
        Self {
            color: 0x347cef,
            intensity: 3.1,
            distance: 3.5,
            decay: 1.5,
        }
    }
}

impl StreetLightParams {
    pub fn light(&self) -> nightstreet_core::PointLight {
        nightstreet_core::PointLight {
            color: Color::from_hex(self.color),
            intensity: self.intensity,
            distance: self.distance,
            decay: self.decay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientParams {
    pub color: u32,
    pub intensity: f32,
}

impl Default for AmbientParams {
    fn default() -> Self {
        Self {
            color: 0x1f4bff,
            intensity: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireflyParams {
    pub amount: usize,
    /// Fixed RNG seed; a random swarm each run when unset
    pub seed: Option<u64>,
}

impl Default for FireflyParams {
    fn default() -> Self {
        Self {
            amount: 40,
            seed: None,
        }
    }
}

pub fn apply_background(graph: &mut SceneGraph, params: &BackgroundParams) {
    graph.environment.background = Color::from_hex(params.color);
}

pub fn apply_fog(graph: &mut SceneGraph, params: &FogParams) {
    graph.environment.fog = Some(FogExp2 {
        color: Color::from_hex(params.color),
        density: params.density,
    });
}

/// Update the lamp glow; every lamp shares `material`
pub fn apply_lamps(material: &MaterialRef, params: &LampParams) {
    material.update(|m| {
        m.emissive = Color::from_hex(params.color);
        m.emissive_intensity = params.intensity;
    });
}

/// Copy the street light settings into each listed point light
pub fn apply_street_light(graph: &mut SceneGraph, lights: &[NodeKey], params: &StreetLightParams) {
    let light = params.light();
    for &key in lights {
        match graph.get_mut(key).and_then(|n| n.as_point_light_mut()) {
            Some(target) => *target = light,
            None => log::warn!("apply_street_light: {:?} is not a point light", key),
        }
    }
}

pub fn apply_ambient(graph: &mut SceneGraph, ambient: NodeKey, params: &AmbientParams) {
    if let Some(light) = graph.get_mut(ambient).and_then(|n| n.as_ambient_light_mut()) {
        light.color = Color::from_hex(params.color);
        light.intensity = params.intensity;
    }
}
