//! Lights, fog, and the scene environment

use crate::color::Color;

/// Omnidirectional light with finite range
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    /// Cutoff distance; 0 means unlimited
    pub distance: f32,
    /// Falloff exponent
    pub decay: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            distance: 0.0,
            decay: 2.0,
        }
    }
}

impl PointLight {
    /// Attenuation factor at distance `d` from the light
    pub fn attenuation(&self, d: f32) -> f32 {
        point_light_attenuation(d, self.distance, self.decay)
    }
}

/// Inverse-power falloff, smoothly windowed to zero at `cutoff`
pub fn point_light_attenuation(d: f32, cutoff: f32, decay: f32) -> f32 {
    let falloff = 1.0 / d.powf(decay).max(0.01);
    if cutoff > 0.0 {
        let window = (1.0 - (d / cutoff).powi(4)).clamp(0.0, 1.0);
        falloff * window * window
    } else {
        falloff
    }
}

/// Uniform light reaching every surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

/// Exponential-squared distance fog
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogExp2 {
    pub color: Color,
    pub density: f32,
}

impl FogExp2 {
    /// Blend factor toward the fog color at view depth `depth`
    pub fn factor(&self, depth: f32) -> f32 {
        1.0 - (-(self.density * self.density) * depth * depth).exp()
    }
}

/// Scene-wide render settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    pub background: Color,
    pub fog: Option<FogExp2>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            fog: None,
        }
    }
}
