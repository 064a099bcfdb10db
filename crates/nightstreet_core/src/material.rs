//! Standard surface material
//!
//! A metallic-roughness material with optional texture maps. Materials are
//! shared between meshes through [`MaterialRef`]; their scalar parameters are
//! interior-mutable so a tweak (e.g. lamp glow intensity) reaches every mesh
//! using the material at once.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::color::Color;
use crate::resource::ResourceId;
use crate::texture::TextureRef;

/// Shared handle to a material
pub type MaterialRef = Rc<Material>;

/// Scalar material parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialParams {
    /// Base color, multiplied with the color map
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            emissive: Color::BLACK,
            emissive_intensity: 1.0,
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
        }
    }
}

impl MaterialParams {
    /// Builder: set the emissive color and intensity
    pub fn with_emissive(mut self, emissive: Color, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }
}

/// Optional texture maps
///
/// Channel conventions: ambient occlusion reads red, roughness reads green,
/// metalness reads blue, alpha reads green.
#[derive(Clone, Debug, Default)]
pub struct MaterialMaps {
    pub color: Option<TextureRef>,
    pub ao: Option<TextureRef>,
    pub roughness: Option<TextureRef>,
    pub metalness: Option<TextureRef>,
    pub normal: Option<TextureRef>,
    pub alpha: Option<TextureRef>,
}

impl MaterialMaps {
    /// Color + packed AO/roughness/metalness + normal
    pub fn color_arm_normal(color: TextureRef, arm: TextureRef, normal: TextureRef) -> Self {
        Self {
            color: Some(color),
            ao: Some(arm.clone()),
            roughness: Some(arm.clone()),
            metalness: Some(arm),
            normal: Some(normal),
            alpha: None,
        }
    }

    /// All maps in binding order, `None` for absent ones
    pub fn slots(&self) -> [Option<&TextureRef>; 6] {
        [
            self.color.as_ref(),
            self.ao.as_ref(),
            self.roughness.as_ref(),
            self.metalness.as_ref(),
            self.normal.as_ref(),
            self.alpha.as_ref(),
        ]
    }
}

/// A standard material
#[derive(Debug)]
pub struct Material {
    id: ResourceId,
    maps: MaterialMaps,
    transparent: bool,
    params: RefCell<MaterialParams>,
    revision: Cell<u64>,
}

impl Material {
    pub fn new(params: MaterialParams) -> Self {
        Self {
            id: ResourceId::next(),
            maps: MaterialMaps::default(),
            transparent: false,
            params: RefCell::new(params),
            revision: Cell::new(0),
        }
    }

    /// Textured material with default parameters
    pub fn textured(maps: MaterialMaps) -> Self {
        Self::new(MaterialParams::default()).with_maps(maps)
    }

    pub fn with_maps(mut self, maps: MaterialMaps) -> Self {
        self.maps = maps;
        self
    }

    /// Builder: render in the blended pass
    pub fn with_transparency(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn maps(&self) -> &MaterialMaps {
        &self.maps
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// Snapshot of the current parameters
    pub fn params(&self) -> MaterialParams {
        *self.params.borrow()
    }

    /// Mutate parameters and bump the revision
    pub fn update(&self, f: impl FnOnce(&mut MaterialParams)) {
        f(&mut self.params.borrow_mut());
        self.revision.set(self.revision.get() + 1);
    }

    /// Incremented on every [`Material::update`]
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }
}
