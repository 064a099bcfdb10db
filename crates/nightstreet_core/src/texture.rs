//! Textures and the texture-loading service
//!
//! A [`Texture`] is a description of an image plus its sampling settings.
//! Pixels are read lazily: builders only record the path, and the renderer
//! calls [`Texture::decode`] when it first uploads the texture.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use glam::Vec2;

use crate::resource::ResourceId;
use crate::texture_error::TextureError;

/// Shared handle to a texture
pub type TextureRef = Rc<Texture>;

/// How texel values are interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorSpace {
    /// Raw data (normal, roughness, ambient occlusion, alpha maps)
    #[default]
    Linear,
    /// Perceptual color (albedo maps)
    Srgb,
}

/// Addressing mode outside the [0, 1] range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Wrap {
    #[default]
    ClampToEdge,
    Repeat,
}

/// Sampling settings applied on top of the mesh UVs
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureSettings {
    pub repeat: Vec2,
    pub offset: Vec2,
    /// Rotation in radians around `center`
    pub rotation: f32,
    pub center: Vec2,
    pub wrap_s: Wrap,
    pub wrap_t: Wrap,
    pub color_space: ColorSpace,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            repeat: Vec2::ONE,
            offset: Vec2::ZERO,
            rotation: 0.0,
            center: Vec2::ZERO,
            wrap_s: Wrap::ClampToEdge,
            wrap_t: Wrap::ClampToEdge,
            color_space: ColorSpace::Linear,
        }
    }
}

impl TextureSettings {
    /// Affine UV transform as two rows `[a, b, c]`, `[d, e, f]`
    ///
    /// `uv' = (a·u + b·v + c, d·u + e·v + f)`: scale by `repeat`, rotate
    /// around `center`, then shift by `offset`.
    pub fn uv_transform(&self) -> [[f32; 3]; 2] {
        let (s, c) = self.rotation.sin_cos();
        let Vec2 { x: sx, y: sy } = self.repeat;
        let Vec2 { x: cx, y: cy } = self.center;
        let Vec2 { x: tx, y: ty } = self.offset;
        [
            [sx * c, sx * s, -sx * (c * cx + s * cy) + cx + tx],
            [-sy * s, sy * c, -sy * (-s * cx + c * cy) + cy + ty],
        ]
    }
}

/// Where a texture's pixels come from
#[derive(Clone, Debug, PartialEq)]
pub enum TextureSource {
    File(PathBuf),
    /// Single RGBA texel
    Solid([u8; 4]),
}

/// Decoded RGBA8 pixels
#[derive(Clone, Debug)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// An image with sampling settings
#[derive(Debug)]
pub struct Texture {
    id: ResourceId,
    source: TextureSource,
    pub settings: TextureSettings,
}

impl Texture {
    pub fn new(source: TextureSource) -> Self {
        Self {
            id: ResourceId::next(),
            source,
            settings: TextureSettings::default(),
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(TextureSource::File(path.into()))
    }

    pub fn solid(rgba: [u8; 4]) -> Self {
        Self::new(TextureSource::Solid(rgba))
    }

    /// Builder: set how many times the image tiles across the surface
    pub fn with_repeat(mut self, x: f32, y: f32) -> Self {
        self.settings.repeat = Vec2::new(x, y);
        self
    }

    /// Builder: set both wrap modes
    pub fn with_wrap(mut self, wrap: Wrap) -> Self {
        self.settings.wrap_s = wrap;
        self.settings.wrap_t = wrap;
        self
    }

    /// Builder: tile `x × y` times with repeat wrapping
    pub fn tiled(self, x: f32, y: f32) -> Self {
        self.with_repeat(x, y).with_wrap(Wrap::Repeat)
    }

    /// Builder: rotate UVs (radians)
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.settings.rotation = rotation;
        self
    }

    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.settings.color_space = color_space;
        self
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn source(&self) -> &TextureSource {
        &self.source
    }

    /// Read and decode the pixels
    pub fn decode(&self) -> Result<TextureImage, TextureError> {
        match &self.source {
            TextureSource::Solid(rgba) => Ok(TextureImage {
                width: 1,
                height: 1,
                pixels: rgba.to_vec(),
            }),
            TextureSource::File(path) => {
                let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
                    path: path.clone(),
                    source,
                })?;
                let image = image::load_from_memory(&bytes).map_err(|source| TextureError::Decode {
                    path: path.clone(),
                    source,
                })?;
                let rgba = image.to_rgba8();
                Ok(TextureImage {
                    width: rgba.width(),
                    height: rgba.height(),
                    pixels: rgba.into_raw(),
                })
            }
        }
    }
}

/// Service that turns asset paths into textures
///
/// Shared by all object builders so that asset resolution lives in one place.
pub trait TextureLoader {
    fn load(&self, path: &str) -> Texture;
}

/// Resolves texture paths relative to an assets directory
#[derive(Clone, Debug)]
pub struct AssetTextureLoader {
    root: PathBuf,
}

impl AssetTextureLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TextureLoader for AssetTextureLoader {
    fn load(&self, path: &str) -> Texture {
        log::debug!("Queued texture {}", path);
        Texture::from_file(self.root.join(path))
    }
}
