//! Texture error types
//!
//! Errors raised while reading or decoding texture images.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for texture decoding
#[derive(Debug)]
pub enum TextureError {
    /// IO error (file not found, permission denied, etc.)
    Io { path: PathBuf, source: io::Error },
    /// The file was read but is not a decodable image
    Decode { path: PathBuf, source: image::ImageError },
}

impl TextureError {
    /// Path of the texture that failed
    pub fn path(&self) -> &PathBuf {
        match self {
            TextureError::Io { path, .. } | TextureError::Decode { path, .. } => path,
        }
    }
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Io { path, source } => {
                write!(f, "Texture IO error for {}: {}", path.display(), source)
            }
            TextureError::Decode { path, source } => {
                write!(f, "Texture decode error for {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Io { source, .. } => Some(source),
            TextureError::Decode { source, .. } => Some(source),
        }
    }
}
