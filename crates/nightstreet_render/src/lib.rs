//! Night street rendering library
//!
//! This crate provides the wgpu-based forward renderer for the scene graph
//! defined in `nightstreet_core`.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::PerspectiveCamera`] - Look-at camera driven by the orbit controller
//! - [`pipeline::MeshPipeline`] - Opaque and blended standard-material passes
//! - [`renderable::DrawList`] - Flattens the visible scene into instances and lights
//! - [`renderer::SceneRenderer`] - Uploads resources on demand and records frames

pub mod camera;
pub mod context;
pub mod gpu_cache;
pub mod gpu_resources;
pub mod pipeline;
pub mod renderable;
pub mod renderer;

pub use camera::PerspectiveCamera;
pub use context::{ContextError, RenderContext};
pub use renderable::{DrawItem, DrawList, LightInstance};
pub use renderer::{FrameStats, SceneRenderer};
