//! Application systems
//!
//! Window, rendering, and animation are kept out of main.rs so they can be
//! tested and swapped independently.

mod animation;
mod render;
mod window;

pub use animation::AnimationSystem;
pub use render::{RenderError, RenderSystem};
pub use window::{WindowError, WindowSystem};
