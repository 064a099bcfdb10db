//! Night Street - a procedural 3D night scene
//!
//! A street with sidewalks, a bench, lantern street lights, grass and a swarm
//! of fireflies, viewed through an orbit camera. Scene values are tunable at
//! runtime through a keyboard-driven debug panel.

pub mod config;
pub mod input;
pub mod objects;
pub mod scene;
pub mod systems;
