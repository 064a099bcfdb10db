//! Orbit camera input handling
//!
//! This crate turns mouse drags and wheel input into damped orbit, pan, and
//! dolly motion around a target point.

mod orbit_controller;

pub use orbit_controller::{OrbitControl, OrbitController};
