//! Animation system
//!
//! Keeps the wall-clock timer and advances the fireflies each frame.

use std::time::Instant;

use crate::scene::NightStreet;

/// Drives time-based animation of the scene
pub struct AnimationSystem {
    start: Instant,
    last_frame: Instant,
}

impl AnimationSystem {
    /// Create a new animation system; the clock starts now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
        }
    }

    /// Run one animation frame
    ///
    /// Returns the frame delta in seconds.
    pub fn update(&mut self, scene: &mut NightStreet) -> f32 {
        self.update_at(scene, Instant::now())
    }

    /// Run one animation frame at a given instant
    pub fn update_at(&mut self, scene: &mut NightStreet, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        scene.animate(self.elapsed_at(now));
        dt
    }

    /// Seconds since the system was created
    pub fn elapsed_at(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.start).as_secs_f32()
    }
}

impl Default for AnimationSystem {
    fn default() -> Self {
        Self::new()
    }
}
