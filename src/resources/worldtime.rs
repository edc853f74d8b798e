//! Simulation clock.
//!
//! [`WorldTime`] is advanced once per tick by
//! [`update_world_time`](crate::systems::time::update_world_time). Its
//! `elapsed` value becomes the snapshot time every step sees.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct WorldTime {
    /// Seconds since the session began, scaled by `time_scale`.
    pub elapsed: f32,
    /// Scaled length of the last tick.
    pub delta: f32,
    pub time_scale: f32,
    /// Ticks since the session began.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
