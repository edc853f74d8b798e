//! Running game-info reader.
//!
//! [`GameInfo`] accumulates what routines want to know about the match beyond
//! the raw snapshot (tick-to-tick delta, ball state, spawned count). It is
//! refreshed from the [`TickSnapshot`] once per tick by
//! [`capture_snapshot_system`](crate::systems::snapshot::capture_snapshot_system)
//! and then handed to steps through the
//! [`TickContext`](crate::choreography::context::TickContext), so the update
//! always happens before any step reads it.

use bevy_ecs::prelude::Resource;

use crate::resources::snapshot::{PhysicsState, TickSnapshot};

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct GameInfo {
    /// Simulation time of the last snapshot read.
    pub time: f32,
    /// Time since the previous snapshot (0.0 on the first read).
    pub dt: f32,
    pub frame: u64,
    pub ball: PhysicsState,
    pub num_spawned: usize,
    reads: u64,
}

impl GameInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh from the latest snapshot.
    pub fn read_snapshot(&mut self, snapshot: &TickSnapshot) {
        self.dt = if self.reads == 0 {
            0.0
        } else {
            (snapshot.time - self.time).max(0.0)
        };
        self.time = snapshot.time;
        self.frame = snapshot.frame;
        self.ball = snapshot.ball;
        self.num_spawned = snapshot.num_spawned();
        self.reads += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_first_read_has_zero_dt() {
        let mut info = GameInfo::new();
        info.read_snapshot(&TickSnapshot::at(3.0));
        assert!((info.dt - 0.0).abs() < EPSILON);
        assert!((info.time - 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_dt_tracks_snapshot_spacing() {
        let mut info = GameInfo::new();
        info.read_snapshot(&TickSnapshot::at(1.0));
        info.read_snapshot(&TickSnapshot::at(1.25));
        assert!((info.dt - 0.25).abs() < EPSILON);
    }
}
