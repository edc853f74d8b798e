//! Per-tick world snapshot.
//!
//! [`TickSnapshot`] is the read-only view of the arena that every step gets
//! on every tick. It is rebuilt from the [`Arena`](super::arena::Arena) by
//! [`capture_snapshot_system`](crate::systems::snapshot::capture_snapshot_system)
//! before the choreography runs.

use bevy_ecs::prelude::Resource;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Orientation in radians, pitch/yaw/roll order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }
}

/// Full physical state of one body as reported by the world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicsState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Rotator,
    pub angular_velocity: Vec3,
}

/// One agent slot as seen in a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshot {
    /// Stable roster slot.
    pub index: usize,
    /// Whether the agent is present in the arena yet.
    pub spawned: bool,
    pub physics: PhysicsState,
}

/// Read-only world state for a single tick.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct TickSnapshot {
    /// Elapsed simulation time in seconds.
    pub time: f32,
    /// Number of ticks since the session began.
    pub frame: u64,
    pub agents: Vec<AgentSnapshot>,
    pub ball: PhysicsState,
}

impl TickSnapshot {
    /// Snapshot at `time` with no agents, handy for driving steps directly.
    pub fn at(time: f32) -> Self {
        Self {
            time,
            ..Default::default()
        }
    }

    /// Count of agents that have spawned.
    pub fn num_spawned(&self) -> usize {
        self.agents.iter().filter(|a| a.spawned).count()
    }

    pub fn agent(&self, index: usize) -> Option<&AgentSnapshot> {
        self.agents.iter().find(|a| a.index == index)
    }
}
