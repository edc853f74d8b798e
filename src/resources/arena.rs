//! Headless arena.
//!
//! The [`Arena`] stands in for the simulated world the choreography talks to.
//! It holds one slot per agent and a ball. Agents appear one by one according
//! to a spawn schedule, and whatever state an intent requests is stored as-is.
//! There is no physics: bodies stay exactly where the last write put them.
//!
//! # Related
//!
//! - [`crate::systems::arena`] – spawn scheduling and intent application
//! - [`crate::systems::snapshot`] – builds the per-tick [`TickSnapshot`]

use bevy_ecs::prelude::Resource;
use glam::Vec3;
use log::warn;

use crate::events::stateintent::{DesiredState, StateIntent};
use crate::resources::snapshot::{AgentSnapshot, PhysicsState, TickSnapshot};
use crate::resources::worldtime::WorldTime;

/// Resting height of an agent on the floor.
pub const BASE_AGENT_Z: f32 = 17.0;

/// One agent slot.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSlot {
    pub index: usize,
    /// Time at which the agent appears.
    pub spawn_at: f32,
    pub spawned: bool,
    pub physics: PhysicsState,
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Arena {
    pub agents: Vec<AgentSlot>,
    pub ball: PhysicsState,
}

impl Arena {
    /// Arena whose `slots` agents spawn `interval` seconds apart, each delayed
    /// by up to `jitter` extra seconds drawn from a generator seeded with
    /// `seed`.
    pub fn new(slots: usize, interval: f32, jitter: f32, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let agents = (0..slots)
            .map(|index| AgentSlot {
                index,
                spawn_at: index as f32 * interval.max(0.0) + rng.f32() * jitter.max(0.0),
                spawned: false,
                physics: PhysicsState {
                    position: Vec3::new(index as f32 * 150.0 - 3600.0, -4000.0, BASE_AGENT_Z),
                    ..Default::default()
                },
            })
            .collect();
        Self {
            agents,
            ball: PhysicsState {
                position: Vec3::new(0.0, 0.0, 93.0),
                ..Default::default()
            },
        }
    }

    /// Arena where every agent is already present.
    pub fn spawned(slots: usize) -> Self {
        let mut arena = Self::new(slots, 0.0, 0.0, 0);
        arena.spawn_due(0.0);
        arena
    }

    pub fn num_spawned(&self) -> usize {
        self.agents.iter().filter(|a| a.spawned).count()
    }

    /// Spawn every agent whose time has come. Returns how many appeared.
    pub fn spawn_due(&mut self, elapsed: f32) -> usize {
        let mut count = 0;
        for agent in self.agents.iter_mut().filter(|a| !a.spawned) {
            if elapsed >= agent.spawn_at {
                agent.spawned = true;
                count += 1;
            }
        }
        count
    }

    /// Write an intent into the arena. Returns how many agent entries
    /// referred to unknown slots and were skipped.
    pub fn apply(&mut self, intent: &StateIntent) -> usize {
        let mut skipped = 0;
        for (&index, desired) in &intent.agents {
            match self.agents.iter_mut().find(|a| a.index == index) {
                Some(agent) => merge(&mut agent.physics, desired),
                None => {
                    warn!("State intent for unknown agent slot {}", index);
                    skipped += 1;
                }
            }
        }
        if let Some(ball) = &intent.ball {
            merge(&mut self.ball, ball);
        }
        skipped
    }

    pub fn snapshot(&self, time: &WorldTime) -> TickSnapshot {
        TickSnapshot {
            time: time.elapsed,
            frame: time.frame_count,
            agents: self
                .agents
                .iter()
                .map(|a| AgentSnapshot {
                    index: a.index,
                    spawned: a.spawned,
                    physics: a.physics,
                })
                .collect(),
            ball: self.ball,
        }
    }
}

fn merge(state: &mut PhysicsState, desired: &DesiredState) {
    if let Some(position) = desired.position {
        state.position = position;
    }
    if let Some(velocity) = desired.velocity {
        state.velocity = velocity;
    }
    if let Some(rotation) = desired.rotation {
        state.rotation = rotation;
    }
    if let Some(angular_velocity) = desired.angular_velocity {
        state.angular_velocity = angular_velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_schedule_is_ordered_and_seeded() {
        let a = Arena::new(5, 0.1, 0.05, 42);
        let b = Arena::new(5, 0.1, 0.05, 42);
        assert_eq!(a, b);
        for agent in &a.agents {
            let base = agent.index as f32 * 0.1;
            assert!(agent.spawn_at >= base && agent.spawn_at <= base + 0.05);
        }
    }

    #[test]
    fn test_spawn_due_counts_new_agents() {
        let mut arena = Arena::new(4, 1.0, 0.0, 0);
        assert_eq!(arena.spawn_due(0.0), 1);
        assert_eq!(arena.spawn_due(2.5), 2);
        assert_eq!(arena.spawn_due(2.5), 0);
        assert_eq!(arena.num_spawned(), 3);
    }

    #[test]
    fn test_apply_merges_only_given_fields() {
        let mut arena = Arena::spawned(2);
        let before = arena.agents[1].physics;
        let mut intent = StateIntent::new();
        intent.set_agent(1, DesiredState::default().with_velocity(Vec3::Z * 400.0));
        assert_eq!(arena.apply(&intent), 0);
        assert_eq!(arena.agents[1].physics.position, before.position);
        assert_eq!(arena.agents[1].physics.velocity, Vec3::new(0.0, 0.0, 400.0));
    }

    #[test]
    fn test_apply_skips_unknown_slots() {
        let mut arena = Arena::spawned(2);
        let mut intent = StateIntent::new();
        intent.set_agent(9, DesiredState::at(Vec3::ONE));
        assert_eq!(arena.apply(&intent), 1);
    }

    #[test]
    fn test_snapshot_copies_time_and_agents() {
        let arena = Arena::spawned(3);
        let time = WorldTime {
            elapsed: 2.5,
            frame_count: 150,
            ..Default::default()
        };
        let snap = arena.snapshot(&time);
        assert_eq!(snap.time, 2.5);
        assert_eq!(snap.frame, 150);
        assert_eq!(snap.num_spawned(), 3);
    }
}
