//! World-state write intents.
//!
//! Steps never touch the world directly. They describe the state they want
//! agents (and optionally the ball) to be in this tick as a [`StateIntent`]
//! and queue it on the [`TickContext`](crate::choreography::context::TickContext).
//! The choreography driver forwards every intent as a bevy [`Message`], and
//! [`apply_state_intents`](crate::systems::arena::apply_state_intents) writes
//! them into the [`Arena`](crate::resources::arena::Arena).
//!
//! Intents are not validated or merged: they are passed through in emission
//! order, so a later intent for the same slot wins.

use bevy_ecs::message::Message;
use glam::Vec3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::resources::snapshot::Rotator;

/// Requested state for one body. `None` fields leave the world value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DesiredState {
    pub position: Option<Vec3>,
    pub velocity: Option<Vec3>,
    pub rotation: Option<Rotator>,
    pub angular_velocity: Option<Vec3>,
}

impl DesiredState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = Some(velocity);
        self
    }
    pub fn with_rotation(mut self, rotation: Rotator) -> Self {
        self.rotation = Some(rotation);
        self
    }
    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = Some(angular_velocity);
        self
    }
}

/// A single state-injection request, keyed by agent slot.
#[derive(Message, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateIntent {
    pub agents: FxHashMap<usize, DesiredState>,
    pub ball: Option<DesiredState>,
}

impl StateIntent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a state for the agent in `index`.
    pub fn set_agent(&mut self, index: usize, state: DesiredState) {
        self.agents.insert(index, state);
    }

    pub fn with_ball(mut self, state: DesiredState) -> Self {
        self.ball = Some(state);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty() && self.ball.is_none()
    }
}

/// Intents emitted during one tick, in emission order.
#[derive(Debug, Default)]
pub struct IntentBuffer {
    intents: Vec<StateIntent>,
}

impl IntentBuffer {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn push(&mut self, intent: StateIntent) {
        self.intents.push(intent);
    }
    pub fn len(&self) -> usize {
        self.intents.len()
    }
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &StateIntent> {
        self.intents.iter()
    }
    /// Take every queued intent, leaving the buffer empty.
    pub fn drain(&mut self) -> std::vec::Drain<'_, StateIntent> {
        self.intents.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desired_state_builder_chaining() {
        let s = DesiredState::at(Vec3::new(1.0, 2.0, 3.0))
            .with_velocity(Vec3::Z * 400.0)
            .with_rotation(Rotator::new(1.0, 0.0, 0.0));
        assert_eq!(s.position, Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(s.velocity, Some(Vec3::new(0.0, 0.0, 400.0)));
        assert!(s.angular_velocity.is_none());
    }

    #[test]
    fn test_set_agent_last_write_wins() {
        let mut intent = StateIntent::new();
        intent.set_agent(2, DesiredState::at(Vec3::X));
        intent.set_agent(2, DesiredState::at(Vec3::Y));
        assert_eq!(intent.agents.len(), 1);
        assert_eq!(intent.agents[&2].position, Some(Vec3::Y));
    }

    #[test]
    fn test_buffer_drain_preserves_order() {
        let mut buf = IntentBuffer::new();
        let mut a = StateIntent::new();
        a.set_agent(0, DesiredState::default());
        buf.push(a);
        buf.push(StateIntent::new().with_ball(DesiredState::at(Vec3::ZERO)));
        let drained: Vec<_> = buf.drain().collect();
        assert_eq!(drained.len(), 2);
        assert!(drained[0].ball.is_none());
        assert!(drained[1].ball.is_some());
        assert!(buf.is_empty());
    }
}
