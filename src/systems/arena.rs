//! Arena systems.
//!
//! - [`arena_spawn_system`] brings agents in as their spawn time passes.
//! - [`apply_state_intents`] writes every [`StateIntent`] message of the tick
//!   into the [`Arena`].
//! - [`update_state_intent_messages`] advances the message queue; run it
//!   last so the next tick starts from a clean buffer.

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::events::stateintent::StateIntent;
use crate::resources::arena::Arena;
use crate::resources::worldtime::WorldTime;

/// Spawn every agent whose time has come.
pub fn arena_spawn_system(mut arena: ResMut<Arena>, time: Res<WorldTime>) {
    let appeared = arena.spawn_due(time.elapsed);
    if appeared > 0 {
        info!(
            "{} agents spawned at t={:.3} ({}/{})",
            appeared,
            time.elapsed,
            arena.num_spawned(),
            arena.agents.len()
        );
    }
}

/// Consume this tick's state intents.
pub fn apply_state_intents(mut reader: MessageReader<StateIntent>, mut arena: ResMut<Arena>) {
    for intent in reader.read() {
        let skipped = arena.apply(intent);
        if skipped > 0 {
            debug!("State intent skipped {} unknown slots", skipped);
        }
    }
}

/// Advance the [`Messages<StateIntent>`] double buffer.
pub fn update_state_intent_messages(mut messages: ResMut<Messages<StateIntent>>) {
    messages.update();
}
