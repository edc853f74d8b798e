//! swarmchoreo library.
//!
//! Exposes the step-sequencing engine, the built-in choreographies and the
//! bevy_ecs resources, systems and messages that drive them, for use by the
//! binary and in integration tests.

pub mod choreography;
pub mod choreos;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
