//! The choreography driven by the ECS schedule.
//!
//! Wraps the [`Choreography`] root so systems can reach it as a resource.
//! The roster is installed lazily on the first tick, once the arena's slot
//! count is known.
//!
//! # Related
//!
//! - [`crate::systems::choreography::choreography_system`] – ticks it
//! - [`crate::choreos::create`] – builds one by name

use bevy_ecs::prelude::Resource;

use crate::choreography::Choreography;

#[derive(Resource)]
pub struct ActiveChoreography {
    pub choreography: Choreography,
    /// Set once a step or the sequence generation has failed. A failed
    /// choreography is not ticked again.
    pub failed: bool,
}

impl ActiveChoreography {
    pub fn new(choreography: Choreography) -> Self {
        Self {
            choreography,
            failed: false,
        }
    }

    /// True when there is nothing left to tick.
    pub fn is_stopped(&self) -> bool {
        self.failed || self.choreography.is_finished()
    }
}
