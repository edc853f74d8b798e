//! Session wiring.
//!
//! Puts the resources, message queue and systems together into a world and
//! schedule, and runs a choreography headless at a fixed tick rate until it
//! finishes, fails or runs out of time.
//!
//! Per tick the schedule runs, in order:
//! 1. [`arena_spawn_system`] – agents appear as their spawn time passes
//! 2. [`capture_snapshot_system`] – snapshot and game info are refreshed
//! 3. [`choreography_system`] – the active step runs and emits intents
//! 4. [`apply_state_intents`] – intents are written into the arena
//! 5. [`update_state_intent_messages`] – the message queue advances

use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::choreography::Choreography;
use crate::choreography::error::Result;
use crate::choreos;
use crate::events::stateintent::StateIntent;
use crate::resources::arena::Arena;
use crate::resources::choreography::ActiveChoreography;
use crate::resources::gameconfig::ChoreoConfig;
use crate::resources::gameinfo::GameInfo;
use crate::resources::snapshot::TickSnapshot;
use crate::resources::worldsignals::WorldSignals;
use crate::resources::worldtime::WorldTime;
use crate::systems::arena::{apply_state_intents, arena_spawn_system, update_state_intent_messages};
use crate::systems::choreography::choreography_system;
use crate::systems::snapshot::capture_snapshot_system;
use crate::systems::time::update_world_time;

/// Outcome of a headless session.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub choreography: String,
    pub ticks: u64,
    /// Simulated seconds when the loop stopped.
    pub elapsed: f32,
    pub finished: bool,
    /// Message of the step failure, if any.
    pub error: Option<String>,
}

/// World with every resource the schedule needs. The arena gets one slot per
/// bot the choreography is written for.
pub fn build_world(config: &ChoreoConfig, choreography: Choreography) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(1.0));
    world.insert_resource(WorldSignals::default());
    world.insert_resource(Arena::new(
        choreography.num_bots(),
        config.spawn_interval,
        config.spawn_jitter,
        config.seed,
    ));
    world.insert_resource(TickSnapshot::default());
    world.insert_resource(GameInfo::new());
    world.insert_resource(Messages::<StateIntent>::default());
    world.insert_resource(ActiveChoreography::new(choreography));
    world.insert_resource(config.clone());
    world
}

pub fn build_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(arena_spawn_system);
    update.add_systems(capture_snapshot_system.after(arena_spawn_system));
    update.add_systems(choreography_system.after(capture_snapshot_system));
    update.add_systems(apply_state_intents.after(choreography_system));
    update.add_systems(update_state_intent_messages.after(apply_state_intents));
    update
}

/// Drive `world` one fixed tick at a time until `quit_game` is raised or
/// `max_seconds` of simulated time have passed.
pub fn run_world(world: &mut World, schedule: &mut Schedule, dt: f32, max_seconds: f32) -> RunSummary {
    while !world.resource::<WorldSignals>().has_flag("quit_game")
        && world.resource::<WorldTime>().elapsed < max_seconds
    {
        update_world_time(world, dt);
        schedule.run(world);
        world.clear_trackers();
    }

    let time = *world.resource::<WorldTime>();
    let signals = world.resource::<WorldSignals>();
    let active = world.resource::<ActiveChoreography>();
    RunSummary {
        choreography: active.choreography.name().to_string(),
        ticks: time.frame_count,
        elapsed: time.elapsed,
        finished: signals.has_flag("choreography_done"),
        error: signals.get_string("choreography_error").cloned(),
    }
}

/// Create the configured choreography and run it headless.
pub fn run_headless(config: &ChoreoConfig) -> Result<RunSummary> {
    let choreography = choreos::create(&config.choreography, config)?;
    let mut world = build_world(config, choreography);
    let mut schedule = build_schedule();

    let summary = run_world(&mut world, &mut schedule, config.dt(), config.max_seconds);
    if summary.finished {
        info!(
            "'{}' finished after {} ticks ({:.2}s)",
            summary.choreography, summary.ticks, summary.elapsed
        );
    } else if summary.error.is_none() {
        warn!(
            "'{}' still running after {:.2}s, stopping",
            summary.choreography, summary.elapsed
        );
    }
    Ok(summary)
}
