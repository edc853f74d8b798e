//! Engine tick integration tests: choreographies driven through a bevy_ecs
//! `World` and the full schedule.

use bevy_ecs::prelude::*;
use glam::Vec3;

use swarmchoreo::choreography::drone::Drone;
use swarmchoreo::choreography::error::{ChoreographyError, Result};
use swarmchoreo::choreography::preparation::{HIDDEN_BALL_POSITION, HideBall, LetAllCarsSpawn};
use swarmchoreo::choreography::step::{BoxedStep, GroupStep, StepResult};
use swarmchoreo::choreography::{Choreography, Routine};
use swarmchoreo::choreos;
use swarmchoreo::events::stateintent::{DesiredState, StateIntent};
use swarmchoreo::game::{build_schedule, build_world, run_headless, run_world};
use swarmchoreo::resources::arena::Arena;
use swarmchoreo::resources::choreography::ActiveChoreography;
use swarmchoreo::resources::gameconfig::ChoreoConfig;
use swarmchoreo::resources::gameinfo::GameInfo;
use swarmchoreo::resources::worldsignals::WorldSignals;
use swarmchoreo::systems::time::update_world_time;

const EPSILON: f32 = 1e-3;

fn approx_eq_v3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

/// Waits for spawns, hides the ball, then lifts every drone for two ticks.
struct Lift;

impl Routine for Lift {
    fn name(&self) -> &str {
        "lift"
    }

    fn num_bots(&self) -> usize {
        3
    }

    fn generate_sequence(&mut self, drones: &[Drone]) -> Result<Vec<BoxedStep>> {
        if drones.is_empty() {
            return Err(ChoreographyError::EmptyRoster(self.name().to_string()));
        }
        let mut ticks = 0;
        Ok(vec![
            LetAllCarsSpawn::new(self.num_bots()).boxed(),
            HideBall.boxed(),
            GroupStep::new(move |ctx, drones: &mut [Drone], _| {
                ticks += 1;
                let mut intent = StateIntent::new();
                for d in drones.iter() {
                    intent.set_agent(
                        d.index,
                        DesiredState::at(Vec3::new(d.index as f32 * 100.0, 0.0, 500.0 * ticks as f32)),
                    );
                }
                ctx.set_state(intent);
                Ok(StepResult::when(ticks >= 2))
            })
            .named("lift")
            .boxed(),
        ])
    }
}

fn config() -> ChoreoConfig {
    ChoreoConfig {
        tick_rate: 10,
        spawn_interval: 0.1,
        spawn_jitter: 0.0,
        ..ChoreoConfig::new()
    }
}

#[test]
fn test_lift_routine_through_schedule() {
    let config = config();
    let mut world = build_world(&config, Choreography::new(Lift));
    let mut schedule = build_schedule();

    // Agents spawn at 0.0, 0.1, 0.2; the first tick runs at 0.1.
    update_world_time(&mut world, config.dt());
    schedule.run(&mut world);
    assert_eq!(world.resource::<Arena>().num_spawned(), 2);
    assert_eq!(world.resource::<GameInfo>().num_spawned, 2);
    assert!(world.resource::<ActiveChoreography>().choreography.has_drones());

    let summary = run_world(&mut world, &mut schedule, config.dt(), 10.0);
    assert!(summary.finished);
    assert!(summary.error.is_none());

    let arena = world.resource::<Arena>();
    assert!(approx_eq_v3(arena.ball.position, HIDDEN_BALL_POSITION));
    assert!(approx_eq_v3(arena.agents[2].physics.position, Vec3::new(200.0, 0.0, 1000.0)));
    assert!(world.resource::<WorldSignals>().has_flag("choreography_done"));
}

#[test]
fn test_time_limit_stops_unfinished_choreography() {
    let config = ChoreoConfig {
        // More slots than the routine ever sees spawned in time.
        spawn_interval: 100.0,
        ..config()
    };
    let mut world = build_world(&config, Choreography::new(Lift));
    let mut schedule = build_schedule();
    let summary = run_world(&mut world, &mut schedule, config.dt(), 1.0);
    assert!(!summary.finished);
    assert!(summary.error.is_none());
    assert!(summary.elapsed >= 1.0);
    assert!(!world.resource::<WorldSignals>().has_flag("quit_game"));
}

#[test]
fn test_hack_patterns_runs_to_completion_headless() {
    let config = ChoreoConfig {
        choreography: "hack_patterns".into(),
        hack_subgroups: 2,
        ..ChoreoConfig::new()
    };
    let summary = run_headless(&config).unwrap();
    assert_eq!(summary.choreography, "hack_patterns");
    assert!(summary.finished, "{:?}", summary);
    // spawn wait, 60 grid ticks, then 7 s of spinning
    assert!(summary.elapsed > 8.0 && summary.elapsed < 15.0);
}

#[test]
fn test_bird_flap_plays_bundled_keyframes() {
    let config = ChoreoConfig {
        choreography: "bird_flap".into(),
        keyframes: concat!(env!("CARGO_MANIFEST_DIR"), "/assets/wing_flap.csv").into(),
        ..ChoreoConfig::new()
    };
    let summary = run_headless(&config).unwrap();
    assert!(summary.finished, "{:?}", summary);
}

#[test]
fn test_unknown_choreography_is_an_error() {
    let config = ChoreoConfig {
        choreography: "moonwalk".into(),
        ..ChoreoConfig::new()
    };
    assert_eq!(
        run_headless(&config).err(),
        Some(ChoreographyError::UnknownChoreography("moonwalk".into()))
    );
    assert!(!choreos::NAMES.contains(&"moonwalk"));
}
