//! Preparation steps that usually open a choreography.

use glam::Vec3;
use log::info;

use crate::choreography::context::TickContext;
use crate::choreography::drone::Drone;
use crate::choreography::error::Result;
use crate::choreography::step::{BoxedStep, Step, StepResult};
use crate::events::stateintent::{DesiredState, StateIntent};

/// Where the ball is parked while hidden: well below the arena floor.
pub const HIDDEN_BALL_POSITION: Vec3 = Vec3::new(0.0, 0.0, -3000.0);

/// Holds the pipeline until at least `count` agents have spawned.
pub struct LetAllCarsSpawn {
    count: usize,
}

impl LetAllCarsSpawn {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    pub fn boxed(self) -> BoxedStep {
        Box::new(self)
    }
}

impl Step for LetAllCarsSpawn {
    fn run(
        &mut self,
        ctx: &mut TickContext<'_>,
        _drones: &mut [Drone],
        start_time: f32,
    ) -> Result<StepResult> {
        let spawned = ctx.snapshot.num_spawned();
        if spawned >= self.count {
            info!(
                "{} agents spawned after {:.2}s",
                spawned,
                ctx.time() - start_time
            );
            return Ok(StepResult::finished());
        }
        Ok(StepResult::running())
    }

    fn name(&self) -> &str {
        "let_all_cars_spawn"
    }
}

/// Parks the ball out of sight with zero velocity, then finishes.
#[derive(Default)]
pub struct HideBall;

impl HideBall {
    pub fn boxed(self) -> BoxedStep {
        Box::new(self)
    }
}

impl Step for HideBall {
    fn run(
        &mut self,
        ctx: &mut TickContext<'_>,
        _drones: &mut [Drone],
        _start_time: f32,
    ) -> Result<StepResult> {
        ctx.set_state(
            StateIntent::new().with_ball(
                DesiredState::at(HIDDEN_BALL_POSITION)
                    .with_velocity(Vec3::ZERO)
                    .with_angular_velocity(Vec3::ZERO),
            ),
        );
        Ok(StepResult::finished())
    }

    fn name(&self) -> &str {
        "hide_ball"
    }
}
