//! Eight drones play back a recorded wing flap.
//!
//! The keyframe table gives each roster slot a recorded path. Drones first
//! line up on their first keyframe, then follow the recording in real time
//! with velocity derived by finite difference.

use std::path::Path;
use std::sync::Arc;

use glam::Vec3;

use crate::choreography::drone::Drone;
use crate::choreography::error::{ChoreographyError, Result};
use crate::choreography::keyframes::KeyframeTable;
use crate::choreography::preparation::LetAllCarsSpawn;
use crate::choreography::step::{BoxedStep, GroupStep, StepResult};
use crate::choreography::Routine;
use crate::events::stateintent::{DesiredState, StateIntent};

pub const BIRD_FLAP_BOTS: usize = 8;

/// Recorded units to arena units.
const SCALE: f32 = 2.0;
const OFFSET: Vec3 = Vec3::new(0.0, 0.0, 500.0);

fn to_arena(p: Vec3) -> Vec3 {
    p * SCALE + OFFSET
}

pub struct BirdFlap {
    data: Arc<KeyframeTable>,
    dt: f32,
}

impl BirdFlap {
    /// Fails if the table holds no keyframes at all.
    pub fn new(data: KeyframeTable, dt: f32) -> Result<Self> {
        if data.is_empty() {
            return Err(ChoreographyError::Keyframes {
                line: 0,
                reason: "table has no keyframes".into(),
            });
        }
        Ok(Self {
            data: Arc::new(data),
            dt,
        })
    }

    pub fn load(path: impl AsRef<Path>, dt: f32) -> Result<Self> {
        Self::new(KeyframeTable::load_from_file(path)?, dt)
    }

    fn line_up(&self) -> BoxedStep {
        let data = Arc::clone(&self.data);
        GroupStep::new(move |ctx, drones: &mut [Drone], _| {
            let mut intent = StateIntent::new();
            for drone in drones.iter() {
                let first = data
                    .first(drone.index)
                    .ok_or(ChoreographyError::MissingSlot(drone.index))?;
                intent.set_agent(drone.index, DesiredState::at(to_arena(first.position)));
            }
            ctx.set_state(intent);
            Ok(StepResult::finished())
        })
        .named("line_up")
        .boxed()
    }

    fn flap(&self) -> BoxedStep {
        let data = Arc::clone(&self.data);
        let dt = self.dt;
        let duration = data.duration();
        GroupStep::new(move |ctx, drones: &mut [Drone], start_time| {
            let elapsed = ctx.time() - start_time;
            let mut intent = StateIntent::new();
            for drone in drones.iter() {
                let k = data.sample(drone.index, elapsed, dt)?;
                intent.set_agent(
                    drone.index,
                    DesiredState::at(to_arena(k.position)).with_velocity(k.velocity * SCALE),
                );
            }
            ctx.set_state(intent);
            Ok(StepResult::when(elapsed >= duration))
        })
        .named("flap")
        .boxed()
    }
}

impl Routine for BirdFlap {
    fn name(&self) -> &str {
        "bird_flap"
    }

    fn num_bots(&self) -> usize {
        BIRD_FLAP_BOTS
    }

    fn generate_sequence(&mut self, drones: &[Drone]) -> Result<Vec<BoxedStep>> {
        if drones.is_empty() {
            return Err(ChoreographyError::EmptyRoster(self.name().to_string()));
        }
        if let Some(missing) = drones.iter().find(|d| self.data.first(d.index).is_none()) {
            return Err(ChoreographyError::MissingSlot(missing.index));
        }
        Ok(vec![
            LetAllCarsSpawn::new(self.num_bots()).boxed(),
            self.line_up(),
            self.flap(),
        ])
    }
}
