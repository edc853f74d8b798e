//! Forty-eight drones form grids and spin them in the air.
//!
//! The roster is split into contiguous sub-groups, each with its own
//! sequence: hold a 4x4xN grid for 60 ticks, then rotate it about the Y axis
//! around the group's centre of rotation for a few seconds with boost held.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::Vec3;

use crate::choreography::drone::Drone;
use crate::choreography::error::{ChoreographyError, Result};
use crate::choreography::interpolation::{rotate_about, sample_kinematics};
use crate::choreography::preparation::{HideBall, LetAllCarsSpawn};
use crate::choreography::step::{BoxedStep, GroupStep, StepResult};
use crate::choreography::subgroup::{SequenceBuilder, SubGroupChoreography, SubGroupOrchestrator};
use crate::choreography::Routine;
use crate::events::stateintent::{DesiredState, StateIntent};
use crate::resources::snapshot::Rotator;

pub const HACK_BOTS: usize = 48;

const GRID_HOLD_TICKS: usize = 60;
const GRID_AXIS: usize = 4;
const GRID_SPACING: f32 = 200.0;
const SPIN_RATE: f32 = 8.0;
const SPIN_SECONDS: f32 = 7.0;
const LIFT: Vec3 = Vec3::new(0.0, 0.0, 400.0);
/// Distance between neighbouring sub-groups along X.
const GROUP_SPACING: f32 = 1400.0;

/// Grid slot `i` relative to the group origin.
fn grid_target(i: usize) -> Vec3 {
    Vec3::new(
        (i % GRID_AXIS) as f32 * GRID_SPACING - 300.0,
        ((i / GRID_AXIS) % (GRID_AXIS * GRID_AXIS)) as f32 * GRID_SPACING - 100.0,
        (i / (GRID_AXIS * GRID_AXIS)) as f32 * GRID_SPACING + 200.0,
    )
}

fn nose_up() -> Rotator {
    Rotator::new(FRAC_PI_2, 0.0, 0.0)
}

/// Sequence of one grid sub-group.
pub struct HackSubgroup {
    origin: Vec3,
    center_of_rotation: Vec3,
    dt: f32,
}

impl HackSubgroup {
    pub fn new(origin: Vec3, dt: f32) -> Self {
        Self {
            origin,
            center_of_rotation: origin + Vec3::new(0.0, -3000.0, 800.0),
            dt,
        }
    }

    fn arrange_in_grid(targets: Arc<Vec<Vec3>>) -> BoxedStep {
        GroupStep::new(move |ctx, drones: &mut [Drone], _| {
            if drones.is_empty() || targets.len() < drones.len() {
                return Ok(StepResult::finished());
            }
            let mut intent = StateIntent::new();
            for (drone, target) in drones.iter().zip(targets.iter()) {
                intent.set_agent(
                    drone.index,
                    DesiredState::at(*target)
                        .with_velocity(LIFT)
                        .with_angular_velocity(Vec3::ZERO)
                        .with_rotation(nose_up()),
                );
            }
            ctx.set_state(intent);
            Ok(StepResult::finished())
        })
        .named("arrange_in_grid")
        .boxed()
    }

    fn flight_pattern(&self, targets: Arc<Vec<Vec3>>) -> BoxedStep {
        let center = self.center_of_rotation;
        let dt = self.dt;
        GroupStep::new(move |ctx, drones: &mut [Drone], start_time| {
            let elapsed = ctx.time() - start_time;
            // Measured tick spacing; zero until two snapshots have been read.
            let step = if ctx.game_info.dt > 0.0 { ctx.game_info.dt } else { dt };
            let mut intent = StateIntent::new();
            for (drone, &target) in drones.iter_mut().zip(targets.iter()) {
                drone.ctrl.boost = true;
                let k = sample_kinematics(
                    |t| rotate_about(target, center, Vec3::Y, t * SPIN_RATE),
                    elapsed,
                    step,
                )?;
                intent.set_agent(
                    drone.index,
                    DesiredState::at(k.position)
                        .with_velocity(k.velocity)
                        .with_angular_velocity(Vec3::ZERO)
                        .with_rotation(nose_up()),
                );
            }
            ctx.set_state(intent);
            Ok(StepResult::when(elapsed >= SPIN_SECONDS))
        })
        .named("flight_pattern")
        .boxed()
    }
}

impl SequenceBuilder for HackSubgroup {
    fn generate_sequence(&mut self, drones: &[Drone]) -> Result<Vec<BoxedStep>> {
        if drones.is_empty() {
            return Ok(Vec::new());
        }
        let targets: Arc<Vec<Vec3>> = Arc::new(
            (0..drones.len())
                .map(|i| grid_target(i) + self.origin)
                .collect(),
        );
        let mut sequence: Vec<BoxedStep> = (0..GRID_HOLD_TICKS)
            .map(|_| Self::arrange_in_grid(Arc::clone(&targets)))
            .collect();
        sequence.push(self.flight_pattern(targets));
        Ok(sequence)
    }
}

pub struct HackPatterns {
    subgroups: usize,
    dt: f32,
}

impl HackPatterns {
    pub fn new(subgroups: usize, dt: f32) -> Self {
        Self {
            subgroups: subgroups.max(1),
            dt,
        }
    }

    /// Origins of the sub-groups, centred on X = 0.
    fn origin(&self, group: usize) -> Vec3 {
        let offset = group as f32 - (self.subgroups - 1) as f32 * 0.5;
        Vec3::X * offset * GROUP_SPACING
    }
}

impl Routine for HackPatterns {
    fn name(&self) -> &str {
        "hack_patterns"
    }

    fn num_bots(&self) -> usize {
        HACK_BOTS
    }

    fn generate_sequence(&mut self, drones: &[Drone]) -> Result<Vec<BoxedStep>> {
        if drones.is_empty() {
            return Err(ChoreographyError::EmptyRoster(self.name().to_string()));
        }
        let chunk = drones.len().div_ceil(self.subgroups);
        let groups = drones
            .chunks(chunk)
            .enumerate()
            .map(|(i, subset)| {
                SubGroupChoreography::new(
                    format!("hack_{}", i),
                    subset.to_vec(),
                    0.0,
                    HackSubgroup::new(self.origin(i), self.dt),
                )
            })
            .collect();
        Ok(vec![
            HideBall.boxed(),
            LetAllCarsSpawn::new(self.num_bots()).boxed(),
            SubGroupOrchestrator::new(groups)?.boxed(),
        ])
    }
}
