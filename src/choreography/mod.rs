//! Step-sequencing engine.
//!
//! A [`Choreography`] drives one [`Routine`] for a swarm of drones. Once the
//! roster is known the routine generates its top-level step queue, and from
//! then on every world tick is handed to a [`SequenceRunner`] which runs the
//! active step and moves on when it finishes.
//!
//! Submodules:
//! - [`step`] – the [`Step`](step::Step) contract and reusable step kinds
//! - [`runner`] – the per-tick sequence state machine
//! - [`subgroup`] – sub-groups with their own sequences, and the orchestrator
//!   that runs them side by side
//! - [`interpolation`] – finite-difference kinematics and rotation helpers
//! - [`keyframes`] – recorded keyframe tables used as reference data
//! - [`preparation`] – spawn wait and ball hiding steps
//!
//! The engine is single-threaded and cooperative: nothing here blocks, and
//! a step whose end condition never holds stalls its pipeline forever.

pub mod context;
pub mod drone;
pub mod error;
pub mod interpolation;
pub mod keyframes;
pub mod preparation;
pub mod runner;
pub mod step;
pub mod subgroup;

use log::info;

use crate::choreography::context::TickContext;
use crate::choreography::drone::Drone;
use crate::choreography::error::Result;
use crate::choreography::runner::{RunnerState, SequenceRunner};
use crate::choreography::step::BoxedStep;

/// Content of a choreography: how many bots it needs and which steps to run.
pub trait Routine: Send + Sync {
    fn name(&self) -> &str;

    /// Number of agents the routine is written for.
    fn num_bots(&self) -> usize;

    /// Called every tick before the active step runs.
    fn pre_step(&mut self, _ctx: &TickContext<'_>, _drones: &[Drone]) {}

    /// Build the top-level queue for `drones`. Called once per roster.
    fn generate_sequence(&mut self, drones: &[Drone]) -> Result<Vec<BoxedStep>>;
}

/// Root of a choreography: a routine, its roster and the top-level runner.
pub struct Choreography {
    routine: Box<dyn Routine>,
    runner: SequenceRunner,
    drones: Vec<Drone>,
    generated: bool,
}

impl Choreography {
    pub fn new(routine: impl Routine + 'static) -> Self {
        Self::from_boxed(Box::new(routine))
    }

    pub fn from_boxed(routine: Box<dyn Routine>) -> Self {
        Self {
            routine,
            runner: SequenceRunner::new(),
            drones: Vec::new(),
            generated: false,
        }
    }

    pub fn name(&self) -> &str {
        self.routine.name()
    }

    pub fn num_bots(&self) -> usize {
        self.routine.num_bots()
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn has_drones(&self) -> bool {
        self.generated
    }

    pub fn runner(&self) -> &SequenceRunner {
        &self.runner
    }

    pub fn state(&self) -> RunnerState {
        self.runner.state()
    }

    pub fn is_finished(&self) -> bool {
        self.runner.is_done()
    }

    /// Install the roster and generate the top-level sequence.
    ///
    /// Calling again with the same slots is a no-op. A different roster
    /// regenerates the sequence and restarts it from the first step.
    pub fn set_drones(&mut self, drones: Vec<Drone>) -> Result<()> {
        let same = self.generated
            && self.drones.len() == drones.len()
            && self
                .drones
                .iter()
                .zip(&drones)
                .all(|(a, b)| a.index == b.index);
        if same {
            return Ok(());
        }
        let queue = self.routine.generate_sequence(&drones)?;
        info!(
            "Choreography '{}' starting with {} drones, {} steps",
            self.routine.name(),
            drones.len(),
            queue.len()
        );
        self.runner.replace(queue);
        self.drones = drones;
        self.generated = true;
        Ok(())
    }

    /// Regenerate the sequence for the current roster and start over.
    pub fn restart(&mut self) -> Result<()> {
        let drones = self.drones.clone();
        self.generated = false;
        self.set_drones(drones)
    }

    /// Drive one tick: the routine's pre-step hook, then the active step.
    pub fn step(&mut self, ctx: &mut TickContext<'_>) -> Result<RunnerState> {
        let was_done = self.runner.is_done();
        self.routine.pre_step(ctx, &self.drones);
        let state = self.runner.advance_tick(ctx, &mut self.drones)?;
        if state == RunnerState::Done && !was_done {
            info!(
                "Choreography '{}' finished at t={:.3}",
                self.routine.name(),
                ctx.time()
            );
        }
        Ok(state)
    }
}
