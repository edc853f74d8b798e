//! Hierarchical composition.
//!
//! A [`SubGroupChoreography`] owns a private [`SequenceRunner`] and a subset of
//! the roster, and plugs into an outer sequence as an ordinary [`Step`]. A
//! [`SubGroupOrchestrator`] fans every tick out to several sub-groups over
//! disjoint drone subsets and finishes once all of them have.
//!
//! Children are driven one after another in a fixed order, so sub-pipelines
//! only progress concurrently in tick terms. A child that has finished is
//! never driven again.

use log::{debug, info};
use rustc_hash::FxHashSet;

use crate::choreography::context::TickContext;
use crate::choreography::drone::Drone;
use crate::choreography::error::{ChoreographyError, Result};
use crate::choreography::runner::{RunnerState, SequenceRunner};
use crate::choreography::step::{BoxedStep, Step, StepResult};

/// Produces the step queue for a set of drones.
///
/// Closures of the right shape implement this directly.
pub trait SequenceBuilder: Send + Sync {
    fn generate_sequence(&mut self, drones: &[Drone]) -> Result<Vec<BoxedStep>>;
}

impl<F> SequenceBuilder for F
where
    F: FnMut(&[Drone]) -> Result<Vec<BoxedStep>> + Send + Sync,
{
    fn generate_sequence(&mut self, drones: &[Drone]) -> Result<Vec<BoxedStep>> {
        self(drones)
    }
}

/// An independently sequenced partition of the roster.
///
/// The inner sequence is generated lazily on the first tick, and only again
/// when the drone subset changes or [`restart`](Self::restart) is called.
/// Each regeneration is a fresh restart of the inner runner.
pub struct SubGroupChoreography {
    name: String,
    drones: Vec<Drone>,
    runner: SequenceRunner,
    start_time: f32,
    builder: Box<dyn SequenceBuilder>,
    generated_for: Option<Vec<usize>>,
}

impl SubGroupChoreography {
    pub fn new(
        name: impl Into<String>,
        drones: Vec<Drone>,
        start_time: f32,
        builder: impl SequenceBuilder + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            drones,
            runner: SequenceRunner::new(),
            start_time,
            builder: Box::new(builder),
            generated_for: None,
        }
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    /// Roster slots this sub-group governs.
    pub fn slots(&self) -> Vec<usize> {
        self.drones.iter().map(|d| d.index).collect()
    }

    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    pub fn runner(&self) -> &SequenceRunner {
        &self.runner
    }

    pub fn is_finished(&self) -> bool {
        self.runner.is_done()
    }

    /// Swap the drone subset. The next tick rebuilds the sequence from scratch.
    pub fn set_drones(&mut self, drones: Vec<Drone>) {
        self.drones = drones;
    }

    /// Build the inner queue unless it was already built for these drones.
    pub fn generate_sequence(&mut self) -> Result<()> {
        let slots = self.slots();
        if self.generated_for.as_ref() == Some(&slots) {
            return Ok(());
        }
        let queue = self.builder.generate_sequence(&self.drones)?;
        debug!(
            "Sub-group '{}' generated {} steps for {} drones",
            self.name,
            queue.len(),
            slots.len()
        );
        self.runner.replace(queue);
        self.generated_for = Some(slots);
        Ok(())
    }

    /// Rebuild the inner queue and start over, discarding progress.
    pub fn restart(&mut self) -> Result<()> {
        self.generated_for = None;
        self.generate_sequence()
    }

    /// Position of each owned drone in `roster`, failing on the first one
    /// missing.
    fn locate_in(&self, roster: &[Drone]) -> Result<Vec<usize>> {
        self.drones
            .iter()
            .map(|own| {
                roster
                    .iter()
                    .position(|d| d.index == own.index)
                    .ok_or(ChoreographyError::UnknownDrone { index: own.index })
            })
            .collect()
    }
}

impl Step for SubGroupChoreography {
    /// Drives the inner runner with the owned drones. The outer start time
    /// is ignored; the inner runner tracks its own. Control intents are copied
    /// back into the matching drones of `drones` after the tick.
    fn run(
        &mut self,
        ctx: &mut TickContext<'_>,
        drones: &mut [Drone],
        _start_time: f32,
    ) -> Result<StepResult> {
        let positions = self.locate_in(drones)?;
        self.generate_sequence()?;

        let state = self.runner.advance_tick(ctx, &mut self.drones)?;

        for (own, pos) in self.drones.iter().zip(positions) {
            drones[pos].ctrl = own.ctrl;
        }
        Ok(StepResult::when(state == RunnerState::Done))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct Child {
    group: SubGroupChoreography,
    finished: bool,
}

/// Runs several sub-groups side by side within one outer step.
pub struct SubGroupOrchestrator {
    children: Vec<Child>,
}

impl SubGroupOrchestrator {
    /// Fails with [`ChoreographyError::OverlappingSubGroups`] if any drone is
    /// claimed by two sub-groups.
    pub fn new(groups: Vec<SubGroupChoreography>) -> Result<Self> {
        let mut seen = FxHashSet::default();
        for group in &groups {
            for index in group.slots() {
                if !seen.insert(index) {
                    return Err(ChoreographyError::OverlappingSubGroups { index });
                }
            }
        }
        Ok(Self {
            children: groups
                .into_iter()
                .map(|group| Child {
                    group,
                    finished: false,
                })
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn num_finished(&self) -> usize {
        self.children.iter().filter(|c| c.finished).count()
    }

    pub fn groups(&self) -> impl Iterator<Item = &SubGroupChoreography> {
        self.children.iter().map(|c| &c.group)
    }

    pub fn boxed(self) -> BoxedStep {
        Box::new(self)
    }
}

impl Step for SubGroupOrchestrator {
    fn run(
        &mut self,
        ctx: &mut TickContext<'_>,
        drones: &mut [Drone],
        start_time: f32,
    ) -> Result<StepResult> {
        for child in self.children.iter_mut().filter(|c| !c.finished) {
            let result = child.group.run(ctx, drones, start_time)?;
            if result.finished {
                info!(
                    "Sub-group '{}' finished at t={:.3}",
                    child.group.name(),
                    ctx.time()
                );
                child.finished = true;
            }
        }
        Ok(StepResult::when(self.children.iter().all(|c| c.finished)))
    }

    fn name(&self) -> &str {
        "sub_group_orchestrator"
    }
}
