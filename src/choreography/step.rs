//! Step abstraction.
//!
//! A [`Step`] is one unit of per-tick behaviour in a choreography. The
//! [`SequenceRunner`](super::runner::SequenceRunner) calls
//! [`Step::run`] once per tick while the step is active and moves on as soon
//! as it reports [`StepResult::finished`].
//!
//! Reusable variants:
//! - [`GroupStep`] – one closure call per tick over the whole drone slice
//! - [`PerDroneStep`] – one decision per drone, batched into a single call
//! - [`BlindStep`] – holds a fixed [`ControlIntent`] for a fixed duration
//!
//! Steps must never block and must not drive the runner themselves. They may
//! write to the world through the [`TickContext`].

use crate::choreography::context::TickContext;
use crate::choreography::drone::{ControlIntent, Drone};
use crate::choreography::error::{ChoreographyError, Result};

/// Outcome of one tick of a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepResult {
    pub finished: bool,
}

impl StepResult {
    pub fn finished() -> Self {
        Self { finished: true }
    }
    pub fn running() -> Self {
        Self { finished: false }
    }
    pub fn when(finished: bool) -> Self {
        Self { finished }
    }
}

/// One schedulable behaviour unit.
///
/// `start_time` is the tick time at which the step became active, as tracked
/// by the runner, so `ctx.time() - start_time` is the time spent in the step.
/// A step that returned `finished = true` is never invoked again by the same
/// runner.
pub trait Step: Send + Sync {
    fn run(
        &mut self,
        ctx: &mut TickContext<'_>,
        drones: &mut [Drone],
        start_time: f32,
    ) -> Result<StepResult>;

    /// Label used in logs.
    fn name(&self) -> &str;
}

pub type BoxedStep = Box<dyn Step>;

type GroupFn =
    Box<dyn FnMut(&mut TickContext<'_>, &mut [Drone], f32) -> Result<StepResult> + Send + Sync>;
type DroneFn =
    Box<dyn FnMut(&mut TickContext<'_>, &mut Drone, f32) -> Result<StepResult> + Send + Sync>;

/// Runs a closure once per tick with every drone this step governs.
///
/// Used for formation and state-broadcast behaviours, e.g. placing every
/// drone at a computed position this tick.
pub struct GroupStep {
    name: String,
    body: GroupFn,
}

impl GroupStep {
    pub fn new<F>(body: F) -> Self
    where
        F: FnMut(&mut TickContext<'_>, &mut [Drone], f32) -> Result<StepResult>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: "group".to_string(),
            body: Box::new(body),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn boxed(self) -> BoxedStep {
        Box::new(self)
    }
}

impl Step for GroupStep {
    fn run(
        &mut self,
        ctx: &mut TickContext<'_>,
        drones: &mut [Drone],
        start_time: f32,
    ) -> Result<StepResult> {
        (self.body)(ctx, drones, start_time)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Makes one decision per drone per tick.
///
/// The closure is called for every drone in order within a single `run`.
/// The step finishes on the first tick where every drone reports finished;
/// with no drones it finishes immediately.
pub struct PerDroneStep {
    name: String,
    body: DroneFn,
}

impl PerDroneStep {
    pub fn new<F>(body: F) -> Self
    where
        F: FnMut(&mut TickContext<'_>, &mut Drone, f32) -> Result<StepResult>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: "per_drone".to_string(),
            body: Box::new(body),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn boxed(self) -> BoxedStep {
        Box::new(self)
    }
}

impl Step for PerDroneStep {
    fn run(
        &mut self,
        ctx: &mut TickContext<'_>,
        drones: &mut [Drone],
        start_time: f32,
    ) -> Result<StepResult> {
        let mut all_finished = true;
        for drone in drones.iter_mut() {
            let result = (self.body)(ctx, drone, start_time)?;
            all_finished &= result.finished;
        }
        Ok(StepResult::when(all_finished))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Ignores world feedback: holds `ctrl` on every drone for `duration` seconds.
///
/// Finishes on the first tick where `time - start_time >= duration`, so a
/// zero duration finishes on its first tick.
pub struct BlindStep {
    name: String,
    ctrl: ControlIntent,
    duration: f32,
}

impl BlindStep {
    /// Fails with [`ChoreographyError::InvalidDuration`] when `duration` is
    /// negative or not a number.
    pub fn new(ctrl: ControlIntent, duration: f32) -> Result<Self> {
        if duration.is_nan() || duration < 0.0 {
            return Err(ChoreographyError::InvalidDuration(duration));
        }
        Ok(Self {
            name: "blind".to_string(),
            ctrl,
            duration,
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn boxed(self) -> BoxedStep {
        Box::new(self)
    }
}

impl Step for BlindStep {
    fn run(
        &mut self,
        ctx: &mut TickContext<'_>,
        drones: &mut [Drone],
        start_time: f32,
    ) -> Result<StepResult> {
        for drone in drones.iter_mut() {
            drone.ctrl = self.ctrl;
        }
        let elapsed = ctx.time() - start_time;
        Ok(StepResult::when(elapsed >= self.duration))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
