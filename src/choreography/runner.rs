//! Sequence runner.
//!
//! [`SequenceRunner`] owns an ordered queue of steps and advances it one tick
//! at a time:
//!
//! 1. An empty queue moves the runner to [`RunnerState::Done`] and does nothing.
//! 2. On the first tick a step is active, the runner records the tick time as
//!    that step's start time. It is held constant until the step finishes.
//! 3. The active step runs with the snapshot, the drones and its start time.
//! 4. When the step reports finished the runner moves to the next one, or to
//!    `Done` after the last.
//!
//! Calling [`SequenceRunner::advance_tick`] after `Done` is a no-op.
//! [`SequenceRunner::replace`] and [`SequenceRunner::clear`] are the only way to
//! cancel work in flight; a step always runs until it reports finished.

use log::debug;

use crate::choreography::context::TickContext;
use crate::choreography::drone::Drone;
use crate::choreography::error::Result;
use crate::choreography::step::BoxedStep;

/// Where a runner is in its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// No queue installed yet.
    Idle,
    /// The step at this index is active.
    Running(usize),
    /// Every step has finished (or the queue was empty when ticked).
    Done,
}

pub struct SequenceRunner {
    queue: Vec<BoxedStep>,
    state: RunnerState,
    active_start_time: Option<f32>,
}

impl Default for SequenceRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceRunner {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            state: RunnerState::Idle,
            active_start_time: None,
        }
    }

    /// Runner with `queue` installed, ready to start at its first step.
    pub fn with_queue(queue: Vec<BoxedStep>) -> Self {
        let mut runner = Self::new();
        runner.replace(queue);
        runner
    }

    /// Install a new queue, dropping any progress on the old one.
    pub fn replace(&mut self, queue: Vec<BoxedStep>) {
        self.state = if queue.is_empty() {
            RunnerState::Idle
        } else {
            RunnerState::Running(0)
        };
        self.queue = queue;
        self.active_start_time = None;
    }

    /// Drop every step and return to `Idle`.
    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Append a step. An idle runner starts at it; a finished runner resumes
    /// at it.
    pub fn push(&mut self, step: BoxedStep) {
        let index = self.queue.len();
        self.queue.push(step);
        match self.state {
            RunnerState::Idle => {
                self.state = RunnerState::Running(0);
                self.active_start_time = None;
            }
            RunnerState::Done => {
                self.state = RunnerState::Running(index);
                self.active_start_time = None;
            }
            RunnerState::Running(_) => {}
        }
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == RunnerState::Done
    }

    /// Index of the active step, if any.
    pub fn active_index(&self) -> Option<usize> {
        match self.state {
            RunnerState::Running(i) => Some(i),
            _ => None,
        }
    }

    /// Start time of the active step, once it has been ticked at least once.
    pub fn active_start_time(&self) -> Option<f32> {
        self.active_start_time
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Advance by one tick. Step errors propagate unchanged and leave the
    /// runner on the failing step.
    pub fn advance_tick(
        &mut self,
        ctx: &mut TickContext<'_>,
        drones: &mut [Drone],
    ) -> Result<RunnerState> {
        let index = match self.state {
            RunnerState::Done => return Ok(RunnerState::Done),
            RunnerState::Idle => {
                self.state = RunnerState::Done;
                return Ok(RunnerState::Done);
            }
            RunnerState::Running(index) => index,
        };

        let now = ctx.time();
        let start_time = match self.active_start_time {
            Some(t) => t,
            None => {
                debug!("Step {} '{}' active at t={:.3}", index, self.queue[index].name(), now);
                self.active_start_time = Some(now);
                now
            }
        };

        let step = &mut self.queue[index];
        let result = step.run(ctx, drones, start_time)?;

        if result.finished {
            debug!(
                "Step {} '{}' finished after {:.3}s",
                index,
                step.name(),
                now - start_time
            );
            self.active_start_time = None;
            let next = index + 1;
            self.state = if next >= self.queue.len() {
                RunnerState::Done
            } else {
                RunnerState::Running(next)
            };
        }
        Ok(self.state)
    }
}
