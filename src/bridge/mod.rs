// src/bridge/mod.rs

//! Periodic sampling: one driver cycle per tick, result handed to a sink.

pub mod cadence;
pub mod card_task;
pub mod ranging_task;
pub mod sink;

pub use cadence::Cadence;
pub use card_task::{CardScanConfig, CardScanTask};
pub use ranging_task::RangingTask;
pub use sink::{OutputSink, Reading, TickReport};

use crate::common::timing;

/// A unit of work run once per tick.
///
/// Ticks never overlap and nothing is queued between them: a tick whose
/// publish fails is reported and forgotten.
pub trait SamplingTask {
    fn tick<S: OutputSink>(&mut self, sink: &mut S) -> TickReport;
}

/// Binds a task to its sink and a cadence.
#[derive(Debug)]
pub struct Sampler<T, S> {
    task: T,
    sink: S,
    cadence: Cadence,
    ticks: u32,
}

impl<T, S> Sampler<T, S>
where
    T: SamplingTask,
    S: OutputSink,
{
    /// Sampler at the default 100 ms period.
    pub fn new(task: T, sink: S) -> Self {
        Self::with_cadence(task, sink, Cadence::from_millis(timing::TICK_PERIOD_MS))
    }

    pub fn with_cadence(task: T, sink: S, cadence: Cadence) -> Self {
        Sampler {
            task,
            sink,
            cadence,
            ticks: 0,
        }
    }

    /// Runs one tick if the cadence says one is due at `now_us`.
    pub fn poll(&mut self, now_us: u64) -> Option<TickReport> {
        if self.cadence.poll(now_us) {
            Some(self.tick())
        } else {
            None
        }
    }

    /// Runs one tick unconditionally, for callers with their own timer.
    pub fn tick(&mut self) -> TickReport {
        self.ticks = self.ticks.wrapping_add(1);
        self.task.tick(&mut self.sink)
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn cadence(&self) -> &Cadence {
        &self.cadence
    }

    pub fn task(&self) -> &T {
        &self.task
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (T, S) {
        (self.task, self.sink)
    }
}
