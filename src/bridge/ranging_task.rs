// src/bridge/ranging_task.rs

use super::sink::{OutputSink, Reading, TickReport};
use super::SamplingTask;
use crate::common::hal_traits::{Delay, InputLine, MonotonicClock, OutputLine};
use crate::log_warn;
use crate::ranging::{HcSr04, RangingSample};

/// One ranging measurement per tick, always published.
///
/// Failed measurements publish the `-1.0` sentinel so the consumer sees a
/// constant cadence and can tell "no sensor" from "no data".
#[derive(Debug)]
pub struct RangingTask<TRIG, ECHO, CLK, DLY> {
    ranger: HcSr04<TRIG, ECHO, CLK, DLY>,
    last_sample: Option<RangingSample>,
}

impl<TRIG, ECHO, CLK, DLY> RangingTask<TRIG, ECHO, CLK, DLY>
where
    TRIG: OutputLine,
    ECHO: InputLine,
    CLK: MonotonicClock,
    DLY: Delay,
{
    pub fn new(ranger: HcSr04<TRIG, ECHO, CLK, DLY>) -> Self {
        Self {
            ranger,
            last_sample: None,
        }
    }

    /// Sample produced by the most recent tick.
    pub fn last_sample(&self) -> Option<RangingSample> {
        self.last_sample
    }

    pub fn into_inner(self) -> HcSr04<TRIG, ECHO, CLK, DLY> {
        self.ranger
    }
}

impl<TRIG, ECHO, CLK, DLY> SamplingTask for RangingTask<TRIG, ECHO, CLK, DLY>
where
    TRIG: OutputLine,
    ECHO: InputLine,
    CLK: MonotonicClock,
    DLY: Delay,
{
    fn tick<S: OutputSink>(&mut self, sink: &mut S) -> TickReport {
        let sample = self.ranger.measure();
        self.last_sample = Some(sample);
        match sink.publish(Reading::Distance(sample.published_value())) {
            Ok(()) => TickReport::Published,
            Err(_) => {
                log_warn!("distance publish failed");
                TickReport::PublishFailed
            }
        }
    }
}
