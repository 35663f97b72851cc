// src/ranging/hcsr04.rs

use super::sample::{EchoOutcome, RangingSample};
use crate::common::{
    clock::{try_busy_wait_until, WaitOutcome},
    hal_traits::{Delay, InputLine, MonotonicClock, OutputLine},
    timing,
};
use crate::{log_debug, log_warn};

/// A trigger or echo line could not be driven or read.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct LineFault;

/// Tunables for the ranging driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RangerConfig {
    /// Bound applied to each of the two echo edge waits.
    pub echo_timeout_us: u64,
}

impl Default for RangerConfig {
    fn default() -> Self {
        Self {
            echo_timeout_us: timing::ECHO_TIMEOUT_US,
        }
    }
}

/// Phases of one measurement. Strictly sequential, no re-entry mid-measurement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RangingState {
    Idle,
    Trigger,
    WaitEchoRise,
    WaitEchoFall { rise_us: u64 },
    Done(EchoOutcome),
}

/// Pulse-width ultrasonic ranger (HC-SR04 and compatibles).
///
/// Owns its trigger and echo lines plus the clock and delay used to time
/// them. Every measurement is independent: no retries, no smoothing.
#[derive(Debug)]
pub struct HcSr04<TRIG, ECHO, CLK, DLY> {
    trigger: TRIG,
    echo: ECHO,
    clock: CLK,
    delay: DLY,
    config: RangerConfig,
}

impl<TRIG, ECHO, CLK, DLY> HcSr04<TRIG, ECHO, CLK, DLY>
where
    TRIG: OutputLine,
    ECHO: InputLine,
    CLK: MonotonicClock,
    DLY: Delay,
{
    pub fn new(trigger: TRIG, echo: ECHO, clock: CLK, delay: DLY) -> Self {
        Self::with_config(trigger, echo, clock, delay, RangerConfig::default())
    }

    pub fn with_config(trigger: TRIG, echo: ECHO, clock: CLK, delay: DLY, config: RangerConfig) -> Self {
        HcSr04 {
            trigger,
            echo,
            clock,
            delay,
            config,
        }
    }

    pub fn config(&self) -> &RangerConfig {
        &self.config
    }

    /// Runs one full measurement and classifies it. Never fails; every
    /// failure mode is the sentinel sample.
    pub fn measure(&mut self) -> RangingSample {
        RangingSample::from_outcome(self.measure_echo())
    }

    /// Runs one full measurement and returns the raw echo outcome.
    pub fn measure_echo(&mut self) -> EchoOutcome {
        let mut state = RangingState::Idle;
        loop {
            state = self.step(state);
            if let RangingState::Done(outcome) = state {
                return outcome;
            }
        }
    }

    /// Advances the measurement by one phase.
    ///
    /// `Done` is terminal and returned unchanged.
    pub fn step(&mut self, state: RangingState) -> RangingState {
        match state {
            RangingState::Idle => RangingState::Trigger,
            RangingState::Trigger => match self.fire_trigger() {
                Ok(()) => RangingState::WaitEchoRise,
                Err(LineFault) => RangingState::Done(EchoOutcome::LineFault),
            },
            RangingState::WaitEchoRise => match self.wait_echo(true) {
                Ok(WaitOutcome::Satisfied) => RangingState::WaitEchoFall {
                    rise_us: self.clock.now_us(),
                },
                Ok(WaitOutcome::TimedOut) => {
                    log_debug!("echo rise timeout");
                    RangingState::Done(EchoOutcome::RiseTimeout)
                }
                Err(LineFault) => RangingState::Done(EchoOutcome::LineFault),
            },
            RangingState::WaitEchoFall { rise_us } => match self.wait_echo(false) {
                Ok(WaitOutcome::Satisfied) => {
                    let fall_us = self.clock.now_us();
                    RangingState::Done(EchoOutcome::Pulse {
                        duration_us: fall_us.saturating_sub(rise_us),
                    })
                }
                Ok(WaitOutcome::TimedOut) => {
                    log_debug!("echo fall timeout");
                    RangingState::Done(EchoOutcome::FallTimeout)
                }
                Err(LineFault) => RangingState::Done(EchoOutcome::LineFault),
            },
            done @ RangingState::Done(_) => done,
        }
    }

    /// Low for the settle time, high for exactly the pulse width, then low.
    fn fire_trigger(&mut self) -> Result<(), LineFault> {
        self.drive_trigger_pulse().map_err(|_| {
            log_warn!("trigger line fault");
            LineFault
        })
    }

    fn drive_trigger_pulse(&mut self) -> Result<(), TRIG::Error> {
        self.trigger.set_low()?;
        self.delay.delay_us(timing::TRIGGER_SETTLE_US);
        self.trigger.set_high()?;
        self.delay.delay_us(timing::TRIGGER_PULSE_US);
        self.trigger.set_low()
    }

    fn wait_echo(&mut self, level_high: bool) -> Result<WaitOutcome, LineFault> {
        let echo = &mut self.echo;
        try_busy_wait_until(&self.clock, self.config.echo_timeout_us, || {
            echo.is_high().map(|high| high == level_high)
        })
        .map_err(|_| {
            log_warn!("echo line fault");
            LineFault
        })
    }

    /// Releases the owned lines and timing sources.
    pub fn release(self) -> (TRIG, ECHO, CLK, DLY) {
        (self.trigger, self.echo, self.clock, self.delay)
    }
}
