// src/common/clock.rs

//! Timed I/O primitive: bounded busy-waits over a monotonic microsecond clock.
//!
//! Every wait in this crate goes through here, so every wait has a finite
//! upper bound. Nothing in this module is reentrant; call it from the one
//! execution context that owns the clock and the lines being polled.

use super::error::BridgeError;
use super::hal_traits::MonotonicClock;
use core::convert::Infallible;
use core::fmt::Debug;

/// Result of a bounded wait.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    Satisfied,
    TimedOut,
}

impl WaitOutcome {
    #[inline]
    pub const fn is_satisfied(self) -> bool {
        matches!(self, WaitOutcome::Satisfied)
    }
}

/// A timeout duration anchored at a start timestamp.
///
/// The budget never resets itself: `elapsed` only grows for a given budget.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimeoutBudget {
    start_us: u64,
    budget_us: u64,
}

impl TimeoutBudget {
    /// Starts a budget of `budget_us` at the clock's current time.
    pub fn start<C: MonotonicClock>(clock: &C, budget_us: u64) -> Self {
        Self {
            start_us: clock.now_us(),
            budget_us,
        }
    }

    /// Starts a budget given in milliseconds.
    pub fn start_ms<C: MonotonicClock>(clock: &C, budget_ms: u32) -> Self {
        Self::start(clock, u64::from(budget_ms) * 1000)
    }

    #[inline]
    pub const fn start_us(&self) -> u64 {
        self.start_us
    }

    #[inline]
    pub const fn budget_us(&self) -> u64 {
        self.budget_us
    }

    /// Microseconds since the budget started. Saturates instead of wrapping.
    pub fn elapsed<C: MonotonicClock>(&self, clock: &C) -> u64 {
        clock.now_us().saturating_sub(self.start_us)
    }

    /// Microseconds left, negative once the budget is overdrawn.
    pub fn remaining<C: MonotonicClock>(&self, clock: &C) -> i64 {
        let budget = i64::try_from(self.budget_us).unwrap_or(i64::MAX);
        let elapsed = i64::try_from(self.elapsed(clock)).unwrap_or(i64::MAX);
        budget.saturating_sub(elapsed)
    }

    pub fn is_expired<C: MonotonicClock>(&self, clock: &C) -> bool {
        self.elapsed(clock) >= self.budget_us
    }
}

/// Current monotonic time in microseconds.
#[inline]
pub fn now_us<C: MonotonicClock>(clock: &C) -> u64 {
    clock.now_us()
}

/// Spins until `predicate` returns true or `timeout_us` has elapsed.
///
/// Tie-break: each iteration evaluates the predicate before checking the
/// elapsed time, so a predicate that becomes true at exactly `timeout_us`
/// yields `Satisfied`.
pub fn busy_wait_until<C, F>(clock: &C, timeout_us: u64, mut predicate: F) -> WaitOutcome
where
    C: MonotonicClock,
    F: FnMut() -> bool,
{
    match try_busy_wait_until(clock, timeout_us, || Ok::<bool, Infallible>(predicate())) {
        Ok(outcome) => outcome,
        Err(never) => match never {},
    }
}

/// Like [`busy_wait_until`] for predicates that read fallible lines.
///
/// The first predicate error aborts the wait and is returned as-is.
pub fn try_busy_wait_until<C, F, E>(clock: &C, timeout_us: u64, mut predicate: F) -> Result<WaitOutcome, E>
where
    C: MonotonicClock,
    F: FnMut() -> Result<bool, E>,
{
    let budget = TimeoutBudget::start(clock, timeout_us);
    loop {
        let satisfied = predicate()?;
        let elapsed = budget.elapsed(clock);
        if satisfied {
            return Ok(WaitOutcome::Satisfied);
        }
        if elapsed >= timeout_us {
            return Ok(WaitOutcome::TimedOut);
        }
    }
}

/// Executes a non-blocking operation (`f`) repeatedly until it stops
/// returning `WouldBlock`, returning the final result or a timeout error.
///
/// `f` is always attempted at least once, even with a zero timeout.
pub fn poll_with_timeout<C, F, T, E>(clock: &C, timeout_us: u64, mut f: F) -> Result<T, BridgeError<E>>
where
    C: MonotonicClock,
    F: FnMut() -> nb::Result<T, E>,
    E: Debug,
{
    let budget = TimeoutBudget::start(clock, timeout_us);
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(nb::Error::WouldBlock) => {
                if budget.is_expired(clock) {
                    return Err(BridgeError::Timeout);
                }
            }
            Err(nb::Error::Other(e)) => return Err(BridgeError::Io(e)),
        }
    }
}
