// src/bridge/cadence.rs

use crate::common::hal_traits::MonotonicClock;

/// Fixed-period due check for hosts that drive ticks from their own loop.
///
/// The first poll is due immediately. When polls arrive late, the missed
/// periods are skipped rather than replayed, so there is never a backlog.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cadence {
    period_us: u64,
    next_due_us: Option<u64>,
    skipped: u32,
}

impl Cadence {
    /// `period_ms` of 0 is treated as 1 ms.
    pub const fn from_millis(period_ms: u64) -> Self {
        let period_ms = if period_ms == 0 { 1 } else { period_ms };
        Self {
            period_us: period_ms * 1000,
            next_due_us: None,
            skipped: 0,
        }
    }

    #[inline]
    pub const fn period_us(&self) -> u64 {
        self.period_us
    }

    /// Periods dropped because polls came too late.
    #[inline]
    pub const fn skipped(&self) -> u32 {
        self.skipped
    }

    /// True when a tick should run at `now_us`; schedules the next one.
    pub fn poll(&mut self, now_us: u64) -> bool {
        match self.next_due_us {
            None => {
                self.next_due_us = Some(now_us.saturating_add(self.period_us));
                true
            }
            Some(due) if now_us >= due => {
                let missed = (now_us - due) / self.period_us;
                self.skipped = self.skipped.saturating_add(u32::try_from(missed).unwrap_or(u32::MAX));
                self.next_due_us = Some(due.saturating_add((missed + 1).saturating_mul(self.period_us)));
                true
            }
            Some(_) => false,
        }
    }

    /// [`Cadence::poll`] at the clock's current time.
    pub fn poll_clock<C: MonotonicClock>(&mut self, clock: &C) -> bool {
        self.poll(clock.now_us())
    }
}
