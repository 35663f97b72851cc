// src/ranging/sample.rs

use crate::common::timing::{MAX_RANGE_CM, MIN_RANGE_CM, SPEED_OF_SOUND_CM_PER_US};

/// Outcome of one echo measurement, before range classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EchoOutcome {
    /// Echo went high and low again; duration of the high phase.
    Pulse { duration_us: u64 },
    /// Echo never went high within the timeout.
    RiseTimeout,
    /// Echo went high but never dropped within the timeout.
    FallTimeout,
    /// A line could not be driven or read.
    LineFault,
}

/// One ranging result as handed to the output sink.
///
/// `valid` is true iff `MIN_RANGE_CM <= distance_cm <= MAX_RANGE_CM`. Every
/// failure (timeout, out-of-range, line fault) is the [`RangingSample::INVALID`]
/// sentinel, so a sample is always produced.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RangingSample {
    pub distance_cm: f32,
    pub valid: bool,
}

impl RangingSample {
    /// Distance published for every failed measurement.
    pub const SENTINEL_CM: f32 = -1.0;

    pub const INVALID: RangingSample = RangingSample {
        distance_cm: Self::SENTINEL_CM,
        valid: false,
    };

    /// Classifies a distance; anything outside the rated range becomes the sentinel.
    pub fn from_distance(distance_cm: f32) -> Self {
        if is_in_range(distance_cm) {
            Self { distance_cm, valid: true }
        } else {
            Self::INVALID
        }
    }

    /// Converts an echo pulse width into a classified sample.
    pub fn from_pulse_us(duration_us: u64) -> Self {
        Self::from_distance(pulse_to_distance_cm(duration_us))
    }

    pub fn from_outcome(outcome: EchoOutcome) -> Self {
        match outcome {
            EchoOutcome::Pulse { duration_us } => Self::from_pulse_us(duration_us),
            EchoOutcome::RiseTimeout | EchoOutcome::FallTimeout | EchoOutcome::LineFault => Self::INVALID,
        }
    }

    /// The value the consumer sees: the distance, or `-1.0` for any failure.
    #[inline]
    pub fn published_value(&self) -> f32 {
        if self.valid {
            self.distance_cm
        } else {
            Self::SENTINEL_CM
        }
    }
}

/// Round-trip pulse width to one-way distance. Computed in f64, narrowed last.
pub fn pulse_to_distance_cm(duration_us: u64) -> f32 {
    ((duration_us as f64) * SPEED_OF_SOUND_CM_PER_US / 2.0) as f32
}

#[inline]
pub fn is_in_range(distance_cm: f32) -> bool {
    (MIN_RANGE_CM..=MAX_RANGE_CM).contains(&distance_cm)
}
