// src/ranging/mod.rs

// Pulse-width ultrasonic ranging: trigger, time the echo, classify.
pub mod hcsr04;
pub mod sample;

pub use hcsr04::{HcSr04, RangerConfig, RangingState};
pub use sample::{is_in_range, pulse_to_distance_cm, EchoOutcome, RangingSample};
