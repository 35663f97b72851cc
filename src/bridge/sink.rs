// src/bridge/sink.rs

use core::fmt::Debug;

/// One record handed to the publisher.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Reading<'a> {
    /// Distance in cm, `-1.0` when the measurement failed.
    Distance(f32),
    /// Rendered card UID.
    CardUid(&'a str),
}

/// The external publisher. Fire-and-forget with a return code: callers log
/// failures and never retry.
pub trait OutputSink {
    type Error: Debug;

    fn publish(&mut self, reading: Reading<'_>) -> Result<(), Self::Error>;
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    type Error = S::Error;

    fn publish(&mut self, reading: Reading<'_>) -> Result<(), Self::Error> {
        (**self).publish(reading)
    }
}

/// What one tick did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickReport {
    /// A record was produced and the sink accepted it.
    Published,
    /// A record was produced, the sink refused it; dropped.
    PublishFailed,
    /// The card reader never came up; only the heartbeat ran.
    NoReader,
    /// No card in the field this tick.
    NoCard,
    /// A card was seen but its UID could not be read.
    ReadFailed,
}
