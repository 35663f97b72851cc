// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)] // no_std unless testing or asked for std

pub mod common;
pub mod bridge;
pub mod ranging;
pub mod rfid;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

// Re-export key types for convenience
pub use bridge::{Cadence, OutputSink, Reading, Sampler, SamplingTask, TickReport};
pub use common::BridgeError;
pub use ranging::{HcSr04, RangingSample};
pub use rfid::{CardReader, CardUid, Mfrc522};
pub use transport::{SerialTransport, TransferOutcome, TransportError};
