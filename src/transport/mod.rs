// src/transport/mod.rs

// Byte transport toward the middleware agent: open/close/write/read with
// partial-transfer semantics over a `ByteChannel`.
pub mod outcome;
pub mod serial;

pub use outcome::{TransferOutcome, TransportError};
pub use serial::{SerialTransport, TransportConfig, TransportSession};
