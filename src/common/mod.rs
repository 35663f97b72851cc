// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod clock;
pub mod error;
pub mod hal_traits;
pub mod logging;
pub mod timing;

#[cfg(feature = "impl-generic-hal")]
pub mod hal_adapters;

// --- Re-export key types/traits/functions for easier access ---

// From clock.rs
pub use clock::{busy_wait_until, now_us, poll_with_timeout, try_busy_wait_until, TimeoutBudget, WaitOutcome};

// From error.rs
pub use error::BridgeError;

// From hal_traits.rs
pub use hal_traits::{ByteChannel, Delay, InputLine, MonotonicClock, OutputLine, RegisterBus};

// From timing.rs (constants - users can access via common::timing::*)
// No re-exports by default.

// --- Feature-gated re-exports ---

#[cfg(feature = "impl-generic-hal")]
pub use hal_adapters::{FnClock, HalDelay, HalInput, HalOutput, HalSerial, HalSpi};
