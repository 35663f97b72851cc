// src/common/error.rs

#[derive(Debug, thiserror::Error)]
pub enum BridgeError<E = ()>
where
    E: core::fmt::Debug, // Needed for the generic Io variant's message
{
    /// Underlying I/O error from the HAL implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// A bounded wait expired before the operation completed.
    #[error("Operation timed out")]
    Timeout,

    /// The peer answered, but not with a frame we accept here
    /// (wrong length, collision, error flags raised by the reader chip).
    #[error("Protocol failure")]
    Protocol,

    /// Block check or CRC of a received frame does not match.
    #[error("Checksum mismatch: expected {expected:#06x}, calculated {calculated:#06x}")]
    ChecksumMismatch { expected: u16, calculated: u16 },

    /// Buffer provided was too small.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },
}

// Allow mapping from underlying HAL error with `?`
impl<E: core::fmt::Debug> From<E> for BridgeError<E> {
    fn from(e: E) -> Self {
        BridgeError::Io(e)
    }
}

impl<E: core::fmt::Debug> BridgeError<E> {
    /// True for the failures a caller recovers from by trying again next tick.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BridgeError::Timeout | BridgeError::Protocol | BridgeError::ChecksumMismatch { .. }
        )
    }
}
