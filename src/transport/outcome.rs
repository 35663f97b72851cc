// src/transport/outcome.rs

/// Why a transfer stopped short.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The channel refused a byte.
    #[error("channel rejected byte")]
    WriteRejected,

    /// The channel never became ready to accept a byte.
    #[error("channel not ready for write")]
    WriteTimeout,

    /// The total read budget was already spent before the next byte.
    #[error("read budget expired")]
    BudgetExpired,

    /// No byte arrived within what was left of the read budget.
    #[error("read timed out")]
    ReadTimeout,

    /// The channel reported a receive fault (framing, overrun, disconnect).
    #[error("channel receive error")]
    Channel,
}

impl TransportError {
    /// Non-zero code reported through the middleware's `errcode` out-parameter.
    pub const fn code(self) -> u8 {
        match self {
            TransportError::WriteRejected => 1,
            TransportError::WriteTimeout => 2,
            TransportError::BudgetExpired => 3,
            TransportError::ReadTimeout => 4,
            TransportError::Channel => 5,
        }
    }
}

/// Bytes moved by one `write`/`read`, plus the reason it stopped early.
///
/// Invariant: when `error` is set, `bytes_transferred` is less than the
/// requested length. Partial transfers are never rolled back.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TransferOutcome {
    pub bytes_transferred: usize,
    pub error: Option<TransportError>,
}

impl TransferOutcome {
    #[inline]
    pub const fn complete(bytes_transferred: usize) -> Self {
        Self {
            bytes_transferred,
            error: None,
        }
    }

    #[inline]
    pub const fn partial(bytes_transferred: usize, error: TransportError) -> Self {
        Self {
            bytes_transferred,
            error: Some(error),
        }
    }

    #[inline]
    pub const fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// `0` on success, otherwise the error's code.
    pub fn error_code(&self) -> u8 {
        self.error.map_or(0, TransportError::code)
    }
}
