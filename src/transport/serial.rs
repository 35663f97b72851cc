// src/transport/serial.rs

use super::outcome::{TransferOutcome, TransportError};
use crate::common::{
    clock::{poll_with_timeout, TimeoutBudget},
    error::BridgeError,
    hal_traits::{ByteChannel, MonotonicClock, OutputLine},
    timing,
};
use crate::{log_debug, log_info, log_warn};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// How long a single byte may wait for the channel to accept it.
    pub write_timeout_us: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            write_timeout_us: timing::WRITE_BYTE_TIMEOUT_US,
        }
    }
}

/// Open state plus the one-time hardware init latch.
///
/// The latch is set by the first `open` and never cleared, so the init
/// side effects run once per session value no matter how often the
/// middleware reopens the transport.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransportSession {
    open: bool,
    initialized: bool,
    init_runs: u32,
}

impl TransportSession {
    pub const fn new() -> Self {
        Self {
            open: false,
            initialized: false,
            init_runs: 0,
        }
    }

    #[inline]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[inline]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// How many times the init side effects actually ran (0 or 1).
    #[inline]
    pub const fn init_runs(&self) -> u32 {
        self.init_runs
    }
}

/// Byte transport for the middleware agent over a duplex byte channel.
///
/// The status LED is switched off on first open and toggled on every
/// received byte, which makes link activity visible on the board.
#[derive(Debug)]
pub struct SerialTransport<CH, CLK, LED> {
    channel: CH,
    clock: CLK,
    status_led: LED,
    session: TransportSession,
    config: TransportConfig,
}

impl<CH, CLK, LED> SerialTransport<CH, CLK, LED>
where
    CH: ByteChannel,
    CLK: MonotonicClock,
    LED: OutputLine,
{
    pub fn new(channel: CH, clock: CLK, status_led: LED) -> Self {
        Self::with_config(channel, clock, status_led, TransportConfig::default())
    }

    pub fn with_config(channel: CH, clock: CLK, status_led: LED, config: TransportConfig) -> Self {
        SerialTransport {
            channel,
            clock,
            status_led,
            session: TransportSession::new(),
            config,
        }
    }

    pub fn session(&self) -> &TransportSession {
        &self.session
    }

    /// Runs the one-time init on first call, then just marks the session open.
    ///
    /// Always returns true today; the return value is kept so a future
    /// init can report failure.
    pub fn open(&mut self) -> bool {
        if !self.session.initialized {
            if self.status_led.set_low().is_err() {
                log_warn!("status LED init failed");
            }
            self.session.initialized = true;
            self.session.init_runs += 1;
            log_info!("transport initialized");
        }
        self.session.open = true;
        true
    }

    /// Marks the session closed. Releases nothing; the channel stays usable.
    pub fn close(&mut self) -> bool {
        self.session.open = false;
        true
    }

    /// Writes `buf` one byte at a time, stopping at the first byte the
    /// channel does not accept. No buffering, no retry of the failed byte.
    pub fn write(&mut self, buf: &[u8]) -> TransferOutcome {
        let channel = &mut self.channel;
        for (written, &byte) in buf.iter().enumerate() {
            match poll_with_timeout(&self.clock, self.config.write_timeout_us, || channel.write_byte(byte)) {
                Ok(()) => {}
                Err(BridgeError::Timeout) => {
                    log_warn!("transport write stalled after {} bytes", written);
                    return TransferOutcome::partial(written, TransportError::WriteTimeout);
                }
                Err(_) => {
                    log_warn!("transport write rejected after {} bytes", written);
                    return TransferOutcome::partial(written, TransportError::WriteRejected);
                }
            }
        }
        if poll_with_timeout(&self.clock, self.config.write_timeout_us, || channel.flush()).is_err() {
            // Every byte was accepted; a slow drain does not make the write partial.
            log_debug!("transport flush incomplete");
        }
        TransferOutcome::complete(buf.len())
    }

    /// Reads up to `buf.len()` bytes within a total budget of `timeout_ms`.
    ///
    /// The remaining budget is recomputed from one start timestamp before
    /// every byte, so irregular arrival is tolerated but the whole call
    /// never exceeds the budget by more than one poll.
    pub fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> TransferOutcome {
        let budget = TimeoutBudget::start_ms(&self.clock, timeout_ms);
        let channel = &mut self.channel;
        for (received, slot) in buf.iter_mut().enumerate() {
            let remaining = budget.remaining(&self.clock);
            if remaining <= 0 {
                return TransferOutcome::partial(received, TransportError::BudgetExpired);
            }
            // remaining > 0 here, so the cast is lossless
            match poll_with_timeout(&self.clock, remaining as u64, || channel.read_byte()) {
                Ok(byte) => {
                    *slot = byte;
                    // Liveness only; a stuck LED must not fail the read.
                    let _ = self.status_led.toggle();
                }
                Err(BridgeError::Timeout) => {
                    return TransferOutcome::partial(received, TransportError::ReadTimeout);
                }
                Err(_) => {
                    log_warn!("transport receive error after {} bytes", received);
                    return TransferOutcome::partial(received, TransportError::Channel);
                }
            }
        }
        TransferOutcome::complete(buf.len())
    }

    pub fn release(self) -> (CH, CLK, LED) {
        (self.channel, self.clock, self.status_led)
    }
}
