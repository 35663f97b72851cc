// src/common/hal_traits.rs

use core::fmt::Debug;

/// Monotonic microsecond time source.
///
/// Must never go backwards and must not roll over within the device's
/// lifetime (a 64-bit microsecond counter satisfies this).
pub trait MonotonicClock {
    /// Current time in microseconds since an arbitrary, fixed epoch.
    fn now_us(&self) -> u64;

    /// Current time in milliseconds.
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}

/// Abstraction for blocking delays.
///
/// Note: This could potentially be replaced by directly requiring
/// `embedded_hal::delay::DelayNs`, see `hal_adapters` for the bridge.
pub trait Delay {
    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1000);
        }
    }
}

/// A push-pull output line (trigger pin, status LED).
pub trait OutputLine {
    type Error: Debug;

    fn set_high(&mut self) -> Result<(), Self::Error>;

    fn set_low(&mut self) -> Result<(), Self::Error>;

    /// Inverts the currently driven level.
    fn toggle(&mut self) -> Result<(), Self::Error>;
}

/// A digital input line (echo pin).
pub trait InputLine {
    type Error: Debug;

    fn is_high(&mut self) -> Result<bool, Self::Error>;

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// A full-duplex register transaction on a shared bus.
///
/// Implementations assert chip-select for the duration of one call and
/// release it afterwards, so each call is exactly one framed exchange.
pub trait RegisterBus {
    type Error: Debug;

    /// Shifts `words` out and replaces them in place with the bytes clocked in.
    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error>;

    /// Shifts `words` out, discarding what comes back.
    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error>;
}

/// Abstraction for a non-blocking duplex byte stream (USB CDC, UART).
pub trait ByteChannel {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the channel.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is available yet. Other errors are returned as `Err(nb::Error::Other(Self::Error))`.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the channel.
    ///
    /// Returns `Ok(())` if the byte was accepted for transmission, or `Err(nb::Error::WouldBlock)`
    /// if the write buffer is full. Other errors mean the byte was rejected.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}
