// src/common/hal_adapters.rs

//! Bridges from embedded-hal 1.0 (and embedded-hal-nb serial) to the
//! traits in `hal_traits`, so any conforming board HAL plugs straight in.

use super::hal_traits::{ByteChannel, Delay, InputLine, MonotonicClock, OutputLine, RegisterBus};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use embedded_hal_nb::serial;

/// Any `OutputPin` as an [`OutputLine`].
///
/// `toggle` flips a tracked level instead of requiring `StatefulOutputPin`,
/// so the pin starts out assumed low.
#[derive(Debug)]
pub struct HalOutput<P> {
    pin: P,
    high: bool,
}

impl<P: OutputPin> HalOutput<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, high: false }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> OutputLine for HalOutput<P> {
    type Error = P::Error;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()?;
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()?;
        self.high = false;
        Ok(())
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        if self.high {
            self.set_low()
        } else {
            self.set_high()
        }
    }
}

/// Any `InputPin` as an [`InputLine`].
#[derive(Debug)]
pub struct HalInput<P>(pub P);

impl<P: InputPin> InputLine for HalInput<P> {
    type Error = P::Error;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }
}

/// Any `DelayNs` as a [`Delay`].
#[derive(Debug)]
pub struct HalDelay<D>(pub D);

impl<D: DelayNs> Delay for HalDelay<D> {
    fn delay_us(&mut self, us: u32) {
        self.0.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }
}

/// An `SpiDevice` (bus plus managed chip-select) as a [`RegisterBus`].
#[derive(Debug)]
pub struct HalSpi<S>(pub S);

impl<S: SpiDevice> RegisterBus for HalSpi<S> {
    type Error = S::Error;

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.0.transfer_in_place(words)
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.0.write(words)
    }
}

/// A non-blocking embedded-hal-nb serial port as a [`ByteChannel`].
#[derive(Debug)]
pub struct HalSerial<U>(pub U);

impl<U> ByteChannel for HalSerial<U>
where
    U: serial::Read<u8> + serial::Write<u8>,
{
    type Error = <U as serial::ErrorType>::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.0.read()
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.0.write(byte)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.0.flush()
    }
}

/// Wraps a closure reading a free-running microsecond counter.
#[derive(Debug)]
pub struct FnClock<F>(pub F);

impl<F: Fn() -> u64> MonotonicClock for FnClock<F> {
    fn now_us(&self) -> u64 {
        (self.0)()
    }
}
