// src/mock.rs

//! Test doubles driven by one simulated clock.
//!
//! `SimTime` advances by a fixed step on every `now_us` call and by the
//! requested amount on every delay, so busy-waits terminate without real
//! time passing. Peripherals take a `&SimTime` to decide what the line or
//! channel shows "now".

use crate::bridge::sink::{OutputSink, Reading};
use crate::common::hal_traits::{ByteChannel, Delay, InputLine, MonotonicClock, OutputLine, RegisterBus};
use crate::rfid::mfrc522::{crc_a, registers::*};
use crate::rfid::{CardReader, CardUid};
use core::cell::Cell;
use core::convert::Infallible;
use std::collections::VecDeque;

/// Error reported by a mock peripheral configured to fail.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockFault;

// --- Clock ---

#[derive(Debug)]
pub struct SimTime {
    now: Cell<u64>,
    step: u64,
}

impl SimTime {
    /// Clock starting at `start_us` that moves `step_us` per reading.
    pub fn new(start_us: u64, step_us: u64) -> Self {
        Self {
            now: Cell::new(start_us),
            step: step_us,
        }
    }

    /// Current time without advancing.
    pub fn peek(&self) -> u64 {
        self.now.get()
    }

    pub fn set(&self, now_us: u64) {
        self.now.set(now_us);
    }

    pub fn advance(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }
}

impl MonotonicClock for SimTime {
    fn now_us(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

impl Delay for &SimTime {
    fn delay_us(&mut self, us: u32) {
        self.advance(u64::from(us));
    }
}

// --- GPIO ---

/// Output pin recording each level change with its timestamp.
#[derive(Debug)]
pub struct TracePin<'t> {
    time: &'t SimTime,
    level: bool,
    edges: Vec<(u64, bool)>,
}

impl<'t> TracePin<'t> {
    pub fn new(time: &'t SimTime) -> Self {
        Self {
            time,
            level: false,
            edges: Vec::new(),
        }
    }

    /// Every driven level as `(time_us, high)`.
    pub fn edges(&self) -> Vec<(u64, bool)> {
        self.edges.clone()
    }

    fn drive(&mut self, high: bool) {
        self.level = high;
        self.edges.push((self.time.peek(), high));
    }
}

impl OutputLine for TracePin<'_> {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.drive(!self.level);
        Ok(())
    }
}

#[derive(Debug, Copy, Clone)]
enum EchoScript {
    Never,
    Pulse { rise_us: u64, fall_us: u64 },
    StuckHigh { from_us: u64 },
    Faulty,
}

/// Echo line whose level is a function of simulated time.
#[derive(Debug)]
pub struct ScriptedEcho<'t> {
    time: &'t SimTime,
    script: EchoScript,
}

impl<'t> ScriptedEcho<'t> {
    /// High on `[rise_us, fall_us)`.
    pub fn pulse(time: &'t SimTime, rise_us: u64, fall_us: u64) -> Self {
        Self {
            time,
            script: EchoScript::Pulse { rise_us, fall_us },
        }
    }

    pub fn never(time: &'t SimTime) -> Self {
        Self {
            time,
            script: EchoScript::Never,
        }
    }

    pub fn stuck_high_from(time: &'t SimTime, from_us: u64) -> Self {
        Self {
            time,
            script: EchoScript::StuckHigh { from_us },
        }
    }

    pub fn faulty(time: &'t SimTime) -> Self {
        Self {
            time,
            script: EchoScript::Faulty,
        }
    }
}

impl InputLine for ScriptedEcho<'_> {
    type Error = MockFault;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let now = self.time.peek();
        match self.script {
            EchoScript::Never => Ok(false),
            EchoScript::Pulse { rise_us, fall_us } => Ok(now >= rise_us && now < fall_us),
            EchoScript::StuckHigh { from_us } => Ok(now >= from_us),
            EchoScript::Faulty => Err(MockFault),
        }
    }
}

/// LED counting each kind of call.
#[derive(Debug, Default)]
pub struct CountingLed {
    level: bool,
    set_low_calls: usize,
    set_high_calls: usize,
    toggles: usize,
}

impl CountingLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_low_calls(&self) -> usize {
        self.set_low_calls
    }

    pub fn set_high_calls(&self) -> usize {
        self.set_high_calls
    }

    pub fn toggles(&self) -> usize {
        self.toggles
    }
}

impl OutputLine for CountingLed {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level = true;
        self.set_high_calls += 1;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level = false;
        self.set_low_calls += 1;
        Ok(())
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.level = !self.level;
        self.toggles += 1;
        Ok(())
    }
}

// --- Card reader ---

#[derive(Debug, Clone)]
enum ReaderScript {
    Empty,
    Card(Vec<u8>),
    Unreadable,
    BusFault,
}

/// `CardReader` with a fixed answer for every poll.
#[derive(Debug)]
pub struct ScriptedReader {
    script: ReaderScript,
    read_attempts: usize,
}

impl ScriptedReader {
    pub fn new() -> Self {
        Self {
            script: ReaderScript::Empty,
            read_attempts: 0,
        }
    }

    pub fn present_card(&mut self, uid: &[u8]) {
        self.script = ReaderScript::Card(uid.to_vec());
    }

    /// Card answers presence polls but every UID read fails.
    pub fn present_unreadable_card(&mut self) {
        self.script = ReaderScript::Unreadable;
    }

    pub fn fail_bus(&mut self) {
        self.script = ReaderScript::BusFault;
    }

    pub fn read_attempts(&self) -> usize {
        self.read_attempts
    }
}

impl CardReader for ScriptedReader {
    type Error = MockFault;

    fn is_new_card_present(&mut self) -> Result<bool, Self::Error> {
        match self.script {
            ReaderScript::Empty => Ok(false),
            ReaderScript::Card(_) | ReaderScript::Unreadable => Ok(true),
            ReaderScript::BusFault => Err(MockFault),
        }
    }

    fn read_card_serial(&mut self) -> Result<Option<CardUid>, Self::Error> {
        self.read_attempts += 1;
        match &self.script {
            ReaderScript::Card(uid) => Ok(Some(CardUid::from_slice(uid))),
            ReaderScript::Empty | ReaderScript::Unreadable => Ok(None),
            ReaderScript::BusFault => Err(MockFault),
        }
    }
}

// --- MFRC522 register model ---

const TX_CONTROL_RESET: u8 = 0x80;
const COLL_ERR: u8 = 0x08;
const SAK_MIFARE_1K: u8 = 0x08;

/// Register-level MFRC522 with one optional card in the field.
///
/// Models the FIFO, the Set1 semantics of ComIrqReg, the FlushBuffer bit
/// and StartSend with the Transceive command. Answers REQA/WUPA,
/// anticollision, SELECT and HLTA for a single 4 byte UID.
#[derive(Debug)]
pub struct SimMfrc522 {
    regs: [u8; 64],
    fifo: VecDeque<u8>,
    version: u8,
    card: Option<[u8; 4]>,
    halted: bool,
    corrupt_bcc: bool,
    collision: bool,
    bus_fault: bool,
    soft_resets: usize,
    last_frame: Vec<u8>,
}

impl SimMfrc522 {
    pub fn new() -> Self {
        let mut regs = [0u8; 64];
        regs[usize::from(TX_CONTROL_REG)] = TX_CONTROL_RESET;
        Self {
            regs,
            fifo: VecDeque::new(),
            version: VERSION_V2,
            card: None,
            halted: false,
            corrupt_bcc: false,
            collision: false,
            bus_fault: false,
            soft_resets: 0,
            last_frame: Vec::new(),
        }
    }

    pub fn place_card(&mut self, uid: [u8; 4]) {
        self.card = Some(uid);
        self.halted = false;
    }

    pub fn set_version(&mut self, version: u8) {
        self.version = version;
    }

    /// Anticollision answers carry a wrong check byte.
    pub fn corrupt_bcc(&mut self) {
        self.corrupt_bcc = true;
    }

    /// Anticollision reports a bit collision.
    pub fn raise_collision(&mut self) {
        self.collision = true;
    }

    pub fn fail_bus(&mut self) {
        self.bus_fault = true;
    }

    pub fn register(&self, reg: u8) -> u8 {
        self.regs[usize::from(reg)]
    }

    pub fn soft_resets(&self) -> usize {
        self.soft_resets
    }

    /// Last frame sent to the card.
    pub fn last_frame(&self) -> &[u8] {
        &self.last_frame
    }

    fn read_reg(&mut self, reg: u8) -> u8 {
        match reg {
            FIFO_DATA_REG => self.fifo.pop_front().unwrap_or(0),
            FIFO_LEVEL_REG => u8::try_from(self.fifo.len()).unwrap_or(u8::MAX),
            VERSION_REG => self.version,
            _ => self.regs[usize::from(reg)],
        }
    }

    fn write_reg(&mut self, reg: u8, value: u8) {
        match reg {
            COMMAND_REG if value & 0x0F == PCD_SOFT_RESET => {
                self.soft_resets += 1;
                self.regs = [0u8; 64];
                self.regs[usize::from(TX_CONTROL_REG)] = TX_CONTROL_RESET;
                self.fifo.clear();
            }
            COM_IRQ_REG => {
                let bits = value & 0x7F;
                if value & BIT7 != 0 {
                    self.regs[usize::from(reg)] |= bits;
                } else {
                    self.regs[usize::from(reg)] &= !bits;
                }
            }
            FIFO_LEVEL_REG => {
                if value & BIT7 != 0 {
                    self.fifo.clear();
                }
            }
            FIFO_DATA_REG => self.fifo.push_back(value),
            BIT_FRAMING_REG => {
                self.regs[usize::from(reg)] = value;
                if value & BIT7 != 0 && self.regs[usize::from(COMMAND_REG)] == PCD_TRANSCEIVE {
                    self.transceive();
                }
            }
            _ => self.regs[usize::from(reg)] = value,
        }
    }

    fn transceive(&mut self) {
        let frame: Vec<u8> = self.fifo.drain(..).collect();
        self.regs[usize::from(ERROR_REG)] = 0;
        let answer = self.answer(&frame);
        self.last_frame = frame;
        match answer {
            Some(bytes) => {
                self.fifo.extend(bytes);
                self.regs[usize::from(COM_IRQ_REG)] |= RX_OR_IDLE_IRQ;
            }
            None => self.regs[usize::from(COM_IRQ_REG)] |= TIMER_IRQ,
        }
    }

    fn answer(&mut self, frame: &[u8]) -> Option<Vec<u8>> {
        let uid = self.card?;
        match frame {
            [PICC_REQIDL] if !self.halted => Some(vec![0x04, 0x00]),
            [PICC_REQALL] => {
                self.halted = false;
                Some(vec![0x04, 0x00])
            }
            [PICC_SEL_CL1, PICC_ANTICOLL_NVB] if !self.halted => {
                if self.collision {
                    self.regs[usize::from(ERROR_REG)] = COLL_ERR;
                    return Some(vec![uid[0]]);
                }
                let mut check = uid.iter().fold(0u8, |acc, b| acc ^ b);
                if self.corrupt_bcc {
                    check ^= 0xFF;
                }
                let mut back = uid.to_vec();
                back.push(check);
                Some(back)
            }
            [PICC_SEL_CL1, PICC_SELECT_NVB, rest @ ..] if !self.halted && rest.len() == 7 => {
                let crc_ok = crc_a(&frame[..7]) == [frame[7], frame[8]];
                if !crc_ok || rest[..4] != uid {
                    return None;
                }
                let crc = crc_a(&[SAK_MIFARE_1K]);
                Some(vec![SAK_MIFARE_1K, crc[0], crc[1]])
            }
            [PICC_HALT, 0x00, lo, hi] => {
                if crc_a(&[PICC_HALT, 0x00]) == [*lo, *hi] {
                    self.halted = true;
                }
                None
            }
            _ => None,
        }
    }
}

impl RegisterBus for SimMfrc522 {
    type Error = MockFault;

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        if self.bus_fault {
            return Err(MockFault);
        }
        if let [address, data, ..] = words {
            if *address & 0x80 != 0 {
                *data = self.read_reg((*address >> 1) & 0x3F);
            }
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        if self.bus_fault {
            return Err(MockFault);
        }
        if let [address, value, ..] = words {
            self.write_reg((*address >> 1) & 0x3F, *value);
        }
        Ok(())
    }
}

// --- Byte channel ---

/// Duplex channel with bytes scheduled to arrive at given times.
#[derive(Debug)]
pub struct ScriptedChannel<'t> {
    time: &'t SimTime,
    inbound: VecDeque<(u64, u8)>,
    written: Vec<u8>,
    write_attempts: usize,
    reject_at: Option<usize>,
    stall_from: Option<usize>,
    fail_reads_after: Option<usize>,
    reads: usize,
}

impl<'t> ScriptedChannel<'t> {
    pub fn new(time: &'t SimTime) -> Self {
        Self {
            time,
            inbound: VecDeque::new(),
            written: Vec::new(),
            write_attempts: 0,
            reject_at: None,
            stall_from: None,
            fail_reads_after: None,
            reads: 0,
        }
    }

    /// Makes `byte` readable from `at_us` on. Call in arrival order.
    pub fn deliver_at(&mut self, at_us: u64, byte: u8) {
        self.inbound.push_back((at_us, byte));
    }

    /// The byte at position `index` of the stream is refused.
    pub fn reject_write_at(&mut self, index: usize) {
        self.reject_at = Some(index);
    }

    /// Writes from stream position `index` on never drain.
    pub fn stall_writes_from(&mut self, index: usize) {
        self.stall_from = Some(index);
    }

    /// Reads fail once `count` bytes have been delivered.
    pub fn fail_reads_after(&mut self, count: usize) {
        self.fail_reads_after = Some(count);
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    pub fn write_attempts(&self) -> usize {
        self.write_attempts
    }
}

impl ByteChannel for ScriptedChannel<'_> {
    type Error = MockFault;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        if self.fail_reads_after.is_some_and(|limit| self.reads >= limit) {
            return Err(nb::Error::Other(MockFault));
        }
        match self.inbound.front() {
            Some(&(at_us, byte)) if at_us <= self.time.peek() => {
                self.inbound.pop_front();
                self.reads += 1;
                Ok(byte)
            }
            _ => Err(nb::Error::WouldBlock),
        }
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.write_attempts += 1;
        let index = self.written.len();
        if self.reject_at == Some(index) {
            return Err(nb::Error::Other(MockFault));
        }
        if self.stall_from.is_some_and(|from| index >= from) {
            return Err(nb::Error::WouldBlock);
        }
        self.written.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}

// --- Sink ---

#[derive(Debug, Clone, PartialEq)]
enum Recorded {
    Distance(f32),
    Card(String),
}

/// Sink keeping everything it accepted.
#[derive(Debug, Default)]
pub struct RecordingSink {
    accepted: Vec<Recorded>,
    attempts: usize,
    failing: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that refuses every record.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn distances(&self) -> Vec<f32> {
        self.accepted
            .iter()
            .filter_map(|r| match r {
                Recorded::Distance(cm) => Some(*cm),
                Recorded::Card(_) => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.accepted
            .iter()
            .filter_map(|r| match r {
                Recorded::Card(text) => Some(text.clone()),
                Recorded::Distance(_) => None,
            })
            .collect()
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl OutputSink for RecordingSink {
    type Error = MockFault;

    fn publish(&mut self, reading: Reading<'_>) -> Result<(), Self::Error> {
        self.attempts += 1;
        if self.failing {
            return Err(MockFault);
        }
        self.accepted.push(match reading {
            Reading::Distance(cm) => Recorded::Distance(cm),
            Reading::CardUid(text) => Recorded::Card(text.to_string()),
        });
        Ok(())
    }
}
