// src/bridge/card_task.rs

use super::sink::{OutputSink, Reading, TickReport};
use super::SamplingTask;
use crate::common::hal_traits::{Delay, OutputLine};
use crate::common::timing;
use crate::rfid::{poll_presence, read_identifier, CardReader, HexSeparator};
use crate::{log_debug, log_info, log_warn};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CardScanConfig {
    pub separator: HexSeparator,
    /// Log a "scanning" line every this many ticks. 0 disables it.
    pub status_interval_ticks: u32,
    /// Confirmation blinks after a successful publish. 0 disables them.
    pub blink_count: u8,
    pub blink_ms: u32,
    /// Tick period, only used to report elapsed scan time.
    pub tick_period_ms: u64,
}

impl Default for CardScanConfig {
    fn default() -> Self {
        Self {
            separator: HexSeparator::Colon,
            status_interval_ticks: timing::SCAN_STATUS_INTERVAL_TICKS,
            blink_count: timing::CARD_BLINK_COUNT,
            blink_ms: timing::CARD_BLINK_MS,
            tick_period_ms: timing::TICK_PERIOD_MS,
        }
    }
}

/// Presence-polls a card reader once per tick and publishes every UID read.
///
/// No de-duplication: a card left on the reader is published on every tick
/// it is detected and read. Debounce, if wanted, belongs in the sink.
#[derive(Debug)]
pub struct CardScanTask<R, LED, DLY> {
    reader: Option<R>,
    led: LED,
    delay: DLY,
    config: CardScanConfig,
    scan_count: u32,
}

impl<R, LED, DLY> CardScanTask<R, LED, DLY>
where
    R: CardReader,
    LED: OutputLine,
    DLY: Delay,
{
    pub fn new(reader: R, led: LED, delay: DLY) -> Self {
        Self::with_config(Some(reader), led, delay, CardScanConfig::default())
    }

    /// `reader` is `None` when reader bring-up failed; ticks then only
    /// drive the heartbeat.
    pub fn with_config(reader: Option<R>, led: LED, delay: DLY, config: CardScanConfig) -> Self {
        Self {
            reader,
            led,
            delay,
            config,
            scan_count: 0,
        }
    }

    /// Ticks run so far.
    pub fn scan_count(&self) -> u32 {
        self.scan_count
    }

    pub fn release(self) -> (Option<R>, LED, DLY) {
        (self.reader, self.led, self.delay)
    }

    fn heartbeat(&mut self) {
        self.scan_count = self.scan_count.wrapping_add(1);
        // Heartbeat is cosmetic; a failing LED must not stop scanning.
        let _ = self.led.toggle();

        let interval = self.config.status_interval_ticks;
        if interval != 0 && self.scan_count % interval == 0 {
            let seconds = u64::from(self.scan_count) * self.config.tick_period_ms / 1000;
            log_info!("scanning for cards... ({} s)", seconds);
        }
    }

    fn blink(&mut self) {
        for _ in 0..self.config.blink_count {
            let _ = self.led.set_high();
            self.delay.delay_ms(self.config.blink_ms);
            let _ = self.led.set_low();
            self.delay.delay_ms(self.config.blink_ms);
        }
    }
}

impl<R, LED, DLY> SamplingTask for CardScanTask<R, LED, DLY>
where
    R: CardReader,
    LED: OutputLine,
    DLY: Delay,
{
    fn tick<S: OutputSink>(&mut self, sink: &mut S) -> TickReport {
        self.heartbeat();

        let Some(reader) = self.reader.as_mut() else {
            return TickReport::NoReader;
        };
        if !poll_presence(reader) {
            return TickReport::NoCard;
        }
        log_debug!("card detected");

        let Some(uid) = read_identifier(reader) else {
            return TickReport::ReadFailed;
        };
        let text = uid.render(self.config.separator);

        match sink.publish(Reading::CardUid(text.as_str())) {
            Ok(()) => {
                log_info!("published card {}", text.as_str());
                self.blink();
                TickReport::Published
            }
            Err(_) => {
                log_warn!("card publish failed");
                TickReport::PublishFailed
            }
        }
    }
}
