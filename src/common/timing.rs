// src/common/timing.rs

// All durations are nominal. The sensor side has its own tolerances; the
// values here are what this firmware drives or waits for.

// === HC-SR04 ranging ===

/// Low time on the trigger line before the start pulse, lets the line settle.
pub const TRIGGER_SETTLE_US: u32 = 2;
/// Width of the trigger pulse. The sensor's own state machine keys off this.
pub const TRIGGER_PULSE_US: u32 = 10;
/// Bound for each echo edge wait. Time-of-flight for ~5 m plus margin.
pub const ECHO_TIMEOUT_US: u64 = 30_000;
/// Speed of sound, 340 m/s expressed in cm per microsecond.
pub const SPEED_OF_SOUND_CM_PER_US: f64 = 0.034;
/// Shortest distance the sensor is rated for.
pub const MIN_RANGE_CM: f32 = 2.0;
/// Longest distance the sensor is rated for.
pub const MAX_RANGE_CM: f32 = 400.0;

// === Orchestration ===

/// Period between sampling ticks (10 Hz).
pub const TICK_PERIOD_MS: u64 = 100;
/// Card scanning logs a status line every this many ticks (10 s at 10 Hz).
pub const SCAN_STATUS_INTERVAL_TICKS: u32 = 100;
/// Number of LED blinks confirming a published card read.
pub const CARD_BLINK_COUNT: u8 = 3;
/// On and off time of each confirmation blink.
pub const CARD_BLINK_MS: u32 = 100;

// === MFRC522 ===

/// Settle time after a soft reset before the chip accepts configuration.
pub const READER_RESET_SETTLE_MS: u32 = 50;
/// Number of ComIrqReg polls before a transceive is abandoned.
pub const TRANSCEIVE_POLL_LIMIT: u16 = 2000;

// === Transport ===

/// Upper bound for the channel to accept a single byte before the write
/// is treated as rejected.
pub const WRITE_BYTE_TIMEOUT_US: u64 = 10_000;
