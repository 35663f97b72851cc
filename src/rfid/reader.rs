// src/rfid/reader.rs

use super::uid::{render_hex, CardUid, HexSeparator, UidText};
use core::fmt::Debug;
use crate::{log_debug, log_warn};

/// A contactless reader able to report new cards and read their UID.
pub trait CardReader {
    type Error: Debug;

    /// Single non-blocking presence check. `Ok(true)` means a card answered
    /// this time.
    fn is_new_card_present(&mut self) -> Result<bool, Self::Error>;

    /// Selects the detected card and reads its UID. `Ok(None)` is a protocol
    /// failure (collision, bad check byte, no answer to select).
    fn read_card_serial(&mut self) -> Result<Option<CardUid>, Self::Error>;
}

/// Presence check that folds reader errors into "no card this tick".
pub fn poll_presence<R: CardReader>(reader: &mut R) -> bool {
    match reader.is_new_card_present() {
        Ok(present) => present,
        Err(_) => {
            log_warn!("card presence check failed");
            false
        }
    }
}

/// UID read that folds every failure into `None`.
pub fn read_identifier<R: CardReader>(reader: &mut R) -> Option<CardUid> {
    match reader.read_card_serial() {
        Ok(Some(uid)) => Some(uid),
        Ok(None) => {
            log_debug!("card select/anticollision failed");
            None
        }
        Err(_) => {
            log_warn!("card read failed on the bus");
            None
        }
    }
}

/// One presence-poll cycle: detect, read, render. `None` when no card was
/// present or it could not be read.
pub fn scan_card<R: CardReader>(reader: &mut R, separator: HexSeparator) -> Option<UidText> {
    if !poll_presence(reader) {
        return None;
    }
    read_identifier(reader).map(|uid| render_hex(uid.as_bytes(), separator))
}
