// src/rfid/mod.rs

pub mod mfrc522;
pub mod reader;
pub mod uid;

// --- Re-export key types/functions for easier access ---
pub use mfrc522::{ChipVersion, Mfrc522};
pub use reader::{poll_presence, read_identifier, scan_card, CardReader};
pub use uid::{render_hex, CardUid, HexSeparator, UidText, MAX_UID_LEN, UID_TEXT_CAPACITY};
