// src/rfid/uid.rs

use arrayvec::{ArrayString, ArrayVec};
use core::fmt;

/// Longest UID kept from a card (triple-size ISO 14443A UIDs are 10 bytes).
pub const MAX_UID_LEN: usize = 10;
/// Capacity of the rendered UID text.
pub const UID_TEXT_CAPACITY: usize = 32;

/// Rendered UID text, bounded to [`UID_TEXT_CAPACITY`].
pub type UidText = ArrayString<UID_TEXT_CAPACITY>;

/// How bytes are joined when rendering a UID.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum HexSeparator {
    /// `0A:FF:01`
    #[default]
    Colon,
    /// `0AFF01`
    None,
}

impl HexSeparator {
    #[inline]
    const fn width(self) -> usize {
        match self {
            HexSeparator::Colon => 1,
            HexSeparator::None => 0,
        }
    }

    /// Most bytes whose rendering fits in `capacity` characters.
    pub const fn max_bytes(self, capacity: usize) -> usize {
        // n bytes take 2n + (n - 1) * sep characters
        (capacity + self.width()) / (2 + self.width())
    }
}

/// Identifier read from a card, truncated to [`MAX_UID_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CardUid {
    bytes: ArrayVec<u8, MAX_UID_LEN>,
}

impl CardUid {
    /// Builds a UID from raw bytes. Bytes beyond [`MAX_UID_LEN`] are dropped.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut uid = CardUid::default();
        let keep = bytes.len().min(MAX_UID_LEN);
        // Cannot fail: `keep` never exceeds the capacity.
        let _ = uid.bytes.try_extend_from_slice(&bytes[..keep]);
        uid
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Renders with the given separator, see [`render_hex`].
    pub fn render(&self, separator: HexSeparator) -> UidText {
        render_hex(&self.bytes, separator)
    }
}

impl fmt::Display for CardUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(HexSeparator::Colon))
    }
}

/// Upper-case, zero-padded two-digit hex per byte, separator between bytes
/// and never after the last one.
///
/// When the full rendering would not fit in [`UID_TEXT_CAPACITY`], the
/// number of input bytes rendered is capped instead; a hex pair is never cut.
pub fn render_hex(bytes: &[u8], separator: HexSeparator) -> UidText {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

    let mut out = UidText::new();
    let take = bytes.len().min(separator.max_bytes(UID_TEXT_CAPACITY));
    for (i, byte) in bytes[..take].iter().enumerate() {
        if i > 0 && separator == HexSeparator::Colon {
            out.push(':');
        }
        out.push(char::from(DIGITS[usize::from(byte >> 4)]));
        out.push(char::from(DIGITS[usize::from(byte & 0x0F)]));
    }
    out
}
