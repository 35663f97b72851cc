// src/rfid/mfrc522/mod.rs

//! MFRC522 reader driver over a chip-select-managed register bus.
//!
//! Covers what a UID scanner needs: reset and RF setup, REQA presence,
//! cascade level 1 anticollision, SELECT and HLTA. Single-size (4 byte)
//! UIDs only.

pub mod registers;

use self::registers::*;
use super::reader::CardReader;
use super::uid::CardUid;
use crate::common::{
    error::BridgeError,
    hal_traits::{Delay, RegisterBus},
    timing,
};
use crate::{log_info, log_warn};
use crc::{Crc, CRC_16_ISO_IEC_14443_3_A};

const CRC_A: Crc<u16> = Crc::<u16>::new(&CRC_16_ISO_IEC_14443_3_A);

/// ISO 14443-3 CRC_A of `data`, in transmission order (LSB first).
#[inline]
pub fn crc_a(data: &[u8]) -> [u8; 2] {
    CRC_A.checksum(data).to_le_bytes()
}

/// Block check character of a cascade level UID: XOR of its bytes.
#[inline]
pub fn bcc(uid: &[u8]) -> u8 {
    uid.iter().fold(0, |acc, b| acc ^ b)
}

/// Firmware version as reported by VersionReg.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ChipVersion {
    V1,
    V2,
    /// 0x00 or 0xFF: MISO stuck low or floating, check wiring.
    NoResponse(u8),
    Unknown(u8),
}

impl ChipVersion {
    pub fn from_register(value: u8) -> Self {
        match value {
            VERSION_V1 => ChipVersion::V1,
            VERSION_V2 => ChipVersion::V2,
            0x00 | 0xFF => ChipVersion::NoResponse(value),
            other => ChipVersion::Unknown(other),
        }
    }

    #[inline]
    pub fn is_genuine(&self) -> bool {
        matches!(self, ChipVersion::V1 | ChipVersion::V2)
    }
}

type Mfrc522Result<T, E> = Result<T, BridgeError<E>>;

#[derive(Debug)]
pub struct Mfrc522<BUS, DLY> {
    bus: BUS,
    delay: DLY,
}

impl<BUS, DLY> Mfrc522<BUS, DLY>
where
    BUS: RegisterBus,
    DLY: Delay,
{
    pub fn new(bus: BUS, delay: DLY) -> Self {
        Mfrc522 { bus, delay }
    }

    /// Soft reset, timer and modulation setup, antenna on at max gain.
    /// Returns the chip version read afterwards.
    pub fn init(&mut self) -> Mfrc522Result<ChipVersion, BUS::Error> {
        self.write_register(COMMAND_REG, PCD_SOFT_RESET)?;
        self.delay.delay_ms(timing::READER_RESET_SETTLE_MS);

        self.write_register(T_MODE_REG, T_MODE_AUTO)?;
        self.write_register(T_PRESCALER_REG, T_PRESCALER)?;
        self.write_register(T_RELOAD_REG_H, T_RELOAD_H)?;
        self.write_register(T_RELOAD_REG_L, T_RELOAD_L)?;
        self.write_register(TX_ASK_REG, TX_ASK_100)?;
        self.write_register(MODE_REG, MODE_CRC_6363)?;
        self.antenna_on()?;

        let version = self.version()?;
        match version {
            ChipVersion::V1 | ChipVersion::V2 => log_info!("MFRC522 ready"),
            ChipVersion::NoResponse(_) => log_warn!("MFRC522 not responding, check wiring"),
            ChipVersion::Unknown(_) => log_warn!("MFRC522 unknown version"),
        }
        Ok(version)
    }

    pub fn version(&mut self) -> Mfrc522Result<ChipVersion, BUS::Error> {
        Ok(ChipVersion::from_register(self.read_register(VERSION_REG)?))
    }

    pub fn antenna_on(&mut self) -> Mfrc522Result<(), BUS::Error> {
        let value = self.read_register(TX_CONTROL_REG)?;
        if value & ANTENNA_DRIVERS != ANTENNA_DRIVERS {
            self.write_register(TX_CONTROL_REG, value | ANTENNA_DRIVERS)?;
        }
        self.write_register(RF_CFG_REG, RX_GAIN_MAX)?;
        Ok(())
    }

    pub fn antenna_off(&mut self) -> Mfrc522Result<(), BUS::Error> {
        self.clear_bitmask(TX_CONTROL_REG, ANTENNA_DRIVERS)?;
        Ok(())
    }

    /// REQA (`PICC_REQIDL`) or WUPA (`PICC_REQALL`). Returns the ATQA.
    ///
    /// `Timeout` means no card answered.
    pub fn request(&mut self, mode: u8) -> Mfrc522Result<[u8; 2], BUS::Error> {
        let mut atqa = [0u8; 2];
        let len = self.transceive(&[mode], SHORT_FRAME_BITS, &mut atqa)?;
        if len != atqa.len() {
            return Err(BridgeError::Protocol);
        }
        Ok(atqa)
    }

    /// Cascade level 1 anticollision. Returns the 4 UID bytes after checking BCC.
    pub fn anticoll(&mut self) -> Mfrc522Result<[u8; 4], BUS::Error> {
        let mut back = [0u8; 5];
        let len = self.transceive(&[PICC_SEL_CL1, PICC_ANTICOLL_NVB], 0, &mut back)?;
        if len != back.len() {
            return Err(BridgeError::Protocol);
        }
        let calculated = bcc(&back[..4]);
        if calculated != back[4] {
            return Err(BridgeError::ChecksumMismatch {
                expected: u16::from(back[4]),
                calculated: u16::from(calculated),
            });
        }
        Ok([back[0], back[1], back[2], back[3]])
    }

    /// SELECT at cascade level 1. Returns the SAK after checking its CRC_A.
    pub fn select(&mut self, uid: &[u8; 4]) -> Mfrc522Result<u8, BUS::Error> {
        let mut frame = [0u8; 9];
        frame[0] = PICC_SEL_CL1;
        frame[1] = PICC_SELECT_NVB;
        frame[2..6].copy_from_slice(uid);
        frame[6] = bcc(uid);
        let crc = crc_a(&frame[..7]);
        frame[7..9].copy_from_slice(&crc);

        let mut back = [0u8; 3];
        let len = self.transceive(&frame, 0, &mut back)?;
        if len != back.len() {
            return Err(BridgeError::Protocol);
        }
        let expected = u16::from_le_bytes([back[1], back[2]]);
        let calculated = u16::from_le_bytes(crc_a(&back[..1]));
        if expected != calculated {
            return Err(BridgeError::ChecksumMismatch { expected, calculated });
        }
        Ok(back[0])
    }

    /// HLTA. A halted card stays silent, so "no answer" is success.
    pub fn halt(&mut self) -> Mfrc522Result<(), BUS::Error> {
        let mut frame = [PICC_HALT, 0x00, 0, 0];
        let crc = crc_a(&frame[..2]);
        frame[2..4].copy_from_slice(&crc);

        let mut back = [0u8; 1];
        match self.transceive(&frame, 0, &mut back) {
            Err(BridgeError::Timeout) => Ok(()),
            Err(e) => Err(e),
            Ok(_) => Err(BridgeError::Protocol),
        }
    }

    /// Sends `frame` through the FIFO and collects the answer into `response`.
    ///
    /// The IRQ wait is bounded by `TRANSCEIVE_POLL_LIMIT` register reads.
    fn transceive(&mut self, frame: &[u8], tx_last_bits: u8, response: &mut [u8]) -> Mfrc522Result<usize, BUS::Error> {
        self.write_register(BIT_FRAMING_REG, tx_last_bits)?;
        self.write_register(COM_IEN_REG, IRQ_ENABLE)?;
        self.clear_bitmask(COM_IRQ_REG, BIT7)?;
        self.set_bitmask(FIFO_LEVEL_REG, BIT7)?;
        self.write_register(COMMAND_REG, PCD_IDLE)?;

        for &byte in frame {
            self.write_register(FIFO_DATA_REG, byte)?;
        }
        self.write_register(COMMAND_REG, PCD_TRANSCEIVE)?;
        self.set_bitmask(BIT_FRAMING_REG, BIT7)?;

        let mut answered = false;
        for _ in 0..timing::TRANSCEIVE_POLL_LIMIT {
            let irq = self.read_register(COM_IRQ_REG)?;
            if irq & RX_OR_IDLE_IRQ != 0 {
                answered = true;
                break;
            }
            if irq & TIMER_IRQ != 0 {
                break;
            }
        }
        self.clear_bitmask(BIT_FRAMING_REG, BIT7)?;

        if !answered {
            return Err(BridgeError::Timeout);
        }
        if self.read_register(ERROR_REG)? & ERROR_MASK != 0 {
            return Err(BridgeError::Protocol);
        }

        let level = usize::from(self.read_register(FIFO_LEVEL_REG)?);
        if level > response.len() {
            return Err(BridgeError::BufferOverflow {
                needed: level,
                got: response.len(),
            });
        }
        for slot in response[..level].iter_mut() {
            *slot = self.read_register(FIFO_DATA_REG)?;
        }
        Ok(level)
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, BUS::Error> {
        let mut words = [0x80 | ((reg << 1) & 0x7E), 0x00];
        self.bus.transfer_in_place(&mut words)?;
        Ok(words[1])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), BUS::Error> {
        self.bus.write(&[(reg << 1) & 0x7E, value])
    }

    fn set_bitmask(&mut self, reg: u8, mask: u8) -> Result<(), BUS::Error> {
        let value = self.read_register(reg)?;
        self.write_register(reg, value | mask)
    }

    fn clear_bitmask(&mut self, reg: u8, mask: u8) -> Result<(), BUS::Error> {
        let value = self.read_register(reg)?;
        self.write_register(reg, value & !mask)
    }

    pub fn release(self) -> (BUS, DLY) {
        (self.bus, self.delay)
    }
}

impl<BUS, DLY> CardReader for Mfrc522<BUS, DLY>
where
    BUS: RegisterBus,
    DLY: Delay,
{
    type Error = BridgeError<BUS::Error>;

    fn is_new_card_present(&mut self) -> Result<bool, Self::Error> {
        match self.request(PICC_REQIDL) {
            Ok(_) => Ok(true),
            Err(e) if e.is_transient() => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn read_card_serial(&mut self) -> Result<Option<CardUid>, Self::Error> {
        let uid = match self.anticoll() {
            Ok(uid) => uid,
            Err(e) if e.is_transient() => return Ok(None),
            Err(e) => return Err(e),
        };
        match self.select(&uid) {
            Ok(_sak) => Ok(Some(CardUid::from_slice(&uid))),
            Err(e) if e.is_transient() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
