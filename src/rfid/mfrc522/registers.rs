// src/rfid/mfrc522/registers.rs

// Register map, command set and the PICC commands we use.
// See NXP MFRC522 datasheet rev 3.9, Section 9 "MFRC522 registers",
// and ISO/IEC 14443-3 for the card side.

// === Registers ===
pub const COMMAND_REG: u8 = 0x01;
pub const COM_IEN_REG: u8 = 0x02;
pub const COM_IRQ_REG: u8 = 0x04;
pub const ERROR_REG: u8 = 0x06;
pub const FIFO_DATA_REG: u8 = 0x09;
pub const FIFO_LEVEL_REG: u8 = 0x0A;
pub const BIT_FRAMING_REG: u8 = 0x0D;
pub const MODE_REG: u8 = 0x11;
pub const TX_CONTROL_REG: u8 = 0x14;
pub const TX_ASK_REG: u8 = 0x15;
pub const RF_CFG_REG: u8 = 0x26;
pub const T_MODE_REG: u8 = 0x2A;
pub const T_PRESCALER_REG: u8 = 0x2B;
pub const T_RELOAD_REG_H: u8 = 0x2C;
pub const T_RELOAD_REG_L: u8 = 0x2D;
pub const VERSION_REG: u8 = 0x37;

// === PCD commands (CommandReg) ===
pub const PCD_IDLE: u8 = 0x00;
pub const PCD_TRANSCEIVE: u8 = 0x0C;
pub const PCD_SOFT_RESET: u8 = 0x0F;

// === Bits ===
/// ComIEnReg: IRQ pin inverted, all sources but HiAlert enabled.
pub const IRQ_ENABLE: u8 = 0x77 | 0x80;
/// ComIrqReg / FIFOLevelReg / BitFramingReg high bit (Set1, FlushBuffer, StartSend).
pub const BIT7: u8 = 0x80;
pub const TIMER_IRQ: u8 = 0x01;
/// RxIRq | IdleIRq
pub const RX_OR_IDLE_IRQ: u8 = 0x30;
/// BufferOvfl | ColErr | ParityErr | ProtocolErr
pub const ERROR_MASK: u8 = 0x1B;
pub const ANTENNA_DRIVERS: u8 = 0x03;
/// RxGain 48 dB
pub const RX_GAIN_MAX: u8 = 0x07 << 4;

// === Timer / modulation setup, applied after soft reset ===
pub const T_MODE_AUTO: u8 = 0x80;
pub const T_PRESCALER: u8 = 0xA9;
pub const T_RELOAD_H: u8 = 0x03;
pub const T_RELOAD_L: u8 = 0xE8;
/// Force 100% ASK modulation.
pub const TX_ASK_100: u8 = 0x40;
/// CRC preset 0x6363, transmitter waits for RF field.
pub const MODE_CRC_6363: u8 = 0x3D;

// === PICC commands ===
pub const PICC_REQIDL: u8 = 0x26;
pub const PICC_REQALL: u8 = 0x52;
pub const PICC_SEL_CL1: u8 = 0x93;
pub const PICC_ANTICOLL_NVB: u8 = 0x20;
pub const PICC_SELECT_NVB: u8 = 0x70;
pub const PICC_HALT: u8 = 0x50;

/// REQA/WUPA are short frames of 7 bits.
pub const SHORT_FRAME_BITS: u8 = 0x07;

// === VersionReg values ===
pub const VERSION_V1: u8 = 0x91;
pub const VERSION_V2: u8 = 0x92;
