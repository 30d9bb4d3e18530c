//! Controller command bytes

/// Control byte: command stream follows
pub const CONTROL_COMMAND: u8 = 0x00;
/// Control byte: display data follows
pub const CONTROL_DATA: u8 = 0x40;

pub const DISPLAY_OFF: u8 = 0xAE;
pub const DISPLAY_ON: u8 = 0xAF;
pub const SET_CONTRAST: u8 = 0x81;
pub const SET_NORMAL: u8 = 0xA6;
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
pub const SET_COM_PINS: u8 = 0xDA;
pub const SET_VCOM_DETECT: u8 = 0xDB;
pub const SET_CLOCK_DIV: u8 = 0xD5;
pub const SET_PRECHARGE: u8 = 0xD9;
pub const SET_MUX_RATIO: u8 = 0xA8;
pub const SET_LOW_COLUMN: u8 = 0x00;
pub const SET_HIGH_COLUMN: u8 = 0x10;
pub const SET_PAGE_ADDR: u8 = 0xB0;
pub const SET_START_LINE: u8 = 0x40;
pub const SET_SEG_REMAP: u8 = 0xA1;
pub const SET_COM_SCAN_DEC: u8 = 0xC8;
pub const NOP: u8 = 0xE3;

/// SSD1306 charge pump setting, followed by 0x14 to enable
pub const SSD1306_CHARGE_PUMP: u8 = 0x8D;
/// SSD1306 memory addressing mode, followed by 0x02 for page mode
pub const SSD1306_ADDRESSING_MODE: u8 = 0x20;
/// SH1106 DC-DC control, followed by 0x8B to enable
pub const SH1106_DCDC: u8 = 0xAD;
