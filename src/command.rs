//! Controller command definitions
//!
//! Command bytes for the SSD1306/SH1106 OLED controllers and for an HD44780
//! character LCD driven through a PCF8574T I/O expander.
//!
//! ## OLED Transfer Structure
//!
//! Every I2C transfer to an SSD1306 or SH1106 starts with a control byte:
//! 1. [`COMMAND_MODE`] followed by one command byte
//! 2. [`DATA_MODE`] followed by display RAM bytes
//!
//! The SH1106 accepts the same page-addressing commands as the SSD1306 but
//! has 132 columns of RAM. On SH1106 panels every column address is shifted by
//! [`SH1106_COLUMN_OFFSET`].

// OLED control bytes

/// Control byte announcing a command (0x00)
pub const COMMAND_MODE: u8 = 0x00;

/// Control byte announcing display RAM data (0x40)
pub const DATA_MODE: u8 = 0x40;

// OLED addressing commands

/// Set lower nibble of the column start address, page addressing mode (0x00)
pub const SET_LOW_COLUMN: u8 = 0x00;

/// Set upper nibble of the column start address, page addressing mode (0x10)
pub const SET_HIGH_COLUMN: u8 = 0x10;

/// Set memory addressing mode (0x20)
///
/// Requires 1 byte: 0x00 = horizontal, 0x01 = vertical, 0x02 = page
pub const SET_MEMORY_MODE: u8 = 0x20;

/// Set display start line, OR'd with line 0-63 (0x40)
pub const SET_START_LINE: u8 = 0x40;

/// Set page start address, OR'd with page 0-7 (0xB0)
pub const SET_START_PAGE: u8 = 0xB0;

// OLED panel configuration commands

/// Set contrast (0x81), requires 1 byte
pub const SET_CONTRAST: u8 = 0x81;

/// Charge pump setting (0x8D), requires 1 byte: 0x14 = enable
pub const SET_CHARGE_PUMP: u8 = 0x8D;

/// Segment remap, OR'd with 0x01 to map column 127 to SEG0 (0xA0)
pub const SEGMENT_REMAP: u8 = 0xA0;

/// Display follows RAM content (0xA4)
pub const OUTPUT_RAM: u8 = 0xA4;

/// Non-inverted display (0xA6)
pub const DISPLAY_NORMAL: u8 = 0xA6;

/// Set multiplex ratio (0xA8), requires 1 byte: rows - 1
pub const SET_MULTIPLEX: u8 = 0xA8;

/// Display off, sleep mode (0xAE)
pub const DISPLAY_OFF: u8 = 0xAE;

/// Display on (0xAF)
pub const DISPLAY_ON: u8 = 0xAF;

/// COM output scan direction, remapped (0xC8)
pub const COM_SCAN_DEC: u8 = 0xC8;

/// Set display offset (0xD3), requires 1 byte
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;

/// Set display clock divide ratio (0xD5), requires 1 byte
pub const SET_DISPLAY_CLOCK_DIV: u8 = 0xD5;

/// Set pre-charge period (0xD9), requires 1 byte
pub const SET_PRECHARGE: u8 = 0xD9;

/// Set COM pins hardware configuration (0xDA), requires 1 byte
pub const SET_COM_PINS: u8 = 0xDA;

/// Set VCOMH deselect level (0xDB), requires 1 byte
pub const SET_VCOM_DETECT: u8 = 0xDB;

/// Visible panel width in pixels
pub const OLED_WIDTH: u8 = 128;

/// Column offset of the visible area on an SH1106
pub const SH1106_COLUMN_OFFSET: u8 = 4;

/// First column past the visible area, used for controller detection
pub const PROBE_COLUMN: u8 = OLED_WIDTH;

/// Initialisation sequence for 128x64 panels (1/64 multiplex)
pub const INIT_128X64: &[u8] = &[
    DISPLAY_OFF,
    SET_DISPLAY_CLOCK_DIV,
    0x80,
    SET_MULTIPLEX,
    0x3F,
    SET_DISPLAY_OFFSET,
    0x00,
    SET_START_LINE,
    SET_CHARGE_PUMP,
    0x14,
    SET_MEMORY_MODE,
    0x00,
    SEGMENT_REMAP | 0x01,
    COM_SCAN_DEC,
    SET_COM_PINS,
    0x12,
    SET_CONTRAST,
    0x7F,
    SET_PRECHARGE,
    0xF1,
    SET_VCOM_DETECT,
    0x40,
    OUTPUT_RAM,
    DISPLAY_NORMAL,
];

/// Initialisation sequence for 128x32 panels and 128x64 panels run as 4 rows
pub const INIT_128X32: &[u8] = &[
    DISPLAY_OFF,
    SET_DISPLAY_CLOCK_DIV,
    0x80,
    SET_MULTIPLEX,
    0x1F,
    SET_DISPLAY_OFFSET,
    0x00,
    SET_START_LINE,
    SET_CHARGE_PUMP,
    0x14,
    SET_MEMORY_MODE,
    0x00,
    SEGMENT_REMAP | 0x01,
    COM_SCAN_DEC,
    SET_COM_PINS,
    0x02,
    SET_CONTRAST,
    0x7F,
    SET_PRECHARGE,
    0xF1,
    SET_VCOM_DETECT,
    0x40,
    OUTPUT_RAM,
    DISPLAY_NORMAL,
];

// HD44780 instructions

/// Clear display, cursor home (0x01). Takes 1.52ms.
pub const LCD_CLEAR_DISPLAY: u8 = 0x01;

/// Entry mode set (0x04)
pub const LCD_ENTRY_MODE_SET: u8 = 0x04;

/// Entry mode flag: move cursor right after each character
pub const LCD_ENTRY_LEFT: u8 = 0x02;

/// Display control (0x08)
pub const LCD_DISPLAY_CONTROL: u8 = 0x08;

/// Display control flag: display on
pub const LCD_DISPLAY_ON: u8 = 0x04;

/// Display control flag: underline cursor on
pub const LCD_CURSOR_ON: u8 = 0x02;

/// Display control flag: blinking block cursor on
pub const LCD_BLINK_ON: u8 = 0x01;

/// Function set (0x20)
pub const LCD_FUNCTION_SET: u8 = 0x20;

/// Function set flag: 8-bit interface
pub const LCD_8BIT_MODE: u8 = 0x10;

/// Function set flag: 2 line display
pub const LCD_2LINE: u8 = 0x08;

/// Set DDRAM address (0x80), OR'd with the address
pub const LCD_SET_DDRAM_ADDR: u8 = 0x80;

// PCF8574T pin mapping

/// Register select (P0): high for data, low for instructions
pub const PCF8574T_RS: u8 = 0x01;

/// Enable strobe (P2)
pub const PCF8574T_EN: u8 = 0x04;

/// Backlight transistor (P3)
pub const PCF8574T_BACKLIGHT: u8 = 0x08;

// MCP23017 registers (IOCON.BANK = 0)

/// Port A direction register
pub const MCP23017_IODIRA: u8 = 0x00;

/// Port A output latch; port B follows with sequential addressing
pub const MCP23017_GPIOA: u8 = 0x12;
