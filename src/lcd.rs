//! HD44780 character LCD behind a PCF8574T I2C backpack
//!
//! The PCF8574T is a plain 8-bit output port. The LCD runs in 4-bit mode with
//! the data nibble on P4-P7 and control lines on the low nibble:
//!
//! | Bit | Signal    |
//! |-----|-----------|
//! | P0  | RS        |
//! | P2  | EN        |
//! | P3  | Backlight |
//! | P4-P7 | D4-D7   |
//!
//! A byte is clocked in as two nibbles, each latched on the falling edge of
//! EN. Both nibbles of one byte go out in a single I2C transfer.

use embedded_hal::delay::DelayNs;

use crate::backend::TextDisplay;
use crate::command::{
    LCD_2LINE, LCD_8BIT_MODE, LCD_BLINK_ON, LCD_CLEAR_DISPLAY, LCD_CURSOR_ON,
    LCD_DISPLAY_CONTROL, LCD_DISPLAY_ON, LCD_ENTRY_LEFT, LCD_ENTRY_MODE_SET, LCD_FUNCTION_SET,
    LCD_SET_DDRAM_ADDR, PCF8574T_BACKLIGHT, PCF8574T_EN, PCF8574T_RS,
};
use crate::config::{CursorMode, DisplayType, LcdPanel};
use crate::error::Error;
use crate::font::{FIRST_CHAR, LAST_CHAR};
use crate::interface::DisplayInterface;

type LcdResult<I> = core::result::Result<(), Error<I>>;

/// Character LCD backend
pub struct Lcd<I: DisplayInterface> {
    interface: I,
    panel: LcdPanel,
    /// Backlight bit OR'd into every expander write
    backlight: u8,
    /// Last display control flags sent
    display_control: u8,
    column: u8,
    row: u8,
}

impl<I> Lcd<I>
where
    I: DisplayInterface,
{
    /// Create a backend for `panel`
    pub fn new(interface: I, panel: LcdPanel) -> Self {
        Self {
            interface,
            panel,
            backlight: PCF8574T_BACKLIGHT,
            display_control: LCD_DISPLAY_ON,
            column: 0,
            row: 0,
        }
    }

    /// Run the 4-bit initialisation by instruction, clear and turn on
    ///
    /// # Errors
    ///
    /// [`Error::NotPresent`] if the backpack does not acknowledge.
    pub fn start<D: DelayNs>(&mut self, delay: &mut D) -> LcdResult<I> {
        if !self.interface.is_present().map_err(Error::Interface)? {
            return Err(Error::NotPresent {
                address: self.interface.address(),
            });
        }

        // Power-on settling time
        delay.delay_ms(50);

        let wake = LCD_FUNCTION_SET | LCD_8BIT_MODE;
        self.write_nibble(wake, false)?;
        delay.delay_ms(5);
        self.write_nibble(wake, false)?;
        delay.delay_us(150);
        self.write_nibble(wake, false)?;
        self.write_nibble(LCD_FUNCTION_SET, false)?;

        self.command(LCD_FUNCTION_SET | LCD_2LINE)?;
        self.display_control = LCD_DISPLAY_ON;
        self.command(LCD_DISPLAY_CONTROL | self.display_control)?;
        self.cls(delay)?;
        self.command(LCD_ENTRY_MODE_SET | LCD_ENTRY_LEFT)?;

        log::debug!(
            "LCD {:?} at {:#04x}",
            self.panel,
            self.interface.address()
        );
        Ok(())
    }

    /// Clear the display and home the cursor
    pub fn cls<D: DelayNs>(&mut self, delay: &mut D) -> LcdResult<I> {
        self.command(LCD_CLEAR_DISPLAY)?;
        delay.delay_ms(2);
        self.column = 0;
        self.row = 0;
        Ok(())
    }

    /// Write one character at the cursor
    ///
    /// Codes outside 32..=127 are shown as a space. Reaching the end of a row
    /// moves to the start of the next; past the last cell characters are dropped.
    pub fn put_char(&mut self, code: u8) -> LcdResult<I> {
        if self.column >= self.panel.columns() {
            return Ok(());
        }

        let shown = if (FIRST_CHAR..=LAST_CHAR).contains(&code) {
            code
        } else {
            b' '
        };
        self.send(shown, true)?;
        self.column += 1;

        if self.column == self.panel.columns() && self.row + 1 < self.panel.rows() {
            self.set_cursor_pos(0, self.row + 1)?;
        }
        Ok(())
    }

    /// Write `data` from the cursor, clamped to the rest of the current row
    pub fn text(&mut self, data: &[u8]) -> LcdResult<I> {
        let remaining = self.panel.columns().saturating_sub(self.column) as usize;
        for &code in data.iter().take(remaining) {
            self.put_char(code)?;
        }
        Ok(())
    }

    /// Move the cursor to `(column, row)`; out-of-range positions are ignored
    pub fn set_cursor_pos(&mut self, column: u8, row: u8) -> LcdResult<I> {
        if column >= self.panel.columns() || row >= self.panel.rows() {
            return Ok(());
        }

        let offset = self.panel.row_offsets()[row as usize];
        self.command(LCD_SET_DDRAM_ADDR | (offset + column))?;
        self.column = column;
        self.row = row;
        Ok(())
    }

    /// Blank line `line` (1-based)
    pub fn clear_line(&mut self, line: u8) -> LcdResult<I> {
        if line == 0 || line > self.panel.rows() {
            return Ok(());
        }

        let row = line - 1;
        self.set_cursor_pos(0, row)?;
        for _ in 0..self.panel.columns() {
            self.send(b' ', true)?;
        }
        self.set_cursor_pos(0, row)
    }

    /// Display and backlight off (`true`) or on (`false`)
    pub fn set_sleep(&mut self, sleep: bool) -> LcdResult<I> {
        if sleep {
            self.backlight = 0;
            self.display_control &= !LCD_DISPLAY_ON;
        } else {
            self.backlight = PCF8574T_BACKLIGHT;
            self.display_control |= LCD_DISPLAY_ON;
        }
        self.command(LCD_DISPLAY_CONTROL | self.display_control)
    }

    /// Underline (`On`) or blinking block (`Blink`) cursor
    pub fn set_cursor(&mut self, mode: CursorMode) -> LcdResult<I> {
        self.display_control &= !(LCD_CURSOR_ON | LCD_BLINK_ON);
        self.display_control |= match mode {
            CursorMode::Off => 0,
            CursorMode::On => LCD_CURSOR_ON,
            CursorMode::Blink => LCD_CURSOR_ON | LCD_BLINK_ON,
        };
        self.command(LCD_DISPLAY_CONTROL | self.display_control)
    }

    /// Log the cursor position; the LCD keeps no shadow copy
    pub fn dump(&self) {
        log::debug!(
            "LCD {:?}: cursor at column {}, row {}",
            self.panel,
            self.column,
            self.row
        );
    }

    /// Character LCD module type
    pub fn panel(&self) -> LcdPanel {
        self.panel
    }

    /// Give back the interface
    pub fn release(self) -> I {
        self.interface
    }

    fn command(&mut self, instruction: u8) -> LcdResult<I> {
        self.send(instruction, false)
    }

    fn send(&mut self, byte: u8, data: bool) -> LcdResult<I> {
        let flags = self.flags(data);
        let high = (byte & 0xF0) | flags;
        let low = (byte << 4) | flags;
        self.interface
            .write_raw(&[high | PCF8574T_EN, high, low | PCF8574T_EN, low])
            .map_err(Error::Interface)
    }

    /// Clock in the high nibble of `bits` only, used before 4-bit mode is set
    fn write_nibble(&mut self, bits: u8, data: bool) -> LcdResult<I> {
        let nibble = (bits & 0xF0) | self.flags(data);
        self.interface
            .write_raw(&[nibble | PCF8574T_EN, nibble])
            .map_err(Error::Interface)
    }

    fn flags(&self, data: bool) -> u8 {
        self.backlight | if data { PCF8574T_RS } else { 0 }
    }
}

impl<I: DisplayInterface> TextDisplay for Lcd<I> {
    type Error = Error<I>;

    fn kind(&self) -> DisplayType {
        self.panel().into()
    }

    fn columns(&self) -> u8 {
        self.panel().columns()
    }

    fn rows(&self) -> u8 {
        self.panel().rows()
    }

    fn start<D: DelayNs>(&mut self, delay: &mut D) -> LcdResult<I> {
        Lcd::start(self, delay)
    }

    fn cls<D: DelayNs>(&mut self, delay: &mut D) -> LcdResult<I> {
        Lcd::cls(self, delay)
    }

    fn put_char(&mut self, code: u8) -> LcdResult<I> {
        Lcd::put_char(self, code)
    }

    fn text(&mut self, data: &[u8]) -> LcdResult<I> {
        Lcd::text(self, data)
    }

    fn set_cursor_pos(&mut self, column: u8, row: u8) -> LcdResult<I> {
        Lcd::set_cursor_pos(self, column, row)
    }

    fn clear_line(&mut self, line: u8) -> LcdResult<I> {
        Lcd::clear_line(self, line)
    }

    fn set_cursor(&mut self, mode: CursorMode) -> LcdResult<I> {
        Lcd::set_cursor(self, mode)
    }

    fn set_sleep(&mut self, sleep: bool) -> LcdResult<I> {
        Lcd::set_sleep(self, sleep)
    }

    fn dump(&self) {
        Lcd::dump(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::Interface;
    use crate::mock::{MockBus, MockDelay};
    use alloc::vec;
    use alloc::vec::Vec;

    const ADDRESS: u8 = 0x27;

    fn started(panel: LcdPanel) -> Lcd<Interface<MockBus>> {
        let bus = MockBus::with_devices(&[ADDRESS]);
        let mut lcd = Lcd::new(Interface::new(bus, ADDRESS), panel);
        lcd.start(&mut MockDelay).unwrap();
        lcd.interface.i2c_mut().clear_log();
        lcd
    }

    /// Reassemble the bytes clocked into the HD44780 as `(rs, byte)` pairs
    fn decoded(lcd: Lcd<Interface<MockBus>>) -> Vec<(bool, u8)> {
        lcd.release()
            .release()
            .writes_to(ADDRESS)
            .iter()
            .filter(|w| w.len() == 4)
            .map(|w| (w[1] & PCF8574T_RS != 0, (w[1] & 0xF0) | (w[3] >> 4)))
            .collect()
    }

    #[test]
    fn test_start_sequence() {
        let bus = MockBus::with_devices(&[ADDRESS]);
        let mut lcd = Lcd::new(Interface::new(bus, ADDRESS), LcdPanel::Lcd20x4);
        lcd.start(&mut MockDelay).unwrap();

        let writes = lcd.release().release().writes_to(ADDRESS);
        let nibbles: Vec<u8> = writes
            .iter()
            .filter(|w| w.len() == 2)
            .map(|w| w[1])
            .collect();
        let bl = PCF8574T_BACKLIGHT;
        assert_eq!(nibbles, vec![0x30 | bl, 0x30 | bl, 0x30 | bl, 0x20 | bl]);

        let instructions: Vec<u8> = writes
            .iter()
            .filter(|w| w.len() == 4)
            .map(|w| (w[1] & 0xF0) | (w[3] >> 4))
            .collect();
        assert_eq!(instructions, vec![0x28, 0x0C, 0x01, 0x06]);
    }

    #[test]
    fn test_start_absent() {
        let bus = MockBus::with_devices(&[]);
        let mut lcd = Lcd::new(Interface::new(bus, ADDRESS), LcdPanel::Lcd16x2);
        assert!(matches!(
            lcd.start(&mut MockDelay),
            Err(Error::NotPresent { address: ADDRESS })
        ));
    }

    #[test]
    fn test_text_line_uses_row_offsets() {
        let mut lcd = started(LcdPanel::Lcd20x4);
        TextDisplay::text_line(&mut lcd, 3, b"Hi").unwrap();
        assert_eq!(
            decoded(lcd),
            vec![(false, 0x80 | 0x14), (true, b'H'), (true, b'i')]
        );
    }

    #[test]
    fn test_put_char_non_printable_is_space() {
        let mut lcd = started(LcdPanel::Lcd16x2);
        lcd.put_char(0x07).unwrap();
        assert_eq!(decoded(lcd), vec![(true, b' ')]);
    }

    #[test]
    fn test_text_clamps_and_wraps_to_next_row() {
        let mut lcd = started(LcdPanel::Lcd16x2);
        lcd.set_cursor_pos(14, 0).unwrap();
        lcd.text(b"ABCD").unwrap();
        assert_eq!(
            decoded(lcd),
            vec![(false, 0x80 | 14), (true, b'A'), (true, b'B'), (false, 0x80 | 0x40)]
        );
    }

    #[test]
    fn test_put_char_past_last_cell_is_dropped() {
        let mut lcd = started(LcdPanel::Lcd16x2);
        lcd.set_cursor_pos(15, 1).unwrap();
        lcd.put_char(b'x').unwrap();
        lcd.put_char(b'y').unwrap();
        assert_eq!(decoded(lcd), vec![(false, 0x80 | 0x4F), (true, b'x')]);
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut lcd = started(LcdPanel::Lcd16x2);
        lcd.set_cursor_pos(16, 0).unwrap();
        lcd.set_cursor_pos(0, 2).unwrap();
        lcd.clear_line(0).unwrap();
        lcd.clear_line(3).unwrap();
        assert!(decoded(lcd).is_empty());
    }

    #[test]
    fn test_sleep_turns_off_backlight() {
        let mut lcd = started(LcdPanel::Lcd16x2);
        lcd.set_sleep(true).unwrap();
        let writes = lcd.release().release().writes_to(ADDRESS);
        assert_eq!(writes.len(), 1);
        assert!(writes[0].iter().all(|b| b & PCF8574T_BACKLIGHT == 0));
        assert_eq!((writes[0][1] & 0xF0) | (writes[0][3] >> 4), 0x08);
    }

    #[test]
    fn test_cursor_modes() {
        let mut lcd = started(LcdPanel::Lcd16x2);
        lcd.set_cursor(CursorMode::Blink).unwrap();
        lcd.set_cursor(CursorMode::Off).unwrap();
        assert_eq!(decoded(lcd), vec![(false, 0x0F), (false, 0x0C)]);
    }

    #[test]
    fn test_kind_follows_panel() {
        let lcd = started(LcdPanel::Lcd20x4);
        assert_eq!(lcd.panel(), LcdPanel::Lcd20x4);
        assert_eq!(TextDisplay::kind(&lcd), DisplayType::Pcf8574t2004);
        assert_eq!(TextDisplay::columns(&lcd), 20);
    }
}
