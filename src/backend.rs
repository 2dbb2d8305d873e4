//! Capability set shared by all display backends
//!
//! Every hardware family implements [`TextDisplay`]. The façade holds exactly
//! one of them in a [`Backend`] slot and dispatches through it, so the rest of
//! the firmware never needs to know which panel is fitted.
//!
//! Line numbers passed to [`TextDisplay::clear_line`] and
//! [`TextDisplay::text_line`] are 1-based; cursor positions are 0-based.

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;

use crate::config::{CursorMode, DisplayType};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::lcd::Lcd;
use crate::oled::Oled;

/// Text output operations common to OLED and character LCD panels
///
/// Out-of-range positions and line numbers are ignored and return `Ok(())`.
pub trait TextDisplay {
    /// Error type for backend operations
    type Error: Debug;

    /// Which kind of display this backend drives
    fn kind(&self) -> DisplayType;

    /// Characters per row
    fn columns(&self) -> u8;

    /// Text rows
    fn rows(&self) -> u8;

    /// Probe the bus, initialise the controller, clear the screen and turn it on
    ///
    /// No other method may be used until this has succeeded.
    fn start<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// Blank the whole screen and move the cursor to the origin
    fn cls<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// Write one character at the cursor and advance it
    fn put_char(&mut self, code: u8) -> Result<(), Self::Error>;

    /// Write a string character by character, from the cursor
    fn put_string(&mut self, text: &str) -> Result<(), Self::Error> {
        for byte in text.bytes() {
            self.put_char(byte)?;
        }
        Ok(())
    }

    /// Write at most the remaining columns of the current row
    fn text(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Move the cursor to `(column, row)`
    fn set_cursor_pos(&mut self, column: u8, row: u8) -> Result<(), Self::Error>;

    /// Blank line `line` (1-based) and leave the cursor at its start
    fn clear_line(&mut self, line: u8) -> Result<(), Self::Error>;

    /// Write `data` from the start of line `line` (1-based)
    fn text_line(&mut self, line: u8, data: &[u8]) -> Result<(), Self::Error> {
        if line == 0 || line > self.rows() {
            return Ok(());
        }
        self.set_cursor_pos(0, line - 1)?;
        self.text(data)
    }

    /// Change the cursor appearance
    fn set_cursor(&mut self, mode: CursorMode) -> Result<(), Self::Error>;

    /// Turn the panel output off (`true`) or back on (`false`)
    ///
    /// Text content and cursor position are unaffected.
    fn set_sleep(&mut self, sleep: bool) -> Result<(), Self::Error>;

    /// Log what the backend believes is on screen
    fn dump(&self) {}
}

/// The single owning slot for the active display backend
pub enum Backend<I: DisplayInterface> {
    /// SSD1306 / SH1106 OLED
    Oled(Oled<I>),
    /// HD44780 behind a PCF8574T
    Lcd(Lcd<I>),
}

impl<I: DisplayInterface> Backend<I> {
    /// Give back the interface of whichever backend is held
    pub fn release(self) -> I {
        match self {
            Self::Oled(oled) => oled.release(),
            Self::Lcd(lcd) => lcd.release(),
        }
    }
}

impl<I: DisplayInterface> TextDisplay for Backend<I> {
    type Error = Error<I>;

    fn kind(&self) -> DisplayType {
        match self {
            Self::Oled(oled) => oled.kind(),
            Self::Lcd(lcd) => lcd.kind(),
        }
    }

    fn columns(&self) -> u8 {
        match self {
            Self::Oled(oled) => oled.columns(),
            Self::Lcd(lcd) => lcd.columns(),
        }
    }

    fn rows(&self) -> u8 {
        match self {
            Self::Oled(oled) => oled.rows(),
            Self::Lcd(lcd) => lcd.rows(),
        }
    }

    fn start<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        match self {
            Self::Oled(oled) => TextDisplay::start(oled, delay),
            Self::Lcd(lcd) => lcd.start(delay),
        }
    }

    fn cls<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        match self {
            Self::Oled(oled) => TextDisplay::cls(oled, delay),
            Self::Lcd(lcd) => lcd.cls(delay),
        }
    }

    fn put_char(&mut self, code: u8) -> Result<(), Self::Error> {
        match self {
            Self::Oled(oled) => oled.put_char(code),
            Self::Lcd(lcd) => lcd.put_char(code),
        }
    }

    fn text(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        match self {
            Self::Oled(oled) => oled.text(data),
            Self::Lcd(lcd) => lcd.text(data),
        }
    }

    fn set_cursor_pos(&mut self, column: u8, row: u8) -> Result<(), Self::Error> {
        match self {
            Self::Oled(oled) => oled.set_cursor_pos(column, row),
            Self::Lcd(lcd) => lcd.set_cursor_pos(column, row),
        }
    }

    fn clear_line(&mut self, line: u8) -> Result<(), Self::Error> {
        match self {
            Self::Oled(oled) => oled.clear_line(line),
            Self::Lcd(lcd) => lcd.clear_line(line),
        }
    }

    fn set_cursor(&mut self, mode: CursorMode) -> Result<(), Self::Error> {
        match self {
            Self::Oled(oled) => oled.set_cursor(mode),
            Self::Lcd(lcd) => lcd.set_cursor(mode),
        }
    }

    fn set_sleep(&mut self, sleep: bool) -> Result<(), Self::Error> {
        match self {
            Self::Oled(oled) => oled.set_sleep(sleep),
            Self::Lcd(lcd) => lcd.set_sleep(sleep),
        }
    }

    fn dump(&self) {
        match self {
            Self::Oled(oled) => oled.dump_shadow_ram(),
            Self::Lcd(lcd) => lcd.dump(),
        }
    }
}
