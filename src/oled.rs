//! SSD1306 / SH1106 OLED text backend
//!
//! The controllers are write-only over I2C as far as display content goes, so
//! the backend keeps a shadow copy of every character it has put on the panel.
//! The shadow buffer is what the cursor highlight is redrawn from and what
//! [`Oled::dump_shadow_ram`] prints.
//!
//! ## Addressing
//!
//! Text is laid out on a grid of 6x8 glyph cells. A cell is addressed with the
//! three page-addressing commands (low column nibble, high column nibble, page)
//! after which the controller auto-increments the column pointer for every data
//! byte. Consecutive characters on one row therefore need no re-addressing.
//!
//! ## Controller Variants
//!
//! SH1106 modules expose 132 columns of RAM with the visible 128 shifted by
//! [`SH1106_COLUMN_OFFSET`]. `start()` writes a probe pattern past the visible
//! area and reads it back: only an SH1106 has RAM there.
//!
//! ## Example
//!
//! ```rust,no_run
//! use frontpanel::{Interface, Oled, OledPanel};
//! # use embedded_hal::i2c::{ErrorType, I2c, Operation};
//! # use core::convert::Infallible;
//! # struct MockI2c;
//! # impl ErrorType for MockI2c { type Error = Infallible; }
//! # impl I2c for MockI2c {
//! #     fn transaction(&mut self, _: u8, _: &mut [Operation<'_>]) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! let interface = Interface::new(MockI2c, 0x3C);
//! let mut oled = Oled::new(interface, OledPanel::Panel128x64Rows8);
//!
//! if oled.start().is_ok() {
//!     let _ = oled.set_cursor_pos(0, 0);
//!     let _ = oled.text(b"HELLO");
//! }
//! ```

use embedded_hal::delay::DelayNs;

use crate::backend::TextDisplay;
use crate::command::{
    COMMAND_MODE, DATA_MODE, DISPLAY_OFF, DISPLAY_ON, INIT_128X32, INIT_128X64, OLED_WIDTH,
    PROBE_COLUMN, SET_HIGH_COLUMN, SET_LOW_COLUMN, SET_START_PAGE, SH1106_COLUMN_OFFSET,
};
use crate::config::{CursorMode, DisplayType, MAX_TEXT_CELLS, OledPanel, PanelGeometry};
use crate::error::Error;
use crate::font::{FONT_6X8, GLYPH_BYTES, GLYPH_WIDTH, glyph, glyph_index};
use crate::interface::DisplayInterface;

type OledResult<I> = core::result::Result<(), Error<I>>;

/// Written past the visible columns during controller detection
const PROBE_PATTERN: [u8; 5] = [DATA_MODE, 0xAA, 0xEE, 0xAA, 0xEE];

/// Longest blank row transfer: mode byte plus the full SH1106 RAM width
const BLANK_ROW_LEN: usize = 1 + OLED_WIDTH as usize + SH1106_COLUMN_OFFSET as usize;

const BLANK_ROW: [u8; BLANK_ROW_LEN] = {
    let mut row = [0u8; BLANK_ROW_LEN];
    row[0] = DATA_MODE;
    row
};

/// Pixel set by the underline cursor in every glyph column
const UNDERLINE: u8 = 0x80;

/// OLED controller found at start-up
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Controller {
    /// 128 columns of RAM, no offset
    #[default]
    Ssd1306,
    /// 132 columns of RAM, visible area shifted by 4
    Sh1106,
}

impl Controller {
    /// Column address of the first visible pixel
    pub fn column_offset(self) -> u8 {
        match self {
            Self::Ssd1306 => 0,
            Self::Sh1106 => SH1106_COLUMN_OFFSET,
        }
    }
}

/// OLED text backend
///
/// ## Type Parameters
///
/// * `I` - Display interface (usually [`Interface`](crate::Interface))
pub struct Oled<I: DisplayInterface> {
    interface: I,
    panel: OledPanel,
    geometry: PanelGeometry,
    /// Characters on the panel, row-major; only the first `geometry.cells()` are used
    shadow: [u8; MAX_TEXT_CELLS],
    /// Next cell to be written; equals `geometry.cells()` once the panel is full
    cursor_index: usize,
    controller: Controller,
    cursor_mode: CursorMode,
    /// Cell currently drawn with the cursor highlight
    highlighted: Option<usize>,
}

impl<I> Oled<I>
where
    I: DisplayInterface,
{
    /// Create a backend for `panel`
    ///
    /// Nothing is sent until [`start`](Self::start) is called.
    pub fn new(interface: I, panel: OledPanel) -> Self {
        Self {
            interface,
            panel,
            geometry: panel.geometry(),
            shadow: [b' '; MAX_TEXT_CELLS],
            cursor_index: 0,
            controller: Controller::default(),
            cursor_mode: CursorMode::Off,
            highlighted: None,
        }
    }

    /// Initialise the panel
    ///
    /// Sends the init sequence for the panel height, detects the controller
    /// variant, clears the screen and turns the display on.
    ///
    /// # Errors
    ///
    /// * [`Error::UnsupportedPanel`] for non-OLED panel types, before any bus traffic
    /// * [`Error::NotPresent`] if the address is not acknowledged
    pub fn start(&mut self) -> OledResult<I> {
        if !self.panel.is_supported() {
            return Err(Error::UnsupportedPanel);
        }

        if !self.interface.is_present().map_err(Error::Interface)? {
            return Err(Error::NotPresent {
                address: self.interface.address(),
            });
        }

        let init = match self.panel {
            OledPanel::Panel128x64Rows8 => INIT_128X64,
            _ => INIT_128X32,
        };
        for &command in init {
            self.send_command(command)?;
        }

        self.detect_controller()?;
        self.cls()?;
        self.send_command(DISPLAY_ON)?;

        log::debug!(
            "OLED {:?} at {:#04x}: {:?}, {}x{}",
            self.panel,
            self.interface.address(),
            self.controller,
            self.geometry.columns,
            self.geometry.rows
        );
        Ok(())
    }

    /// Probe the RAM past column 127 to tell an SH1106 from an SSD1306
    ///
    /// The first byte read back is the controller's dummy read and is not
    /// compared.
    fn detect_controller(&mut self) -> OledResult<I> {
        self.set_column_page(PROBE_COLUMN, 0)?;
        self.interface
            .write_raw(&PROBE_PATTERN)
            .map_err(Error::Interface)?;
        self.set_column_page(PROBE_COLUMN, 0)?;

        let mut readback = [0u8; PROBE_PATTERN.len()];
        self.interface
            .read(DATA_MODE, &mut readback)
            .map_err(Error::Interface)?;

        self.controller = if readback[1..] == PROBE_PATTERN[1..] {
            Controller::Sh1106
        } else {
            Controller::Ssd1306
        };
        log::debug!("OLED probe read back {readback:02x?}");
        Ok(())
    }

    /// Move the cursor to `(column, row)`
    ///
    /// Out-of-range positions are ignored.
    pub fn set_cursor_pos(&mut self, column: u8, row: u8) -> OledResult<I> {
        if !self.geometry.contains(column, row) {
            return Ok(());
        }

        self.unhighlight()?;
        self.cursor_index = row as usize * self.geometry.columns as usize + column as usize;
        self.address_cell(self.cursor_index)?;
        self.highlight()
    }

    /// Write one character at the cursor
    ///
    /// Codes outside 32..=127 are shown as a space. Once the last cell has
    /// been written further characters are dropped until the cursor is moved.
    pub fn put_char(&mut self, code: u8) -> OledResult<I> {
        let cells = self.geometry.cells();
        if self.cursor_index >= cells {
            return Ok(());
        }

        let (shown, index) = glyph_index(code);
        self.shadow[self.cursor_index] = shown;
        if self.highlighted == Some(self.cursor_index) {
            self.highlighted = None;
        }
        self.cursor_index += 1;

        self.interface
            .write_raw(&FONT_6X8[index])
            .map_err(Error::Interface)?;

        // The column pointer does not wrap to the next page by itself
        if self.cursor_index < cells && self.cursor_index % self.geometry.columns as usize == 0 {
            self.address_cell(self.cursor_index)?;
        }
        Ok(())
    }

    /// Write `data` from the cursor, clamped to the rest of the current row
    pub fn text(&mut self, data: &[u8]) -> OledResult<I> {
        let columns = self.geometry.columns as usize;
        let remaining = columns - self.cursor_index % columns;
        for &code in data.iter().take(remaining) {
            self.put_char(code)?;
        }
        Ok(())
    }

    /// Write `text` from the cursor, running on into the following rows
    pub fn put_string(&mut self, text: &str) -> OledResult<I> {
        for code in text.bytes() {
            self.put_char(code)?;
        }
        Ok(())
    }

    /// Blank line `line` (1-based) and leave the cursor at its start
    pub fn clear_line(&mut self, line: u8) -> OledResult<I> {
        if line == 0 || line > self.geometry.rows {
            return Ok(());
        }

        self.unhighlight()?;
        let columns = self.geometry.columns as usize;
        let start = (line - 1) as usize * columns;

        self.address_cell(start)?;
        self.interface
            .write_raw(&BLANK_ROW[..=OLED_WIDTH as usize])
            .map_err(Error::Interface)?;
        self.shadow[start..start + columns].fill(b' ');

        self.cursor_index = start;
        self.address_cell(start)?;
        self.highlight()
    }

    /// Write `data` from the start of line `line` (1-based)
    pub fn text_line(&mut self, line: u8, data: &[u8]) -> OledResult<I> {
        if line == 0 || line > self.geometry.rows {
            return Ok(());
        }
        self.set_cursor_pos(0, line - 1)?;
        self.text(data)
    }

    /// Blank every page, including the SH1106 columns outside the visible area
    pub fn cls(&mut self) -> OledResult<I> {
        let row_len = 1 + OLED_WIDTH as usize + self.controller.column_offset() as usize;
        for page in 0..self.geometry.pages {
            self.set_column_page(0, page)?;
            self.interface
                .write_raw(&BLANK_ROW[..row_len])
                .map_err(Error::Interface)?;
        }

        self.cursor_index = 0;
        self.highlighted = None;
        self.shadow.fill(b' ');
        self.address_cell(0)?;
        self.highlight()
    }

    /// Turn the panel off (`true`) or on (`false`)
    pub fn set_sleep(&mut self, sleep: bool) -> OledResult<I> {
        self.send_command(if sleep { DISPLAY_OFF } else { DISPLAY_ON })
    }

    /// Change the cursor appearance
    ///
    /// `On` underlines the cell at the cursor, `Blink` draws it inverted.
    pub fn set_cursor(&mut self, mode: CursorMode) -> OledResult<I> {
        if mode == self.cursor_mode {
            return Ok(());
        }

        self.unhighlight()?;
        self.cursor_mode = mode;
        if self.cursor_index < self.geometry.cells() {
            self.address_cell(self.cursor_index)?;
            self.highlight()?;
        }
        Ok(())
    }

    /// Log the shadow buffer, one row per line
    pub fn dump_shadow_ram(&self) {
        let columns = self.geometry.columns as usize;
        for (row, cells) in self.shadow().chunks(columns).enumerate() {
            let text = core::str::from_utf8(cells).unwrap_or("?");
            log::debug!("{row:02}: [{text}]");
        }
    }

    /// Characters currently on the panel, row-major
    pub fn shadow(&self) -> &[u8] {
        &self.shadow[..self.geometry.cells()]
    }

    /// Next cell to be written
    pub fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    /// Controller variant found by `start()`
    pub fn controller(&self) -> Controller {
        self.controller
    }

    /// Current cursor appearance
    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    /// Text geometry of the panel
    pub fn geometry(&self) -> PanelGeometry {
        self.geometry
    }

    /// Give back the interface
    pub fn release(self) -> I {
        self.interface
    }

    fn send_command(&mut self, command: u8) -> OledResult<I> {
        self.interface
            .write(COMMAND_MODE, &[command])
            .map_err(Error::Interface)
    }

    fn set_column_page(&mut self, column: u8, page: u8) -> OledResult<I> {
        self.send_command(SET_LOW_COLUMN | (column & 0x0F))?;
        self.send_command(SET_HIGH_COLUMN | (column >> 4))?;
        self.send_command(SET_START_PAGE | page)
    }

    fn address_cell(&mut self, index: usize) -> OledResult<I> {
        let columns = self.geometry.columns as usize;
        // Both fit in u8: at most 20 * 6 + 4 and 7
        let column = (index % columns) as u8 * GLYPH_WIDTH + self.controller.column_offset();
        let page = (index / columns) as u8;
        self.set_column_page(column, page)
    }

    /// Draw the cursor at `cursor_index`
    ///
    /// The chip must already be addressed at that cell; it is re-addressed
    /// there afterwards.
    fn highlight(&mut self) -> OledResult<I> {
        if self.cursor_mode == CursorMode::Off || self.cursor_index >= self.geometry.cells() {
            return Ok(());
        }

        let styled = self.styled_glyph(self.shadow[self.cursor_index]);
        self.interface
            .write_raw(&styled)
            .map_err(Error::Interface)?;
        self.address_cell(self.cursor_index)?;
        self.highlighted = Some(self.cursor_index);
        Ok(())
    }

    /// Redraw the highlighted cell, if any, from the shadow buffer
    fn unhighlight(&mut self) -> OledResult<I> {
        if let Some(cell) = self.highlighted.take() {
            self.address_cell(cell)?;
            self.interface
                .write_raw(glyph(self.shadow[cell]))
                .map_err(Error::Interface)?;
        }
        Ok(())
    }

    fn styled_glyph(&self, code: u8) -> [u8; GLYPH_BYTES] {
        let mut styled = *glyph(code);
        for column in &mut styled[1..] {
            *column = match self.cursor_mode {
                CursorMode::Blink => !*column,
                CursorMode::On => *column | UNDERLINE,
                CursorMode::Off => *column,
            };
        }
        styled
    }
}

impl<I: DisplayInterface> TextDisplay for Oled<I> {
    type Error = Error<I>;

    fn kind(&self) -> DisplayType {
        DisplayType::Ssd1306
    }

    fn columns(&self) -> u8 {
        self.geometry.columns
    }

    fn rows(&self) -> u8 {
        self.geometry.rows
    }

    fn start<D: DelayNs>(&mut self, _delay: &mut D) -> OledResult<I> {
        Oled::start(self)
    }

    fn cls<D: DelayNs>(&mut self, _delay: &mut D) -> OledResult<I> {
        Oled::cls(self)
    }

    fn put_char(&mut self, code: u8) -> OledResult<I> {
        Oled::put_char(self, code)
    }

    fn put_string(&mut self, text: &str) -> OledResult<I> {
        Oled::put_string(self, text)
    }

    fn text(&mut self, data: &[u8]) -> OledResult<I> {
        Oled::text(self, data)
    }

    fn set_cursor_pos(&mut self, column: u8, row: u8) -> OledResult<I> {
        Oled::set_cursor_pos(self, column, row)
    }

    fn clear_line(&mut self, line: u8) -> OledResult<I> {
        Oled::clear_line(self, line)
    }

    fn text_line(&mut self, line: u8, data: &[u8]) -> OledResult<I> {
        Oled::text_line(self, line, data)
    }

    fn set_cursor(&mut self, mode: CursorMode) -> OledResult<I> {
        Oled::set_cursor(self, mode)
    }

    fn set_sleep(&mut self, sleep: bool) -> OledResult<I> {
        Oled::set_sleep(self, sleep)
    }

    fn dump(&self) {
        self.dump_shadow_ram();
    }
}
