//! Display configuration types and builder

pub use crate::error::{BuilderError, MAX_I2C_ADDRESS};
use crate::font::{GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::command::OLED_WIDTH;

/// Default 7-bit address of SSD1306/SH1106 modules
pub const OLED_DEFAULT_ADDRESS: u8 = 0x3C;

/// Default 7-bit address of PCF8574T LCD backpacks
pub const PCF8574T_DEFAULT_ADDRESS: u8 = 0x27;

/// Default 7-bit address of the MCP23017 driving the 7-segment indicator
pub const MCP23017_DEFAULT_ADDRESS: u8 = 0x20;

/// Default sleep timeout in minutes
pub const DEFAULT_SLEEP_TIMEOUT_MINUTES: u32 = 5;

/// Text columns on a 128 pixel wide OLED with 6 pixel glyphs
pub const OLED_COLUMNS: u8 = OLED_WIDTH / GLYPH_WIDTH;

/// Largest shadow buffer any supported OLED panel needs
pub const MAX_TEXT_CELLS: usize = OLED_COLUMNS as usize * 8;

/// OLED panel selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OledPanel {
    /// 128x64 pixels, 8 text rows
    #[default]
    Panel128x64Rows8,
    /// 128x64 pixels driven as a 128x32 panel, 4 text rows
    Panel128x64Rows4,
    /// 128x32 pixels, 4 text rows
    Panel128x32Rows4,
    /// Character LCD; not an OLED, `start()` fails
    CharacterLcd,
    /// Unknown panel; `start()` fails
    Unknown,
}

impl OledPanel {
    /// Text geometry for this panel
    ///
    /// Panels the OLED backend cannot drive still get the 8-row geometry so
    /// the shadow buffer is always well formed.
    pub fn geometry(self) -> PanelGeometry {
        let (height, pages) = match self {
            Self::Panel128x64Rows8 => (64, 8),
            Self::Panel128x64Rows4 | Self::Panel128x32Rows4 => (32, 4),
            Self::CharacterLcd | Self::Unknown => (64, 4),
        };
        PanelGeometry {
            columns: OLED_COLUMNS,
            rows: height / GLYPH_HEIGHT,
            pages,
        }
    }

    /// Whether the OLED backend can drive this panel
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            Self::Panel128x64Rows8 | Self::Panel128x64Rows4 | Self::Panel128x32Rows4
        )
    }
}

/// Text geometry of a panel
///
/// Derived once from the panel type and immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelGeometry {
    /// Characters per row
    pub columns: u8,
    /// Text rows
    pub rows: u8,
    /// 8-pixel controller pages to clear
    pub pages: u8,
}

impl PanelGeometry {
    /// Number of character cells
    pub fn cells(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Whether `(column, row)` addresses a cell
    pub fn contains(&self, column: u8, row: u8) -> bool {
        column < self.columns && row < self.rows
    }
}

/// Character LCD module selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LcdPanel {
    /// 16 columns, 2 rows
    #[default]
    Lcd16x2,
    /// 20 columns, 4 rows
    Lcd20x4,
}

impl LcdPanel {
    /// Characters per row
    pub fn columns(self) -> u8 {
        match self {
            Self::Lcd16x2 => 16,
            Self::Lcd20x4 => 20,
        }
    }

    /// Text rows
    pub fn rows(self) -> u8 {
        match self {
            Self::Lcd16x2 => 2,
            Self::Lcd20x4 => 4,
        }
    }

    /// DDRAM address of the first cell of each row
    pub fn row_offsets(self) -> [u8; 4] {
        match self {
            Self::Lcd16x2 => [0x00, 0x40, 0x10, 0x50],
            Self::Lcd20x4 => [0x00, 0x40, 0x14, 0x54],
        }
    }
}

/// Kind of display found on the bus
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayType {
    /// HD44780 16x2 behind a PCF8574T
    Pcf8574t1602,
    /// HD44780 20x4 behind a PCF8574T
    Pcf8574t2004,
    /// SSD1306 or SH1106 OLED
    Ssd1306,
    /// Nothing detected
    #[default]
    Unknown,
}

impl DisplayType {
    /// Character LCD panel for the PCF8574T types
    pub fn lcd_panel(self) -> Option<LcdPanel> {
        match self {
            Self::Pcf8574t1602 => Some(LcdPanel::Lcd16x2),
            Self::Pcf8574t2004 => Some(LcdPanel::Lcd20x4),
            Self::Ssd1306 | Self::Unknown => None,
        }
    }
}

impl From<LcdPanel> for DisplayType {
    fn from(panel: LcdPanel) -> Self {
        match panel {
            LcdPanel::Lcd16x2 => Self::Pcf8574t1602,
            LcdPanel::Lcd20x4 => Self::Pcf8574t2004,
        }
    }
}

/// Cursor appearance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorMode {
    /// No cursor
    #[default]
    Off,
    /// Underline cursor
    On,
    /// Blinking (LCD) or inverted (OLED) cursor
    Blink,
}

/// Display configuration
///
/// Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// OLED panel type
    pub oled_panel: OledPanel,
    /// OLED 7-bit slave address
    pub oled_address: u8,
    /// Character LCD module type
    pub lcd_panel: LcdPanel,
    /// PCF8574T 7-bit slave address
    pub lcd_address: u8,
    /// MCP23017 7-bit slave address for the 7-segment indicator
    pub segment_address: u8,
    /// Minutes without activity before the display sleeps, 0 disables
    pub sleep_timeout_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oled_panel: OledPanel::default(),
            oled_address: OLED_DEFAULT_ADDRESS,
            lcd_panel: LcdPanel::default(),
            lcd_address: PCF8574T_DEFAULT_ADDRESS,
            segment_address: MCP23017_DEFAULT_ADDRESS,
            sleep_timeout_minutes: DEFAULT_SLEEP_TIMEOUT_MINUTES,
        }
    }
}

/// Builder for constructing display configuration
///
/// An address of 0 selects the documented default for that device.
///
/// # Example
///
/// ```rust
/// use frontpanel::{Builder, OledPanel};
///
/// let config = match Builder::new()
///     .oled_panel(OledPanel::Panel128x32Rows4)
///     .oled_address(0x3D)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.oled_address, 0x3D);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    oled_panel: OledPanel,
    oled_address: u8,
    lcd_panel: LcdPanel,
    lcd_address: u8,
    segment_address: u8,
    sleep_timeout_minutes: Option<u32>,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the OLED panel type
    pub fn oled_panel(mut self, panel: OledPanel) -> Self {
        self.oled_panel = panel;
        self
    }

    /// Set the OLED slave address (0 = default)
    pub fn oled_address(mut self, address: u8) -> Self {
        self.oled_address = address;
        self
    }

    /// Set the character LCD module type
    pub fn lcd_panel(mut self, panel: LcdPanel) -> Self {
        self.lcd_panel = panel;
        self
    }

    /// Set the PCF8574T slave address (0 = default)
    pub fn lcd_address(mut self, address: u8) -> Self {
        self.lcd_address = address;
        self
    }

    /// Set the 7-segment MCP23017 slave address (0 = default)
    pub fn segment_address(mut self, address: u8) -> Self {
        self.segment_address = address;
        self
    }

    /// Set the sleep timeout in minutes, 0 disables sleeping
    pub fn sleep_timeout_minutes(mut self, minutes: u32) -> Self {
        self.sleep_timeout_minutes = Some(minutes);
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidAddress` if an address does not fit in 7 bits
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            oled_panel: self.oled_panel,
            oled_address: resolve_address(self.oled_address, OLED_DEFAULT_ADDRESS)?,
            lcd_panel: self.lcd_panel,
            lcd_address: resolve_address(self.lcd_address, PCF8574T_DEFAULT_ADDRESS)?,
            segment_address: resolve_address(self.segment_address, MCP23017_DEFAULT_ADDRESS)?,
            sleep_timeout_minutes: self
                .sleep_timeout_minutes
                .unwrap_or(DEFAULT_SLEEP_TIMEOUT_MINUTES),
        })
    }
}

fn resolve_address(address: u8, default: u8) -> Result<u8, BuilderError> {
    match address {
        0 => Ok(default),
        a if a > MAX_I2C_ADDRESS => Err(BuilderError::InvalidAddress { address: a }),
        a => Ok(a),
    }
}
