//! Front-panel display façade
//!
//! [`Display`] owns the I2C bus handle, a delay and at most one started
//! backend. It is constructed once at boot, either by trying the known
//! backends in priority order or for an explicit type, and then passed by
//! `&mut` to whatever needs to show status.
//!
//! ## Lifecycle
//!
//! ```text
//! construct ──► detecting ──► active ◄──► asleep
//!                   │            │
//!                   ▼            ▼
//!              not detected   release()
//! ```
//!
//! A façade that detected nothing stays usable: every text call becomes a
//! no-op so the device still boots without a panel attached.
//!
//! ## Sleep
//!
//! Every text, cursor and status call counts as activity. [`Display::run`]
//! must be called from the main loop with a millisecond tick; once the tick
//! has moved more than the sleep timeout past the last activity the panel is
//! put to sleep, and the next activity wakes it before doing anything else.
//!
//! ## Example
//!
//! ```rust,no_run
//! use frontpanel::{Builder, Display};
//! # use embedded_hal::i2c::{ErrorType, I2c, Operation};
//! # use embedded_hal::delay::DelayNs;
//! # use core::convert::Infallible;
//! # struct MockI2c;
//! # impl ErrorType for MockI2c { type Error = Infallible; }
//! # impl I2c for MockI2c {
//! #     fn transaction(&mut self, _: u8, _: &mut [Operation<'_>]) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # fn millis() -> u32 { 0 }
//! let config = match Builder::new().sleep_timeout_minutes(10).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let mut display = Display::detect(MockI2c, MockDelay, config);
//!
//! if display.is_detected() {
//!     display.printf(1, format_args!("Universe {}", 1));
//!     display.text_status("Ready");
//! }
//!
//! loop {
//!     display.run(millis());
//! #   break;
//! }
//! ```

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::backend::{Backend, TextDisplay};
use crate::config::{Config, CursorMode, DisplayType, LcdPanel, OLED_COLUMNS};
use crate::error::Error;
use crate::interface::Interface;
use crate::lcd::Lcd;
use crate::oled::Oled;
use crate::segment::{Segment7, Segment7Message, encode_value};

const MS_PER_MINUTE: u32 = 60 * 1000;

/// Widest line any backend can show
const LINE_CAPACITY: usize = OLED_COLUMNS as usize;

type ActiveBackend<I2C> = Backend<Interface<I2C>>;

/// The bus handles and delay given back by [`Display::release`]
pub struct Parts<I2C, D> {
    /// Handle the display backend was driven through
    pub display_bus: I2C,
    /// Handle given to [`Display::attach_7segment`], if it was accepted
    pub segment_bus: Option<I2C>,
    /// Delay provider
    pub delay: D,
}

enum Slot<I2C>
where
    I2C: I2c,
{
    Active(ActiveBackend<I2C>),
    Vacant(I2C),
}

/// Backends tried during construction
#[derive(Clone, Copy, Debug)]
enum Candidate {
    Oled,
    Lcd(LcdPanel),
}

impl Candidate {
    fn from_type(kind: DisplayType) -> Option<Self> {
        match kind {
            DisplayType::Ssd1306 => Some(Self::Oled),
            DisplayType::Pcf8574t1602 | DisplayType::Pcf8574t2004 => kind.lcd_panel().map(Self::Lcd),
            DisplayType::Unknown => None,
        }
    }

    fn backend<I2C: I2c>(self, i2c: I2C, config: &Config) -> ActiveBackend<I2C> {
        match self {
            Self::Oled => Backend::Oled(Oled::new(
                Interface::new(i2c, config.oled_address),
                config.oled_panel,
            )),
            Self::Lcd(panel) => {
                Backend::Lcd(Lcd::new(Interface::new(i2c, config.lcd_address), panel))
            }
        }
    }
}

/// Collects formatted text, silently dropping what does not fit on a line
#[derive(Default)]
struct LineBuffer(heapless::Vec<u8, LINE_CAPACITY>);

impl fmt::Write for LineBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &byte in s.as_bytes() {
            if self.0.push(byte).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Front-panel display
///
/// ## Type Parameters
///
/// * `I2C` - Bus handle for the display, e.g. an `embedded-hal-bus` device
/// * `D` - Delay provider, needed by character LCD timing
pub struct Display<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    slot: Slot<I2C>,
    segment: Option<Segment7<Interface<I2C>>>,
    delay: D,
    config: Config,
    kind: DisplayType,
    sleep_timeout_ms: u32,
    is_sleep: bool,
    /// Activity seen since the last `run()`
    activity_pending: bool,
    last_activity_ms: u32,
}

impl<I2C, D> Display<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Try the OLED first, then the PCF8574T character LCD
    pub fn detect(i2c: I2C, delay: D, config: Config) -> Self {
        let lcd = Candidate::Lcd(config.lcd_panel);
        Self::with_candidates(i2c, delay, config, &[Candidate::Oled, lcd])
    }

    /// Start one specific display type
    ///
    /// `DisplayType::Unknown` constructs a façade that reports not detected.
    pub fn with_type(i2c: I2C, delay: D, config: Config, kind: DisplayType) -> Self {
        match Candidate::from_type(kind) {
            Some(candidate) => Self::with_candidates(i2c, delay, config, &[candidate]),
            None => Self::with_candidates(i2c, delay, config, &[]),
        }
    }

    /// Pick the backend from a character geometry, without trying others
    ///
    /// 20x4 and 16x2 select the matching character LCD; anything else the OLED.
    pub fn with_geometry(i2c: I2C, delay: D, config: Config, columns: u8, rows: u8) -> Self {
        let candidate = match (columns, rows) {
            (20, 4) => Candidate::Lcd(LcdPanel::Lcd20x4),
            (16, 2) => Candidate::Lcd(LcdPanel::Lcd16x2),
            _ => Candidate::Oled,
        };
        Self::with_candidates(i2c, delay, config, &[candidate])
    }

    fn with_candidates(i2c: I2C, mut delay: D, config: Config, candidates: &[Candidate]) -> Self {
        let mut slot = Slot::Vacant(i2c);

        for &candidate in candidates {
            let Slot::Vacant(i2c) = slot else { break };
            let mut backend = candidate.backend(i2c, &config);
            slot = match backend.start(&mut delay) {
                Ok(()) => Slot::Active(backend),
                Err(e) => {
                    log::debug!("{candidate:?} not started: {e}");
                    Slot::Vacant(backend.release().release())
                }
            };
        }

        let kind = match &slot {
            Slot::Active(backend) => backend.kind(),
            Slot::Vacant(_) => DisplayType::Unknown,
        };
        if kind == DisplayType::Unknown {
            log::warn!("No display detected");
        } else {
            log::info!("Display: {kind:?}");
        }

        let sleep_timeout_ms = config.sleep_timeout_minutes.saturating_mul(MS_PER_MINUTE);
        Self {
            slot,
            segment: None,
            delay,
            config,
            kind,
            sleep_timeout_ms,
            is_sleep: false,
            activity_pending: true,
            last_activity_ms: 0,
        }
    }

    /// Whether a backend was started
    pub fn is_detected(&self) -> bool {
        matches!(self.slot, Slot::Active(_))
    }

    /// Type of the started backend, `Unknown` when nothing was detected
    pub fn detected_type(&self) -> DisplayType {
        self.kind
    }

    /// Characters per row, 0 when nothing was detected
    pub fn columns(&self) -> u8 {
        match &self.slot {
            Slot::Active(backend) => backend.columns(),
            Slot::Vacant(_) => 0,
        }
    }

    /// Text rows, 0 when nothing was detected
    pub fn rows(&self) -> u8 {
        match &self.slot {
            Slot::Active(backend) => backend.rows(),
            Slot::Vacant(_) => 0,
        }
    }

    /// Configuration the façade was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    // Sleep

    /// Minutes without activity before the panel sleeps, 0 disables
    pub fn set_sleep_timeout(&mut self, minutes: u32) {
        self.sleep_timeout_ms = minutes.saturating_mul(MS_PER_MINUTE);
    }

    /// Current sleep timeout in minutes
    pub fn sleep_timeout(&self) -> u32 {
        self.sleep_timeout_ms / MS_PER_MINUTE
    }

    /// Whether the panel is asleep
    pub fn is_sleep(&self) -> bool {
        self.is_sleep
    }

    /// Put the panel to sleep or wake it
    pub fn set_sleep(&mut self, sleep: bool) {
        if !sleep {
            self.activity_pending = true;
        }
        self.send_sleep(sleep);
    }

    /// Sleep bookkeeping, call from the main loop
    ///
    /// `now_ms` is a free-running millisecond tick; wrap-around is handled.
    pub fn run(&mut self, now_ms: u32) {
        if self.activity_pending {
            self.activity_pending = false;
            self.last_activity_ms = now_ms;
            return;
        }

        if self.is_sleep || self.sleep_timeout_ms == 0 || !self.is_detected() {
            return;
        }

        if now_ms.wrapping_sub(self.last_activity_ms) > self.sleep_timeout_ms {
            log::debug!("Display idle, sleeping");
            self.send_sleep(true);
        }
    }

    fn send_sleep(&mut self, sleep: bool) {
        if let Slot::Active(backend) = &mut self.slot {
            match backend.set_sleep(sleep) {
                Ok(()) => self.is_sleep = sleep,
                Err(e) => log::warn!("Display sleep({sleep}) failed: {e}"),
            }
        }
    }

    /// Record activity and make sure the panel is awake
    fn touch(&mut self) {
        self.activity_pending = true;
        if self.is_sleep {
            self.send_sleep(false);
        }
    }

    fn with_backend<F>(&mut self, operation: &str, f: F)
    where
        F: FnOnce(&mut ActiveBackend<I2C>, &mut D) -> Result<(), Error<Interface<I2C>>>,
    {
        self.touch();
        if let Slot::Active(backend) = &mut self.slot {
            if let Err(e) = f(backend, &mut self.delay) {
                log::warn!("Display {operation} failed: {e}");
            }
        }
    }

    // Text

    /// Clear the whole screen
    pub fn cls(&mut self) {
        self.with_backend("cls", |backend, delay| backend.cls(delay));
    }

    /// Blank line `line` (1-based)
    pub fn clear_line(&mut self, line: u8) {
        self.with_backend("clear_line", |backend, _| backend.clear_line(line));
    }

    /// Write one character at the cursor
    pub fn put_char(&mut self, code: u8) {
        self.with_backend("put_char", |backend, _| backend.put_char(code));
    }

    /// Write a string from the cursor
    pub fn put_string(&mut self, text: &str) {
        self.with_backend("put_string", |backend, _| backend.put_string(text));
    }

    /// Write `text` from the start of line `line` (1-based)
    pub fn text_line(&mut self, line: u8, text: &[u8]) {
        self.with_backend("text_line", |backend, _| backend.text_line(line, text));
    }

    /// Write `text` on line `line` (1-based), truncated to the row
    ///
    /// Returns the number of characters written.
    pub fn write(&mut self, line: u8, text: &str) -> usize {
        self.write_bytes(line, text.as_bytes())
    }

    /// Format onto line `line` (1-based), truncated to the row
    ///
    /// ```rust,ignore
    /// display.printf(2, format_args!("IP {}.{}.{}.{}", a, b, c, d));
    /// ```
    pub fn printf(&mut self, line: u8, args: fmt::Arguments<'_>) -> usize {
        let mut buffer = LineBuffer::default();
        if fmt::write(&mut buffer, args).is_err() {
            log::warn!("Display printf: formatting failed");
        }
        self.write_bytes(line, &buffer.0)
    }

    fn write_bytes(&mut self, line: u8, text: &[u8]) -> usize {
        if !self.is_detected() || line == 0 || line > self.rows() {
            return 0;
        }
        let count = text.len().min(self.columns() as usize);
        self.text_line(line, &text[..count]);
        count
    }

    /// Move the cursor to `(column, row)`, both 0-based
    pub fn set_cursor_pos(&mut self, column: u8, row: u8) {
        self.with_backend("set_cursor_pos", |backend, _| {
            backend.set_cursor_pos(column, row)
        });
    }

    /// Change the cursor appearance
    pub fn set_cursor(&mut self, mode: CursorMode) {
        self.with_backend("set_cursor", |backend, _| backend.set_cursor(mode));
    }

    // Status

    /// Show `text` on the bottom line and log it
    pub fn text_status(&mut self, text: &str) {
        log::info!("{text}");
        let bottom = self.rows();
        self.clear_line(bottom);
        self.write(bottom, text);
    }

    /// Show `text` on the bottom line and `message` on the 7-segment indicator
    pub fn text_status_with(&mut self, text: &str, message: Segment7Message) {
        self.status(message);
        self.text_status(text);
    }

    /// Show `text` on the bottom line and `value` on the 7-segment indicator
    pub fn text_status_value(&mut self, text: &str, value: u8, hex: bool) {
        self.status_value(value, hex);
        self.text_status(text);
    }

    /// Show `message` on the 7-segment indicator
    pub fn status(&mut self, message: Segment7Message) {
        self.status_raw(message.pattern());
    }

    /// Show `value` on the 7-segment indicator, decimal or hex
    pub fn status_value(&mut self, value: u8, hex: bool) {
        self.status_raw(encode_value(value, hex));
    }

    /// Show a raw segment pattern (high byte = left digit)
    pub fn status_raw(&mut self, pattern: u16) {
        self.touch();
        if let Some(segment) = &mut self.segment {
            if let Err(e) = segment.show(pattern) {
                log::warn!("7-segment update failed: {e}");
            }
        }
    }

    /// Hand over a bus handle for the MCP23017 7-segment indicator
    ///
    /// Returns `false`, dropping the handle, if the expander does not answer.
    pub fn attach_7segment(&mut self, i2c: I2C) -> bool {
        let mut segment = Segment7::new(Interface::new(i2c, self.config.segment_address));
        match segment.start() {
            Ok(()) => {
                self.segment = Some(segment);
                true
            }
            Err(e) => {
                log::debug!("7-segment not attached: {e}");
                false
            }
        }
    }

    /// Whether a 7-segment indicator is attached
    pub fn has_7segment(&self) -> bool {
        self.segment.is_some()
    }

    /// Log what the backend believes is on screen
    pub fn dump(&self) {
        match &self.slot {
            Slot::Active(backend) => backend.dump(),
            Slot::Vacant(_) => log::debug!("No display"),
        }
    }

    /// Tear down and give back the bus handles and the delay
    pub fn release(self) -> Parts<I2C, D> {
        let display_bus = match self.slot {
            Slot::Active(backend) => backend.release().release(),
            Slot::Vacant(i2c) => i2c,
        };
        Parts {
            display_bus,
            segment_bus: self.segment.map(|segment| segment.release().release()),
            delay: self.delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{DISPLAY_OFF, DISPLAY_ON, MCP23017_GPIOA};
    use crate::config::{Builder, OledPanel};
    use crate::mock::{MockBus, MockDelay};
    use core::cell::RefCell;
    use embedded_hal_bus::i2c::RefCellDevice;

    const OLED: u8 = 0x3C;
    const LCD: u8 = 0x27;
    const SEGMENT: u8 = 0x20;

    fn config() -> Config {
        Builder::new()
            .oled_panel(OledPanel::Panel128x32Rows4)
            .lcd_panel(LcdPanel::Lcd20x4)
            .sleep_timeout_minutes(1)
            .build()
            .unwrap()
    }

    fn detect(devices: &[u8]) -> Display<MockBus, MockDelay> {
        Display::detect(MockBus::with_devices(devices), MockDelay, config())
    }

    #[test]
    fn test_detect_prefers_oled() {
        let display = detect(&[OLED, LCD]);
        assert!(display.is_detected());
        assert_eq!(display.detected_type(), DisplayType::Ssd1306);
        assert_eq!(display.columns(), 21);
        assert_eq!(display.rows(), 4);
    }

    #[test]
    fn test_detect_falls_through_to_lcd() {
        let display = detect(&[LCD]);
        assert_eq!(display.detected_type(), DisplayType::Pcf8574t2004);
        assert_eq!(display.columns(), 20);

        let bus = display.release().display_bus;
        assert!(bus.writes_to(OLED).is_empty());
        assert!(!bus.writes_to(LCD).is_empty());
    }

    #[test]
    fn test_nothing_on_bus_is_not_detected() {
        let mut display = detect(&[]);
        assert!(!display.is_detected());
        assert_eq!(display.detected_type(), DisplayType::Unknown);
        assert_eq!(display.write(1, "ignored"), 0);
        display.text_status("ignored");
        display.run(0);
        display.run(u32::MAX);
        assert!(display.release().display_bus.transfers().is_empty());
    }

    #[test]
    fn test_with_type_unknown_sends_nothing() {
        let bus = MockBus::with_devices(&[OLED]);
        let display = Display::with_type(bus, MockDelay, config(), DisplayType::Unknown);
        assert!(!display.is_detected());
        assert!(display.release().display_bus.transfers().is_empty());
    }

    #[test]
    fn test_with_geometry_selects_lcd_without_trying_oled() {
        let bus = MockBus::with_devices(&[OLED, LCD]);
        let display = Display::with_geometry(bus, MockDelay, config(), 16, 2);
        assert_eq!(display.detected_type(), DisplayType::Pcf8574t1602);
        assert!(display.release().display_bus.writes_to(OLED).is_empty());
    }

    #[test]
    fn test_with_geometry_other_selects_oled() {
        let bus = MockBus::with_devices(&[OLED, LCD]);
        let display = Display::with_geometry(bus, MockDelay, config(), 21, 4);
        assert_eq!(display.detected_type(), DisplayType::Ssd1306);
    }

    #[test]
    fn test_sleep_sent_once_and_woken_before_write() {
        let mut display = detect(&[OLED]);
        let timeout = MS_PER_MINUTE;

        display.run(1000);
        display.run(1000 + timeout);
        assert!(!display.is_sleep());
        display.run(1001 + timeout);
        assert!(display.is_sleep());
        display.run(2000 + timeout);
        display.run(9000 + timeout);

        display.write(1, "A");
        assert!(!display.is_sleep());

        let bus = display.release().display_bus;
        let commands = bus.commands_to(OLED);
        let sleeps = commands.iter().filter(|&&c| c == DISPLAY_OFF).count();
        // One more DISPLAY_OFF comes from the init sequence
        assert_eq!(sleeps, 2);
        assert_eq!(commands.last(), Some(&crate::command::SET_START_PAGE));

        let writes = bus.writes_to(OLED);
        let off = writes
            .iter()
            .rposition(|w| w[..] == [0x00, DISPLAY_OFF])
            .unwrap();
        assert_eq!(writes[off + 1], alloc::vec![0x00, DISPLAY_ON]);
        assert_eq!(writes.last().unwrap()[0], crate::command::DATA_MODE);
    }

    #[test]
    fn test_activity_restarts_timeout() {
        let mut display = detect(&[OLED]);
        display.run(0);
        display.put_char(b'x');
        display.run(MS_PER_MINUTE - 10);
        display.run(MS_PER_MINUTE + 1);
        assert!(!display.is_sleep());
        display.run(2 * MS_PER_MINUTE);
        assert!(display.is_sleep());
    }

    #[test]
    fn test_zero_timeout_never_sleeps() {
        let mut display = detect(&[OLED]);
        display.set_sleep_timeout(0);
        assert_eq!(display.sleep_timeout(), 0);
        display.run(0);
        display.run(u32::MAX / 2);
        assert!(!display.is_sleep());
    }

    #[test]
    fn test_write_and_printf_truncate_to_columns() {
        let mut display = detect(&[LCD]);
        assert_eq!(display.write(1, "short"), 5);
        assert_eq!(display.write(2, "this line is far too long"), 20);
        assert_eq!(display.printf(3, format_args!("{:>30}", 7)), 20);
        assert_eq!(display.write(5, "no such line"), 0);
        assert_eq!(display.write(0, "no such line"), 0);
    }

    fn oled_row(display: &Display<MockBus, MockDelay>, line: usize) -> &[u8] {
        let Slot::Active(Backend::Oled(oled)) = &display.slot else {
            panic!("OLED not started");
        };
        &oled.shadow()[(line - 1) * 21..line * 21]
    }

    #[test]
    fn test_write_and_printf_keep_the_start_of_the_line() {
        let mut display = detect(&[OLED]);

        assert_eq!(display.write(2, "abcdefghijklmnopqrstuvwxyz"), 21);
        assert_eq!(oled_row(&display, 2), b"abcdefghijklmnopqrstu");

        let args = format_args!("IP {}.{}.{}.{}:{}", 192, 168, 100, 200, 6454);
        let printed = display.printf(3, args);
        assert_eq!(printed, 21);
        assert_eq!(oled_row(&display, 3), b"IP 192.168.100.200:64");

        assert_eq!(display.write(1, "short"), 5);
        assert_eq!(&oled_row(&display, 1)[..6], b"short ");
        assert_eq!(oled_row(&display, 4), [b' '; 21]);
    }

    #[test]
    fn test_text_status_on_shared_bus() {
        let bus = RefCell::new(MockBus::with_devices(&[OLED, SEGMENT]));
        let mut display = Display::detect(RefCellDevice::new(&bus), MockDelay, config());
        assert!(display.attach_7segment(RefCellDevice::new(&bus)));
        assert!(display.has_7segment());

        bus.borrow_mut().clear_log();
        display.text_status_with("Ready", Segment7Message::InfoReady);

        let bus = bus.borrow();
        assert_eq!(
            bus.writes_to(SEGMENT),
            alloc::vec![alloc::vec![MCP23017_GPIOA, 0x5C, 0x3D]]
        );
        let glyphs: alloc::vec::Vec<_> = bus
            .data_to(OLED)
            .into_iter()
            .filter(|d| d.len() == crate::font::GLYPH_BYTES)
            .collect();
        assert_eq!(glyphs.len(), 5);
        assert_eq!(glyphs[0], crate::font::glyph(b'R').to_vec());
    }

    #[test]
    fn test_attach_7segment_absent() {
        let mut display = detect(&[OLED]);
        assert!(!display.attach_7segment(MockBus::with_devices(&[])));
        assert!(!display.has_7segment());
        display.status(Segment7Message::ErrorFatal);
        assert!(display.release().segment_bus.is_none());
    }

    #[test]
    fn test_release_returns_bus_after_failed_detection() {
        let display = detect(&[0x50]);
        let parts = display.release();
        assert!(parts.segment_bus.is_none());
        assert!(parts.display_bus.transfers().is_empty());
    }
}
