//! Front-Panel Text Display Driver
//!
//! Text output for the small I2C displays found on lighting-controller front
//! panels: SSD1306/SH1106 OLED modules and HD44780 character LCDs behind a
//! PCF8574T backpack, plus an optional two-digit 7-segment status indicator.
//!
//! ## Features
//!
//! - `no_std` compatible, no allocation
//! - `embedded-hal` v1.0 support
//! - Runtime display detection with a uniform text API
//! - SSD1306 vs SH1106 detection with automatic column offset
//! - Shadow buffer of on-screen text for cursor redraw and diagnostics
//! - Idle sleep timeout driven from the main loop
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::i2c::{ErrorType, I2c, Operation};
//! use frontpanel::{Builder, Display, OledPanel, Segment7Message};
//!
//! # struct MockI2c;
//! # impl ErrorType for MockI2c { type Error = Infallible; }
//! # impl I2c for MockI2c {
//! #     fn transaction(
//! #         &mut self,
//! #         _address: u8,
//! #         _operations: &mut [Operation<'_>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let i2c = MockI2c;
//! # let delay = MockDelay;
//! let config = match Builder::new().oled_panel(OledPanel::Panel128x32Rows4).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::detect(i2c, delay, config);
//! display.cls();
//! display.write(1, "Art-Net 4 Node");
//! display.text_status_with("Starting", Segment7Message::InfoStartup);
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// Capability set shared by all display backends
pub mod backend;
/// OLED and character LCD command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Front-panel display façade
pub mod display;
/// Error types for the driver
pub mod error;
/// 6x8 glyph table
pub mod font;
/// Hardware interface abstraction
pub mod interface;
/// HD44780 character LCD behind a PCF8574T
pub mod lcd;
/// SSD1306 / SH1106 OLED text backend
pub mod oled;
/// 7-segment status indicator
pub mod segment;

#[cfg(test)]
mod mock;

pub use backend::{Backend, TextDisplay};
pub use config::{
    Builder, Config, CursorMode, DisplayType, LcdPanel, MAX_TEXT_CELLS, OledPanel, PanelGeometry,
};
pub use display::{Display, Parts};
pub use error::{BuilderError, Error};
pub use interface::InterfaceError;
pub use interface::{DisplayInterface, Interface};
pub use lcd::Lcd;
pub use oled::{Controller, Oled};
pub use segment::{Segment7, Segment7Message, encode_value};
