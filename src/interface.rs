//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for talking to a display controller (or any other front-panel chip) over I2C.
//!
//! ## Transfer Model
//!
//! Every front-panel chip used by this crate is a write-mostly I2C slave:
//! - **Mode-prefixed writes**: the first byte selects command or data mode
//!   (`0x00` / `0x40` on SSD1306 and SH1106), or a register address on an
//!   I/O expander such as the MCP23017
//! - **Raw writes**: payload already carries its own mode byte (OLED glyph rows),
//!   or the chip has no mode byte at all (PCF8574T)
//! - **Reads**: a mode byte is written, then bytes are read back with a
//!   repeated start
//!
//! Bus speed and bus initialisation belong to the HAL that constructs the
//! [`I2c`] instance; this module only issues transactions.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::i2c::{ErrorType, I2c, Operation};
//! use frontpanel::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! let mut interface = Interface::new(MockI2c, 0x3C);
//!
//! if interface.is_present().unwrap_or(false) {
//!     // Display off, in command mode
//!     let _ = interface.write(0x00, &[0xAE]);
//! }
//! ```

use core::fmt::Debug;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c, Operation};

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for the byte transport between a driver and its chip
///
/// This trait abstracts over different hardware implementations,
/// allowing the backends to work with any I2C implementation that
/// satisfies embedded-hal traits, and allowing tests to record traffic.
///
/// Each call is one bus transaction. The OLED protocol relies on this:
/// a glyph is one transfer, an addressing command is one transfer.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// 7-bit slave address this interface talks to
    fn address(&self) -> u8;

    /// Check that the slave acknowledges its address
    ///
    /// Returns `Ok(false)` when the address is not acknowledged. Any other
    /// bus failure is reported as an error.
    fn is_present(&mut self) -> InterfaceResult<bool, Self::Error>;

    /// Write `mode` followed by `data` as a single transfer
    fn write(&mut self, mode: u8, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Write `data` as a single transfer, without a prefix
    fn write_raw(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Write `mode`, then read `buffer.len()` bytes after a repeated start
    fn read(&mut self, mode: u8, buffer: &mut [u8]) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
#[derive(Debug)]
pub enum InterfaceError<I2cErr> {
    /// I2C communication error
    I2c(I2cErr),
}

impl<I2cErr: Debug> core::fmt::Display for InterfaceError<I2cErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "I2C error: {e:?}"),
        }
    }
}

impl<I2cErr: Debug> core::error::Error for InterfaceError<I2cErr> {}

/// I2C interface implementation
///
/// Implements [`DisplayInterface`] for an embedded-hal v1.0 [`I2c`] bus and a
/// fixed slave address.
///
/// ## Type Parameters
///
/// * `I2C` - I2C bus (or shared bus device) implementing [`I2c`]
pub struct Interface<I2C> {
    /// I2C bus
    i2c: I2C,
    /// 7-bit slave address
    address: u8,
}

impl<I2C> Interface<I2C>
where
    I2C: I2c,
{
    /// Create a new Interface for the slave at `address`
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Give back the I2C bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    #[cfg(test)]
    pub(crate) fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }
}

impl<I2C> DisplayInterface for Interface<I2C>
where
    I2C: I2c,
{
    type Error = InterfaceError<I2C::Error>;

    fn address(&self) -> u8 {
        self.address
    }

    fn is_present(&mut self) -> InterfaceResult<bool, Self::Error> {
        let mut scratch = [0u8; 1];
        match self.i2c.read(self.address, &mut scratch) {
            Ok(()) => Ok(true),
            Err(e) if matches!(e.kind(), ErrorKind::NoAcknowledge(_)) => Ok(false),
            Err(e) => Err(InterfaceError::I2c(e)),
        }
    }

    fn write(&mut self, mode: u8, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        // Adjacent write operations go out without a repeated start
        self.i2c
            .transaction(
                self.address,
                &mut [Operation::Write(&[mode]), Operation::Write(data)],
            )
            .map_err(InterfaceError::I2c)
    }

    fn write_raw(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.i2c
            .write(self.address, data)
            .map_err(InterfaceError::I2c)
    }

    fn read(&mut self, mode: u8, buffer: &mut [u8]) -> InterfaceResult<(), Self::Error> {
        self.i2c
            .write_read(self.address, &[mode], buffer)
            .map_err(InterfaceError::I2c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBus;

    #[test]
    fn test_is_present_acknowledged() {
        let mut interface = Interface::new(MockBus::with_devices(&[0x3C]), 0x3C);
        assert!(matches!(interface.is_present(), Ok(true)));
    }

    #[test]
    fn test_is_present_not_acknowledged() {
        let mut interface = Interface::new(MockBus::with_devices(&[0x27]), 0x3C);
        assert!(matches!(interface.is_present(), Ok(false)));
    }

    #[test]
    fn test_write_prefixes_mode_in_one_transfer() {
        let mut interface = Interface::new(MockBus::with_devices(&[0x3C]), 0x3C);
        interface.write(0x00, &[0xAE]).unwrap();
        interface.write_raw(&[0x40, 0x01, 0x02]).unwrap();

        let bus = interface.release();
        assert_eq!(bus.writes_to(0x3C), alloc::vec![
            alloc::vec![0x00, 0xAE],
            alloc::vec![0x40, 0x01, 0x02],
        ]);
    }

    #[test]
    fn test_read_writes_mode_then_reads() {
        let mut bus = MockBus::with_devices(&[0x3C]);
        bus.set_read_response(&[1, 2, 3]);
        let mut interface = Interface::new(bus, 0x3C);

        let mut buffer = [0u8; 3];
        interface.read(0x40, &mut buffer).unwrap();
        assert_eq!(buffer, [1, 2, 3]);
        assert_eq!(interface.address(), 0x3C);
    }
}
