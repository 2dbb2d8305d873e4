//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and backend operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors from a display backend
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level bus errors
//!
//! Out-of-range positions and line numbers are not errors: backends ignore
//! them so a misbehaving caller cannot take the front panel down.
//!
//! ## Example
//!
//! ```
//! use frontpanel::{Builder, BuilderError};
//!
//! // 8-bit addresses are rejected
//! let result = Builder::new().oled_address(0x78).build();
//! assert!(matches!(result, Err(BuilderError::InvalidAddress { address: 0x78 })));
//! ```

use crate::interface::DisplayInterface;

/// Highest valid 7-bit I2C slave address
pub const MAX_I2C_ADDRESS: u8 = 0x7F;

/// Errors that can occur when interacting with a display backend
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
pub enum Error<I: DisplayInterface> {
    /// Interface error (I2C)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`] implementation.
    Interface(I::Error),
    /// No device acknowledged at the configured address
    ///
    /// Only reported by `start()`. The backend must not be used afterwards.
    NotPresent {
        /// 7-bit address that was probed
        address: u8,
    },
    /// The configured panel type cannot be driven by this backend
    ///
    /// Only reported by `start()`, before any bus traffic.
    UnsupportedPanel,
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "Interface error"),
            Self::NotPresent { address } => {
                write!(f, "No device at address {address:#04x}")
            }
            Self::UnsupportedPanel => write!(f, "Unsupported panel type"),
        }
    }
}

// Not derived: interfaces are not required to be `Debug`
impl<I: DisplayInterface> core::fmt::Debug for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => f.debug_tuple("Interface").field(e).finish(),
            Self::NotPresent { address } => f
                .debug_struct("NotPresent")
                .field("address", address)
                .finish(),
            Self::UnsupportedPanel => f.write_str("UnsupportedPanel"),
        }
    }
}

impl<I: DisplayInterface> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq)]
pub enum BuilderError {
    /// Address does not fit in 7 bits
    ///
    /// Pass the 7-bit address (e.g. 0x3C), not the shifted 8-bit form (0x78).
    InvalidAddress {
        /// Address that was requested
        address: u8,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidAddress { address } => write!(
                f,
                "Invalid I2C address {address:#04x} (max {MAX_I2C_ADDRESS:#04x})"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
