//! Two-digit 7-segment status indicator
//!
//! Patterns are 16 bits wide: the high byte drives the left digit, the low
//! byte the right digit. Within a byte bit 0 is segment `a` through bit 6 for
//! segment `g`, and bit 7 is the decimal point.
//!
//! The indicator hangs off an MCP23017 with port A on the right digit and port
//! B on the left digit.

use crate::command::{MCP23017_GPIOA, MCP23017_IODIRA};
use crate::error::Error;
use crate::interface::DisplayInterface;

type SegmentResult<I> = core::result::Result<(), Error<I>>;

/// Segment patterns for the hex digits 0-F
pub const DIGITS: [u8; 16] = [
    0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, // 0-7
    0x7F, 0x6F, 0x77, 0x7C, 0x39, 0x5E, 0x79, 0x71, // 8-F
];

/// Middle segment only
pub const DASH: u8 = 0x40;

/// Decimal point
pub const DOT: u8 = 0x80;

const fn pair(left: u8, right: u8) -> u16 {
    ((left as u16) << 8) | right as u16
}

// Letters not covered by DIGITS
const LETTER_G: u8 = 0x3D;
const LETTER_H: u8 = 0x74;
const LETTER_N: u8 = 0x54;
const LETTER_O: u8 = 0x5C;
const LETTER_P: u8 = 0x73;
const LETTER_R: u8 = 0x50;
const LETTER_T: u8 = 0x78;

/// Boot and error stages shown on the indicator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum Segment7Message {
    /// Both digits dark
    Blank = 0,
    /// `--` power on
    InfoStartup = pair(DASH, DASH),
    /// `n1` network interface coming up
    InfoNetworkInit = pair(LETTER_N, 0x06),
    /// `dh` waiting for DHCP
    InfoDhcp = pair(0x5E, LETTER_H),
    /// `IP` address assigned
    InfoIp = pair(0x30, LETTER_P),
    /// `nt` time sync
    InfoNtp = pair(LETTER_N, LETTER_T),
    /// `CF` reading configuration
    InfoConfig = pair(0x39, 0x71),
    /// `Go` running
    InfoReady = pair(LETTER_G, LETTER_O),
    /// `rE` reboot requested
    InfoReboot = pair(LETTER_R, 0x79),
    /// `En` network failure
    ErrorNetwork = pair(0x79, LETTER_N),
    /// `Ed` DHCP failure
    ErrorDhcp = pair(0x79, 0x5E),
    /// `EC` bad configuration
    ErrorConfig = pair(0x79, 0x39),
    /// `EE` unspecified failure
    ErrorFatal = pair(0x79, 0x79),
}

impl Segment7Message {
    /// Raw segment pattern
    pub fn pattern(self) -> u16 {
        self as u16
    }
}

impl From<Segment7Message> for u16 {
    fn from(message: Segment7Message) -> Self {
        message.pattern()
    }
}

/// Render `value` on two digits
///
/// Hex shows both nibbles. Decimal values above 99 do not fit and show `--`
/// with the decimal point lit.
pub fn encode_value(value: u8, hex: bool) -> u16 {
    if hex {
        return pair(DIGITS[(value >> 4) as usize], DIGITS[(value & 0x0F) as usize]);
    }

    match value {
        0..=99 => pair(DIGITS[(value / 10) as usize], DIGITS[(value % 10) as usize]),
        _ => pair(DASH, DASH | DOT),
    }
}

/// MCP23017 driving the indicator
pub struct Segment7<I: DisplayInterface> {
    interface: I,
}

impl<I> Segment7<I>
where
    I: DisplayInterface,
{
    /// Wrap an interface addressed at the MCP23017
    pub fn new(interface: I) -> Self {
        Self { interface }
    }

    /// Make both ports outputs and blank the digits
    ///
    /// # Errors
    ///
    /// [`Error::NotPresent`] if the expander does not acknowledge.
    pub fn start(&mut self) -> SegmentResult<I> {
        if !self.interface.is_present().map_err(Error::Interface)? {
            return Err(Error::NotPresent {
                address: self.interface.address(),
            });
        }

        // IODIRA then IODIRB, sequential addressing
        self.interface
            .write(MCP23017_IODIRA, &[0x00, 0x00])
            .map_err(Error::Interface)?;
        self.show(Segment7Message::Blank.pattern())
    }

    /// Latch `pattern` onto both digits in one transfer
    pub fn show(&mut self, pattern: u16) -> SegmentResult<I> {
        let [left, right] = pattern.to_be_bytes();
        self.interface
            .write(MCP23017_GPIOA, &[right, left])
            .map_err(Error::Interface)
    }

    /// Give back the interface
    pub fn release(self) -> I {
        self.interface
    }
}
