//! 6x8 glyph table for the OLED backend
//!
//! Each glyph is stored column-encoded, ready to be sent as one I2C data
//! transfer: the [`DATA_MODE`] control byte followed by 6 column bytes, LSB at
//! the top. The table covers the printable ASCII range 32..=127.

use crate::command::DATA_MODE;

/// Glyph width in pixels (columns)
pub const GLYPH_WIDTH: u8 = 6;

/// Glyph height in pixels, one OLED page
pub const GLYPH_HEIGHT: u8 = 8;

/// Bytes per glyph transfer: control byte plus columns
pub const GLYPH_BYTES: usize = GLYPH_WIDTH as usize + 1;

/// First character code in the table
pub const FIRST_CHAR: u8 = 32;

/// Last character code in the table
pub const LAST_CHAR: u8 = 127;

/// Glyph transfers for codes 32..=127
pub static FONT_6X8: [[u8; GLYPH_BYTES]; 96] = [
    [DATA_MODE, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [DATA_MODE, 0x00, 0x00, 0x5F, 0x00, 0x00, 0x00], // '!'
    [DATA_MODE, 0x00, 0x07, 0x00, 0x07, 0x00, 0x00], // '"'
    [DATA_MODE, 0x14, 0x7F, 0x14, 0x7F, 0x14, 0x00], // '#'
    [DATA_MODE, 0x24, 0x2A, 0x7F, 0x2A, 0x12, 0x00], // '$'
    [DATA_MODE, 0x23, 0x13, 0x08, 0x64, 0x62, 0x00], // '%'
    [DATA_MODE, 0x36, 0x49, 0x56, 0x20, 0x50, 0x00], // '&'
    [DATA_MODE, 0x00, 0x08, 0x07, 0x03, 0x00, 0x00], // "'"
    [DATA_MODE, 0x00, 0x1C, 0x22, 0x41, 0x00, 0x00], // '('
    [DATA_MODE, 0x00, 0x41, 0x22, 0x1C, 0x00, 0x00], // ')'
    [DATA_MODE, 0x2A, 0x1C, 0x7F, 0x1C, 0x2A, 0x00], // '*'
    [DATA_MODE, 0x08, 0x08, 0x3E, 0x08, 0x08, 0x00], // '+'
    [DATA_MODE, 0x00, 0x80, 0x70, 0x30, 0x00, 0x00], // ','
    [DATA_MODE, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00], // '-'
    [DATA_MODE, 0x00, 0x00, 0x60, 0x60, 0x00, 0x00], // '.'
    [DATA_MODE, 0x20, 0x10, 0x08, 0x04, 0x02, 0x00], // '/'
    [DATA_MODE, 0x3E, 0x51, 0x49, 0x45, 0x3E, 0x00], // '0'
    [DATA_MODE, 0x00, 0x42, 0x7F, 0x40, 0x00, 0x00], // '1'
    [DATA_MODE, 0x72, 0x49, 0x49, 0x49, 0x46, 0x00], // '2'
    [DATA_MODE, 0x21, 0x41, 0x49, 0x4D, 0x33, 0x00], // '3'
    [DATA_MODE, 0x18, 0x14, 0x12, 0x7F, 0x10, 0x00], // '4'
    [DATA_MODE, 0x27, 0x45, 0x45, 0x45, 0x39, 0x00], // '5'
    [DATA_MODE, 0x3C, 0x4A, 0x49, 0x49, 0x31, 0x00], // '6'
    [DATA_MODE, 0x41, 0x21, 0x11, 0x09, 0x07, 0x00], // '7'
    [DATA_MODE, 0x36, 0x49, 0x49, 0x49, 0x36, 0x00], // '8'
    [DATA_MODE, 0x46, 0x49, 0x49, 0x29, 0x1E, 0x00], // '9'
    [DATA_MODE, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00], // ':'
    [DATA_MODE, 0x00, 0x40, 0x34, 0x00, 0x00, 0x00], // ';'
    [DATA_MODE, 0x00, 0x08, 0x14, 0x22, 0x41, 0x00], // '<'
    [DATA_MODE, 0x14, 0x14, 0x14, 0x14, 0x14, 0x00], // '='
    [DATA_MODE, 0x00, 0x41, 0x22, 0x14, 0x08, 0x00], // '>'
    [DATA_MODE, 0x02, 0x01, 0x59, 0x09, 0x06, 0x00], // '?'
    [DATA_MODE, 0x3E, 0x41, 0x5D, 0x59, 0x4E, 0x00], // '@'
    [DATA_MODE, 0x7C, 0x12, 0x11, 0x12, 0x7C, 0x00], // 'A'
    [DATA_MODE, 0x7F, 0x49, 0x49, 0x49, 0x36, 0x00], // 'B'
    [DATA_MODE, 0x3E, 0x41, 0x41, 0x41, 0x22, 0x00], // 'C'
    [DATA_MODE, 0x7F, 0x41, 0x41, 0x41, 0x3E, 0x00], // 'D'
    [DATA_MODE, 0x7F, 0x49, 0x49, 0x49, 0x41, 0x00], // 'E'
    [DATA_MODE, 0x7F, 0x09, 0x09, 0x09, 0x01, 0x00], // 'F'
    [DATA_MODE, 0x3E, 0x41, 0x41, 0x51, 0x73, 0x00], // 'G'
    [DATA_MODE, 0x7F, 0x08, 0x08, 0x08, 0x7F, 0x00], // 'H'
    [DATA_MODE, 0x00, 0x41, 0x7F, 0x41, 0x00, 0x00], // 'I'
    [DATA_MODE, 0x20, 0x40, 0x41, 0x3F, 0x01, 0x00], // 'J'
    [DATA_MODE, 0x7F, 0x08, 0x14, 0x22, 0x41, 0x00], // 'K'
    [DATA_MODE, 0x7F, 0x40, 0x40, 0x40, 0x40, 0x00], // 'L'
    [DATA_MODE, 0x7F, 0x02, 0x1C, 0x02, 0x7F, 0x00], // 'M'
    [DATA_MODE, 0x7F, 0x04, 0x08, 0x10, 0x7F, 0x00], // 'N'
    [DATA_MODE, 0x3E, 0x41, 0x41, 0x41, 0x3E, 0x00], // 'O'
    [DATA_MODE, 0x7F, 0x09, 0x09, 0x09, 0x06, 0x00], // 'P'
    [DATA_MODE, 0x3E, 0x41, 0x51, 0x21, 0x5E, 0x00], // 'Q'
    [DATA_MODE, 0x7F, 0x09, 0x19, 0x29, 0x46, 0x00], // 'R'
    [DATA_MODE, 0x26, 0x49, 0x49, 0x49, 0x32, 0x00], // 'S'
    [DATA_MODE, 0x03, 0x01, 0x7F, 0x01, 0x03, 0x00], // 'T'
    [DATA_MODE, 0x3F, 0x40, 0x40, 0x40, 0x3F, 0x00], // 'U'
    [DATA_MODE, 0x1F, 0x20, 0x40, 0x20, 0x1F, 0x00], // 'V'
    [DATA_MODE, 0x3F, 0x40, 0x38, 0x40, 0x3F, 0x00], // 'W'
    [DATA_MODE, 0x63, 0x14, 0x08, 0x14, 0x63, 0x00], // 'X'
    [DATA_MODE, 0x03, 0x04, 0x78, 0x04, 0x03, 0x00], // 'Y'
    [DATA_MODE, 0x61, 0x59, 0x49, 0x4D, 0x43, 0x00], // 'Z'
    [DATA_MODE, 0x00, 0x7F, 0x41, 0x41, 0x41, 0x00], // '['
    [DATA_MODE, 0x02, 0x04, 0x08, 0x10, 0x20, 0x00], // '\\'
    [DATA_MODE, 0x00, 0x41, 0x41, 0x41, 0x7F, 0x00], // ']'
    [DATA_MODE, 0x04, 0x02, 0x01, 0x02, 0x04, 0x00], // '^'
    [DATA_MODE, 0x40, 0x40, 0x40, 0x40, 0x40, 0x00], // '_'
    [DATA_MODE, 0x00, 0x03, 0x07, 0x08, 0x00, 0x00], // '`'
    [DATA_MODE, 0x20, 0x54, 0x54, 0x78, 0x40, 0x00], // 'a'
    [DATA_MODE, 0x7F, 0x28, 0x44, 0x44, 0x38, 0x00], // 'b'
    [DATA_MODE, 0x38, 0x44, 0x44, 0x44, 0x28, 0x00], // 'c'
    [DATA_MODE, 0x38, 0x44, 0x44, 0x28, 0x7F, 0x00], // 'd'
    [DATA_MODE, 0x38, 0x54, 0x54, 0x54, 0x18, 0x00], // 'e'
    [DATA_MODE, 0x00, 0x08, 0x7E, 0x09, 0x02, 0x00], // 'f'
    [DATA_MODE, 0x18, 0xA4, 0xA4, 0x9C, 0x78, 0x00], // 'g'
    [DATA_MODE, 0x7F, 0x08, 0x04, 0x04, 0x78, 0x00], // 'h'
    [DATA_MODE, 0x00, 0x44, 0x7D, 0x40, 0x00, 0x00], // 'i'
    [DATA_MODE, 0x20, 0x40, 0x40, 0x3D, 0x00, 0x00], // 'j'
    [DATA_MODE, 0x7F, 0x10, 0x28, 0x44, 0x00, 0x00], // 'k'
    [DATA_MODE, 0x00, 0x41, 0x7F, 0x40, 0x00, 0x00], // 'l'
    [DATA_MODE, 0x7C, 0x04, 0x78, 0x04, 0x78, 0x00], // 'm'
    [DATA_MODE, 0x7C, 0x08, 0x04, 0x04, 0x78, 0x00], // 'n'
    [DATA_MODE, 0x38, 0x44, 0x44, 0x44, 0x38, 0x00], // 'o'
    [DATA_MODE, 0xFC, 0x18, 0x24, 0x24, 0x18, 0x00], // 'p'
    [DATA_MODE, 0x18, 0x24, 0x24, 0x18, 0xFC, 0x00], // 'q'
    [DATA_MODE, 0x7C, 0x08, 0x04, 0x04, 0x08, 0x00], // 'r'
    [DATA_MODE, 0x48, 0x54, 0x54, 0x54, 0x24, 0x00], // 's'
    [DATA_MODE, 0x04, 0x04, 0x3F, 0x44, 0x24, 0x00], // 't'
    [DATA_MODE, 0x3C, 0x40, 0x40, 0x20, 0x7C, 0x00], // 'u'
    [DATA_MODE, 0x1C, 0x20, 0x40, 0x20, 0x1C, 0x00], // 'v'
    [DATA_MODE, 0x3C, 0x40, 0x30, 0x40, 0x3C, 0x00], // 'w'
    [DATA_MODE, 0x44, 0x28, 0x10, 0x28, 0x44, 0x00], // 'x'
    [DATA_MODE, 0x4C, 0x90, 0x90, 0x90, 0x7C, 0x00], // 'y'
    [DATA_MODE, 0x44, 0x64, 0x54, 0x4C, 0x44, 0x00], // 'z'
    [DATA_MODE, 0x00, 0x08, 0x36, 0x41, 0x00, 0x00], // '{'
    [DATA_MODE, 0x00, 0x00, 0x77, 0x00, 0x00, 0x00], // '|'
    [DATA_MODE, 0x00, 0x41, 0x36, 0x08, 0x00, 0x00], // '}'
    [DATA_MODE, 0x02, 0x01, 0x02, 0x04, 0x02, 0x00], // '~'
    [DATA_MODE, 0x3C, 0x26, 0x23, 0x26, 0x3C, 0x00], // DEL
];

/// Map a character code to its table index
///
/// Codes outside the printable range map to the space glyph, so every
/// character produces exactly one glyph on the panel. Returns the character
/// that will actually be displayed together with its index.
pub fn glyph_index(code: u8) -> (u8, usize) {
    if (FIRST_CHAR..=LAST_CHAR).contains(&code) {
        (code, (code - FIRST_CHAR) as usize)
    } else {
        (b' ', 0)
    }
}

/// Glyph transfer for a character code, see [`glyph_index`]
pub fn glyph(code: u8) -> &'static [u8; GLYPH_BYTES] {
    &FONT_6X8[glyph_index(code).1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_glyph_starts_with_data_mode() {
        assert!(FONT_6X8.iter().all(|g| g[0] == DATA_MODE));
    }

    #[test]
    fn test_printable_codes_map_to_themselves() {
        assert_eq!(glyph_index(b'A'), (b'A', 33));
        assert_eq!(glyph_index(b' '), (b' ', 0));
        assert_eq!(glyph_index(127), (127, 95));
    }

    #[test]
    fn test_non_printable_codes_map_to_space() {
        assert_eq!(glyph_index(0), (b' ', 0));
        assert_eq!(glyph_index(b'\n'), (b' ', 0));
        assert_eq!(glyph_index(200), (b' ', 0));
        assert_eq!(glyph(31), glyph(b' '));
    }

    #[test]
    fn test_glyph_for_exclamation_mark() {
        assert_eq!(glyph(b'!'), &[DATA_MODE, 0x00, 0x00, 0x5F, 0x00, 0x00, 0x00]);
    }
}
