use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use thiserror::Error;

use crate::decoder::checksum::check_digit;

/// Number of digits in an EAN-13 code
pub const EAN13_DIGITS: usize = 13;

/// Half of the symbol a digit group belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Digits between the start guard and the center guard
    Left,
    /// Digits between the center guard and the end guard
    Right,
}

impl Side {
    /// Whether the first module of a digit on this side is dark.
    /// Left digits start with a space, right digits with a bar.
    pub fn starts_dark(self) -> bool {
        matches!(self, Side::Right)
    }
}

/// A decoded symbol character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digit {
    /// Digit value 0-9
    pub value: u8,
    /// True when the odd (L) encoding was used
    pub is_odd: bool,
}

/// A complete 13-digit EAN-13 code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ean13 {
    digits: [u8; EAN13_DIGITS],
}

impl Ean13 {
    /// Build a code from digit values, rejecting anything above 9
    pub fn from_digits(digits: [u8; EAN13_DIGITS]) -> Option<Self> {
        if digits.iter().any(|&d| d > 9) {
            return None;
        }
        Some(Self { digits })
    }

    // digits come from the pattern table and are always 0-9
    pub(crate) fn from_parts(digits: [u8; EAN13_DIGITS]) -> Self {
        debug_assert!(digits.iter().all(|&d| d <= 9));
        Self { digits }
    }

    /// All 13 digits in reading order
    pub fn digits(&self) -> &[u8; EAN13_DIGITS] {
        &self.digits
    }

    /// The implicit digit recovered from left-hand parity
    pub fn first_digit(&self) -> u8 {
        self.digits[0]
    }

    /// The six digits encoded left of the center guard
    pub fn left(&self) -> &[u8] {
        &self.digits[1..7]
    }

    /// The six digits encoded right of the center guard
    pub fn right(&self) -> &[u8] {
        &self.digits[7..]
    }

    /// The last digit as read from the symbol
    pub fn check_digit(&self) -> u8 {
        self.digits[EAN13_DIGITS - 1]
    }

    /// Whether the last digit matches the weighted sum of the first twelve
    pub fn has_valid_check_digit(&self) -> bool {
        check_digit(&self.digits[..EAN13_DIGITS - 1]) == self.check_digit()
    }

    /// Printed form with the first digit and both halves separated, e.g. `4-006381-333931`
    pub fn grouped(&self) -> String {
        let mut out = String::with_capacity(EAN13_DIGITS + 2);
        for (i, d) in self.digits.iter().enumerate() {
            if i == 1 || i == 7 {
                out.push('-');
            }
            out.push(char::from(b'0' + d));
        }
        out
    }
}

impl fmt::Display for Ean13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.digits {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

/// Errors from parsing an EAN-13 string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEan13Error {
    /// The string did not contain exactly 13 digits
    #[error("expected 13 digits, found {0}")]
    WrongLength(usize),
    /// A character other than a digit or a group separator
    #[error("invalid character {0:?} in EAN-13 code")]
    InvalidCharacter(char),
}

impl FromStr for Ean13 {
    type Err = ParseEan13Error;

    /// Accepts plain (`4006381333931`) and grouped (`4-006381-333931`) forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut digits = [0u8; EAN13_DIGITS];
        let mut count = 0usize;
        for c in s.trim().chars() {
            if c == '-' || c == ' ' {
                continue;
            }
            let value = c.to_digit(10).ok_or(ParseEan13Error::InvalidCharacter(c))?;
            if count < EAN13_DIGITS {
                digits[count] = value as u8;
            }
            count += 1;
        }
        if count != EAN13_DIGITS {
            return Err(ParseEan13Error::WrongLength(count));
        }
        Ok(Self { digits })
    }
}

/// A successfully decoded scanline
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// The decoded code
    pub code: Ean13,
    /// Pixel span from the first to the last guard bar (end exclusive)
    pub span: Range<usize>,
    /// Module width estimated from the guard bars, in pixels
    pub module_width: f64,
}
