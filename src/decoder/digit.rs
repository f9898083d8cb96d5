use crate::models::{Digit, Side};

use super::tables::{BitPattern, DIGIT_RUNS, DigitTable, digit_table};

/// Maps quantized run widths of one digit group to a digit and its parity
#[derive(Debug, Clone, Copy)]
pub struct DigitDecoder {
    table: &'static DigitTable,
}

impl Default for DigitDecoder {
    fn default() -> Self {
        Self {
            table: digit_table(),
        }
    }
}

impl DigitDecoder {
    /// Decoder backed by the shared digit table
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand widths with the side's template: `0101` on the left, `1010` on the right
    pub fn pattern(widths: &[u8; DIGIT_RUNS], side: Side) -> Option<BitPattern> {
        BitPattern::from_runs(side.starts_dark(), widths)
    }

    /// Decode one digit group.
    ///
    /// `Err` carries the assembled pattern when it is not in the table, or
    /// `None` when the widths do not fill exactly 7 modules.
    pub fn decode(
        &self,
        widths: &[u8; DIGIT_RUNS],
        side: Side,
    ) -> Result<Digit, Option<BitPattern>> {
        let pattern = Self::pattern(widths, side).ok_or(None)?;
        self.table.lookup(pattern).ok_or(Some(pattern))
    }
}
