use std::fmt;

use thiserror::Error;

use crate::decoder::tables::{BitPattern, ParityMask};

/// Which of the two module-count checks rejected a digit group
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModuleCheck {
    /// Group width divided by the guard module width did not round to 7
    BarCount {
        /// Unrounded module count of the whole group
        modules: f64,
    },
    /// Per-run rounding produced logical widths that do not sum to 7
    LogicalSum {
        /// Sum of the rounded logical widths
        sum: u32,
    },
}

impl fmt::Display for ModuleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleCheck::BarCount { modules } => {
                write!(f, "bar-count check failed ({modules:.2} modules, expected 7)")
            }
            ModuleCheck::LogicalSum { sum } => {
                write!(f, "logical widths sum to {sum}, expected 7")
            }
        }
    }
}

/// Reasons a single scanline fails to decode
///
/// Every variant aborts the current decode attempt. Nothing is corrected
/// silently; callers are expected to report the failure and move on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// No white/bar/white block pattern of acceptable length
    #[error("no guard run found in {blocks} ratio blocks")]
    NoGuardRun {
        /// Number of blocks that were scanned
        blocks: usize,
    },
    /// The decode window did not split into exactly 59 sections
    #[error("expected {expected} sections in decode window, found {found}")]
    SectionCountMismatch {
        /// Sections required by the EAN-13 layout
        expected: usize,
        /// Sections observed
        found: usize,
    },
    /// The decode window does not begin and end on a dark pixel
    #[error("decode window {start}..{end} does not start and end on a dark pixel")]
    GuardAlignment {
        /// First pixel of the searched range
        start: usize,
        /// One past the last pixel of the searched range
        end: usize,
    },
    /// A digit group could not be quantized into 7 modules
    #[error("digit group {group}: {check}")]
    ModuleCount {
        /// Index of the group (0..15)
        group: usize,
        /// Which check failed
        check: ModuleCheck,
    },
    /// A 7-module pattern is not one of the 30 EAN-13 digit patterns
    #[error("digit group {group}: unknown bit pattern {pattern}")]
    UnknownBitPattern {
        /// Index of the group (0..15)
        group: usize,
        /// The pattern that failed lookup
        pattern: BitPattern,
    },
    /// The six left-hand parities do not name a first digit
    #[error("unknown parity prefix {parity}")]
    UnknownParityPrefix {
        /// Left-hand parity flags, 1 = odd
        parity: ParityMask,
    },
    /// The decoded check digit disagrees with the computed one
    #[error("check digit mismatch: decoded {found}, computed {expected}")]
    ChecksumMismatch {
        /// Check digit computed from the first 12 digits
        expected: u8,
        /// Check digit read from the symbol
        found: u8,
    },
    /// The input image has no pixels to scan
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage {
        /// Image width in pixels
        width: usize,
        /// Image height in pixels
        height: usize,
    },
}

impl DecodeError {
    /// Short stable label for reports
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::NoGuardRun { .. } => "no-guard-run",
            DecodeError::SectionCountMismatch { .. } => "section-count",
            DecodeError::GuardAlignment { .. } => "guard-alignment",
            DecodeError::ModuleCount { .. } => "module-count",
            DecodeError::UnknownBitPattern { .. } => "unknown-pattern",
            DecodeError::UnknownParityPrefix { .. } => "unknown-parity",
            DecodeError::ChecksumMismatch { .. } => "checksum",
            DecodeError::EmptyImage { .. } => "empty-image",
        }
    }
}

/// A threshold mode name that is neither `otsu` nor `moving-average`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown threshold mode {0:?}, expected otsu or moving-average")]
pub struct ParseThresholdModeError(pub String);

/// Errors raised while building the digit lookup table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Two reference variants collapsed onto the same key
    #[error("ambiguous lookup table: {entries} distinct entries, expected {expected}")]
    Ambiguous {
        /// Distinct keys after construction
        entries: usize,
        /// Keys required for an unambiguous table
        expected: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_count_message() {
        let err = DecodeError::ModuleCount {
            group: 3,
            check: ModuleCheck::LogicalSum { sum: 6 },
        };
        assert_eq!(
            err.to_string(),
            "digit group 3: logical widths sum to 6, expected 7"
        );
        assert_eq!(err.kind(), "module-count");
    }

    #[test]
    fn test_parity_message_uses_bit_string() {
        let err = DecodeError::UnknownParityPrefix {
            parity: ParityMask::from_flags(&[true, true, true, true, true, false]),
        };
        assert_eq!(err.to_string(), "unknown parity prefix 111110");
    }
}
