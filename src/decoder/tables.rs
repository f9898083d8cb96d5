use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::error::TableError;
use crate::models::{Digit, Side};

/// Modules per encoded digit
pub const DIGIT_MODULES: usize = 7;

/// Runs (bars and spaces) per encoded digit
pub const DIGIT_RUNS: usize = 4;

/// A 7-module digit pattern, most significant of the 7 bits is the first module (1 = dark)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitPattern(u8);

impl BitPattern {
    const MASK: u8 = 0x7F;

    /// Wrap raw bits, rejecting values wider than 7 modules
    pub fn new(bits: u8) -> Option<Self> {
        (bits <= Self::MASK).then_some(Self(bits))
    }

    /// Parse a string such as `"0001101"`
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != DIGIT_MODULES {
            return None;
        }
        let mut bits = 0u8;
        for c in s.chars() {
            bits = (bits << 1)
                | match c {
                    '0' => 0,
                    '1' => 1,
                    _ => return None,
                };
        }
        Some(Self(bits))
    }

    /// Expand 4 run widths into modules, alternating from `first_dark`.
    /// Returns `None` unless the widths add up to exactly 7.
    pub fn from_runs(first_dark: bool, widths: &[u8; DIGIT_RUNS]) -> Option<Self> {
        let total: u32 = widths.iter().map(|&w| u32::from(w)).sum();
        if total != DIGIT_MODULES as u32 {
            return None;
        }
        let mut bits = 0u8;
        let mut dark = first_dark;
        for &width in widths {
            for _ in 0..width {
                bits = (bits << 1) | u8::from(dark);
            }
            dark = !dark;
        }
        Some(Self(bits))
    }

    /// Module `i` (0 = first), true = dark
    pub fn module(self, i: usize) -> bool {
        i < DIGIT_MODULES && (self.0 >> (DIGIT_MODULES - 1 - i)) & 1 == 1
    }

    /// Swap bars and spaces
    pub fn complement(self) -> Self {
        Self(!self.0 & Self::MASK)
    }

    /// Mirror the pattern left to right
    pub fn reversed(self) -> Self {
        Self(self.0.reverse_bits() >> 1)
    }

    /// Split into run widths. `None` if the pattern does not have exactly 4 runs.
    pub fn run_widths(self) -> Option<[u8; DIGIT_RUNS]> {
        let mut widths = [0u8; DIGIT_RUNS];
        let mut run = 0usize;
        let mut current = self.module(0);
        for i in 0..DIGIT_MODULES {
            let m = self.module(i);
            if m != current {
                run += 1;
                current = m;
                if run >= DIGIT_RUNS {
                    return None;
                }
            }
            widths[run] += 1;
        }
        (run == DIGIT_RUNS - 1).then_some(widths)
    }
}

impl fmt::Display for BitPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..DIGIT_MODULES {
            f.write_str(if self.module(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Odd (L-code) reference patterns, indexed by digit value
pub const ODD_PATTERNS: [BitPattern; 10] = [
    BitPattern(0b0001101),
    BitPattern(0b0011001),
    BitPattern(0b0010011),
    BitPattern(0b0111101),
    BitPattern(0b0100011),
    BitPattern(0b0110001),
    BitPattern(0b0101111),
    BitPattern(0b0111011),
    BitPattern(0b0110111),
    BitPattern(0b0001011),
];

/// The three encodings a digit can appear in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSet {
    /// Left half, odd parity (L)
    Odd,
    /// Left half, even parity (G): reversed complement of L
    LeftEven,
    /// Right half (R): complement of L
    Right,
}

/// Reference pattern for `digit` in the given set
pub fn pattern_for(digit: u8, set: PatternSet) -> Option<BitPattern> {
    let odd = *ODD_PATTERNS.get(usize::from(digit))?;
    Some(match set {
        PatternSet::Odd => odd,
        PatternSet::LeftEven => odd.complement().reversed(),
        PatternSet::Right => odd.complement(),
    })
}

/// Pattern set used for a digit on `side` with the given parity
pub fn pattern_set(side: Side, is_odd: bool) -> PatternSet {
    match (side, is_odd) {
        (Side::Right, _) => PatternSet::Right,
        (Side::Left, true) => PatternSet::Odd,
        (Side::Left, false) => PatternSet::LeftEven,
    }
}

/// Bit pattern to digit lookup covering odd, even and reversed-even encodings
#[derive(Debug, Clone)]
pub struct DigitTable {
    entries: HashMap<BitPattern, Digit>,
}

impl DigitTable {
    /// Build from odd reference patterns; the index of each pattern is its digit.
    ///
    /// Fails when any of the `3 * odd.len()` variants collide.
    pub fn build(odd: &[BitPattern]) -> Result<Self, TableError> {
        let mut entries = HashMap::with_capacity(odd.len() * 3);
        for (value, &pattern) in odd.iter().enumerate() {
            let value = value as u8;
            let even = pattern.complement();
            entries.insert(
                pattern,
                Digit {
                    value,
                    is_odd: true,
                },
            );
            entries.insert(
                even,
                Digit {
                    value,
                    is_odd: false,
                },
            );
            entries.insert(
                even.reversed(),
                Digit {
                    value,
                    is_odd: false,
                },
            );
        }

        let expected = odd.len() * 3;
        if entries.len() != expected {
            return Err(TableError::Ambiguous {
                entries: entries.len(),
                expected,
            });
        }
        Ok(Self { entries })
    }

    /// Look up a 7-module pattern
    pub fn lookup(&self, pattern: BitPattern) -> Option<Digit> {
        self.entries.get(&pattern).copied()
    }

    /// Number of distinct patterns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table holds no patterns
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all known patterns
    pub fn patterns(&self) -> impl Iterator<Item = BitPattern> + '_ {
        self.entries.keys().copied()
    }
}

static DIGIT_TABLE: OnceLock<DigitTable> = OnceLock::new();

/// Process-wide digit table, built on first use
pub fn digit_table() -> &'static DigitTable {
    DIGIT_TABLE.get_or_init(|| {
        DigitTable::build(&ODD_PATTERNS).expect("EAN-13 reference patterns are unambiguous")
    })
}

/// Parity flags of the six left-hand digits, first digit in the highest of 6 bits (1 = odd)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParityMask(u8);

impl ParityMask {
    const WIDTH: usize = 6;

    /// Pack six odd/even flags
    pub fn from_flags(flags: &[bool; 6]) -> Self {
        Self(flags.iter().fold(0u8, |acc, &odd| (acc << 1) | u8::from(odd)))
    }

    /// Parity of left digit `i` (0 = leftmost), true = odd
    pub fn is_odd(self, i: usize) -> bool {
        i < Self::WIDTH && (self.0 >> (Self::WIDTH - 1 - i)) & 1 == 1
    }

    /// Letter form, e.g. `OEOOEE`
    pub fn to_oe_string(self) -> String {
        (0..Self::WIDTH)
            .map(|i| if self.is_odd(i) { 'O' } else { 'E' })
            .collect()
    }
}

impl fmt::Display for ParityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..Self::WIDTH {
            f.write_str(if self.is_odd(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Left-hand parity pattern for each implicit first digit
pub const PARITY_PREFIX: [(ParityMask, u8); 10] = [
    (ParityMask(0b111111), 0), // OOOOOO
    (ParityMask(0b110100), 1), // OOEOEE
    (ParityMask(0b110010), 2), // OOEEOE
    (ParityMask(0b110001), 3), // OOEEEO
    (ParityMask(0b101100), 4), // OEOOEE
    (ParityMask(0b100110), 5), // OEEOOE
    (ParityMask(0b100011), 6), // OEEEOO
    (ParityMask(0b101010), 7), // OEOEOE
    (ParityMask(0b101001), 8), // OEOEEO
    (ParityMask(0b100101), 9), // OEEOEO
];

/// First digit for a parity mask
pub fn prefix_digit(mask: ParityMask) -> Option<u8> {
    PARITY_PREFIX
        .iter()
        .find(|(m, _)| *m == mask)
        .map(|&(_, digit)| digit)
}

/// Parity mask that encodes `first_digit`
pub fn parity_for(first_digit: u8) -> Option<ParityMask> {
    PARITY_PREFIX
        .iter()
        .find(|(_, d)| *d == first_digit)
        .map(|&(mask, _)| mask)
}
