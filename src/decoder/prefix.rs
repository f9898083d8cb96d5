use crate::models::Digit;

use super::tables::{ParityMask, prefix_digit};

/// Recover the implicit first digit from the parities of the six left digits.
///
/// This is a table lookup on the odd/even pattern, not an arithmetic
/// checksum. `Err` carries the mask when it names no first digit.
pub fn resolve_prefix(left: &[Digit; 6]) -> Result<u8, ParityMask> {
    let flags: [bool; 6] = std::array::from_fn(|i| left[i].is_odd);
    let mask = ParityMask::from_flags(&flags);
    prefix_digit(mask).ok_or(mask)
}
