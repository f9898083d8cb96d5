/// EAN-13 check digit for the digits preceding it.
///
/// Weights alternate 1, 3 starting from the first digit.
pub fn check_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(check_digit(&[4, 0, 0, 6, 3, 8, 1, 3, 3, 3, 9, 3]), 1);
        assert_eq!(check_digit(&[5, 9, 0, 1, 2, 3, 4, 1, 2, 3, 4, 5]), 7);
        assert_eq!(check_digit(&[9, 7, 8, 0, 2, 0, 1, 3, 7, 9, 6, 2]), 4);
    }

    #[test]
    fn test_all_zero() {
        assert_eq!(check_digit(&[0; 12]), 0);
    }
}
