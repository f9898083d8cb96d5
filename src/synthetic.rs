//! Synthetic EAN-13 symbols.
//!
//! Encodes a code into its 95-module bar pattern and renders it into pixel
//! rows, scanlines or grayscale images. Used by the test suite, the benches
//! and `eantool render`.

use crate::decoder::tables::{
    DIGIT_MODULES, ParityMask, PatternSet, parity_for, pattern_for, pattern_set,
};
use crate::models::{DEFAULT_BLOCKS, Ean13, Scanline, Side};

/// Modules in a full EAN-13 symbol: 3 + 6*7 + 5 + 6*7 + 3
pub const SYMBOL_MODULES: usize = 95;

const START_GUARD: [bool; 3] = [true, false, true];
const CENTER_GUARD: [bool; 5] = [false, true, false, true, false];
const END_GUARD: [bool; 3] = [true, false, true];

fn push_pattern(out: &mut Vec<bool>, digit: u8, set: PatternSet) {
    if let Some(pattern) = pattern_for(digit, set) {
        out.extend((0..DIGIT_MODULES).map(|i| pattern.module(i)));
    }
}

/// Module sequence of `code`, true = bar
pub fn encode_modules(code: &Ean13) -> Vec<bool> {
    // Ean13 digits are 0..=9
    let parity = parity_for(code.first_digit()).unwrap_or(ParityMask::from_flags(&[true; 6]));
    let mut out = Vec::with_capacity(SYMBOL_MODULES);

    out.extend(START_GUARD);
    for (i, &d) in code.left().iter().enumerate() {
        push_pattern(&mut out, d, pattern_set(Side::Left, parity.is_odd(i)));
    }
    out.extend(CENTER_GUARD);
    for &d in code.right() {
        push_pattern(&mut out, d, PatternSet::Right);
    }
    out.extend(END_GUARD);

    out
}

/// One pixel row of `width` pixels with the symbol drawn from `offset`,
/// each module `module_px` pixels wide. Anything past `width` is clipped.
pub fn render_row(code: &Ean13, module_px: usize, offset: usize, width: usize) -> Vec<bool> {
    let mut row = vec![false; width];
    for (m, dark) in encode_modules(code).into_iter().enumerate() {
        if !dark {
            continue;
        }
        let start = (offset + m * module_px).min(width);
        let end = (start + module_px).min(width);
        row[start..end].fill(true);
    }
    row
}

/// Rendered row wrapped as a scanline with the default block count
pub fn render_scanline(code: &Ean13, module_px: usize, offset: usize, width: usize) -> Scanline {
    Scanline::from_dark(render_row(code, module_px, offset, width), DEFAULT_BLOCKS)
}

/// Grayscale image (bars 0, background 255) with the symbol on every row
pub fn render_gray_image(
    code: &Ean13,
    module_px: usize,
    offset: usize,
    width: usize,
    height: usize,
) -> Vec<u8> {
    let row: Vec<u8> = render_row(code, module_px, offset, width)
        .into_iter()
        .map(|dark| if dark { 0 } else { 255 })
        .collect();
    row.repeat(height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> Ean13 {
        s.parse().unwrap()
    }

    fn bits(modules: &[bool]) -> String {
        modules.iter().map(|&d| if d { '1' } else { '0' }).collect()
    }

    #[test]
    fn test_module_layout() {
        let modules = encode_modules(&code("4006381333931"));
        assert_eq!(modules.len(), SYMBOL_MODULES);
        assert_eq!(bits(&modules[..3]), "101");
        assert_eq!(bits(&modules[45..50]), "01010");
        assert_eq!(bits(&modules[92..]), "101");
        // first left digit 0 with odd parity
        assert_eq!(bits(&modules[3..10]), "0001101");
        // second left digit 0 with even parity
        assert_eq!(bits(&modules[10..17]), "0100111");
        // first right digit 3
        assert_eq!(bits(&modules[50..57]), "1000010");
    }

    #[test]
    fn test_zero_prefix_is_all_odd() {
        let modules = encode_modules(&code("0000000000000"));
        for i in 0..6 {
            let start = 3 + i * 7;
            assert_eq!(bits(&modules[start..start + 7]), "0001101");
        }
    }

    #[test]
    fn test_left_parity_follows_first_digit() {
        use crate::decoder::tables::{BitPattern, digit_table};

        for first in 0..10u8 {
            let modules = encode_modules(&code(&format!("{first}123456789012")));
            let flags: [bool; 6] = std::array::from_fn(|i| {
                let start = 3 + i * 7;
                let pattern = BitPattern::parse(&bits(&modules[start..start + 7])).unwrap();
                digit_table().lookup(pattern).unwrap().is_odd
            });
            assert_eq!(Some(ParityMask::from_flags(&flags)), parity_for(first));
        }
    }

    #[test]
    fn test_render_row_scales_and_clips() {
        let row = render_row(&code("4006381333931"), 2, 4, 200);
        assert_eq!(row.len(), 200);
        assert!(!row[3]);
        assert!(row[4] && row[5]);
        assert!(!row[6] && !row[7]);
        assert!(row[4 + 94 * 2] && row[4 + 94 * 2 + 1]);
        assert!(!row[4 + 95 * 2]);

        let clipped = render_row(&code("4006381333931"), 3, 0, 50);
        assert_eq!(clipped.len(), 50);
    }

    #[test]
    fn test_gray_image_rows() {
        let img = render_gray_image(&code("4006381333931"), 1, 2, 100, 3);
        assert_eq!(img.len(), 300);
        assert_eq!(&img[..100], &img[200..]);
        assert_eq!(img[2], 0);
        assert_eq!(img[0], 255);
    }
}
