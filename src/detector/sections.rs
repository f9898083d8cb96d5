use std::ops::Range;

use crate::error::DecodeError;
use crate::models::Scanline;

use super::run_locator::GuardRun;

/// Sections per structural group: start guard, 6 left digits, center guard,
/// 6 right digits, end guard
pub const GROUP_SIZES: [usize; GROUP_COUNT] = [3, 4, 4, 4, 4, 4, 4, 5, 4, 4, 4, 4, 4, 4, 3];

/// Number of structural groups in an EAN-13 symbol
pub const GROUP_COUNT: usize = 15;

/// Total sections between the first and last guard bar
pub const SECTION_COUNT: usize = total_sections();

/// Indices of the guard groups
pub const GUARD_GROUPS: [usize; 3] = [0, 7, 14];

const GROUP_OFFSETS: [usize; GROUP_COUNT] = group_offsets();

const fn total_sections() -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < GROUP_COUNT {
        total += GROUP_SIZES[i];
        i += 1;
    }
    total
}

const fn group_offsets() -> [usize; GROUP_COUNT] {
    let mut offsets = [0; GROUP_COUNT];
    let mut i = 1;
    while i < GROUP_COUNT {
        offsets[i] = offsets[i - 1] + GROUP_SIZES[i - 1];
        i += 1;
    }
    offsets
}

/// A maximal run of same-valued pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// True for a bar, false for a space
    pub dark: bool,
    /// Width in pixels
    pub len: usize,
}

/// Iterator over the sections of a binarized pixel slice
pub struct Sections<'a> {
    pixels: &'a [bool],
    pos: usize,
}

impl Iterator for Sections<'_> {
    type Item = Section;

    fn next(&mut self) -> Option<Section> {
        let &dark = self.pixels.get(self.pos)?;
        let len = self.pixels[self.pos..]
            .iter()
            .take_while(|&&d| d == dark)
            .count();
        self.pos += len;
        Some(Section { dark, len })
    }
}

/// Run-length encode `pixels`
pub fn sections(pixels: &[bool]) -> Sections<'_> {
    Sections { pixels, pos: 0 }
}

/// Pixel window to decode for `run`: from the first to the last dark pixel
/// inside the run's blocks plus one trailing block.
pub fn decode_window(scanline: &Scanline, run: &GuardRun) -> Result<Range<usize>, DecodeError> {
    let search = scanline.block_span(run.start..run.start + run.len() + 1);
    let pixels = &scanline.dark()[search.clone()];

    let first = pixels.iter().position(|&d| d);
    let last = pixels.iter().rposition(|&d| d);
    match (first, last) {
        (Some(first), Some(last)) => Ok(search.start + first..search.start + last + 1),
        _ => Err(DecodeError::GuardAlignment {
            start: search.start,
            end: search.end,
        }),
    }
}

/// Pixel window of the first 59 sections starting at `start`.
///
/// Used after a pixel-level preamble match, where no trailing white block
/// bounds the symbol.
pub fn leading_window(dark: &[bool], start: usize) -> Result<Range<usize>, DecodeError> {
    let pixels = dark.get(start..).unwrap_or_default();
    let mut end = start;
    let mut found = 0usize;
    for section in sections(pixels).take(SECTION_COUNT) {
        end += section.len;
        found += 1;
    }
    if found < SECTION_COUNT {
        return Err(DecodeError::SectionCountMismatch {
            expected: SECTION_COUNT,
            found,
        });
    }
    Ok(start..end)
}

/// Section widths of one decode window, laid out flat and sliced per group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGroups {
    widths: [usize; SECTION_COUNT],
}

impl SectionGroups {
    /// Split a window that starts and ends on a bar into the 15 groups.
    ///
    /// The window must hold exactly 59 sections; anything else is rejected
    /// rather than truncated.
    pub fn from_window(pixels: &[bool]) -> Result<Self, DecodeError> {
        match (pixels.first(), pixels.last()) {
            (Some(true), Some(true)) => {}
            _ => {
                return Err(DecodeError::GuardAlignment {
                    start: 0,
                    end: pixels.len(),
                });
            }
        }

        let mut widths = [0usize; SECTION_COUNT];
        let mut found = 0usize;
        for section in sections(pixels) {
            if let Some(slot) = widths.get_mut(found) {
                *slot = section.len;
            }
            found += 1;
        }

        if found != SECTION_COUNT {
            return Err(DecodeError::SectionCountMismatch {
                expected: SECTION_COUNT,
                found,
            });
        }
        Ok(Self { widths })
    }

    /// Build directly from 59 section widths
    pub fn from_widths(widths: [usize; SECTION_COUNT]) -> Self {
        Self { widths }
    }

    /// Raw widths of group `index` (0..15)
    pub fn group(&self, index: usize) -> &[usize] {
        let start = GROUP_OFFSETS[index];
        &self.widths[start..start + GROUP_SIZES[index]]
    }

    /// Widths of the start, center and end guards, concatenated
    pub fn guard_widths(&self) -> impl Iterator<Item = usize> + '_ {
        GUARD_GROUPS
            .iter()
            .flat_map(move |&g| self.group(g).iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixels_from_widths(widths: &[usize]) -> Vec<bool> {
        let mut out = Vec::new();
        let mut dark = true;
        for &w in widths {
            out.extend(std::iter::repeat(dark).take(w));
            dark = !dark;
        }
        out
    }

    #[test]
    fn test_layout_constants() {
        assert_eq!(SECTION_COUNT, 59);
        assert_eq!(GROUP_OFFSETS[7], 27);
        assert_eq!(GROUP_OFFSETS[14], 56);
    }

    #[test]
    fn test_sections_alternate() {
        let secs: Vec<Section> = sections(&[true, true, false, true, true, true]).collect();
        assert_eq!(
            secs,
            vec![
                Section { dark: true, len: 2 },
                Section {
                    dark: false,
                    len: 1
                },
                Section { dark: true, len: 3 },
            ]
        );
        assert_eq!(sections(&[]).count(), 0);
    }

    #[test]
    fn test_groups_are_sliced_by_layout() {
        let widths: Vec<usize> = (1..=59).collect();
        let groups = SectionGroups::from_window(&pixels_from_widths(&widths)).unwrap();
        assert_eq!(groups.group(0), &[1, 2, 3]);
        assert_eq!(groups.group(1), &[4, 5, 6, 7]);
        assert_eq!(groups.group(7), &[28, 29, 30, 31, 32]);
        assert_eq!(groups.group(14), &[57, 58, 59]);
        assert_eq!(groups.guard_widths().count(), 11);
    }

    #[test]
    fn test_too_few_sections() {
        let pixels = pixels_from_widths(&[1; 57]);
        assert_eq!(
            SectionGroups::from_window(&pixels),
            Err(DecodeError::SectionCountMismatch {
                expected: 59,
                found: 57
            })
        );
    }

    #[test]
    fn test_too_many_sections_not_truncated() {
        let pixels = pixels_from_widths(&[1; 61]);
        assert_eq!(
            SectionGroups::from_window(&pixels),
            Err(DecodeError::SectionCountMismatch {
                expected: 59,
                found: 61
            })
        );
    }

    #[test]
    fn test_window_must_start_on_bar() {
        let mut pixels = pixels_from_widths(&[1; 59]);
        pixels.insert(0, false);
        assert!(matches!(
            SectionGroups::from_window(&pixels),
            Err(DecodeError::GuardAlignment { .. })
        ));
    }

    #[test]
    fn test_decode_window_trims_to_dark_pixels() {
        // 10 blocks of 4 pixels; bars in blocks 3..6
        let mut dark = vec![false; 40];
        for i in [13, 14, 17, 21, 22] {
            dark[i] = true;
        }
        let line = Scanline::from_dark(dark, 10);
        let run = GuardRun {
            start: 2,
            bar_ratios: vec![0.5; 3],
        };
        assert_eq!(decode_window(&line, &run), Ok(13..23));
    }

    #[test]
    fn test_decode_window_without_dark_pixels() {
        let line = Scanline::from_dark(vec![false; 40], 10);
        let run = GuardRun {
            start: 1,
            bar_ratios: vec![0.5; 2],
        };
        assert_eq!(
            decode_window(&line, &run),
            Err(DecodeError::GuardAlignment { start: 4, end: 16 })
        );
    }

    #[test]
    fn test_leading_window_takes_59_sections() {
        let mut pixels = vec![false; 4];
        pixels.extend(pixels_from_widths(&[2; 61]));
        assert_eq!(leading_window(&pixels, 4), Ok(4..122));
        assert_eq!(
            leading_window(&pixels, 100),
            Err(DecodeError::SectionCountMismatch {
                expected: 59,
                found: 13
            })
        );
        assert!(leading_window(&pixels, 500).is_err());
    }
}
