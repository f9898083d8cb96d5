//! Pixel-level search for the start guard.
//!
//! Used when the block ratio profile shows no guard run, for example when
//! modules are so narrow that whole blocks look uniformly grey. The locator
//! looks for a light run followed by three narrow runs of similar width
//! (bar, space, bar) and reports the first bar pixel.

use crate::decoder::config::DecoderConfig;

use super::sections::{Section, sections};

/// Runs per window; runs 1..=3 are the guard bar, space and bar
const WINDOW: usize = 5;

/// Variance over mean of the three guard widths
pub fn bar_error(widths: &[usize; 3]) -> f64 {
    let mean = widths.iter().sum::<usize>() as f64 / widths.len() as f64;
    let variance: f64 = widths
        .iter()
        .map(|&w| (w as f64 - mean).powi(2))
        .sum();
    variance / mean
}

/// Finds a bar/space/bar preamble in binarized pixels
#[derive(Debug, Clone)]
pub struct PreambleLocator {
    min_width: usize,
    max_width: usize,
    max_error: f64,
}

impl Default for PreambleLocator {
    fn default() -> Self {
        Self::new(&DecoderConfig::default())
    }
}

impl PreambleLocator {
    /// Create a locator with width and consistency limits from `config`
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            min_width: config.preamble_min_width,
            max_width: config.preamble_max_width,
            max_error: config.preamble_max_error,
        }
    }

    /// First pixel of the first accepted preamble in `dark` (true = dark).
    ///
    /// The third guard run must be followed by at least one more pixel so
    /// that its width is known.
    pub fn locate(&self, dark: &[bool]) -> Option<usize> {
        let mut start = 0usize;
        let runs: Vec<(usize, Section)> = sections(dark)
            .map(|section| {
                let at = start;
                start += section.len;
                (at, section)
            })
            .collect();

        let found = runs
            .windows(WINDOW)
            .find(|window| self.accepts(window))
            .map(|window| window[1].0);
        if let Some(start) = found {
            tracing::trace!(start, "preamble accepted");
        }
        found
    }

    fn accepts(&self, window: &[(usize, Section)]) -> bool {
        if window[0].1.dark {
            return false;
        }
        let widths = [window[1].1.len, window[2].1.len, window[3].1.len];
        widths
            .iter()
            .all(|w| (self.min_width..=self.max_width).contains(w))
            && bar_error(&widths) < self.max_error
    }
}
