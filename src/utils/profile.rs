//! Scanline extraction from a grayscale image.
//!
//! A band of rows around the middle of the image is averaged column by
//! column into one intensity line, binarized with Otsu's method or a
//! moving-average cutoff, and split into ratio blocks.

use std::ops::Range;

use crate::decoder::config::{DecoderConfig, ThresholdMode};
use crate::error::DecodeError;
use crate::models::Scanline;

use super::binarization::Cutoff;

/// Builds a [`Scanline`] from the middle band of a grayscale image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileBuilder {
    blocks: usize,
    band_rows: usize,
    threshold: ThresholdMode,
    smoothing_window: usize,
    smoothing_factor: f64,
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self::new(&DecoderConfig::default())
    }
}

impl ProfileBuilder {
    /// Create a builder using the block count and band height from `config`
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            blocks: config.blocks.max(1),
            band_rows: config.band_rows.max(1),
            threshold: config.threshold,
            smoothing_window: config.smoothing_window.max(1),
            smoothing_factor: config.smoothing_factor,
        }
    }

    /// Rows averaged for an image of `height` rows, centred on `height / 2`
    pub fn band(&self, height: usize) -> Range<usize> {
        let start = (height / 2).saturating_sub(self.band_rows / 2);
        let end = (start + self.band_rows).min(height);
        start..end
    }

    /// Column-wise mean of the band rows
    pub fn intensity_line(
        &self,
        gray: &[u8],
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>, DecodeError> {
        if width == 0 || height == 0 || gray.len() < width * height {
            return Err(DecodeError::EmptyImage { width, height });
        }

        let band = self.band(height);
        let rows = band.len() as u32;
        let mut sums = vec![0u32; width];
        for row in gray[band.start * width..band.end * width].chunks_exact(width) {
            for (sum, &v) in sums.iter_mut().zip(row) {
                *sum += u32::from(v);
            }
        }

        Ok(sums.into_iter().map(|s| (s / rows) as u8).collect())
    }

    /// Binarization mode in use
    pub fn threshold(&self) -> ThresholdMode {
        self.threshold
    }

    /// Dark/light cutoff for an intensity line
    pub fn cutoff(&self, line: &[u8]) -> Cutoff {
        match self.threshold {
            ThresholdMode::Otsu => Cutoff::otsu(line),
            ThresholdMode::MovingAverage => {
                Cutoff::moving_average(line, self.smoothing_window, self.smoothing_factor)
            }
        }
    }

    /// Average the middle band, binarize it and compute block ratios
    pub fn build(&self, gray: &[u8], width: usize, height: usize) -> Result<Scanline, DecodeError> {
        let line = self.intensity_line(gray, width, height)?;
        let dark = self.cutoff(&line).binarize(&line);
        tracing::trace!(width, height, mode = %self.threshold, "scanline profile built");
        Ok(Scanline::from_dark(dark, self.blocks))
    }
}
