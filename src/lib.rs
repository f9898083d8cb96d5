//! rust_ean - EAN-13 barcode decoding from a single image scanline
//!
//! The decoder reads one horizontal line through the middle of an image,
//! finds the white / bars / white stretch where the symbol sits, splits it
//! into the 59 bars and spaces of an EAN-13 symbol and maps them to digits.
//! The implicit first digit is recovered from the parity of the left half.
//!
//! ```
//! use rust_ean::{decode_scanline, synthetic};
//!
//! let code = "4006381333931".parse().unwrap();
//! let line = synthetic::render_scanline(&code, 3, 112, 560);
//! let result = decode_scanline(&line).unwrap();
//! assert_eq!(result.code.grouped(), "4-006381-333931");
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// EAN-13 decoding modules (module normalization, digit tables, parity prefix)
pub mod decoder;
/// Barcode location modules (guard run search, sectioning)
pub mod detector;
/// Error types for every pipeline stage
pub mod error;
/// Core data structures (Ean13, Digit, Scanline, ScanResult)
pub mod models;
/// Synthetic symbol rendering for tests, benches and demos
pub mod synthetic;
/// Dataset and image helpers for the CLI and benches
pub mod tools;
/// Utility functions (grayscale, binarization, scanline profile)
pub mod utils;

pub use decoder::config::{DecoderConfig, ThresholdMode};
pub use decoder::ean_decoder::{DecodeTelemetry, EanDecoder};
pub use error::{DecodeError, ModuleCheck, ParseThresholdModeError};
pub use models::{Digit, Ean13, ParseEan13Error, ScanResult, Scanline, Side};

use rayon::prelude::*;
use utils::grayscale::rgb_to_grayscale;
use utils::profile::ProfileBuilder;

/// Decode an already binarized scanline with the default configuration
pub fn decode_scanline(scanline: &Scanline) -> Result<ScanResult, DecodeError> {
    EanDecoder::default().decode(scanline)
}

/// Detect an EAN-13 code along the middle row of an RGB image
///
/// # Arguments
/// * `image` - Raw RGB bytes (3 bytes per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn detect(image: &[u8], width: usize, height: usize) -> Result<ScanResult, DecodeError> {
    Detector::default().detect(image, width, height)
}

/// Detect an EAN-13 code from a pre-computed grayscale image
///
/// # Arguments
/// * `image` - Grayscale bytes (1 byte per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn detect_from_grayscale(
    image: &[u8],
    width: usize,
    height: usize,
) -> Result<ScanResult, DecodeError> {
    Detector::default().detect_gray(image, width, height)
}

/// Detector with configuration options
///
/// Stateless between calls, so a single detector can serve a rayon batch.
#[derive(Debug, Clone, Default)]
pub struct Detector {
    profile: ProfileBuilder,
    decoder: EanDecoder,
}

impl Detector {
    /// Create a detector with the given configuration
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            profile: ProfileBuilder::new(&config),
            decoder: EanDecoder::new(config),
        }
    }

    /// Create a detector configured from `EAN_*` environment variables
    pub fn from_env() -> Self {
        Self::new(DecoderConfig::from_env())
    }

    /// Active configuration
    pub fn config(&self) -> &DecoderConfig {
        self.decoder.config()
    }

    /// Build the scanline the detector would decode for a grayscale image
    pub fn scanline(&self, gray: &[u8], width: usize, height: usize) -> Result<Scanline, DecodeError> {
        self.profile.build(gray, width, height)
    }

    /// Detect a code in an RGB image
    pub fn detect(&self, image: &[u8], width: usize, height: usize) -> Result<ScanResult, DecodeError> {
        if image.len() < width * height * 3 {
            return Err(DecodeError::EmptyImage { width, height });
        }
        let gray = rgb_to_grayscale(image, width, height);
        self.detect_gray(&gray, width, height)
    }

    /// Detect a code in a grayscale image
    pub fn detect_gray(
        &self,
        gray: &[u8],
        width: usize,
        height: usize,
    ) -> Result<ScanResult, DecodeError> {
        let scanline = self.scanline(gray, width, height)?;
        self.decoder.decode(&scanline)
    }

    /// Detect a code and report per-stage diagnostics for a grayscale image
    pub fn detect_gray_with_telemetry(
        &self,
        gray: &[u8],
        width: usize,
        height: usize,
    ) -> (Result<ScanResult, DecodeError>, DecodeTelemetry) {
        match self.scanline(gray, width, height) {
            Ok(scanline) => self.decoder.decode_with_telemetry(&scanline),
            Err(err) => (Err(err), DecodeTelemetry::default()),
        }
    }

    /// Detect codes in many RGB images in parallel.
    ///
    /// Each entry is `(pixels, width, height)`. Results are in input order.
    pub fn detect_batch<T>(&self, images: &[(T, usize, usize)]) -> Vec<Result<ScanResult, DecodeError>>
    where
        T: AsRef<[u8]> + Sync,
    {
        images
            .par_iter()
            .map(|(pixels, width, height)| self.detect(pixels.as_ref(), *width, *height))
            .collect()
    }

    /// Decode many scanlines in parallel, preserving input order
    pub fn decode_batch(&self, scanlines: &[Scanline]) -> Vec<Result<ScanResult, DecodeError>> {
        scanlines
            .par_iter()
            .map(|scanline| self.decoder.decode(scanline))
            .collect()
    }
}
