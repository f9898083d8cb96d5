//! Barcode location modules
//!
//! This module finds the symbol on a scanline:
//! - Guard run search over the block ratio profile
//! - Pixel-level preamble search when the ratio profile shows no run
//! - Decode window trimming and run-length sectioning into digit groups

/// Bar/space/bar preamble search over binarized pixels
pub mod preamble;
/// White / bars / white run search over block ratios
pub mod run_locator;
/// Decode window and section grouping
pub mod sections;
