//! EAN-13 decoding modules
//!
//! This module turns located guard runs into digits:
//! - Module width estimation and quantization
//! - Digit pattern tables and lookup
//! - Implicit first-digit recovery from left-hand parity
//! - Check digit arithmetic

/// EAN-13 check digit computation
pub mod checksum;
pub mod config;
/// Digit lookup from quantized run widths
pub mod digit;
/// Main decoder that orchestrates the scanline pipeline
pub mod ean_decoder;
pub mod modules;
/// First-digit resolution from the parity prefix
pub mod prefix;
/// Reference bit patterns, digit table and parity prefixes
pub mod tables;
