//! Utility functions for image processing
//!
//! This module provides the image-side helpers for scanline decoding:
//! - Grayscale conversion (RGB/RGBA to luminance)
//! - Binarization (Otsu's method and threshold-based)
//! - Scanline profile extraction from the middle of an image

pub mod binarization;
pub mod grayscale;
pub mod profile;
