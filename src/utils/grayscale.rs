//! RGB/RGBA to luminance conversion.
//!
//! Y = 0.299*R + 0.587*G + 0.114*B, computed in fixed point as
//! (76*R + 150*G + 29*B) >> 8.

use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline]
fn luma(px: &[u8]) -> u8 {
    let lum = (COEF_R * u32::from(px[0]) + COEF_G * u32::from(px[1]) + COEF_B * u32::from(px[2])) >> 8;
    lum.min(255) as u8
}

fn convert(data: &[u8], channels: usize, width: usize, height: usize) -> Vec<u8> {
    data.chunks_exact(channels)
        .take(width * height)
        .map(luma)
        .collect()
}

fn convert_parallel(data: &[u8], channels: usize, width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }

    // Process rows in parallel
    gray.par_chunks_mut(width)
        .zip(data.par_chunks(width * channels))
        .for_each(|(row, src)| {
            for (out, px) in row.iter_mut().zip(src.chunks_exact(channels)) {
                *out = luma(px);
            }
        });

    gray
}

/// Convert an RGB image (3 bytes per pixel) to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert(rgb, 3, width, height)
}

/// Convert RGBA image to grayscale (ignores alpha channel)
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert(rgba, 4, width, height)
}

/// Convert RGB to grayscale using parallel processing
/// Processes rows in parallel for multi-core speedup
pub fn rgb_to_grayscale_parallel(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert_parallel(rgb, 3, width, height)
}

/// Convert RGBA to grayscale using parallel processing
pub fn rgba_to_grayscale_parallel(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert_parallel(rgba, 4, width, height)
}
