use crate::decoder::config::DecoderConfig;
use crate::detector::run_locator::{BlockClass, RunLocator};
use crate::utils::grayscale::rgb_to_grayscale;
use crate::utils::profile::ProfileBuilder;
use image::GrayImage;
use std::env;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Marker stripe rows relative to the middle row, drawn above and below the scanline band
const MARKER_ROWS: [Range<isize>; 2] = [-8..-3, 3..8];

/// Load an image as RGB bytes along with its dimensions.
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, usize, usize), image::ImageError> {
    let rgb = image::open(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok((rgb.into_raw(), width as usize, height as usize))
}

/// Load an image and convert it to grayscale.
pub fn load_gray<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, usize, usize), image::ImageError> {
    let (rgb, width, height) = load_rgb(path)?;
    Ok((rgb_to_grayscale(&rgb, width, height), width, height))
}

/// Default dataset root from environment variables.
pub fn dataset_root_from_env() -> PathBuf {
    env::var("EAN_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("test-images/flat"))
}

/// Default bench limit from environment variables.
///
/// Returns `None` (full dataset) when `EAN_BENCH_LIMIT` is unset or set to `0`.
pub fn bench_limit_from_env() -> Option<usize> {
    env::var("EAN_BENCH_LIMIT")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&v| v != 0)
}

/// Iterate dataset image paths in sorted order, optionally truncated.
pub fn dataset_iter<P: AsRef<Path>>(root: P, limit: Option<usize>) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

/// Recursively collect image files (png, jpg, jpeg, gif, bmp) under `root`.
pub fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "bmp") {
                    images.push(path);
                }
            }
        }
    }

    images
}

/// One character per ratio block: `W` white, `#` bar, `.` neither.
pub fn ratio_strip(ratios: &[f32], config: &DecoderConfig) -> String {
    let locator = RunLocator::new(config);
    ratios
        .iter()
        .map(|&r| match locator.classify(r) {
            BlockClass::White => 'W',
            BlockClass::Bar => '#',
            BlockClass::Other => '.',
        })
        .collect()
}

/// Thresholded view of the image cropped to `span`, with marker stripes
/// around the scanned band. Falls back to the full width when `span` is
/// `None` or out of range.
/// Every row is split with the cutoff computed from the scanned band.
pub fn highlight(
    gray: &[u8],
    width: usize,
    height: usize,
    span: Option<Range<usize>>,
    config: &DecoderConfig,
) -> Option<GrayImage> {
    let profile = ProfileBuilder::new(config);
    let line = profile.intensity_line(gray, width, height).ok()?;
    let cutoff = profile.cutoff(&line);

    let cols = span
        .filter(|s| s.start < s.end && s.end <= width)
        .unwrap_or(0..width);
    let mid = (height / 2) as isize;
    let is_marker = |y: usize| {
        MARKER_ROWS
            .iter()
            .any(|rows| rows.contains(&(y as isize - mid)))
    };

    let mut out = GrayImage::new(cols.len() as u32, height as u32);
    for (y, row) in gray.chunks_exact(width).take(height).enumerate() {
        let marker = is_marker(y);
        for (x, &v) in row[cols.clone()].iter().enumerate() {
            let light = !marker && !cutoff.is_dark(cols.start + x, v);
            out.put_pixel(x as u32, y as u32, image::Luma([if light { 255 } else { 0 }]));
        }
    }
    Some(out)
}
