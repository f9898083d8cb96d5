//! Integration tests for EAN-13 scanline decoding
//!
//! These tests drive the public API end to end: rendering symbols, writing
//! them through the `image` crate, and decoding them back. They protect
//! against regressions in run search, sectioning and module quantization.

use image::{GrayImage, RgbImage};
use rust_ean::synthetic::{SYMBOL_MODULES, render_gray_image};
use rust_ean::tools::{dataset_iter, dataset_root_from_env, load_rgb};
use rust_ean::{
    DecodeError, DecoderConfig, Detector, Ean13, ThresholdMode, detect, detect_from_grayscale,
};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const CODES: [&str; 5] = [
    "4006381333931",
    "5901234123457",
    "9780201379624",
    "0000000000000",
    "8711253001202",
];

static TEMP_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

fn temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX epoch")
        .as_nanos();
    let sequence = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!("rust_ean_regression_{nanos}_{sequence}"));
    fs::create_dir_all(&path).expect("failed to create temp dir");
    path
}

fn code(s: &str) -> Ean13 {
    s.parse().expect("valid test code")
}

/// (module px, block px) pairs where every block the symbol covers mixes
/// bars and spaces at the default 40 blocks
const LAYOUTS: [(usize, usize); 3] = [(3, 14), (4, 19), (5, 22)];

/// Symbol starting on block 8 of a 40-block image
fn symbol(code: &Ean13, module: usize, block: usize, height: usize) -> (Vec<u8>, usize, usize) {
    let width = 40 * block;
    (render_gray_image(code, module, 8 * block, width, height), width, height)
}

fn to_rgb(gray: &[u8]) -> Vec<u8> {
    gray.iter().flat_map(|&v| [v, v, v]).collect()
}

#[test]
fn test_reference_codes_at_several_scales() {
    for s in CODES {
        for (module, block) in LAYOUTS {
            let (gray, width, height) = symbol(&code(s), module, block, 40);
            let result = detect_from_grayscale(&gray, width, height)
                .unwrap_or_else(|err| panic!("{s} at {module}px: {err}"));
            assert_eq!(result.code.to_string(), s, "module {module}px");
            assert_eq!(result.span.start, 8 * block);
            assert_eq!(result.span.len(), SYMBOL_MODULES * module);
            assert!((result.module_width - module as f64).abs() < 1e-9);
        }
    }
}

#[test]
fn test_png_round_trip() {
    let dir = temp_dir();
    let expected = code("5901234123457");
    let (gray, width, height) = symbol(&expected, 4, 19, 50);
    let path = dir.join("symbol.png");
    GrayImage::from_raw(width as u32, height as u32, gray)
        .expect("buffer matches dimensions")
        .save(&path)
        .expect("failed to write png");

    let (rgb, w, h) = load_rgb(&path).expect("failed to read png");
    assert_eq!((w, h), (width, height));
    let result = detect(&rgb, w, h).expect("decode after png round trip");
    assert_eq!(result.code, expected);
    assert_eq!(result.code.grouped(), "5-901234-123457");

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_dataset_directory_batch() {
    let dir = temp_dir();
    fs::create_dir_all(dir.join("more")).unwrap();
    for (i, s) in CODES.iter().enumerate() {
        let (gray, width, height) = symbol(&code(s), 3, 14, 30);
        let rgb = RgbImage::from_raw(width as u32, height as u32, to_rgb(&gray)).unwrap();
        let sub = if i % 2 == 0 { dir.clone() } else { dir.join("more") };
        rgb.save(sub.join(format!("{i:02}_{s}.png"))).unwrap();
    }

    let images: Vec<(Vec<u8>, usize, usize)> = dataset_iter(&dir, None)
        .map(|p| load_rgb(p).unwrap())
        .collect();
    assert_eq!(images.len(), CODES.len());

    let results = Detector::default().detect_batch(&images);
    let mut decoded: Vec<String> = results
        .into_iter()
        .map(|r| r.expect("every rendered symbol decodes").code.to_string())
        .collect();
    decoded.sort();
    let mut expected: Vec<String> = CODES.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(decoded, expected);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_uneven_contrast_and_noise() {
    for (module, block) in LAYOUTS {
        let expected = code("5901234123457");
        let (gray, width, height) = symbol(&expected, module, block, 16);
        // grey bars on an off-white background with a little pixel noise
        let noisy: Vec<u8> = gray
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let noise = ((i * 7919) % 21) as i32 - 10;
                let base = if v == 0 { 50 } else { 210 };
                (base + noise).clamp(0, 255) as u8
            })
            .collect();
        let result = detect_from_grayscale(&noisy, width, height).unwrap();
        assert_eq!(result.code, expected);
    }
}

#[test]
fn test_moving_average_threshold_under_gradient_lighting() {
    let config = DecoderConfig::default().with_threshold(ThresholdMode::MovingAverage);
    let detector = Detector::new(config);
    for s in CODES {
        for (module, block) in LAYOUTS {
            let (gray, width, height) = symbol(&code(s), module, block, 12);
            // light falls off towards the left edge; bars reflect 30% of it
            let lit: Vec<u8> = gray
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let bg = 40 + 215 * (i % width) / width;
                    (if v == 0 { bg * 3 / 10 } else { bg }) as u8
                })
                .collect();
            assert!(Detector::default().detect_gray(&lit, width, height).is_err());
            let result = detector
                .detect_gray(&lit, width, height)
                .unwrap_or_else(|err| panic!("{s} at {module}px: {err}"));
            assert_eq!(result.code.to_string(), s);
        }
    }
}

#[test]
fn test_preamble_fallback_for_fine_modules() {
    let expected = code("4006381333931");
    let gray = render_gray_image(&expected, 1, 48, 191, 10);
    let detector = Detector::new(DecoderConfig::default().with_preamble_fallback(true));
    let result = detector.detect_gray(&gray, 191, 10).unwrap();
    assert_eq!(result.code, expected);
    assert_eq!(result.span, 48..143);
}

#[test]
fn test_failures_are_reported_not_guessed() {
    let detector = Detector::default();

    let blank = vec![255u8; 600 * 20];
    let err = detector.detect_gray(&blank, 600, 20).unwrap_err();
    assert!(matches!(err, DecodeError::NoGuardRun { blocks: 40 }));

    // 1px modules leave blocks too coarse to look like bars
    let gray = render_gray_image(&code("4006381333931"), 1, 48, 191, 10);
    let err = detector.detect_gray(&gray, 191, 10).unwrap_err();
    assert_eq!(err.kind(), "no-guard-run");

    assert!(matches!(
        detector.detect_gray(&[], 0, 0),
        Err(DecodeError::EmptyImage { .. })
    ));
}

#[test]
fn test_check_digit_verification_is_opt_in() {
    let bad = code("4006381333932");
    let (gray, width, height) = symbol(&bad, 3, 14, 20);

    let lenient = Detector::default().detect_gray(&gray, width, height).unwrap();
    assert_eq!(lenient.code, bad);
    assert!(!lenient.code.has_valid_check_digit());

    let strict = Detector::new(DecoderConfig::default().with_check_digit(true));
    assert_eq!(
        strict.detect_gray(&gray, width, height),
        Err(DecodeError::ChecksumMismatch {
            expected: 1,
            found: 2
        })
    );
}

#[test]
fn test_repeated_detection_is_identical() {
    let (gray, width, height) = symbol(&code("9780201379624"), 4, 19, 24);
    let detector = Detector::default();
    let first = detector.detect_gray(&gray, width, height);
    for _ in 0..3 {
        assert_eq!(detector.detect_gray(&gray, width, height), first);
    }
}

#[test]
fn test_dataset_images_do_not_panic() {
    let root = dataset_root_from_env();
    if !root.exists() {
        eprintln!("Skipping test: {} not found", root.display());
        return;
    }
    let detector = Detector::from_env();
    for path in dataset_iter(&root, Some(20)) {
        let Ok((rgb, width, height)) = load_rgb(&path) else {
            continue;
        };
        match detector.detect(&rgb, width, height) {
            Ok(result) => println!("{}: {}", path.display(), result.code.grouped()),
            Err(err) => println!("{}: err {}", path.display(), err),
        }
    }
}
