use std::fmt;
use std::str::FromStr;

use crate::error::ParseThresholdModeError;
use crate::models::DEFAULT_BLOCKS;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

fn parse_env_threshold(name: &str, default: ThresholdMode) -> ThresholdMode {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// How the averaged intensity line is split into dark and light pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThresholdMode {
    /// One Otsu threshold for the whole line
    #[default]
    Otsu,
    /// A pixel is light when brighter than a scaled trailing moving average
    MovingAverage,
}

impl FromStr for ThresholdMode {
    type Err = ParseThresholdModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "otsu" => Ok(Self::Otsu),
            "moving-average" | "moving_average" | "smooth" => Ok(Self::MovingAverage),
            other => Err(ParseThresholdModeError(other.to_string())),
        }
    }
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Otsu => "otsu",
            Self::MovingAverage => "moving-average",
        })
    }
}

/// Tunables for profile building, run search and decoding
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    /// Number of ratio blocks the scanline is split into
    pub blocks: usize,
    /// A block at or above this light ratio counts as white
    pub white_ratio: f32,
    /// Bar blocks have a light ratio strictly above this
    pub bar_ratio_min: f32,
    /// Bar blocks have a light ratio strictly below this
    pub bar_ratio_max: f32,
    /// Shortest accepted run of bar blocks
    pub min_run_blocks: usize,
    /// Longest accepted run of bar blocks
    pub max_run_blocks: usize,
    /// Image rows averaged around the middle row to form the scanline
    pub band_rows: usize,
    /// Binarization of the averaged line
    pub threshold: ThresholdMode,
    /// Pixels in the moving-average window
    pub smoothing_window: usize,
    /// Light pixels are brighter than this fraction of the moving average
    pub smoothing_factor: f64,
    /// Search the pixels for a bar/space preamble when no guard run is found
    pub preamble_fallback: bool,
    /// Narrowest preamble bar or space, in pixels
    pub preamble_min_width: usize,
    /// Widest preamble bar or space, in pixels
    pub preamble_max_width: usize,
    /// Preamble widths must have variance / mean below this
    pub preamble_max_error: f64,
    /// Reject codes whose last digit fails the EAN-13 check
    pub verify_check_digit: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            blocks: DEFAULT_BLOCKS,
            white_ratio: 0.99,
            bar_ratio_min: 0.2,
            bar_ratio_max: 0.95,
            min_run_blocks: 15,
            max_run_blocks: 25,
            band_rows: 4,
            threshold: ThresholdMode::Otsu,
            smoothing_window: 100,
            smoothing_factor: 0.9,
            preamble_fallback: false,
            preamble_min_width: 1,
            preamble_max_width: 10,
            preamble_max_error: 2.0,
            verify_check_digit: false,
        }
    }
}

impl DecoderConfig {
    /// Defaults overridden by `EAN_BLOCKS`, `EAN_BAND_ROWS`, `EAN_THRESHOLD`
    /// (`otsu` / `moving-average`), `EAN_SMOOTHING_WINDOW`,
    /// `EAN_PREAMBLE_FALLBACK` (0/1) and `EAN_VERIFY_CHECK_DIGIT` (0/1).
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            blocks: parse_env_usize("EAN_BLOCKS", defaults.blocks).max(1),
            band_rows: parse_env_usize("EAN_BAND_ROWS", defaults.band_rows).max(1),
            threshold: parse_env_threshold("EAN_THRESHOLD", defaults.threshold),
            smoothing_window: parse_env_usize("EAN_SMOOTHING_WINDOW", defaults.smoothing_window)
                .max(1),
            preamble_fallback: parse_env_bool_u8(
                "EAN_PREAMBLE_FALLBACK",
                defaults.preamble_fallback,
            ),
            verify_check_digit: parse_env_bool_u8(
                "EAN_VERIFY_CHECK_DIGIT",
                defaults.verify_check_digit,
            ),
            ..defaults
        }
    }

    /// Enable or disable check digit verification
    pub fn with_check_digit(mut self, verify: bool) -> Self {
        self.verify_check_digit = verify;
        self
    }

    /// Use a different block count
    pub fn with_blocks(mut self, blocks: usize) -> Self {
        self.blocks = blocks.max(1);
        self
    }

    /// Use a different binarization mode
    pub fn with_threshold(mut self, threshold: ThresholdMode) -> Self {
        self.threshold = threshold;
        self
    }

    /// Enable or disable the pixel preamble search
    pub fn with_preamble_fallback(mut self, enabled: bool) -> Self {
        self.preamble_fallback = enabled;
        self
    }
}
