use crate::decoder::config::DecoderConfig;

/// A white block followed by a stretch of bar blocks
#[derive(Debug, Clone, PartialEq)]
pub struct GuardRun {
    /// Index of the white block that opens the run
    pub start: usize,
    /// Ratios of the bar blocks after `start`
    pub bar_ratios: Vec<f32>,
}

impl GuardRun {
    /// Number of bar blocks
    pub fn len(&self) -> usize {
        self.bar_ratios.len()
    }

    /// True if the run holds no bar blocks
    pub fn is_empty(&self) -> bool {
        self.bar_ratios.is_empty()
    }

    /// Blocks covered by the opening white block, the bars and the closing white block
    pub fn blocks(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len() + 2
    }
}

/// Classification of one ratio block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockClass {
    /// Almost entirely light
    White,
    /// Mixed light and dark, as inside a barcode
    Bar,
    /// Anything else; aborts a candidate run
    Other,
}

/// Finds the first white / 15-25 bars / white pattern in a ratio sequence.
///
/// The first qualifying run is returned even if a better one follows; there
/// is no backtracking.
#[derive(Debug, Clone)]
pub struct RunLocator {
    white_ratio: f32,
    bar_ratio_min: f32,
    bar_ratio_max: f32,
    min_run: usize,
    max_run: usize,
}

impl Default for RunLocator {
    fn default() -> Self {
        Self::new(&DecoderConfig::default())
    }
}

impl RunLocator {
    /// Create a locator with thresholds from `config`
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            white_ratio: config.white_ratio,
            bar_ratio_min: config.bar_ratio_min,
            bar_ratio_max: config.bar_ratio_max,
            min_run: config.min_run_blocks,
            max_run: config.max_run_blocks,
        }
    }

    /// Classify a block by its light ratio
    pub fn classify(&self, ratio: f32) -> BlockClass {
        if ratio >= self.white_ratio {
            BlockClass::White
        } else if ratio > self.bar_ratio_min && ratio < self.bar_ratio_max {
            BlockClass::Bar
        } else {
            BlockClass::Other
        }
    }

    /// Scan `ratios` and return the first run of acceptable length
    pub fn locate(&self, ratios: &[f32]) -> Option<GuardRun> {
        // None = seeking, Some(start) = accumulating bars after white block `start`
        let mut start: Option<usize> = None;
        let mut bars: Vec<f32> = Vec::with_capacity(self.max_run);

        for (i, &ratio) in ratios.iter().enumerate() {
            let class = self.classify(ratio);
            let Some(run_start) = start else {
                if class == BlockClass::White {
                    start = Some(i);
                    bars.clear();
                }
                continue;
            };

            match class {
                BlockClass::White if (self.min_run..=self.max_run).contains(&bars.len()) => {
                    tracing::trace!(start = run_start, len = bars.len(), "guard run accepted");
                    return Some(GuardRun {
                        start: run_start,
                        bar_ratios: bars,
                    });
                }
                BlockClass::White => {
                    if !bars.is_empty() {
                        tracing::trace!(
                            start = run_start,
                            len = bars.len(),
                            "bar run outside accepted length, restarting"
                        );
                    }
                    start = Some(i);
                    bars.clear();
                }
                BlockClass::Bar => bars.push(ratio),
                BlockClass::Other => {
                    start = None;
                    bars.clear();
                }
            }
        }

        None
    }
}
