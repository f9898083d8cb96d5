/// Calculate Otsu's optimal threshold over a set of intensities.
///
/// Pixels strictly below the returned value belong to the dark class.
/// Uniform input has no separating threshold and yields 128.
pub fn otsu_threshold(gray: &[u8]) -> u8 {
    // Build histogram
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[usize::from(pixel)] += 1;
    }

    let total_pixels = gray.len() as f64;
    let total_sum: u64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as u64 * c)
        .sum();

    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;
    let mut class1_pixels = 0u64;
    let mut class1_sum = 0u64;

    // class1 holds intensities below `threshold`
    for threshold in 1..=255usize {
        class1_pixels += histogram[threshold - 1];
        class1_sum += (threshold as u64 - 1) * histogram[threshold - 1];
        let class2_pixels = gray.len() as u64 - class1_pixels;
        if class1_pixels == 0 || class2_pixels == 0 {
            continue;
        }

        let class1_mean = class1_sum as f64 / class1_pixels as f64;
        let class2_mean = (total_sum - class1_sum) as f64 / class2_pixels as f64;

        let weight1 = class1_pixels as f64 / total_pixels;
        let weight2 = class2_pixels as f64 / total_pixels;

        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}

/// Simple global threshold binarization, true = dark
pub fn threshold_binarize(gray: &[u8], threshold: u8) -> Vec<bool> {
    gray.iter().map(|&v| v < threshold).collect()
}

/// Binarize with Otsu's threshold computed from the same intensities
pub fn otsu_binarize(gray: &[u8]) -> Vec<bool> {
    threshold_binarize(gray, otsu_threshold(gray))
}

/// Trailing moving average over `window` pixels.
///
/// Pixels before the first full window take the mean of the first window.
/// The window is clamped to the line length. Means are truncated.
pub fn moving_average(line: &[u8], window: usize) -> Vec<u8> {
    if line.is_empty() {
        return Vec::new();
    }
    let window = window.clamp(1, line.len());
    let mut sum: u64 = line[..window].iter().map(|&v| u64::from(v)).sum();
    let mut out = vec![(sum / window as u64) as u8; window];
    out.reserve(line.len() - window);
    for (i, &v) in line.iter().enumerate().skip(window) {
        sum += u64::from(v);
        sum -= u64::from(line[i - window]);
        out.push((sum / window as u64) as u8);
    }
    out
}

/// Dark/light decision for the pixels of one intensity line
#[derive(Debug, Clone, PartialEq)]
pub enum Cutoff {
    /// One threshold for the whole line; values below it are dark
    Global(u8),
    /// One bound per pixel; values at or below it are dark
    Local(Vec<f64>),
}

impl Cutoff {
    /// Otsu threshold of `line`
    pub fn otsu(line: &[u8]) -> Self {
        Self::Global(otsu_threshold(line))
    }

    /// Moving average of `line` scaled by `factor`
    pub fn moving_average(line: &[u8], window: usize, factor: f64) -> Self {
        Self::Local(
            moving_average(line, window)
                .into_iter()
                .map(|mean| f64::from(mean) * factor)
                .collect(),
        )
    }

    /// Whether `value` at column `x` is dark. Columns without a bound are light.
    pub fn is_dark(&self, x: usize, value: u8) -> bool {
        match self {
            Self::Global(threshold) => value < *threshold,
            Self::Local(bounds) => bounds.get(x).is_some_and(|&b| f64::from(value) <= b),
        }
    }

    /// Binarize a whole line, true = dark
    pub fn binarize(&self, line: &[u8]) -> Vec<bool> {
        line.iter()
            .enumerate()
            .map(|(x, &v)| self.is_dark(x, v))
            .collect()
    }
}
