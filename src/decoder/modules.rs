//! Module width estimation and run quantization.
//!
//! All rounding goes through [`round_modules`], which rounds half away from
//! zero (`f64::round`). Decoding near the 0.5 boundary depends on this rule,
//! so it is used for both the whole-group check and the per-run widths.

use crate::detector::sections::SectionGroups;
use crate::error::ModuleCheck;

use super::tables::{DIGIT_MODULES, DIGIT_RUNS};

/// Round a module count, half away from zero
pub fn round_modules(value: f64) -> i64 {
    value.round() as i64
}

/// Converts raw pixel widths into integer module counts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleNormalizer {
    module_width: f64,
}

impl ModuleNormalizer {
    /// Use a known module width in pixels
    pub fn new(module_width: f64) -> Self {
        Self { module_width }
    }

    /// Estimate the module width as the mean width of the 11 guard sections
    pub fn from_guards(groups: &SectionGroups) -> Self {
        let (sum, count) = groups
            .guard_widths()
            .fold((0usize, 0usize), |(s, n), w| (s + w, n + 1));
        Self::new(sum as f64 / count as f64)
    }

    /// Estimated module width in pixels
    pub fn module_width(&self) -> f64 {
        self.module_width
    }

    /// Quantize the 4 raw widths of a digit group into module counts summing to 7.
    ///
    /// The group as a whole must round to 7 modules against the guard
    /// estimate; each run is then rounded against the group's own module
    /// width (`sum / 7`), which absorbs slow drift in scale across the symbol.
    pub fn quantize(&self, widths: &[usize]) -> Result<[u8; DIGIT_RUNS], ModuleCheck> {
        let total: usize = widths.iter().sum();
        let modules = total as f64 / self.module_width;
        if widths.len() != DIGIT_RUNS || round_modules(modules) != DIGIT_MODULES as i64 {
            return Err(ModuleCheck::BarCount { modules });
        }

        let group_module = total as f64 / DIGIT_MODULES as f64;
        let mut logical = [0u8; DIGIT_RUNS];
        let mut sum = 0u32;
        for (slot, &w) in logical.iter_mut().zip(widths) {
            let m = round_modules(w as f64 / group_module).clamp(0, DIGIT_MODULES as i64);
            *slot = m as u8;
            sum += m as u32;
        }

        if sum != DIGIT_MODULES as u32 {
            return Err(ModuleCheck::LogicalSum { sum });
        }
        Ok(logical)
    }
}
