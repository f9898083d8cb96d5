use std::ops::Range;

use crate::detector::preamble::PreambleLocator;
use crate::detector::run_locator::{GuardRun, RunLocator};
use crate::detector::sections::{SectionGroups, decode_window, leading_window};
use crate::error::{DecodeError, ModuleCheck};
use crate::models::{Digit, Ean13, ScanResult, Scanline, Side};

use super::checksum::check_digit;
use super::config::DecoderConfig;
use super::digit::DigitDecoder;
use super::modules::ModuleNormalizer;
use super::prefix::resolve_prefix;
use super::tables::ParityMask;

const LEFT_GROUPS: Range<usize> = 1..7;
const RIGHT_GROUPS: Range<usize> = 8..14;

/// How far a decode attempt got, for diagnostics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeTelemetry {
    /// Guard run found in the ratio profile
    pub run: Option<GuardRun>,
    /// First bar pixel found by the preamble search, when it was used
    pub preamble: Option<usize>,
    /// Pixel window between the outer guard bars
    pub window: Option<Range<usize>>,
    /// Module width estimated from the guards
    pub module_width: Option<f64>,
    /// Digit groups decoded before stopping
    pub digits_decoded: usize,
    /// Parity of the six left digits, once all were decoded
    pub parity: Option<ParityMask>,
}

/// Runs the full scanline pipeline: run search, sectioning, module
/// normalization, digit lookup and first-digit resolution.
///
/// With `preamble_fallback` set, a scanline without a guard run is searched
/// pixel by pixel for the start guard before giving up.
///
/// Holds no per-call state; one decoder can be shared across threads.
#[derive(Debug, Clone)]
pub struct EanDecoder {
    config: DecoderConfig,
    locator: RunLocator,
    preamble: Option<PreambleLocator>,
    digits: DigitDecoder,
}

impl Default for EanDecoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl EanDecoder {
    /// Create a decoder with the given configuration
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            locator: RunLocator::new(&config),
            preamble: config
                .preamble_fallback
                .then(|| PreambleLocator::new(&config)),
            digits: DigitDecoder::new(),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode one scanline
    pub fn decode(&self, scanline: &Scanline) -> Result<ScanResult, DecodeError> {
        self.decode_with_telemetry(scanline).0
    }

    /// Like [`decode`](Self::decode) but also reports how far each stage got
    pub fn decode_with_telemetry(
        &self,
        scanline: &Scanline,
    ) -> (Result<ScanResult, DecodeError>, DecodeTelemetry) {
        let mut tel = DecodeTelemetry::default();
        let result = self.run_stages(scanline, &mut tel);
        if let Err(err) = &result {
            tracing::debug!(kind = err.kind(), "scanline rejected: {err}");
        }
        (result, tel)
    }

    fn run_stages(
        &self,
        scanline: &Scanline,
        tel: &mut DecodeTelemetry,
    ) -> Result<ScanResult, DecodeError> {
        let window = match self.locator.locate(scanline.ratios()) {
            Some(run) => {
                tracing::debug!(start = run.start, len = run.len(), "guard run located");
                let window = decode_window(scanline, &run)?;
                tel.run = Some(run);
                window
            }
            None => self.preamble_window(scanline, tel)?,
        };
        tel.window = Some(window.clone());

        let groups = SectionGroups::from_window(&scanline.dark()[window.clone()]).map_err(
            |err| match err {
                DecodeError::GuardAlignment { .. } => DecodeError::GuardAlignment {
                    start: window.start,
                    end: window.end,
                },
                other => other,
            },
        )?;

        let normalizer = ModuleNormalizer::from_guards(&groups);
        let module_width = normalizer.module_width();
        tel.module_width = Some(module_width);
        tracing::debug!(
            window_start = window.start,
            window_end = window.end,
            module_width,
            "sections grouped"
        );

        let left = self.decode_half(&groups, &normalizer, LEFT_GROUPS, Side::Left, tel)?;
        let right = self.decode_half(&groups, &normalizer, RIGHT_GROUPS, Side::Right, tel)?;

        let first = resolve_prefix(&left).map_err(|parity| {
            tel.parity = Some(parity);
            DecodeError::UnknownParityPrefix { parity }
        })?;
        tel.parity = Some(ParityMask::from_flags(&std::array::from_fn(|i| {
            left[i].is_odd
        })));

        let code = assemble(first, &left, &right);
        if self.config.verify_check_digit && !code.has_valid_check_digit() {
            return Err(DecodeError::ChecksumMismatch {
                expected: check_digit(&code.digits()[..12]),
                found: code.check_digit(),
            });
        }

        tracing::debug!(code = %code, "scanline decoded");
        Ok(ScanResult {
            code,
            span: window,
            module_width,
        })
    }

    /// Window from the pixel preamble search, or `NoGuardRun` when it is
    /// disabled or finds nothing
    fn preamble_window(
        &self,
        scanline: &Scanline,
        tel: &mut DecodeTelemetry,
    ) -> Result<Range<usize>, DecodeError> {
        let no_run = DecodeError::NoGuardRun {
            blocks: scanline.blocks(),
        };
        let Some(preamble) = &self.preamble else {
            return Err(no_run);
        };
        let start = preamble.locate(scanline.dark()).ok_or(no_run)?;
        tracing::debug!(start, "no guard run, preamble located");
        tel.preamble = Some(start);
        leading_window(scanline.dark(), start)
    }

    fn decode_half(
        &self,
        groups: &SectionGroups,
        normalizer: &ModuleNormalizer,
        group_range: Range<usize>,
        side: Side,
        tel: &mut DecodeTelemetry,
    ) -> Result<[Digit; 6], DecodeError> {
        let mut out = [Digit {
            value: 0,
            is_odd: false,
        }; 6];

        for (slot, group) in out.iter_mut().zip(group_range) {
            let widths = normalizer
                .quantize(groups.group(group))
                .map_err(|check| DecodeError::ModuleCount { group, check })?;
            *slot = self.digits.decode(&widths, side).map_err(|pattern| match pattern {
                Some(pattern) => DecodeError::UnknownBitPattern { group, pattern },
                None => DecodeError::ModuleCount {
                    group,
                    check: ModuleCheck::LogicalSum {
                        sum: widths.iter().map(|&w| u32::from(w)).sum(),
                    },
                },
            })?;
            tel.digits_decoded += 1;
            tracing::trace!(group, ?widths, value = slot.value, is_odd = slot.is_odd, "digit");
        }

        Ok(out)
    }
}

fn assemble(first: u8, left: &[Digit; 6], right: &[Digit; 6]) -> Ean13 {
    let mut digits = [first; 13];
    for (slot, d) in digits[1..].iter_mut().zip(left.iter().chain(right)) {
        *slot = d.value;
    }
    Ean13::from_parts(digits)
}
