use std::ops::Range;

/// Default number of ratio blocks a scanline is split into
pub const DEFAULT_BLOCKS: usize = 40;

/// One binarized image row plus its coarse light-ratio profile
///
/// `dark[i]` is true for pixels below the threshold. The ratio of block `b`
/// is the fraction of light pixels in `dark[b * block_size..(b + 1) * block_size]`.
/// Pixels past `blocks * block_size` belong to no block.
#[derive(Debug, Clone, PartialEq)]
pub struct Scanline {
    dark: Vec<bool>,
    ratios: Vec<f32>,
    block_size: usize,
}

impl Scanline {
    /// Build from already binarized pixels (true = dark)
    pub fn from_dark(dark: Vec<bool>, blocks: usize) -> Self {
        let block_size = if blocks == 0 { 0 } else { dark.len() / blocks };
        let ratios = if block_size == 0 {
            Vec::new()
        } else {
            dark.chunks_exact(block_size)
                .take(blocks)
                .map(|block| {
                    let light = block.iter().filter(|&&d| !d).count();
                    light as f32 / block_size as f32
                })
                .collect()
        };
        Self {
            dark,
            ratios,
            block_size,
        }
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.dark.len()
    }

    /// True if the scanline has no pixels
    pub fn is_empty(&self) -> bool {
        self.dark.is_empty()
    }

    /// Binarized pixels, true = dark
    pub fn dark(&self) -> &[bool] {
        &self.dark
    }

    /// Light-pixel ratio per block
    pub fn ratios(&self) -> &[f32] {
        &self.ratios
    }

    /// Pixels per block (0 when the line is shorter than the block count)
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of ratio blocks
    pub fn blocks(&self) -> usize {
        self.ratios.len()
    }

    /// Pixel range covered by `blocks`, clamped to the line
    pub fn block_span(&self, blocks: Range<usize>) -> Range<usize> {
        let start = (blocks.start * self.block_size).min(self.dark.len());
        let end = (blocks.end * self.block_size).min(self.dark.len());
        start..end.max(start)
    }
}
