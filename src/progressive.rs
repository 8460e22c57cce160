
//! Progressive reconstruction: decode the same coefficients again and again
//! with a growing budget, yielding one frame after another.

use std::iter::FusedIterator;

use crate::compression::{Codec, EncodedImage, TransformKind};
use crate::config::CodecConfig;
use crate::error::Result;
use crate::image::{side_by_side, PixelGrid};


/// Which sequence of budgets to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schedule {

    /// One more zigzag coefficient per block in every step,
    /// from a single coefficient up to the complete blocks (64 steps for 8x8 blocks).
    Dct,

    /// Four times as many retained pixels in every step, from one pixel up to the whole plane,
    /// which adds one level of the pyramid per step (10 steps for a 512 plane).
    Dwt,

    /// Dct and wavelet side by side, paired by iteration index.
    /// The dct budget grows as in `Dct`, the wavelet budget is that budget divided by the block area.
    /// The pairing does not promise equal quality of both halves.
    Balanced,
}

/// The budgets decoded in one step of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {

    /// Starts at one.
    pub iteration: usize,

    /// The whole-image dct budget, if the dct is decoded in this step.
    pub dct_budget: Option<usize>,

    /// The wavelet budget, if the wavelet is decoded in this step.
    pub dwt_budget: Option<usize>,
}

impl Schedule {

    /// The number of frames this schedule produces.
    pub fn len(self, config: &CodecConfig) -> usize {
        match self {
            Schedule::Dct | Schedule::Balanced => config.block_area(),
            Schedule::Dwt => config.decomposition_levels() + 1,
        }
    }

    /// Human readable name, used in log messages.
    pub fn name(self) -> &'static str {
        match self {
            Schedule::Dct => "DCT",
            Schedule::Dwt => "DWT",
            Schedule::Balanced => "Balanced DCT and DWT",
        }
    }

    /// The budgets of the iteration with the specified index, starting at one.
    pub fn step(self, iteration: usize, config: &CodecConfig) -> Step {
        debug_assert!(iteration >= 1 && iteration <= self.len(config), "iteration {} out of range", iteration);

        let dct_budget = iteration * config.block_count();

        match self {
            Schedule::Dct => Step { iteration, dct_budget: Some(dct_budget), dwt_budget: None },
            Schedule::Dwt => Step { iteration, dct_budget: None, dwt_budget: Some(1 << (2 * (iteration - 1))) },

            Schedule::Balanced => Step {
                iteration,
                dct_budget: Some(dct_budget),
                dwt_budget: Some(dct_budget / config.block_area()),
            },
        }
    }

    /// All steps in order, without decoding anything.
    pub fn steps(self, config: &CodecConfig) -> impl Iterator<Item = Step> + '_ {
        (1 ..= self.len(config)).map(move |iteration| self.step(iteration, config))
    }
}


/// A reconstructed image and the budgets it was decoded with.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {

    /// The budgets used for this frame.
    pub step: Step,

    /// Either a single reconstruction, or both reconstructions side by side.
    pub image: PixelGrid,
}

/// Lazily decodes one frame per call to `next`.
/// The stored coefficients are never modified, and dropping the iterator early
/// simply skips the remaining frames.
/// Each item is a `Result`, so that a decoding error ends the loop of the caller through `?`.
#[derive(Debug, Clone)]
pub struct Progression<'c> {
    codec: &'c Codec,
    encoded: &'c EncodedImage,
    schedule: Schedule,
    next_iteration: usize,
    len: usize,
}

impl<'c> Progression<'c> {

    /// Prepare the sequence. Nothing is decoded yet.
    /// Fails if the image was encoded by a codec with another configuration.
    pub fn new(codec: &'c Codec, encoded: &'c EncodedImage, schedule: Schedule) -> Result<Self> {
        codec.check_compatible(encoded)?;

        Ok(Self {
            codec, encoded, schedule,
            next_iteration: 1,
            len: schedule.len(codec.config()),
        })
    }

    fn decode_step(&self, step: Step) -> Result<PixelGrid> {
        let decoded = |kind, budget| self.codec.decode(self.encoded, kind, budget);

        Ok(match (step.dct_budget, step.dwt_budget) {
            (Some(dct), Some(dwt)) => side_by_side(
                &decoded(TransformKind::Dct, dct)?,
                &decoded(TransformKind::Dwt, dwt)?,
            ),

            (Some(dct), None) => decoded(TransformKind::Dct, dct)?,
            (None, Some(dwt)) => decoded(TransformKind::Dwt, dwt)?,
            (None, None) => unreachable!("every step decodes at least one transform"),
        })
    }
}

impl Iterator for Progression<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_iteration > self.len {
            return None;
        }

        let step = self.schedule.step(self.next_iteration, self.codec.config());
        self.next_iteration += 1;

        log::info!("{} decoding iteration {}", self.schedule.name(), step.iteration);
        Some(self.decode_step(step).map(|image| Frame { step, image }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.len + 1).saturating_sub(self.next_iteration);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Progression<'_> {}
impl FusedIterator for Progression<'_> {}
