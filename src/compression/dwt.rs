
//! Multiresolution Haar wavelet transform of a whole plane.
//!
//! The forward transform produces the usual quadrant pyramid in place:
//! the coarsest approximation ends up in the top left corner,
//! and the detail quadrants of each level surround it,
//! with the finest details in the outermost quadrants.

use std::f64::consts::FRAC_1_SQRT_2;

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::image::ChannelPlane;
use crate::math::{clamp_to_byte, floor_log_2, floor_sqrt, Vec2};
use super::Transform;


/// The wavelet pyramid of one channel plane, as large as the plane itself.
/// The subbands are only implied by index ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct DwtCoefficients {
    plane: ChannelPlane<f64>,
}


/// One orthonormal Haar step on a whole line.
/// The sums of each sample pair go to the first half and their differences to the second half.
pub fn forward_1d(line: &mut [f64]) {
    forward_1d_with_scratch(line, &mut Vec::new())
}

/// Reverses `forward_1d`, interleaving the restored pairs again.
pub fn inverse_1d(line: &mut [f64]) {
    inverse_1d_with_scratch(line, &mut Vec::new())
}

fn forward_1d_with_scratch(line: &mut [f64], scratch: &mut Vec<f64>) {
    let half = line.len() / 2;
    scratch.clear();
    scratch.resize(line.len(), 0.0);

    for index in 0 .. half {
        let (a, b) = (line[2 * index], line[2 * index + 1]);
        scratch[index] = (a + b) * FRAC_1_SQRT_2;
        scratch[half + index] = (a - b) * FRAC_1_SQRT_2;
    }

    line.copy_from_slice(scratch);
}

fn inverse_1d_with_scratch(line: &mut [f64], scratch: &mut Vec<f64>) {
    let half = line.len() / 2;
    scratch.clear();
    scratch.resize(line.len(), 0.0);

    for index in 0 .. half {
        let low = line[index] * FRAC_1_SQRT_2;
        let high = line[half + index] * FRAC_1_SQRT_2;
        scratch[2 * index] = low + high;
        scratch[2 * index + 1] = low - high;
    }

    line.copy_from_slice(scratch);
}

/// Copy the top `height` samples of column `x` into a buffer,
/// transform it, and write it back.
fn transform_column(
    plane: &mut ChannelPlane<f64>, x: usize, height: usize,
    column: &mut Vec<f64>, transform: impl FnOnce(&mut [f64])
) {
    column.clear();
    column.extend((0 .. height).map(|y| plane.get(Vec2(x, y))));

    transform(column.as_mut_slice());

    for (y, &value) in column.iter().enumerate() {
        plane.set(Vec2(x, y), value);
    }
}

/// Decompose the plane in place: rows, then columns,
/// then repeat on the top left quarter until it is smaller than two samples.
pub fn forward_2d(plane: &mut ChannelPlane<f64>) {
    let mut extent = plane.size();
    let mut scratch = Vec::new();
    let mut column = Vec::new();

    while extent.width() >= 2 && extent.height() >= 2 {
        for y in 0 .. extent.height() {
            forward_1d_with_scratch(&mut plane.row_mut(y)[.. extent.width()], &mut scratch);
        }

        for x in 0 .. extent.width() {
            transform_column(plane, x, extent.height(), &mut column, |line| forward_1d_with_scratch(line, &mut scratch));
        }

        extent = extent.map(|side| side / 2);
    }
}

/// Reverses `forward_2d` in place: columns, then rows,
/// starting with the two by two corner and doubling until the whole plane is restored.
pub fn inverse_2d(plane: &mut ChannelPlane<f64>) {
    let size = plane.size();
    let mut extent = Vec2(2, 2);
    let mut scratch = Vec::new();
    let mut column = Vec::new();

    while extent.width() <= size.width() && extent.height() <= size.height() {
        for x in 0 .. extent.width() {
            transform_column(plane, x, extent.height(), &mut column, |line| inverse_1d_with_scratch(line, &mut scratch));
        }

        for y in 0 .. extent.height() {
            inverse_1d_with_scratch(&mut plane.row_mut(y)[.. extent.width()], &mut scratch);
        }

        extent = extent.map(|side| side * 2);
    }
}

/// Side of the top left corner that survives the budget,
/// or `None` if the budget retains the whole pyramid.
/// The budget is a number of retained pixels, so its square root
/// decides how many of the finest levels are discarded.
pub fn retained_side(plane_side: usize, budget: usize) -> Option<usize> {
    if budget >= plane_side * plane_side {
        return None;
    }

    let size = floor_sqrt(budget).max(1);
    let discarded_levels = floor_log_2(plane_side / size);
    Some(plane_side >> discarded_levels)
}

/// Zero the detail quadrants of the finest levels, as selected by the budget.
pub fn apply_budget(plane: &mut ChannelPlane<f64>, budget: usize) {
    let side = plane.size().width();
    debug_assert_eq!(side, plane.size().height(), "wavelet planes must be square");

    let retained = match retained_side(side, budget) {
        Some(retained) => retained,
        None => return,
    };

    let mut current = side;
    while current > retained {
        current /= 2;

        // top right quadrant
        for y in 0 .. current {
            plane.row_mut(y)[current .. 2 * current].fill(0.0);
        }

        // bottom left and bottom right quadrants
        for y in current .. 2 * current {
            plane.row_mut(y)[.. 2 * current].fill(0.0);
        }
    }

    // everything outside the surviving corner
    for y in 0 .. side {
        let row = plane.row_mut(y);
        if y >= current { row.fill(0.0); }
        else { row[current ..].fill(0.0); }
    }
}


/// Encodes planes into wavelet pyramids and decodes them with a budget.
#[derive(Debug, Clone)]
pub struct DwtEngine {
    config: CodecConfig,
}

impl DwtEngine {

    /// Prepare an engine for the plane size of the configuration.
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The geometry this engine was built for.
    pub fn config(&self) -> &CodecConfig { &self.config }

    /// Transform a whole plane.
    pub fn encode(&self, plane: &ChannelPlane<u8>) -> Result<DwtCoefficients> {
        if plane.size() != self.config.plane_size() {
            return Err(Error::invalid(format!(
                "plane of size {:?} does not match the configured size {:?}",
                plane.size(), self.config.plane_size()
            )));
        }

        let mut coefficients = plane.map(f64::from);
        forward_2d(&mut coefficients);
        Ok(DwtCoefficients { plane: coefficients })
    }

    /// Reconstruct a plane from a private copy of the stored pyramid,
    /// after zeroing the levels that the budget discards.
    /// Fails if the pyramid was produced for another plane size.
    pub fn decode(&self, coefficients: &DwtCoefficients, budget: usize) -> Result<ChannelPlane<u8>> {
        if coefficients.plane.size() != self.config.plane_size() {
            return Err(Error::invalid(format!(
                "pyramid of size {:?} does not match the configured size {:?}",
                coefficients.plane.size(), self.config.plane_size()
            )));
        }

        let mut plane = coefficients.plane.clone();
        apply_budget(&mut plane, budget);
        inverse_2d(&mut plane);
        Ok(plane.map(clamp_to_byte))
    }
}

impl Transform for DwtEngine {
    type Coefficients = DwtCoefficients;

    fn encode_plane(&self, plane: &ChannelPlane<u8>) -> Result<DwtCoefficients> {
        self.encode(plane)
    }

    fn decode_plane(&self, coefficients: &DwtCoefficients, budget: usize) -> Result<ChannelPlane<u8>> {
        self.decode(coefficients, budget)
    }
}
