
//! The fixed geometry that every transform call works with.

use crate::error::{Error, Result, UnitResult};
use crate::math::{floor_log_2, Vec2};


/// Plane and block dimensions shared by the encoder, the decoder and the progressive driver.
/// Planes are always square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecConfig {

    /// Width and height of every channel plane, in pixels.
    /// Must be a power of two and a multiple of `block_side`.
    pub plane_side: usize,

    /// Width and height of a dct block. Usually eight.
    pub block_side: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { plane_side: 512, block_side: 8 }
    }
}

impl CodecConfig {

    /// Create a validated configuration.
    pub fn new(plane_side: usize, block_side: usize) -> Result<Self> {
        let config = Self { plane_side, block_side };
        config.validate()?;
        Ok(config)
    }

    /// Use a different plane side, keeping the block side.
    pub fn with_plane_side(self, plane_side: usize) -> Result<Self> {
        Self::new(plane_side, self.block_side)
    }

    /// Check that the wavelet pyramid and the block grid fit this plane.
    pub fn validate(&self) -> UnitResult {
        if self.block_side == 0 {
            return Err(Error::invalid("block side must not be zero"));
        }

        if self.plane_side < 2 || !self.plane_side.is_power_of_two() {
            return Err(Error::not_supported(format!(
                "plane side {} is not a power of two", self.plane_side
            )));
        }

        if self.plane_side % self.block_side != 0 {
            return Err(Error::not_supported(format!(
                "plane side {} is not a multiple of the block side {}",
                self.plane_side, self.block_side
            )));
        }

        Ok(())
    }

    /// Width and height of a plane.
    pub fn plane_size(&self) -> Vec2<usize> {
        Vec2(self.plane_side, self.plane_side)
    }

    /// Number of samples in a single channel plane.
    pub fn pixel_count(&self) -> usize {
        self.plane_size().area()
    }

    /// Number of coefficients in a single dct block (64 for the usual 8x8 blocks).
    pub fn block_area(&self) -> usize {
        self.block_side * self.block_side
    }

    /// Number of blocks along one side of the plane.
    pub fn blocks_per_side(&self) -> usize {
        self.plane_side / self.block_side
    }

    /// Number of dct blocks in a single channel plane.
    /// A whole-image budget of this many coefficients retains one coefficient per block.
    pub fn block_count(&self) -> usize {
        self.blocks_per_side() * self.blocks_per_side()
    }

    /// The smallest budget accepted for a single-shot decode.
    pub fn min_budget(&self) -> usize {
        self.block_count()
    }

    /// The largest budget accepted for a single-shot decode, which retains every coefficient.
    pub fn max_budget(&self) -> usize {
        self.block_count() * self.block_area()
    }

    /// Number of levels of the full wavelet pyramid (9 for a 512 plane).
    pub fn decomposition_levels(&self) -> usize {
        floor_log_2(self.plane_side)
    }
}
