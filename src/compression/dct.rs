
//! Block DCT (Discrete Cosine Transform) with zigzag truncation.
//!
//! Every channel plane is cut into square blocks (8x8 by default).
//! Each block is transformed with an orthonormal two-dimensional DCT-II.
//! A budget retains the lowest frequencies of every block in zigzag order,
//! and the orthonormal DCT-III restores the spatial samples.

use std::fmt;
use std::sync::{Arc, OnceLock};
use rustdct::{DctPlanner, TransformType2And3};
use smallvec::SmallVec;

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::image::ChannelPlane;
use crate::math::{clamp_to_byte, Vec2};
use super::zigzag::ZigzagOrder;
use super::Transform;


/// The samples or coefficients of a single block, row-major.
/// Stays on the stack for blocks up to 8x8.
pub type Block = SmallVec<[f64; 64]>;

/// A row or column of a block.
type Line = SmallVec<[f64; 8]>;

/// A planned one-dimensional kernel, providing both DCT-II and DCT-III.
type Kernel = Arc<dyn TransformType2And3<f64>>;


/// Cached transform for blocks of eight samples.
fn planned_kernel_8() -> &'static Kernel {
    static KERNEL: OnceLock<Kernel> = OnceLock::new();
    KERNEL.get_or_init(|| DctPlanner::new().plan_dct2(8))
}

fn plan_kernel(block_side: usize) -> Kernel {
    if block_side == 8 { planned_kernel_8().clone() }
    else { DctPlanner::new().plan_dct2(block_side) }
}


/// The frequency coefficients of all blocks of one channel plane.
/// The blocks are stored one after another, row by row,
/// and the coefficients of each block are row-major,
/// with the horizontal frequency increasing along a row.
#[derive(Debug, Clone, PartialEq)]
pub struct DctCoefficients {
    blocks_per_side: usize,
    block_area: usize,
    values: Vec<f64>,
}

impl DctCoefficients {

    /// Number of blocks in the plane.
    pub fn block_count(&self) -> usize { self.blocks_per_side * self.blocks_per_side }

    /// The coefficients of the block at the specified block coordinates.
    pub fn block(&self, block_position: Vec2<usize>) -> &[f64] {
        let index = Vec2(self.blocks_per_side, self.blocks_per_side).flat_index_for(block_position);
        &self.values[index * self.block_area .. (index + 1) * self.block_area]
    }
}


/// Encodes planes into block coefficients and decodes them with a budget.
/// Holds the zigzag order and the planned dct kernel, both shared across all blocks.
#[derive(Clone)]
pub struct DctEngine {
    config: CodecConfig,
    zigzag: Arc<ZigzagOrder>,
    kernel: Kernel,
}

impl fmt::Debug for DctEngine {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("DctEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DctEngine {

    /// Prepare an engine for the block size of the configuration.
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            zigzag: ZigzagOrder::for_block_side(config.block_side),
            kernel: plan_kernel(config.block_side),
        })
    }

    /// The geometry this engine was built for.
    pub fn config(&self) -> &CodecConfig { &self.config }

    /// Orthonormal two-dimensional DCT-II of a row-major block:
    /// `C[u][v] = (2/N) α(u) α(v) Σ block[x][y] cos((2x+1)uπ/2N) cos((2y+1)vπ/2N)`,
    /// with `α(0) = 1/√2` and `α(k) = 1` otherwise.
    pub fn forward_block(&self, block: &[f64]) -> Block {
        let side = self.config.block_side;
        debug_assert_eq!(block.len(), side * side, "block has wrong size");

        // first pass: along each row, stored transposed
        let mut transposed: Block = smallvec::smallvec![0.0; side * side];
        for y in 0 .. side {
            let mut row: Line = block[y * side .. (y + 1) * side].iter().copied().collect();
            self.kernel.process_dct2(&mut row);

            for u in 0 .. side {
                transposed[u * side + y] = row[u];
            }
        }

        // second pass: along each column, which is a row of the transposed block
        let normalization = 2.0 / side as f64;
        let mut coefficients: Block = smallvec::smallvec![0.0; side * side];
        for u in 0 .. side {
            let mut column: Line = transposed[u * side .. (u + 1) * side].iter().copied().collect();
            self.kernel.process_dct2(&mut column);

            for v in 0 .. side {
                coefficients[v * side + u] = column[v] * normalization * alpha(u) * alpha(v);
            }
        }

        coefficients
    }

    /// Orthonormal two-dimensional DCT-III, the exact inverse of `forward_block`.
    /// The result is not clamped.
    pub fn inverse_block(&self, coefficients: &[f64]) -> Block {
        let side = self.config.block_side;
        debug_assert_eq!(coefficients.len(), side * side, "block has wrong size");

        // the kernel halves the first coefficient, so it is scaled by 2α(0) instead of α(0)
        let weight = |frequency: usize| if frequency == 0 { std::f64::consts::SQRT_2 } else { 1.0 };

        let mut transposed: Block = smallvec::smallvec![0.0; side * side];
        for v in 0 .. side {
            let mut row: Line = coefficients[v * side .. (v + 1) * side].iter().enumerate()
                .map(|(u, &coefficient)| coefficient * weight(u) * weight(v))
                .collect();

            self.kernel.process_dct3(&mut row);

            for x in 0 .. side {
                transposed[x * side + v] = row[x];
            }
        }

        let normalization = 2.0 / side as f64;
        let mut samples: Block = smallvec::smallvec![0.0; side * side];
        for x in 0 .. side {
            let mut column: Line = transposed[x * side .. (x + 1) * side].iter().copied().collect();
            self.kernel.process_dct3(&mut column);

            for y in 0 .. side {
                samples[y * side + x] = column[y] * normalization;
            }
        }

        samples
    }

    /// Zero every coefficient whose zigzag rank is `retained` or higher.
    /// Zero retains nothing, the block area retains everything.
    pub fn apply_budget(&self, coefficients: &mut [f64], retained: usize) {
        self.zigzag.truncate(coefficients, retained);
    }

    /// Convert a whole-image budget into the number of coefficients retained in every block,
    /// rounding to the nearest count.
    pub fn retained_per_block(&self, budget: usize) -> usize {
        let per_block = (budget as f64 / self.config.block_count() as f64).round() as usize;
        per_block.min(self.config.block_area())
    }

    /// Transform all blocks of a plane.
    pub fn encode(&self, plane: &ChannelPlane<u8>) -> Result<DctCoefficients> {
        if plane.size() != self.config.plane_size() {
            return Err(Error::invalid(format!(
                "plane of size {:?} does not match the configured size {:?}",
                plane.size(), self.config.plane_size()
            )));
        }

        let side = self.config.block_side;
        let blocks_per_side = self.config.blocks_per_side();
        let mut values = Vec::with_capacity(self.config.pixel_count());
        let mut block = Block::with_capacity(side * side);

        for block_y in 0 .. blocks_per_side {
            for block_x in 0 .. blocks_per_side {
                block.clear();

                for y in 0 .. side {
                    let row = plane.row(block_y * side + y);
                    let start = block_x * side;
                    block.extend(row[start .. start + side].iter().map(|&sample| f64::from(sample)));
                }

                values.extend_from_slice(&self.forward_block(&block));
            }
        }

        Ok(DctCoefficients { blocks_per_side, block_area: side * side, values })
    }

    /// Reconstruct a plane from a private copy of the stored coefficients,
    /// retaining `retained_per_block(budget)` coefficients in every block.
    /// Fails if the coefficients were produced with another block grid.
    pub fn decode(&self, coefficients: &DctCoefficients, budget: usize) -> Result<ChannelPlane<u8>> {
        let side = self.config.block_side;

        if coefficients.blocks_per_side != self.config.blocks_per_side() || coefficients.block_area != self.config.block_area() {
            return Err(Error::invalid(format!(
                "coefficients of {} blocks with {} frequencies each do not match the configured {} blocks of {}",
                coefficients.block_count(), coefficients.block_area,
                self.config.block_count(), self.config.block_area()
            )));
        }

        let retained = self.retained_per_block(budget);
        let mut plane = ChannelPlane::new(self.config.plane_size());

        for block_y in 0 .. coefficients.blocks_per_side {
            for block_x in 0 .. coefficients.blocks_per_side {
                let mut block: Block = coefficients.block(Vec2(block_x, block_y)).iter().copied().collect();
                self.apply_budget(&mut block, retained);

                let samples = self.inverse_block(&block);

                for y in 0 .. side {
                    let start = block_x * side;
                    let row = &mut plane.row_mut(block_y * side + y)[start .. start + side];

                    for (target, &sample) in row.iter_mut().zip(&samples[y * side .. (y + 1) * side]) {
                        *target = clamp_to_byte(sample);
                    }
                }
            }
        }

        Ok(plane)
    }
}

impl Transform for DctEngine {
    type Coefficients = DctCoefficients;

    fn encode_plane(&self, plane: &ChannelPlane<u8>) -> Result<DctCoefficients> {
        self.encode(plane)
    }

    fn decode_plane(&self, coefficients: &DctCoefficients, budget: usize) -> Result<ChannelPlane<u8>> {
        self.decode(coefficients, budget)
    }
}

#[inline]
fn alpha(frequency: usize) -> f64 {
    if frequency == 0 { std::f64::consts::FRAC_1_SQRT_2 } else { 1.0 }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn engine() -> DctEngine {
        DctEngine::new(CodecConfig::new(8, 8).unwrap()).unwrap()
    }

    fn test_block() -> [f64; 64] {
        let mut block = [0.0; 64];
        for (index, sample) in block.iter_mut().enumerate() {
            *sample = 128.0 + 100.0 * ((index as f64) * 0.7).sin();
        }
        block
    }

    /// The textbook quadruple sum, `block[x][y]` meaning column `x` of row `y`.
    fn reference_forward(block: &[f64]) -> [f64; 64] {
        let mut result = [0.0; 64];

        for v in 0 .. 8 {
            for u in 0 .. 8 {
                let mut sum = 0.0;

                for y in 0 .. 8 {
                    for x in 0 .. 8 {
                        sum += block[y * 8 + x]
                            * ((2 * x + 1) as f64 * u as f64 * PI / 16.0).cos()
                            * ((2 * y + 1) as f64 * v as f64 * PI / 16.0).cos();
                    }
                }

                result[v * 8 + u] = 0.25 * alpha(u) * alpha(v) * sum;
            }
        }

        result
    }

    #[test]
    fn forward_matches_reference_formula() {
        let block = test_block();
        let expected = reference_forward(&block);
        let actual = engine().forward_block(&block);

        for (index, (&expected, &actual)) in expected.iter().zip(actual.iter()).enumerate() {
            assert!((expected - actual).abs() < 1e-9, "coefficient {}: {} vs {}", index, expected, actual);
        }
    }

    #[test]
    fn full_budget_round_trip() {
        let engine = engine();
        let block = test_block();
        let recovered = engine.inverse_block(&engine.forward_block(&block));

        for (index, (&original, &recovered)) in block.iter().zip(recovered.iter()).enumerate() {
            assert!((original - recovered).abs() <= 1e-9, "sample {}: {} vs {}", index, original, recovered);
        }
    }

    #[test]
    fn constant_block_has_only_dc() {
        let engine = engine();
        let coefficients = engine.forward_block(&[42.0; 64]);

        // 0.25 * 1/2 * 64 * 42
        assert!((coefficients[0] - 42.0 * 8.0).abs() < 1e-9);
        assert!(coefficients[1..].iter().all(|coefficient| coefficient.abs() < 1e-9));

        let samples = engine.inverse_block(&coefficients);
        assert!(samples.iter().all(|sample| (sample - 42.0).abs() < 1e-9));
    }

    #[test]
    fn budget_per_block_rounds_to_nearest() {
        let engine = DctEngine::new(CodecConfig::default()).unwrap();
        assert_eq!(engine.retained_per_block(4096), 1);
        assert_eq!(engine.retained_per_block(6143), 1);
        assert_eq!(engine.retained_per_block(6144), 2);
        assert_eq!(engine.retained_per_block(32_768), 8);
        assert_eq!(engine.retained_per_block(262_144), 64);
        assert_eq!(engine.retained_per_block(1_000_000), 64);
        assert_eq!(engine.retained_per_block(0), 0);
    }

    #[test]
    fn overshoot_is_clamped() {
        // left half black, right half white, inside a single block
        let engine = engine();
        let plane = ChannelPlane::from_fn(Vec2(8, 8), |Vec2(x, _)| if x < 4 { 0 } else { 255 });
        let coefficients = engine.encode(&plane).unwrap();

        // dc and the first horizontal frequency overshoot both ends
        let decoded = engine.decode(&coefficients, 2).unwrap();
        for y in 0 .. 8 {
            assert_eq!(decoded.get(Vec2(0, y)), 0);
            assert_eq!(decoded.get(Vec2(7, y)), 255);
        }
    }

    #[test]
    fn decoding_does_not_modify_stored_coefficients() {
        let engine = engine();
        let plane = ChannelPlane::from_fn(Vec2(8, 8), |Vec2(x, y)| (x * 30 + y * 3) as u8);
        let coefficients = engine.encode(&plane).unwrap();
        let snapshot = coefficients.clone();

        engine.decode(&coefficients, 1).unwrap();
        assert_eq!(coefficients, snapshot);

        assert_eq!(engine.decode(&coefficients, 64).unwrap(), plane);
    }

    #[test]
    fn other_block_sides_round_trip() {
        let engine = DctEngine::new(CodecConfig::new(16, 4).unwrap()).unwrap();
        let plane = ChannelPlane::from_fn(Vec2(16, 16), |Vec2(x, y)| ((x * 13 + y * 7) % 256) as u8);
        let coefficients = engine.encode(&plane).unwrap();
        assert_eq!(engine.decode(&coefficients, engine.config().max_budget()).unwrap(), plane);
    }

    #[test]
    fn mismatched_plane_is_rejected() {
        let plane = ChannelPlane::new(Vec2(16, 16));
        assert!(matches!(engine().encode(&plane), Err(Error::Invalid(_))));
    }

    #[test]
    fn coefficients_of_another_grid_are_rejected() {
        let large = DctEngine::new(CodecConfig::new(16, 8).unwrap()).unwrap();
        let coefficients = large.encode(&ChannelPlane::new(Vec2(16, 16))).unwrap();
        assert!(matches!(engine().decode(&coefficients, 64), Err(Error::Invalid(_))));

        // same plane size, but a different block size
        let fine = DctEngine::new(CodecConfig::new(16, 4).unwrap()).unwrap();
        assert!(matches!(fine.decode(&coefficients, 16), Err(Error::Invalid(_))));
    }
}
