
//! Zigzag scan order of the coefficients in a square dct block.

use std::sync::{Arc, OnceLock};
use crate::math::Vec2;


/// The positions of a square block, sorted by ascending spatial frequency.
/// Each anti-diagonal `x + y = s` is swept in alternating direction,
/// starting with `(0, 0)` and ending with the bottom right corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZigzagOrder {
    /// `(x, y)` for each rank.
    positions: Vec<Vec2<usize>>,

    /// `y * block_side + x` for each rank.
    flat_indices: Vec<usize>,
}

impl ZigzagOrder {

    /// Compute the order for blocks of the specified side.
    pub fn new(block_side: usize) -> Self {
        let mut positions = Vec::with_capacity(block_side * block_side);

        for diagonal in 0 .. (2 * block_side).saturating_sub(1) {
            let skipped = if diagonal < block_side { 0 } else { diagonal - block_side + 1 };

            for step in skipped ..= diagonal - skipped {
                let position =
                    if diagonal % 2 == 0 { Vec2(step, diagonal - step) }
                    else { Vec2(diagonal - step, step) };

                positions.push(position);
            }
        }

        let flat_indices = positions.iter()
            .map(|&Vec2(x, y)| y * block_side + x)
            .collect();

        Self { positions, flat_indices }
    }

    /// The order of 8x8 blocks, computed once and shared by all engines.
    pub fn standard() -> Arc<Self> {
        static STANDARD: OnceLock<Arc<ZigzagOrder>> = OnceLock::new();
        STANDARD.get_or_init(|| Arc::new(ZigzagOrder::new(8))).clone()
    }

    /// Reuse the shared order if the side matches, compute a new one otherwise.
    pub fn for_block_side(block_side: usize) -> Arc<Self> {
        if block_side == 8 { Self::standard() }
        else { Arc::new(Self::new(block_side)) }
    }

    /// Number of ranks, which is the number of coefficients in a block.
    fn len(&self) -> usize { self.positions.len() }

    /// The `(x, y)` position of each rank.
    pub fn positions(&self) -> &[Vec2<usize>] { &self.positions }

    /// The row-major index inside a block for each rank.
    pub fn flat_indices(&self) -> &[usize] { &self.flat_indices }

    /// Zero all coefficients of a row-major block whose rank is `retained` or higher,
    /// keeping the `retained` lowest frequencies untouched.
    pub fn truncate(&self, block: &mut [f64], retained: usize) {
        debug_assert_eq!(block.len(), self.len(), "block does not match zigzag order");

        for &index in self.flat_indices.iter().skip(retained) {
            block[index] = 0.0;
        }
    }
}
