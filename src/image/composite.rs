
//! Combine reconstructed grids into a single displayable frame.

use crate::math::Vec2;
use super::pixels::PixelGrid;


/// Place two grids next to each other, without scaling.
/// The result is as wide as both grids together and as high as the higher one.
/// Pixels below the lower grid stay black.
pub fn side_by_side(left: &PixelGrid, right: &PixelGrid) -> PixelGrid {
    let resolution = Vec2(
        left.resolution.width() + right.resolution.width(),
        left.resolution.height().max(right.resolution.height()),
    );

    let mut combined = PixelGrid::black(resolution);
    paste(&mut combined, left, 0);
    paste(&mut combined, right, left.resolution.width());
    combined
}

fn paste(target: &mut PixelGrid, source: &PixelGrid, x_offset: usize) {
    let source_width = source.resolution.width();

    for y in 0 .. source.resolution.height() {
        let source_row = &source.pixels[y * source_width .. (y + 1) * source_width];
        let start = target.compute_pixel_index(Vec2(x_offset, y));
        target.pixels[start .. start + source_width].copy_from_slice(source_row);
    }
}
