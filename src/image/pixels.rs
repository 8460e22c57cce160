
//! Provides the interleaved rgb pixel storage
//! and the conversion from and to independent channel planes.

use crate::error::{Error, Result};
use crate::math::Vec2;
use super::plane::ChannelPlane;


/// The red, green and blue sample of one pixel.
pub type RgbPixel = [u8; 3];

/// The number of color channels in every image.
pub const CHANNEL_COUNT: usize = 3;


/// Store all pixels in a single vector.
///
/// The flattened vector contains all rows one after another.
/// Use `PixelGrid::compute_pixel_index(position)`
/// to compute the flat index of a specific pixel.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct PixelGrid {

    /// The width and height of this grid.
    pub resolution: Vec2<usize>,

    /// The flattened vector contains all rows one after another.
    pub pixels: Vec<RgbPixel>,
}

impl PixelGrid {

    /// Create a new pixel storage, checking the length of the provided pixels vector.
    pub fn new(resolution: impl Into<Vec2<usize>>, pixels: Vec<RgbPixel>) -> Self {
        let size = resolution.into();
        assert_eq!(size.area(), pixels.len(), "expected {} pixels, but vector length is {}", size.area(), pixels.len());
        Self { resolution: size, pixels }
    }

    /// A black grid.
    pub fn black(resolution: impl Into<Vec2<usize>>) -> Self {
        let size = resolution.into();
        Self { resolution: size, pixels: vec![[0; 3]; size.area()] }
    }

    /// Interpret raw bytes in planar layout:
    /// first all red samples, then all green samples, then all blue samples,
    /// each channel stored row by row.
    /// Trailing bytes after the third channel are ignored.
    pub fn from_planar_bytes(resolution: impl Into<Vec2<usize>>, bytes: &[u8]) -> Result<Self> {
        let size = resolution.into();
        let channel_len = size.area();
        let expected = channel_len * CHANNEL_COUNT;

        if bytes.len() < expected {
            return Err(Error::invalid(format!(
                "expected {} planar bytes for a {}x{} image, but found only {}",
                expected, size.width(), size.height(), bytes.len()
            )));
        }

        let (red, rest) = bytes.split_at(channel_len);
        let (green, rest) = rest.split_at(channel_len);
        let blue = &rest[.. channel_len];

        let pixels = red.iter().zip(green).zip(blue)
            .map(|((&r, &g), &b)| [r, g, b])
            .collect();

        Ok(Self { resolution: size, pixels })
    }

    /// Reassemble three independent channel planes of equal size into one grid.
    pub fn from_channel_planes(planes: [&ChannelPlane<u8>; CHANNEL_COUNT]) -> Self {
        let [red, green, blue] = planes;
        let size = red.size();
        assert!(green.size() == size && blue.size() == size, "channel planes must have the same size");

        let pixels = red.samples().iter().zip(green.samples()).zip(blue.samples())
            .map(|((&r, &g), &b)| [r, g, b])
            .collect();

        Self { resolution: size, pixels }
    }

    /// Compute the flat index of a specific pixel.
    /// Panics for invalid pixel coordinates.
    #[inline]
    pub fn compute_pixel_index(&self, position: Vec2<usize>) -> usize {
        self.resolution.flat_index_for(position)
    }

    /// The pixel at `(x, y)`.
    #[inline]
    pub fn get_pixel(&self, position: Vec2<usize>) -> RgbPixel {
        self.pixels[self.compute_pixel_index(position)]
    }

    /// Extract one color channel as an independent plane.
    /// Panics if `channel` is not 0, 1 or 2.
    pub fn channel_plane(&self, channel: usize) -> ChannelPlane<u8> {
        assert!(channel < CHANNEL_COUNT, "channel index {} out of range", channel);

        ChannelPlane::from_samples(
            self.resolution,
            self.pixels.iter().map(|pixel| pixel[channel]).collect()
        )
    }

    /// Split this grid into its red, green and blue planes.
    pub fn channel_planes(&self) -> [ChannelPlane<u8>; CHANNEL_COUNT] {
        [self.channel_plane(0), self.channel_plane(1), self.channel_plane(2)]
    }

    /// All samples as `r, g, b, r, g, b, ...`, row by row,
    /// which is the layout that image libraries usually expect.
    pub fn to_interleaved_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|pixel| pixel.iter().copied()).collect()
    }

    /// Average absolute sample difference over all channels.
    pub fn mean_absolute_error(&self, other: &Self) -> f64 {
        assert_eq!(self.resolution, other.resolution, "grids must have the same resolution");

        (0 .. CHANNEL_COUNT)
            .map(|channel| self.channel_plane(channel).mean_absolute_error(&other.channel_plane(channel)))
            .sum::<f64>() / CHANNEL_COUNT as f64
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_bytes_are_split_by_channel() {
        // 2x2 image, red plane first, then green, then blue
        let bytes = [
            1, 2, 3, 4,
            10, 20, 30, 40,
            100, 150, 200, 250,
        ];

        let grid = PixelGrid::from_planar_bytes(Vec2(2, 2), &bytes).unwrap();
        assert_eq!(grid.get_pixel(Vec2(0, 0)), [1, 10, 100]);
        assert_eq!(grid.get_pixel(Vec2(1, 0)), [2, 20, 150]);
        assert_eq!(grid.get_pixel(Vec2(0, 1)), [3, 30, 200]);
        assert_eq!(grid.get_pixel(Vec2(1, 1)), [4, 40, 250]);

        let green = grid.channel_plane(1);
        assert_eq!(green.samples(), &[10, 20, 30, 40]);
    }

    #[test]
    fn short_planar_input_is_rejected() {
        let bytes = vec![0_u8; 2 * 2 * 3 - 1];
        let result = PixelGrid::from_planar_bytes(Vec2(2, 2), &bytes);
        assert!(matches!(result, Err(Error::Invalid(_))));
    }

    #[test]
    fn trailing_planar_bytes_are_ignored() {
        let bytes = vec![7_u8; 2 * 2 * 3 + 5];
        let grid = PixelGrid::from_planar_bytes(Vec2(2, 2), &bytes).unwrap();
        assert!(grid.pixels.iter().all(|&pixel| pixel == [7, 7, 7]));
    }

    #[test]
    fn planes_reassemble_into_the_same_grid() {
        let grid = PixelGrid::new(Vec2(3, 1), vec![[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
        let [red, green, blue] = grid.channel_planes();
        assert_eq!(PixelGrid::from_channel_planes([&red, &green, &blue]), grid);
        assert_eq!(grid.to_interleaved_bytes(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }
}
