
//! Loading raw planar rgb files.
//! Uses the error handling for this crate.

pub use ::std::io::Read;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};
use crate::image::{PixelGrid, CHANNEL_COUNT};
use crate::math::Vec2;


/// Read exactly one planar rgb image of the specified resolution:
/// all red bytes, then all green bytes, then all blue bytes, each row by row.
/// Any bytes after the image are not read.
/// Returns `Error::Invalid` if the source ends early.
pub fn read_planar_rgb(read: impl Read, resolution: Vec2<usize>) -> Result<PixelGrid> {
    let byte_count = resolution.area() * CHANNEL_COUNT;
    let mut bytes = Vec::with_capacity(byte_count);

    let read_count = read.take(byte_count as u64).read_to_end(&mut bytes)?;
    if read_count < byte_count {
        return Err(Error::invalid(format!(
            "pixel source contains only {} of the {} bytes of a {}x{} planar rgb image",
            read_count, byte_count, resolution.width(), resolution.height()
        )));
    }

    PixelGrid::from_planar_bytes(resolution, &bytes)
}

/// Open a file and read a planar rgb image from its start.
pub fn read_planar_rgb_file(path: impl AsRef<Path>, resolution: Vec2<usize>) -> Result<PixelGrid> {
    let file = File::open(path)?;
    read_planar_rgb(BufReader::new(file), resolution)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_one_frame_and_ignores_the_rest() {
        let mut bytes: Vec<u8> = (0 .. 12).collect();
        bytes.extend_from_slice(&[99; 10]);

        let grid = read_planar_rgb(Cursor::new(bytes), Vec2(2, 2)).unwrap();
        assert_eq!(grid.get_pixel(Vec2(0, 0)), [0, 4, 8]);
        assert_eq!(grid.get_pixel(Vec2(1, 1)), [3, 7, 11]);
    }

    #[test]
    fn short_source_is_invalid() {
        let result = read_planar_rgb(Cursor::new(vec![0_u8; 11]), Vec2(2, 2));
        assert!(matches!(result, Err(Error::Invalid(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = read_planar_rgb_file("this/file/does/not/exist.rgb", Vec2(2, 2));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
