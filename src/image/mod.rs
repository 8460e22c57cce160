
//! Pixel grids, their channel planes, and the compositing of reconstructed frames.

pub mod plane;
pub mod pixels;
pub mod composite;

pub use self::plane::ChannelPlane;
pub use self::pixels::{PixelGrid, RgbPixel, CHANNEL_COUNT};
pub use self::composite::side_by_side;
