
//! Compare how images degrade under two lossy transform families
//! when only part of their coefficients is retained:
//! an 8x8 block DCT truncated in zigzag order,
//! and a multiresolution Haar wavelet pyramid truncated level by level.
//!
//! An image is encoded once, and can then be decoded with any budget,
//! either in a single shot or as a progressive sequence of frames.

#![forbid(unsafe_code)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused_extern_crates,
    unused,
    missing_debug_implementations,
)]

#![deny(
    unused_variables,
    unused_assignments,
    dead_code,
    unused_must_use,
    trivial_numeric_casts,
    redundant_semicolons
)]

#![warn(missing_docs)]


pub mod io;
pub mod math;
pub mod error;
pub mod config;
pub mod image;
pub mod compression;
pub mod progressive;
pub mod request;


/// Export the most important items.
pub mod prelude {

    // main exports
    pub use crate::compression::{Codec, EncodedImage, TransformKind};
    pub use crate::progressive::{Frame, Progression, Schedule, Step};
    pub use crate::request::Request;

    // core data types
    pub use crate::config::CodecConfig;
    pub use crate::image::{ChannelPlane, PixelGrid, side_by_side};
    pub use crate::io::{read_planar_rgb, read_planar_rgb_file};
    pub use crate::math::Vec2;

    // secondary data types
    pub use crate::error::{self, Error, Result, UnitResult};
}
