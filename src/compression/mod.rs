
//! Contains the two transform families
//! and methods to encode an image once and decode it with any budget.

pub mod zigzag;
pub mod dct;
pub mod dwt;

use std::time::Instant;

use crate::config::CodecConfig;
use crate::error::{Error, Result, UnitResult};
use crate::image::{ChannelPlane, PixelGrid};

pub use self::dct::{DctCoefficients, DctEngine};
pub use self::dwt::{DwtCoefficients, DwtEngine};


/// A transform that turns a channel plane into an opaque coefficient representation,
/// and restores a plane from those coefficients while retaining only part of them.
pub trait Transform: Sync {

    /// The stored coefficients of one channel plane.
    type Coefficients: Send + Sync;

    /// Transform a plane. Fails if the plane does not match the configured size.
    fn encode_plane(&self, plane: &ChannelPlane<u8>) -> Result<Self::Coefficients>;

    /// Reconstruct a plane from the coefficients without modifying them.
    /// Fails if the coefficients do not match the configured geometry.
    fn decode_plane(&self, coefficients: &Self::Coefficients, budget: usize) -> Result<ChannelPlane<u8>>;
}


/// Specifies which transform family to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {

    /// Blockwise discrete cosine transform.
    /// A budget retains the same number of low frequencies in every block.
    Dct,

    /// Multiresolution haar wavelet transform of the whole plane.
    /// A budget discards the finest levels of the pyramid.
    Dwt,
}

impl std::fmt::Display for TransformKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            TransformKind::Dct => "DCT",
            TransformKind::Dwt => "DWT",
        })
    }
}


/// The coefficients of all three channels, for both transform families.
/// Produced once per image and never modified by decoding.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    config: CodecConfig,
    dct: [DctCoefficients; 3],
    dwt: [DwtCoefficients; 3],
}

impl EncodedImage {

    /// The geometry these coefficients were produced with.
    pub fn config(&self) -> &CodecConfig { &self.config }

    /// Block dct coefficients of the red, green and blue planes.
    pub fn dct(&self) -> &[DctCoefficients; 3] { &self.dct }

    /// Wavelet pyramids of the red, green and blue planes.
    pub fn dwt(&self) -> &[DwtCoefficients; 3] { &self.dwt }
}


/// Both engines for one configuration.
#[derive(Debug, Clone)]
pub struct Codec {
    config: CodecConfig,
    dct: DctEngine,
    dwt: DwtEngine,
}

impl Codec {

    /// Prepare both engines. Fails for unsupported configurations.
    pub fn new(config: CodecConfig) -> Result<Self> {
        Ok(Self {
            config,
            dct: DctEngine::new(config)?,
            dwt: DwtEngine::new(config)?,
        })
    }

    /// The geometry of both engines.
    pub fn config(&self) -> &CodecConfig { &self.config }

    /// Split the image into its channels and transform each of them with both families.
    pub fn encode(&self, image: &PixelGrid) -> Result<EncodedImage> {
        if image.resolution != self.config.plane_size() {
            return Err(Error::invalid(format!(
                "image resolution {:?} does not match the configured plane size {:?}",
                image.resolution, self.config.plane_size()
            )));
        }

        let start = Instant::now();
        let planes = image.channel_planes();

        let dct = encode_channels(&self.dct, &planes)?;
        let dwt = encode_channels(&self.dwt, &planes)?;

        log::debug!("encoded {}x{} image in {:?}", self.config.plane_side, self.config.plane_side, start.elapsed());
        Ok(EncodedImage { config: self.config, dct, dwt })
    }

    /// Fails if the image was encoded by a codec with another configuration.
    pub fn check_compatible(&self, encoded: &EncodedImage) -> UnitResult {
        if encoded.config != self.config {
            return Err(Error::invalid(format!(
                "image was encoded as {}x{} planes with {}x{} blocks, but this codec uses {}x{} planes with {}x{} blocks",
                encoded.config.plane_side, encoded.config.plane_side, encoded.config.block_side, encoded.config.block_side,
                self.config.plane_side, self.config.plane_side, self.config.block_side, self.config.block_side
            )));
        }

        Ok(())
    }

    /// Reconstruct the image from its block dct coefficients.
    pub fn decode_dct(&self, encoded: &EncodedImage, budget: usize) -> Result<PixelGrid> {
        self.check_compatible(encoded)?;
        decode_channels(&self.dct, &encoded.dct, budget)
    }

    /// Reconstruct the image from its wavelet pyramids.
    pub fn decode_dwt(&self, encoded: &EncodedImage, budget: usize) -> Result<PixelGrid> {
        self.check_compatible(encoded)?;
        decode_channels(&self.dwt, &encoded.dwt, budget)
    }

    /// Reconstruct the image with the specified transform family.
    pub fn decode(&self, encoded: &EncodedImage, kind: TransformKind, budget: usize) -> Result<PixelGrid> {
        match kind {
            TransformKind::Dct => self.decode_dct(encoded, budget),
            TransformKind::Dwt => self.decode_dwt(encoded, budget),
        }
    }
}


/// Transform the three channels one after another.
fn encode_channels<T: Transform>(transform: &T, planes: &[ChannelPlane<u8>; 3]) -> Result<[T::Coefficients; 3]> {
    let [red, green, blue] = planes;
    Ok([transform.encode_plane(red)?, transform.encode_plane(green)?, transform.encode_plane(blue)?])
}

/// Decode the three channels, in parallel if possible, and interleave them.
fn decode_channels<T: Transform>(transform: &T, channels: &[T::Coefficients; 3], budget: usize) -> Result<PixelGrid> {
    let [red, green, blue] = channels;

    #[cfg(feature = "rayon")]
    let (red, (green, blue)) = rayon::join(
        || transform.decode_plane(red, budget),
        || rayon::join(
            || transform.decode_plane(green, budget),
            || transform.decode_plane(blue, budget),
        ),
    );

    #[cfg(not(feature = "rayon"))]
    let (red, green, blue) = (
        transform.decode_plane(red, budget),
        transform.decode_plane(green, budget),
        transform.decode_plane(blue, budget),
    );

    Ok(PixelGrid::from_channel_planes([&red?, &green?, &blue?]))
}
