
//! A single color channel of an image.

use crate::math::Vec2;


/// One intensity sample per pixel, for a single color channel, in row-major order.
/// Holds `u8` samples at the edges of the pipeline and `f64` samples while transforming.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPlane<T> {
    size: Vec2<usize>,
    samples: Vec<T>,
}

impl<T: Copy + Default> ChannelPlane<T> {

    /// A plane where every sample has the default value (zero).
    pub fn new(size: Vec2<usize>) -> Self {
        Self { size, samples: vec![T::default(); size.area()] }
    }

    /// Build a plane by computing each sample from its position.
    pub fn from_fn(size: Vec2<usize>, mut sample_at: impl FnMut(Vec2<usize>) -> T) -> Self {
        let mut samples = Vec::with_capacity(size.area());

        for y in 0..size.height() {
            for x in 0..size.width() {
                samples.push(sample_at(Vec2(x, y)));
            }
        }

        Self { size, samples }
    }
}

impl<T: Copy> ChannelPlane<T> {

    /// Wrap a row-major sample buffer. Panics if the buffer does not match the size.
    pub fn from_samples(size: Vec2<usize>, samples: Vec<T>) -> Self {
        assert_eq!(samples.len(), size.area(), "sample count does not match plane size");
        Self { size, samples }
    }

    /// Width and height.
    #[inline] pub fn size(&self) -> Vec2<usize> { self.size }

    /// Row-major samples.
    #[inline] pub fn samples(&self) -> &[T] { &self.samples }

    /// The sample at `(x, y)`.
    #[inline]
    pub fn get(&self, position: Vec2<usize>) -> T {
        self.samples[self.size.flat_index_for(position)]
    }

    /// Replace the sample at `(x, y)`.
    #[inline]
    pub fn set(&mut self, position: Vec2<usize>, sample: T) {
        let index = self.size.flat_index_for(position);
        self.samples[index] = sample;
    }

    /// The samples of row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.size.width();
        &self.samples[start .. start + self.size.width()]
    }

    /// The samples of row `y`.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let start = y * self.size.width();
        let width = self.size.width();
        &mut self.samples[start .. start + width]
    }

    /// Convert every sample, keeping the layout.
    pub fn map<B>(&self, convert: impl Fn(T) -> B) -> ChannelPlane<B> {
        ChannelPlane {
            size: self.size,
            samples: self.samples.iter().map(|&sample| convert(sample)).collect(),
        }
    }
}

impl ChannelPlane<u8> {

    /// Average absolute difference between the samples of two planes of the same size.
    pub fn mean_absolute_error(&self, other: &Self) -> f64 {
        assert_eq!(self.size, other.size, "planes must have the same size");
        if self.samples.is_empty() { return 0.0; }

        let total: u64 = self.samples.iter().zip(&other.samples)
            .map(|(&a, &b)| u64::from(a.abs_diff(b)))
            .sum();

        total as f64 / self.samples.len() as f64
    }

    /// The unweighted average of all samples.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() { return 0.0; }
        let total: u64 = self.samples.iter().map(|&sample| u64::from(sample)).sum();
        total as f64 / self.samples.len() as f64
    }
}
