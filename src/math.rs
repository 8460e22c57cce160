
//! Simple math utilities.


/// Simple two-dimensional vector of any numerical type.
/// Supports only few mathematical operations
/// as this is used mainly as data struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Vec2<T> (pub T, pub T);

impl<T> Vec2<T> {

    /// Maps all components of this vector to a new type, yielding a vector of that new type.
    pub fn map<B>(self, map: impl Fn(T) -> B) -> Vec2<B> {
        Vec2(map(self.0), map(self.1))
    }

    /// Seeing this vector as a dimension or size (width and height),
    /// this returns the area that this dimensions contains (`width * height`).
    #[inline]
    pub fn area(self) -> T where T: std::ops::Mul<T, Output = T> {
        self.0 * self.1
    }
}

impl Vec2<usize> {

    /// The first component of this size.
    #[inline] pub fn width(self) -> usize { self.0 }

    /// The second component of this size.
    #[inline] pub fn height(self) -> usize { self.1 }

    /// The index of the position `(x, y)` in a row-major buffer of this size.
    #[inline]
    pub fn flat_index_for(self, position: Vec2<usize>) -> usize {
        debug_assert!(position.0 < self.0 && position.1 < self.1, "position {:?} out of bounds {:?}", position, self);
        position.1 * self.0 + position.0
    }
}

/// Computes `floor(log(x)/log(2))`. Returns 0 where argument is 0.
pub(crate) fn floor_log_2(mut number: usize) -> usize {
    let mut log = 0;

    while number > 1 {
        log += 1;
        number >>= 1;
    }

    log
}

/// Computes `floor(sqrt(x))` without floating point rounding surprises.
pub(crate) fn floor_sqrt(number: usize) -> usize {
    let mut root = (number as f64).sqrt() as usize;

    // the float estimate can be off by one for huge numbers
    while root * root > number { root -= 1; }
    while (root + 1) * (root + 1) <= number { root += 1; }

    root
}

/// Round to the nearest integer and clamp into the byte range.
/// This is the only place where reconstructed samples leave the real domain.
#[inline]
pub fn clamp_to_byte(sample: f64) -> u8 {
    sample.round().clamp(0.0, 255.0) as u8
}
