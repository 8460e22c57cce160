
//! Error type definitions.

use std::borrow::Cow;
use std::io::ErrorKind;
pub use std::io::Error as IoError;
use std::fmt;
use std::error;


/// A result that may contain an error.
pub type Result<T> = std::result::Result<T, Error>;

/// A result that, if ok, contains nothing, and otherwise contains an error.
pub type UnitResult = Result<()>;


/// An error that may happen while loading, encoding or decoding an image.
#[derive(Debug)]
pub enum Error {

    /// The arguments or the pixel data contain invalid values,
    /// for example a budget outside of the accepted range,
    /// or a pixel source that is too short.
    Invalid(Cow<'static, str>),

    /// The requested configuration is valid in general
    /// but cannot be handled by the transforms of this crate,
    /// for example a plane side that is not a power of two.
    NotSupported(Cow<'static, str>),

    /// The underlying byte stream could not be read.
    Io(IoError),
}


impl Error {

    /// Create an error of the variant `Invalid`.
    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Error::Invalid(message.into())
    }

    /// Create an error of the variant `NotSupported`.
    pub(crate) fn not_supported(message: impl Into<Cow<'static, str>>) -> Self {
        Error::NotSupported(message.into())
    }
}

/// Enable using the `?` operator on `std::io::Result`.
impl From<IoError> for Error {
    fn from(error: IoError) -> Self {
        if error.kind() == ErrorKind::UnexpectedEof {
            Error::invalid("pixel source ended before the image was complete")
        }
        else {
            Error::Io(error)
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(formatter),
            Error::NotSupported(message) => write!(formatter, "not supported: {}", message),
            Error::Invalid(message) => write!(formatter, "invalid: {}", message),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}
