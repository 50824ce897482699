//! Library-wide error and result types.

use std::fmt;
use std::io;

use crate::writer::AnimFormat;

/// Result alias used throughout gcbanner.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Every variant is local to a single input file; batch callers report it
/// and move on to the next file.
#[derive(Debug)]
pub enum Error {
    /// The magic did not match any known container, and the encrypted
    /// savegame probe failed as well.
    UnknownFormat,
    /// The container length does not satisfy the size rule for its kind.
    InvalidSize {
        /// Human-readable size rule, e.g. `6496` or `24736 + n*4608`.
        expected: String,
        /// Actual length in bytes.
        actual: u64,
    },
    /// The source ended before all bytes required by the format were read.
    TruncatedRead,
    /// A pixel block is shorter than `width * height * 2` bytes.
    TruncatedPixelData { expected: usize, actual: usize },
    /// Animated output was requested but no animated format is compiled in.
    NoAnimFormatAvailable,
    /// A specific animated format was requested but is not available.
    UnsupportedFormat(AnimFormat),
    /// Icon output was requested for a container that has no icons.
    NoIcon,
    /// The image writer failed to encode its output.
    Encode(String),
    /// An underlying I/O operation failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownFormat => write!(f, "unknown banner format"),
            Error::InvalidSize { expected, actual } => {
                write!(f, "invalid size: expected {expected}, got {actual}")
            }
            Error::TruncatedRead => write!(f, "unexpected end of file"),
            Error::TruncatedPixelData { expected, actual } => {
                write!(f, "truncated pixel data: need {expected} bytes, got {actual}")
            }
            Error::NoAnimFormatAvailable => write!(f, "no animated image format available"),
            Error::UnsupportedFormat(format) => {
                write!(f, "animated format {} is not available", format.name())
            }
            Error::NoIcon => write!(f, "file has no icon"),
            Error::Encode(s) => write!(f, "encode error: {s}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Error::Io(e) = self {
            Some(e)
        } else {
            None
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::TruncatedRead
        } else {
            Error::Io(e)
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Encode(e.to_string())
    }
}

#[cfg(feature = "apng")]
impl From<png::EncodingError> for Error {
    fn from(e: png::EncodingError) -> Self {
        Error::Encode(e.to_string())
    }
}
