//! Unified error types for amf0-rs

use std::fmt;

use crate::amf::marker::Marker;

/// Result type alias using the library's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all codec operations
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// AMF decoding error
    Amf(AmfError),
    /// Byte buffer misuse
    Buffer(BufferError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Amf(e) => write!(f, "AMF error: {}", e),
            Error::Buffer(e) => write!(f, "Buffer error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Amf(e) => Some(e),
            Error::Buffer(e) => Some(e),
        }
    }
}

impl From<AmfError> for Error {
    fn from(err: AmfError) -> Self {
        Error::Amf(err)
    }
}

impl From<BufferError> for Error {
    fn from(err: BufferError) -> Self {
        Error::Buffer(err)
    }
}

/// AMF0 decoding errors
///
/// Every variant is a failed decode: the value being read must be discarded.
/// Encoding never produces an error.
#[derive(Debug, Clone, PartialEq)]
pub enum AmfError {
    /// Fewer bytes remain than the field being read needs
    UnexpectedEof { needed: usize, remaining: usize },
    /// Marker byte outside the AMF0 marker table
    UnknownMarker(u8),
    /// Marker defined by AMF0 but not handled by this codec
    UnsupportedMarker(Marker),
    /// A variant decoder found a marker belonging to another variant
    MarkerMismatch { expected: Marker, found: u8 },
    /// Zero-length property name not followed by the object end marker
    InvalidObjectEnd(u8),
    /// Input ended before the object end terminator
    MissingObjectEnd,
    /// Object end marker found where a value was expected
    UnexpectedObjectEnd,
    /// String payload is not valid UTF-8
    InvalidUtf8,
    /// Containers nested deeper than the configured limit
    NestingTooDeep,
}

impl fmt::Display for AmfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmfError::UnexpectedEof { needed, remaining } => write!(
                f,
                "Unexpected end of AMF data: needed {} bytes, {} remaining",
                needed, remaining
            ),
            AmfError::UnknownMarker(m) => write!(f, "Unknown AMF marker: 0x{:02x}", m),
            AmfError::UnsupportedMarker(m) => {
                write!(f, "Unsupported AMF marker: {:?} (0x{:02x})", m, m.as_u8())
            }
            AmfError::MarkerMismatch { expected, found } => write!(
                f,
                "AMF marker mismatch: expected {:?} (0x{:02x}), found 0x{:02x}",
                expected,
                expected.as_u8(),
                found
            ),
            AmfError::InvalidObjectEnd(b) => {
                write!(f, "Invalid object end marker: 0x{:02x}", b)
            }
            AmfError::MissingObjectEnd => write!(f, "Missing object end marker"),
            AmfError::UnexpectedObjectEnd => write!(f, "Unexpected object end marker"),
            AmfError::InvalidUtf8 => write!(f, "Invalid UTF-8 in AMF string"),
            AmfError::NestingTooDeep => write!(f, "AMF nesting too deep"),
        }
    }
}

impl std::error::Error for AmfError {}

/// Byte buffer errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Patch range extends past the written data
    OutOfRange { pos: usize, len: usize, size: usize },
    /// Bytes read as text are not valid UTF-8
    InvalidUtf8,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::OutOfRange { pos, len, size } => write!(
                f,
                "Range {}..{} out of bounds for buffer of {} bytes",
                pos,
                pos + len,
                size
            ),
            BufferError::InvalidUtf8 => write!(f, "Invalid UTF-8 in buffer text"),
        }
    }
}

impl std::error::Error for BufferError {}
