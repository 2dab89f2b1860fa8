//! Error types for OSC encoding and decoding.

use std::fmt;

/// Result type for encode operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors that can occur while appending to a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeError {
    /// The message does not fit in the bundle's remaining capacity.
    ///
    /// This signals a violated headroom precondition: the caller must check
    /// remaining capacity and flush before appending. Nothing is written.
    CapacityExceeded { needed: usize, available: usize },

    /// The message address is not a valid OSC address pattern.
    AddressInvalid { address: String },

    /// A string argument contains an embedded NUL byte.
    EmbeddedNul,
}

/// Errors that can occur while decoding a datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// The datagram does not start with a bundle marker.
    NotABundle,

    /// A length is not a multiple of four bytes.
    Misaligned { length: usize },

    /// The buffer ended before a complete element could be read.
    Truncated { needed: usize, available: usize },

    /// A padded string has no NUL terminator inside its element.
    StringUnterminated,

    /// A string is not valid UTF-8.
    InvalidUtf8,

    /// A message carries no type tag string.
    MissingTypeTags,

    /// A type tag is outside the supported set (`i`, `f`, `s`).
    UnknownTypeTag { tag: u8 },

    /// A message element has bytes left over after its last argument.
    TrailingBytes { remaining: usize },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific decode limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    DatagramBytes,
    Messages,
    Args,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { needed, available } => {
                write!(
                    f,
                    "message needs {needed} bytes, bundle has {available} free"
                )
            }
            Self::AddressInvalid { address } => {
                write!(f, "invalid OSC address {address:?}")
            }
            Self::EmbeddedNul => write!(f, "string argument contains an embedded NUL"),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotABundle => write!(f, "datagram does not start with #bundle"),
            Self::Misaligned { length } => {
                write!(f, "length {length} is not four-byte aligned")
            }
            Self::Truncated { needed, available } => {
                write!(f, "truncated: need {needed} bytes, have {available}")
            }
            Self::StringUnterminated => write!(f, "padded string has no NUL terminator"),
            Self::InvalidUtf8 => write!(f, "string is not valid UTF-8"),
            Self::MissingTypeTags => write!(f, "message has no type tag string"),
            Self::UnknownTypeTag { tag } => {
                write!(f, "unsupported type tag {:?}", char::from(*tag))
            }
            Self::TrailingBytes { remaining } => {
                write!(f, "{remaining} trailing bytes after last argument")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DatagramBytes => "datagram bytes",
            Self::Messages => "messages per bundle",
            Self::Args => "arguments per message",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for EncodeError {}

impl std::error::Error for DecodeError {}
