//! Typed OSC message arguments.

/// Type tag for a 32-bit big-endian signed integer.
pub const TAG_INT: u8 = b'i';

/// Type tag for a 32-bit big-endian IEEE 754 float.
pub const TAG_FLOAT: u8 = b'f';

/// Type tag for a NUL-terminated, four-byte padded string.
pub const TAG_STRING: u8 = b's';

/// One typed OSC argument.
///
/// The supported set is closed: the tracking profiles only ever carry
/// integers, floats, and short command strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OscArg<'a> {
    /// 32-bit signed integer (`i`).
    Int(i32),
    /// 32-bit float (`f`).
    Float(f32),
    /// Padded string (`s`).
    Str(&'a str),
}

impl OscArg<'_> {
    /// Returns the OSC type tag byte for this argument.
    #[must_use]
    pub const fn type_tag(&self) -> u8 {
        match self {
            Self::Int(_) => TAG_INT,
            Self::Float(_) => TAG_FLOAT,
            Self::Str(_) => TAG_STRING,
        }
    }

    /// Returns the encoded payload size of this argument in bytes.
    ///
    /// Strings include their NUL terminator and padding to a four-byte
    /// boundary; numeric arguments are always four bytes.
    #[must_use]
    pub const fn encoded_size(&self) -> usize {
        match self {
            Self::Int(_) | Self::Float(_) => 4,
            Self::Str(s) => crate::padded_str_size(s.len()),
        }
    }
}
