//! Configurable limits for bounded decoding.

/// Decode-side limits.
///
/// Enforced while parsing received datagrams so that a malformed or hostile
/// buffer cannot drive unbounded allocation. The encoder is bounded by its
/// own transport capacity and never consults these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum datagram size in bytes.
    pub max_datagram_bytes: usize,

    /// Maximum number of messages in a bundle.
    pub max_messages: usize,

    /// Maximum number of arguments in a single message.
    pub max_args: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            // Generous: a well-formed sender stays under one MTU anyway
            max_datagram_bytes: 64 * 1024,

            // A full 1472-byte bundle holds at most ~25 set messages
            max_messages: 128,
            max_args: 512,
        }
    }
}

impl DecodeLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_datagram_bytes: 2048,
            max_messages: 8,
            max_args: 16,
        }
    }
}
