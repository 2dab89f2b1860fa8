//! Error types for the encoder and transmitter.

use std::fmt;
use std::io;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors surfaced to the tracking loop.
///
/// Nothing here is retried internally: the loop decides whether to skip a
/// frame, log, or abort based on the kind.
#[derive(Debug)]
#[non_exhaustive]
pub enum ServerError {
    /// The destination endpoint could not be resolved.
    ///
    /// Fatal at construction; a server without a destination cannot be used.
    Resolution { host: String, port: u16 },

    /// The transport rejected a datagram (oversized payload, socket error,
    /// or a non-blocking socket that would have blocked).
    ///
    /// The offending bundle is already cleared when this is reported; the
    /// next frame starts clean rather than retrying stale tracking data.
    Transmit(io::Error),

    /// An append was made without honoring the headroom precondition.
    ///
    /// A programming-contract violation on the caller's side; the message is
    /// not written and the open bundle is intact.
    Capacity(osc::EncodeError),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolution { host, port } => {
                write!(f, "cannot resolve destination {host}:{port}")
            }
            Self::Transmit(e) => write!(f, "datagram send failed: {e}"),
            Self::Capacity(e) => write!(f, "bundle capacity violated: {e}"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Resolution { .. } => None,
            Self::Transmit(e) => Some(e),
            Self::Capacity(e) => Some(e),
        }
    }
}

impl From<osc::EncodeError> for ServerError {
    fn from(err: osc::EncodeError) -> Self {
        Self::Capacity(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_resolution() {
        let err = ServerError::Resolution {
            host: "tracker.invalid".to_string(),
            port: 3333,
        };
        let msg = err.to_string();
        assert!(msg.contains("tracker.invalid"));
        assert!(msg.contains("3333"));
    }

    #[test]
    fn error_display_transmit() {
        let io_err = io::Error::new(io::ErrorKind::WouldBlock, "full buffer");
        let err = ServerError::Transmit(io_err);
        assert!(err.to_string().contains("send failed"));
    }

    #[test]
    fn error_from_encode_error() {
        let encode_err = osc::EncodeError::CapacityExceeded {
            needed: 76,
            available: 10,
        };
        let err: ServerError = encode_err.into();
        assert!(matches!(err, ServerError::Capacity(_)));
    }

    #[test]
    fn error_source_capacity() {
        let err = ServerError::Capacity(osc::EncodeError::EmbeddedNul);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_source_none_for_resolution() {
        let err = ServerError::Resolution {
            host: "h".to_string(),
            port: 1,
        };
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<ServerError>();
    }
}
