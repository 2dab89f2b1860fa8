//! OSC 1.0 bundle encoding for the tuiocast tracking protocol.
//!
//! This crate handles the binary wire format: bundle framing, message
//! serialization with typed arguments, and bounded decoding for tooling.
//! It does not know about tracking profiles—only the structure of bundles.
//!
//! # Design Principles
//!
//! - **Caller-controlled capacity** - The writer never splits or truncates a
//!   message; callers pre-check [`BundleWriter::remaining`] and flush when a
//!   message will not fit.
//! - **Bounded decoding** - All length fields are validated against limits
//!   before iteration.
//! - **No domain knowledge** - This crate handles framing, not tracking.

mod arg;
mod bundle;
mod decode;
mod error;
mod limits;

pub use arg::{OscArg, TAG_FLOAT, TAG_INT, TAG_STRING};
pub use bundle::{
    encoded_message_size, message_overhead, padded_str_size, BundleWriter, BUNDLE_HEADER_SIZE,
    MAX_DATAGRAM_BYTES, TIME_TAG_IMMEDIATE,
};
pub use decode::{decode_bundle, OscBundle, OscMessage};
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult, LimitKind};
pub use limits::DecodeLimits;
