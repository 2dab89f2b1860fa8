//! Bundle framing and the capacity-bounded bundle writer.

use crate::arg::OscArg;
use crate::error::{EncodeError, EncodeResult};

/// Maximum safe datagram payload for UDP over Ethernet.
///
/// 1500-byte MTU minus the IP (20) and UDP (8) headers. Larger payloads risk
/// fragmentation, which turns one lost fragment into a lost bundle.
pub const MAX_DATAGRAM_BYTES: usize = 1472;

/// The bundle-open marker: `#bundle` plus its NUL terminator.
const BUNDLE_MARKER: &[u8; 8] = b"#bundle\0";

/// OSC time tag meaning "process immediately".
pub const TIME_TAG_IMMEDIATE: u64 = 1;

/// Size of the bundle header (marker + time tag) in bytes.
pub const BUNDLE_HEADER_SIZE: usize = 16;

/// Rounds a string length up to its encoded size: NUL terminator plus
/// padding to a four-byte boundary.
#[must_use]
pub const fn padded_str_size(len: usize) -> usize {
    (len + 1 + 3) & !3
}

/// Fixed overhead of one bundle element: four-byte size prefix, padded
/// address, and padded type tag string (`,` + one tag per argument).
#[must_use]
pub const fn message_overhead(address_len: usize, arg_count: usize) -> usize {
    4 + padded_str_size(address_len) + padded_str_size(arg_count + 1)
}

/// Returns the exact encoded size of one message element in a bundle.
#[must_use]
pub fn encoded_message_size(address: &str, args: &[OscArg<'_>]) -> usize {
    let payload: usize = args.iter().map(OscArg::encoded_size).sum();
    message_overhead(address.len(), args.len()) + payload
}

/// An append-only bundle serializer with a fixed transport capacity.
///
/// The writer holds one open bundle at a time. Messages are appended whole
/// or not at all: [`append_message`](Self::append_message) fails without
/// writing anything when the encoded message exceeds
/// [`remaining`](Self::remaining). Callers own the flush boundary—there is
/// deliberately no auto-split, because a silently split bundle would break
/// the receiver's atomic-frame contract.
#[derive(Debug)]
pub struct BundleWriter {
    buf: Vec<u8>,
    capacity: usize,
}

impl BundleWriter {
    /// Creates a writer with the default Ethernet-safe capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_DATAGRAM_BYTES)
    }

    /// Creates a writer with a custom capacity in bytes.
    ///
    /// The capacity must cover at least the bundle header; smaller values
    /// leave no headroom and every append fails.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut writer = Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        };
        writer.begin();
        writer
    }

    /// Opens a fresh bundle: writes the `#bundle` marker and the immediate
    /// time tag, resetting the cursor past them.
    pub fn begin(&mut self) {
        self.buf.clear();
        self.buf.extend_from_slice(BUNDLE_MARKER);
        self.buf.extend_from_slice(&TIME_TAG_IMMEDIATE.to_be_bytes());
    }

    /// Returns the current bundle size in bytes, header included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no message has been appended since the last
    /// [`begin`](Self::begin).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.len() == BUNDLE_HEADER_SIZE
    }

    /// Returns the configured transport capacity in bytes.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the bytes still free in the open bundle.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.buf.len())
    }

    /// Appends one message element to the open bundle.
    ///
    /// The encoded size is computed up front; if it exceeds the remaining
    /// capacity the call fails with [`EncodeError::CapacityExceeded`] and
    /// the bundle is left untouched.
    pub fn append_message(&mut self, address: &str, args: &[OscArg<'_>]) -> EncodeResult<()> {
        if !address.starts_with('/') || address.contains('\0') {
            return Err(EncodeError::AddressInvalid {
                address: address.to_string(),
            });
        }
        for arg in args {
            if let OscArg::Str(s) = arg {
                if s.contains('\0') {
                    return Err(EncodeError::EmbeddedNul);
                }
            }
        }

        let needed = encoded_message_size(address, args);
        let available = self.remaining();
        if needed > available {
            return Err(EncodeError::CapacityExceeded { needed, available });
        }

        // Element size prefix counts the element body, not the prefix itself.
        let body_len = u32::try_from(needed - 4).map_err(|_| EncodeError::CapacityExceeded {
            needed,
            available,
        })?;
        self.buf.extend_from_slice(&body_len.to_be_bytes());
        write_padded_str(&mut self.buf, address);

        let mut tags = Vec::with_capacity(args.len() + 1);
        tags.push(b',');
        tags.extend(args.iter().map(OscArg::type_tag));
        write_padded_bytes(&mut self.buf, &tags);

        for arg in args {
            match arg {
                OscArg::Int(v) => self.buf.extend_from_slice(&v.to_be_bytes()),
                OscArg::Float(v) => self.buf.extend_from_slice(&v.to_be_bytes()),
                OscArg::Str(s) => write_padded_str(&mut self.buf, s),
            }
        }
        Ok(())
    }

    /// Closes the bundle and yields its bytes, immediately reopening an
    /// empty one.
    ///
    /// The datagram boundary is the bundle-close marker: element sizes are
    /// written up front, so no trailing bytes are needed.
    #[must_use]
    pub fn take(&mut self) -> Vec<u8> {
        let done = std::mem::take(&mut self.buf);
        self.begin();
        done
    }
}

impl Default for BundleWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_padded_str(buf: &mut Vec<u8>, s: &str) {
    write_padded_bytes(buf, s.as_bytes());
}

fn write_padded_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(bytes);
    let padding = padded_str_size(bytes.len()) - bytes.len();
    buf.extend(std::iter::repeat(0u8).take(padding));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_sizes() {
        assert_eq!(padded_str_size(0), 4);
        assert_eq!(padded_str_size(3), 4);
        assert_eq!(padded_str_size(4), 8);
        assert_eq!(padded_str_size(11), 12);
        assert_eq!(padded_str_size(12), 16);
    }

    #[test]
    fn fresh_writer_holds_only_the_header() {
        let writer = BundleWriter::new();
        assert_eq!(writer.len(), BUNDLE_HEADER_SIZE);
        assert!(writer.is_empty());
        assert_eq!(writer.remaining(), MAX_DATAGRAM_BYTES - BUNDLE_HEADER_SIZE);
    }

    #[test]
    fn header_bytes_are_marker_plus_immediate_tag() {
        let mut writer = BundleWriter::new();
        let bytes = writer.take();
        assert_eq!(&bytes[0..8], b"#bundle\0");
        assert_eq!(&bytes[8..16], &1u64.to_be_bytes());
    }

    #[test]
    fn append_writes_exactly_the_predicted_size() {
        let mut writer = BundleWriter::new();
        let args = [OscArg::Str("set"), OscArg::Int(1), OscArg::Float(0.5)];
        let predicted = encoded_message_size("/probe", &args);

        let before = writer.len();
        writer.append_message("/probe", &args).unwrap();
        assert_eq!(writer.len() - before, predicted);
    }

    #[test]
    fn element_size_prefix_excludes_itself() {
        let mut writer = BundleWriter::new();
        writer.append_message("/a", &[OscArg::Int(9)]).unwrap();
        let bytes = writer.take();

        let prefix = u32::from_be_bytes(bytes[16..20].try_into().unwrap()) as usize;
        assert_eq!(BUNDLE_HEADER_SIZE + 4 + prefix, bytes.len());
    }

    #[test]
    fn message_layout_matches_osc_padding() {
        let mut writer = BundleWriter::new();
        writer
            .append_message("/probe", &[OscArg::Str("fseq"), OscArg::Int(3)])
            .unwrap();
        let bytes = writer.take();
        let element = &bytes[BUNDLE_HEADER_SIZE + 4..];

        // "/probe" + NUL padded to 8
        assert_eq!(&element[0..8], b"/probe\0\0");
        // ",si" + NUL = 4, already aligned
        assert_eq!(&element[8..12], b",si\0");
        // "fseq" + NUL padded to 8
        assert_eq!(&element[12..20], b"fseq\0\0\0\0");
        assert_eq!(&element[20..24], &3i32.to_be_bytes());
    }

    #[test]
    fn rejected_append_leaves_bundle_untouched() {
        let mut writer = BundleWriter::with_capacity(BUNDLE_HEADER_SIZE + 8);
        let before = writer.len();
        let err = writer
            .append_message("/probe", &[OscArg::Int(1), OscArg::Int(2)])
            .unwrap_err();
        assert!(matches!(err, EncodeError::CapacityExceeded { .. }));
        assert_eq!(writer.len(), before);
        assert!(writer.is_empty());
    }

    #[test]
    fn capacity_error_reports_sizes() {
        let mut writer = BundleWriter::with_capacity(BUNDLE_HEADER_SIZE);
        let err = writer
            .append_message("/probe", &[OscArg::Int(1)])
            .unwrap_err();
        let EncodeError::CapacityExceeded { needed, available } = err else {
            panic!("expected CapacityExceeded, got {err:?}");
        };
        assert_eq!(needed, encoded_message_size("/probe", &[OscArg::Int(1)]));
        assert_eq!(available, 0);
    }

    #[test]
    fn take_reopens_an_empty_bundle() {
        let mut writer = BundleWriter::new();
        writer.append_message("/probe", &[OscArg::Int(1)]).unwrap();
        assert!(!writer.is_empty());

        let bytes = writer.take();
        assert!(bytes.len() > BUNDLE_HEADER_SIZE);
        assert!(writer.is_empty());
        assert_eq!(writer.len(), BUNDLE_HEADER_SIZE);
    }

    #[test]
    fn address_must_start_with_slash() {
        let mut writer = BundleWriter::new();
        let err = writer.append_message("probe", &[]).unwrap_err();
        assert!(matches!(err, EncodeError::AddressInvalid { .. }));
    }

    #[test]
    fn address_must_not_embed_nul() {
        let mut writer = BundleWriter::new();
        let err = writer.append_message("/pro\0be", &[]).unwrap_err();
        assert!(matches!(err, EncodeError::AddressInvalid { .. }));
    }

    #[test]
    fn string_arg_must_not_embed_nul() {
        let mut writer = BundleWriter::new();
        let err = writer
            .append_message("/probe", &[OscArg::Str("se\0t")])
            .unwrap_err();
        assert_eq!(err, EncodeError::EmbeddedNul);
    }

    #[test]
    fn overhead_matches_known_profiles() {
        // "set" + 2 ints + 8 floats on an 11-char address
        assert_eq!(
            message_overhead("/tuio/2Dobj".len(), 11) + 4 + 10 * 4,
            76
        );
        // "set" + 1 int + 5 floats on an 11-char address
        assert_eq!(message_overhead("/tuio/2Dcur".len(), 7) + 4 + 6 * 4, 56);
    }
}
