//! The generic per-profile channel encoder.

use std::marker::PhantomData;

use osc::{BundleWriter, OscArg};

use crate::error::ServerResult;
use crate::flip::AxisFlip;
use crate::profile::{EntityProfile, SessionId, CMD_ALIVE, CMD_FSEQ};
use crate::transmit::Transmit;

/// One channel encoder, parameterized by entity profile.
///
/// A channel owns one open bundle at all times: a fresh bundle is created at
/// construction and after every flush, so accumulation never has gaps. The
/// intended per-frame call order is `add_sequence`, then `add_state_set` for
/// each updated entity (flushing when [`has_headroom`](Self::has_headroom)
/// says the next one will not fit), then `add_alive`, then `flush`.
///
/// Single producer: interleaved appends from multiple threads without
/// external exclusion produce an undefined bundle, since receivers interpret
/// bundles positionally. The two channel instances share nothing, so they
/// may live on different threads.
///
/// Dropping a channel discards any unflushed partial bundle without sending
/// it; trailing partial data is never emitted.
#[derive(Debug)]
pub struct Channel<P: EntityProfile> {
    writer: BundleWriter,
    pending: usize,
    flip: AxisFlip,
    _profile: PhantomData<P>,
}

impl<P: EntityProfile> Channel<P> {
    /// Creates a channel with the default Ethernet-safe bundle capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(osc::MAX_DATAGRAM_BYTES)
    }

    /// Creates a channel with a custom bundle capacity in bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            writer: BundleWriter::with_capacity(capacity),
            pending: 0,
            flip: AxisFlip::none(),
            _profile: PhantomData,
        }
    }

    /// Returns the channel's axis inversion flags.
    #[must_use]
    pub const fn flip(&self) -> AxisFlip {
        self.flip
    }

    /// Sets the channel's axis inversion flags.
    pub fn set_flip(&mut self, flip: AxisFlip) {
        self.flip = flip;
    }

    /// Returns the number of state-bearing messages awaiting a flush.
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.pending
    }

    /// Returns the bytes still free in the open bundle.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.writer.remaining()
    }

    /// Returns `true` if one more state-set message fits in the open bundle.
    ///
    /// Callers must check this before [`add_state_set`](Self::add_state_set)
    /// and flush first when it is `false`. The check is deliberately not
    /// folded into the append: auto-flushing would let the encoder pick a
    /// frame's atomicity boundary, which belongs to the caller.
    #[must_use]
    pub fn has_headroom(&self) -> bool {
        self.writer.remaining() >= P::SET_MESSAGE_SIZE
    }

    /// Returns `true` if an alive list carrying `count` ids fits in the
    /// open bundle.
    ///
    /// Unlike set messages the alive message grows with the id count, so
    /// [`has_headroom`](Self::has_headroom) is no proxy for it.
    #[must_use]
    pub fn alive_fits(&self, count: usize) -> bool {
        let size = osc::message_overhead(P::ADDRESS.len(), count + 1)
            + osc::padded_str_size(CMD_ALIVE.len())
            + 4 * count;
        self.writer.remaining() >= size
    }

    /// Appends the frame sequence message.
    ///
    /// The value is opaque payload—emitted verbatim, never validated. A
    /// sequence message alone does not make a bundle worth sending, so it
    /// does not count toward [`pending`](Self::pending).
    pub fn add_sequence(&mut self, fseq: i32) -> ServerResult<()> {
        self.writer
            .append_message(P::ADDRESS, &[OscArg::Str(CMD_FSEQ), OscArg::Int(fseq)])?;
        Ok(())
    }

    /// Appends one entity's state-set message, applying the axis flags.
    pub fn add_state_set(&mut self, state: &P::State) -> ServerResult<()> {
        P::append_set(&mut self.writer, state, self.flip)?;
        self.pending += 1;
        Ok(())
    }

    /// Appends the alive-list message: every session id currently tracked
    /// on this channel, in caller-supplied order.
    ///
    /// No dedup or sort is performed; the caller guarantees uniqueness.
    /// Entities absent from the list are implicitly removed by the receiver.
    pub fn add_alive(&mut self, ids: &[SessionId]) -> ServerResult<()> {
        let mut args = Vec::with_capacity(ids.len() + 1);
        args.push(OscArg::Str(CMD_ALIVE));
        args.extend(ids.iter().map(|id| OscArg::Int(id.raw())));
        self.writer.append_message(P::ADDRESS, &args)?;
        self.pending += 1;
        Ok(())
    }

    /// Closes the bundle, transmits it, and reopens an empty one.
    ///
    /// When no state-bearing message is pending nothing is sent and any
    /// sequence-only content is discarded, so idle frames neither emit
    /// heartbeat bundles nor pile stale fseq messages into the next real
    /// one. The bundle is cleared before the send result is inspected: on
    /// failure the next frame starts clean instead of retrying stale
    /// tracking data.
    pub fn flush(&mut self, transmitter: &impl Transmit) -> ServerResult<()> {
        if self.pending == 0 {
            if !self.writer.is_empty() {
                self.writer.begin();
            }
            return Ok(());
        }
        let bundle = self.writer.take();
        self.pending = 0;
        transmitter.send(&bundle)
    }
}

impl<P: EntityProfile> Default for Channel<P> {
    fn default() -> Self {
        Self::new()
    }
}
