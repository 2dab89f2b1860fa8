//! The tracker-facing façade over both channels and the transmitter.

use crate::channel::Channel;
use crate::error::ServerResult;
use crate::flip::AxisFlip;
use crate::profile::{Cursor, CursorState, Object, ObjectState, SessionId};
use crate::transmit::UdpTransmitter;

/// Both channel encoders plus one shared UDP transmitter.
///
/// The tracking loop drives this per frame and per channel: sequence, then
/// state sets (checking headroom and flushing between), then the alive list,
/// then a final flush. The object and cursor sides are fully independent;
/// they only share the destination socket.
///
/// After [`shutdown`](Self::shutdown) the socket is released and every
/// operation becomes an `Ok` no-op, so a tracking loop that keeps running
/// after disconnect needs no special casing.
#[derive(Debug)]
pub struct TrackerServer {
    transmitter: Option<UdpTransmitter>,
    objects: Channel<Object>,
    cursors: Channel<Cursor>,
}

impl TrackerServer {
    /// Resolves the destination and opens the shared UDP socket.
    pub fn connect(host: &str, port: u16) -> ServerResult<Self> {
        let transmitter = UdpTransmitter::open(host, port)?;
        log::info!("tracking server sending to {}", transmitter.destination());
        Ok(Self {
            transmitter: Some(transmitter),
            objects: Channel::new(),
            cursors: Channel::new(),
        })
    }

    /// Returns `true` while the transmitter is open.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.transmitter.is_some()
    }

    /// Releases the socket; every later operation is an `Ok` no-op.
    pub fn shutdown(&mut self) {
        if self.transmitter.take().is_some() {
            log::info!("tracking server shut down");
        }
    }

    /// Sets axis inversion for the object channel.
    pub fn set_object_flip(&mut self, flip: AxisFlip) {
        self.objects.set_flip(flip);
    }

    /// Sets axis inversion for the cursor channel.
    pub fn set_cursor_flip(&mut self, flip: AxisFlip) {
        self.cursors.set_flip(flip);
    }

    /// Returns `true` if one more object set fits in the open bundle.
    ///
    /// Always `true` when inactive, so the no-op path never reports a full
    /// bundle it will not actually fill.
    #[must_use]
    pub fn object_has_headroom(&self) -> bool {
        !self.is_active() || self.objects.has_headroom()
    }

    /// Returns `true` if an alive list with `count` ids fits in the open
    /// object bundle.
    #[must_use]
    pub fn object_alive_fits(&self, count: usize) -> bool {
        !self.is_active() || self.objects.alive_fits(count)
    }

    /// Appends the object channel's frame sequence message.
    pub fn add_object_sequence(&mut self, fseq: i32) -> ServerResult<()> {
        if self.is_active() {
            self.objects.add_sequence(fseq)?;
        }
        Ok(())
    }

    /// Appends one object's state-set message.
    pub fn add_object_set(&mut self, state: &ObjectState) -> ServerResult<()> {
        if self.is_active() {
            self.objects.add_state_set(state)?;
        }
        Ok(())
    }

    /// Appends the object channel's alive list, in caller order.
    pub fn add_object_alive(&mut self, ids: &[SessionId]) -> ServerResult<()> {
        if self.is_active() {
            self.objects.add_alive(ids)?;
        }
        Ok(())
    }

    /// Transmits the object channel's bundle if it carries pending state.
    pub fn flush_objects(&mut self) -> ServerResult<()> {
        match &self.transmitter {
            Some(tx) => self.objects.flush(tx),
            None => Ok(()),
        }
    }

    /// Returns `true` if one more cursor set fits in the open bundle.
    #[must_use]
    pub fn cursor_has_headroom(&self) -> bool {
        !self.is_active() || self.cursors.has_headroom()
    }

    /// Returns `true` if an alive list with `count` ids fits in the open
    /// cursor bundle.
    #[must_use]
    pub fn cursor_alive_fits(&self, count: usize) -> bool {
        !self.is_active() || self.cursors.alive_fits(count)
    }

    /// Appends the cursor channel's frame sequence message.
    pub fn add_cursor_sequence(&mut self, fseq: i32) -> ServerResult<()> {
        if self.is_active() {
            self.cursors.add_sequence(fseq)?;
        }
        Ok(())
    }

    /// Appends one cursor's state-set message.
    pub fn add_cursor_set(&mut self, state: &CursorState) -> ServerResult<()> {
        if self.is_active() {
            self.cursors.add_state_set(state)?;
        }
        Ok(())
    }

    /// Appends the cursor channel's alive list, in caller order.
    pub fn add_cursor_alive(&mut self, ids: &[SessionId]) -> ServerResult<()> {
        if self.is_active() {
            self.cursors.add_alive(ids)?;
        }
        Ok(())
    }

    /// Transmits the cursor channel's bundle if it carries pending state.
    pub fn flush_cursors(&mut self) -> ServerResult<()> {
        match &self.transmitter {
            Some(tx) => self.cursors.flush(tx),
            None => Ok(()),
        }
    }
}
