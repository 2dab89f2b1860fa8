//! Channel encoders and datagram transmitter for the tuiocast protocol.
//!
//! Two structurally identical channel encoders—one for oriented 2D objects,
//! one for orientation-free 2D cursors—accumulate per-frame tracking
//! messages into capacity-bounded bundles and hand each closed bundle to a
//! shared fire-and-forget UDP transmitter. [`TrackerServer`] composes both
//! channels behind one façade; the external tracking loop talks only to it.
//!
//! # Design Principles
//!
//! - **Atomic bundles** - A frame's messages travel as one datagram; partial
//!   bundles are never sent and capacity overflow is the caller's signal to
//!   flush, never an excuse to split.
//! - **Fire and forget** - Sends are best-effort and non-blocking; a failed
//!   send drops the frame rather than stalling the tracking loop.
//! - **Caller-paced** - Accumulation and transmission are decoupled; flushing
//!   is the only operation that touches the network.

mod channel;
mod error;
mod flip;
mod profile;
mod server;
mod transmit;

pub use channel::Channel;
pub use error::{ServerError, ServerResult};
pub use flip::AxisFlip;
pub use profile::{
    Cursor, CursorState, EntityProfile, Object, ObjectState, SessionId, CMD_ALIVE, CMD_FSEQ,
    CMD_SET, CURSOR_ADDRESS, OBJECT_ADDRESS,
};
pub use server::TrackerServer;
pub use transmit::{Transmit, UdpTransmitter};
