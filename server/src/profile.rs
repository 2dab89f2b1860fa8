//! Entity profiles: the closed set of message shapes a channel can carry.

use osc::{BundleWriter, EncodeResult, OscArg};

use crate::flip::AxisFlip;

/// Address of the oriented-object profile.
pub const OBJECT_ADDRESS: &str = "/tuio/2Dobj";

/// Address of the cursor profile.
pub const CURSOR_ADDRESS: &str = "/tuio/2Dcur";

/// Sub-command carried as the first argument of a state-set message.
pub const CMD_SET: &str = "set";

/// Sub-command carried as the first argument of an alive-list message.
pub const CMD_ALIVE: &str = "alive";

/// Sub-command carried as the first argument of a sequence message.
pub const CMD_FSEQ: &str = "fseq";

/// A stable per-entity identifier.
///
/// Assigned by the external tracking layer and never reused while the
/// entity is alive; the encoder only serializes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionId(i32);

impl SessionId {
    /// Creates a new session ID.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw session ID value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl From<i32> for SessionId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<SessionId> for i32 {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// Full pose and motion snapshot of one tracked object.
///
/// Positions are normalized to `[0, 1]`, the angle to `[0, 2π)`; velocities
/// and accelerations are unbounded signed values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectState {
    pub session: SessionId,
    /// Fiducial/marker type; carries no uniqueness constraint.
    pub class_id: i32,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub angular_vel: f32,
    pub motion_accel: f32,
    pub rotation_accel: f32,
}

/// Pose and motion snapshot of one tracked cursor (no orientation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorState {
    pub session: SessionId,
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub motion_accel: f32,
}

mod sealed {
    pub trait Sealed {}
}

/// One of the two entity shapes a channel encodes.
///
/// The set is closed—[`Object`] and [`Cursor`] are the only implementors.
/// A profile ties together its wire address, the exact encoded size of its
/// state-set message (the headroom unit), and the field layout.
pub trait EntityProfile: sealed::Sealed {
    /// Message address shared by every message on this channel.
    const ADDRESS: &'static str;

    /// Exact encoded size of one state-set message in bytes.
    const SET_MESSAGE_SIZE: usize;

    /// The per-entity snapshot this profile serializes.
    type State;

    /// Appends one state-set message, applying the channel's axis flags.
    fn append_set(
        writer: &mut BundleWriter,
        state: &Self::State,
        flip: AxisFlip,
    ) -> EncodeResult<()>;
}

/// The oriented 2D object profile.
#[derive(Debug)]
pub enum Object {}

/// The 2D cursor profile.
#[derive(Debug)]
pub enum Cursor {}

impl sealed::Sealed for Object {}
impl sealed::Sealed for Cursor {}

impl EntityProfile for Object {
    const ADDRESS: &'static str = OBJECT_ADDRESS;

    // "set" + session + class + x y a X Y A m r
    const SET_MESSAGE_SIZE: usize = osc::message_overhead(OBJECT_ADDRESS.len(), 11)
        + osc::padded_str_size(CMD_SET.len())
        + 10 * 4;

    type State = ObjectState;

    fn append_set(
        writer: &mut BundleWriter,
        state: &Self::State,
        flip: AxisFlip,
    ) -> EncodeResult<()> {
        writer.append_message(
            Self::ADDRESS,
            &[
                OscArg::Str(CMD_SET),
                OscArg::Int(state.session.raw()),
                OscArg::Int(state.class_id),
                OscArg::Float(flip.apply_x(state.x)),
                OscArg::Float(flip.apply_y(state.y)),
                OscArg::Float(flip.apply_angle(state.angle)),
                OscArg::Float(state.vel_x),
                OscArg::Float(state.vel_y),
                OscArg::Float(state.angular_vel),
                OscArg::Float(state.motion_accel),
                OscArg::Float(state.rotation_accel),
            ],
        )
    }
}

impl EntityProfile for Cursor {
    const ADDRESS: &'static str = CURSOR_ADDRESS;

    // "set" + session + x y X Y m
    const SET_MESSAGE_SIZE: usize = osc::message_overhead(CURSOR_ADDRESS.len(), 7)
        + osc::padded_str_size(CMD_SET.len())
        + 6 * 4;

    type State = CursorState;

    fn append_set(
        writer: &mut BundleWriter,
        state: &Self::State,
        flip: AxisFlip,
    ) -> EncodeResult<()> {
        writer.append_message(
            Self::ADDRESS,
            &[
                OscArg::Str(CMD_SET),
                OscArg::Int(state.session.raw()),
                OscArg::Float(flip.apply_x(state.x)),
                OscArg::Float(flip.apply_y(state.y)),
                OscArg::Float(state.vel_x),
                OscArg::Float(state.vel_y),
                OscArg::Float(state.motion_accel),
            ],
        )
    }
}
