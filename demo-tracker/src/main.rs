use std::f32::consts::TAU;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use server::{AxisFlip, CursorState, ObjectState, ServerError, SessionId, TrackerServer};

#[derive(Parser)]
#[command(
    name = "demo-tracker",
    version,
    about = "Deterministic synthetic tracker"
)]
struct Cli {
    /// Destination host.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Destination port.
    #[arg(long, default_value_t = 3333)]
    port: u16,
    /// Number of frames to run; 0 runs forever.
    #[arg(long, default_value_t = 300)]
    frames: u32,
    /// Frames per second.
    #[arg(long, default_value_t = 60)]
    rate: u32,
    /// Number of simulated tracked objects.
    #[arg(long, default_value_t = 4)]
    players: u32,
    /// Number of simulated cursors.
    #[arg(long, default_value_t = 2)]
    cursors: u32,
    /// RNG seed for deterministic motion.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Mirror the x axis.
    #[arg(long)]
    invert_x: bool,
    /// Mirror the y axis.
    #[arg(long)]
    invert_y: bool,
    /// Reverse the rotation direction.
    #[arg(long)]
    invert_angle: bool,
}

/// Anything that can produce per-frame tracking snapshots.
///
/// The synthetic source below is the only implementation here; a camera
/// pipeline would provide its own.
trait FrameSource {
    fn next_frame(&mut self) -> Option<Frame>;
}

struct Frame {
    timestamp_us: u64,
    objects: Vec<ObjectState>,
    cursors: Vec<CursorState>,
}

/// Cap on simulated entities per channel. An empty default bundle holds an
/// alive list of at most 286 ids, and cursor churn can double the cursor
/// count, so the cap keeps every alive message inside one bundle.
const MAX_ENTITIES: u32 = 128;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let players = cli.players.min(MAX_ENTITIES);
    let cursors = cli.cursors.min(MAX_ENTITIES);
    if players < cli.players || cursors < cli.cursors {
        log::warn!("capping entity counts at {MAX_ENTITIES} per channel");
    }

    let mut server =
        TrackerServer::connect(&cli.host, cli.port).context("connect tracking server")?;
    let flip = AxisFlip::new(cli.invert_x, cli.invert_y, cli.invert_angle);
    server.set_object_flip(flip);
    server.set_cursor_flip(flip);

    let frame_interval_us = 1_000_000 / u64::from(cli.rate.max(1));
    let mut source =
        SyntheticSource::new(cli.seed, players, cursors, cli.frames, frame_interval_us);

    let started = Instant::now();
    let mut fseq: i32 = 0;
    while let Some(frame) = source.next_frame() {
        fseq = fseq.wrapping_add(1);

        if let Err(err) = send_frame(&mut server, fseq, &frame) {
            match err {
                // Dropped frames are expected under fire-and-forget; the
                // next frame carries fresh state anyway.
                ServerError::Transmit(_) => log::warn!("frame {fseq} dropped: {err}"),
                other => return Err(other).context("encode frame"),
            }
        }

        // Frame timestamps pace the loop against wall-clock start.
        let target = Duration::from_micros(frame.timestamp_us);
        if let Some(remaining) = target.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
    }

    server.shutdown();
    Ok(())
}

fn send_frame(server: &mut TrackerServer, fseq: i32, frame: &Frame) -> Result<(), ServerError> {
    server.add_object_sequence(fseq)?;
    for state in &frame.objects {
        if !server.object_has_headroom() {
            server.flush_objects()?;
            server.add_object_sequence(fseq)?;
        }
        server.add_object_set(state)?;
    }
    let alive: Vec<SessionId> = frame.objects.iter().map(|s| s.session).collect();
    if !server.object_alive_fits(alive.len()) {
        server.flush_objects()?;
    }
    server.add_object_alive(&alive)?;
    server.flush_objects()?;

    server.add_cursor_sequence(fseq)?;
    for state in &frame.cursors {
        if !server.cursor_has_headroom() {
            server.flush_cursors()?;
            server.add_cursor_sequence(fseq)?;
        }
        server.add_cursor_set(state)?;
    }
    let alive: Vec<SessionId> = frame.cursors.iter().map(|s| s.session).collect();
    if !server.cursor_alive_fits(alive.len()) {
        server.flush_cursors()?;
    }
    server.add_cursor_alive(&alive)?;
    server.flush_cursors()
}

struct SyntheticSource {
    rng: Rng,
    objects: Vec<ObjectState>,
    cursors: Vec<CursorState>,
    max_cursors: usize,
    next_session: i32,
    frame: u32,
    frames: u32,
    interval_us: u64,
}

impl SyntheticSource {
    fn new(seed: u64, players: u32, cursors: u32, frames: u32, interval_us: u64) -> Self {
        let mut rng = Rng::new(seed);
        let mut next_session = 0;
        let objects = (0..players)
            .map(|idx| {
                let session = SessionId::new(next_session);
                next_session += 1;
                ObjectState {
                    session,
                    class_id: i32::try_from(idx % 8).unwrap_or(0),
                    x: rng.unit(),
                    y: rng.unit(),
                    angle: rng.unit() * TAU,
                    vel_x: 0.0,
                    vel_y: 0.0,
                    angular_vel: 0.0,
                    motion_accel: 0.0,
                    rotation_accel: 0.0,
                }
            })
            .collect();
        let mut source = Self {
            rng,
            objects,
            cursors: Vec::new(),
            max_cursors: cursors as usize,
            next_session,
            frame: 0,
            frames,
            interval_us,
        };
        for _ in 0..cursors {
            source.spawn_cursor();
        }
        source
    }

    fn spawn_cursor(&mut self) {
        let session = SessionId::new(self.next_session);
        self.next_session += 1;
        let state = CursorState {
            session,
            x: self.rng.unit(),
            y: self.rng.unit(),
            vel_x: 0.0,
            vel_y: 0.0,
            motion_accel: 0.0,
        };
        self.cursors.push(state);
        log::debug!("cursor {} touched down", session.raw());
    }

    /// Touch-down/lift-off churn: cursors come and go while objects stay on
    /// the surface, so the alive list actually changes over a run.
    fn churn_cursors(&mut self) {
        match self.rng.next_u32() % 180 {
            0 if !self.cursors.is_empty() => {
                let gone = self.cursors.remove(0);
                log::debug!("cursor {} lifted", gone.session.raw());
            }
            1 if self.cursors.len() < self.max_cursors * 2 => self.spawn_cursor(),
            _ => {}
        }
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Option<Frame> {
        if self.frames > 0 && self.frame >= self.frames {
            return None;
        }
        self.frame += 1;
        self.churn_cursors();

        for state in &mut self.objects {
            let (x, vx) = drift(state.x, state.vel_x, &mut self.rng);
            let (y, vy) = drift(state.y, state.vel_y, &mut self.rng);
            state.motion_accel = (vx - state.vel_x).hypot(vy - state.vel_y);
            state.x = x;
            state.y = y;
            state.vel_x = vx;
            state.vel_y = vy;
            let spin = (self.rng.unit() - 0.5) * 0.02;
            state.rotation_accel = spin - state.angular_vel;
            state.angular_vel = spin;
            state.angle = (state.angle + spin).rem_euclid(TAU);
        }
        for state in &mut self.cursors {
            let (x, vx) = drift(state.x, state.vel_x, &mut self.rng);
            let (y, vy) = drift(state.y, state.vel_y, &mut self.rng);
            state.motion_accel = (vx - state.vel_x).hypot(vy - state.vel_y);
            state.x = x;
            state.y = y;
            state.vel_x = vx;
            state.vel_y = vy;
        }

        Some(Frame {
            timestamp_us: u64::from(self.frame) * self.interval_us,
            objects: self.objects.clone(),
            cursors: self.cursors.clone(),
        })
    }
}

/// One axis of bounded random-walk motion; bounces at the surface edges.
fn drift(pos: f32, vel: f32, rng: &mut Rng) -> (f32, f32) {
    let mut vel = vel + (rng.unit() - 0.5) * 0.002;
    vel = vel.clamp(-0.01, 0.01);
    let mut pos = pos + vel;
    if !(0.0..=1.0).contains(&pos) {
        vel = -vel;
        pos = pos.clamp(0.0, 1.0);
    }
    (pos, vel)
}

struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}
