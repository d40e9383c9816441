use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, SystemTime};

/// Largest delta a single frame may report. Keeps animation state from
/// jumping after the host suspends the loop (tab backgrounded, terminal
/// stopped).
pub const MAX_FRAME_DELTA_MS: u64 = 64;

/// One frame's worth of timing, handed to animation consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Time since the previous tick, clamped to [0, MAX_FRAME_DELTA_MS].
    pub delta_ms: u64,
    /// Time since the loop was enabled, unclamped.
    pub elapsed_ms: u64,
}

/// Turns a stream of tick instants into per-frame delta/elapsed pairs.
///
/// Disabling resets all anchors to zero, so an enable → disable →
/// enable cycle starts from a clean slate and never replays a stale
/// previous-tick anchor.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    started_at: Option<SystemTime>,
    last_tick: Option<SystemTime>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn enable(&mut self) {
        self.enable_at(SystemTime::now());
    }

    pub fn enable_at(&mut self, now: SystemTime) {
        self.started_at = Some(now);
        self.last_tick = Some(now);
    }

    pub fn disable(&mut self) {
        self.started_at = None;
        self.last_tick = None;
    }

    pub fn tick(&mut self) -> Option<FrameTick> {
        self.tick_at(SystemTime::now())
    }

    /// Advances the clock to `now`. Returns None while disabled, so a
    /// tick that raced a disable produces no frame.
    pub fn tick_at(&mut self, now: SystemTime) -> Option<FrameTick> {
        let started = self.started_at?;
        let last = self.last_tick.unwrap_or(started);

        let raw_delta = now.duration_since(last).unwrap_or_default().as_millis() as u64;
        let tick = FrameTick {
            delta_ms: raw_delta.min(MAX_FRAME_DELTA_MS),
            elapsed_ms: now.duration_since(started).unwrap_or_default().as_millis() as u64,
        };
        self.last_tick = Some(now);
        Some(tick)
    }
}

/// Source of tick instants driving the frame loop. Production code uses
/// an interval thread; tests substitute a scripted source.
pub trait TickSource: Send + 'static {
    /// Block for up to `timeout` waiting for the next tick instant.
    fn recv_timeout(&self, timeout: Duration) -> Result<SystemTime, RecvTimeoutError>;
}

/// Production tick source: a background thread emitting an instant per
/// interval. Scheduling stops as soon as the source is dropped (the
/// send fails and the thread exits).
pub struct IntervalTickSource {
    rx: Receiver<SystemTime>,
}

impl IntervalTickSource {
    pub fn new(interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            std::thread::sleep(interval);
            if tx.send(SystemTime::now()).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl TickSource for IntervalTickSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SystemTime, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Scripted tick source for unit tests.
pub struct TestTickSource {
    rx: Receiver<SystemTime>,
}

impl TestTickSource {
    pub fn new(rx: Receiver<SystemTime>) -> Self {
        Self { rx }
    }
}

impl TickSource for TestTickSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SystemTime, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}
