use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
}

/// Wall-clock timer for one exercise run.
///
/// Elapsed time only advances while running: pausing freezes it, and
/// resuming shifts the start anchor forward by the paused span so the
/// elapsed value stays continuous. All transitions are total; pausing
/// while paused or resuming while running is a no-op.
#[derive(Debug, Clone)]
pub struct SessionClock {
    status: SessionStatus,
    started_at: Option<SystemTime>,
    paused_at: Option<SystemTime>,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Idle,
            started_at: None,
            paused_at: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn start(&mut self) {
        self.start_at(SystemTime::now());
    }

    pub fn pause(&mut self) {
        self.pause_at(SystemTime::now());
    }

    pub fn resume(&mut self) {
        self.resume_at(SystemTime::now());
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms_at(SystemTime::now())
    }

    /// Begins a fresh run anchored at `now`, discarding any prior state.
    pub fn start_at(&mut self, now: SystemTime) {
        self.status = SessionStatus::Running;
        self.started_at = Some(now);
        self.paused_at = None;
    }

    pub fn pause_at(&mut self, now: SystemTime) {
        if self.status == SessionStatus::Running {
            self.status = SessionStatus::Paused;
            self.paused_at = Some(now);
        }
    }

    /// Shifts the start anchor forward by the paused span so a
    /// subsequent elapsed computation continues where it left off.
    pub fn resume_at(&mut self, now: SystemTime) {
        if self.status != SessionStatus::Paused {
            return;
        }
        if let (Some(started), Some(paused)) = (self.started_at, self.paused_at) {
            let paused_for = now.duration_since(paused).unwrap_or_default();
            self.started_at = Some(started + paused_for);
        }
        self.status = SessionStatus::Running;
        self.paused_at = None;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn elapsed_ms_at(&self, now: SystemTime) -> u64 {
        match (self.status, self.started_at, self.paused_at) {
            (SessionStatus::Running, Some(started), _) => duration_ms(started, now),
            (SessionStatus::Paused, Some(started), Some(paused)) => duration_ms(started, paused),
            _ => 0,
        }
    }
}

fn duration_ms(from: SystemTime, to: SystemTime) -> u64 {
    to.duration_since(from).unwrap_or_default().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn t(ms: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(ms)
    }

    #[test]
    fn test_idle_reports_zero() {
        let clock = SessionClock::new();
        assert_eq!(clock.status(), SessionStatus::Idle);
        assert_eq!(clock.elapsed_ms_at(t(5_000)), 0);
    }

    #[test]
    fn test_start_and_elapsed() {
        let mut clock = SessionClock::new();
        clock.start_at(t(1_000));
        assert_eq!(clock.status(), SessionStatus::Running);
        assert_eq!(clock.elapsed_ms_at(t(1_000)), 0);
        assert_eq!(clock.elapsed_ms_at(t(4_500)), 3_500);
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let mut clock = SessionClock::new();
        clock.start_at(t(0));
        clock.pause_at(t(2_000));
        assert_eq!(clock.status(), SessionStatus::Paused);
        assert_eq!(clock.elapsed_ms_at(t(2_000)), 2_000);
        assert_eq!(clock.elapsed_ms_at(t(60_000)), 2_000);
    }

    #[test]
    fn test_resume_keeps_elapsed_continuous() {
        let mut clock = SessionClock::new();
        clock.start_at(t(0));
        clock.pause_at(t(2_000));
        clock.resume_at(t(7_000));
        assert_eq!(clock.status(), SessionStatus::Running);
        // 5s of pause must not leak into elapsed time.
        assert_eq!(clock.elapsed_ms_at(t(7_000)), 2_000);
        assert_eq!(clock.elapsed_ms_at(t(10_000)), 5_000);
    }

    #[test]
    fn test_pause_twice_is_idempotent() {
        let mut clock = SessionClock::new();
        clock.start_at(t(0));
        clock.pause_at(t(2_000));
        clock.pause_at(t(9_000));
        assert_eq!(clock.elapsed_ms_at(t(9_000)), 2_000);
        clock.resume_at(t(10_000));
        assert_eq!(clock.elapsed_ms_at(t(10_000)), 2_000);
    }

    #[test]
    fn test_resume_without_pause_is_noop() {
        let mut clock = SessionClock::new();
        clock.start_at(t(0));
        clock.resume_at(t(3_000));
        assert_eq!(clock.status(), SessionStatus::Running);
        assert_eq!(clock.elapsed_ms_at(t(3_000)), 3_000);
    }

    #[test]
    fn test_pause_while_idle_is_noop() {
        let mut clock = SessionClock::new();
        clock.pause_at(t(1_000));
        assert_eq!(clock.status(), SessionStatus::Idle);
        assert_eq!(clock.elapsed_ms_at(t(2_000)), 0);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut clock = SessionClock::new();
        clock.start_at(t(0));
        clock.pause_at(t(1_000));
        clock.reset();
        assert_eq!(clock.status(), SessionStatus::Idle);
        assert_eq!(clock.elapsed_ms_at(t(9_000)), 0);
    }

    #[test]
    fn test_start_after_reset_starts_fresh() {
        let mut clock = SessionClock::new();
        clock.start_at(t(0));
        clock.reset();
        clock.start_at(t(10_000));
        assert_eq!(clock.elapsed_ms_at(t(11_000)), 1_000);
    }

    #[test]
    fn test_repeated_pause_resume_cycles() {
        let mut clock = SessionClock::new();
        clock.start_at(t(0));
        clock.pause_at(t(1_000));
        clock.resume_at(t(2_000));
        clock.pause_at(t(3_000));
        clock.resume_at(t(5_000));
        // Active spans: 0-1s and 2-3s (shifted), so 2s total so far.
        assert_eq!(clock.elapsed_ms_at(t(5_000)), 2_000);
        assert_eq!(clock.elapsed_ms_at(t(6_000)), 3_000);
    }
}
