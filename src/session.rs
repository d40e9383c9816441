use crate::clock::{SessionClock, SessionStatus};
use crate::keystroke::{classify, is_match, KeyAction};
use crate::metrics::{self, Metrics};
use crate::mistakes::MistakeTracker;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Fixed score weight so runs rank fairly across tiers.
    pub fn weight(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Normal => 1.5,
            Difficulty::Hard => 2.0,
        }
    }
}

/// Per-position result of a typed character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// What a key event did to the exercise, for the presentation layer to
/// react to (e.g. spawn a burst on Correct).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Correct,
    Incorrect,
    Retreat,
    Submitted,
    Ignored,
}

/// Read-only view of the run handed to the presentation layer each
/// update; derived values are recomputed here, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub status: SessionStatus,
    pub elapsed_ms: u64,
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub multiplier: u32,
    pub wpm: f64,
    pub accuracy: f64,
    pub progress: f64,
    pub mistakes: u64,
}

/// Completed-run payload folded into the persistent aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub game_id: String,
    pub difficulty: Difficulty,
    pub score: u64,
    pub wpm: f64,
    pub accuracy: f64,
    pub max_combo: u32,
    pub mistakes: u64,
}

/// One active exercise run: a prompt, a cursor, and the counters that
/// feed the metric functions. Owned exclusively by the active exercise
/// view; never shared across concurrent exercises.
#[derive(Debug, Clone)]
pub struct Exercise {
    pub game_id: String,
    pub difficulty: Difficulty,
    prompt_chars: Vec<char>,
    outcomes: Vec<Outcome>,
    cursor: usize,
    clock: SessionClock,
    metrics: Metrics,
    mistake_tracker: MistakeTracker,
    time_limit_ms: Option<u64>,
    space_submits: bool,
    submitted: bool,
}

impl Exercise {
    pub fn new(
        game_id: impl Into<String>,
        difficulty: Difficulty,
        prompt: &str,
        time_limit_ms: Option<u64>,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            difficulty,
            prompt_chars: prompt.chars().collect(),
            outcomes: Vec::new(),
            cursor: 0,
            clock: SessionClock::new(),
            metrics: Metrics::new(),
            mistake_tracker: MistakeTracker::new(),
            time_limit_ms,
            space_submits: false,
            submitted: false,
        }
    }

    /// Enables Space-as-submit (used by word-at-a-time game modes).
    pub fn with_space_submission(mut self) -> Self {
        self.space_submits = true;
        self
    }

    pub fn prompt_len(&self) -> usize {
        self.prompt_chars.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn status(&self) -> SessionStatus {
        self.clock.status()
    }

    pub fn expected_char(&self, idx: usize) -> Option<char> {
        self.prompt_chars.get(idx).copied()
    }

    pub fn outcome_at(&self, idx: usize) -> Option<Outcome> {
        self.outcomes.get(idx).copied()
    }

    pub fn mistake_tracker(&self) -> &MistakeTracker {
        &self.mistake_tracker
    }

    pub fn start(&mut self) {
        self.start_at(SystemTime::now());
    }

    pub fn start_at(&mut self, now: SystemTime) {
        self.cursor = 0;
        self.outcomes.clear();
        self.metrics.reset();
        self.mistake_tracker.clear();
        self.submitted = false;
        self.clock.start_at(now);
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.outcomes.clear();
        self.metrics.reset();
        self.mistake_tracker.clear();
        self.submitted = false;
        self.clock.reset();
    }

    pub fn on_key(&mut self, label: &str, target_editable: bool) -> KeyOutcome {
        self.on_key_at(label, target_editable, SystemTime::now())
    }

    /// Routes one raw key event through classification and into the
    /// counters. Classification, mistake accounting, and metric updates
    /// for a given key happen atomically within this call.
    pub fn on_key_at(&mut self, label: &str, target_editable: bool, now: SystemTime) -> KeyOutcome {
        if self.is_complete_at(now) {
            return KeyOutcome::Ignored;
        }

        let action = classify(label, target_editable, self.space_submits);
        if action == KeyAction::Ignored {
            return KeyOutcome::Ignored;
        }

        // The first real keystroke arms the clock.
        if self.clock.status() == SessionStatus::Idle {
            self.clock.start_at(now);
        }
        if self.clock.status() == SessionStatus::Paused {
            return KeyOutcome::Ignored;
        }

        match action {
            KeyAction::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.outcomes.pop();
                    KeyOutcome::Retreat
                } else {
                    KeyOutcome::Ignored
                }
            }
            KeyAction::Submit => {
                // Enter (or Space in submit mode) matching the expected
                // character is ordinary input; otherwise it ends the run.
                match self.expected_char(self.cursor) {
                    Some(expected) if is_match(expected, label) => self.apply_match(),
                    _ => {
                        self.submitted = true;
                        KeyOutcome::Submitted
                    }
                }
            }
            KeyAction::Char(_) => match self.expected_char(self.cursor) {
                Some(expected) if is_match(expected, label) => self.apply_match(),
                Some(_) => {
                    self.metrics.record_mistake();
                    self.mistake_tracker.record(label);
                    self.outcomes.push(Outcome::Incorrect);
                    self.cursor += 1;
                    KeyOutcome::Incorrect
                }
                // Past the end of the prompt; nothing to type against.
                None => KeyOutcome::Ignored,
            },
            KeyAction::Ignored => KeyOutcome::Ignored,
        }
    }

    fn apply_match(&mut self) -> KeyOutcome {
        self.metrics.record_correct();
        self.outcomes.push(Outcome::Correct);
        self.cursor += 1;
        KeyOutcome::Correct
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    pub fn elapsed_ms_at(&self, now: SystemTime) -> u64 {
        self.clock.elapsed_ms_at(now)
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete_at(SystemTime::now())
    }

    pub fn is_complete_at(&self, now: SystemTime) -> bool {
        if self.submitted {
            return true;
        }
        if !self.prompt_chars.is_empty() && self.cursor >= self.prompt_chars.len() {
            return true;
        }
        match self.time_limit_ms {
            Some(limit) => {
                self.clock.status() != SessionStatus::Idle
                    && self.clock.elapsed_ms_at(now) >= limit
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot_at(SystemTime::now())
    }

    pub fn snapshot_at(&self, now: SystemTime) -> MetricsSnapshot {
        let elapsed_ms = self.clock.elapsed_ms_at(now);
        MetricsSnapshot {
            status: self.clock.status(),
            elapsed_ms,
            score: self.metrics.score,
            combo: self.metrics.combo,
            max_combo: self.metrics.max_combo,
            multiplier: self.metrics.multiplier(),
            wpm: self.metrics.wpm(elapsed_ms),
            accuracy: self.metrics.accuracy(),
            progress: metrics::progress(self.cursor, self.prompt_chars.len()),
            mistakes: self.metrics.mistakes,
        }
    }

    /// Freezes the run and produces the payload merged into persistent
    /// aggregates.
    pub fn finish(&mut self) -> RunSummary {
        self.finish_at(SystemTime::now())
    }

    pub fn finish_at(&mut self, now: SystemTime) -> RunSummary {
        let elapsed_ms = self.clock.elapsed_ms_at(now);
        self.clock.pause_at(now);
        RunSummary {
            game_id: self.game_id.clone(),
            difficulty: self.difficulty,
            score: self.metrics.score,
            wpm: self.metrics.wpm(elapsed_ms),
            accuracy: self.metrics.accuracy(),
            max_combo: self.metrics.max_combo,
            mistakes: self.metrics.mistakes,
        }
    }
}
