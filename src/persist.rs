use crate::metrics::weighted_score;
use crate::session::{Difficulty, RunSummary};
use chrono::{DateTime, Local};
use directories::ProjectDirs;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum leaderboard size; overflow drops the lowest-ranked
/// entries first.
pub const MAX_LEADERBOARD_ENTRIES: usize = 25;

/// Lifetime aggregates folded from every completed run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatsSummary {
    pub games_played: u64,
    pub total_score: u64,
    pub best_wpm: f64,
    pub best_accuracy: f64,
    pub best_combo: u32,
    pub total_mistakes: u64,
}

/// Best recorded run for one game at one difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub game_id: String,
    pub difficulty: Difficulty,
    pub score: u64,
    pub wpm: f64,
    pub accuracy: f64,
    pub max_combo: u32,
    pub recorded_at: DateTime<Local>,
}

impl LeaderboardEntry {
    pub fn weighted(&self) -> u64 {
        weighted_score(self.score, self.wpm, self.accuracy, self.difficulty.weight())
    }
}

/// The single durable record: aggregates + leaderboard + timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamesPayload {
    pub stats: PlayerStatsSummary,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub updated_at: DateTime<Local>,
}

impl Default for GamesPayload {
    fn default() -> Self {
        Self {
            stats: PlayerStatsSummary::default(),
            leaderboard: Vec::new(),
            updated_at: Local::now(),
        }
    }
}

/// Result of decoding the durable record. Corruption never surfaces as
/// an error; it falls back to the zeroed default, and the tag says
/// which happened.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(GamesPayload),
    Defaulted(GamesPayload),
}

impl LoadOutcome {
    pub fn into_payload(self) -> GamesPayload {
        match self {
            LoadOutcome::Loaded(p) | LoadOutcome::Defaulted(p) => p,
        }
    }

    pub fn was_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}

/// Decodes a raw stored value, swallowing malformed JSON.
pub fn decode_payload(bytes: Option<&[u8]>) -> LoadOutcome {
    match bytes.and_then(|b| serde_json::from_slice::<GamesPayload>(b).ok()) {
        Some(payload) => LoadOutcome::Loaded(payload),
        None => LoadOutcome::Defaulted(GamesPayload::default()),
    }
}

/// Central leaderboard ordering: weighted score first, then raw score,
/// then wpm, then accuracy. Higher ranks first.
pub fn rank_cmp(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.weighted()
        .cmp(&a.weighted())
        .then(b.score.cmp(&a.score))
        .then(b.wpm.total_cmp(&a.wpm))
        .then(b.accuracy.total_cmp(&a.accuracy))
}

/// Folds a completed run into the lifetime aggregates and the
/// leaderboard. One entry per (game, difficulty); a new run replaces
/// the stored entry only when it ranks strictly higher.
pub fn merge_run(payload: &mut GamesPayload, run: &RunSummary) {
    let stats = &mut payload.stats;
    stats.games_played += 1;
    stats.total_score += run.score;
    stats.best_wpm = stats.best_wpm.max(run.wpm);
    stats.best_accuracy = stats.best_accuracy.max(run.accuracy);
    stats.best_combo = stats.best_combo.max(run.max_combo);
    stats.total_mistakes += run.mistakes;

    let entry = LeaderboardEntry {
        game_id: run.game_id.clone(),
        difficulty: run.difficulty,
        score: run.score,
        wpm: run.wpm,
        accuracy: run.accuracy,
        max_combo: run.max_combo,
        recorded_at: Local::now(),
    };

    let existing = payload
        .leaderboard
        .iter()
        .position(|e| e.game_id == run.game_id && e.difficulty == run.difficulty);
    match existing {
        Some(idx) => {
            if rank_cmp(&entry, &payload.leaderboard[idx]) == Ordering::Less {
                payload.leaderboard[idx] = entry;
            }
        }
        None => payload.leaderboard.push(entry),
    }

    payload.leaderboard = payload
        .leaderboard
        .drain(..)
        .sorted_by(rank_cmp)
        .take(MAX_LEADERBOARD_ENTRIES)
        .collect();
    payload.updated_at = Local::now();
}

/// Durable store for the games payload. The store instance is
/// constructed explicitly and injected; it is the sole writer to its
/// key.
pub trait StatsStore {
    /// Never fails: missing or malformed state decodes to the default.
    fn load(&self) -> LoadOutcome;
    /// Write-through after every mutation; no batching.
    fn save(&self, payload: &GamesPayload) -> std::io::Result<()>;
}

/// File-backed store under the platform data directory.
#[derive(Debug, Clone)]
pub struct FileStatsStore {
    path: PathBuf,
}

impl FileStatsStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typely") {
            pd.data_local_dir().join("games.json")
        } else {
            PathBuf::from("typely_games.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileStatsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsStore for FileStatsStore {
    fn load(&self) -> LoadOutcome {
        decode_payload(fs::read(&self.path).ok().as_deref())
    }

    fn save(&self, payload: &GamesPayload) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(payload).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    cell: RefCell<Option<Vec<u8>>>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the stored bytes directly, e.g. with malformed JSON.
    pub fn seed(&self, bytes: &[u8]) {
        *self.cell.borrow_mut() = Some(bytes.to_vec());
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self) -> LoadOutcome {
        decode_payload(self.cell.borrow().as_deref())
    }

    fn save(&self, payload: &GamesPayload) -> std::io::Result<()> {
        *self.cell.borrow_mut() = Some(serde_json::to_vec_pretty(payload).unwrap_or_default());
        Ok(())
    }
}
