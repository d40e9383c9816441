use assert_matches::assert_matches;
use tempfile::tempdir;

use typely::persist::{
    merge_run, FileStatsStore, GamesPayload, LoadOutcome, StatsStore, MAX_LEADERBOARD_ENTRIES,
};
use typely::session::{Difficulty, RunSummary};

fn run(game: &str, difficulty: Difficulty, score: u64) -> RunSummary {
    RunSummary {
        game_id: game.to_string(),
        difficulty,
        score,
        wpm: 48.0,
        accuracy: 96.5,
        max_combo: 33,
        mistakes: 2,
    }
}

#[test]
fn save_then_load_restores_identical_payload() {
    let dir = tempdir().unwrap();
    let store = FileStatsStore::with_path(dir.path().join("games.json"));

    let mut payload = GamesPayload::default();
    merge_run(&mut payload, &run("sprint", Difficulty::Easy, 500));
    merge_run(&mut payload, &run("rain", Difficulty::Hard, 800));
    store.save(&payload).unwrap();

    let loaded = store.load();
    assert!(loaded.was_loaded());
    assert_eq!(loaded.into_payload(), payload);
}

#[test]
fn missing_file_yields_zeroed_default() {
    let dir = tempdir().unwrap();
    let store = FileStatsStore::with_path(dir.path().join("absent.json"));

    let outcome = store.load();
    assert_matches!(outcome, LoadOutcome::Defaulted(_));
    let payload = outcome.into_payload();
    assert_eq!(payload.stats.games_played, 0);
    assert!(payload.leaderboard.is_empty());
}

#[test]
fn corrupt_file_is_swallowed_not_thrown() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("games.json");
    std::fs::write(&path, "{\"stats\": [this is not valid").unwrap();

    let store = FileStatsStore::with_path(&path);
    assert!(!store.load().was_loaded());

    // A fresh save recovers the file.
    let mut payload = GamesPayload::default();
    merge_run(&mut payload, &run("sprint", Difficulty::Normal, 300));
    store.save(&payload).unwrap();
    assert!(store.load().was_loaded());
}

#[test]
fn repeated_runs_accumulate_and_leaderboard_stays_bounded() {
    let dir = tempdir().unwrap();
    let store = FileStatsStore::with_path(dir.path().join("games.json"));

    let mut payload = store.load().into_payload();
    for i in 0..(MAX_LEADERBOARD_ENTRIES as u64 + 10) {
        merge_run(
            &mut payload,
            &run(&format!("game-{i}"), Difficulty::Easy, 100 + i),
        );
        store.save(&payload).unwrap();
    }

    let reloaded = store.load().into_payload();
    assert_eq!(
        reloaded.stats.games_played,
        MAX_LEADERBOARD_ENTRIES as u64 + 10
    );
    assert_eq!(reloaded.leaderboard.len(), MAX_LEADERBOARD_ENTRIES);

    // Ranked descending by weighted score throughout.
    let weights: Vec<u64> = reloaded.leaderboard.iter().map(|e| e.weighted()).collect();
    let mut sorted = weights.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(weights, sorted);
}

#[test]
fn better_run_replaces_entry_for_same_game_and_difficulty() {
    let dir = tempdir().unwrap();
    let store = FileStatsStore::with_path(dir.path().join("games.json"));

    let mut payload = store.load().into_payload();
    merge_run(&mut payload, &run("sprint", Difficulty::Hard, 400));
    merge_run(&mut payload, &run("sprint", Difficulty::Hard, 900));
    merge_run(&mut payload, &run("sprint", Difficulty::Hard, 600));
    store.save(&payload).unwrap();

    let reloaded = store.load().into_payload();
    assert_eq!(reloaded.leaderboard.len(), 1);
    assert_eq!(reloaded.leaderboard[0].score, 900);
    assert_eq!(reloaded.stats.games_played, 3);
}
