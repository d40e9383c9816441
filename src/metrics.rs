/// Base points awarded for a correct keystroke before the combo
/// multiplier is applied.
pub const POINTS_PER_KEY: u64 = 10;

/// Percentage of correct keystrokes, clamped to [0, 100].
/// An empty run counts as perfect (100).
pub fn accuracy(correct: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    ((correct as f64 / total as f64) * 100.0).clamp(0.0, 100.0)
}

/// Words per minute, standardized as correct-characters/5 per minute.
/// Returns 0 for an empty or zero-length run; unrounded, callers round
/// for display.
pub fn wpm(correct_chars: u64, elapsed_ms: u64) -> f64 {
    if elapsed_ms == 0 || correct_chars == 0 {
        return 0.0;
    }
    (correct_chars as f64 / 5.0) / (elapsed_ms as f64 / 60_000.0)
}

/// Stepped score multiplier derived from the current combo.
/// Thresholds are inclusive lower bounds.
pub fn multiplier(combo: u32) -> u32 {
    match combo {
        c if c >= 45 => 5,
        c if c >= 30 => 4,
        c if c >= 20 => 3,
        c if c >= 10 => 2,
        _ => 1,
    }
}

/// Difficulty-weighted ranking score used to order leaderboard entries
/// fairly across tiers.
pub fn weighted_score(score: u64, wpm: f64, accuracy: f64, difficulty_weight: f64) -> u64 {
    ((score as f64 + wpm * 10.0 + accuracy * 3.0) * difficulty_weight).round() as u64
}

/// Completion percentage of an exercise, clamped to [0, 100].
/// An empty prompt counts as complete.
pub fn progress(position: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    ((position as f64 / total as f64) * 100.0).clamp(0.0, 100.0)
}

/// Compact display form for large counters (1200 -> "1.2k").
/// Display-only; never feeds back into stored numeric state.
pub fn format_compact_number(n: u64) -> String {
    match n {
        n if n >= 1_000_000 => format!("{:.1}M", n as f64 / 1_000_000.0),
        n if n >= 1_000 => format!("{:.1}k", n as f64 / 1_000.0),
        _ => n.to_string(),
    }
}

/// Elapsed time as "m:ss" for timer displays.
pub fn format_time_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Raw per-session counters. Derived values (accuracy, wpm, multiplier)
/// are recomputed on demand and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub correct_keystrokes: u64,
    pub total_keystrokes: u64,
    pub mistakes: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A correct keystroke extends the combo and awards base points
    /// scaled by the multiplier in effect after the extension.
    pub fn record_correct(&mut self) {
        self.correct_keystrokes += 1;
        self.total_keystrokes += 1;
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        self.score += POINTS_PER_KEY * multiplier(self.combo) as u64;
    }

    /// A mistake clears the combo outright; max_combo keeps its high
    /// water mark.
    pub fn record_mistake(&mut self) {
        self.total_keystrokes += 1;
        self.mistakes += 1;
        self.combo = 0;
    }

    pub fn accuracy(&self) -> f64 {
        accuracy(self.correct_keystrokes, self.total_keystrokes)
    }

    pub fn wpm(&self, elapsed_ms: u64) -> f64 {
        wpm(self.correct_keystrokes, elapsed_ms)
    }

    pub fn multiplier(&self) -> u32 {
        multiplier(self.combo)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_empty_run_is_perfect() {
        assert_eq!(accuracy(0, 0), 100.0);
    }

    #[test]
    fn test_accuracy_basic() {
        assert_eq!(accuracy(8, 10), 80.0);
        assert_eq!(accuracy(1, 3), 100.0 / 3.0);
    }

    #[test]
    fn test_accuracy_bounds() {
        for total in 0..50u64 {
            for correct in 0..=total {
                let a = accuracy(correct, total);
                assert!((0.0..=100.0).contains(&a), "accuracy out of range: {a}");
            }
        }
        // Degenerate input beyond the domain still clamps.
        assert_eq!(accuracy(20, 10), 100.0);
    }

    #[test]
    fn test_wpm_zero_cases() {
        assert_eq!(wpm(0, 60_000), 0.0);
        assert_eq!(wpm(100, 0), 0.0);
    }

    #[test]
    fn test_wpm_fifty_chars_in_thirty_secs() {
        // 50 correct chars over 30s of active time => 10 words / 0.5 min
        assert_eq!(wpm(50, 30_000), 20.0);
    }

    #[test]
    fn test_wpm_is_unrounded() {
        let v = wpm(7, 10_000);
        assert!((v - 8.4).abs() < 1e-9);
    }

    #[test]
    fn test_multiplier_thresholds() {
        assert_eq!(multiplier(0), 1);
        assert_eq!(multiplier(9), 1);
        assert_eq!(multiplier(10), 2);
        assert_eq!(multiplier(19), 2);
        assert_eq!(multiplier(20), 3);
        assert_eq!(multiplier(30), 4);
        assert_eq!(multiplier(44), 4);
        assert_eq!(multiplier(45), 5);
        assert_eq!(multiplier(1000), 5);
    }

    #[test]
    fn test_multiplier_monotone() {
        let mut prev = 0;
        for combo in 0..200 {
            let m = multiplier(combo);
            assert!(m >= prev, "multiplier regressed at combo {combo}");
            prev = m;
        }
    }

    #[test]
    fn test_weighted_score() {
        // (100 + 40*10 + 95*3) * 1.5 = 1177.5 -> 1178
        assert_eq!(weighted_score(100, 40.0, 95.0, 1.5), 1178);
        assert_eq!(weighted_score(0, 0.0, 0.0, 2.0), 0);
    }

    #[test]
    fn test_progress() {
        assert_eq!(progress(0, 0), 100.0);
        assert_eq!(progress(0, 10), 0.0);
        assert_eq!(progress(5, 10), 50.0);
        assert_eq!(progress(12, 10), 100.0);
    }

    #[test]
    fn test_format_compact_number() {
        assert_eq!(format_compact_number(999), "999");
        assert_eq!(format_compact_number(1_200), "1.2k");
        assert_eq!(format_compact_number(2_500_000), "2.5M");
    }

    #[test]
    fn test_format_time_ms() {
        assert_eq!(format_time_ms(0), "0:00");
        assert_eq!(format_time_ms(59_999), "0:59");
        assert_eq!(format_time_ms(61_000), "1:01");
        assert_eq!(format_time_ms(600_000), "10:00");
    }

    #[test]
    fn test_metrics_correct_streak() {
        let mut m = Metrics::new();
        for _ in 0..12 {
            m.record_correct();
        }
        assert_eq!(m.combo, 12);
        assert_eq!(m.max_combo, 12);
        assert_eq!(m.correct_keystrokes, 12);
        assert_eq!(m.total_keystrokes, 12);
        assert_eq!(m.multiplier(), 2);
        // 9 keystrokes at 1x, 3 at 2x
        assert_eq!(m.score, 9 * POINTS_PER_KEY + 3 * 2 * POINTS_PER_KEY);
    }

    #[test]
    fn test_metrics_mistake_clears_combo_keeps_max() {
        let mut m = Metrics::new();
        for _ in 0..31 {
            m.record_correct();
        }
        assert_eq!(m.max_combo, 31);
        m.record_mistake();
        assert_eq!(m.combo, 0);
        assert_eq!(m.max_combo, 31);
        assert_eq!(m.multiplier(), 1);
        assert_eq!(m.mistakes, 1);
        assert_eq!(m.total_keystrokes, 32);
    }

    #[test]
    fn test_metrics_accuracy_eight_of_ten() {
        let mut m = Metrics::new();
        for _ in 0..8 {
            m.record_correct();
        }
        for _ in 0..2 {
            m.record_mistake();
        }
        assert_eq!(m.accuracy(), 80.0);
    }

    #[test]
    fn test_metrics_reset() {
        let mut m = Metrics::new();
        m.record_correct();
        m.record_mistake();
        m.reset();
        assert_eq!(m, Metrics::default());
    }
}
