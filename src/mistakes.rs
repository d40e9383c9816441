use itertools::Itertools;
use std::collections::HashMap;

/// Normalizes a raw key label into a mistake-map bucket: single
/// characters fold to lowercase, recognized control keys map to fixed
/// labels. Returns None for labels that are not typing input.
pub fn normalize_label(raw: &str) -> Option<String> {
    match raw {
        " " | "Space" => Some("Space".to_string()),
        "\n" | "Enter" => Some("Enter".to_string()),
        "\t" | "Tab" => Some("Tab".to_string()),
        "Backspace" => Some("Backspace".to_string()),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c.to_lowercase().collect()),
                _ => None,
            }
        }
    }
}

/// Frequency map of missed keys with a deterministic ranked view.
/// Ties in the ranking are broken by first-encounter order.
#[derive(Debug, Clone, Default)]
pub struct MistakeTracker {
    counts: HashMap<String, u32>,
    order: Vec<String>,
}

impl MistakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the normalized bucket for a missed key. Unrecognized
    /// labels are dropped silently.
    pub fn record(&mut self, raw: &str) {
        let Some(label) = normalize_label(raw) else {
            return;
        };
        let count = self.counts.entry(label.clone()).or_insert(0);
        if *count == 0 {
            self.order.push(label);
        }
        *count += 1;
    }

    pub fn count(&self, label: &str) -> u32 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// The n most-missed keys, descending by count, ties in
    /// first-encounter order.
    pub fn top(&self, n: usize) -> Vec<(String, u32)> {
        self.order
            .iter()
            .enumerate()
            .map(|(rank, label)| (label.clone(), self.counts[label], rank))
            .sorted_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)))
            .take(n)
            .map(|(label, count, _)| (label, count))
            .collect()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_single_chars() {
        assert_eq!(normalize_label("a"), Some("a".to_string()));
        assert_eq!(normalize_label("A"), Some("a".to_string()));
        assert_eq!(normalize_label(";"), Some(";".to_string()));
    }

    #[test]
    fn test_normalize_control_keys() {
        assert_eq!(normalize_label(" "), Some("Space".to_string()));
        assert_eq!(normalize_label("Space"), Some("Space".to_string()));
        assert_eq!(normalize_label("Enter"), Some("Enter".to_string()));
        assert_eq!(normalize_label("Tab"), Some("Tab".to_string()));
        assert_eq!(normalize_label("Backspace"), Some("Backspace".to_string()));
    }

    #[test]
    fn test_normalize_rejects_other_multichar_labels() {
        assert_eq!(normalize_label("Shift"), None);
        assert_eq!(normalize_label("ArrowUp"), None);
    }

    #[test]
    fn test_case_folds_into_same_bucket() {
        let mut tracker = MistakeTracker::new();
        tracker.record("a");
        tracker.record("A");
        assert_eq!(tracker.count("a"), 2);
        assert_eq!(tracker.total(), 2);
    }

    #[test]
    fn test_unrecognized_labels_not_recorded() {
        let mut tracker = MistakeTracker::new();
        tracker.record("Shift");
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_top_sorts_by_count_descending() {
        let mut tracker = MistakeTracker::new();
        for _ in 0..3 {
            tracker.record("e");
        }
        tracker.record("q");
        for _ in 0..2 {
            tracker.record(" ");
        }
        let top = tracker.top(3);
        assert_eq!(
            top,
            vec![
                ("e".to_string(), 3),
                ("Space".to_string(), 2),
                ("q".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_top_ties_break_by_encounter_order() {
        let mut tracker = MistakeTracker::new();
        tracker.record("z");
        tracker.record("b");
        tracker.record("m");
        let top = tracker.top(10);
        assert_eq!(
            top,
            vec![
                ("z".to_string(), 1),
                ("b".to_string(), 1),
                ("m".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_top_truncates_to_n() {
        let mut tracker = MistakeTracker::new();
        for label in ["a", "b", "c", "d"] {
            tracker.record(label);
        }
        assert_eq!(tracker.top(2).len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut tracker = MistakeTracker::new();
        tracker.record("a");
        tracker.clear();
        assert!(tracker.is_empty());
        assert!(tracker.top(5).is_empty());
    }
}
