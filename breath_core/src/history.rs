//! Practice history with a day window.
//!
//! Loads recent journal records and summarizes them for the history and
//! stats views.

use crate::{PracticeRecord, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::path::Path;

/// Start of an N-day window ending now, or `None` when the window reaches
/// past the earliest representable time
fn window_start(days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|span| Utc::now().checked_sub_signed(span))
}

/// Load records from the last N days
///
/// Returns records sorted by ended_at (newest first). A window too large to
/// represent covers the whole journal.
pub fn load_recent_records(wal_path: &Path, days: i64) -> Result<Vec<PracticeRecord>> {
    let cutoff = window_start(days);
    if cutoff.is_none() {
        tracing::debug!("{} day window is unbounded, loading everything", days);
    }

    let mut records: Vec<_> = crate::wal::read_records(wal_path)?
        .into_iter()
        .filter(|r| cutoff.map_or(true, |c| r.ended_at >= c))
        .collect();

    records.sort_by(|a, b| b.ended_at.cmp(&a.ended_at));

    tracing::info!(
        "Loaded {} sessions from last {} days",
        records.len(),
        days
    );
    Ok(records)
}

/// Totals across a set of records
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistorySummary {
    pub sessions: usize,
    pub completed: usize,
    pub total_seconds: u64,
    pub favourite_technique: Option<String>,
}

pub fn summarize(records: &[PracticeRecord]) -> HistorySummary {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.technique_id.as_str()).or_default() += 1;
    }

    // Ties go to the alphabetically first id so the result is stable
    let favourite_technique = counts
        .into_iter()
        .max_by(|(a_id, a), (b_id, b)| a.cmp(b).then_with(|| b_id.cmp(a_id)))
        .map(|(id, _)| id.to_string());

    HistorySummary {
        sessions: records.len(),
        completed: records.iter().filter(|r| r.completed).count(),
        total_seconds: records.iter().map(|r| r.elapsed_seconds as u64).sum(),
        favourite_technique,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal::tests::record;
    use crate::wal::{JsonlSink, SessionSink};

    #[test]
    fn test_load_recent_records_window() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("practice.wal");

        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&record("box", 1, true)).unwrap();
        sink.append(&record("box", 3, true)).unwrap();
        sink.append(&record("box", 10, true)).unwrap(); // Too old

        let records = load_recent_records(&wal_path, 7).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_huge_window_loads_everything() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("practice.wal");

        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&record("box", 400, true)).unwrap();
        sink.append(&record("box", 1, true)).unwrap();

        assert!(window_start(100_000_000_000).is_none());
        assert!(window_start(i64::MAX).is_none());
        assert_eq!(load_recent_records(&wal_path, 100_000_000_000).unwrap().len(), 2);
        assert_eq!(load_recent_records(&wal_path, i64::MAX).unwrap().len(), 2);
    }

    #[test]
    fn test_records_sorted_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("practice.wal");

        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&record("old", 5, true)).unwrap();
        sink.append(&record("new", 1, true)).unwrap();

        let records = load_recent_records(&wal_path, 7).unwrap();
        assert_eq!(records[0].technique_id, "new");
        assert_eq!(records[1].technique_id, "old");
    }

    #[test]
    fn test_summarize() {
        let records = vec![
            record("box", 0, true),
            record("relaxing", 0, false),
            record("box", 1, true),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.sessions, 3);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.total_seconds, 192);
        assert_eq!(summary.favourite_technique.as_deref(), Some("box"));
    }

    #[test]
    fn test_summarize_empty_and_ties() {
        assert_eq!(summarize(&[]), HistorySummary::default());

        let tied = vec![record("relaxing", 0, true), record("box", 0, true)];
        assert_eq!(summarize(&tied).favourite_technique.as_deref(), Some("box"));
    }
}
