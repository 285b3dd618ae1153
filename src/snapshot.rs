//! Per-week rank snapshots: the read-only baseline for movement.
//!
//! Snapshots live as one CSV per week, `week=<n>.csv`, in a snapshot
//! directory. Loading the previous week is best-effort: a missing or
//! unreadable snapshot degrades the whole movement column to "—" rather
//! than failing the report.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ranking::RankEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub student_id: String,
    pub total_study_hours: f64,
    pub rank: u32,
}

/// One week's persisted ranking, keyed by student id.
#[derive(Debug, Clone)]
pub struct RankSnapshot {
    pub week_number: u32,
    rows: HashMap<String, SnapshotRow>,
}

impl RankSnapshot {
    pub fn previous_total(&self, student_id: &str) -> Option<f64> {
        self.rows.get(student_id).map(|r| r.total_study_hours)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn snapshot_path(dir: &str, week_number: u32) -> PathBuf {
    Path::new(dir).join(format!("week={week_number}.csv"))
}

/// Loads one week's snapshot, best-effort. Any failure (missing file,
/// malformed row) returns `None` and logs at warn.
pub fn load(dir: &str, week_number: u32) -> Option<RankSnapshot> {
    let path = snapshot_path(dir, week_number);
    if !path.exists() {
        debug!(path = %path.display(), "No rank snapshot for week");
        return None;
    }

    match read_rows(&path) {
        Ok(rows) => {
            debug!(week_number, students = rows.len(), "Rank snapshot loaded");
            Some(RankSnapshot { week_number, rows })
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Rank snapshot unreadable, movement degrades to —");
            None
        }
    }
}

fn read_rows(path: &Path) -> Result<HashMap<String, SnapshotRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = HashMap::new();
    for result in reader.deserialize() {
        let row: SnapshotRow = result?;
        rows.insert(row.student_id.clone(), row);
    }
    Ok(rows)
}

/// Persists this week's ranking so next week has a comparison baseline.
pub fn save(dir: &str, week_number: u32, entries: &[RankEntry]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let path = snapshot_path(dir, week_number);
    let mut writer = csv::Writer::from_path(&path)?;
    for entry in entries {
        writer.serialize(SnapshotRow {
            student_id: entry.student_id.clone(),
            total_study_hours: entry.total_study_hours,
            rank: entry.rank,
        })?;
    }
    writer.flush()?;
    debug!(path = %path.display(), students = entries.len(), "Rank snapshot saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_dir(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn entry(student_id: &str, total: f64, rank: u32) -> RankEntry {
        RankEntry {
            student_id: student_id.to_string(),
            week_number: 11,
            total_study_hours: total,
            rank,
        }
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = temp_dir("studyweek_snapshot_roundtrip");
        let _ = std::fs::remove_dir_all(&dir);

        save(&dir, 11, &[entry("30628", 30.0, 1), entry("30629", 28.0, 2)]).unwrap();
        let snapshot = load(&dir, 11).unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.previous_total("30628"), Some(30.0));
        assert_eq!(snapshot.previous_total("99999"), None);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_snapshot_loads_as_none() {
        let dir = temp_dir("studyweek_snapshot_missing");
        let _ = std::fs::remove_dir_all(&dir);
        assert!(load(&dir, 7).is_none());
    }

    #[test]
    fn test_malformed_snapshot_degrades_to_none() {
        let dir = temp_dir("studyweek_snapshot_malformed");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            snapshot_path(&dir, 3),
            "student_id,total_study_hours,rank\n30628,not-a-number,1\n",
        )
        .unwrap();

        assert!(load(&dir, 3).is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
