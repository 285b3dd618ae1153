//! Output formatting and persistence for weekly reports.

use anyhow::Result;
use tracing::{debug, info};

use crate::report::WeeklyReport;
use csv::WriterBuilder;

/// Logs a weekly report using Rust's debug pretty-print format.
pub fn print_pretty(report: &WeeklyReport) {
    debug!("{:#?}", report);
}

/// Logs a weekly report as pretty-printed JSON.
pub fn print_json(report: &WeeklyReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes the ranked rows of a weekly report to a CSV file, one row per
/// ranked student, header first. The file is replaced: reports are
/// derived, recomputed per request, never appended to.
pub fn write_report_csv(path: &str, report: &WeeklyReport) -> Result<()> {
    debug!(path, rows = report.rows.len(), "Writing report CSV");

    let mut writer = WriterBuilder::new().from_path(path)?;
    for row in &report.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::Movement;
    use crate::report::ReportRow;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_report() -> WeeklyReport {
        WeeklyReport {
            week_number: 11,
            week_label: "11주차".to_string(),
            rows: vec![
                ReportRow {
                    rank: 1,
                    anonymized_name: "학생A".to_string(),
                    total_study_hours: 12.0,
                    movement: Movement::Up,
                    comment: Some("지난주보다 공부 시간이 2.0시간 늘었어요.".to_string()),
                },
                ReportRow {
                    rank: 2,
                    anonymized_name: "학생B".to_string(),
                    total_study_hours: 9.5,
                    movement: Movement::Flat,
                    comment: None,
                },
            ],
            failures: vec![],
            entries: vec![],
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_report());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_report()).unwrap();
    }

    #[test]
    fn test_write_report_csv_has_header_and_rows() {
        let path = temp_path("studyweek_test_report.csv");
        let _ = fs::remove_file(&path);

        write_report_csv(&path, &sample_report()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("rank"));
        assert!(lines[1].contains("학생A"));
        assert!(lines[1].contains("▲"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_report_csv_replaces_prior_file() {
        let path = temp_path("studyweek_test_report_replace.csv");
        let _ = fs::remove_file(&path);

        write_report_csv(&path, &sample_report()).unwrap();
        write_report_csv(&path, &sample_report()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // header appears exactly once: the file is regenerated, not appended
        let header_count = content.lines().filter(|l| l.contains("rank")).count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }
}
