//! Record ingestion: raw sheet rows into typed study records.
//!
//! The sheet contract: header row, then a goal-baseline row, then dated
//! observation rows. The date column ("일시") is mandatory; its absence
//! fails that student's ingestion. Everything else degrades row by row:
//! an unparsable date drops the row, an unparsable cell becomes a missing
//! observation (never zero).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::columns::{ALL_VARIABLES, StudyVariable, normalize_header};
use crate::error::StudyError;
use crate::parser::RawTable;
use crate::weeks::WeekCatalog;

/// The normalized header of the mandatory date column.
pub const DATE_COLUMN: &str = "일시";

/// The fixed date format observations use.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One observation row, immutable once ingested. A variable absent from
/// `values` was blank or unparsable in the sheet.
#[derive(Debug, Clone)]
pub struct StudyRecord {
    pub student_id: String,
    pub date: NaiveDate,
    pub values: BTreeMap<StudyVariable, f64>,
    /// Week the date binds to, `None` if it falls in a catalog gap. Such
    /// records still serve ad hoc date-range queries.
    pub week_number: Option<u32>,
}

/// Per-student goal targets, extracted from the first body row of the
/// student's own sheet. An absent entry means "no goal", never zero.
#[derive(Debug, Clone, Default)]
pub struct GoalBaseline {
    pub student_id: String,
    pub values: BTreeMap<StudyVariable, f64>,
}

impl GoalBaseline {
    pub fn goal_for(&self, variable: StudyVariable) -> Option<f64> {
        self.values.get(&variable).copied()
    }
}

/// The result of ingesting one student's sheet.
#[derive(Debug, Clone)]
pub struct IngestedSheet {
    pub records: Vec<StudyRecord>,
    pub goals: GoalBaseline,
    /// Recognized variables the sheet header did not carry, reported up
    /// front instead of surfacing as surprises inside aggregation.
    pub missing_variables: Vec<StudyVariable>,
}

/// Parses a raw sheet for one student and binds each observation to a week.
///
/// # Errors
///
/// [`StudyError::MissingDateColumn`] if no normalized header equals
/// `"일시"`, [`StudyError::EmptyTable`] if the sheet has no body rows.
/// Both are per-student failures; batch callers record them and continue.
pub fn ingest_sheet(
    student_id: &str,
    table: &RawTable,
    catalog: &WeekCatalog,
) -> Result<IngestedSheet, StudyError> {
    let columns: Vec<(usize, StudyVariable)> = table
        .headers
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| {
            StudyVariable::from_header(&normalize_header(raw)).map(|v| (idx, v))
        })
        .collect();

    let date_column = table
        .headers
        .iter()
        .position(|raw| normalize_header(raw) == DATE_COLUMN)
        .ok_or(StudyError::MissingDateColumn)?;

    if table.rows.is_empty() {
        return Err(StudyError::EmptyTable);
    }

    let missing_variables: Vec<StudyVariable> = ALL_VARIABLES
        .iter()
        .copied()
        .filter(|v| !columns.iter().any(|(_, c)| c == v))
        .collect();
    if !missing_variables.is_empty() {
        debug!(
            student_id,
            missing = missing_variables.len(),
            "Sheet is missing recognized variable columns"
        );
    }

    // First body row is the goal baseline; its date cell is ignored.
    let goals = GoalBaseline {
        student_id: student_id.to_string(),
        values: row_values(&table.rows[0], &columns),
    };

    let mut records = Vec::new();
    for row in &table.rows[1..] {
        let raw_date = row.get(date_column).map(String::as_str).unwrap_or("");
        let date = match NaiveDate::parse_from_str(raw_date.trim(), DATE_FORMAT) {
            Ok(d) => d,
            Err(_) => {
                debug!(student_id, raw_date, "Dropping row with unparsable date");
                continue;
            }
        };

        records.push(StudyRecord {
            student_id: student_id.to_string(),
            date,
            values: row_values(row, &columns),
            week_number: catalog.week_containing(date).map(|w| w.week_number),
        });
    }

    debug!(
        student_id,
        records = records.len(),
        goals = goals.values.len(),
        "Sheet ingested"
    );

    Ok(IngestedSheet {
        records,
        goals,
        missing_variables,
    })
}

fn row_values(
    row: &[String],
    columns: &[(usize, StudyVariable)],
) -> BTreeMap<StudyVariable, f64> {
    let mut values = BTreeMap::new();
    for (idx, variable) in columns {
        if let Some(hours) = row.get(*idx).and_then(|cell| parse_hours(cell)) {
            values.insert(*variable, hours);
        }
    }
    values
}

/// Coerces a cell to hours. Blank or unparsable cells are missing, not zero.
fn parse_hours(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_table;
    use crate::weeks::WeekCatalog;

    fn sheet(csv: &str) -> RawTable {
        parse_table(csv.as_bytes()).unwrap()
    }

    fn catalog() -> WeekCatalog {
        WeekCatalog::numbered(2026)
    }

    #[test]
    fn test_goal_row_is_split_from_observations() {
        let table = sheet("일시,국어합\n목표,4.5\n2026-03-02,3.0\n");
        let ingested = ingest_sheet("30628", &table, &catalog()).unwrap();
        assert_eq!(
            ingested.goals.goal_for(StudyVariable::KoreanTotal),
            Some(4.5)
        );
        assert_eq!(ingested.records.len(), 1);
        assert_eq!(
            ingested.records[0].values[&StudyVariable::KoreanTotal],
            3.0
        );
    }

    #[test]
    fn test_unparsable_date_rows_are_dropped() {
        let table = sheet(
            "일시,국어합\n목표,4.5\n2026-03-02,3.0\nnot-a-date,9.0\n2026-03-05,5.0\n",
        );
        let ingested = ingest_sheet("30628", &table, &catalog()).unwrap();
        assert_eq!(ingested.records.len(), 2);
    }

    #[test]
    fn test_blank_and_unparsable_cells_are_missing_not_zero() {
        let table = sheet("일시,국어합,수학합\n목표,4.5,\n2026-03-02,,abc\n");
        let ingested = ingest_sheet("30628", &table, &catalog()).unwrap();
        let record = &ingested.records[0];
        assert!(!record.values.contains_key(&StudyVariable::KoreanTotal));
        assert!(!record.values.contains_key(&StudyVariable::MathTotal));
        // goal for 수학합 was blank: no goal, not zero
        assert_eq!(ingested.goals.goal_for(StudyVariable::MathTotal), None);
    }

    #[test]
    fn test_missing_date_column_is_fatal_for_the_sheet() {
        let table = sheet("날짜,국어합\n목표,4.5\n2026-03-02,3.0\n");
        let err = ingest_sheet("30628", &table, &catalog()).unwrap_err();
        assert!(matches!(err, StudyError::MissingDateColumn));
    }

    #[test]
    fn test_empty_body_is_rejected() {
        let table = sheet("일시,국어합\n");
        let err = ingest_sheet("30628", &table, &catalog()).unwrap_err();
        assert!(matches!(err, StudyError::EmptyTable));
    }

    #[test]
    fn test_headers_normalize_before_matching() {
        let table = sheet("일 시,국어 합\n목표,4.5\n2026-03-02,3.0\n");
        let ingested = ingest_sheet("30628", &table, &catalog()).unwrap();
        assert_eq!(ingested.records.len(), 1);
        assert!(
            ingested.records[0]
                .values
                .contains_key(&StudyVariable::KoreanTotal)
        );
    }

    #[test]
    fn test_gap_dates_keep_the_record_but_bind_no_week() {
        let table = sheet("일시,국어합\n목표,4.5\n2026-02-10,3.0\n");
        let ingested = ingest_sheet("30628", &table, &catalog()).unwrap();
        assert_eq!(ingested.records.len(), 1);
        assert_eq!(ingested.records[0].week_number, None);
    }

    #[test]
    fn test_duplicate_timestamps_are_both_kept() {
        let table = sheet("일시,국어합\n목표,4.5\n2026-03-02,3.0\n2026-03-02,5.0\n");
        let ingested = ingest_sheet("30628", &table, &catalog()).unwrap();
        assert_eq!(ingested.records.len(), 2);
    }

    #[test]
    fn test_missing_variable_report() {
        let table = sheet("일시,국어합\n목표,4.5\n2026-03-02,3.0\n");
        let ingested = ingest_sheet("30628", &table, &catalog()).unwrap();
        assert!(
            ingested
                .missing_variables
                .contains(&StudyVariable::MathTotal)
        );
        assert!(
            !ingested
                .missing_variables
                .contains(&StudyVariable::KoreanTotal)
        );
    }
}
