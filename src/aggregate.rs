//! Per-variable mean aggregation over record sets.
//!
//! One numeric primitive, [`mean_of`], backs ad hoc date-range means,
//! preset-period means, and the per-week means feeding the ranking engine.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::columns::{SLEEP_VARIABLES, SUBJECT_TOTALS, StudyVariable};
use crate::ingest::StudyRecord;
use crate::weeks::WeekDefinition;

/// Per-variable means for one student in one week. Derived on demand,
/// never persisted.
#[derive(Debug, Clone)]
pub struct WeeklyAggregate {
    pub student_id: String,
    pub week_number: u32,
    pub means: BTreeMap<StudyVariable, f64>,
}

/// Arithmetic mean per variable over the records where that variable is
/// present. A variable with zero present observations yields NaN — never
/// 0.0, so "no data" stays distinguishable from "zero hours". Pure.
pub fn mean_of(
    records: &[&StudyRecord],
    variables: &[StudyVariable],
) -> BTreeMap<StudyVariable, f64> {
    let mut means = BTreeMap::new();
    for variable in variables {
        let observed: Vec<f64> = records
            .iter()
            .filter_map(|r| r.values.get(variable).copied())
            .collect();
        let mean = if observed.is_empty() {
            f64::NAN
        } else {
            observed.iter().sum::<f64>() / observed.len() as f64
        };
        means.insert(*variable, mean);
    }
    means
}

/// Means over records falling in a closed date range.
pub fn mean_over_range(
    records: &[StudyRecord],
    from: NaiveDate,
    to: NaiveDate,
    variables: &[StudyVariable],
) -> BTreeMap<StudyVariable, f64> {
    let in_range: Vec<&StudyRecord> = records
        .iter()
        .filter(|r| from <= r.date && r.date <= to)
        .collect();
    mean_of(&in_range, variables)
}

/// Bins records into one week and computes per-variable means.
pub fn weekly_aggregate(
    student_id: &str,
    records: &[StudyRecord],
    week: &WeekDefinition,
    variables: &[StudyVariable],
) -> WeeklyAggregate {
    let in_week: Vec<&StudyRecord> = records.iter().filter(|r| week.contains(r.date)).collect();
    WeeklyAggregate {
        student_id: student_id.to_string(),
        week_number: week.week_number,
        means: mean_of(&in_week, variables),
    }
}

/// The ranking metric: the sum of the four subject-combined weekly means
/// (mean daily combined hours). Subjects with no observations are skipped;
/// `None` means no subject total had any data, so the student is unranked
/// that week.
pub fn total_study_hours(aggregate: &WeeklyAggregate) -> Option<f64> {
    sum_present(aggregate, SUBJECT_TOTALS)
}

/// Mean daily sleep hours across the sleep-group variables, `None` when
/// none were observed.
pub fn daily_sleep_hours(aggregate: &WeeklyAggregate) -> Option<f64> {
    sum_present(aggregate, SLEEP_VARIABLES)
}

fn sum_present(aggregate: &WeeklyAggregate, variables: &[StudyVariable]) -> Option<f64> {
    let present: Vec<f64> = variables
        .iter()
        .filter_map(|v| aggregate.means.get(v).copied())
        .filter(|m| !m.is_nan())
        .collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum())
    }
}
