//! The administrator batch report: one week, every student.
//!
//! Each student's fetch+ingest+aggregate runs as an independent task under
//! a semaphore-bounded pool, with a per-student timeout capped by an
//! overall batch deadline. A single student's failure becomes a failure
//! entry and never aborts the batch. Final ordering comes from the
//! ranking sort, not task-completion order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::time::{Instant, timeout_at};
use tracing::{Instrument, info, warn};

use crate::aggregate::{daily_sleep_hours, total_study_hours, weekly_aggregate};
use crate::columns::ALL_VARIABLES;
use crate::error::StudyError;
use crate::ingest::ingest_sheet;
use crate::ranking::{Movement, RankEntry, movement, rank_students};
use crate::roster::{Roster, StudentAccount};
use crate::sheets::SheetSource;
use crate::snapshot::RankSnapshot;
use crate::summary::{SummaryThresholds, summarize};
use crate::weeks::{WeekCatalog, WeekDefinition};

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub concurrency: usize,
    pub per_student_timeout: Duration,
    pub deadline: Duration,
    pub thresholds: SummaryThresholds,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            concurrency: 5,
            per_student_timeout: Duration::from_secs(20),
            deadline: Duration::from_secs(120),
            thresholds: SummaryThresholds::default(),
        }
    }
}

/// One ranked row of the weekly report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub rank: u32,
    pub anonymized_name: String,
    pub total_study_hours: f64,
    pub movement: Movement,
    pub comment: Option<String>,
}

/// A student the batch could not rank, with a short human-readable reason.
#[derive(Debug, Clone, Serialize)]
pub struct StudentFailure {
    pub student_id: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct WeeklyReport {
    pub week_number: u32,
    pub week_label: String,
    pub rows: Vec<ReportRow>,
    pub failures: Vec<StudentFailure>,
    /// The ranking underlying `rows`, kept for snapshot persistence.
    pub entries: Vec<RankEntry>,
}

/// One student's successfully aggregated week, pre-ranking.
struct StudentWeek {
    student: StudentAccount,
    /// Mean daily combined study hours; the ranking metric.
    total: Option<f64>,
    weekly_study: Option<f64>,
    previous_weekly_study: Option<f64>,
    weekly_sleep: Option<f64>,
}

/// Builds the full weekly report for every reportable roster student.
///
/// `previous` is the prior week's rank snapshot, already loaded
/// best-effort by the caller; `None` degrades every movement to `—`.
pub async fn build_weekly_report(
    source: Arc<dyn SheetSource>,
    roster: &Roster,
    catalog: &WeekCatalog,
    week_label: &str,
    previous: Option<&RankSnapshot>,
    config: &ReportConfig,
) -> Result<WeeklyReport> {
    let week = catalog
        .week_with_label(week_label)
        .ok_or_else(|| StudyError::UnknownWeek(week_label.to_string()))?
        .clone();
    let previous_week = week
        .week_number
        .checked_sub(1)
        .and_then(|n| catalog.week_with_number(n))
        .cloned();

    let students: Vec<StudentAccount> = roster.reportable().cloned().collect();
    info!(
        week = %week.label,
        students = students.len(),
        concurrency = config.concurrency,
        "Starting weekly batch report"
    );
    match previous {
        Some(snapshot) => info!(
            baseline_students = snapshot.len(),
            "Previous rank snapshot loaded"
        ),
        None => info!("No previous rank snapshot; movement column degrades to —"),
    }

    let semaphore = Arc::new(Semaphore::new(config.concurrency));
    let batch_deadline = Instant::now() + config.deadline;

    let mut handles = Vec::with_capacity(students.len());
    for student in students {
        let sem = semaphore.clone();
        let source = source.clone();
        let catalog = catalog.clone();
        let week = week.clone();
        let previous_week = previous_week.clone();
        let per_student_timeout = config.per_student_timeout;

        let span = tracing::info_span!("process_student", student_id = %student.id);
        let student_id = student.id.clone();

        let handle = tokio::spawn(
            async move {
                let _permit = sem.acquire().await.unwrap();

                // The per-student timeout never extends past the batch deadline.
                let cutoff = (Instant::now() + per_student_timeout).min(batch_deadline);
                match timeout_at(cutoff, student_week(source, student, catalog, week, previous_week))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(anyhow!("timed out")),
                }
            }
            .instrument(span),
        );
        handles.push((student_id, handle));
    }

    let mut completed: Vec<StudentWeek> = Vec::new();
    let mut failures: Vec<StudentFailure> = Vec::new();
    for (student_id, handle) in handles {
        match handle.await {
            Ok(Ok(sw)) => completed.push(sw),
            Ok(Err(e)) => {
                // Sheet-level errors stay per-student; anything pointing at a
                // broken configuration fails the whole batch.
                if let Some(study_err) = e.downcast_ref::<StudyError>() {
                    if !study_err.is_per_student() {
                        return Err(e);
                    }
                }
                let reason = e.to_string();
                warn!(student_id = %student_id, reason = %reason, "Student excluded from weekly report");
                failures.push(StudentFailure { student_id, reason });
            }
            Err(e) => {
                warn!(student_id = %student_id, error = %e, "Student task aborted");
                failures.push(StudentFailure {
                    student_id,
                    reason: "task aborted".to_string(),
                });
            }
        }
    }

    let mut by_id: HashMap<String, StudentWeek> = HashMap::new();
    let mut totals: Vec<(String, f64)> = Vec::new();
    for sw in completed {
        match sw.total {
            Some(total) => {
                totals.push((sw.student.id.clone(), total));
                by_id.insert(sw.student.id.clone(), sw);
            }
            None => failures.push(StudentFailure {
                student_id: sw.student.id.clone(),
                reason: "no data for this week".to_string(),
            }),
        }
    }

    let entries = rank_students(week.week_number, &totals);

    let mut rows: Vec<ReportRow> = entries
        .iter()
        .map(|entry| {
            let sw = &by_id[&entry.student_id];
            let previous_total = previous.and_then(|s| s.previous_total(&entry.student_id));
            let summary = summarize(
                sw.weekly_study,
                sw.previous_weekly_study,
                sw.weekly_sleep,
                &config.thresholds,
            );
            ReportRow {
                rank: entry.rank,
                anonymized_name: sw.student.anonymized_name.clone(),
                total_study_hours: entry.total_study_hours,
                movement: movement(entry.total_study_hours, previous_total),
                comment: Some(summary.text),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        a.rank
            .cmp(&b.rank)
            .then_with(|| a.anonymized_name.cmp(&b.anonymized_name))
    });

    info!(
        week = %week.label,
        ranked = rows.len(),
        failed = failures.len(),
        "Weekly batch report complete"
    );

    Ok(WeeklyReport {
        week_number: week.week_number,
        week_label: week.label,
        rows,
        failures,
        entries,
    })
}

/// Fetch, ingest, and aggregate one student's week. Independent of every
/// other student; shares nothing mutable with the rest of the batch.
async fn student_week(
    source: Arc<dyn SheetSource>,
    student: StudentAccount,
    catalog: WeekCatalog,
    week: WeekDefinition,
    previous_week: Option<WeekDefinition>,
) -> Result<StudentWeek> {
    let table = source.fetch_table(&student).await?;
    let ingested = ingest_sheet(&student.id, &table, &catalog)?;

    let current = weekly_aggregate(&student.id, &ingested.records, &week, ALL_VARIABLES);
    let total = total_study_hours(&current);
    let previous_weekly_study = previous_week
        .map(|pw| weekly_aggregate(&student.id, &ingested.records, &pw, ALL_VARIABLES))
        .and_then(|agg| total_study_hours(&agg))
        .map(|t| t * 7.0);

    Ok(StudentWeek {
        total,
        weekly_study: total.map(|t| t * 7.0),
        previous_weekly_study,
        weekly_sleep: daily_sleep_hours(&current).map(|s| s * 7.0),
        student,
    })
}
