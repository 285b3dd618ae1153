//! The week catalog: the fixed, ordered table of intervals all binning
//! uses.
//!
//! Two catalog variants exist and are never merged: a 4-entry set of named
//! exam weeks and a 44-entry numbered set spanning a school year. Which one
//! is active is a configuration choice made once at startup.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StudyError;

/// One week interval, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDefinition {
    pub week_number: u32,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekDefinition {
    /// Closed-interval containment.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// An ordered sequence of week definitions, sorted by `week_number`.
#[derive(Debug, Clone)]
pub struct WeekCatalog {
    weeks: Vec<WeekDefinition>,
}

impl WeekCatalog {
    /// The 4-entry named exam-week catalog. Gaps between exam weeks are
    /// intentional; dates outside every entry bind to no week.
    pub fn exam_weeks(year: i32) -> Self {
        let week = |n: u32, label: &str, m1: u32, d1: u32, m2: u32, d2: u32| WeekDefinition {
            week_number: n,
            label: label.to_string(),
            start: ymd(year, m1, d1),
            end: ymd(year, m2, d2),
        };
        WeekCatalog {
            weeks: vec![
                week(1, "1학기 중간고사", 4, 20, 4, 26),
                week(2, "1학기 기말고사", 6, 29, 7, 5),
                week(3, "2학기 중간고사", 10, 12, 10, 18),
                week(4, "2학기 기말고사", 12, 14, 12, 20),
            ],
        }
    }

    /// The 44-entry numbered catalog: consecutive 7-day weeks starting
    /// March 1 of the school year, labelled "1주차".."44주차".
    pub fn numbered(year: i32) -> Self {
        let first = ymd(year, 3, 1);
        let weeks = (0..44u32)
            .map(|i| {
                let start = first + chrono::Duration::days(i as i64 * 7);
                WeekDefinition {
                    week_number: i + 1,
                    label: format!("{}주차", i + 1),
                    start,
                    end: start + chrono::Duration::days(6),
                }
            })
            .collect();
        WeekCatalog { weeks }
    }

    /// Loads a catalog from a JSON file: an array of week definitions.
    /// A malformed catalog is fatal at startup.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let weeks: Vec<WeekDefinition> = serde_json::from_str(&content)?;
        let catalog = WeekCatalog { weeks };
        catalog.validate()?;
        debug!(path, weeks = catalog.weeks.len(), "Week catalog loaded");
        Ok(catalog)
    }

    /// Rejects unordered or overlapping definitions. Ordering and
    /// non-overlap are what `week_containing` relies on; gaps are legal
    /// (the exam catalog has them by design) and simply bind no week.
    pub fn validate(&self) -> Result<(), StudyError> {
        for pair in self.weeks.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.week_number >= b.week_number {
                return Err(StudyError::CatalogConfig(format!(
                    "week numbers out of order: {} then {}",
                    a.week_number, b.week_number
                )));
            }
            if b.start <= a.end {
                return Err(StudyError::CatalogConfig(format!(
                    "weeks \"{}\" and \"{}\" overlap",
                    a.label, b.label
                )));
            }
        }
        for w in &self.weeks {
            if w.end < w.start {
                return Err(StudyError::CatalogConfig(format!(
                    "week \"{}\" ends before it starts",
                    w.label
                )));
            }
        }
        Ok(())
    }

    pub fn weeks(&self) -> &[WeekDefinition] {
        &self.weeks
    }

    /// The unique definition containing `date`, or `None` for a gap.
    ///
    /// Scans in catalog order, so if a misconfigured catalog overlaps, the
    /// lower week number wins.
    pub fn week_containing(&self, date: NaiveDate) -> Option<&WeekDefinition> {
        self.weeks.iter().find(|w| w.contains(date))
    }

    /// Looks a week up by its exact label.
    pub fn week_with_label(&self, label: &str) -> Option<&WeekDefinition> {
        self.weeks.iter().find(|w| w.label == label)
    }

    /// Looks a week up by number.
    pub fn week_with_number(&self, week_number: u32) -> Option<&WeekDefinition> {
        self.weeks.iter().find(|w| w.week_number == week_number)
    }

    /// Inclusive slice of the catalog between two labels, in catalog order.
    pub fn weeks_between(
        &self,
        first_label: &str,
        last_label: &str,
    ) -> Result<&[WeekDefinition], StudyError> {
        let first = self
            .weeks
            .iter()
            .position(|w| w.label == first_label)
            .ok_or_else(|| StudyError::UnknownWeek(first_label.to_string()))?;
        let last = self
            .weeks
            .iter()
            .position(|w| w.label == last_label)
            .ok_or_else(|| StudyError::UnknownWeek(last_label.to_string()))?;
        if first > last {
            return Err(StudyError::InvalidRange {
                first: first_label.to_string(),
                last: last_label.to_string(),
            });
        }
        Ok(&self.weeks[first..=last])
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    // The built-in catalogs only use valid calendar dates.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
