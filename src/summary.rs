//! Rule-based weekly status comments.
//!
//! Deterministic text over a (current, previous) pair of weekly totals and
//! two policy thresholds. The trend branch fires exactly once; the
//! insufficiency admonitions fire independently of it.

use serde::{Deserialize, Serialize};

/// Default minimum weekly study hours (6.5 h/day over 7 days).
pub const DEFAULT_MIN_STUDY_HOURS: f64 = 45.5;
/// Default minimum weekly sleep hours (6.5 h/day over 7 days).
pub const DEFAULT_MIN_SLEEP_HOURS: f64 = 45.5;

/// Policy thresholds for the weekly comment. Configuration, not code:
/// callers thread these through explicitly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SummaryThresholds {
    #[serde(default = "default_min_study")]
    pub min_study_hours: f64,
    #[serde(default = "default_min_sleep")]
    pub min_sleep_hours: f64,
}

fn default_min_study() -> f64 {
    DEFAULT_MIN_STUDY_HOURS
}

fn default_min_sleep() -> f64 {
    DEFAULT_MIN_SLEEP_HOURS
}

impl Default for SummaryThresholds {
    fn default() -> Self {
        SummaryThresholds {
            min_study_hours: DEFAULT_MIN_STUDY_HOURS,
            min_sleep_hours: DEFAULT_MIN_SLEEP_HOURS,
        }
    }
}

/// Week-over-week study-time trend. "No prior data" is an explicit
/// outcome: a missing previous week is never treated as a zero baseline,
/// which would always report an increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Increase,
    Decrease,
    Stable,
    NoPriorData,
}

/// The generated comment for one student's week.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklySummary {
    pub trend: Trend,
    pub text: String,
}

/// Builds the status comment from weekly study/sleep totals.
///
/// `current_study` and `previous_study` are total weekly study hours;
/// `current_sleep` is total weekly sleep hours. `None` means no data for
/// that period.
pub fn summarize(
    current_study: Option<f64>,
    previous_study: Option<f64>,
    current_sleep: Option<f64>,
    thresholds: &SummaryThresholds,
) -> WeeklySummary {
    let mut sentences: Vec<String> = Vec::new();

    let trend = match (current_study, previous_study) {
        (None, _) => {
            sentences.push("이번 주 학습 기록이 없어요.".to_string());
            Trend::NoPriorData
        }
        (Some(_), None) => {
            sentences.push("지난주 기록이 없어 추이를 비교할 수 없어요.".to_string());
            Trend::NoPriorData
        }
        (Some(current), Some(previous)) => {
            let diff = current - previous;
            if diff > 0.0 {
                sentences.push(format!(
                    "지난주보다 공부 시간이 {:.1}시간 늘었어요. 잘하고 있어요!",
                    diff
                ));
                Trend::Increase
            } else if diff < 0.0 {
                sentences.push(format!(
                    "지난주보다 공부 시간이 {:.1}시간 줄었어요. 다시 페이스를 올려 봐요.",
                    -diff
                ));
                Trend::Decrease
            } else {
                sentences.push("지난주와 공부 시간이 같아요. 꾸준함이 힘이에요.".to_string());
                Trend::Stable
            }
        }
    };

    if let Some(study) = current_study {
        if study < thresholds.min_study_hours {
            sentences.push(format!(
                "주간 공부 시간이 기준({:.1}시간)에 못 미쳐요.",
                thresholds.min_study_hours
            ));
        }
    }

    if let Some(sleep) = current_sleep {
        if sleep < thresholds.min_sleep_hours {
            sentences.push(format!(
                "수면 시간이 부족해요. 일주일에 최소 {:.1}시간은 자야 해요.",
                thresholds.min_sleep_hours
            ));
        }
    }

    WeeklySummary {
        trend,
        text: sentences.join(" "),
    }
}
