//! Actual-vs-goal comparison.
//!
//! The rules here are deliberately strict about absent data: a missing or
//! zero goal never implies a target exists, and a missing actual never
//! produces a percentage. Division by zero cannot happen.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::columns::StudyVariable;
use crate::ingest::GoalBaseline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GoalStatus {
    Achieved,
    Shortfall,
    /// No comparison possible: goal absent or zero, or actual unobserved.
    Neutral,
}

/// One variable's comparison outcome, with pre-formatted display strings.
#[derive(Debug, Clone, Serialize)]
pub struct GoalComparison {
    /// `actual / goal * 100`, only when both sides are defined and the
    /// goal is non-zero.
    pub percentage: Option<f64>,
    pub status: GoalStatus,
    /// Value with unit, e.g. `"4.0시간"`, or `"기록 없음"`.
    pub display_value: String,
    /// Signed relative delta against the goal, e.g. `"-11.1%"`, or `"—"`.
    pub display_delta: String,
}

/// Compares a mean actual (NaN = unobserved) against an optional goal.
pub fn compare(actual: f64, goal: Option<f64>) -> GoalComparison {
    let display_value = if actual.is_nan() {
        "기록 없음".to_string()
    } else {
        format!("{:.1}시간", actual)
    };

    let goal = match goal {
        Some(g) if g != 0.0 => g,
        _ => {
            return GoalComparison {
                percentage: None,
                status: GoalStatus::Neutral,
                display_value,
                display_delta: "—".to_string(),
            };
        }
    };

    if actual.is_nan() {
        return GoalComparison {
            percentage: None,
            status: GoalStatus::Neutral,
            display_value,
            display_delta: "—".to_string(),
        };
    }

    let percentage = actual / goal * 100.0;
    let status = if actual >= goal {
        GoalStatus::Achieved
    } else {
        GoalStatus::Shortfall
    };

    GoalComparison {
        percentage: Some(percentage),
        status,
        display_value,
        display_delta: format!("{:+.1}%", percentage - 100.0),
    }
}

/// Compares every mean against the student's baseline.
pub fn compare_against_baseline(
    means: &BTreeMap<StudyVariable, f64>,
    goals: &GoalBaseline,
) -> BTreeMap<StudyVariable, GoalComparison> {
    means
        .iter()
        .map(|(variable, actual)| (*variable, compare(*actual, goals.goal_for(*variable))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortfall_with_percentage() {
        let cmp = compare(4.0, Some(4.5));
        assert_eq!(cmp.status, GoalStatus::Shortfall);
        let pct = cmp.percentage.unwrap();
        assert!((pct - 88.888).abs() < 0.01, "pct = {pct}");
        assert_eq!(cmp.display_delta, "-11.1%");
        assert_eq!(cmp.display_value, "4.0시간");
    }

    #[test]
    fn test_achieved_at_exactly_the_goal() {
        let cmp = compare(4.5, Some(4.5));
        assert_eq!(cmp.status, GoalStatus::Achieved);
        assert_eq!(cmp.percentage, Some(100.0));
        assert_eq!(cmp.display_delta, "+0.0%");
    }

    #[test]
    fn test_zero_goal_is_neutral_for_any_actual() {
        for actual in [0.0, 5.0, -1.0, f64::NAN] {
            let cmp = compare(actual, Some(0.0));
            assert_eq!(cmp.status, GoalStatus::Neutral);
            assert_eq!(cmp.percentage, None);
        }
    }

    #[test]
    fn test_absent_goal_is_neutral_for_any_actual() {
        for actual in [0.0, 5.0, f64::NAN] {
            let cmp = compare(actual, None);
            assert_eq!(cmp.status, GoalStatus::Neutral);
            assert_eq!(cmp.percentage, None);
        }
    }

    #[test]
    fn test_missing_actual_has_no_percentage() {
        let cmp = compare(f64::NAN, Some(4.5));
        assert_eq!(cmp.percentage, None);
        assert_eq!(cmp.status, GoalStatus::Neutral);
        assert_eq!(cmp.display_value, "기록 없음");
    }

    #[test]
    fn test_baseline_comparison_covers_every_mean() {
        use crate::columns::StudyVariable::*;
        let means: BTreeMap<_, _> =
            [(KoreanTotal, 4.0), (MathTotal, f64::NAN)].into_iter().collect();
        let goals = GoalBaseline {
            student_id: "30628".to_string(),
            values: [(KoreanTotal, 4.5)].into_iter().collect(),
        };
        let result = compare_against_baseline(&means, &goals);
        assert_eq!(result[&KoreanTotal].status, GoalStatus::Shortfall);
        // no goal row entry for 수학합: degrades to Neutral, never an error
        assert_eq!(result[&MathTotal].status, GoalStatus::Neutral);
    }
}
