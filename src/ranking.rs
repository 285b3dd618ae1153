//! Weekly ranking by total study hours, with week-over-week movement.

use serde::Serialize;

/// A student's rank for one week. Only students with a defined total are
/// ranked; there is no sentinel rank.
#[derive(Debug, Clone, Serialize)]
pub struct RankEntry {
    pub student_id: String,
    pub week_number: u32,
    pub total_study_hours: f64,
    pub rank: u32,
}

/// Week-over-week direction of a student's total study hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Movement {
    #[serde(rename = "▲")]
    Up,
    #[serde(rename = "▼")]
    Down,
    #[serde(rename = "—")]
    Flat,
}

impl Movement {
    pub fn symbol(&self) -> &'static str {
        match self {
            Movement::Up => "▲",
            Movement::Down => "▼",
            Movement::Flat => "—",
        }
    }
}

/// Ranks students by total study hours, descending, using standard
/// competition ("min") ranking: equal totals share the rank equal to one
/// plus the count of strictly greater totals.
///
/// The result is invariant under permutation of the input; equal totals
/// are ordered by student id only for deterministic output, which does not
/// affect the rank they receive.
pub fn rank_students(week_number: u32, totals: &[(String, f64)]) -> Vec<RankEntry> {
    let mut sorted: Vec<&(String, f64)> = totals.iter().collect();
    sorted.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut entries: Vec<RankEntry> = Vec::with_capacity(sorted.len());
    for (position, (student_id, total)) in sorted.iter().enumerate() {
        let rank = match entries.last() {
            Some(prev) if prev.total_study_hours == *total => prev.rank,
            _ => position as u32 + 1,
        };
        entries.push(RankEntry {
            student_id: student_id.clone(),
            week_number,
            total_study_hours: *total,
            rank,
        });
    }
    entries
}

/// Classifies movement against the previous week's total. An absent
/// previous total (new student, or no snapshot at all) is `Flat`, never a
/// direction.
pub fn movement(current: f64, previous: Option<f64>) -> Movement {
    match previous {
        Some(prev) if current > prev => Movement::Up,
        Some(prev) if current < prev => Movement::Down,
        _ => Movement::Flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(id, t)| (id.to_string(), *t)).collect()
    }

    fn ranks(entries: &[RankEntry]) -> Vec<(&str, u32)> {
        entries
            .iter()
            .map(|e| (e.student_id.as_str(), e.rank))
            .collect()
    }

    #[test]
    fn test_distinct_totals_rank_in_order() {
        let entries = rank_students(1, &totals(&[("a", 10.0), ("b", 30.0), ("c", 20.0)]));
        assert_eq!(ranks(&entries), vec![("b", 1), ("c", 2), ("a", 3)]);
    }

    #[test]
    fn test_ties_share_the_minimum_rank() {
        let entries = rank_students(
            1,
            &totals(&[("a", 30.0), ("b", 30.0), ("c", 20.0), ("d", 20.0), ("e", 10.0)]),
        );
        // two at 30 share rank 1; two at 20 share rank 3; last is rank 5
        assert_eq!(
            ranks(&entries),
            vec![("a", 1), ("b", 1), ("c", 3), ("d", 3), ("e", 5)]
        );
    }

    #[test]
    fn test_ranking_is_invariant_under_input_permutation() {
        let forward = rank_students(1, &totals(&[("a", 30.0), ("b", 20.0), ("c", 30.0)]));
        let backward = rank_students(1, &totals(&[("c", 30.0), ("b", 20.0), ("a", 30.0)]));
        assert_eq!(ranks(&forward), ranks(&backward));
    }

    #[test]
    fn test_empty_input_ranks_nobody() {
        assert!(rank_students(1, &[]).is_empty());
    }

    #[test]
    fn test_movement_direction() {
        assert_eq!(movement(30.0, Some(28.0)), Movement::Up);
        assert_eq!(movement(30.0, Some(31.0)), Movement::Down);
        assert_eq!(movement(30.0, Some(30.0)), Movement::Flat);
    }

    #[test]
    fn test_new_student_is_flat_never_a_direction() {
        assert_eq!(movement(30.0, None), Movement::Flat);
    }

    #[test]
    fn test_movement_symbols() {
        assert_eq!(Movement::Up.symbol(), "▲");
        assert_eq!(Movement::Down.symbol(), "▼");
        assert_eq!(Movement::Flat.symbol(), "—");
    }
}
