//! Chronological presentation order for results.
//!
//! Format-only: sorting never changes what was assigned. Entries whose
//! slot is missing or unparseable sort last, deterministically.

use crate::{
    grid::SlotGrid,
    model::{AssignmentResult, RoomManagerEntry},
};
use std::cmp::Ordering;

/// Sort assignments by slot in canonical grid order; unmatched rows
/// (no slot) last, ties broken by student name.
pub fn sort_assignments(grid: &SlotGrid, results: &mut [AssignmentResult]) {
    results.sort_by(|a, b| {
        cmp_optional_slot(grid, a.slot.as_deref(), b.slot.as_deref())
            .then_with(|| a.student_name.cmp(&b.student_name))
    });
}

/// Sort manager entries chronologically. An entry's `slot` is either a
/// full token (per-slot coverage) or a bare day label (per-day
/// selection); both sort by the configured day ordering.
pub fn sort_manager_entries(grid: &SlotGrid, entries: &mut [RoomManagerEntry]) {
    entries.sort_by(|a, b| cmp_slot_or_day(grid, &a.slot, &b.slot));
}

fn cmp_optional_slot(grid: &SlotGrid, a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => grid.cmp_tokens(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn cmp_slot_or_day(grid: &SlotGrid, a: &str, b: &str) -> Ordering {
    slot_or_day_rank(grid, a)
        .cmp(&slot_or_day_rank(grid, b))
        .then_with(|| a.cmp(b))
}

/// (day index, position within the universe); unknown strings rank last.
fn slot_or_day_rank(grid: &SlotGrid, s: &str) -> (usize, usize) {
    if let Some(pos) = grid.position(s) {
        let day = grid
            .day_of(s)
            .and_then(|d| grid.day_position(d))
            .unwrap_or(usize::MAX);
        (day, pos)
    } else if let Some(day) = grid.day_position(s) {
        (day, 0)
    } else {
        (usize::MAX, usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::model::{ManagerReason, MatchStatus, Track};

    fn result(student: &str, slot: Option<&str>) -> AssignmentResult {
        AssignmentResult {
            student_name: student.to_string(),
            mentor_name: slot.map(|_| "M".to_string()),
            slot: slot.map(String::from),
            status: if slot.is_some() {
                MatchStatus::Matched
            } else {
                MatchStatus::Unmatched
            },
            school: String::new(),
            track: Track::Undecided,
        }
    }

    #[test]
    fn assignments_sort_chronologically_with_unmatched_last() {
        let grid = SlotGrid::build(&GridConfig::default());
        let mut results = vec![
            result("c", None),
            result("b", Some("Sat 10:00-11:00")),
            result("a", Some("Mon 17:00-18:00")),
            result("d", Some("Bogus 9:00-10:00")),
        ];
        sort_assignments(&grid, &mut results);
        let order: Vec<_> = results.iter().map(|r| r.student_name.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn manager_entries_sort_by_day_then_slot() {
        let grid = SlotGrid::build(&GridConfig::default());
        let entry = |slot: &str| RoomManagerEntry {
            slot: slot.to_string(),
            mentors: Vec::new(),
            reason: ManagerReason::IdleAvailable,
        };
        let mut entries = vec![entry("Sat"), entry("Mon"), entry("Fri")];
        sort_manager_entries(&grid, &mut entries);
        let order: Vec<_> = entries.iter().map(|e| e.slot.as_str()).collect();
        assert_eq!(order, vec!["Mon", "Fri", "Sat"]);
    }
}
