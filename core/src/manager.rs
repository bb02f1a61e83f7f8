//! Room-manager selection — a post-matching pass that designates
//! supervisory mentors.
//!
//! Both selectors are read-only over the engine's output: they never
//! mutate assignments or availability.

use crate::{
    engine::MatchOutcome,
    grid::{parse_token, SlotGrid},
    model::{ManagerReason, MentorRecord, RoomManagerEntry},
};
use std::collections::{BTreeMap, BTreeSet};

/// Day label of a slot token, whether or not the token is in the
/// configured universe. Malformed tokens have no day.
fn day_label(slot: &str) -> Option<&str> {
    parse_token(slot).map(|(label, _)| label)
}

/// Per-day manager selection, restricted to days with at least one
/// match, in ascending day order (unknown day labels last).
///
/// Priority within a day:
///   1. a mentor with availability that day but no match that day
///      ("no match assigned");
///   2. a mentor whose single match that day is the only match in its
///      slot ("solo interview" — nobody else covers the room);
///   3. any matched mentor ("fallback");
///   4. none found.
/// "First" always means mentor roster order.
pub fn select_daily_managers(
    outcome: &MatchOutcome,
    mentors: &[MentorRecord],
    grid: &SlotGrid,
) -> Vec<RoomManagerEntry> {
    // Per mentor, the slots they were matched into, grouped by day.
    let mut matches_by_day: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
    for assignment in outcome.assignments.iter().filter(|a| a.is_matched()) {
        let (Some(mentor), Some(slot)) = (&assignment.mentor_name, &assignment.slot) else {
            continue;
        };
        let Some(day) = day_label(slot) else {
            continue;
        };
        matches_by_day
            .entry(day)
            .or_default()
            .push((mentor.as_str(), slot.as_str()));
    }

    let mut active_days: Vec<&str> = matches_by_day.keys().copied().collect();
    active_days.sort_by_key(|day| (grid.day_position(day).unwrap_or(usize::MAX), *day));

    let mut entries = Vec::with_capacity(active_days.len());
    for day in active_days {
        let day_matches = &matches_by_day[day];
        let matched_mentors: BTreeSet<&str> =
            day_matches.iter().map(|(mentor, _)| *mentor).collect();

        let free = mentors.iter().find(|m| {
            !matched_mentors.contains(m.name.as_str())
                && m.availability.iter().any(|s| day_label(s) == Some(day))
        });
        if let Some(mentor) = free {
            entries.push(entry(day, &mentor.name, ManagerReason::NoMatchAssigned));
            continue;
        }

        let lonely = mentors.iter().find(|m| {
            let own: Vec<&str> = day_matches
                .iter()
                .filter(|(mentor, _)| *mentor == m.name)
                .map(|(_, slot)| *slot)
                .collect();
            own.len() == 1 && outcome.slot_popularity.get(own[0]).copied().unwrap_or(0) == 1
        });
        if let Some(mentor) = lonely {
            entries.push(entry(day, &mentor.name, ManagerReason::SoloInterview));
            continue;
        }

        let fallback = mentors
            .iter()
            .find(|m| matched_mentors.contains(m.name.as_str()));
        match fallback {
            Some(mentor) => {
                entries.push(entry(day, &mentor.name, ManagerReason::FallbackMatched))
            }
            None => entries.push(RoomManagerEntry {
                slot: day.to_string(),
                mentors: Vec::new(),
                reason: ManagerReason::NoneFound,
            }),
        }
    }
    entries
}

/// Per-slot coverage: for every slot that received at least one match,
/// the mentors who still have unconsumed availability at that exact
/// slot — idle but in the building, candidates for room coverage.
/// Slots come back in canonical order; mentor lists may be empty.
pub fn select_slot_coverage(outcome: &MatchOutcome, grid: &SlotGrid) -> Vec<RoomManagerEntry> {
    let mut active_slots: Vec<&str> = outcome
        .slot_popularity
        .iter()
        .filter(|(_, &count)| count > 0)
        .map(|(slot, _)| slot.as_str())
        .collect();
    active_slots.sort_by(|a, b| grid.cmp_tokens(a, b));

    active_slots
        .into_iter()
        .map(|slot| {
            let idle: Vec<String> = outcome
                .remaining
                .iter()
                .filter(|(_, slots)| slots.contains(slot))
                .map(|(mentor, _)| mentor.clone())
                .collect();
            RoomManagerEntry {
                slot: slot.to_string(),
                mentors: idle,
                reason: ManagerReason::IdleAvailable,
            }
        })
        .collect()
}

fn entry(day: &str, mentor: &str, reason: ManagerReason) -> RoomManagerEntry {
    RoomManagerEntry {
        slot: day.to_string(),
        mentors: vec![mentor.to_string()],
        reason,
    }
}
