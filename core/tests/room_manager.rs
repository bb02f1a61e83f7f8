//! Room-manager selection over engine output.

use mentormatch_core::config::{GridConfig, ScoringWeights};
use mentormatch_core::engine::{MatchEngine, MatchMode};
use mentormatch_core::grid::SlotGrid;
use mentormatch_core::manager::{select_daily_managers, select_slot_coverage};
use mentormatch_core::model::{ManagerReason, MentorRecord, StudentRequest, Track};
use std::collections::BTreeSet;

fn grid() -> SlotGrid {
    SlotGrid::build(&GridConfig::default())
}

fn slots(tokens: &[&str]) -> BTreeSet<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

fn student(name: &str, track: Track, availability: &[&str]) -> StudentRequest {
    StudentRequest {
        name: name.to_string(),
        school: String::new(),
        grade: String::new(),
        track,
        wants_same_mentor: false,
        requested_mentor: String::new(),
        question: String::new(),
        availability: slots(availability),
    }
}

fn mentor(name: &str, tracks: &[Track], availability: &[&str]) -> MentorRecord {
    MentorRecord {
        name: name.to_string(),
        tracks: tracks.iter().copied().collect(),
        availability: slots(availability),
    }
}

fn run_simple(
    students: &[StudentRequest],
    mentors: &[MentorRecord],
) -> mentormatch_core::engine::MatchOutcome {
    let g = grid();
    let mut engine = MatchEngine::new(&g, MatchMode::Simple, ScoringWeights::default(), 42);
    engine.run(students, mentors, &[])
}

#[test]
fn free_mentor_becomes_manager() {
    // Ueno is available Monday but gets no match: first pick.
    let students = vec![student("Aiko", Track::Science, &["Mon 17:00-18:00"])];
    let mentors = vec![
        mentor("Tanaka", &[Track::Science], &["Mon 17:00-18:00"]),
        mentor("Ueno", &[Track::Humanities], &["Mon 18:00-19:00"]),
    ];

    let outcome = run_simple(&students, &mentors);
    let g = grid();
    let entries = select_daily_managers(&outcome, &mentors, &g);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].slot, "Mon");
    assert_eq!(entries[0].reason, ManagerReason::NoMatchAssigned);
    assert_eq!(entries[0].mentors, vec!["Ueno".to_string()]);
}

#[test]
fn solo_interview_when_no_free_mentor_exists() {
    // Tanaka is the only mentor with Monday availability and works
    // alone in his slot: he supervises his own room.
    let students = vec![student("Aiko", Track::Science, &["Mon 17:00-18:00"])];
    let mentors = vec![mentor("Tanaka", &[Track::Science], &["Mon 17:00-18:00"])];

    let outcome = run_simple(&students, &mentors);
    let g = grid();
    let entries = select_daily_managers(&outcome, &mentors, &g);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].reason, ManagerReason::SoloInterview);
    assert_eq!(entries[0].mentors, vec!["Tanaka".to_string()]);
}

#[test]
fn fallback_when_everyone_is_busy_together() {
    // Both mentors interview in the same slot: nobody is free, nobody
    // is solo, so an already-matched mentor covers as fallback.
    let students = vec![
        student("Aiko", Track::Science, &["Mon 17:00-18:00"]),
        student("Ben", Track::Science, &["Mon 17:00-18:00"]),
    ];
    let mentors = vec![
        mentor("Tanaka", &[Track::Science], &["Mon 17:00-18:00"]),
        mentor("Ueno", &[Track::Science], &["Mon 17:00-18:00"]),
    ];

    let outcome = run_simple(&students, &mentors);
    assert_eq!(outcome.matched_count(), 2);
    let g = grid();
    let entries = select_daily_managers(&outcome, &mentors, &g);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].reason, ManagerReason::FallbackMatched);
    assert_eq!(entries[0].mentors, vec!["Tanaka".to_string()]);
}

#[test]
fn only_active_days_get_entries_in_day_order() {
    let students = vec![
        student("Aiko", Track::Science, &["Sat 10:00-11:00"]),
        student("Ben", Track::Science, &["Mon 17:00-18:00"]),
    ];
    let mentors = vec![mentor(
        "Tanaka",
        &[Track::Science],
        &["Mon 17:00-18:00", "Sat 10:00-11:00", "Sun 10:00-11:00"],
    )];

    let outcome = run_simple(&students, &mentors);
    let g = grid();
    let entries = select_daily_managers(&outcome, &mentors, &g);
    let days: Vec<_> = entries.iter().map(|e| e.slot.as_str()).collect();
    assert_eq!(days, vec!["Mon", "Sat"], "Sunday had no match; Mon sorts first");
}

#[test]
fn slot_coverage_lists_idle_mentors_per_active_slot() {
    let students = vec![student("Aiko", Track::Science, &["Mon 17:00-18:00"])];
    let mentors = vec![
        mentor("Tanaka", &[Track::Science], &["Mon 17:00-18:00"]),
        // Humanities-only, so never a candidate for Aiko, but present
        // and unconsumed at the active slot.
        mentor("Ueno", &[Track::Humanities], &["Mon 17:00-18:00"]),
    ];

    let outcome = run_simple(&students, &mentors);
    let g = grid();
    let entries = select_slot_coverage(&outcome, &g);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].slot, "Mon 17:00-18:00");
    assert_eq!(entries[0].reason, ManagerReason::IdleAvailable);
    assert_eq!(entries[0].mentors, vec!["Ueno".to_string()]);
}

#[test]
fn slot_coverage_may_be_empty_and_follows_canonical_order() {
    let students = vec![
        student("Aiko", Track::Science, &["Sat 10:00-11:00"]),
        student("Ben", Track::Science, &["Mon 17:00-18:00"]),
    ];
    let mentors = vec![mentor(
        "Tanaka",
        &[Track::Science],
        &["Mon 17:00-18:00", "Sat 10:00-11:00"],
    )];

    let outcome = run_simple(&students, &mentors);
    let g = grid();
    let entries = select_slot_coverage(&outcome, &g);
    let active: Vec<_> = entries.iter().map(|e| e.slot.as_str()).collect();
    assert_eq!(active, vec!["Mon 17:00-18:00", "Sat 10:00-11:00"]);
    for entry in &entries {
        assert!(
            entry.mentors.is_empty(),
            "the only mentor is consumed everywhere; no idle coverage exists"
        );
    }
}
