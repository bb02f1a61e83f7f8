//! Audit pass: re-deriving assignment legality from submitted records.

use mentormatch_core::audit::{validate, Violation};
use mentormatch_core::config::{GridConfig, ScoringWeights};
use mentormatch_core::engine::{MatchEngine, MatchMode};
use mentormatch_core::grid::SlotGrid;
use mentormatch_core::model::{
    AssignmentResult, MatchStatus, MentorRecord, StudentRequest, Track,
};
use std::collections::BTreeSet;

fn slots(tokens: &[&str]) -> BTreeSet<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

fn student(name: &str, availability: &[&str]) -> StudentRequest {
    StudentRequest {
        name: name.to_string(),
        school: String::new(),
        grade: String::new(),
        track: Track::Science,
        wants_same_mentor: false,
        requested_mentor: String::new(),
        question: String::new(),
        availability: slots(availability),
    }
}

fn mentor(name: &str, availability: &[&str]) -> MentorRecord {
    MentorRecord {
        name: name.to_string(),
        tracks: [Track::Science].into_iter().collect(),
        availability: slots(availability),
    }
}

fn assignment(student: &str, mentor: &str, slot: &str) -> AssignmentResult {
    AssignmentResult {
        student_name: student.to_string(),
        mentor_name: Some(mentor.to_string()),
        slot: Some(slot.to_string()),
        status: MatchStatus::Matched,
        school: String::new(),
        track: Track::Science,
    }
}

#[test]
fn unedited_engine_output_audits_clean_twice() {
    let grid = SlotGrid::build(&GridConfig::default());
    let students = vec![
        student("Aiko", &["Mon 17:00-18:00", "Mon 18:00-19:00"]),
        student("Ben", &["Mon 17:00-18:00"]),
        student("Chika", &["Sun 22:00-23:00"]),
    ];
    let mentors = vec![
        mentor("Tanaka", &["Mon 17:00-18:00", "Mon 18:00-19:00"]),
        mentor("Ueno", &["Mon 17:00-18:00"]),
    ];

    let mut engine = MatchEngine::new(&grid, MatchMode::GapAverse, ScoringWeights::default(), 42);
    let outcome = engine.run(&students, &mentors, &[]);

    // Internally consistent by construction, however often we re-check.
    assert!(validate(&outcome.assignments, &students, &mentors).is_empty());
    assert!(validate(&outcome.assignments, &students, &mentors).is_empty());
}

#[test]
fn slot_swapped_off_student_request_is_reported() {
    let students = vec![student("Aiko", &["Mon 17:00-18:00"])];
    let mentors = vec![mentor("Tanaka", &["Mon 17:00-18:00", "Mon 18:00-19:00"])];
    // A hand-edit moved Aiko to an hour she never offered.
    let edited = vec![assignment("Aiko", "Tanaka", "Mon 18:00-19:00")];

    let violations = validate(&edited, &students, &mentors);
    assert_eq!(violations.len(), 1);
    match &violations[0] {
        Violation::StudentSlot {
            student,
            slot,
            requested,
        } => {
            assert_eq!(student, "Aiko");
            assert_eq!(slot, "Mon 18:00-19:00");
            assert_eq!(requested, &vec!["Mon 17:00-18:00".to_string()]);
        }
        other => panic!("expected StudentSlot, got {other:?}"),
    }
}

#[test]
fn mentor_without_the_slot_is_reported() {
    let students = vec![student("Aiko", &["Mon 18:00-19:00"])];
    let mentors = vec![mentor("Tanaka", &["Mon 17:00-18:00"])];
    let edited = vec![assignment("Aiko", "Tanaka", "Mon 18:00-19:00")];

    let violations = validate(&edited, &students, &mentors);
    assert_eq!(violations.len(), 1);
    assert!(matches!(violations[0], Violation::MentorSlot { .. }));
}

#[test]
fn unknown_mentor_is_reported_once() {
    let students = vec![student("Aiko", &["Mon 17:00-18:00"])];
    let mentors = vec![mentor("Tanaka", &["Mon 17:00-18:00"])];
    let edited = vec![assignment("Aiko", "Typo Name", "Mon 17:00-18:00")];

    let violations = validate(&edited, &students, &mentors);
    assert_eq!(violations.len(), 1);
    assert!(
        matches!(&violations[0], Violation::UnknownMentor { mentor, .. } if mentor == "Typo Name"),
        "an unknown mentor must not also produce a MentorSlot violation"
    );
}

#[test]
fn one_bad_edit_can_trip_both_sides() {
    let students = vec![student("Aiko", &["Mon 17:00-18:00"])];
    let mentors = vec![mentor("Tanaka", &["Mon 17:00-18:00"])];
    let edited = vec![assignment("Aiko", "Tanaka", "Sat 10:00-11:00")];

    let violations = validate(&edited, &students, &mentors);
    assert_eq!(violations.len(), 2, "student-side and mentor-side both fail");
}

#[test]
fn unmatched_rows_are_not_checked() {
    let students = vec![student("Aiko", &["Mon 17:00-18:00"])];
    let mentors = vec![mentor("Tanaka", &["Mon 17:00-18:00"])];
    let rows = vec![AssignmentResult {
        student_name: "Aiko".to_string(),
        mentor_name: None,
        slot: None,
        status: MatchStatus::Unmatched,
        school: String::new(),
        track: Track::Science,
    }];

    assert!(validate(&rows, &students, &mentors).is_empty());
}
