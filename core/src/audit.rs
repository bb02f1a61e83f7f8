//! Validation pass over a (possibly hand-edited) assignment set.
//!
//! The engine's own output is internally consistent by construction;
//! this pass exists to catch inconsistencies introduced by manual
//! editing between the run and the history commit. It re-derives
//! correctness from the original student and mentor records only,
//! never from the engine's internal state — the two may have diverged.
//!
//! Violations are data for a human to resolve, not errors: the pass
//! never raises and never corrects anything itself.

use crate::model::{AssignmentResult, MentorRecord, StudentRequest};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The assigned slot is not in the student's submitted request;
    /// the true requested set is reported for operator remediation.
    StudentSlot {
        student: String,
        slot: String,
        requested: Vec<String>,
    },
    /// The assigned slot is not in the mentor's submitted availability.
    MentorSlot {
        mentor: String,
        student: String,
        slot: String,
    },
    /// The assigned mentor does not exist in the roster at all.
    UnknownMentor { mentor: String, student: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StudentSlot {
                student,
                slot,
                requested,
            } => write!(
                f,
                "{student}: assigned slot {slot:?} was never requested (requested: {})",
                requested.join(", ")
            ),
            Self::MentorSlot {
                mentor,
                student,
                slot,
            } => write!(
                f,
                "{mentor}: not available at {slot:?} (assigned to {student})"
            ),
            Self::UnknownMentor { mentor, student } => {
                write!(f, "{mentor}: unknown mentor (assigned to {student})")
            }
        }
    }
}

/// Check every matched assignment against the raw submitted records.
/// Returns every violation found, in assignment order.
pub fn validate(
    assignments: &[AssignmentResult],
    students: &[StudentRequest],
    mentors: &[MentorRecord],
) -> Vec<Violation> {
    let requests: BTreeMap<&str, &StudentRequest> =
        students.iter().map(|s| (s.name.as_str(), s)).collect();
    let roster: BTreeMap<&str, &MentorRecord> =
        mentors.iter().map(|m| (m.name.as_str(), m)).collect();

    let mut violations = Vec::new();
    for assignment in assignments.iter().filter(|a| a.is_matched()) {
        let (Some(mentor), Some(slot)) = (&assignment.mentor_name, &assignment.slot) else {
            continue;
        };
        let student = assignment.student_name.as_str();

        let requested_ok = requests
            .get(student)
            .is_some_and(|s| s.availability.contains(slot));
        if !requested_ok {
            violations.push(Violation::StudentSlot {
                student: student.to_string(),
                slot: slot.clone(),
                requested: requests
                    .get(student)
                    .map(|s| s.availability.iter().cloned().collect())
                    .unwrap_or_default(),
            });
        }

        match roster.get(mentor.as_str()) {
            None => violations.push(Violation::UnknownMentor {
                mentor: mentor.clone(),
                student: student.to_string(),
            }),
            Some(record) if !record.availability.contains(slot) => {
                violations.push(Violation::MentorSlot {
                    mentor: mentor.clone(),
                    student: student.to_string(),
                    slot: slot.clone(),
                })
            }
            Some(_) => {}
        }
    }
    violations
}
