//! Normalized in-memory records.
//!
//! The store (or any other I/O collaborator) coerces loosely-typed rows
//! into these structs exactly once, at the boundary. The engine never
//! re-derives types from raw tabular data.

use crate::grid::parse_availability;
use crate::types::SlotToken;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Subject-track category. `Undecided` is the student's own opt-out of
/// track filtering; mentors never announce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Humanities,
    Science,
    Undecided,
}

impl Track {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Humanities => "humanities",
            Self::Science => "science",
            Self::Undecided => "undecided",
        }
    }

    /// Permissive parse: anything unrecognized reads as `Undecided`
    /// rather than failing the record.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "humanities" => Self::Humanities,
            "science" => Self::Science,
            _ => Self::Undecided,
        }
    }

    /// Parse a comma-joined mentor track list, dropping unknown entries.
    pub fn parse_set(raw: &str) -> BTreeSet<Track> {
        raw.split(',')
            .filter_map(|piece| match piece.trim() {
                "humanities" => Some(Self::Humanities),
                "science" => Some(Self::Science),
                _ => None,
            })
            .collect()
    }

    pub fn join_set(tracks: &BTreeSet<Track>) -> String {
        tracks
            .iter()
            .map(Track::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student's submission. Keyed by trimmed name; re-submission under
/// the same name overwrites the prior record at the store layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRequest {
    pub name: String,
    pub school: String,
    pub grade: String,
    pub track: Track,
    pub wants_same_mentor: bool,
    /// Free text, not interpreted by the engine.
    pub requested_mentor: String,
    /// Free text, not interpreted by the engine.
    pub question: String,
    pub availability: BTreeSet<SlotToken>,
}

impl StudentRequest {
    /// Build a record from boundary data, trimming the key and parsing
    /// the comma-joined availability permissively.
    #[allow(clippy::too_many_arguments)]
    pub fn from_raw(
        name: &str,
        school: &str,
        grade: &str,
        track: &str,
        wants_same_mentor: bool,
        requested_mentor: &str,
        question: &str,
        availability: &str,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            school: school.to_string(),
            grade: grade.to_string(),
            track: Track::parse(track),
            wants_same_mentor,
            requested_mentor: requested_mentor.to_string(),
            question: question.to_string(),
            availability: parse_availability(availability),
        }
    }
}

/// One mentor's registration. Same overwrite-by-name semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorRecord {
    pub name: String,
    pub tracks: BTreeSet<Track>,
    pub availability: BTreeSet<SlotToken>,
}

impl MentorRecord {
    pub fn from_raw(name: &str, tracks: &str, availability: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            tracks: Track::parse_set(tracks),
            availability: parse_availability(availability),
        }
    }

    /// Track eligibility: a student's `Undecided` matches any mentor;
    /// a specific track requires the mentor to announce it.
    pub fn supports(&self, track: Track) -> bool {
        match track {
            Track::Undecided => true,
            specific => self.tracks.contains(&specific),
        }
    }
}

/// A past committed pairing. Append-only; "most recent for a student"
/// is the last-appended row with that student name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub student_name: String,
    pub mentor_name: String,
    pub slot: SlotToken,
    pub school: String,
    pub track: String,
    pub committed_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    Unmatched,
}

/// One per input student, always, match or no match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub student_name: String,
    pub mentor_name: Option<String>,
    pub slot: Option<SlotToken>,
    pub status: MatchStatus,
    pub school: String,
    pub track: Track,
}

impl AssignmentResult {
    pub fn matched(student: &StudentRequest, mentor: &str, slot: &str) -> Self {
        Self {
            student_name: student.name.clone(),
            mentor_name: Some(mentor.to_string()),
            slot: Some(slot.to_string()),
            status: MatchStatus::Matched,
            school: student.school.clone(),
            track: student.track,
        }
    }

    pub fn unmatched(student: &StudentRequest) -> Self {
        Self {
            student_name: student.name.clone(),
            mentor_name: None,
            slot: None,
            status: MatchStatus::Unmatched,
            school: student.school.clone(),
            track: student.track,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.status == MatchStatus::Matched
    }
}

/// Why a mentor was designated room manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerReason {
    /// Had availability that day but no match assigned.
    NoMatchAssigned,
    /// Their only match that day is the only match in its slot.
    SoloInterview,
    /// Every mentor that day is busy; an already-matched mentor covers.
    FallbackMatched,
    /// No mentor qualifies at all.
    NoneFound,
    /// Idle-but-available during an active slot (per-slot coverage).
    IdleAvailable,
}

impl ManagerReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoMatchAssigned => "no match assigned",
            Self::SoloInterview => "solo interview",
            Self::FallbackMatched => "fallback - already matched",
            Self::NoneFound => "none found",
            Self::IdleAvailable => "idle but available",
        }
    }
}

/// A supervisory designation: per day (simple selector, `slot` holds the
/// day label) or per slot (coverage selector, `slot` holds the token).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomManagerEntry {
    pub slot: String,
    pub mentors: Vec<String>,
    pub reason: ManagerReason,
}
