//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! Everything else calls store methods — nothing executes SQL directly.
//!
//! The store is the loosely-typed boundary: rows are coerced into the
//! typed records of `model` exactly once, on load, with the permissive
//! availability parsing. Empty or missing tables load as empty
//! collections, never as errors.

use crate::{
    error::MatchResult,
    model::{AssignmentResult, HistoryEntry, MatchStatus, MentorRecord, StudentRequest, Track},
    types::RunId,
};
use rusqlite::{params, Connection};

pub struct MatchStore {
    conn: Connection,
}

fn join_slots(slots: &std::collections::BTreeSet<String>) -> String {
    slots.iter().cloned().collect::<Vec<_>>().join(",")
}

impl MatchStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> MatchResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> MatchResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> MatchResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: u64, mode: &str, version: &str) -> MatchResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, mode, version, started_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run_id,
                seed as i64,
                mode,
                version,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    // ── Students ───────────────────────────────────────────────

    /// Insert or replace by trimmed name: a re-submission under the
    /// same name overwrites the prior row.
    pub fn upsert_student(&self, s: &StudentRequest) -> MatchResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO student
               (name, school, grade, track, wants_same, requested_mentor, question, availability)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                s.name.trim(),
                &s.school,
                &s.grade,
                s.track.as_str(),
                if s.wants_same_mentor { 1 } else { 0 },
                &s.requested_mentor,
                &s.question,
                join_slots(&s.availability),
            ],
        )?;
        Ok(())
    }

    /// Load every student, in name order (the stable roster order used
    /// for simple-mode processing).
    pub fn load_students(&self) -> MatchResult<Vec<StudentRequest>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, school, grade, track, wants_same, requested_mentor, question, availability
             FROM student ORDER BY name ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StudentRequest::from_raw(
                &row.get::<_, String>(0)?,
                &row.get::<_, String>(1)?,
                &row.get::<_, String>(2)?,
                &row.get::<_, String>(3)?,
                row.get::<_, i32>(4)? != 0,
                &row.get::<_, String>(5)?,
                &row.get::<_, String>(6)?,
                &row.get::<_, String>(7)?,
            ))
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Clear the working student table (after a history commit).
    pub fn clear_students(&self) -> MatchResult<()> {
        self.conn.execute("DELETE FROM student", [])?;
        Ok(())
    }

    // ── Mentors ────────────────────────────────────────────────

    pub fn upsert_mentor(&self, m: &MentorRecord) -> MatchResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO mentor (name, tracks, availability) VALUES (?1, ?2, ?3)",
            params![
                m.name.trim(),
                Track::join_set(&m.tracks),
                join_slots(&m.availability),
            ],
        )?;
        Ok(())
    }

    pub fn load_mentors(&self) -> MatchResult<Vec<MentorRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, tracks, availability FROM mentor ORDER BY name ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(MentorRecord::from_raw(
                &row.get::<_, String>(0)?,
                &row.get::<_, String>(1)?,
                &row.get::<_, String>(2)?,
            ))
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── History ────────────────────────────────────────────────

    /// Append one pairing. History is append-only; the autoincrement
    /// id defines "most recent" for a student.
    pub fn append_history(&self, entry: &HistoryEntry) -> MatchResult<()> {
        self.conn.execute(
            "INSERT INTO history (student_name, mentor_name, slot, school, track, committed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &entry.student_name,
                &entry.mentor_name,
                &entry.slot,
                &entry.school,
                &entry.track,
                &entry.committed_at,
            ],
        )?;
        Ok(())
    }

    pub fn load_history(&self) -> MatchResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT student_name, mentor_name, slot, school, track, committed_at
             FROM history ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(HistoryEntry {
                student_name: row.get(0)?,
                mentor_name: row.get(1)?,
                slot: row.get(2)?,
                school: row.get(3)?,
                track: row.get(4)?,
                committed_at: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Append every matched result of a run to history. Invoked
    /// explicitly by the operator, never by the engine.
    pub fn commit_results(&self, results: &[AssignmentResult]) -> MatchResult<usize> {
        let committed_at = chrono::Utc::now().to_rfc3339();
        let mut appended = 0;
        for result in results.iter().filter(|r| r.is_matched()) {
            let (Some(mentor), Some(slot)) = (&result.mentor_name, &result.slot) else {
                continue;
            };
            self.append_history(&HistoryEntry {
                student_name: result.student_name.clone(),
                mentor_name: mentor.clone(),
                slot: slot.clone(),
                school: result.school.clone(),
                track: result.track.as_str().to_string(),
                committed_at: committed_at.clone(),
            })?;
            appended += 1;
        }
        Ok(appended)
    }

    // ── Assignments (working data of the latest run) ───────────

    pub fn save_assignments(&self, run_id: &RunId, results: &[AssignmentResult]) -> MatchResult<()> {
        for r in results {
            self.conn.execute(
                "INSERT OR REPLACE INTO assignment
                   (run_id, student_name, mentor_name, slot, status, school, track)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    run_id,
                    &r.student_name,
                    r.mentor_name.as_deref(),
                    r.slot.as_deref(),
                    match r.status {
                        MatchStatus::Matched => "matched",
                        MatchStatus::Unmatched => "unmatched",
                    },
                    &r.school,
                    r.track.as_str(),
                ],
            )?;
        }
        Ok(())
    }

    /// Load a run's assignments for review or auditing. The status is
    /// re-derived from field presence so a hand-edit that blanked a
    /// mentor or slot reads as unmatched rather than as a half-match.
    pub fn load_assignments(&self, run_id: &RunId) -> MatchResult<Vec<AssignmentResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT student_name, mentor_name, slot, school, track
             FROM assignment WHERE run_id = ?1 ORDER BY student_name ASC",
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            let mentor: Option<String> = row.get::<_, Option<String>>(1)?.filter(|m| !m.is_empty());
            let slot: Option<String> = row.get::<_, Option<String>>(2)?.filter(|s| !s.is_empty());
            let status = if mentor.is_some() && slot.is_some() {
                MatchStatus::Matched
            } else {
                MatchStatus::Unmatched
            };
            Ok(AssignmentResult {
                student_name: row.get(0)?,
                mentor_name: mentor,
                slot,
                status,
                school: row.get(3)?,
                track: Track::parse(&row.get::<_, String>(4)?),
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Drop a run's working assignments (after commit).
    pub fn clear_assignments(&self, run_id: &RunId) -> MatchResult<()> {
        self.conn
            .execute("DELETE FROM assignment WHERE run_id = ?1", params![run_id])?;
        Ok(())
    }
}
