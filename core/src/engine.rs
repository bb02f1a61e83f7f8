//! The greedy matching engine — the heart of mentormatch.
//!
//! RULES:
//!   - One run = one in-memory batch over fully loaded records.
//!   - The engine never mutates input records and never touches the
//!     store; remaining/committed views live and die with the run.
//!   - Once a slot is consumed for a mentor it is unavailable to every
//!     later student in the same run. No double-booking, ever.
//!   - All randomness flows through the seeded Scoring stream; it is a
//!     pure tie-breaker, smaller than any deliberate score distinction.

use crate::{
    config::ScoringWeights,
    grid::SlotGrid,
    model::{AssignmentResult, HistoryEntry, MentorRecord, StudentRequest},
    rng::{MatchRng, RngStream},
    types::SlotToken,
};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// First-fit in input order.
    Simple,
    /// Priority-scored first-fit: fewest-options students first,
    /// popular slots first, contiguity-scored mentor choice.
    GapAverse,
}

impl MatchMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "simple" => Some(Self::Simple),
            "gap-averse" => Some(Self::GapAverse),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::GapAverse => "gap-averse",
        }
    }
}

/// Everything a run produces: the assignment list plus the run-scoped
/// derived views the room-manager selector consumes. Discarded after
/// the run; never written back into mentor records.
pub struct MatchOutcome {
    /// One entry per input student, in processing order.
    pub assignments: Vec<AssignmentResult>,
    /// Per mentor: submitted availability not consumed by this run.
    pub remaining: BTreeMap<String, BTreeSet<SlotToken>>,
    /// Per mentor: slots consumed by this run.
    pub committed: BTreeMap<String, BTreeSet<SlotToken>>,
    /// Per slot: number of matches placed into it this run.
    pub slot_popularity: BTreeMap<SlotToken, u32>,
}

impl MatchOutcome {
    pub fn matched_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.is_matched()).count()
    }
}

pub struct MatchEngine<'g> {
    grid: &'g SlotGrid,
    mode: MatchMode,
    weights: ScoringWeights,
    rng: MatchRng,
}

impl<'g> MatchEngine<'g> {
    pub fn new(grid: &'g SlotGrid, mode: MatchMode, weights: ScoringWeights, seed: u64) -> Self {
        Self {
            grid,
            mode,
            weights,
            rng: MatchRng::for_stream(seed, RngStream::Scoring),
        }
    }

    /// Run one full matching pass. Empty student or mentor collections
    /// are legal and short-circuit to all-unmatched / empty results;
    /// reporting "insufficient data" is the caller's job.
    pub fn run(
        &mut self,
        students: &[StudentRequest],
        mentors: &[MentorRecord],
        history: &[HistoryEntry],
    ) -> MatchOutcome {
        let mut remaining: BTreeMap<String, BTreeSet<SlotToken>> = mentors
            .iter()
            .map(|m| (m.name.clone(), m.availability.clone()))
            .collect();
        let mut committed: BTreeMap<String, BTreeSet<SlotToken>> = mentors
            .iter()
            .map(|m| (m.name.clone(), BTreeSet::new()))
            .collect();
        let mut popularity: BTreeMap<SlotToken, u32> = BTreeMap::new();

        let order = self.processing_order(students);
        let mut assignments = Vec::with_capacity(students.len());

        for index in order {
            let student = &students[index];
            let prior = if student.wants_same_mentor {
                prior_mentor(history, &student.name)
            } else {
                None
            };

            let assignment = self.place_student(
                student,
                prior,
                mentors,
                &mut remaining,
                &mut committed,
                &mut popularity,
            );
            match &assignment {
                Some(a) => log::debug!(
                    "matched {} -> {} at {}",
                    student.name,
                    a.mentor_name.as_deref().unwrap_or(""),
                    a.slot.as_deref().unwrap_or("")
                ),
                None => log::debug!("no feasible mentor/slot for {}", student.name),
            }
            assignments.push(assignment.unwrap_or_else(|| AssignmentResult::unmatched(student)));
        }

        log::info!(
            "matching run ({}): {}/{} students matched",
            self.mode.as_str(),
            assignments.iter().filter(|a| a.is_matched()).count(),
            assignments.len()
        );

        MatchOutcome {
            assignments,
            remaining,
            committed,
            slot_popularity: popularity,
        }
    }

    /// Student processing order. Simple mode keeps input order.
    /// Gap-averse mode serves students with the fewest requested slots
    /// first (they are the most likely to fail if deprioritized); the
    /// sort is stable, so ties keep input order.
    fn processing_order(&self, students: &[StudentRequest]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..students.len()).collect();
        if self.mode == MatchMode::GapAverse {
            order.sort_by_key(|&i| students[i].availability.len());
        }
        order
    }

    /// Try to place one student. On success the chosen slot is moved
    /// from the mentor's remaining set into their committed set and the
    /// slot's popularity counter is bumped.
    fn place_student(
        &mut self,
        student: &StudentRequest,
        prior: Option<&str>,
        mentors: &[MentorRecord],
        remaining: &mut BTreeMap<String, BTreeSet<SlotToken>>,
        committed: &mut BTreeMap<String, BTreeSet<SlotToken>>,
        popularity: &mut BTreeMap<SlotToken, u32>,
    ) -> Option<AssignmentResult> {
        let eligible: Vec<&MentorRecord> = mentors
            .iter()
            .filter(|m| m.supports(student.track))
            .collect();
        if eligible.is_empty() {
            return None;
        }

        let slots = self.slot_scan_order(student, &eligible, remaining, popularity);

        for slot in &slots {
            let candidates: Vec<&str> = eligible
                .iter()
                .filter(|m| remaining.get(&m.name).is_some_and(|r| r.contains(slot)))
                .map(|m| m.name.as_str())
                .collect();
            if candidates.is_empty() {
                continue;
            }

            let chosen = match self.mode {
                MatchMode::Simple => pick_first_fit(&candidates, prior),
                MatchMode::GapAverse => self.pick_best_scored(&candidates, slot, prior, committed),
            };

            remaining
                .get_mut(chosen)
                .expect("candidate came from remaining")
                .remove(slot.as_str());
            committed
                .get_mut(chosen)
                .expect("every mentor has a committed set")
                .insert(slot.clone());
            *popularity.entry(slot.clone()).or_insert(0) += 1;

            return Some(AssignmentResult::matched(student, chosen, slot));
        }
        None
    }

    /// The slot scan order for one student.
    ///
    /// Simple mode scans every requested slot in canonical grid order
    /// (the stable, documented stand-in for "arbitrary set order").
    /// Gap-averse mode pre-filters to the feasible set (slots some
    /// eligible mentor still has) and tries already-popular slots
    /// first, concentrating matches instead of spreading them thin;
    /// popularity ties keep canonical order.
    fn slot_scan_order(
        &self,
        student: &StudentRequest,
        eligible: &[&MentorRecord],
        remaining: &BTreeMap<String, BTreeSet<SlotToken>>,
        popularity: &BTreeMap<SlotToken, u32>,
    ) -> Vec<SlotToken> {
        let mut slots: Vec<SlotToken> = match self.mode {
            MatchMode::Simple => student.availability.iter().cloned().collect(),
            MatchMode::GapAverse => student
                .availability
                .iter()
                .filter(|slot| {
                    eligible
                        .iter()
                        .any(|m| remaining.get(&m.name).is_some_and(|r| r.contains(*slot)))
                })
                .cloned()
                .collect(),
        };
        self.grid.sort_chronological(&mut slots);
        if self.mode == MatchMode::GapAverse {
            slots.sort_by_key(|slot| Reverse(popularity.get(slot).copied().unwrap_or(0)));
        }
        slots
    }

    /// Gap-averse candidate choice: highest score wins.
    fn pick_best_scored<'a>(
        &mut self,
        candidates: &[&'a str],
        slot: &str,
        prior: Option<&str>,
        committed: &BTreeMap<String, BTreeSet<SlotToken>>,
    ) -> &'a str {
        let mut best = candidates[0];
        let mut best_score = f64::NEG_INFINITY;
        for &candidate in candidates {
            let score = self.score_candidate(candidate, slot, prior, &committed[candidate]);
            if score > best_score {
                best = candidate;
                best_score = score;
            }
        }
        best
    }

    /// One candidate's score for one slot:
    ///   - prior-mentor bonus, dominant over everything else combined;
    ///   - contiguity bonus when the mentor already holds the adjacent
    ///     slot that day, otherwise a penalty for any non-adjacent
    ///     same-day commitment (a gapped daily schedule);
    ///   - small bonus for commitments on other days (reuse engaged
    ///     mentors before recruiting idle ones);
    ///   - tiny seeded jitter so exact ties break randomly but
    ///     reproducibly.
    fn score_candidate(
        &mut self,
        candidate: &str,
        slot: &str,
        prior: Option<&str>,
        committed: &BTreeSet<SlotToken>,
    ) -> f64 {
        let w = &self.weights;
        let mut score = 0.0;
        if prior == Some(candidate) {
            score += w.prior_mentor;
        }

        let slot_day = self.grid.day_of(slot);
        let mut any_adjacent = false;
        let mut any_same_day = false;
        let mut any_other_day = false;
        for held in committed {
            if self.grid.adjacent(held, slot) {
                any_adjacent = true;
            }
            match (slot_day, self.grid.day_of(held)) {
                (Some(a), Some(b)) if a == b => any_same_day = true,
                _ => any_other_day = true,
            }
        }

        if any_adjacent {
            score += w.adjacent;
        } else if any_same_day {
            score += w.same_day_gap;
        }
        if any_other_day {
            score += w.cross_day;
        }

        score + self.rng.next_f64() * w.jitter
    }
}

/// Simple-mode candidate choice: the prior mentor, when present among
/// this slot's candidates, is a forced first choice; otherwise the
/// first candidate in roster order wins.
fn pick_first_fit<'a>(candidates: &[&'a str], prior: Option<&str>) -> &'a str {
    if let Some(prior_name) = prior {
        if let Some(&found) = candidates.iter().find(|&&c| c == prior_name) {
            return found;
        }
    }
    candidates[0]
}

/// Precondition guard for callers: an empty student or mentor
/// collection is a non-fatal "insufficient data" condition, not an
/// engine failure. Callers check this and skip the run; the engine
/// itself also tolerates empty input and short-circuits.
pub fn check_inputs(
    students: &[StudentRequest],
    mentors: &[MentorRecord],
) -> crate::error::MatchResult<()> {
    if students.is_empty() {
        return Err(crate::error::MatchError::InsufficientData(
            "no student requests loaded",
        ));
    }
    if mentors.is_empty() {
        return Err(crate::error::MatchError::InsufficientData(
            "no mentor records loaded",
        ));
    }
    Ok(())
}

/// The most recent committed pairing for a student: the last-appended
/// history row bearing that name.
pub fn prior_mentor<'h>(history: &'h [HistoryEntry], student: &str) -> Option<&'h str> {
    history
        .iter()
        .rev()
        .find(|h| h.student_name == student)
        .map(|h| h.mentor_name.as_str())
}
