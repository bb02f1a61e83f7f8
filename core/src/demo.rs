//! Deterministic demo-data generation using curated name lists.
//!
//! Used by the CLI's --demo flag and by tests to stand in for real
//! form submissions. All generation is deterministic (same seed =
//! same roster).

use crate::grid::SlotGrid;
use crate::model::{MentorRecord, StudentRequest, Track};
use crate::rng::MatchRng;
use std::collections::{BTreeSet, HashSet};

pub struct DemoData;

impl DemoData {
    /// Generate `count` students with distinct names, each with a
    /// non-empty availability set drawn from the grid universe.
    pub fn students(rng: &mut MatchRng, grid: &SlotGrid, count: usize) -> Vec<StudentRequest> {
        let mut used = HashSet::new();
        (0..count)
            .map(|i| {
                let name = Self::unique_name(rng, &mut used, i);
                let school = Self::pick(rng, Self::schools()).to_string();
                let grade = Self::pick(rng, Self::grades()).to_string();
                let track = match rng.next_u64_below(10) {
                    0..=3 => Track::Humanities,
                    4..=7 => Track::Science,
                    _ => Track::Undecided,
                };
                StudentRequest {
                    name,
                    school,
                    grade,
                    track,
                    wants_same_mentor: rng.chance(0.25),
                    requested_mentor: String::new(),
                    question: String::new(),
                    availability: Self::slot_subset(rng, grid, 2, 6),
                }
            })
            .collect()
    }

    /// Generate `count` mentors; roughly a third support both tracks.
    pub fn mentors(rng: &mut MatchRng, grid: &SlotGrid, count: usize) -> Vec<MentorRecord> {
        let mut used = HashSet::new();
        (0..count)
            .map(|i| {
                let name = Self::unique_name(rng, &mut used, i);
                let tracks: BTreeSet<Track> = if rng.chance(0.3) {
                    [Track::Humanities, Track::Science].into_iter().collect()
                } else if rng.chance(0.5) {
                    [Track::Humanities].into_iter().collect()
                } else {
                    [Track::Science].into_iter().collect()
                };
                MentorRecord {
                    name,
                    tracks,
                    availability: Self::slot_subset(rng, grid, 4, 10),
                }
            })
            .collect()
    }

    /// Draw between `min` and `max` distinct slots from the universe.
    fn slot_subset(rng: &mut MatchRng, grid: &SlotGrid, min: u64, max: u64) -> BTreeSet<String> {
        let universe = grid.universe();
        let target = min + rng.next_u64_below(max - min + 1);
        let mut slots = BTreeSet::new();
        for _ in 0..target {
            let index = rng.next_u64_below(universe.len() as u64) as usize;
            slots.insert(universe[index].clone());
        }
        slots
    }

    /// Names are record keys, so collisions would silently overwrite;
    /// retry a few draws and fall back to a numbered suffix.
    fn unique_name(rng: &mut MatchRng, used: &mut HashSet<String>, index: usize) -> String {
        for _ in 0..10 {
            let candidate = format!(
                "{} {}",
                Self::pick(rng, Self::first_names()),
                Self::pick(rng, Self::last_names())
            );
            if used.insert(candidate.clone()) {
                return candidate;
            }
        }
        let fallback = format!(
            "{} {} {}",
            Self::pick(rng, Self::first_names()),
            Self::pick(rng, Self::last_names()),
            index
        );
        used.insert(fallback.clone());
        fallback
    }

    fn pick<'a>(rng: &mut MatchRng, list: &[&'a str]) -> &'a str {
        list[rng.next_u64_below(list.len() as u64) as usize]
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "Akira", "Haruto", "Yuto", "Sota", "Ren", "Kaito", "Riku", "Hinata",
            "Yui", "Aoi", "Sakura", "Mio", "Rin", "Hana", "Mei", "Koharu",
            "Daniel", "Emma", "Lucas", "Sofia", "Noah", "Mia", "Ethan", "Lily",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Sato", "Suzuki", "Takahashi", "Tanaka", "Watanabe", "Ito", "Yamamoto",
            "Nakamura", "Kobayashi", "Kato", "Yoshida", "Yamada", "Sasaki", "Yamaguchi",
            "Matsumoto", "Inoue", "Kimura", "Hayashi", "Shimizu", "Saito",
        ]
    }

    fn schools() -> &'static [&'static str] {
        &[
            "North High", "Riverside Junior High", "Sakura Gakuen", "Central Academy",
            "Meiwa High", "Hillcrest Junior High",
        ]
    }

    fn grades() -> &'static [&'static str] {
        &["J1", "J2", "J3", "S1", "S2", "S3"]
    }
}
