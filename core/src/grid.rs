//! The time grid: the finite universe of schedulable slots and the
//! canonical ordering over them.
//!
//! RULE: Only the grid decides slot order and adjacency.
//! Records carry slot tokens as plain strings; everything that needs
//! chronology (engine scanning, result ordering, manager selection)
//! asks the grid.
//!
//! Tokens outside the universe never panic anything: they sort last
//! (deterministically, by token text) and are never adjacent to
//! anything. This covers legacy tokens from old deployments and
//! hand-edited assignment rows.

use crate::config::GridConfig;
use crate::types::SlotToken;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Parse a single slot token of the form `"<label> <H>:00-<H+1>:00"`.
/// Returns the day label and start hour, or None for malformed input.
pub fn parse_token(token: &str) -> Option<(&str, u8)> {
    let (label, hours) = token.rsplit_once(' ')?;
    if label.is_empty() {
        return None;
    }
    let (start, end) = hours.split_once('-')?;
    let start_hour: u8 = start.strip_suffix(":00")?.parse().ok()?;
    let end_hour: u8 = end.strip_suffix(":00")?.parse().ok()?;
    if start_hour.checked_add(1) != Some(end_hour) {
        return None;
    }
    Some((label, start_hour))
}

/// Split a comma-joined availability string into well-formed tokens.
/// Malformed tokens are dropped, never propagated: one bad token must
/// not abort the whole record.
pub fn parse_availability(raw: &str) -> BTreeSet<SlotToken> {
    let mut slots = BTreeSet::new();
    for piece in raw.split(',') {
        let token = piece.trim();
        if token.is_empty() {
            continue;
        }
        if parse_token(token).is_some() {
            slots.insert(token.to_string());
        } else {
            log::debug!("dropping malformed slot token: {token:?}");
        }
    }
    slots
}

pub struct SlotGrid {
    /// Every token in canonical order: weekday block then weekend block,
    /// label-list order then hour order.
    universe: Vec<SlotToken>,
    /// Token -> position in `universe`.
    positions: HashMap<SlotToken, usize>,
    /// Day label -> index in the configured day ordering.
    day_index: HashMap<String, usize>,
}

impl SlotGrid {
    pub fn build(config: &GridConfig) -> Self {
        let mut universe = Vec::new();
        let mut day_index = HashMap::new();

        for range in [&config.weekday, &config.weekend] {
            for label in &range.labels {
                let next = day_index.len();
                day_index.entry(label.clone()).or_insert(next);
                for hour in range.start_hour..range.end_hour {
                    universe.push(format!("{label} {hour}:00-{}:00", hour + 1));
                }
            }
        }

        let positions = universe
            .iter()
            .enumerate()
            .map(|(i, token)| (token.clone(), i))
            .collect();

        Self {
            universe,
            positions,
            day_index,
        }
    }

    pub fn universe(&self) -> &[SlotToken] {
        &self.universe
    }

    /// Position in the canonical ordering, None for unknown tokens.
    pub fn position(&self, token: &str) -> Option<usize> {
        self.positions.get(token).copied()
    }

    /// Day label of a known token.
    pub fn day_of<'t>(&self, token: &'t str) -> Option<&'t str> {
        self.position(token)
            .map(|_| parse_token(token).expect("universe tokens are well-formed").0)
    }

    /// Index of a day label in the configured day ordering.
    pub fn day_position(&self, label: &str) -> Option<usize> {
        self.day_index.get(label).copied()
    }

    /// Two slots are adjacent iff they are consecutive in the universe
    /// AND share the same day label. The boundary between days never
    /// counts as adjacent.
    pub fn adjacent(&self, a: &str, b: &str) -> bool {
        let (Some(pa), Some(pb)) = (self.position(a), self.position(b)) else {
            return false;
        };
        if pa.abs_diff(pb) != 1 {
            return false;
        }
        self.day_of(a) == self.day_of(b)
    }

    /// Canonical comparison: universe order first, unknown tokens last
    /// (ordered among themselves by token text so sorting stays
    /// deterministic).
    pub fn cmp_tokens(&self, a: &str, b: &str) -> Ordering {
        match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => pa.cmp(&pb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }

    /// Sort tokens chronologically, unknown tokens last.
    pub fn sort_chronological(&self, tokens: &mut [SlotToken]) {
        tokens.sort_by(|a, b| self.cmp_tokens(a, b));
    }
}
