//! Shared primitive types used across the entire crate.

/// A bookable slot token, e.g. `"Mon 17:00-18:00"`.
/// Tokens outside the configured universe are carried as-is and sort last.
pub type SlotToken = String;

/// The canonical matching-run identifier.
pub type RunId = String;
