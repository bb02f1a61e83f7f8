//! Deployment configuration: the slot universe and the gap-averse
//! scoring weights. Loaded from a JSON file, with compiled-in defaults
//! matching the original deployment.

use crate::error::{MatchError, MatchResult};
use serde::{Deserialize, Serialize};

/// One block of day labels sharing an hour range.
/// Hours are start inclusive, end exclusive: 17..22 generates
/// 17:00-18:00 through 21:00-22:00.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRange {
    pub labels: Vec<String>,
    pub start_hour: u8,
    pub end_hour: u8,
}

/// The full slot universe: a weekday block followed by a weekend block,
/// concatenated in label-list order then hour order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub weekday: DayRange,
    pub weekend: DayRange,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            weekday: DayRange {
                labels: ["Mon", "Tue", "Wed", "Thu", "Fri"]
                    .map(String::from)
                    .to_vec(),
                start_hour: 17,
                end_hour: 22,
            },
            weekend: DayRange {
                labels: ["Sat", "Sun"].map(String::from).to_vec(),
                start_hour: 10,
                end_hour: 23,
            },
        }
    }
}

/// Gap-averse candidate scoring weights.
///
/// The behavioral contract is the relative ordering, not the numbers:
/// `prior_mentor` dominates everything else combined, `adjacent` beats
/// `cross_day`, `same_day_gap` is negative, and `jitter` is smaller
/// than any other distinction (pure tie-break).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub prior_mentor: f64,
    pub adjacent: f64,
    pub same_day_gap: f64,
    pub cross_day: f64,
    pub jitter: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            prior_mentor: 1000.0,
            adjacent: 50.0,
            same_day_gap: -20.0,
            cross_day: 5.0,
            jitter: 0.001,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub weights: ScoringWeights,
}

impl MatchConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &str) -> MatchResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| MatchError::Config(format!("cannot read {path}: {e}")))?;
        let config: MatchConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> MatchResult<()> {
        for range in [&self.grid.weekday, &self.grid.weekend] {
            if range.start_hour >= range.end_hour {
                return Err(MatchError::Config(format!(
                    "hour range {}..{} is empty",
                    range.start_hour, range.end_hour
                )));
            }
        }
        if self.weights.jitter < 0.0 {
            return Err(MatchError::Config("jitter must be >= 0".into()));
        }
        Ok(())
    }
}
