//! Prediction pools: entries, scoring rules and PoolError.

use crate::models::bracket::{Bracket, BracketError};
use crate::models::entry::Entry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pool.
pub type PoolId = Uuid;

/// Errors for the pool workflow. These go straight back to the participant.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PoolError {
    PoolNotFound,
    /// Pool no longer accepts joins or predictions.
    PoolClosed,
    /// Only the host (or an admin, for results) may do this.
    NotHost,
    AlreadyJoined,
    NotJoined,
    /// Predictions are immutable once submitted.
    AlreadySubmitted,
    InvalidPrediction(String),
    InvalidSleeper(String),
    Bracket(BracketError),
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolError::PoolNotFound => write!(f, "Pool not found"),
            PoolError::PoolClosed => write!(f, "Pool is closed"),
            PoolError::NotHost => write!(f, "Only the pool host can do that"),
            PoolError::AlreadyJoined => write!(f, "You have already joined this pool"),
            PoolError::NotJoined => write!(f, "You have not joined this pool"),
            PoolError::AlreadySubmitted => write!(f, "Predictions were already submitted"),
            PoolError::InvalidPrediction(reason) => write!(f, "Invalid prediction: {}", reason),
            PoolError::InvalidSleeper(reason) => write!(f, "Invalid sleeper pick: {}", reason),
            PoolError::Bracket(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PoolError {}

impl From<BracketError> for PoolError {
    fn from(e: BracketError) -> Self {
        PoolError::Bracket(e)
    }
}

/// Points per round index.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundPoints(pub Vec<u32>);

impl RoundPoints {
    /// `[1, 2, 4, ...]`, one weight per round.
    pub fn doubling(rounds: usize) -> Self {
        Self((0..rounds).map(|r| 1u32 << r).collect())
    }

    /// Weight for round `r`; rounds past the configured list fall back to `2^r`.
    pub fn for_round(&self, round: usize) -> u32 {
        self.0.get(round).copied().unwrap_or(1u32 << round.min(31))
    }
}

impl Default for RoundPoints {
    fn default() -> Self {
        Self::doubling(6)
    }
}

/// Sleeper bonus settings. A sleeper hits when its seed appears anywhere in
/// the target round of the results.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SleeperConfig {
    pub enabled: bool,
    #[serde(default = "default_sleeper1_round")]
    pub sleeper1_round: usize,
    #[serde(default = "default_sleeper1_points")]
    pub sleeper1_points: u32,
    #[serde(default = "default_sleeper2_round")]
    pub sleeper2_round: usize,
    #[serde(default = "default_sleeper2_points")]
    pub sleeper2_points: u32,
}

fn default_sleeper1_round() -> usize {
    2
}

fn default_sleeper1_points() -> u32 {
    5
}

fn default_sleeper2_round() -> usize {
    3
}

fn default_sleeper2_points() -> u32 {
    10
}

impl Default for SleeperConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sleeper1_round: default_sleeper1_round(),
            sleeper1_points: default_sleeper1_points(),
            sleeper2_round: default_sleeper2_round(),
            sleeper2_points: default_sleeper2_points(),
        }
    }
}

/// How a pool is scored.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    #[serde(default)]
    pub round_points: RoundPoints,
    #[serde(default)]
    pub sleepers: SleeperConfig,
}

impl ScoringRules {
    pub fn for_bracket(bracket: &Bracket) -> Self {
        Self {
            round_points: RoundPoints::doubling(bracket.round_count()),
            sleepers: SleeperConfig::default(),
        }
    }
}

/// Result of scoring one entry.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct EntryScore {
    pub score: u32,
    pub sleeper1_hit: bool,
    pub sleeper2_hit: bool,
}

/// One participant's row in a pool.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub participant_id: String,
    pub display_name: String,
    pub predictions: Option<Bracket>,
    pub sleeper1: Option<Entry>,
    pub sleeper2: Option<Entry>,
    pub score: u32,
    pub sleeper1_hit: bool,
    pub sleeper2_hit: bool,
    pub joined_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl PoolEntry {
    /// Empty entry created on join.
    pub fn new(
        participant_id: impl Into<String>,
        display_name: impl Into<String>,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            display_name: display_name.into(),
            predictions: None,
            sleeper1: None,
            sleeper2: None,
            score: 0,
            sleeper1_hit: false,
            sleeper2_hit: false,
            joined_at,
            submitted_at: None,
        }
    }

    pub fn has_submitted(&self) -> bool {
        self.predictions.is_some()
    }

    pub fn apply_score(&mut self, s: EntryScore) {
        self.score = s.score;
        self.sleeper1_hit = s.sleeper1_hit;
        self.sleeper2_hit = s.sleeper2_hit;
    }
}

/// Whether the pool still accepts joins and predictions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolStatus {
    #[default]
    Open,
    Closed,
}

/// A multi-participant prediction contest over one published bracket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub name: String,
    pub host_id: String,
    /// Published bracket this pool predicts.
    pub bracket_id: Uuid,
    pub join_code: String,
    pub status: PoolStatus,
    pub rules: ScoringRules,
    /// Authoritative results; starts as the empty seeded tree.
    pub results: Bracket,
    /// Entries in join order.
    pub entries: Vec<PoolEntry>,
    pub created_at: DateTime<Utc>,
}

impl Pool {
    pub fn entry(&self, participant_id: &str) -> Option<&PoolEntry> {
        self.entries.iter().find(|e| e.participant_id == participant_id)
    }

    pub fn entry_mut(&mut self, participant_id: &str) -> Option<&mut PoolEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.participant_id == participant_id)
    }

    pub fn is_host(&self, participant_id: &str) -> bool {
        self.host_id == participant_id
    }
}
