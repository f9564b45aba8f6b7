//! Weekly community-voted bracket and its day-to-round schedule.

use crate::models::bracket::{Bracket, BracketError};
use crate::models::tally::VoteTally;
use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Errors for the weekly bracket workflow.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WeeklyError {
    /// No weekly bracket has been started.
    NoWeeklyBracket,
    NotAdmin,
    /// One ballot per participant per round.
    AlreadyVoted { round: usize },
    /// The final has been decided; nothing left to vote on or advance.
    Completed,
    Bracket(BracketError),
}

impl std::fmt::Display for WeeklyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeeklyError::NoWeeklyBracket => write!(f, "No weekly bracket is running"),
            WeeklyError::NotAdmin => write!(f, "Only an admin can do that"),
            WeeklyError::AlreadyVoted { round } => {
                write!(f, "You already voted in round {}", round + 1)
            }
            WeeklyError::Completed => write!(f, "The weekly bracket is finished"),
            WeeklyError::Bracket(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WeeklyError {}

impl From<BracketError> for WeeklyError {
    fn from(e: BracketError) -> Self {
        WeeklyError::Bracket(e)
    }
}

/// Fixed mapping weekday -> round index open for voting, Monday first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayToRoundMap(pub [usize; 7]);

impl DayToRoundMap {
    pub fn round_for(&self, day: Weekday) -> usize {
        self.0[day.num_days_from_monday() as usize]
    }

    /// Same map with every value capped at `last_round`.
    pub fn clamped(&self, last_round: usize) -> Self {
        let mut days = self.0;
        for d in days.iter_mut() {
            *d = (*d).min(last_round);
        }
        Self(days)
    }
}

impl Default for DayToRoundMap {
    /// Monday opens round 0, one round per weekday; the weekend stays on round 4.
    fn default() -> Self {
        Self([0, 1, 2, 3, 4, 4, 4])
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeeklyStatus {
    #[default]
    Voting,
    Completed,
}

/// The single community bracket advanced on a schedule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeeklyBracket {
    pub id: Uuid,
    pub title: String,
    pub bracket: Bracket,
    pub tally: VoteTally,
    /// Round currently open for voting.
    pub current_round: usize,
    /// Round index -> participants who already voted in it.
    pub voters: BTreeMap<usize, BTreeSet<String>>,
    pub schedule: DayToRoundMap,
    pub status: WeeklyStatus,
    pub started_at: DateTime<Utc>,
}

impl WeeklyBracket {
    pub fn has_voted(&self, round: usize, participant_id: &str) -> bool {
        self.voters
            .get(&round)
            .map_or(false, |set| set.contains(participant_id))
    }

    pub fn last_round(&self) -> usize {
        self.bracket.round_count() - 1
    }
}
