//! Data structures: entries, matchups, the bracket tree, tallies, pools and the weekly bracket.

mod bracket;
mod entry;
mod matchup;
mod pool;
mod published;
mod tally;
mod weekly;

pub use bracket::{is_valid_field_size, Bracket, BracketError};
pub use entry::{Entry, Seed};
pub use matchup::{matchup_id, Matchup, Round, Slot};
pub use pool::{
    EntryScore, Pool, PoolEntry, PoolError, PoolId, PoolStatus, RoundPoints, ScoringRules,
    SleeperConfig,
};
pub use published::{
    BracketId, Category, PublishedBracket, Submission, SubmissionId, ANONYMOUS, BRACKET_SIZES,
};
pub use tally::{SlotCounts, VoteTally};
pub use weekly::{DayToRoundMap, WeeklyBracket, WeeklyError, WeeklyStatus};
