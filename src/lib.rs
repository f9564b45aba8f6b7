//! Bracket web app: library with models, bracket engine, pools and the weekly bracket.

pub mod config;
pub mod export;
pub mod logic;
pub mod models;
pub mod store;

pub use config::ServerConfig;
pub use logic::{
    advance_weekly, build_empty_tree, build_initial_round, cast_ballot, catch_up, champion,
    check_and_auto_advance, close_pool, create_pool, expected_round, generate_join_code,
    init_tally, is_complete, join_pool, leaderboard, record_result, record_vote, record_votes,
    resolve_round, round_name, score_entry, score_pool, score_predictions, seed_order,
    select_winner, set_results, sleeper_hits, start_weekly, submit_predictions, BallotReceipt,
    CatchUp, Clock, FixedClock, SystemClock,
};
pub use models::{
    Bracket, BracketError, BracketId, Category, DayToRoundMap, Entry, EntryScore, Matchup, Pool,
    PoolEntry, PoolError, PoolId, PoolStatus, PublishedBracket, Round, RoundPoints, ScoringRules,
    Seed, SleeperConfig, Slot, SlotCounts, Submission, VoteTally, WeeklyBracket, WeeklyError,
    WeeklyStatus,
};
pub use store::{NewBracket, Store, StoreError};
