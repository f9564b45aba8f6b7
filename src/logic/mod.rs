//! Bracket business logic: seeding, progression, voting, scheduled advancement, scoring and pools.

mod pool;
mod progression;
mod schedule;
mod scoring;
mod seeding;
mod voting;
mod weekly;

pub use pool::{
    close_pool, create_pool, generate_join_code, join_pool, leaderboard, record_result,
    set_results, submit_predictions,
};
pub use progression::{champion, is_complete, round_name, select_winner};
pub use schedule::{catch_up, expected_round, CatchUp, Clock, FixedClock, SystemClock};
pub use scoring::{score_entry, score_pool, score_predictions, sleeper_hits};
pub use seeding::{build_empty_tree, build_initial_round, seed_order};
pub use voting::{init_tally, record_vote, record_votes, resolve_round};
pub use weekly::{advance_weekly, cast_ballot, check_and_auto_advance, start_weekly, BallotReceipt};
