//! Scheduled advancement: weekday -> expected round, and catching up elapsed rounds.

use crate::logic::voting::resolve_round;
use crate::models::{Bracket, BracketError, DayToRoundMap, VoteTally};
use chrono::{DateTime, Datelike, Utc};

/// Source of "now" for scheduled advancement.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Round that should be open for voting on `now`'s weekday.
pub fn expected_round<D: Datelike>(now: &D, map: &DayToRoundMap) -> usize {
    map.round_for(now.weekday())
}

/// Outcome of `catch_up`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CatchUp {
    pub bracket: Bracket,
    pub current_round: usize,
    /// False when nothing was resolved.
    pub advanced: bool,
}

/// Resolve every round from `current_round` up to (not including) `expected_round`, one
/// at a time in order, since each round's entries come from the one before.
///
/// `expected_round` is capped at the final's index, so the final itself is never
/// resolved here. A no-op when `current_round` has already reached the target.
pub fn catch_up(
    bracket: &Bracket,
    tally: &VoteTally,
    current_round: usize,
    expected_round: usize,
) -> Result<CatchUp, BracketError> {
    let last = bracket.round_count() - 1;
    let target = expected_round.min(last);
    if current_round >= target {
        return Ok(CatchUp {
            bracket: bracket.clone(),
            current_round,
            advanced: false,
        });
    }
    let mut next = bracket.clone();
    for r in current_round..target {
        log::debug!("Catching up: resolving round {}", r);
        next = resolve_round(&next, tally, r)?;
    }
    Ok(CatchUp {
        bracket: next,
        current_round: target,
        advanced: true,
    })
}
