//! Weekly bracket: admin start, one ballot per participant per round, manual and scheduled advancement.

use crate::logic::schedule::{catch_up, expected_round, Clock};
use crate::logic::seeding::build_empty_tree;
use crate::logic::voting::{init_tally, record_vote, resolve_round};
use crate::models::{DayToRoundMap, Slot, WeeklyBracket, WeeklyError, WeeklyStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// What happened to a ballot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BallotReceipt {
    pub round: usize,
    pub accepted: usize,
    /// Ids of votes that named a matchup outside the open round or repeated one.
    pub rejected: Vec<String>,
}

/// Seed a new weekly bracket from `names`, round 0 open. Admin only.
pub fn start_weekly<S: AsRef<str>>(
    title: impl Into<String>,
    names: &[S],
    schedule: DayToRoundMap,
    requester: &str,
    is_admin: &dyn Fn(&str) -> bool,
    now: DateTime<Utc>,
) -> Result<WeeklyBracket, WeeklyError> {
    if !is_admin(requester) {
        return Err(WeeklyError::NotAdmin);
    }
    let bracket = build_empty_tree(names)?;
    let tally = init_tally(&bracket);
    let last = bracket.round_count() - 1;
    let weekly = WeeklyBracket {
        id: Uuid::new_v4(),
        title: title.into(),
        bracket,
        tally,
        current_round: 0,
        voters: BTreeMap::new(),
        schedule: schedule.clamped(last),
        status: WeeklyStatus::Voting,
        started_at: now,
    };
    log::info!(
        "Weekly bracket {} started with {} entries",
        weekly.id,
        names.len()
    );
    Ok(weekly)
}

/// Count one participant's ballot for the open round.
///
/// Each vote stands alone: a vote for a matchup outside the open round, or a second
/// vote for a matchup already counted in this ballot, is rejected without affecting
/// the others. The participant is marked as having voted once any
/// vote is accepted.
pub fn cast_ballot(
    weekly: &mut WeeklyBracket,
    participant_id: &str,
    votes: &[(String, Slot)],
) -> Result<BallotReceipt, WeeklyError> {
    if weekly.status == WeeklyStatus::Completed {
        return Err(WeeklyError::Completed);
    }
    let round = weekly.current_round;
    if weekly.has_voted(round, participant_id) {
        return Err(WeeklyError::AlreadyVoted { round });
    }
    let mut accepted = 0;
    let mut rejected = Vec::new();
    let mut counted: BTreeSet<&str> = BTreeSet::new();
    for (id, slot) in votes {
        let in_round = matches!(weekly.bracket.position_of(id), Some((r, _)) if r == round);
        if in_round
            && !counted.contains(id.as_str())
            && record_vote(&mut weekly.tally, id, *slot).is_ok()
        {
            counted.insert(id.as_str());
            accepted += 1;
        } else {
            rejected.push(id.clone());
        }
    }
    if accepted > 0 {
        weekly
            .voters
            .entry(round)
            .or_default()
            .insert(participant_id.to_string());
    }
    Ok(BallotReceipt {
        round,
        accepted,
        rejected,
    })
}

/// Resolve the open round now and open the next one; resolving the final completes
/// the bracket. Admin only.
pub fn advance_weekly(
    weekly: &mut WeeklyBracket,
    requester: &str,
    is_admin: &dyn Fn(&str) -> bool,
) -> Result<(), WeeklyError> {
    if !is_admin(requester) {
        return Err(WeeklyError::NotAdmin);
    }
    if weekly.status == WeeklyStatus::Completed {
        return Err(WeeklyError::Completed);
    }
    let round = weekly.current_round;
    weekly.bracket = resolve_round(&weekly.bracket, &weekly.tally, round)?;
    if round >= weekly.last_round() {
        weekly.status = WeeklyStatus::Completed;
        log::info!("Weekly bracket {} completed", weekly.id);
    } else {
        weekly.current_round = round + 1;
        log::info!("Weekly bracket {} advanced to round {}", weekly.id, round + 1);
    }
    Ok(())
}

/// Catch up every round the schedule says should be decided by now.
/// Safe to call repeatedly: returns false when nothing was due.
pub fn check_and_auto_advance(
    weekly: &mut WeeklyBracket,
    clock: &dyn Clock,
) -> Result<bool, WeeklyError> {
    if weekly.status == WeeklyStatus::Completed {
        return Ok(false);
    }
    let expected = expected_round(&clock.now(), &weekly.schedule);
    let outcome = catch_up(
        &weekly.bracket,
        &weekly.tally,
        weekly.current_round,
        expected,
    )?;
    if outcome.advanced {
        log::info!(
            "Weekly bracket {} auto-advanced from round {} to {}",
            weekly.id,
            weekly.current_round,
            outcome.current_round
        );
        weekly.bracket = outcome.bracket;
        weekly.current_round = outcome.current_round;
    }
    Ok(outcome.advanced)
}
