//! Vote tallies and plurality round resolution.

use crate::logic::progression::advance_winner;
use crate::models::{Bracket, BracketError, Slot, SlotCounts, VoteTally};

/// Zeroed tally with one row per matchup in every round.
pub fn init_tally(bracket: &Bracket) -> VoteTally {
    VoteTally::with_matchups(bracket.rounds().iter().flatten().map(|m| m.id.clone()))
}

/// Add one vote for `slot` in `matchup_id`. Unknown ids are rejected and the tally is left alone.
///
/// Not idempotent: preventing a participant from voting twice is the caller's job.
pub fn record_vote(tally: &mut VoteTally, matchup_id: &str, slot: Slot) -> Result<(), BracketError> {
    if tally.increment(matchup_id, slot) {
        Ok(())
    } else {
        Err(BracketError::UnknownMatchup(matchup_id.to_string()))
    }
}

/// Record each vote on its own. Returns the rejected ones; accepted votes stay counted.
pub fn record_votes<'a, I>(tally: &mut VoteTally, votes: I) -> Vec<BracketError>
where
    I: IntoIterator<Item = (&'a str, Slot)>,
{
    votes
        .into_iter()
        .filter_map(|(id, slot)| record_vote(tally, id, slot).err())
        .collect()
}

/// Decide every undecided matchup in `round` by plurality (entry1 wins ties) and move
/// each winner into the next round. Matchups that already have a winner are untouched,
/// so calling this again on a decided round changes nothing.
///
/// A matchup with only one entry goes to that entry; a matchup with none is skipped.
pub fn resolve_round(
    bracket: &Bracket,
    tally: &VoteTally,
    round: usize,
) -> Result<Bracket, BracketError> {
    if round >= bracket.round_count() {
        return Err(BracketError::RoundOutOfRange { round });
    }
    let mut next = bracket.clone();
    let rounds = next.rounds_mut();
    for m in 0..rounds[round].len() {
        let matchup = &rounds[round][m];
        if matchup.winner.is_some() {
            continue;
        }
        let counts: SlotCounts = tally.counts(&matchup.id).unwrap_or_default();
        let slot = match (&matchup.entry1, &matchup.entry2) {
            (Some(_), Some(_)) => counts.leader(),
            (Some(_), None) => Slot::One,
            (None, Some(_)) => Slot::Two,
            (None, None) => continue,
        };
        log::debug!(
            "{}: {} - {} -> slot {}",
            matchup.id,
            counts.entry1,
            counts.entry2,
            slot
        );
        rounds[round][m].winner = Some(slot);
        if let Some(winner) = rounds[round][m].entry(slot).cloned() {
            advance_winner(rounds, round, m, winner);
        }
    }
    Ok(next)
}
