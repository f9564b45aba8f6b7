//! Winner selection and propagation through later rounds.
//!
//! Every function takes the current tree by reference and returns a new one, so
//! a caller's copy is never modified (and an error leaves it exactly as it was).

use crate::models::{Bracket, BracketError, Entry, Round, Slot};

/// Pick `slot` as the winner of `bracket[round][matchup]`.
///
/// 1. The matchup's winner becomes `slot`.
/// 2. The winner moves into round `round + 1`, matchup `matchup / 2` (slot 1 from an
///    even matchup, slot 2 from an odd one), and that matchup's own winner is cleared.
/// 3. Rounds from `round + 2` on are wiped.
/// 4. Those rounds are re-derived from the winners still standing in the round before.
pub fn select_winner(
    bracket: &Bracket,
    round: usize,
    matchup: usize,
    slot: Slot,
) -> Result<Bracket, BracketError> {
    let selected = bracket
        .matchup(round, matchup)
        .ok_or(BracketError::MatchupOutOfRange { round, matchup })?
        .entry(slot)
        .cloned()
        .ok_or(BracketError::EmptySlot { round, matchup, slot })?;

    let mut next = bracket.clone();
    let rounds = next.rounds_mut();
    rounds[round][matchup].winner = Some(slot);
    advance_winner(rounds, round, matchup, selected);

    for later in rounds.iter_mut().skip(round + 2) {
        for m in later.iter_mut() {
            m.clear();
        }
    }
    for r in (round + 2)..rounds.len() {
        rederive_round(rounds, r);
    }
    Ok(next)
}

/// Place `winner` into the next round's feeding slot and clear that matchup's winner.
/// No-op on the final.
pub(crate) fn advance_winner(
    rounds: &mut [Round],
    round: usize,
    matchup: usize,
    winner: Entry,
) {
    if let Some(next_round) = rounds.get_mut(round + 1) {
        let target = &mut next_round[matchup / 2];
        target.set_entry(Slot::feeding(matchup), Some(winner));
        target.winner = None;
    }
}

/// Fill round `r` (r >= 1) from round `r - 1`'s current winners. Winners stay unset.
fn rederive_round(rounds: &mut [Round], r: usize) {
    let (before, after) = rounds.split_at_mut(r);
    let prev = &before[r - 1];
    for (m, target) in after[0].iter_mut().enumerate() {
        if let Some(e) = prev.get(2 * m).and_then(|p| p.winning_entry()) {
            target.entry1 = Some(e.clone());
        }
        if let Some(e) = prev.get(2 * m + 1).and_then(|p| p.winning_entry()) {
            target.entry2 = Some(e.clone());
        }
    }
}

/// True iff the final has a winner.
pub fn is_complete(bracket: &Bracket) -> bool {
    bracket.is_complete()
}

/// The final's winner, if any.
pub fn champion(bracket: &Bracket) -> Option<Entry> {
    bracket.champion().cloned()
}

/// Display name for a round: Finals, Semi-Finals, Quarter-Finals, else "Round N".
pub fn round_name(round: usize, total_rounds: usize) -> String {
    match total_rounds.saturating_sub(round) {
        1 => "Finals".to_string(),
        2 => "Semi-Finals".to_string(),
        3 => "Quarter-Finals".to_string(),
        _ => format!("Round {}", round + 1),
    }
}
