//! Seeding: standard single-elimination pairing order and the initial tree.

use crate::models::{is_valid_field_size, matchup_id, Bracket, BracketError, Entry, Matchup, Round};

/// Slot order for a power-of-two field, 0-based.
///
/// Pairing consecutive elements gives the standard draw: 1 vs n, 2 vs n-1 in
/// opposite halves, so top seeds meet as late as possible. `n = 2` is `[0, 1]`;
/// otherwise every seed `s` of the half-size order becomes the pair `[s, n-1-s]`.
pub fn seed_order(n: usize) -> Result<Vec<usize>, BracketError> {
    if !is_valid_field_size(n) {
        return Err(BracketError::InvalidFieldSize { size: n });
    }
    let mut order = vec![0, 1];
    let mut size = 2;
    while size < n {
        size *= 2;
        order = order.iter().flat_map(|&s| [s, size - 1 - s]).collect();
    }
    Ok(order)
}

/// Round 0 for `names` (seed = position in `names` + 1), paired by `seed_order`. No winners.
pub fn build_initial_round<S: AsRef<str>>(names: &[S]) -> Result<Round, BracketError> {
    let order = seed_order(names.len())?;
    let entry = |idx: usize| Entry::new(names[idx].as_ref(), idx as u32 + 1);
    Ok(order
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| Matchup {
            id: matchup_id(0, i),
            entry1: Some(entry(pair[0])),
            entry2: Some(entry(pair[1])),
            winner: None,
        })
        .collect())
}

/// Full tree: seeded round 0 followed by empty placeholder rounds down to the final.
pub fn build_empty_tree<S: AsRef<str>>(names: &[S]) -> Result<Bracket, BracketError> {
    let first = build_initial_round(names)?;
    let mut rounds = vec![first];
    let mut matchups = names.len() / 4;
    let mut r = 1;
    while matchups >= 1 {
        rounds.push((0..matchups).map(|m| Matchup::placeholder(r, m)).collect());
        matchups /= 2;
        r += 1;
    }
    Bracket::from_rounds(rounds)
}
