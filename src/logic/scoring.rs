//! Pool scoring: round-weighted correct picks plus sleeper bonuses.

use crate::models::{
    Bracket, BracketError, Entry, EntryScore, PoolEntry, RoundPoints, ScoringRules, SleeperConfig,
};
use std::cmp::Ordering;

/// Sum of `points.for_round(r)` over every matchup where the predicted winner is the
/// same entry (by seed) as the actual winner. Undecided results score nothing.
/// Totals saturate at `u32::MAX`.
pub fn score_predictions(
    predictions: &Bracket,
    results: &Bracket,
    points: &RoundPoints,
) -> Result<u32, BracketError> {
    if predictions.field_size() != results.field_size() {
        return Err(BracketError::ShapeMismatch);
    }
    let score = results
        .rounds()
        .iter()
        .zip(predictions.rounds())
        .enumerate()
        .map(|(r, (actual, guessed))| {
            let hits = actual
                .iter()
                .zip(guessed)
                .filter(|(a, g)| match (a.winning_entry(), g.winning_entry()) {
                    (Some(won), Some(picked)) => won.same_seed(picked),
                    _ => false,
                })
                .count() as u32;
            hits.saturating_mul(points.for_round(r))
        })
        .fold(0u32, u32::saturating_add);
    Ok(score)
}

/// True when an entry with `pick`'s seed sits in either slot of any matchup in `round`.
fn reached_round(pick: Option<&Entry>, results: &Bracket, round: usize) -> bool {
    match (pick, results.round(round)) {
        (Some(p), Some(matchups)) => matchups.iter().any(|m| m.features(p.seed)),
        _ => false,
    }
}

/// Sleeper hit flags for the two picks. Both false when sleepers are disabled.
pub fn sleeper_hits(
    sleeper1: Option<&Entry>,
    sleeper2: Option<&Entry>,
    results: &Bracket,
    config: &SleeperConfig,
) -> (bool, bool) {
    if !config.enabled {
        return (false, false);
    }
    (
        reached_round(sleeper1, results, config.sleeper1_round),
        reached_round(sleeper2, results, config.sleeper2_round),
    )
}

/// Score one pool entry against `results`. An entry with no predictions scores zero.
pub fn score_entry(
    entry: &PoolEntry,
    results: &Bracket,
    rules: &ScoringRules,
) -> Result<EntryScore, BracketError> {
    let predictions = match &entry.predictions {
        Some(p) => p,
        None => return Ok(EntryScore::default()),
    };
    let mut score = score_predictions(predictions, results, &rules.round_points)?;
    let (sleeper1_hit, sleeper2_hit) = sleeper_hits(
        entry.sleeper1.as_ref(),
        entry.sleeper2.as_ref(),
        results,
        &rules.sleepers,
    );
    if sleeper1_hit {
        score = score.saturating_add(rules.sleepers.sleeper1_points);
    }
    if sleeper2_hit {
        score = score.saturating_add(rules.sleepers.sleeper2_points);
    }
    Ok(EntryScore {
        score,
        sleeper1_hit,
        sleeper2_hit,
    })
}

/// Re-score every entry (overwriting earlier scores and hit flags) and return them
/// highest score first. Equal scores: earlier submission first, unsubmitted last,
/// then the input order.
pub fn score_pool(
    entries: &[PoolEntry],
    results: &Bracket,
    rules: &ScoringRules,
) -> Result<Vec<PoolEntry>, BracketError> {
    let mut scored = entries
        .iter()
        .map(|e| {
            let s = score_entry(e, results, rules)?;
            let mut e = e.clone();
            e.apply_score(s);
            Ok(e)
        })
        .collect::<Result<Vec<_>, BracketError>>()?;
    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| match (a.submitted_at, b.submitted_at) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
    Ok(scored)
}
