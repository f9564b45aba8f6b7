//! Pool workflow: create, join, submit predictions, close, record results.

use crate::logic::progression::select_winner;
use crate::logic::scoring::{score_entry, score_pool};
use crate::models::{
    Bracket, Entry, Pool, PoolEntry, PoolError, PoolStatus, PublishedBracket, ScoringRules, Seed,
    Slot,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

/// Join codes avoid look-alike characters (0/O, 1/I).
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const JOIN_CODE_LEN: usize = 6;

pub fn generate_join_code<R: Rng>(rng: &mut R) -> String {
    (0..JOIN_CODE_LEN)
        .map(|_| JOIN_CODE_ALPHABET[rng.gen_range(0..JOIN_CODE_ALPHABET.len())] as char)
        .collect()
}

/// New open pool over `bracket`; the host joins automatically.
/// Without explicit rules, rounds score `1, 2, 4, ...` and sleepers are off.
pub fn create_pool(
    name: impl Into<String>,
    host_id: &str,
    host_name: &str,
    bracket: &PublishedBracket,
    rules: Option<ScoringRules>,
    now: DateTime<Utc>,
) -> Pool {
    let rules = rules.unwrap_or_else(|| ScoringRules::for_bracket(&bracket.matchups));
    Pool {
        id: Uuid::new_v4(),
        name: name.into(),
        host_id: host_id.to_string(),
        bracket_id: bracket.id,
        join_code: generate_join_code(&mut rand::thread_rng()),
        status: PoolStatus::Open,
        rules,
        results: bracket.matchups.clone(),
        entries: vec![PoolEntry::new(host_id, host_name, now)],
        created_at: now,
    }
}

/// Add an empty entry for `participant_id`.
pub fn join_pool(
    pool: &mut Pool,
    participant_id: &str,
    display_name: &str,
    now: DateTime<Utc>,
) -> Result<(), PoolError> {
    if pool.status == PoolStatus::Closed {
        return Err(PoolError::PoolClosed);
    }
    if pool.entry(participant_id).is_some() {
        return Err(PoolError::AlreadyJoined);
    }
    pool.entries
        .push(PoolEntry::new(participant_id, display_name, now));
    Ok(())
}

/// Look up a first-round entry by seed for a sleeper pick.
fn sleeper_entry(results: &Bracket, seed: Seed) -> Result<Entry, PoolError> {
    results
        .seeded_entries()
        .into_iter()
        .find(|e| e.seed == seed)
        .cloned()
        .ok_or_else(|| PoolError::InvalidSleeper(format!("no entry with seed {}", seed)))
}

/// Store a participant's predictions and sleeper picks (given by seed). Once only.
///
/// The prediction must be drawn from the same first round as the pool's bracket.
pub fn submit_predictions(
    pool: &mut Pool,
    participant_id: &str,
    predictions: Bracket,
    sleeper1: Option<Seed>,
    sleeper2: Option<Seed>,
    now: DateTime<Utc>,
) -> Result<(), PoolError> {
    if pool.status == PoolStatus::Closed {
        return Err(PoolError::PoolClosed);
    }
    let entry = pool.entry(participant_id).ok_or(PoolError::NotJoined)?;
    if entry.has_submitted() {
        return Err(PoolError::AlreadySubmitted);
    }
    if !pool.results.same_draw(&predictions) {
        return Err(PoolError::InvalidPrediction(
            "first round does not match the pool's bracket".to_string(),
        ));
    }
    if !pool.rules.sleepers.enabled && (sleeper1.is_some() || sleeper2.is_some()) {
        return Err(PoolError::InvalidSleeper(
            "this pool does not use sleeper picks".to_string(),
        ));
    }
    if let (Some(a), Some(b)) = (sleeper1, sleeper2) {
        if a == b {
            return Err(PoolError::InvalidSleeper(
                "pick two different sleepers".to_string(),
            ));
        }
    }
    let sleeper1 = sleeper1
        .map(|s| sleeper_entry(&pool.results, s))
        .transpose()?;
    let sleeper2 = sleeper2
        .map(|s| sleeper_entry(&pool.results, s))
        .transpose()?;

    let score = {
        let mut draft = entry.clone();
        draft.predictions = Some(predictions.clone());
        draft.sleeper1 = sleeper1.clone();
        draft.sleeper2 = sleeper2.clone();
        score_entry(&draft, &pool.results, &pool.rules)?
    };
    let entry = pool.entry_mut(participant_id).ok_or(PoolError::NotJoined)?;
    entry.predictions = Some(predictions);
    entry.sleeper1 = sleeper1;
    entry.sleeper2 = sleeper2;
    entry.submitted_at = Some(now);
    entry.apply_score(score);
    Ok(())
}

/// Stop accepting joins and predictions. Host only.
pub fn close_pool(pool: &mut Pool, requester: &str) -> Result<(), PoolError> {
    if !pool.is_host(requester) {
        return Err(PoolError::NotHost);
    }
    pool.status = PoolStatus::Closed;
    log::info!("Pool {} closed with {} entries", pool.id, pool.entries.len());
    Ok(())
}

fn can_manage_results(pool: &Pool, requester: &str, is_admin: &dyn Fn(&str) -> bool) -> bool {
    pool.is_host(requester) || is_admin(requester)
}

/// Record one actual result (a winner pick on the authoritative tree) and re-score.
/// Host or admin only.
pub fn record_result(
    pool: &mut Pool,
    requester: &str,
    is_admin: &dyn Fn(&str) -> bool,
    round: usize,
    matchup: usize,
    slot: Slot,
) -> Result<(), PoolError> {
    if !can_manage_results(pool, requester, is_admin) {
        return Err(PoolError::NotHost);
    }
    let results = select_winner(&pool.results, round, matchup, slot)?;
    apply_results(pool, results)
}

/// Replace the authoritative results wholesale and re-score. Host or admin only.
pub fn set_results(
    pool: &mut Pool,
    requester: &str,
    is_admin: &dyn Fn(&str) -> bool,
    results: Bracket,
) -> Result<(), PoolError> {
    if !can_manage_results(pool, requester, is_admin) {
        return Err(PoolError::NotHost);
    }
    if !pool.results.same_draw(&results) {
        return Err(PoolError::InvalidPrediction(
            "results do not match the pool's bracket".to_string(),
        ));
    }
    apply_results(pool, results)
}

/// Scores are computed in full before anything in `pool` changes.
fn apply_results(pool: &mut Pool, results: Bracket) -> Result<(), PoolError> {
    let scores = pool
        .entries
        .iter()
        .map(|e| score_entry(e, &results, &pool.rules))
        .collect::<Result<Vec<_>, _>>()?;
    for (entry, score) in pool.entries.iter_mut().zip(scores) {
        entry.apply_score(score);
    }
    pool.results = results;
    Ok(())
}

/// Entries ranked by score.
pub fn leaderboard(pool: &Pool) -> Result<Vec<PoolEntry>, PoolError> {
    Ok(score_pool(&pool.entries, &pool.results, &pool.rules)?)
}
