//! Integration tests for the pool workflow: create, join, predict, close, results.

use bracket_tournament_web::{
    build_empty_tree, close_pool, create_pool, generate_join_code, join_pool, leaderboard,
    record_result, select_winner, set_results, submit_predictions, Bracket, BracketError,
    Category, NewBracket, Pool, PoolError, PoolStatus, PublishedBracket, RoundPoints,
    ScoringRules, SleeperConfig, Slot, Store,
};
use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, minute, 0).unwrap()
}

fn names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("E{i}")).collect()
}

fn published(n: usize) -> PublishedBracket {
    let mut store = Store::new();
    store
        .create_bracket(
            NewBracket {
                title: "Snacks".to_string(),
                description: None,
                category: Category::FoodAndDrinks,
                entries: names(n),
            },
            "host",
            Some("Host"),
            at(0),
        )
        .unwrap()
        .clone()
}

fn no_admins(_: &str) -> bool {
    false
}

fn only_admin(id: &str) -> bool {
    id == "admin"
}

fn chalk(mut b: Bracket) -> Bracket {
    for r in 0..b.round_count() {
        for m in 0..b.rounds()[r].len() {
            b = select_winner(&b, r, m, Slot::One).unwrap();
        }
    }
    b
}

/// Open pool over eight entries with "ann" and "bob" joined besides the host.
fn pool_with_players(rules: Option<ScoringRules>) -> Pool {
    let mut pool = create_pool("Office", "host", "Host", &published(8), rules, at(0));
    join_pool(&mut pool, "ann", "Ann", at(1)).unwrap();
    join_pool(&mut pool, "bob", "Bob", at(2)).unwrap();
    pool
}

fn sleeper_rules() -> ScoringRules {
    ScoringRules {
        round_points: RoundPoints::doubling(3),
        sleepers: SleeperConfig {
            enabled: true,
            ..SleeperConfig::default()
        },
    }
}

#[test]
fn create_pool_auto_joins_host() {
    let bracket = published(8);
    let pool = create_pool("Office", "host", "Host", &bracket, None, at(0));
    assert_eq!(pool.status, PoolStatus::Open);
    assert_eq!(pool.bracket_id, bracket.id);
    assert_eq!(pool.entries.len(), 1);
    assert_eq!(pool.entries[0].participant_id, "host");
    assert!(!pool.entries[0].has_submitted());
    assert_eq!(pool.results, bracket.matchups);
    assert_eq!(pool.rules.round_points, RoundPoints(vec![1, 2, 4]));
    assert!(!pool.rules.sleepers.enabled);
    assert_eq!(pool.join_code.len(), 6);
}

#[test]
fn join_codes_use_unambiguous_characters() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let code = generate_join_code(&mut rng);
        assert_eq!(code.len(), 6);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert!(!code.contains(['0', 'O', '1', 'I']));
    }
}

#[test]
fn joining_twice_or_after_close_fails() {
    let mut pool = pool_with_players(None);
    assert_eq!(
        join_pool(&mut pool, "ann", "Ann again", at(3)),
        Err(PoolError::AlreadyJoined)
    );
    close_pool(&mut pool, "host").unwrap();
    assert_eq!(
        join_pool(&mut pool, "cat", "Cat", at(4)),
        Err(PoolError::PoolClosed)
    );
    assert_eq!(pool.entries.len(), 3);
}

#[test]
fn only_the_host_closes() {
    let mut pool = pool_with_players(None);
    assert_eq!(close_pool(&mut pool, "ann"), Err(PoolError::NotHost));
    assert_eq!(pool.status, PoolStatus::Open);
    close_pool(&mut pool, "host").unwrap();
    assert_eq!(pool.status, PoolStatus::Closed);
}

#[test]
fn predictions_are_stored_once() {
    let mut pool = pool_with_players(None);
    let picks = chalk(pool.results.clone());
    submit_predictions(&mut pool, "ann", picks.clone(), None, None, at(5)).unwrap();

    let ann = pool.entry("ann").unwrap();
    assert_eq!(ann.predictions.as_ref(), Some(&picks));
    assert_eq!(ann.submitted_at, Some(at(5)));

    let blank = pool.results.clone();
    assert_eq!(
        submit_predictions(&mut pool, "ann", blank, None, None, at(6)),
        Err(PoolError::AlreadySubmitted)
    );
    assert_eq!(
        submit_predictions(&mut pool, "zed", picks, None, None, at(6)),
        Err(PoolError::NotJoined)
    );
}

#[test]
fn predictions_must_use_the_pool_draw() {
    let mut pool = pool_with_players(None);
    let other: Vec<String> = (1..=8).map(|i| format!("X{i}")).collect();
    let foreign = build_empty_tree(&other).unwrap();
    assert!(matches!(
        submit_predictions(&mut pool, "ann", foreign, None, None, at(5)),
        Err(PoolError::InvalidPrediction(_))
    ));
    assert!(!pool.entry("ann").unwrap().has_submitted());
}

#[test]
fn no_predictions_after_close() {
    let mut pool = pool_with_players(None);
    close_pool(&mut pool, "host").unwrap();
    let picks = pool.results.clone();
    assert_eq!(
        submit_predictions(&mut pool, "ann", picks, None, None, at(5)),
        Err(PoolError::PoolClosed)
    );
}

#[test]
fn sleeper_picks_are_validated() {
    let mut plain = pool_with_players(None);
    let picks = plain.results.clone();
    assert!(matches!(
        submit_predictions(&mut plain, "ann", picks.clone(), Some(7), None, at(5)),
        Err(PoolError::InvalidSleeper(_))
    ));

    let mut pool = pool_with_players(Some(sleeper_rules()));
    assert!(matches!(
        submit_predictions(&mut pool, "ann", picks.clone(), Some(7), Some(7), at(5)),
        Err(PoolError::InvalidSleeper(_))
    ));
    assert!(matches!(
        submit_predictions(&mut pool, "ann", picks.clone(), Some(9), None, at(5)),
        Err(PoolError::InvalidSleeper(_))
    ));
    submit_predictions(&mut pool, "ann", picks, Some(7), Some(6), at(5)).unwrap();
    let ann = pool.entry("ann").unwrap();
    assert_eq!(ann.sleeper1.as_ref().map(|e| e.name.as_str()), Some("E7"));
    assert_eq!(ann.sleeper2.as_ref().map(|e| e.seed), Some(6));
}

#[test]
fn results_need_host_or_admin() {
    let mut pool = pool_with_players(None);
    assert_eq!(
        record_result(&mut pool, "ann", &no_admins, 0, 0, Slot::One),
        Err(PoolError::NotHost)
    );
    record_result(&mut pool, "admin", &only_admin, 0, 0, Slot::One).unwrap();
    record_result(&mut pool, "host", &no_admins, 0, 1, Slot::Two).unwrap();
    assert_eq!(pool.results.matchup(0, 0).unwrap().winner, Some(Slot::One));
    assert_eq!(pool.results.matchup(0, 1).unwrap().winner, Some(Slot::Two));
}

#[test]
fn bad_result_leaves_pool_unchanged() {
    let mut pool = pool_with_players(None);
    let before = pool.results.clone();
    assert_eq!(
        record_result(&mut pool, "host", &no_admins, 1, 0, Slot::One),
        Err(PoolError::Bracket(BracketError::EmptySlot {
            round: 1,
            matchup: 0,
            slot: Slot::One
        }))
    );
    assert_eq!(pool.results, before);
}

#[test]
fn recording_results_rescores_every_entry() {
    let mut pool = pool_with_players(None);
    let chalk_picks = chalk(pool.results.clone());
    let upset = select_winner(&chalk_picks, 0, 0, Slot::Two).unwrap();
    submit_predictions(&mut pool, "ann", chalk_picks, None, None, at(5)).unwrap();
    submit_predictions(&mut pool, "bob", upset, None, None, at(6)).unwrap();
    close_pool(&mut pool, "host").unwrap();

    // results still arrive after the pool closes
    record_result(&mut pool, "host", &no_admins, 0, 0, Slot::One).unwrap();
    record_result(&mut pool, "host", &no_admins, 0, 1, Slot::One).unwrap();
    assert_eq!(pool.entry("ann").unwrap().score, 2);
    assert_eq!(pool.entry("bob").unwrap().score, 1);

    record_result(&mut pool, "host", &no_admins, 1, 0, Slot::One).unwrap();
    assert_eq!(pool.entry("ann").unwrap().score, 4);

    let board = leaderboard(&pool).unwrap();
    let order: Vec<&str> = board.iter().map(|e| e.participant_id.as_str()).collect();
    assert_eq!(order, vec!["ann", "bob", "host"]);
}

#[test]
fn set_results_replaces_the_tree() {
    let mut pool = pool_with_players(None);
    let picks = chalk(pool.results.clone());
    submit_predictions(&mut pool, "ann", picks.clone(), None, None, at(5)).unwrap();
    set_results(&mut pool, "host", &no_admins, picks).unwrap();
    assert!(pool.results.is_complete());
    assert_eq!(pool.entry("ann").unwrap().score, 12);

    let foreign = build_empty_tree(&names(4)).unwrap();
    assert!(matches!(
        set_results(&mut pool, "host", &no_admins, foreign),
        Err(PoolError::InvalidPrediction(_))
    ));
    let current = pool.results.clone();
    assert_eq!(
        set_results(&mut pool, "bob", &no_admins, current),
        Err(PoolError::NotHost)
    );
}

#[test]
fn sleeper_bonus_lands_on_the_leaderboard() {
    let mut pool = pool_with_players(Some(sleeper_rules()));
    let blank = pool.results.clone();
    submit_predictions(&mut pool, "ann", blank.clone(), Some(7), None, at(5)).unwrap();
    submit_predictions(&mut pool, "bob", blank, Some(2), None, at(6)).unwrap();

    record_result(&mut pool, "host", &no_admins, 0, 2, Slot::Two).unwrap();
    record_result(&mut pool, "host", &no_admins, 1, 1, Slot::One).unwrap();

    let board = leaderboard(&pool).unwrap();
    assert_eq!(board[0].participant_id, "ann");
    assert_eq!(board[0].score, 5);
    assert!(board[0].sleeper1_hit);
    assert!(!board[1].sleeper1_hit);
}
