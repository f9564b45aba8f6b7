//! Integration tests for scheduled advancement: expected round and catch-up.

use bracket_tournament_web::{
    build_empty_tree, catch_up, expected_round, init_tally, record_vote, Bracket, Clock,
    DayToRoundMap, FixedClock, Slot,
};
use chrono::{NaiveDate, TimeZone, Utc};

fn tree(n: usize) -> Bracket {
    let names: Vec<String> = (1..=n).map(|i| format!("E{i}")).collect();
    build_empty_tree(&names).unwrap()
}

/// 2026-10-19 is a Monday.
fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

#[test]
fn default_map_runs_monday_to_friday_then_holds() {
    let map = DayToRoundMap::default();
    let rounds: Vec<usize> = (19..=25).map(|d| expected_round(&day(d), &map)).collect();
    assert_eq!(rounds, vec![0, 1, 2, 3, 4, 4, 4]);
}

#[test]
fn clamped_map_stops_at_the_final() {
    let map = DayToRoundMap::default().clamped(2);
    assert_eq!(expected_round(&day(20), &map), 1);
    assert_eq!(expected_round(&day(23), &map), 2);
    assert_eq!(expected_round(&day(25), &map), 2);
}

#[test]
fn expected_round_works_from_a_clock() {
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 22, 18, 30, 0).unwrap());
    assert_eq!(expected_round(&clock.now(), &DayToRoundMap::default()), 3);
}

#[test]
fn catch_up_resolves_each_elapsed_round_in_order() {
    let t = tree(16);
    let tally = init_tally(&t);
    let out = catch_up(&t, &tally, 0, 3).unwrap();

    assert!(out.advanced);
    assert_eq!(out.current_round, 3);
    for r in 0..3 {
        assert!(
            out.bracket.rounds()[r].iter().all(|m| m.winner.is_some()),
            "round {r} should be decided"
        );
    }
    let fin = out.bracket.matchup(3, 0).unwrap();
    assert!(fin.entry1.is_some() && fin.entry2.is_some());
    assert!(fin.winner.is_none());
    // all ties: the top half of every matchup goes through
    assert_eq!(fin.entry1.as_ref().unwrap().seed, 1);
    assert_eq!(fin.entry2.as_ref().unwrap().seed, 2);
}

#[test]
fn catch_up_uses_the_tally() {
    let t = tree(16);
    let mut tally = init_tally(&t);
    record_vote(&mut tally, "r0-m0", Slot::Two).unwrap();
    let out = catch_up(&t, &tally, 0, 1).unwrap();
    assert_eq!(out.current_round, 1);
    assert_eq!(
        out.bracket.matchup(1, 0).unwrap().entry1.as_ref().unwrap().seed,
        16
    );
    assert!(out.bracket.rounds()[1].iter().all(|m| m.winner.is_none()));
}

#[test]
fn catch_up_is_a_noop_when_current() {
    let t = tree(8);
    let tally = init_tally(&t);
    let out = catch_up(&t, &tally, 2, 2).unwrap();
    assert!(!out.advanced);
    assert_eq!(out.current_round, 2);
    assert_eq!(out.bracket, t);

    let out = catch_up(&t, &tally, 2, 1).unwrap();
    assert!(!out.advanced);
    assert_eq!(out.current_round, 2);
}

#[test]
fn catch_up_never_resolves_the_final() {
    let t = tree(8);
    let tally = init_tally(&t);
    let out = catch_up(&t, &tally, 0, 4).unwrap();
    assert_eq!(out.current_round, 2);
    assert!(!out.bracket.is_complete());

    let again = catch_up(&out.bracket, &tally, out.current_round, 4).unwrap();
    assert!(!again.advanced);
    assert_eq!(again.bracket, out.bracket);
}
