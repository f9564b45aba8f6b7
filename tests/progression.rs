//! Integration tests for winner selection, propagation and invalidation.

use bracket_tournament_web::{
    build_empty_tree, champion, is_complete, round_name, select_winner, Bracket, BracketError,
    Slot,
};

fn tree(n: usize) -> Bracket {
    let names: Vec<String> = (1..=n).map(|i| format!("E{i}")).collect();
    build_empty_tree(&names).unwrap()
}

fn seed_at(b: &Bracket, round: usize, matchup: usize, slot: Slot) -> Option<u32> {
    b.matchup(round, matchup)
        .unwrap()
        .entry(slot)
        .map(|e| e.seed)
}

/// Pick slot 1 in every matchup, round by round (the higher seed always wins).
fn chalk(mut b: Bracket) -> Bracket {
    for r in 0..b.round_count() {
        for m in 0..b.rounds()[r].len() {
            b = select_winner(&b, r, m, Slot::One).unwrap();
        }
    }
    b
}

#[test]
fn select_sets_winner_and_fills_next_round() {
    let t = tree(8);
    let next = select_winner(&t, 0, 0, Slot::One).unwrap();
    assert_eq!(next.matchup(0, 0).unwrap().winner, Some(Slot::One));
    assert_eq!(seed_at(&next, 1, 0, Slot::One), Some(1));
    assert_eq!(next.matchup(1, 0).unwrap().winner, None);
    // the input tree is untouched
    assert_eq!(t, tree(8));
}

#[test]
fn odd_matchup_feeds_second_slot() {
    let t = tree(8);
    let next = select_winner(&t, 0, 1, Slot::Two).unwrap();
    assert_eq!(seed_at(&next, 1, 0, Slot::Two), Some(5));
    assert_eq!(seed_at(&next, 1, 0, Slot::One), None);

    let next = select_winner(&next, 0, 3, Slot::One).unwrap();
    assert_eq!(seed_at(&next, 1, 1, Slot::Two), Some(3));
}

#[test]
fn selecting_an_empty_slot_is_rejected_without_change() {
    let t = tree(8);
    let before = t.clone();
    assert_eq!(
        select_winner(&t, 1, 0, Slot::One),
        Err(BracketError::EmptySlot {
            round: 1,
            matchup: 0,
            slot: Slot::One
        })
    );
    assert_eq!(t, before);
}

#[test]
fn out_of_range_is_rejected() {
    let t = tree(4);
    assert!(matches!(
        select_winner(&t, 0, 2, Slot::One),
        Err(BracketError::MatchupOutOfRange { round: 0, matchup: 2 })
    ));
    assert!(matches!(
        select_winner(&t, 5, 0, Slot::One),
        Err(BracketError::MatchupOutOfRange { round: 5, matchup: 0 })
    ));
}

#[test]
fn selecting_twice_is_idempotent() {
    let t = chalk(tree(8));
    let once = select_winner(&t, 0, 2, Slot::Two).unwrap();
    let twice = select_winner(&once, 0, 2, Slot::Two).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn repick_clears_next_winner_and_rederives_downstream() {
    let full = chalk(tree(8));
    assert!(is_complete(&full));
    assert_eq!(champion(&full).unwrap().seed, 1);

    let changed = select_winner(&full, 0, 0, Slot::Two).unwrap();
    // next round gets the new winner and loses its pick
    assert_eq!(seed_at(&changed, 1, 0, Slot::One), Some(8));
    assert_eq!(seed_at(&changed, 1, 0, Slot::Two), Some(4));
    assert_eq!(changed.matchup(1, 0).unwrap().winner, None);
    // the untouched semifinal keeps its pick
    assert_eq!(changed.matchup(1, 1).unwrap().winner, Some(Slot::One));
    // the final is rebuilt from what still stands
    let fin = changed.matchup(2, 0).unwrap();
    assert!(fin.entry1.is_none());
    assert_eq!(fin.entry2.as_ref().map(|e| e.seed), Some(2));
    assert!(fin.winner.is_none());
    assert!(!is_complete(&changed));
    assert!(champion(&changed).is_none());
}

#[test]
fn repick_wipes_everything_two_rounds_out() {
    let full = chalk(tree(16));
    let changed = select_winner(&full, 0, 0, Slot::Two).unwrap();

    assert_eq!(seed_at(&changed, 1, 0, Slot::One), Some(16));
    assert!(changed.matchup(1, 0).unwrap().winner.is_none());

    // round 2 is derived from round 1's remaining winners, no picks
    let r2 = &changed.rounds()[2];
    assert!(r2[0].entry1.is_none());
    assert!(r2[0].entry2.is_some());
    assert!(r2[1].entry1.is_some() && r2[1].entry2.is_some());
    assert!(r2.iter().all(|m| m.winner.is_none()));

    // the final has nothing to derive from
    let fin = changed.matchup(3, 0).unwrap();
    assert!(fin.entry1.is_none() && fin.entry2.is_none() && fin.winner.is_none());
}

#[test]
fn picking_in_the_final_only_touches_the_final() {
    let full = chalk(tree(8));
    let flipped = select_winner(&full, 2, 0, Slot::Two).unwrap();
    assert_eq!(champion(&flipped).unwrap().seed, 2);
    assert_eq!(&flipped.rounds()[..2], &full.rounds()[..2]);
}

#[test]
fn eight_entry_walkthrough_crowns_top_seed() {
    let t = tree(8);
    // matchups: (1,8) (4,5) (2,7) (3,6)
    let t = select_winner(&t, 0, 0, Slot::One).unwrap();
    let t = select_winner(&t, 0, 1, Slot::One).unwrap();
    assert_eq!(seed_at(&t, 1, 0, Slot::One), Some(1));
    assert_eq!(seed_at(&t, 1, 0, Slot::Two), Some(4));

    let t = select_winner(&t, 1, 0, Slot::One).unwrap();
    assert_eq!(seed_at(&t, 2, 0, Slot::One), Some(1));
    assert!(!is_complete(&t));

    let t = select_winner(&t, 2, 0, Slot::One).unwrap();
    assert!(is_complete(&t));
    let champ = champion(&t).unwrap();
    assert_eq!(champ.name, "E1");
    assert_eq!(champ.seed, 1);
}

#[test]
fn round_names_count_back_from_the_final() {
    assert_eq!(round_name(4, 5), "Finals");
    assert_eq!(round_name(3, 5), "Semi-Finals");
    assert_eq!(round_name(2, 5), "Quarter-Finals");
    assert_eq!(round_name(1, 5), "Round 2");
    assert_eq!(round_name(0, 5), "Round 1");
    assert_eq!(round_name(0, 1), "Finals");
    assert_eq!(round_name(0, 2), "Semi-Finals");
}
