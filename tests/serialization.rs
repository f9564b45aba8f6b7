//! Integration tests for the JSON wire form of trees, tallies and categories.

use bracket_tournament_web::{
    build_empty_tree, init_tally, record_vote, select_winner, Bracket, Category, Slot, VoteTally,
};
use serde_json::{json, Value};

fn tree(n: usize) -> Bracket {
    let names: Vec<String> = (1..=n).map(|i| format!("E{i}")).collect();
    build_empty_tree(&names).unwrap()
}

fn parse(v: Value) -> Result<Bracket, serde_json::Error> {
    serde_json::from_value(v)
}

#[test]
fn tree_json_shape() {
    let t = select_winner(&tree(4), 0, 1, Slot::Two).unwrap();
    let v = serde_json::to_value(&t).unwrap();
    assert_eq!(v["fieldSize"], json!(4));
    assert_eq!(
        v["rounds"][0][1],
        json!({
            "id": "r0-m1",
            "entry1": {"name": "E2", "seed": 2},
            "entry2": {"name": "E3", "seed": 3},
            "winner": 2
        })
    );
    assert_eq!(
        v["rounds"][1][0],
        json!({
            "id": "r1-m0",
            "entry1": null,
            "entry2": {"name": "E3", "seed": 3},
            "winner": null
        })
    );
}

#[test]
fn tree_survives_a_round_trip() {
    let t = select_winner(&tree(8), 0, 3, Slot::Two).unwrap();
    let text = serde_json::to_string(&t).unwrap();
    let back: Bracket = serde_json::from_str(&text).unwrap();
    assert_eq!(back, t);
}

#[test]
fn absent_fields_are_rejected_but_null_is_fine() {
    let mut v = serde_json::to_value(tree(2)).unwrap();
    v["rounds"][0][0]["winner"] = Value::Null;
    assert!(parse(v.clone()).is_ok());

    v["rounds"][0][0]
        .as_object_mut()
        .unwrap()
        .remove("winner");
    assert!(parse(v).is_err());
}

#[test]
fn winner_must_be_one_or_two() {
    let mut v = serde_json::to_value(tree(2)).unwrap();
    v["rounds"][0][0]["winner"] = json!(3);
    assert!(parse(v.clone()).is_err());
    v["rounds"][0][0]["winner"] = json!(1);
    assert_eq!(parse(v).unwrap().champion().unwrap().seed, 1);
}

#[test]
fn malformed_trees_are_rejected() {
    let good = serde_json::to_value(tree(4)).unwrap();

    let mut missing_round = good.clone();
    missing_round["rounds"].as_array_mut().unwrap().pop();
    assert!(parse(missing_round).is_err());

    let mut wrong_size = good.clone();
    wrong_size["fieldSize"] = json!(8);
    assert!(parse(wrong_size).is_err());

    let mut bad_id = good.clone();
    bad_id["rounds"][0][1]["id"] = json!("r0-m7");
    assert!(parse(bad_id).is_err());

    let mut ghost_winner = good;
    ghost_winner["rounds"][1][0]["winner"] = json!(1);
    assert!(parse(ghost_winner).is_err());
}

#[test]
fn tally_is_a_plain_map() {
    let mut tally = init_tally(&tree(2));
    record_vote(&mut tally, "r0-m0", Slot::Two).unwrap();
    let v = serde_json::to_value(&tally).unwrap();
    assert_eq!(v, json!({"r0-m0": {"entry1": 0, "entry2": 1}}));
    let back: VoteTally = serde_json::from_value(v).unwrap();
    assert_eq!(back, tally);
}

#[test]
fn categories_use_display_labels() {
    assert_eq!(serde_json::to_value(Category::TvShows).unwrap(), json!("TV Shows"));
    let c: Category = serde_json::from_value(json!("Food & Drinks")).unwrap();
    assert_eq!(c, Category::FoodAndDrinks);
    for c in Category::ALL {
        assert_eq!(serde_json::to_value(c).unwrap(), json!(c.label()));
    }
}

#[test]
fn later_rounds_only_hold_advanced_winners() {
    let good = serde_json::to_value(tree(4)).unwrap();

    // an entry that never played in round 0
    let mut stranger = good.clone();
    stranger["rounds"][1][0]["entry1"] = json!({"name": "Zed", "seed": 99});
    stranger["rounds"][1][0]["winner"] = json!(1);
    assert!(parse(stranger).is_err());

    // a real entry whose first-round matchup is still undecided
    let mut early = good.clone();
    early["rounds"][1][0]["entry1"] = json!({"name": "E1", "seed": 1});
    assert!(parse(early).is_err());

    // the loser of r0-m0 placed in the next round
    let decided = select_winner(&tree(4), 0, 0, Slot::One).unwrap();
    let mut loser = serde_json::to_value(&decided).unwrap();
    loser["rounds"][1][0]["entry1"] = json!({"name": "E4", "seed": 4});
    assert!(parse(loser).is_err());

    // winners in the wrong slot of the next matchup
    let mut swapped = serde_json::to_value(&decided).unwrap();
    let moved = swapped["rounds"][1][0]["entry1"].take();
    swapped["rounds"][1][0]["entry2"] = moved;
    assert!(parse(swapped).is_err());

    assert!(parse(serde_json::to_value(&decided).unwrap()).is_ok());
}
