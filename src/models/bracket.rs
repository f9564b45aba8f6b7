//! Bracket tree and BracketError.

use crate::models::entry::Entry;
use crate::models::matchup::{matchup_id, Matchup, Round, Slot};
use serde::{Deserialize, Serialize};

/// Errors raised by the bracket engine (seeding, propagation, voting, scoring).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// Field size is not a power of two >= 2.
    InvalidFieldSize { size: usize },
    /// Tried to pick a winner for a slot that has no entry yet.
    EmptySlot { round: usize, matchup: usize, slot: Slot },
    /// Round or matchup index outside the tree.
    MatchupOutOfRange { round: usize, matchup: usize },
    /// Round index outside the tree.
    RoundOutOfRange { round: usize },
    /// A vote or result referenced a matchup id not present in the tree.
    UnknownMatchup(String),
    /// Rounds do not form a valid single-elimination tree.
    InvalidShape(String),
    /// Two trees that must share a shape (prediction vs results) do not.
    ShapeMismatch,
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InvalidFieldSize { size } => {
                write!(f, "Bracket size must be a power of two of at least 2 (got {})", size)
            }
            BracketError::EmptySlot { round, matchup, slot } => write!(
                f,
                "Round {} matchup {} has no entry in slot {} yet",
                round + 1,
                matchup + 1,
                slot
            ),
            BracketError::MatchupOutOfRange { round, matchup } => {
                write!(f, "No matchup {} in round {}", matchup + 1, round + 1)
            }
            BracketError::RoundOutOfRange { round } => write!(f, "No round {}", round + 1),
            BracketError::UnknownMatchup(id) => write!(f, "Unknown matchup {}", id),
            BracketError::InvalidShape(reason) => write!(f, "Invalid bracket: {}", reason),
            BracketError::ShapeMismatch => write!(f, "Brackets do not have the same shape"),
        }
    }
}

impl std::error::Error for BracketError {}

/// True for 2, 4, 8, ...
pub fn is_valid_field_size(size: usize) -> bool {
    size >= 2 && size.is_power_of_two()
}

/// Round-indexed single-elimination tree. Round 0 has `field_size / 2` matchups,
/// each later round half as many, the last exactly one.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawBracket")]
pub struct Bracket {
    field_size: usize,
    rounds: Vec<Round>,
}

/// Unvalidated wire form; every deserialized bracket goes through `Bracket::from_rounds`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBracket {
    field_size: usize,
    rounds: Vec<Round>,
}

impl TryFrom<RawBracket> for Bracket {
    type Error = BracketError;

    fn try_from(raw: RawBracket) -> Result<Self, Self::Error> {
        let bracket = Bracket::from_rounds(raw.rounds)?;
        if bracket.field_size != raw.field_size {
            return Err(BracketError::InvalidShape(format!(
                "fieldSize {} does not match {} first-round matchups",
                raw.field_size,
                bracket.rounds[0].len()
            )));
        }
        Ok(bracket)
    }
}

impl Bracket {
    /// Build from already laid-out rounds, checking the structural invariants:
    /// power-of-two field, halving round lengths, stable ids, winners only on filled slots,
    /// and later-round entries only where the feeding matchup's winner advanced.
    pub fn from_rounds(rounds: Vec<Round>) -> Result<Self, BracketError> {
        let first = rounds
            .first()
            .ok_or_else(|| BracketError::InvalidShape("no rounds".to_string()))?;
        let field_size = first.len() * 2;
        if !is_valid_field_size(field_size) {
            return Err(BracketError::InvalidFieldSize { size: field_size });
        }
        let expected_rounds = field_size.trailing_zeros() as usize;
        if rounds.len() != expected_rounds {
            return Err(BracketError::InvalidShape(format!(
                "expected {} rounds for {} entries, found {}",
                expected_rounds,
                field_size,
                rounds.len()
            )));
        }
        for (r, round) in rounds.iter().enumerate() {
            let expected = field_size >> (r + 1);
            if round.len() != expected {
                return Err(BracketError::InvalidShape(format!(
                    "round {} has {} matchups, expected {}",
                    r + 1,
                    round.len(),
                    expected
                )));
            }
            for (m, matchup) in round.iter().enumerate() {
                if matchup.id != matchup_id(r, m) {
                    return Err(BracketError::InvalidShape(format!(
                        "matchup id {} should be {}",
                        matchup.id,
                        matchup_id(r, m)
                    )));
                }
                if let Some(slot) = matchup.winner {
                    if matchup.entry(slot).is_none() {
                        return Err(BracketError::InvalidShape(format!(
                            "matchup {} has a winner in empty slot {}",
                            matchup.id, slot
                        )));
                    }
                }
                if r > 0 {
                    for slot in [Slot::One, Slot::Two] {
                        let feeder = 2 * m + usize::from(slot == Slot::Two);
                        let advanced = rounds[r - 1].get(feeder).and_then(|p| p.winning_entry());
                        if let Some(entry) = matchup.entry(slot) {
                            if advanced != Some(entry) {
                                return Err(BracketError::InvalidShape(format!(
                                    "matchup {} slot {} holds {}, who did not win {}",
                                    matchup.id,
                                    slot,
                                    entry.name,
                                    matchup_id(r - 1, feeder)
                                )));
                            }
                        }
                    }
                }
            }
        }
        Ok(Self { field_size, rounds })
    }

    pub fn field_size(&self) -> usize {
        self.field_size
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round(&self, round: usize) -> Option<&Round> {
        self.rounds.get(round)
    }

    pub fn matchup(&self, round: usize, index: usize) -> Option<&Matchup> {
        self.rounds.get(round).and_then(|r| r.get(index))
    }

    /// Locate a matchup by its id.
    pub fn position_of(&self, id: &str) -> Option<(usize, usize)> {
        self.rounds.iter().enumerate().find_map(|(r, round)| {
            round
                .iter()
                .position(|m| m.id == id)
                .map(|m| (r, m))
        })
    }

    /// The single final-round matchup.
    pub fn final_matchup(&self) -> &Matchup {
        // from_rounds guarantees at least one round and a one-matchup final
        &self.rounds[self.rounds.len() - 1][0]
    }

    /// True iff the final has a winner.
    pub fn is_complete(&self) -> bool {
        self.final_matchup().winner.is_some()
    }

    /// Winning entry of the final, if decided.
    pub fn champion(&self) -> Option<&Entry> {
        self.final_matchup().winning_entry()
    }

    /// First-round entries in seed order.
    pub fn seeded_entries(&self) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self.rounds[0]
            .iter()
            .flat_map(|m| [m.entry1.as_ref(), m.entry2.as_ref()])
            .flatten()
            .collect();
        entries.sort_by_key(|e| e.seed);
        entries
    }

    /// Same field size and the same entries in the same first-round slots.
    pub fn same_draw(&self, other: &Bracket) -> bool {
        self.field_size == other.field_size
            && self.rounds[0]
                .iter()
                .zip(other.rounds[0].iter())
                .all(|(a, b)| a.entry1 == b.entry1 && a.entry2 == b.entry2)
    }

    pub(crate) fn rounds_mut(&mut self) -> &mut [Round] {
        &mut self.rounds
    }
}
