//! Matchup, Slot and the Round alias.

use crate::models::entry::Entry;
use serde::{Deserialize, Deserializer, Serialize};

/// Which side of a matchup. Serialized as the integer 1 or 2.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    pub fn number(self) -> u8 {
        match self {
            Slot::One => 1,
            Slot::Two => 2,
        }
    }

    /// Slot a winner of matchup `match_index` fills in the next round.
    pub fn feeding(match_index: usize) -> Self {
        if match_index % 2 == 0 {
            Slot::One
        } else {
            Slot::Two
        }
    }
}

impl TryFrom<u8> for Slot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Slot::One),
            2 => Ok(Slot::Two),
            other => Err(format!("winner slot must be 1 or 2, got {}", other)),
        }
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> u8 {
        slot.number()
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Stable matchup id, e.g. `r0-m3`.
pub fn matchup_id(round: usize, index: usize) -> String {
    format!("r{}-m{}", round, index)
}

/// `Option` field that must be present in the input but may be `null`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// One head-to-head slot. Both entries `None` means a placeholder for a later round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub entry1: Option<Entry>,
    #[serde(deserialize_with = "nullable")]
    pub entry2: Option<Entry>,
    #[serde(deserialize_with = "nullable")]
    pub winner: Option<Slot>,
}

impl Matchup {
    /// Empty placeholder awaiting propagation.
    pub fn placeholder(round: usize, index: usize) -> Self {
        Self {
            id: matchup_id(round, index),
            entry1: None,
            entry2: None,
            winner: None,
        }
    }

    pub fn entry(&self, slot: Slot) -> Option<&Entry> {
        match slot {
            Slot::One => self.entry1.as_ref(),
            Slot::Two => self.entry2.as_ref(),
        }
    }

    pub fn set_entry(&mut self, slot: Slot, entry: Option<Entry>) {
        match slot {
            Slot::One => self.entry1 = entry,
            Slot::Two => self.entry2 = entry,
        }
    }

    /// Entry in the winning slot, if a winner is chosen.
    pub fn winning_entry(&self) -> Option<&Entry> {
        self.winner.and_then(|slot| self.entry(slot))
    }

    /// True when the entry with this seed sits in either slot.
    pub fn features(&self, seed: u32) -> bool {
        [&self.entry1, &self.entry2]
            .into_iter()
            .flatten()
            .any(|e| e.seed == seed)
    }

    pub fn clear(&mut self) {
        self.entry1 = None;
        self.entry2 = None;
        self.winner = None;
    }
}

/// One layer of the tree.
pub type Round = Vec<Matchup>;
