//! VoteTally: per-matchup vote counts.

use crate::models::matchup::Slot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Votes submitted for each side of one matchup.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotCounts {
    pub entry1: u32,
    pub entry2: u32,
}

impl SlotCounts {
    pub fn get(&self, slot: Slot) -> u32 {
        match slot {
            Slot::One => self.entry1,
            Slot::Two => self.entry2,
        }
    }

    /// Plurality winner; entry1 takes ties.
    pub fn leader(&self) -> Slot {
        if self.entry1 >= self.entry2 {
            Slot::One
        } else {
            Slot::Two
        }
    }

    pub fn total(&self) -> u32 {
        self.entry1.saturating_add(self.entry2)
    }
}

/// Matchup id -> counts. Counts only grow until `reset`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteTally {
    counts: BTreeMap<String, SlotCounts>,
}

impl VoteTally {
    pub fn with_matchups<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            counts: ids
                .into_iter()
                .map(|id| (id.into(), SlotCounts::default()))
                .collect(),
        }
    }

    pub fn counts(&self, matchup_id: &str) -> Option<SlotCounts> {
        self.counts.get(matchup_id).copied()
    }

    pub fn contains(&self, matchup_id: &str) -> bool {
        self.counts.contains_key(matchup_id)
    }

    /// Add one vote. Returns false (and changes nothing) for an unknown id.
    pub(crate) fn increment(&mut self, matchup_id: &str, slot: Slot) -> bool {
        match self.counts.get_mut(matchup_id) {
            Some(c) => {
                match slot {
                    Slot::One => c.entry1 = c.entry1.saturating_add(1),
                    Slot::Two => c.entry2 = c.entry2.saturating_add(1),
                }
                true
            }
            None => false,
        }
    }

    /// Zero every count, keeping the set of matchups.
    pub fn reset(&mut self) {
        for c in self.counts.values_mut() {
            *c = SlotCounts::default();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SlotCounts)> {
        self.counts.iter()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
