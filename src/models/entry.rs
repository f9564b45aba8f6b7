//! Entry: a named participant with a fixed seed.

use serde::{Deserialize, Serialize};

/// 1-based rank assigned when the tree is seeded. Stable identity across rounds.
pub type Seed = u32;

/// A participant in a bracket (movie, team, ...).
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub seed: Seed,
}

impl Entry {
    pub fn new(name: impl Into<String>, seed: Seed) -> Self {
        Self {
            name: name.into(),
            seed,
        }
    }

    /// Same participant, regardless of display name.
    pub fn same_seed(&self, other: &Entry) -> bool {
        self.seed == other.seed
    }
}
