//! In-memory persistence: published brackets, submissions, pools and the weekly bracket.
//!
//! The web binary wraps a single `Store` in a `RwLock`, so every read-modify-write of a
//! tree, tally or round counter happens under one write guard.

use crate::logic::build_empty_tree;
use crate::models::{
    Bracket, BracketError, BracketId, Category, Pool, PoolError, PoolId, PublishedBracket,
    Submission, SubmissionId, WeeklyBracket, WeeklyError, ANONYMOUS, BRACKET_SIZES,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cmp::Reverse;
use std::collections::HashMap;
use uuid::Uuid;

/// Errors for bracket and submission storage.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    BracketNotFound,
    /// Only the bracket's creator may delete it.
    NotOwner,
    InvalidEntries(String),
    InvalidSubmission(String),
    Bracket(BracketError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::BracketNotFound => write!(f, "Bracket not found"),
            StoreError::NotOwner => write!(f, "Only the creator can delete this bracket"),
            StoreError::InvalidEntries(reason) => write!(f, "{}", reason),
            StoreError::InvalidSubmission(reason) => write!(f, "Invalid submission: {}", reason),
            StoreError::Bracket(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<BracketError> for StoreError {
    fn from(e: BracketError) -> Self {
        StoreError::Bracket(e)
    }
}

/// Request body for publishing a bracket.
#[derive(Clone, Debug, Deserialize)]
pub struct NewBracket {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: Category,
    pub entries: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Store {
    /// Insertion order.
    brackets: Vec<PublishedBracket>,
    submissions: Vec<Submission>,
    pools: HashMap<PoolId, Pool>,
    weekly: Option<WeeklyBracket>,
}

/// Newest first; equal timestamps keep the latest insert first.
fn newest_first<'a, T, F>(items: impl DoubleEndedIterator<Item = &'a T>, at: F) -> Vec<&'a T>
where
    T: 'a,
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut out: Vec<&T> = items.rev().collect();
    out.sort_by_key(|t| Reverse(at(*t)));
    out
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and publish a bracket, seeding its tree from the entry order.
    pub fn create_bracket(
        &mut self,
        req: NewBracket,
        owner_id: &str,
        owner_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<&PublishedBracket, StoreError> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(StoreError::InvalidEntries("A title is required".to_string()));
        }
        let entries: Vec<String> = req.entries.iter().map(|e| e.trim().to_string()).collect();
        if entries.iter().any(|e| e.is_empty()) {
            return Err(StoreError::InvalidEntries(
                "Every entry needs a name".to_string(),
            ));
        }
        let matchups = build_empty_tree(&entries)?;
        if !BRACKET_SIZES.contains(&entries.len()) {
            return Err(StoreError::InvalidEntries(format!(
                "Bracket size must be one of {:?}",
                BRACKET_SIZES
            )));
        }
        let owner_name = owner_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(ANONYMOUS);
        let description = req
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let bracket = PublishedBracket {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description,
            category: req.category,
            size: entries.len(),
            owner_id: owner_id.to_string(),
            owner_name: owner_name.to_string(),
            entries,
            matchups,
            created_at: now,
        };
        log::info!("Bracket {} published ({} entries)", bracket.id, bracket.size);
        self.brackets.push(bracket);
        Ok(&self.brackets[self.brackets.len() - 1])
    }

    pub fn all_brackets(&self) -> Vec<&PublishedBracket> {
        newest_first(self.brackets.iter(), |b| b.created_at)
    }

    pub fn user_brackets(&self, owner_id: &str) -> Vec<&PublishedBracket> {
        newest_first(
            self.brackets.iter().filter(|b| b.owner_id == owner_id),
            |b| b.created_at,
        )
    }

    pub fn bracket(&self, id: BracketId) -> Result<&PublishedBracket, StoreError> {
        self.brackets
            .iter()
            .find(|b| b.id == id)
            .ok_or(StoreError::BracketNotFound)
    }

    /// Delete a bracket. Only its owner may.
    pub fn delete_bracket(&mut self, id: BracketId, requester: &str) -> Result<(), StoreError> {
        let idx = self
            .brackets
            .iter()
            .position(|b| b.id == id)
            .ok_or(StoreError::BracketNotFound)?;
        if self.brackets[idx].owner_id != requester {
            return Err(StoreError::NotOwner);
        }
        self.brackets.remove(idx);
        Ok(())
    }

    /// Store a filled-out copy of a published bracket.
    pub fn submit_filled(
        &mut self,
        bracket_id: BracketId,
        participant_id: &str,
        display_name: Option<&str>,
        matchups: Bracket,
        now: DateTime<Utc>,
    ) -> Result<&Submission, StoreError> {
        let published = self.bracket(bracket_id)?;
        if !published.matchups.same_draw(&matchups) {
            return Err(StoreError::InvalidSubmission(
                "first round does not match the published bracket".to_string(),
            ));
        }
        let submission = Submission {
            id: Uuid::new_v4(),
            bracket_id,
            participant_id: participant_id.to_string(),
            display_name: display_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(ANONYMOUS)
                .to_string(),
            champion: matchups.champion().cloned(),
            matchups,
            submitted_at: now,
        };
        self.submissions.push(submission);
        Ok(&self.submissions[self.submissions.len() - 1])
    }

    pub fn submission(&self, id: SubmissionId) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.id == id)
    }

    pub fn bracket_submissions(&self, bracket_id: BracketId) -> Vec<&Submission> {
        newest_first(
            self.submissions.iter().filter(|s| s.bracket_id == bracket_id),
            |s| s.submitted_at,
        )
    }

    pub fn user_submissions(&self, participant_id: &str) -> Vec<&Submission> {
        newest_first(
            self.submissions
                .iter()
                .filter(|s| s.participant_id == participant_id),
            |s| s.submitted_at,
        )
    }

    pub fn insert_pool(&mut self, pool: Pool) -> &Pool {
        let id = pool.id;
        self.pools.entry(id).or_insert(pool)
    }

    pub fn pool(&self, id: PoolId) -> Result<&Pool, PoolError> {
        self.pools.get(&id).ok_or(PoolError::PoolNotFound)
    }

    pub fn pool_mut(&mut self, id: PoolId) -> Result<&mut Pool, PoolError> {
        self.pools.get_mut(&id).ok_or(PoolError::PoolNotFound)
    }

    /// Find a pool by join code, ignoring case and surrounding spaces.
    pub fn pool_by_code_mut(&mut self, code: &str) -> Result<&mut Pool, PoolError> {
        let code = code.trim();
        self.pools
            .values_mut()
            .find(|p| p.join_code.eq_ignore_ascii_case(code))
            .ok_or(PoolError::PoolNotFound)
    }

    pub fn weekly(&self) -> Result<&WeeklyBracket, WeeklyError> {
        self.weekly.as_ref().ok_or(WeeklyError::NoWeeklyBracket)
    }

    pub fn weekly_mut(&mut self) -> Result<&mut WeeklyBracket, WeeklyError> {
        self.weekly.as_mut().ok_or(WeeklyError::NoWeeklyBracket)
    }

    /// Replace the running weekly bracket.
    pub fn set_weekly(&mut self, weekly: WeeklyBracket) {
        self.weekly = Some(weekly);
    }
}
