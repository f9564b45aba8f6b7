//! Read-only views for rendering/printing, leaderboard CSV export and entry-list CSV import.

use crate::logic::round_name;
use crate::models::{Bracket, Entry, Matchup, PoolEntry, PublishedBracket};
use serde::Serialize;

/// Errors while reading or writing CSV.
#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Csv(e) => write!(f, "CSV error: {}", e),
            ExportError::Io(e) => write!(f, "Could not write CSV: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e)
    }
}

/// One column of a printable bracket.
#[derive(Clone, Debug, Serialize)]
pub struct RoundView {
    pub index: usize,
    pub name: String,
    pub matchups: Vec<Matchup>,
}

/// Everything a renderer needs to lay out a bracket.
#[derive(Clone, Debug, Serialize)]
pub struct BracketView {
    pub title: String,
    pub subtitle: String,
    pub rounds: Vec<RoundView>,
    pub champion: Option<Entry>,
    pub complete: bool,
}

/// Lay out any tree (blank, filled or in progress) under a heading.
pub fn tree_view(title: &str, subtitle: &str, bracket: &Bracket) -> BracketView {
    let total = bracket.round_count();
    BracketView {
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        rounds: bracket
            .rounds()
            .iter()
            .enumerate()
            .map(|(index, matchups)| RoundView {
                index,
                name: round_name(index, total),
                matchups: matchups.clone(),
            })
            .collect(),
        champion: bracket.champion().cloned(),
        complete: bracket.is_complete(),
    }
}

/// View of a published bracket, optionally with someone's picks filled in.
pub fn bracket_view(published: &PublishedBracket, filled: Option<&Bracket>) -> BracketView {
    let subtitle = format!("{} \u{2022} {} Entries", published.category.label(), published.size);
    tree_view(
        &published.title,
        &subtitle,
        filled.unwrap_or(&published.matchups),
    )
}

#[derive(Serialize)]
struct LeaderboardRow<'a> {
    rank: usize,
    participant: &'a str,
    score: u32,
    sleeper1_hit: bool,
    sleeper2_hit: bool,
    champion_pick: &'a str,
}

/// CSV of a ranked leaderboard. Equal scores share a rank (1, 1, 3).
pub fn leaderboard_csv(ranked: &[PoolEntry]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    let mut rank = 0;
    for (i, entry) in ranked.iter().enumerate() {
        if i == 0 || ranked[i - 1].score != entry.score {
            rank = i + 1;
        }
        let champion_pick = entry
            .predictions
            .as_ref()
            .and_then(|p| p.champion())
            .map_or("", |c| c.name.as_str());
        wtr.serialize(LeaderboardRow {
            rank,
            participant: &entry.display_name,
            score: entry.score,
            sleeper1_hit: entry.sleeper1_hit,
            sleeper2_hit: entry.sleeper2_hit,
            champion_pick,
        })?;
    }
    let bytes = wtr.into_inner().map_err(|e| ExportError::Io(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Io(e.to_string()))
}

/// Entry names from the first column of a CSV list. Blank rows are skipped, and a
/// leading `name` header is dropped.
pub fn entries_from_csv(data: &str) -> Result<Vec<String>, ExportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());
    let mut names = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let name = record.get(0).unwrap_or("");
        if name.is_empty() || (i == 0 && name.eq_ignore_ascii_case("name")) {
            continue;
        }
        names.push(name.to_string());
    }
    Ok(names)
}
