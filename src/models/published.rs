//! Published brackets, categories and filled-out submissions.

use crate::models::bracket::Bracket;
use crate::models::entry::Entry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a published bracket.
pub type BracketId = Uuid;

/// Unique identifier for a filled-out submission.
pub type SubmissionId = Uuid;

/// Sizes offered when creating a bracket.
pub const BRACKET_SIZES: [usize; 4] = [4, 8, 16, 32];

/// Display name used when the author has none.
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Category {
    Movies,
    #[serde(rename = "TV Shows")]
    TvShows,
    Books,
    #[serde(rename = "Sports Teams")]
    SportsTeams,
    #[serde(rename = "Video Games")]
    VideoGames,
    #[serde(rename = "Music Artists")]
    MusicArtists,
    #[serde(rename = "Food & Drinks")]
    FoodAndDrinks,
    Anime,
    Superheroes,
    #[serde(rename = "Historical Figures")]
    HistoricalFigures,
    Other,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Movies,
        Category::TvShows,
        Category::Books,
        Category::SportsTeams,
        Category::VideoGames,
        Category::MusicArtists,
        Category::FoodAndDrinks,
        Category::Anime,
        Category::Superheroes,
        Category::HistoricalFigures,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Movies => "Movies",
            Category::TvShows => "TV Shows",
            Category::Books => "Books",
            Category::SportsTeams => "Sports Teams",
            Category::VideoGames => "Video Games",
            Category::MusicArtists => "Music Artists",
            Category::FoodAndDrinks => "Food & Drinks",
            Category::Anime => "Anime",
            Category::Superheroes => "Superheroes",
            Category::HistoricalFigures => "Historical Figures",
            Category::Other => "Other",
        }
    }
}

/// A bracket someone created and published for others to fill out.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublishedBracket {
    pub id: BracketId,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub size: usize,
    pub owner_id: String,
    pub owner_name: String,
    /// Entries in the order they were typed; seeds follow this order.
    pub entries: Vec<String>,
    /// Seeded tree with no winners.
    pub matchups: Bracket,
    pub created_at: DateTime<Utc>,
}

/// A participant's filled-out copy of a published bracket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub bracket_id: BracketId,
    pub participant_id: String,
    pub display_name: String,
    pub matchups: Bracket,
    pub champion: Option<Entry>,
    pub submitted_at: DateTime<Utc>,
}
