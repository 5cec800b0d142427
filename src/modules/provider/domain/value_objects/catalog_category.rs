use serde::{Deserialize, Serialize};
use std::fmt;

use super::Season;

/// Genre reference usable against both providers.
///
/// Jikan filters genres by MAL id, AniList by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreRef {
    pub mal_id: i32,
    pub name: String,
}

impl GenreRef {
    pub fn new(mal_id: i32, name: impl Into<String>) -> Self {
        Self {
            mal_id,
            name: name.into(),
        }
    }
}

/// The browsable lists a catalog screen can show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CatalogCategory {
    /// Highest rated first
    TopScored,
    /// Most members / favourites first
    MostPopular,
    /// The season currently airing
    CurrentSeason,
    Seasonal { year: i32, season: Season },
    /// Currently airing shows ordered by score
    Airing,
    Upcoming,
    ByGenre { genre: GenreRef },
}

impl fmt::Display for CatalogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogCategory::TopScored => write!(f, "top scored"),
            CatalogCategory::MostPopular => write!(f, "most popular"),
            CatalogCategory::CurrentSeason => write!(f, "current season"),
            CatalogCategory::Seasonal { year, season } => write!(f, "{} {}", season, year),
            CatalogCategory::Airing => write!(f, "airing"),
            CatalogCategory::Upcoming => write!(f, "upcoming"),
            CatalogCategory::ByGenre { genre } => write!(f, "genre {}", genre.name),
        }
    }
}
