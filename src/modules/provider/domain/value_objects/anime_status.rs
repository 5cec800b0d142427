use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimeStatus {
    Airing,
    Finished,
    NotYetAired,
    Cancelled,
    Hiatus,
    #[default]
    Unknown,
}

impl AnimeStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            AnimeStatus::Airing => "Currently Airing",
            AnimeStatus::Finished => "Finished Airing",
            AnimeStatus::NotYetAired => "Not Yet Aired",
            AnimeStatus::Cancelled => "Cancelled",
            AnimeStatus::Hiatus => "On Hiatus",
            AnimeStatus::Unknown => "Unknown",
        }
    }

    /// Filter value for Jikan's `/anime?status=` parameter
    pub fn as_jikan_filter(&self) -> Option<&'static str> {
        match self {
            AnimeStatus::Airing => Some("airing"),
            AnimeStatus::Finished => Some("complete"),
            AnimeStatus::NotYetAired => Some("upcoming"),
            _ => None,
        }
    }

    /// `MediaStatus` enum value used by AniList
    pub fn as_anilist(&self) -> Option<&'static str> {
        match self {
            AnimeStatus::Airing => Some("RELEASING"),
            AnimeStatus::Finished => Some("FINISHED"),
            AnimeStatus::NotYetAired => Some("NOT_YET_RELEASED"),
            AnimeStatus::Cancelled => Some("CANCELLED"),
            AnimeStatus::Hiatus => Some("HIATUS"),
            AnimeStatus::Unknown => None,
        }
    }
}

impl fmt::Display for AnimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl From<&str> for AnimeStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "currently airing" | "airing" | "releasing" => AnimeStatus::Airing,
            "finished airing" | "finished" | "complete" => AnimeStatus::Finished,
            "not yet aired" | "not_yet_aired" | "not_yet_released" | "upcoming" => {
                AnimeStatus::NotYetAired
            }
            "cancelled" => AnimeStatus::Cancelled,
            "hiatus" => AnimeStatus::Hiatus,
            _ => AnimeStatus::Unknown,
        }
    }
}
