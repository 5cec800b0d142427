use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

/// Supported anime data providers
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AnimeProvider {
    /// Jikan (MyAnimeList API) - Default provider, rate limited
    #[default]
    #[serde(rename = "jikan")]
    Jikan,
    /// AniList GraphQL API
    #[serde(rename = "anilist")]
    AniList,
}

impl AnimeProvider {
    pub fn display_name(&self) -> &'static str {
        match self {
            AnimeProvider::Jikan => "Jikan",
            AnimeProvider::AniList => "AniList",
        }
    }
}

impl fmt::Display for AnimeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnimeProvider::Jikan => "jikan",
            AnimeProvider::AniList => "anilist",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for AnimeProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jikan" | "mal" | "myanimelist" => Ok(AnimeProvider::Jikan),
            "anilist" => Ok(AnimeProvider::AniList),
            other => Err(AppError::InvalidInput(format!(
                "Unknown provider '{}'. Must be one of: jikan, anilist",
                other
            ))),
        }
    }
}
