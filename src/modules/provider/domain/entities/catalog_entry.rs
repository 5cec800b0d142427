use crate::modules::provider::domain::value_objects::{AnimeStatus, MediaFormat, Season};
use crate::shared::application::PaginatedResult;
use crate::shared::domain::value_objects::AnimeProvider;
use serde::{Deserialize, Serialize};

/// One anime as presented by a catalog provider, normalized across providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub provider: AnimeProvider,
    /// Identifier in the provider's own id space
    pub id: i64,
    pub mal_id: Option<i64>,
    pub title: String,
    pub title_english: Option<String>,
    pub title_native: Option<String>,
    pub image_url: Option<String>,
    /// Always on a 0-10 scale
    pub score: Option<f32>,
    pub episodes: Option<u32>,
    pub status: AnimeStatus,
    pub format: MediaFormat,
    pub genres: Vec<String>,
    pub synopsis: Option<String>,
    pub season: Option<Season>,
    pub year: Option<i32>,
    pub popularity: Option<i64>,
    pub url: Option<String>,
}

impl CatalogEntry {
    pub fn new(provider: AnimeProvider, id: i64, title: impl Into<String>) -> Self {
        Self {
            provider,
            id,
            mal_id: None,
            title: title.into(),
            title_english: None,
            title_native: None,
            image_url: None,
            score: None,
            episodes: None,
            status: AnimeStatus::Unknown,
            format: MediaFormat::Unknown,
            genres: Vec::new(),
            synopsis: None,
            season: None,
            year: None,
            popularity: None,
            url: None,
        }
    }

    /// English title when the provider has one, otherwise the primary title
    pub fn display_title(&self) -> &str {
        self.title_english
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.title)
    }

    pub fn is_airing(&self) -> bool {
        self.status == AnimeStatus::Airing
    }
}

/// A recommended title together with how many users voted for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub entry: CatalogEntry,
    pub votes: u32,
}

pub type CatalogPage = PaginatedResult<CatalogEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_prefers_english() {
        let mut entry = CatalogEntry::new(AnimeProvider::Jikan, 1, "Shingeki no Kyojin");
        assert_eq!(entry.display_title(), "Shingeki no Kyojin");

        entry.title_english = Some("Attack on Titan".to_string());
        assert_eq!(entry.display_title(), "Attack on Titan");

        entry.title_english = Some("  ".to_string());
        assert_eq!(entry.display_title(), "Shingeki no Kyojin");
    }
}
