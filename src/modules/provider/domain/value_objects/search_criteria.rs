use serde::{Deserialize, Serialize};

use super::{AnimeStatus, GenreRef, MediaFormat};
use crate::shared::errors::AppResult;
use crate::shared::utils::Validator;

/// Result ordering for title searches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOrder {
    /// Provider's own relevance ranking
    #[default]
    Relevance,
    Score,
    Popularity,
    Title,
    StartDate,
}

/// Title search with optional filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub query: String,
    pub format: Option<MediaFormat>,
    pub status: Option<AnimeStatus>,
    pub min_score: Option<f32>,
    pub genre: Option<GenreRef>,
    pub order: SearchOrder,
}

impl SearchFilters {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            format: None,
            status: None,
            min_score: None,
            genre: None,
            order: SearchOrder::default(),
        }
    }

    pub fn with_format(mut self, format: MediaFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_status(mut self, status: AnimeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = Some(min_score);
        self
    }

    pub fn with_genre(mut self, genre: GenreRef) -> Self {
        self.genre = Some(genre);
        self
    }

    pub fn with_order(mut self, order: SearchOrder) -> Self {
        self.order = order;
        self
    }

    /// Trimmed query text sent to providers
    pub fn normalized_query(&self) -> &str {
        self.query.trim()
    }

    pub fn validate(&self) -> AppResult<()> {
        Validator::validate_search_query(&self.query)?;
        if let Some(score) = self.min_score {
            Validator::validate_score(score)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_validation() {
        let filters = SearchFilters::new("  one piece ")
            .with_format(MediaFormat::TV)
            .with_min_score(7.5)
            .with_order(SearchOrder::Score);

        assert_eq!(filters.normalized_query(), "one piece");
        assert_eq!(filters.format, Some(MediaFormat::TV));
        assert!(filters.validate().is_ok());
    }

    #[test]
    fn test_invalid_filters() {
        assert!(SearchFilters::new("").validate().is_err());
        assert!(SearchFilters::new("naruto")
            .with_min_score(11.0)
            .validate()
            .is_err());
    }
}
