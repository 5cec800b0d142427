use crate::modules::provider::domain::{
    AnimeProvider, AnimeStatus, CatalogEntry, CatalogPage, MediaFormat, Recommendation, Season,
};
use crate::shared::application::{PageInfo, PaginatedResult};

use super::dto::{
    JikanAnimeData, JikanAnimeListResponse, JikanImages, JikanPagination, JikanRecommendation,
};

pub struct JikanMapper;

impl JikanMapper {
    pub fn to_domain(dto: JikanAnimeData) -> CatalogEntry {
        let image_url = Self::extract_image_url(dto.images.as_ref());
        let status = dto
            .status
            .as_deref()
            .map(AnimeStatus::from)
            .unwrap_or(if dto.airing {
                AnimeStatus::Airing
            } else {
                AnimeStatus::Unknown
            });

        let genres = dto
            .genres
            .iter()
            .chain(dto.themes.iter())
            .map(|g| g.name.clone())
            .collect();

        CatalogEntry {
            provider: AnimeProvider::Jikan,
            id: dto.mal_id,
            mal_id: Some(dto.mal_id),
            title: dto.title,
            title_english: dto.title_english,
            title_native: dto.title_japanese,
            image_url,
            score: dto.score.filter(|s| *s > 0.0),
            episodes: dto.episodes,
            status,
            format: MediaFormat::from_provider(dto.anime_type.as_deref()),
            genres,
            synopsis: dto.synopsis,
            season: dto.season.as_deref().and_then(|s| s.parse::<Season>().ok()),
            year: dto.year,
            popularity: dto.members,
            url: dto.url,
        }
    }

    pub fn to_page(response: JikanAnimeListResponse, requested_page: u32) -> CatalogPage {
        let count = response.data.len();
        let page_info = response
            .pagination
            .map(|p| Self::map_pagination(p, requested_page))
            .unwrap_or_else(|| PageInfo::single(requested_page, count));

        PaginatedResult::new(
            response.data.into_iter().map(Self::to_domain).collect(),
            page_info,
        )
    }

    pub fn to_recommendation(dto: JikanRecommendation) -> Recommendation {
        let mut entry = CatalogEntry::new(AnimeProvider::Jikan, dto.entry.mal_id, dto.entry.title);
        entry.mal_id = Some(dto.entry.mal_id);
        entry.image_url = Self::extract_image_url(dto.entry.images.as_ref());
        entry.url = dto.entry.url;

        Recommendation {
            entry,
            votes: dto.votes,
        }
    }

    fn map_pagination(pagination: JikanPagination, requested_page: u32) -> PageInfo {
        PageInfo {
            current_page: pagination.current_page.unwrap_or(requested_page),
            has_next_page: pagination.has_next_page,
            last_page: pagination.last_visible_page,
            total: pagination.items.as_ref().map(|i| i.total),
            per_page: pagination.items.as_ref().map(|i| i.per_page),
        }
    }

    /// Largest available image, preferring JPG over WebP
    fn extract_image_url(images: Option<&JikanImages>) -> Option<String> {
        let images = images?;
        [images.jpg.as_ref(), images.webp.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|set| {
                set.large_image_url
                    .clone()
                    .or_else(|| set.image_url.clone())
                    .or_else(|| set.small_image_url.clone())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> JikanAnimeData {
        serde_json::from_value(json!({
            "mal_id": 52991,
            "url": "https://myanimelist.net/anime/52991",
            "images": {
                "jpg": {
                    "image_url": "https://cdn.myanimelist.net/images/anime/1015/138006.jpg",
                    "large_image_url": "https://cdn.myanimelist.net/images/anime/1015/138006l.jpg"
                }
            },
            "title": "Sousou no Frieren",
            "title_english": "Frieren: Beyond Journey's End",
            "type": "TV",
            "episodes": 28,
            "status": "Finished Airing",
            "airing": false,
            "score": 9.31,
            "members": 1000000,
            "season": "fall",
            "year": 2023,
            "genres": [{"mal_id": 2, "type": "anime", "name": "Adventure", "url": ""}],
            "themes": [{"mal_id": 1, "type": "anime", "name": "Fantasy", "url": ""}]
        }))
        .unwrap()
    }

    #[test]
    fn test_maps_core_fields() {
        let entry = JikanMapper::to_domain(sample());
        assert_eq!(entry.provider, AnimeProvider::Jikan);
        assert_eq!(entry.id, 52991);
        assert_eq!(entry.mal_id, Some(52991));
        assert_eq!(entry.display_title(), "Frieren: Beyond Journey's End");
        assert_eq!(entry.status, AnimeStatus::Finished);
        assert_eq!(entry.format, MediaFormat::TV);
        assert_eq!(entry.season, Some(Season::Fall));
        assert_eq!(entry.genres, vec!["Adventure", "Fantasy"]);
        assert_eq!(
            entry.image_url.as_deref(),
            Some("https://cdn.myanimelist.net/images/anime/1015/138006l.jpg")
        );
    }

    #[test]
    fn test_missing_pagination_is_single_page() {
        let response = JikanAnimeListResponse {
            data: vec![sample()],
            pagination: None,
        };
        let page = JikanMapper::to_page(response, 1);
        assert_eq!(page.len(), 1);
        assert!(!page.page_info.has_next_page);
    }
}
