use crate::modules::provider::domain::{
    AnimeProvider, AnimeStatus, CatalogEntry, CatalogPage, MediaFormat, Recommendation, Season,
};
use crate::shared::application::{PageInfo, PaginatedResult};
use regex::Regex;

use super::dto::{AniListMedia, AniListPage, AniListTitle, RecommendationNode};

pub struct AniListMapper;

impl AniListMapper {
    pub fn to_domain(media: AniListMedia) -> CatalogEntry {
        let image_url = media
            .cover_image
            .as_ref()
            .and_then(|c| c.extra_large.clone().or_else(|| c.large.clone()).or_else(|| c.medium.clone()));

        CatalogEntry {
            provider: AnimeProvider::AniList,
            id: media.id,
            mal_id: media.id_mal,
            title: Self::main_title(&media.title),
            title_english: media.title.english.clone(),
            title_native: media.title.native.clone(),
            image_url,
            score: Self::normalize_score(media.average_score),
            episodes: media.episodes,
            status: media
                .status
                .as_deref()
                .map(AnimeStatus::from)
                .unwrap_or_default(),
            format: MediaFormat::from_provider(media.format.as_deref()),
            genres: media.genres,
            synopsis: media.description.as_deref().map(Self::clean_description),
            season: media.season.as_deref().and_then(|s| s.parse::<Season>().ok()),
            year: media.season_year,
            popularity: media.popularity,
            url: media.site_url,
        }
    }

    pub fn to_page(page: AniListPage, requested_page: u32) -> CatalogPage {
        let info = page.page_info;
        let page_info = PageInfo {
            current_page: info.current_page.unwrap_or(requested_page),
            has_next_page: info.has_next_page.unwrap_or(false),
            last_page: info.last_page,
            total: info.total,
            per_page: info.per_page,
        };

        PaginatedResult::new(
            page.media.into_iter().map(Self::to_domain).collect(),
            page_info,
        )
    }

    /// Nodes without a recommended media (deleted entries) are skipped
    pub fn to_recommendation(node: RecommendationNode) -> Option<Recommendation> {
        let media = node.media_recommendation?;
        Some(Recommendation {
            entry: Self::to_domain(media),
            votes: node.rating.unwrap_or(0).max(0) as u32,
        })
    }

    /// Normalize AniList score (0-100) to unified 0-10 scale
    fn normalize_score(score: Option<i32>) -> Option<f32> {
        score
            .filter(|s| *s > 0)
            .map(|s| (s as f32 / 10.0).clamp(0.0, 10.0))
    }

    fn main_title(title: &AniListTitle) -> String {
        title
            .user_preferred
            .as_ref()
            .or(title.romaji.as_ref())
            .or(title.english.as_ref())
            .or(title.native.as_ref())
            .cloned()
            .unwrap_or_else(|| "Unknown Title".to_string())
    }

    /// Descriptions can still carry `<br>` and `<i>` tags
    fn clean_description(description: &str) -> String {
        let without_breaks = description.replace("<br>", "\n").replace("<br/>", "\n");
        match Regex::new(r"<[^>]+>") {
            Ok(tags) => tags.replace_all(&without_breaks, "").trim().to_string(),
            Err(_) => without_breaks.trim().to_string(),
        }
    }
}
