use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanAnimeResponse {
    pub data: JikanAnimeData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanAnimeListResponse {
    pub data: Vec<JikanAnimeData>,
    pub pagination: Option<JikanPagination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanPagination {
    pub last_visible_page: Option<u32>,
    pub has_next_page: bool,
    pub current_page: Option<u32>,
    pub items: Option<JikanPaginationItems>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanPaginationItems {
    pub count: u32,
    pub total: u64,
    pub per_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanAnimeData {
    pub mal_id: i64,
    pub url: Option<String>,
    pub images: Option<JikanImages>,
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub episodes: Option<u32>,
    pub status: Option<String>,
    #[serde(default)]
    pub airing: bool,
    pub score: Option<f32>,
    pub scored_by: Option<i64>,
    pub rank: Option<i64>,
    pub popularity: Option<i64>,
    pub members: Option<i64>,
    pub synopsis: Option<String>,
    pub season: Option<String>,
    pub year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<JikanEntity>,
    #[serde(default)]
    pub themes: Vec<JikanEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanImages {
    pub jpg: Option<JikanImageSet>,
    pub webp: Option<JikanImageSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanEntity {
    pub mal_id: i64,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanRecommendationsResponse {
    pub data: Vec<JikanRecommendation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanRecommendation {
    pub entry: JikanRecommendedAnime,
    #[serde(default)]
    pub votes: u32,
}

/// Recommendation entries only carry the identifying fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanRecommendedAnime {
    pub mal_id: i64,
    pub url: Option<String>,
    pub images: Option<JikanImages>,
    pub title: String,
}

// Search request parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JikanSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub anime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sfw: Option<bool>,
}

impl Default for JikanSearchParams {
    fn default() -> Self {
        Self {
            q: None,
            page: Some(1),
            limit: Some(25),
            anime_type: None,
            status: None,
            min_score: None,
            genres: None,
            order_by: None,
            sort: None,
            sfw: Some(true),
        }
    }
}
