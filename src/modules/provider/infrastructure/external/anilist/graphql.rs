/// AniList GraphQL Query Definitions
/// Organized collection of GraphQL queries for different use cases
use crate::modules::provider::domain::{CatalogCategory, SearchFilters, SearchOrder, Season};
use chrono::Utc;
use serde_json::{json, Value};

/// Fields every query selects for a media item
const MEDIA_FIELDS: &str = r#"
    fragment mediaFields on Media {
        id
        idMal
        title {
            romaji
            english
            native
            userPreferred
        }
        description(asHtml: false)
        season
        seasonYear
        format
        status
        episodes
        coverImage {
            extraLarge
            large
            medium
        }
        genres
        averageScore
        popularity
        siteUrl
    }
"#;

const PAGE_QUERY: &str = r#"
    query (
        $page: Int, $perPage: Int, $sort: [MediaSort], $search: String,
        $season: MediaSeason, $seasonYear: Int, $status: MediaStatus,
        $genres: [String], $format: MediaFormat, $minScore: Int
    ) {
        Page(page: $page, perPage: $perPage) {
            pageInfo {
                total
                currentPage
                lastPage
                hasNextPage
                perPage
            }
            media(
                type: ANIME, isAdult: false, sort: $sort, search: $search,
                season: $season, seasonYear: $seasonYear, status: $status,
                genre_in: $genres, format: $format, averageScore_greater: $minScore
            ) {
                ...mediaFields
            }
        }
    }
"#;

const MEDIA_QUERY: &str = r#"
    query ($id: Int) {
        Media(id: $id, type: ANIME) {
            ...mediaFields
        }
    }
"#;

const RECOMMENDATIONS_QUERY: &str = r#"
    query ($id: Int, $perPage: Int) {
        Media(id: $id, type: ANIME) {
            recommendations(perPage: $perPage, sort: [RATING_DESC]) {
                nodes {
                    rating
                    mediaRecommendation {
                        ...mediaFields
                    }
                }
            }
        }
    }
"#;

pub struct AniListQueries;

impl AniListQueries {
    /// Paginated media list, used for both browsing and search
    pub fn page_query() -> String {
        format!("{}{}", PAGE_QUERY, MEDIA_FIELDS)
    }

    pub fn media_query() -> String {
        format!("{}{}", MEDIA_QUERY, MEDIA_FIELDS)
    }

    pub fn recommendations_query() -> String {
        format!("{}{}", RECOMMENDATIONS_QUERY, MEDIA_FIELDS)
    }

    /// Variables for a browsable category. Unset filters are sent as null,
    /// which AniList treats as absent.
    pub fn category_variables(category: &CatalogCategory, page: u32, per_page: u32) -> Value {
        let mut variables = json!({
            "page": page,
            "perPage": per_page,
        });

        let (sort, extra) = match category {
            CatalogCategory::TopScored => ("SCORE_DESC", json!({})),
            CatalogCategory::MostPopular => ("POPULARITY_DESC", json!({})),
            CatalogCategory::CurrentSeason => {
                let (season, year) = Season::for_date(Utc::now().date_naive());
                (
                    "POPULARITY_DESC",
                    json!({ "season": season.as_anilist(), "seasonYear": year }),
                )
            }
            CatalogCategory::Seasonal { year, season } => (
                "POPULARITY_DESC",
                json!({ "season": season.as_anilist(), "seasonYear": year }),
            ),
            CatalogCategory::Airing => ("SCORE_DESC", json!({ "status": "RELEASING" })),
            CatalogCategory::Upcoming => {
                ("POPULARITY_DESC", json!({ "status": "NOT_YET_RELEASED" }))
            }
            CatalogCategory::ByGenre { genre } => ("SCORE_DESC", json!({ "genres": [genre.name] })),
        };

        variables["sort"] = json!([sort]);
        merge(&mut variables, extra);
        variables
    }

    /// Variables for a title search
    pub fn search_variables(filters: &SearchFilters, page: u32, per_page: u32) -> Value {
        let sort = match filters.order {
            SearchOrder::Relevance => "SEARCH_MATCH",
            SearchOrder::Score => "SCORE_DESC",
            SearchOrder::Popularity => "POPULARITY_DESC",
            SearchOrder::Title => "TITLE_ROMAJI",
            SearchOrder::StartDate => "START_DATE_DESC",
        };

        json!({
            "page": page,
            "perPage": per_page,
            "sort": [sort],
            "search": filters.normalized_query(),
            "format": filters.format.and_then(|f| f.as_anilist()),
            "status": filters.status.and_then(|s| s.as_anilist()),
            "genres": filters.genre.as_ref().map(|g| vec![g.name.clone()]),
            // averageScore is 0-100 and the filter is exclusive
            "minScore": filters.min_score.map(|s| (s * 10.0).round() as i32 - 1),
        })
    }

    pub fn media_variables(id: i64) -> Value {
        json!({ "id": id })
    }

    pub fn recommendations_variables(id: i64, per_page: u32) -> Value {
        json!({ "id": id, "perPage": per_page })
    }
}

fn merge(target: &mut Value, extra: Value) {
    if let (Some(target), Value::Object(extra)) = (target.as_object_mut(), extra) {
        target.extend(extra);
    }
}
