//! Jikan client tests against a local mock server

mod utils;

use anitrack_lib::modules::provider::domain::{
    AnimeStatus, CatalogCategory, GenreRef, MediaFormat, SearchFilters, Season,
};
use anitrack_lib::modules::provider::infrastructure::external::{JikanClient, RetryConfig};
use anitrack_lib::modules::provider::{AnimeProvider, AnimeProviderClient};
use anitrack_lib::shared::errors::AppError;
use anitrack_lib::shared::utils::RateLimitedQueue;
use anitrack_lib::shared::AppConfig;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::time::{Duration, Instant};
use utils::factories::AnimeFactory;

const TEST_COOLDOWN: Duration = Duration::from_millis(150);

fn client_for(server: &ServerGuard) -> JikanClient {
    JikanClient::with_queue(
        &server.url(),
        Duration::from_secs(5),
        RateLimitedQueue::new("Jikan", TEST_COOLDOWN),
        RetryConfig::none(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_top_anime_page_is_mapped() {
    let mut server = Server::new_async().await;
    let body = AnimeFactory::jikan_list(
        vec![
            AnimeFactory::jikan_anime(5114, "Fullmetal Alchemist: Brotherhood"),
            AnimeFactory::jikan_anime(9253, "Steins;Gate"),
        ],
        1,
        true,
    );
    let mock = server
        .mock("GET", "/top/anime")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("limit".into(), "25".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let page = client
        .list_by_category(&CatalogCategory::TopScored, 1)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.len(), 2);
    assert_eq!(page.items[0].id, 5114);
    assert_eq!(page.items[0].provider, AnimeProvider::Jikan);
    assert_eq!(page.items[1].title, "Steins;Gate");
    assert!(page.page_info.has_next_page);
    assert_eq!(page.page_info.next_page(), Some(2));
    assert_eq!(page.page_info.total, Some(100));
}

#[tokio::test]
async fn test_category_routes() {
    let mut server = Server::new_async().await;
    let empty = AnimeFactory::jikan_list(vec![], 1, false).to_string();

    let popular = server
        .mock("GET", "/top/anime")
        .match_query(Matcher::UrlEncoded("filter".into(), "bypopularity".into()))
        .with_body(empty.clone())
        .create_async()
        .await;
    let seasonal = server
        .mock("GET", "/seasons/2023/fall")
        .match_query(Matcher::Any)
        .with_body(empty.clone())
        .create_async()
        .await;
    let upcoming = server
        .mock("GET", "/seasons/upcoming")
        .match_query(Matcher::Any)
        .with_body(empty.clone())
        .create_async()
        .await;
    let genre = server
        .mock("GET", "/anime")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("genres".into(), "8".into()),
            Matcher::UrlEncoded("order_by".into(), "score".into()),
            Matcher::UrlEncoded("sort".into(), "desc".into()),
        ]))
        .with_body(empty)
        .create_async()
        .await;

    let client = client_for(&server);
    client
        .list_by_category(&CatalogCategory::MostPopular, 1)
        .await
        .unwrap();
    client
        .list_by_category(
            &CatalogCategory::Seasonal {
                year: 2023,
                season: Season::Fall,
            },
            1,
        )
        .await
        .unwrap();
    client
        .list_by_category(&CatalogCategory::Upcoming, 1)
        .await
        .unwrap();
    client
        .list_by_category(
            &CatalogCategory::ByGenre {
                genre: GenreRef::new(8, "Drama"),
            },
            1,
        )
        .await
        .unwrap();

    popular.assert_async().await;
    seasonal.assert_async().await;
    upcoming.assert_async().await;
    genre.assert_async().await;
}

#[tokio::test]
async fn test_unknown_anime_is_none() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/anime/999999")
        .with_status(404)
        .with_body(json!({ "status": 404, "message": "Resource does not exist" }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    assert_eq!(client.get_anime_by_id(999999).await.unwrap(), None);
}

#[tokio::test]
async fn test_anime_details() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/anime/9253")
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": AnimeFactory::jikan_anime(9253, "Steins;Gate") }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let entry = client.get_anime_by_id(9253).await.unwrap().unwrap();
    assert_eq!(entry.title, "Steins;Gate");
    assert_eq!(entry.format, MediaFormat::TV);
    assert_eq!(entry.status, AnimeStatus::Finished);
    assert_eq!(entry.episodes, Some(12));
    assert_eq!(entry.score, Some(8.5));
}

#[tokio::test]
async fn test_search_sends_filters() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/anime")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "cowboy bebop".into()),
            Matcher::UrlEncoded("type".into(), "movie".into()),
            Matcher::UrlEncoded("sfw".into(), "true".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_body(
            AnimeFactory::jikan_list(vec![AnimeFactory::jikan_anime(5, "Cowboy Bebop: Tengoku no Tobira")], 2, false)
                .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let filters = SearchFilters::new("  cowboy bebop ").with_format(MediaFormat::Movie);
    let page = client.search_anime(&filters, 2).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.len(), 1);
    assert_eq!(page.page_info.current_page, 2);
}

#[tokio::test]
async fn test_invalid_input_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.search_anime(&SearchFilters::new("   "), 1).await,
        Err(AppError::ValidationError(_))
    ));
    assert!(matches!(
        client.list_by_category(&CatalogCategory::TopScored, 0).await,
        Err(AppError::ValidationError(_))
    ));
    assert!(matches!(
        client.get_anime_by_id(0).await,
        Err(AppError::ValidationError(_))
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_surfaces() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/top/anime")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client.list_by_category(&CatalogCategory::Airing, 1).await;
    assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
}

#[tokio::test]
async fn test_malformed_body_is_serialization_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/seasons/now")
        .match_query(Matcher::Any)
        .with_body("{\"data\": \"nope\"}")
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client
        .list_by_category(&CatalogCategory::CurrentSeason, 1)
        .await;
    assert!(matches!(result, Err(AppError::SerializationError(_))));
}

#[tokio::test]
async fn test_recommendations() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/anime/1/recommendations")
        .with_body(
            json!({
                "data": [
                    {
                        "entry": {
                            "mal_id": 4106,
                            "url": "https://myanimelist.net/anime/4106",
                            "images": { "jpg": { "image_url": "https://cdn.example/4106.jpg" } },
                            "title": "Trigun"
                        },
                        "votes": 42
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let recommendations = client.get_recommendations(1).await.unwrap();
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0].votes, 42);
    assert_eq!(recommendations[0].entry.title, "Trigun");
    assert_eq!(
        recommendations[0].entry.image_url.as_deref(),
        Some("https://cdn.example/4106.jpg")
    );
}

#[tokio::test]
async fn test_concurrent_calls_are_spaced() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/top/anime")
        .match_query(Matcher::Any)
        .with_body(AnimeFactory::jikan_list(vec![], 1, false).to_string())
        .expect(3)
        .create_async()
        .await;

    let client = client_for(&server);
    let started = Instant::now();
    let (a, b, c) = tokio::join!(
        client.list_by_category(&CatalogCategory::TopScored, 1),
        client.list_by_category(&CatalogCategory::TopScored, 2),
        client.list_by_category(&CatalogCategory::TopScored, 3),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert!(started.elapsed() >= TEST_COOLDOWN * 2);
    mock.assert_async().await;
}

#[test]
fn test_rate_limit_info_reflects_cooldown() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let _guard = runtime.enter();

    let client = JikanClient::new(&AppConfig::default()).unwrap();
    let info = client.rate_limit_info().unwrap();
    assert_eq!(info.min_delay(), Duration::from_millis(500));
    assert_eq!(client.provider_type(), AnimeProvider::Jikan);
}
