/// Canned provider payloads and domain objects for tests
use anitrack_lib::modules::account::{AuthSession, UserProfile};
use anitrack_lib::modules::collection::{WatchStatus, WatchlistEntry};
use anitrack_lib::modules::provider::AnimeProvider;
use serde_json::{json, Value};

pub struct AnimeFactory;

impl AnimeFactory {
    /// One item as Jikan returns it inside `data`
    pub fn jikan_anime(mal_id: i64, title: &str) -> Value {
        json!({
            "mal_id": mal_id,
            "url": format!("https://myanimelist.net/anime/{}", mal_id),
            "images": {
                "jpg": {
                    "image_url": format!("https://cdn.myanimelist.net/images/anime/{}.jpg", mal_id),
                    "large_image_url": format!("https://cdn.myanimelist.net/images/anime/{}l.jpg", mal_id)
                }
            },
            "title": title,
            "title_english": null,
            "type": "TV",
            "episodes": 12,
            "status": "Finished Airing",
            "airing": false,
            "score": 8.5,
            "members": 250000,
            "synopsis": "A test synopsis.",
            "season": "spring",
            "year": 2020,
            "genres": [{ "mal_id": 1, "type": "anime", "name": "Action", "url": "" }],
            "themes": []
        })
    }

    pub fn jikan_list(items: Vec<Value>, page: u32, has_next_page: bool) -> Value {
        let count = items.len();
        json!({
            "data": items,
            "pagination": {
                "last_visible_page": if has_next_page { page + 1 } else { page },
                "has_next_page": has_next_page,
                "current_page": page,
                "items": { "count": count, "total": 100, "per_page": 25 }
            }
        })
    }

    /// One media object as AniList returns it
    pub fn anilist_media(id: i64, title: &str) -> Value {
        json!({
            "id": id,
            "idMal": id + 1000,
            "title": {
                "romaji": title,
                "english": null,
                "native": null,
                "userPreferred": title
            },
            "description": "A <b>test</b> description.",
            "season": "WINTER",
            "seasonYear": 2021,
            "format": "TV",
            "status": "RELEASING",
            "episodes": 24,
            "coverImage": { "extraLarge": null, "large": format!("https://img.anili.st/{}.jpg", id), "medium": null },
            "genres": ["Drama"],
            "averageScore": 84,
            "popularity": 5000,
            "siteUrl": format!("https://anilist.co/anime/{}", id)
        })
    }

    pub fn anilist_page(media: Vec<Value>, page: u32, has_next_page: bool) -> Value {
        json!({
            "data": {
                "Page": {
                    "pageInfo": {
                        "total": 100,
                        "currentPage": page,
                        "lastPage": 4,
                        "hasNextPage": has_next_page,
                        "perPage": 25
                    },
                    "media": media
                }
            }
        })
    }
}

pub struct AccountFactory;

impl AccountFactory {
    pub fn profile(uid: &str) -> UserProfile {
        UserProfile {
            uid: uid.to_string(),
            email: format!("{}@example.com", uid),
            display_name: Some("Tester".to_string()),
            photo_url: None,
        }
    }

    pub fn session(uid: &str) -> AuthSession {
        AuthSession::new(
            Self::profile(uid),
            format!("id-token-{}", uid),
            format!("refresh-token-{}", uid),
            3600,
        )
    }
}

pub struct WatchlistFactory;

impl WatchlistFactory {
    pub fn entry(anime_id: i64, title: &str) -> WatchlistEntry {
        let mut entry = WatchlistEntry::new(anime_id, AnimeProvider::Jikan, title);
        entry.total_episodes = Some(12);
        entry
    }

    /// A stored document for `entry`, as the proxy returns it
    pub fn document(id: &str, entry: &WatchlistEntry) -> Value {
        let mut document = entry.to_document().unwrap();
        document["id"] = json!(id);
        document
    }

    pub fn stored(id: &str, anime_id: i64, status: WatchStatus) -> WatchlistEntry {
        let mut entry = Self::entry(anime_id, &format!("Anime {}", anime_id));
        entry.id = Some(id.to_string());
        entry.status = status;
        entry
    }
}
