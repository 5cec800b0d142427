pub mod anilist;
pub mod jikan;
pub mod retry_util;

pub use anilist::AniListClient;
pub use jikan::JikanClient;
pub use retry_util::{CommonHttpHandler, RetryConfig, RetryOn, RetryUtil};
