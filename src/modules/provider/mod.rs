pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod traits;

// Re-exports for easy external access
pub use application::CatalogService;
pub use domain::{AnimeProvider, CatalogCategory, CatalogEntry, CatalogPage, SearchFilters};
pub use infrastructure::{AniListClient, JikanClient};
pub use traits::AnimeProviderClient;
