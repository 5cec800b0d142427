mod anime_status;
mod catalog_category;
mod media_format;
mod search_criteria;
mod season;

pub use anime_status::AnimeStatus;
pub use catalog_category::{CatalogCategory, GenreRef};
pub use media_format::MediaFormat;
pub use search_criteria::{SearchFilters, SearchOrder};
pub use season::Season;
