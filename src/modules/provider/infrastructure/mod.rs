pub mod external;

pub use external::{AniListClient, JikanClient};
