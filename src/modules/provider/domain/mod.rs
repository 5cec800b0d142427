pub mod entities;
pub mod value_objects;

// Re-exports for easy access
pub use crate::shared::domain::value_objects::AnimeProvider;
pub use entities::*;
pub use value_objects::*;
