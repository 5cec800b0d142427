pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod traits;

// Re-exports for easy external access
pub use application::WatchlistService;
pub use domain::{WatchStatus, WatchlistEntry};
pub use infrastructure::DocumentStoreClient;
pub use traits::{DocumentOperation, DocumentRequest, DocumentResult, DocumentStore, Filter};
