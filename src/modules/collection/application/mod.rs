pub mod service;

pub use service::{WatchlistService, WATCHLIST_COLLECTION};
