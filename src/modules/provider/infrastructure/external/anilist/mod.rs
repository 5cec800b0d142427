pub mod client;
pub mod dto;
pub mod graphql;
pub mod mapper;

pub use client::{AniListClient, ANILIST_PAGE_SIZE};
