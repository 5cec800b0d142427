pub mod client;
pub mod dto;
pub mod mapper;

pub use client::{JikanClient, JIKAN_PAGE_SIZE};
