//! YouTube Data API access
//!
//! This module contains everything that talks to the API:
//! - `YouTubeClient::list_videos`: walks `search` pages for a channel
//! - `YouTubeClient::fetch_comments`: reads one page of `commentThreads`
//! - Wire types and `publishedAt` normalization

mod client;
mod errors;
mod timestamp;
pub mod types;

pub use client::{build_http_client, YouTubeClient, SEARCH_PAGE_SIZE};
pub use errors::{ApiError, ApiResult};
pub use timestamp::parse_published_at;
