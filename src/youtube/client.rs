//! HTTP client for the YouTube Data API
//!
//! This module handles the two requests the harvester needs:
//! - Listing a channel's videos via `search`, following `nextPageToken`
//! - Reading one page of top-level comment threads via `commentThreads`

use crate::config::YouTubeConfig;
use crate::model::{CommentRecord, VideoId};
use crate::youtube::errors::{ApiError, ApiResult};
use crate::youtube::timestamp::parse_published_at;
use crate::youtube::types::{
    CommentThread, CommentThreadListResponse, ErrorResponse, SearchListResponse,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Largest page size the search endpoint accepts
pub const SEARCH_PAGE_SIZE: u32 = 50;

const SEARCH_ENDPOINT: &str = "search";
const COMMENT_THREADS_ENDPOINT: &str = "commentThreads";

/// Builds the HTTP client used for every API call
///
/// # Example
///
/// ```no_run
/// use comment_harvest::youtube::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for the YouTube Data API v3
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    /// Creates a client against `base_url` (normally the public v3 root)
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> ApiResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: build_http_client()?,
            api_key: api_key.into(),
            base_url,
        })
    }

    /// Creates a client from configuration with an already-resolved key
    pub fn from_config(config: &YouTubeConfig, api_key: &str) -> ApiResult<Self> {
        Self::new(api_key, config.api_base_url.as_str())
    }

    /// Lists every video of a channel, newest first
    ///
    /// Issues `search` requests with the maximum page size, ordered by
    /// publish date, until a response carries no continuation token. Ids are
    /// returned in API order without deduplication.
    ///
    /// # Errors
    ///
    /// Any non-success status aborts the listing with `ApiError::Request`;
    /// pages fetched before the failure are discarded.
    pub async fn list_videos(&self, channel_id: &str) -> ApiResult<Vec<VideoId>> {
        let mut video_ids = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page = 0usize;

        loop {
            page += 1;
            let mut params = vec![
                ("part", "id".to_string()),
                ("channelId", channel_id.to_string()),
                ("maxResults", SEARCH_PAGE_SIZE.to_string()),
                ("order", "date".to_string()),
                ("type", "video".to_string()),
                ("key", self.api_key.clone()),
            ];
            if let Some(token) = &page_token {
                tracing::debug!("Using page token: {}", token);
                params.push(("pageToken", token.clone()));
            }

            let data: SearchListResponse = self.get_json(SEARCH_ENDPOINT, &params).await?;

            for item in data.items {
                let video_id = item.id.video_id.ok_or_else(|| {
                    ApiError::Parse(format!(
                        "search result without videoId (kind: {})",
                        item.id.kind.as_deref().unwrap_or("unknown")
                    ))
                })?;
                video_ids.push(VideoId::new(video_id));
            }

            tracing::debug!(
                "Search page {} for channel {}: {} videos so far",
                page,
                channel_id,
                video_ids.len()
            );

            match data.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::info!(
            "Listed {} videos for channel {} ({} pages)",
            video_ids.len(),
            channel_id,
            page
        );
        Ok(video_ids)
    }

    /// Fetches up to `limit` top-level comment threads of a video
    ///
    /// Only the first page is read. Replies are not expanded.
    pub async fn fetch_comments(
        &self,
        video_id: &VideoId,
        limit: u32,
    ) -> ApiResult<Vec<CommentRecord>> {
        let params = vec![
            ("part", "snippet".to_string()),
            ("videoId", video_id.as_str().to_string()),
            ("key", self.api_key.clone()),
            ("maxResults", limit.to_string()),
        ];

        let data: CommentThreadListResponse =
            self.get_json(COMMENT_THREADS_ENDPOINT, &params).await?;

        if data.next_page_token.is_some() {
            tracing::debug!(
                "Video {} has more comment threads beyond the first {}",
                video_id,
                limit
            );
        }

        let records = data
            .items
            .into_iter()
            .take(limit as usize)
            .map(|thread| normalize_thread(video_id, thread))
            .collect::<ApiResult<Vec<_>>>()?;

        tracing::debug!("Fetched {} comments for video {}", records.len(), video_id);
        Ok(records)
    }

    /// Sends a GET request and decodes a successful JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self.client.get(&url).query(params).send().await?;

        if !response.status().is_success() {
            return Err(request_error(endpoint, response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::Parse(format!("{} response: {}", endpoint, e)))
    }
}

/// Turns a non-success response into `ApiError::Request`
///
/// The API wraps failures in `{"error": {"message", "errors": [{"reason"}]}}`;
/// when the body has that shape its message and reason are surfaced,
/// otherwise the raw body is kept.
async fn request_error(endpoint: &'static str, response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(envelope) => match envelope.error.reason() {
            Some(reason) => format!("{} ({})", envelope.error.message, reason),
            None => envelope.error.message,
        },
        Err(_) => body,
    };

    tracing::warn!("{} returned {}: {}", endpoint, status, message);

    ApiError::Request {
        endpoint,
        status,
        message,
    }
}

/// Flattens one comment thread into a record for `video_id`
fn normalize_thread(video_id: &VideoId, thread: CommentThread) -> ApiResult<CommentRecord> {
    let snippet = thread.snippet.top_level_comment.snippet;
    let published_at = parse_published_at(&snippet.published_at)?;

    Ok(CommentRecord::new(
        video_id.clone(),
        snippet.author_display_name,
        snippet.text_display,
        snippet.like_count,
        published_at,
    ))
}
