//! Harvest coordinator - the main pipeline loop
//!
//! This module drives one harvest run end to end:
//! - Opening the run on the sink
//! - Listing the channel's videos
//! - Fetching, filtering, and storing each video's comments in order
//! - Closing the run with its totals

use crate::harvest::report::{HarvestReport, VideoFailure};
use crate::harvest::SkipPolicy;
use crate::model::VideoId;
use crate::output::CommentSink;
use crate::youtube::YouTubeClient;
use crate::HarvestError;

/// What happened to a single video
enum VideoOutcome {
    Stored { stored: usize, dropped: usize },
    Empty,
    Skipped { dropped: usize },
}

/// Main harvest driver
///
/// Owns the API client and the sink for the duration of a run. Videos are
/// processed strictly one after another.
pub struct Harvester<S: CommentSink> {
    client: YouTubeClient,
    sink: S,
    comments_limit: u32,
    skip_policy: SkipPolicy,
}

impl<S: CommentSink> Harvester<S> {
    /// Creates a new harvester
    ///
    /// # Arguments
    ///
    /// * `client` - The YouTube API client
    /// * `sink` - Destination for the normalized comments
    /// * `comments_limit` - Maximum comment threads read per video
    /// * `skip_policy` - Which fetched comments are dropped before storing
    pub fn new(
        client: YouTubeClient,
        sink: S,
        comments_limit: u32,
        skip_policy: SkipPolicy,
    ) -> Self {
        Self {
            client,
            sink,
            comments_limit,
            skip_policy,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the harvester and returns its sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs a complete harvest of `channel_id`
    ///
    /// # Errors
    ///
    /// Fails if the sink cannot be opened or closed, or if the channel
    /// listing fails. A sink that fails to close is aborted before the error
    /// is returned. Failures while fetching or storing a single video are
    /// recorded in the report and do not stop the run.
    pub async fn run(&mut self, channel_id: &str) -> Result<HarvestReport, HarvestError> {
        self.sink.begin(channel_id)?;

        let video_ids = match self.client.list_videos(channel_id).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("Failed to list videos for channel {}: {}", channel_id, e);
                if let Err(abort_err) = self.sink.abort(&HarvestReport::default().totals()) {
                    tracing::warn!("Failed to mark run as failed: {}", abort_err);
                }
                return Err(e.into());
            }
        };

        let mut report = HarvestReport {
            videos_listed: video_ids.len() as u64,
            ..Default::default()
        };

        tracing::info!("Fetching comments from {} videos...", video_ids.len());

        for (index, video_id) in video_ids.iter().enumerate() {
            tracing::debug!(
                "Processing video {}/{}: {}",
                index + 1,
                video_ids.len(),
                video_id
            );

            match self.process_video(video_id).await {
                Ok(VideoOutcome::Stored { stored, dropped }) => {
                    report.videos_stored += 1;
                    report.comments_stored += stored as u64;
                    report.comments_dropped += dropped as u64;
                }
                Ok(VideoOutcome::Empty) => {
                    report.videos_empty += 1;
                }
                Ok(VideoOutcome::Skipped { dropped }) => {
                    report.videos_skipped += 1;
                    report.comments_dropped += dropped as u64;
                }
                Err(e) => {
                    tracing::error!(
                        "Error fetching comments for video {}: {}",
                        video_id.watch_url(),
                        e
                    );
                    report.failures.push(VideoFailure {
                        video_id: video_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if let Err(e) = self.sink.finish(&report.totals()) {
            tracing::error!("Failed to finish run on {}: {}", self.sink.target(), e);
            if let Err(abort_err) = self.sink.abort(&report.totals()) {
                tracing::warn!("Failed to mark run as failed: {}", abort_err);
            }
            return Err(e.into());
        }

        tracing::info!(
            "Harvest of {} finished: {} comments from {} videos, {} failed",
            channel_id,
            report.comments_stored,
            report.videos_stored,
            report.failures.len()
        );

        Ok(report)
    }

    /// Fetches one video's comments and hands the surviving batch to the sink
    async fn process_video(&mut self, video_id: &VideoId) -> Result<VideoOutcome, HarvestError> {
        let comments = self
            .client
            .fetch_comments(video_id, self.comments_limit)
            .await?;

        if comments.is_empty() {
            tracing::debug!("Video {} has no comments", video_id);
            return Ok(VideoOutcome::Empty);
        }

        let fetched = comments.len();
        let kept = self.skip_policy.apply(comments);
        let dropped = fetched - kept.len();

        if kept.is_empty() {
            tracing::warn!(
                "Skipping all {} comments of video {} (skip policy: {})",
                fetched,
                video_id,
                self.skip_policy
            );
            return Ok(VideoOutcome::Skipped { dropped });
        }

        let stored = self.sink.store(&kept)?;
        tracing::info!("Stored {} comments for video {}", stored, video_id);

        Ok(VideoOutcome::Stored { stored, dropped })
    }
}
