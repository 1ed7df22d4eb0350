//! Statistics generation from the comment database
//!
//! This module provides functionality for extracting and displaying
//! harvest statistics from the storage layer.

use crate::model::VideoId;
use crate::storage::{RunRecord, Storage, StorageResult};

/// Number of entries shown in the "top" lists
pub const TOP_LIMIT: usize = 10;

/// Harvest statistics summary
#[derive(Debug, Clone)]
pub struct HarvestStatistics {
    /// Total number of stored comment rows
    pub total_comments: u64,

    /// Number of distinct videos with at least one stored comment
    pub videos_with_comments: u64,

    /// Number of recorded harvest runs
    pub total_runs: u64,

    /// Most recent run, if any
    pub latest_run: Option<RunRecord>,

    /// Most active authors with their comment counts
    pub top_authors: Vec<(String, u64)>,

    /// Most commented videos with their comment counts
    pub top_videos: Vec<(VideoId, u64)>,
}

impl HarvestStatistics {
    /// Average number of stored comments per commented video
    pub fn comments_per_video(&self) -> f64 {
        if self.videos_with_comments == 0 {
            return 0.0;
        }
        self.total_comments as f64 / self.videos_with_comments as f64
    }
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<HarvestStatistics> {
    Ok(HarvestStatistics {
        total_comments: storage.count_comments()?,
        videos_with_comments: storage.count_videos()?,
        total_runs: storage.count_runs()?,
        latest_run: storage.get_latest_run()?,
        top_authors: storage.top_authors(TOP_LIMIT)?,
        top_videos: storage.top_videos(TOP_LIMIT)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Stored comments: {}", stats.total_comments);
    println!("  Videos with comments: {}", stats.videos_with_comments);
    println!("  Comments per video: {:.1}", stats.comments_per_video());
    println!("  Harvest runs: {}", stats.total_runs);
    println!();

    if let Some(run) = &stats.latest_run {
        println!("Latest Run (#{}):", run.id);
        println!("  Channel: {}", run.channel_id);
        println!("  Status: {}", run.status.to_db_string());
        println!("  Started: {}", run.started_at);
        if let Some(finished) = &run.finished_at {
            println!("  Finished: {}", finished);
        }
        println!(
            "  Videos: {}, comments: {}, failures: {}",
            run.totals.videos_listed, run.totals.comments_stored, run.totals.failures
        );
        println!();
    }

    if !stats.top_authors.is_empty() {
        println!("Top Authors:");
        for (author, count) in &stats.top_authors {
            println!("  {}: {}", author, count);
        }
        println!();
    }

    if !stats.top_videos.is_empty() {
        println!("Most Commented Videos:");
        for (video_id, count) in &stats.top_videos {
            println!("  {}: {}", video_id.watch_url(), count);
        }
    }
}
