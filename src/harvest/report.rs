use crate::model::VideoId;
use crate::storage::RunTotals;

/// A video whose comments could not be fetched or stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFailure {
    pub video_id: VideoId,
    pub error: String,
}

impl VideoFailure {
    pub fn watch_url(&self) -> String {
        self.video_id.watch_url()
    }
}

/// Outcome of one harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    /// Videos returned by the channel listing
    pub videos_listed: u64,

    /// Videos whose comments reached the sink
    pub videos_stored: u64,

    /// Videos that returned no comment threads
    pub videos_empty: u64,

    /// Videos whose whole batch was dropped by the skip policy
    pub videos_skipped: u64,

    /// Records accepted by the sink
    pub comments_stored: u64,

    /// Records removed by the skip policy
    pub comments_dropped: u64,

    /// Per-video failures, in processing order
    pub failures: Vec<VideoFailure>,
}

impl HarvestReport {
    /// Counters persisted with the run
    pub fn totals(&self) -> RunTotals {
        RunTotals {
            videos_listed: self.videos_listed,
            comments_stored: self.comments_stored,
            failures: self.failures.len() as u64,
        }
    }

    /// Videos that went through without an error
    pub fn videos_processed(&self) -> u64 {
        self.videos_stored + self.videos_empty + self.videos_skipped
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
