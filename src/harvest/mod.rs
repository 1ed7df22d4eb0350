//! Harvest module: the list → fetch → store pipeline
//!
//! This module contains the driver that ties the API client to a sink:
//! - Listing the channel's videos (fatal on failure)
//! - Fetching each video's comment threads in order
//! - Applying the skip policy and forwarding batches to the sink
//! - Isolating per-video failures into the run report

mod coordinator;
mod report;

pub use coordinator::Harvester;
pub use report::{HarvestReport, VideoFailure};

use crate::model::CommentRecord;
use serde::Deserialize;
use std::fmt;

/// Which fetched comments are dropped before reaching the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipPolicy {
    /// Store every fetched comment
    #[default]
    Never,
    /// Drop the whole batch when its first comment has empty text
    FirstEmpty,
    /// Drop only the individual comments with empty text
    EmptyText,
}

impl SkipPolicy {
    /// Filters one video's batch according to the policy
    pub fn apply(&self, mut comments: Vec<CommentRecord>) -> Vec<CommentRecord> {
        match self {
            Self::Never => comments,
            Self::FirstEmpty => match comments.first() {
                Some(first) if first.text().is_empty() => Vec::new(),
                _ => comments,
            },
            Self::EmptyText => {
                comments.retain(|c| !c.text().is_empty());
                comments
            }
        }
    }
}

impl fmt::Display for SkipPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => write!(f, "never"),
            Self::FirstEmpty => write!(f, "first-empty"),
            Self::EmptyText => write!(f, "empty-text"),
        }
    }
}
