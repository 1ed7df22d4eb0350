//! Data model shared by the fetch, harvest, and storage layers
//!
//! # Components
//!
//! - `VideoId`: opaque identifier of a video, as returned by the search endpoint
//! - `CommentRecord`: one normalized top-level comment thread

mod comment;
mod video;

pub use comment::{CommentRecord, PUBLISHED_AT_DB_FORMAT};
pub use video::VideoId;
