//! Output module for harvested comments and reports
//!
//! This module handles:
//! - The `CommentSink` seam and its SQLite and CSV implementations
//! - Statistics over the comment database
//! - Markdown summaries of the latest harvest

mod csv_export;
mod markdown;
mod sqlite_output;
pub mod stats;
mod traits;

pub use csv_export::{write_csv, CsvSink, CSV_HEADERS};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use sqlite_output::SqliteSink;
pub use stats::{load_statistics, print_statistics, HarvestStatistics};
pub use traits::{CommentSink, OutputError, OutputResult};
