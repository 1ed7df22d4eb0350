//! Markdown summary generation
//!
//! This module generates a human-readable markdown report of the comment
//! database and the most recent harvest run.

use crate::output::stats::HarvestStatistics;
use crate::output::traits::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary of `stats` to `output_path`
pub fn generate_markdown_summary(
    stats: &HarvestStatistics,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(stats);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats harvest statistics as markdown
pub fn format_markdown_summary(stats: &HarvestStatistics) -> String {
    let mut md = String::new();

    md.push_str("# Comment Harvest Summary\n\n");

    if let Some(run) = &stats.latest_run {
        md.push_str("## Latest Run\n\n");
        md.push_str(&format!("- **Run ID**: {}\n", run.id));
        md.push_str(&format!("- **Channel**: {}\n", run.channel_id));
        md.push_str(&format!("- **Started**: {}\n", run.started_at));
        if let Some(finished) = &run.finished_at {
            md.push_str(&format!("- **Finished**: {}\n", finished));
        }
        md.push_str(&format!("- **Status**: {}\n", run.status.to_db_string()));
        md.push_str(&format!("- **Config Hash**: {}\n", run.config_hash));
        md.push_str(&format!("- **Videos Listed**: {}\n", run.totals.videos_listed));
        md.push_str(&format!(
            "- **Comments Stored**: {}\n",
            run.totals.comments_stored
        ));
        md.push_str(&format!("- **Failed Videos**: {}\n\n", run.totals.failures));
    }

    md.push_str("## Database Totals\n\n");
    md.push_str(&format!("- **Comments**: {}\n", stats.total_comments));
    md.push_str(&format!(
        "- **Videos With Comments**: {}\n",
        stats.videos_with_comments
    ));
    md.push_str(&format!(
        "- **Comments Per Video**: {:.1}\n",
        stats.comments_per_video()
    ));
    md.push_str(&format!("- **Runs**: {}\n\n", stats.total_runs));

    if !stats.top_authors.is_empty() {
        md.push_str("## Top Authors\n\n");
        md.push_str("| Author | Comments |\n");
        md.push_str("|--------|----------|\n");
        for (author, count) in &stats.top_authors {
            md.push_str(&format!("| {} | {} |\n", escape_cell(author), count));
        }
        md.push('\n');
    }

    if !stats.top_videos.is_empty() {
        md.push_str("## Most Commented Videos\n\n");
        md.push_str("| Video | Comments |\n");
        md.push_str("|-------|----------|\n");
        for (video_id, count) in &stats.top_videos {
            md.push_str(&format!(
                "| [{}]({}) | {} |\n",
                video_id,
                video_id.watch_url(),
                count
            ));
        }
        md.push('\n');
    }

    md
}

/// Keeps author names from breaking the table layout
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
