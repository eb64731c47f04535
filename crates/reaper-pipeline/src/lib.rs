//! Unused-channel detection and archival pipeline.
//!
//! One-shot batch flow: resolve the target team, page through its public
//! channels, classify each one against a one-year inactivity cutoff, then
//! either report the would-be outcomes (dry run) or archive each unused
//! channel and report per-channel results.

mod activity;
mod cutoff;
mod pagination;
mod pipeline;

pub use activity::channel_is_unused;
pub use cutoff::{archive_cutoff_ms, current_unix_timestamp_ms, INACTIVITY_WINDOW_MS};
pub use pagination::fetch_all_public_channels;
pub use pipeline::{
    archive_each_channel, render_outcome_line, run_archive_pipeline, ArchiveOutcome,
    ArchivePipelineConfig, ArchiveRunReport, PipelineError, DEFAULT_PAGE_SIZE,
};
