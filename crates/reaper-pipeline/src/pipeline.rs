//! Orchestrates team resolution, classification, archival and reporting.

use reaper_client::{Channel, ChannelApi, MattermostError, Team};
use thiserror::Error;

use crate::activity::channel_is_unused;
use crate::pagination::fetch_all_public_channels;

/// Default page size for channel and post pagination, matching the
/// service's default pager.
pub const DEFAULT_PAGE_SIZE: usize = 60;

#[derive(Debug, Error)]
/// Failures that abort the run. Individual archive failures are not errors;
/// they surface as `NG` outcomes instead.
pub enum PipelineError {
    #[error("failed to resolve team {team}: {source}")]
    TeamResolution {
        team: String,
        #[source]
        source: MattermostError,
    },
    #[error("failed to fetch channel page {page}: {source}")]
    ChannelFetch {
        page: usize,
        #[source]
        source: MattermostError,
    },
    #[error("failed to fetch posts for channel {channel}: {source}")]
    PostFetch {
        channel: String,
        #[source]
        source: MattermostError,
    },
}

#[derive(Debug, Clone)]
/// One run's worth of settings, fixed before the pipeline starts.
pub struct ArchivePipelineConfig {
    pub team_name: String,
    pub dry_run: bool,
    pub page_size: usize,
    /// Channels created at or after this instant are exempt; posts at or
    /// after it count as activity.
    pub cutoff_ms: i64,
}

#[derive(Debug, Clone)]
/// Pairing of a channel with its (would-be) archive result.
pub struct ArchiveOutcome {
    pub channel: Channel,
    pub archived: bool,
}

#[derive(Debug)]
/// Final result of one pipeline run, consumed by the reporting step.
pub struct ArchiveRunReport {
    pub team: Team,
    pub dry_run: bool,
    pub outcomes: Vec<ArchiveOutcome>,
}

impl ArchiveRunReport {
    /// True when every (would-be) archive succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.archived)
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.archived)
            .count()
    }
}

/// Renders one report line in the service's channel notation.
pub fn render_outcome_line(outcome: &ArchiveOutcome) -> String {
    format!(
        "Channel: ~{}({}), Result: {}",
        outcome.channel.name,
        outcome.channel.display_name,
        if outcome.archived { "OK" } else { "NG" }
    )
}

/// Runs the full pipeline: resolve team, fetch channels, classify, then
/// archive (or, on dry run, mark every candidate as a would-be success
/// without issuing a single archive call).
pub async fn run_archive_pipeline(
    api: &dyn ChannelApi,
    config: &ArchivePipelineConfig,
) -> Result<ArchiveRunReport, PipelineError> {
    let team = api
        .team_by_name(&config.team_name)
        .await
        .map_err(|source| PipelineError::TeamResolution {
            team: config.team_name.clone(),
            source,
        })?;
    tracing::info!(team = %team.name, "resolved target team");

    let channels = fetch_all_public_channels(api, &team, config.page_size).await?;
    tracing::info!(channels = channels.len(), "fetched public channels");

    let mut unused = Vec::new();
    for channel in channels {
        tracing::debug!(
            channel = %channel.name,
            create_at = channel.create_at,
            "inspecting channel"
        );
        if channel_is_unused(api, &channel, config.cutoff_ms, config.page_size).await? {
            unused.push(channel);
        }
    }
    tracing::info!(unused = unused.len(), dry_run = config.dry_run, "classified channels");

    let outcomes = if config.dry_run {
        unused
            .into_iter()
            .map(|channel| ArchiveOutcome {
                channel,
                archived: true,
            })
            .collect()
    } else {
        archive_each_channel(api, unused).await
    };

    Ok(ArchiveRunReport {
        team,
        dry_run: config.dry_run,
        outcomes,
    })
}

/// Archives every channel in `channels`, one call per channel, in input
/// order. A failed call records an `NG` outcome and never stops the batch.
pub async fn archive_each_channel(
    api: &dyn ChannelApi,
    channels: Vec<Channel>,
) -> Vec<ArchiveOutcome> {
    let mut outcomes = Vec::with_capacity(channels.len());
    for channel in channels {
        let archived = match api.archive_channel(&channel.id).await {
            Ok(archived) => archived,
            Err(error) => {
                tracing::warn!(channel = %channel.name, %error, "archive request failed");
                false
            }
        };
        outcomes.push(ArchiveOutcome { channel, archived });
    }
    outcomes
}
