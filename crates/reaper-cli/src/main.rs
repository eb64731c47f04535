//! `channel-reaper` binary: archives Mattermost public channels that have
//! seen no genuine user activity for one year.

mod cli_args;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli_args::Cli;
use reaper_client::MattermostClient;
use reaper_pipeline::{
    archive_cutoff_ms, current_unix_timestamp_ms, render_outcome_line, run_archive_pipeline,
    ArchivePipelineConfig, ArchiveRunReport,
};

const EXIT_PIPELINE_FAILURE: i32 = 1;
const EXIT_PARTIAL_FAILURE: i32 = 2;

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn print_report(report: &ArchiveRunReport) {
    if report.dry_run {
        println!("Dry Run mode");
    }
    for outcome in &report.outcomes {
        println!("{}", render_outcome_line(outcome));
    }
}

fn exit_code_for(report: &ArchiveRunReport) -> i32 {
    if report.all_succeeded() {
        0
    } else {
        EXIT_PARTIAL_FAILURE
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let client = MattermostClient::new(
        &cli.server,
        cli.request_timeout_ms,
        cli.retry_max_attempts,
        cli.retry_base_delay_ms,
    )
    .context("failed to create Mattermost client")?;

    let session = client
        .login(&cli.username, &cli.password)
        .await
        .context("login failed")?;

    let config = ArchivePipelineConfig {
        team_name: cli.team_name.clone(),
        dry_run: cli.dry_run,
        page_size: cli.page_size,
        cutoff_ms: archive_cutoff_ms(current_unix_timestamp_ms()),
    };

    // The session is released before the run result is inspected, so every
    // exit path below has already logged out exactly once.
    let pipeline_result = run_archive_pipeline(&session, &config).await;
    if let Err(error) = session.logout().await {
        tracing::warn!(%error, "logout failed");
    }

    let report = match pipeline_result {
        Ok(report) => report,
        Err(error) => {
            tracing::error!(%error, "archive pipeline failed");
            std::process::exit(EXIT_PIPELINE_FAILURE);
        }
    };

    print_report(&report);
    let exit_code = exit_code_for(&report);
    if exit_code != 0 {
        tracing::warn!(failed = report.failed_count(), "some channels were not archived");
        std::process::exit(exit_code);
    }
    Ok(())
}
