use clap::Parser;

use reaper_pipeline::DEFAULT_PAGE_SIZE;

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "channel-reaper",
    about = "Archives Mattermost public channels with no user activity for one year",
    version
)]
/// Command-line surface of the archiver.
pub struct Cli {
    #[arg(
        short = 'u',
        long,
        env = "REAPER_USERNAME",
        help = "User name used to log in to Mattermost"
    )]
    pub username: String,

    #[arg(
        short = 'p',
        long,
        env = "REAPER_PASSWORD",
        hide_env_values = true,
        help = "Password used to log in to Mattermost"
    )]
    pub password: String,

    #[arg(
        short = 's',
        long,
        env = "REAPER_SERVER",
        help = "Mattermost URL (https://your-mattermost-host)"
    )]
    pub server: String,

    #[arg(short = 't', long = "team", help = "Target team name")]
    pub team_name: String,

    #[arg(
        short = 'd',
        long,
        help = "Display archive target channels and exit (don't run archive)"
    )]
    pub dry_run: bool,

    #[arg(
        long,
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = parse_positive_usize,
        help = "Page size for channel and post pagination"
    )]
    pub page_size: usize,

    #[arg(
        long,
        default_value_t = 30_000,
        value_parser = parse_positive_u64,
        help = "Per-request HTTP timeout in milliseconds"
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long,
        default_value_t = 3,
        value_parser = parse_positive_usize,
        help = "Maximum attempts per HTTP request"
    )]
    pub retry_max_attempts: usize,

    #[arg(
        long,
        default_value_t = 200,
        value_parser = parse_positive_u64,
        help = "Base delay between HTTP retries in milliseconds"
    )]
    pub retry_base_delay_ms: u64,
}
