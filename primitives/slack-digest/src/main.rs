//! Slack Digest - New Channel Report
//!
//! Posts a digest of the Slack channels created on or after a target date.
//! Runs once and exits.
//!
//! # Usage
//!
//! ```bash
//! # Channels created since yesterday (UTC)
//! slack-digest --workspace acme.slack.com --post-channel C0123456 --token xoxb-...
//!
//! # Channels created since a given date, printed instead of posted
//! slack-digest 20240115 --dry-run
//!
//! # Legacy behaviour: log errors and keep going
//! slack-digest --lenient
//! ```
//!
//! Every flag can also come from the environment (`SLACK_DIGEST_*`).
//! Exits non-zero when the run fails, unless `--lenient` is set.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use slack_digest::{Args, DigestConfig, run};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = DigestConfig::from_args(args, Utc::now().date_naive())
        .context("invalid configuration")?;

    match run(&config).await {
        Ok(summary) => {
            info!(
                fetched = summary.fetched,
                included = summary.included,
                posted = summary.posted,
                "digest run finished"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "digest run failed");
            std::process::exit(1);
        }
    }
}
