//! Slack Digest - New Channel Report
//!
//! Lists every channel in a Slack workspace, keeps the ones created on or
//! after a target date, and posts a digest of them to a channel. Runs once
//! and exits.
//!
//! The pipeline is strictly sequential:
//!
//! 1. [`fetcher::fetch_all`] walks `conversations.list` to the last page.
//! 2. [`digest::Digest::build`] filters by creation date and renders the report.
//! 3. [`notifier::notify`] posts it with `chat.postMessage`.
//!
//! [`run`] wires the three together and applies the error policy: strict by
//! default, or log-and-continue when [`DigestConfig::lenient`] is set.

pub mod channel;
pub mod config;
pub mod digest;
pub mod error;
pub mod fetcher;
pub mod notifier;
pub mod slack;

use tracing::{error, info, warn};

pub use crate::{
    channel::{Channel, Page},
    config::{Args, DigestConfig},
    digest::Digest,
    error::{ConfigError, DigestError, FetchError, SlackError},
    slack::SlackClient,
};

/// What a run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Channels returned by the listing.
    pub fetched: usize,
    /// Channels that made it into the digest.
    pub included: usize,
    /// Whether the digest was delivered.
    pub posted: bool,
}

/// Runs fetch, build and notify once.
///
/// In lenient mode a failed listing continues with the channels collected so
/// far and a failed post is logged; the run itself then always succeeds.
pub async fn run(config: &DigestConfig) -> Result<RunSummary, DigestError> {
    let client = SlackClient::new(config)?;

    info!(
        target_date = %config.target_date,
        cutoff = config.cutoff(),
        "listing workspace channels"
    );

    let channels = match fetcher::fetch_all(&client, config.page_size).await {
        Ok(channels) => channels,
        Err(e) if config.lenient => {
            warn!(error = %e, kept = e.partial.len(), "channel listing incomplete, continuing");
            e.partial
        }
        Err(e) => return Err(e.into()),
    };

    let digest = Digest::build(&channels, config.target_date, &config.archive_base());
    let mut summary = RunSummary {
        fetched: channels.len(),
        included: digest.entries(),
        posted: false,
    };
    info!(
        fetched = summary.fetched,
        included = summary.included,
        "built channel digest"
    );

    if config.dry_run {
        print!("{}", digest.text());
        return Ok(summary);
    }

    match notifier::notify(&client, &config.post_channel, digest).await {
        Ok(()) => summary.posted = true,
        Err(e) if config.lenient => {
            error!(error = %e, "failed to post digest");
        }
        Err(e) => return Err(DigestError::Notify(e)),
    }

    Ok(summary)
}
