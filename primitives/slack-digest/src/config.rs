//! Command-line and environment configuration.

use std::{fmt, time::Duration};

use chrono::{NaiveDate, NaiveTime};
use clap::Parser;
use secrecy::Secret;
use tracing::warn;

use crate::error::ConfigError;

/// Default `conversations.list` page size.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Slack Web API root.
pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

const DATE_FORMAT: &str = "%Y%m%d";

/// Posts a digest of channels created on or after a date.
#[derive(Parser, Clone)]
#[command(name = "slack-digest")]
#[command(about = "Posts a digest of newly created Slack channels")]
pub struct Args {
    /// Target date as YYYYMMDD (defaults to yesterday, UTC).
    pub date: Option<String>,

    /// Workspace host used for channel links, e.g. `acme.slack.com`.
    #[arg(short, long, env = "SLACK_DIGEST_WORKSPACE")]
    pub workspace: String,

    /// Channel ID the digest is posted to.
    #[arg(short = 'c', long, env = "SLACK_DIGEST_POST_CHANNEL")]
    pub post_channel: String,

    /// Slack API token.
    #[arg(short, long, env = "SLACK_DIGEST_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Channels requested per listing page.
    #[arg(long, env = "SLACK_DIGEST_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Slack Web API base URL.
    #[arg(long, env = "SLACK_DIGEST_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Request timeout in seconds (transport default when unset).
    #[arg(long, env = "SLACK_DIGEST_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Log errors and keep going instead of failing the run.
    #[arg(long, env = "SLACK_DIGEST_LENIENT")]
    pub lenient: bool,

    /// Print the digest to stdout instead of posting it.
    #[arg(long, env = "SLACK_DIGEST_DRY_RUN")]
    pub dry_run: bool,
}

/// Resolved run configuration. Built once at startup, read-only afterwards.
#[derive(Clone)]
pub struct DigestConfig {
    pub target_date: NaiveDate,
    /// Workspace host without scheme.
    pub workspace: String,
    pub post_channel: String,
    pub token: Secret<String>,
    pub page_size: u32,
    pub api_base: String,
    pub timeout: Option<Duration>,
    pub lenient: bool,
    pub dry_run: bool,
}

impl fmt::Debug for DigestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestConfig")
            .field("target_date", &self.target_date)
            .field("workspace", &self.workspace)
            .field("post_channel", &self.post_channel)
            .field("token", &"[REDACTED]")
            .field("page_size", &self.page_size)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("lenient", &self.lenient)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DigestConfig {
    /// Resolves `args` against `today` (used for the default target date).
    pub fn from_args(args: Args, today: NaiveDate) -> Result<Self, ConfigError> {
        let target_date = match args.date.as_deref().map(str::trim) {
            None | Some("") => default_target_date(today),
            Some(value) => match parse_target_date(value) {
                Ok(date) => date,
                Err(e) if args.lenient => {
                    let fallback = default_target_date(today);
                    warn!(error = %e, %fallback, "ignoring malformed target date");
                    fallback
                }
                Err(e) => return Err(e),
            }
        };

        let workspace = args
            .workspace
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string();
        if workspace.is_empty() {
            return Err(ConfigError::Missing("workspace"));
        }

        let post_channel = args.post_channel.trim().to_string();
        if post_channel.is_empty() {
            return Err(ConfigError::Missing("post channel"));
        }

        if args.token.trim().is_empty() {
            return Err(ConfigError::Missing("token"));
        }

        if args.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page size",
                message: "must be greater than zero".to_string(),
            });
        }

        if args.timeout == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "timeout",
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            target_date,
            workspace,
            post_channel,
            token: Secret::new(args.token.trim().to_string()),
            page_size: args.page_size,
            api_base: args.api_base,
            timeout: args.timeout.map(Duration::from_secs),
            lenient: args.lenient,
            dry_run: args.dry_run,
        })
    }

    /// Base of channel links, e.g. `https://acme.slack.com/archives`.
    pub fn archive_base(&self) -> String {
        format!("https://{}/archives", self.workspace)
    }

    /// Start of the target date in epoch seconds (UTC).
    pub fn cutoff(&self) -> i64 {
        cutoff_for(self.target_date)
    }
}

/// Parses a `YYYYMMDD` date.
pub fn parse_target_date(value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| ConfigError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

/// The day before `today`.
pub fn default_target_date(today: NaiveDate) -> NaiveDate {
    today.pred_opt().unwrap_or(today)
}

/// Midnight UTC at the start of `date`, in epoch seconds.
pub fn cutoff_for(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}
