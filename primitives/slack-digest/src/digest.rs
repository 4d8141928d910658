//! Digest builder: filters channels by creation date and renders the report.
//!
//! The report is a fixed template. Every line ends in a newline and lines are
//! joined with a further newline, so the posted message has a blank line
//! between consecutive lines.

use chrono::{DateTime, NaiveDate};

use crate::{channel::Channel, config::cutoff_for};

const SEPARATOR: &str = "====================================\n";
const DISPLAY_DATE: &str = "%Y/%m/%d";

/// The rendered report for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    text: String,
    entries: usize,
}

impl Digest {
    /// Renders every channel created on or after the start of `target_date`.
    ///
    /// `archive_base` prefixes channel links, e.g. `https://acme.slack.com/archives`.
    pub fn build(channels: &[Channel], target_date: NaiveDate, archive_base: &str) -> Self {
        let cutoff = cutoff_for(target_date);
        let date = target_date.format(DISPLAY_DATE);

        let included: Vec<&Channel> = qualifying(channels, cutoff).collect();
        if included.is_empty() {
            return Self {
                text: format!("{date}以降に作成されたチャンネルはありません\n"),
                entries: 0,
            };
        }

        let mut lines = vec![format!("{date}以降に作成されたチャンネル一覧\n")];
        for channel in &included {
            lines.push(SEPARATOR.to_string());
            lines.push(format!(
                "チャンネル名:<{}/{}|#{}>\n",
                archive_base.trim_end_matches('/'),
                channel.id,
                channel.name
            ));
            lines.push(format!("参加人数:{}\n", channel.member_count));
            lines.push(format!("作成日:{}\n", display_date(channel.created)));
            if !channel.topic.is_empty() {
                lines.push(format!("トピック:{}\n", channel.topic));
            }
            if !channel.description.is_empty() {
                lines.push(format!("説明:{}\n", channel.description));
            }
        }
        lines.push(SEPARATOR.to_string());

        Self {
            text: lines.join("\n"),
            entries: included.len(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of channels listed.
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Channels with `created >= cutoff`, in their original order.
pub fn qualifying(channels: &[Channel], cutoff: i64) -> impl Iterator<Item = &Channel> {
    channels.iter().filter(move |channel| channel.created >= cutoff)
}

fn display_date(created: i64) -> String {
    DateTime::from_timestamp(created, 0)
        .map(|dt| dt.format(DISPLAY_DATE).to_string())
        .unwrap_or_else(|| created.to_string())
}
