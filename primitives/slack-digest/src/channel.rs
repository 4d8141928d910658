//! Channel records and listing pages as returned by `conversations.list`.

use serde::Deserialize;

/// A channel in the workspace directory. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: String,
    /// Creation time, seconds since the Unix epoch.
    pub created: i64,
    pub topic: String,
    pub description: String,
    pub member_count: u64,
}

/// One page of the channel listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    channels: Vec<Channel>,
    next_cursor: String,
}

impl Page {
    #[cfg(test)]
    pub(crate) fn new(channels: Vec<Channel>, next_cursor: impl Into<String>) -> Self {
        Self {
            channels,
            next_cursor: next_cursor.into(),
        }
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Cursor for the following page, or `None` when this is the final page.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.next_cursor.is_empty() {
            None
        } else {
            Some(&self.next_cursor)
        }
    }

    /// True when the provider returned an empty continuation token.
    pub fn is_last(&self) -> bool {
        self.next_cursor().is_none()
    }

    pub fn into_channels(self) -> Vec<Channel> {
        self.channels
    }
}

/// Body of a `conversations.list` response. Absent fields decode as empty.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListResponse {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub channels: Vec<RawChannel>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawChannel {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    created: i64,
    #[serde(default)]
    topic: TextValue,
    #[serde(default)]
    purpose: TextValue,
    #[serde(default)]
    num_members: u64,
}

#[derive(Debug, Default, Deserialize)]
struct TextValue {
    #[serde(default)]
    value: String,
}

impl From<RawChannel> for Channel {
    fn from(raw: RawChannel) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            created: raw.created,
            topic: raw.topic.value,
            description: raw.purpose.value,
            member_count: raw.num_members,
        }
    }
}

impl From<ListResponse> for Page {
    fn from(response: ListResponse) -> Self {
        Self {
            channels: response.channels.into_iter().map(Channel::from).collect(),
            next_cursor: response.response_metadata.next_cursor,
        }
    }
}
