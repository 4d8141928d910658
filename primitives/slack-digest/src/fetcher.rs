//! Directory fetcher: walks `conversations.list` until the cursor runs out.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{channel::Channel, error::FetchError, slack::SlackClient};

/// Fetches every channel visible to the client's token.
///
/// Pages are requested one after another, following the continuation
/// cursor until a page comes back without one. There is no iteration cap.
/// A channel ID already seen on an earlier page is skipped.
///
/// On failure the returned [`FetchError`] carries the channels collected
/// from the pages that did succeed.
pub async fn fetch_all(client: &SlackClient, page_size: u32) -> Result<Vec<Channel>, FetchError> {
    let mut channels = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor: Option<String> = None;
    let mut page_number = 0;

    loop {
        page_number += 1;

        let page = match client.list_channels(page_size, cursor.as_deref()).await {
            Ok(page) => page,
            Err(source) => {
                return Err(FetchError {
                    page: page_number,
                    source,
                    partial: channels,
                });
            }
        };

        debug!(
            page = page_number,
            count = page.channels().len(),
            last = page.is_last(),
            "fetched channel page"
        );

        let next_cursor = page.next_cursor().map(str::to_owned);
        for channel in page.into_channels() {
            if seen.insert(channel.id.clone()) {
                channels.push(channel);
            } else {
                warn!(id = %channel.id, page = page_number, "skipping duplicate channel");
            }
        }

        match next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(channels)
}
