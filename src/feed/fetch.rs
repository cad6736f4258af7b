// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bytes::Bytes;

use crate::error::{FeedError, FetchError};
use crate::http::HttpClient;

use super::parse::{FeedItem, parse_feed};

/// Fetch raw feed bytes from a URL (without parsing).
///
/// A single GET, no retries; transport failures and non-success statuses
/// are both feed-scoped errors.
pub async fn fetch_feed_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes, FetchError> {
    client.get_bytes(url).await
}

/// Fetch and parse a feed into its downloadable items
pub async fn fetch_feed<C: HttpClient>(client: &C, url: &str) -> Result<Vec<FeedItem>, FeedError> {
    let bytes = fetch_feed_bytes(client, url).await?;
    Ok(parse_feed(&bytes)?)
}
