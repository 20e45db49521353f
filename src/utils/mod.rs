//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::{AppError, Result};

/// Build the "top posts" listing URL for a community.
///
/// Produces `{base}/r/{subreddit}/top/.json?limit={limit}`, with the
/// community name encoded as a single path segment.
pub fn listing_url(base_url: &str, subreddit: &str, limit: u32) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| AppError::config(format!("{base_url} cannot be a base URL")))?
        .pop_if_empty()
        .extend(["r", subreddit, "top", ".json"]);
    url.query_pairs_mut()
        .clear()
        .append_pair("limit", &limit.to_string());
    Ok(url)
}
