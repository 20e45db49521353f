// src/pipeline/fetch.rs

//! Fetch step.

use crate::error::Result;
use crate::models::{Config, Post};
use crate::services::PostFetcher;

/// Fetch the configured community's top posts.
pub async fn run_fetch(config: &Config, fetcher: &PostFetcher) -> Result<Vec<Post>> {
    let posts = fetcher
        .fetch_top_posts(&config.source.subreddit, config.source.limit)
        .await?;
    log::info!("Found {} posts", posts.len());
    Ok(posts)
}
