// src/services/posts.rs

//! Top-posts fetcher service.
//!
//! Issues a single listing request and normalizes the children into
//! [`Post`] records. Does not paginate and does not retry.

use chrono::Utc;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Listing, Post, SourceConfig};
use crate::utils::{http, listing_url};

/// Service for fetching and normalizing a community's top posts.
pub struct PostFetcher {
    client: Client,
    base_url: String,
    permalink_origin: String,
}

impl PostFetcher {
    /// Create a fetcher for the configured source using a prepared client.
    pub fn new(client: Client, source: &SourceConfig) -> Self {
        Self {
            client,
            base_url: source.base_url.clone(),
            permalink_origin: source.permalink_origin.clone(),
        }
    }

    /// Fetch one page of top posts for `subreddit`, at most `limit` long.
    pub async fn fetch_top_posts(&self, subreddit: &str, limit: u32) -> Result<Vec<Post>> {
        if limit == 0 {
            return Err(AppError::validation("limit must be a positive integer"));
        }

        let url = listing_url(&self.base_url, subreddit, limit)?;
        log::info!("Fetching top {} posts from r/{}", limit, subreddit);
        log::debug!("GET {}", url);

        let body = http::fetch_bytes(&self.client, url.as_str()).await?;
        let posts = self.normalize(Listing::from_slice(&body)?)?;

        log::info!("Fetched {} posts", posts.len());
        Ok(posts)
    }

    /// Normalize every child of a listing, stamping one batch time.
    pub fn normalize(&self, listing: Listing) -> Result<Vec<Post>> {
        let scraped_at = Utc::now();
        listing
            .into_posts()
            .into_iter()
            .map(|raw| Post::from_raw(raw, &self.permalink_origin, scraped_at))
            .collect()
    }
}
