//! Listing payloads and the canonical post record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Top-level listing response: `{ data: { children: [ { data: {...} } ] } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData {
    pub children: Vec<ListingChild>,
}

/// One entry of the listing, wrapping the post data object.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingChild {
    pub data: RawPost,
}

impl Listing {
    /// Parse a listing from a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Consume the listing, yielding the raw posts in source order.
    pub fn into_posts(self) -> Vec<RawPost> {
        self.data.children.into_iter().map(|c| c.data).collect()
    }
}

/// A post exactly as the listing reports it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawPost {
    pub id: String,
    pub title: String,
    pub author: String,
    pub score: i64,
    pub num_comments: i64,
    pub url: String,

    /// Site-relative path, e.g. `/r/Foo/comments/abc123/t/`
    pub permalink: String,

    /// Unix epoch seconds, reported as a float
    pub created_utc: f64,
}

/// Canonical post record written to the warehouse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Natural key, stable across re-fetches
    pub post_id: String,
    pub title: String,
    pub author: String,
    pub score: i64,
    pub num_comments: i64,

    /// External link target
    pub url: String,

    /// Absolute URL of the discussion page
    pub permalink: String,
    pub created_utc: DateTime<Utc>,

    /// Time this batch was normalized
    pub scraped_at: DateTime<Utc>,
}

impl Post {
    /// Normalize a raw post.
    ///
    /// `permalink_origin` is prepended verbatim to the relative permalink.
    pub fn from_raw(
        raw: RawPost,
        permalink_origin: &str,
        scraped_at: DateTime<Utc>,
    ) -> Result<Self> {
        let created_utc = epoch_to_utc(raw.created_utc).ok_or_else(|| {
            AppError::parse(format!(
                "post {} has invalid created_utc {}",
                raw.id, raw.created_utc
            ))
        })?;

        Ok(Self {
            permalink: format!("{}{}", permalink_origin, raw.permalink),
            post_id: raw.id,
            title: raw.title,
            author: raw.author,
            score: raw.score,
            num_comments: raw.num_comments,
            url: raw.url,
            created_utc,
            scraped_at,
        })
    }
}

/// Convert fractional epoch seconds into a UTC timestamp.
pub fn epoch_to_utc(epoch: f64) -> Option<DateTime<Utc>> {
    if !epoch.is_finite() {
        return None;
    }
    let secs = epoch.floor();
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return None;
    }
    let nanos = ((epoch - secs) * 1_000_000_000.0).round() as u32;
    // Rounding can carry a full second.
    let (secs, nanos) = if nanos >= 1_000_000_000 {
        (secs as i64 + 1, 0)
    } else {
        (secs as i64, nanos)
    };
    DateTime::from_timestamp(secs, nanos)
}
