//! Warehouse abstractions for post persistence.
//!
//! Every backend upserts into a table keyed by `(post_id, load_date)`, where
//! `load_date` is the backend's own current date:
//!
//! - same key seen again: `score`, `num_comments`, `scraped_at` are updated
//! - new key: the full row is inserted
//!
//! A session covers one batch. Nothing is visible to other readers until
//! [`WarehouseSession::commit`] succeeds.

pub mod local;
#[cfg(feature = "snowflake")]
pub mod snowflake;
pub mod sql;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Post;

// Re-export for convenience
pub use local::LocalWarehouse;
#[cfg(feature = "snowflake")]
pub use snowflake::SnowflakeWarehouse;

/// A warehouse that can open upsert sessions.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Human-readable target, used in log lines.
    fn describe(&self) -> String;

    /// Open a connection and start a batch.
    async fn connect(&self) -> Result<Box<dyn WarehouseSession>>;
}

/// One open connection with an uncommitted batch.
///
/// Dropping a session without committing discards the batch and releases
/// the connection.
#[async_trait]
pub trait WarehouseSession: Send {
    /// Upsert a single post under today's load date.
    async fn upsert_post(&mut self, post: &Post) -> Result<()>;

    /// Commit the batch and release the connection.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discard the batch and release the connection.
    async fn rollback(self: Box<Self>) -> Result<()>;
}
