//! Local SQLite warehouse.
//!
//! Stands in for the production warehouse during development and testing.
//! The database file and the `reddit_posts` table are created on first use.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};

use crate::error::{AppError, Result};
use crate::models::Post;
use crate::warehouse::sql::{LOCAL_SCHEMA, LOCAL_UPSERT};
use crate::warehouse::{Warehouse, WarehouseSession};

const BACKEND: &str = "sqlite";

/// SQLite-file warehouse backend.
#[derive(Debug, Clone)]
pub struct LocalWarehouse {
    path: PathBuf,
}

impl LocalWarehouse {
    /// Create a LocalWarehouse backed by the given database file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a single-connection pool, creating file and table if needed.
    async fn open_pool(&self) -> Result<SqlitePool> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| AppError::connection(BACKEND, e))?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);

        log::debug!("Connecting to SQLite warehouse at {}", self.path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| AppError::connection(BACKEND, e))?;

        sqlx::query(LOCAL_SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| AppError::connection(BACKEND, e))?;

        Ok(pool)
    }
}

#[async_trait]
impl Warehouse for LocalWarehouse {
    fn describe(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }

    async fn connect(&self) -> Result<Box<dyn WarehouseSession>> {
        let pool = self.open_pool().await?;
        let tx = match pool.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                pool.close().await;
                return Err(AppError::connection(BACKEND, e));
            }
        };
        Ok(Box::new(LocalSession { pool, tx }))
    }
}

/// An open transaction on the local database.
struct LocalSession {
    pool: SqlitePool,
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl WarehouseSession for LocalSession {
    async fn upsert_post(&mut self, post: &Post) -> Result<()> {
        sqlx::query(LOCAL_UPSERT)
            .bind(&post.post_id)
            .bind(&post.title)
            .bind(&post.author)
            .bind(post.score)
            .bind(post.num_comments)
            .bind(&post.url)
            .bind(&post.permalink)
            .bind(post.created_utc)
            .bind(post.scraped_at)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::statement(&post.post_id, e))?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let LocalSession { pool, tx } = *self;
        let result = tx.commit().await;
        pool.close().await;
        result.map_err(|e| AppError::statement("<commit>", e))
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let LocalSession { pool, tx } = *self;
        let result = tx.rollback().await;
        pool.close().await;
        result.map_err(|e| AppError::statement("<rollback>", e))
    }
}
