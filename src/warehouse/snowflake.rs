//! Snowflake warehouse implementation.
//!
//! Opens a password-authenticated session per batch, wraps the per-post
//! `MERGE` statements in an explicit transaction and commits once.

use std::fmt;

use async_trait::async_trait;
use snowflake_api::SnowflakeApi;

use crate::config::WarehouseCredentials;
use crate::error::{AppError, Result};
use crate::models::Post;
use crate::warehouse::sql::merge_statement;
use crate::warehouse::{Warehouse, WarehouseSession};

const BACKEND: &str = "snowflake";

/// Snowflake-backed warehouse writing into a single target table.
pub struct SnowflakeWarehouse {
    credentials: WarehouseCredentials,
    table: String,
}

impl SnowflakeWarehouse {
    /// Create a Snowflake warehouse for `table`.
    ///
    /// `table` is interpolated into SQL and must come from a validated
    /// [`crate::models::Config`].
    pub fn new(credentials: WarehouseCredentials, table: impl Into<String>) -> Self {
        Self {
            credentials,
            table: table.into(),
        }
    }
}

#[async_trait]
impl Warehouse for SnowflakeWarehouse {
    fn describe(&self) -> String {
        format!("snowflake://{}/{}", self.credentials.account, self.table)
    }

    async fn connect(&self) -> Result<Box<dyn WarehouseSession>> {
        let creds = &self.credentials;
        let mut api = SnowflakeApi::with_password_auth(
            &creds.account,
            creds.warehouse.as_deref(),
            creds.database.as_deref(),
            creds.schema.as_deref(),
            &creds.user,
            creds.role.as_deref(),
            &creds.password,
        )
        .map_err(|e| AppError::connection(BACKEND, e))?;

        log::debug!(
            "Opening Snowflake session for {}@{}",
            creds.user,
            creds.account
        );

        // Authentication happens on the first statement.
        if let Err(e) = api.exec("BEGIN").await {
            let closed = api.close_session().await;
            return settle(Err(AppError::connection(BACKEND, e)), closed);
        }

        Ok(Box::new(SnowflakeSession {
            api,
            table: self.table.clone(),
        }))
    }
}

struct SnowflakeSession {
    api: SnowflakeApi,
    table: String,
}

#[async_trait]
impl WarehouseSession for SnowflakeSession {
    async fn upsert_post(&mut self, post: &Post) -> Result<()> {
        let sql = merge_statement(&self.table, post);
        self.api
            .exec(&sql)
            .await
            .map_err(|e| AppError::statement(&post.post_id, e))?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.finish("COMMIT", "<commit>").await
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.finish("ROLLBACK", "<rollback>").await
    }
}

impl SnowflakeSession {
    /// Run the closing statement, then close the server session regardless.
    async fn finish(self: Box<Self>, statement: &str, label: &str) -> Result<()> {
        let SnowflakeSession { mut api, .. } = *self;
        let outcome = api
            .exec(statement)
            .await
            .map(|_| ())
            .map_err(|e| AppError::statement(label, e));
        let closed = api.close_session().await;
        settle(outcome, closed)
    }
}

/// Combine a statement outcome with the session close result.
///
/// The statement error wins; a close failure on top of it is only logged.
fn settle<E: fmt::Display>(
    outcome: Result<()>,
    closed: std::result::Result<(), E>,
) -> Result<()> {
    match (outcome, closed) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(e)) => Err(AppError::connection(BACKEND, format!("close failed: {e}"))),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(e)) => {
            log::warn!("Failed to close Snowflake session after error: {}", e);
            Err(err)
        }
    }
}
