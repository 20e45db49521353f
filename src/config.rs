// src/config.rs

//! Configuration loading utilities.
//!
//! Warehouse secrets are read from the environment exactly once, at startup,
//! into [`WarehouseCredentials`]. Nothing else in the crate touches the
//! environment.

use std::fmt;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

pub const ENV_ACCOUNT: &str = "SNOWFLAKE_ACCOUNT";
pub const ENV_USER: &str = "SNOWFLAKE_USER";
pub const ENV_PASSWORD: &str = "SNOWFLAKE_PASSWORD";
pub const ENV_WAREHOUSE: &str = "SNOWFLAKE_WAREHOUSE";
pub const ENV_DATABASE: &str = "SNOWFLAKE_DATABASE";
pub const ENV_SCHEMA: &str = "SNOWFLAKE_SCHEMA";
pub const ENV_ROLE: &str = "SNOWFLAKE_ROLE";

/// Credentials and session context for the warehouse connection.
#[derive(Clone, PartialEq, Eq)]
pub struct WarehouseCredentials {
    pub account: String,
    pub user: String,
    pub password: String,
    /// Compute pool the session runs on
    pub warehouse: Option<String>,
    pub database: Option<String>,
    pub schema: Option<String>,
    pub role: Option<String>,
}

impl WarehouseCredentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary key lookup.
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| AppError::config(format!("{key} must be set")))
        };

        Ok(Self {
            account: required(ENV_ACCOUNT)?,
            user: required(ENV_USER)?,
            password: required(ENV_PASSWORD)?,
            warehouse: optional(ENV_WAREHOUSE),
            database: optional(ENV_DATABASE),
            schema: optional(ENV_SCHEMA),
            role: optional(ENV_ROLE),
        })
    }
}

impl fmt::Debug for WarehouseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WarehouseCredentials")
            .field("account", &self.account)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("warehouse", &self.warehouse)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("role", &self.role)
            .finish()
    }
}

/// Load configuration from a TOML file and validate it.
///
/// A missing file falls back to defaults; a present but broken file is an
/// error.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        Config::load(path)?
    } else {
        log::warn!("No config at {}, using defaults", path.display());
        Config::default()
    };
    config.validate()?;
    Ok(config)
}
