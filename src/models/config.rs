//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Largest page size the listing endpoint honours.
pub const MAX_LIMIT: u32 = 100;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Which community to read and how
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Warehouse target settings (credentials come from the environment)
    #[serde(default)]
    pub warehouse: WarehouseConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.source.subreddit.trim().is_empty() {
            return Err(AppError::validation("source.subreddit is empty"));
        }
        if self.source.limit == 0 || self.source.limit > MAX_LIMIT {
            return Err(AppError::validation(format!(
                "source.limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Url::parse(&self.source.base_url).map_err(|e| {
            AppError::validation(format!("source.base_url is not a valid URL: {e}"))
        })?;
        if self.source.permalink_origin.ends_with('/') {
            return Err(AppError::validation(
                "source.permalink_origin must not end with '/'",
            ));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if !is_table_identifier(&self.warehouse.table) {
            return Err(AppError::validation(format!(
                "warehouse.table '{}' is not a valid table identifier",
                self.warehouse.table
            )));
        }
        Ok(())
    }
}

/// `name`, `schema.name` or `database.schema.name`, unquoted.
fn is_table_identifier(table: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*){0,2}$")
                .expect("table identifier pattern is valid")
        })
        .is_match(table)
}

/// Listing source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Community name, without the `r/` prefix
    #[serde(default = "defaults::subreddit")]
    pub subreddit: String,

    /// Page size requested from the listing
    #[serde(default = "defaults::limit")]
    pub limit: u32,

    /// Origin the listing URL is built on
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Origin prepended to relative permalinks
    #[serde(default = "defaults::permalink_origin")]
    pub permalink_origin: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            subreddit: defaults::subreddit(),
            limit: defaults::limit(),
            base_url: defaults::base_url(),
            permalink_origin: defaults::permalink_origin(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header; the listing rejects default client identifiers
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Which warehouse implementation receives the posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseBackend {
    /// SQLite file, for development and tests
    Local,
    /// Snowflake (requires the `snowflake` feature)
    Snowflake,
}

/// Warehouse target settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    #[serde(default = "defaults::backend")]
    pub backend: WarehouseBackend,

    /// Fully qualified target table for the Snowflake backend
    #[serde(default = "defaults::table")]
    pub table: String,

    /// Database file for the local backend
    #[serde(default = "defaults::local_path")]
    pub local_path: PathBuf,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            backend: defaults::backend(),
            table: defaults::table(),
            local_path: defaults::local_path(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::WarehouseBackend;

    // Source defaults
    pub fn subreddit() -> String {
        "ArtificialInteligence".into()
    }
    pub fn limit() -> u32 {
        5
    }
    pub fn base_url() -> String {
        "https://www.reddit.com".into()
    }
    pub fn permalink_origin() -> String {
        "https://reddit.com".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".into()
    }
    pub fn timeout() -> u64 {
        10
    }

    // Warehouse defaults
    pub fn backend() -> WarehouseBackend {
        WarehouseBackend::Snowflake
    }
    pub fn table() -> String {
        "RAW.REDDIT_POSTS".into()
    }
    pub fn local_path() -> PathBuf {
        PathBuf::from("storage/warehouse.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn defaults_match_listing_contract() {
        let config = Config::default();
        assert_eq!(config.source.subreddit, "ArtificialInteligence");
        assert_eq!(config.source.limit, 5);
        assert_eq!(config.http.timeout_secs, 10);
        assert!(config.http.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.warehouse.backend, WarehouseBackend::Snowflake);
    }

    #[test]
    fn validate_rejects_limit_out_of_range() {
        let mut config = Config::default();
        config.source.limit = 0;
        assert!(config.validate().is_err());

        config.source.limit = MAX_LIMIT + 1;
        assert!(config.validate().is_err());

        config.source.limit = MAX_LIMIT;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_trailing_slash_origin() {
        let mut config = Config::default();
        config.source.permalink_origin = "https://reddit.com/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_injected_table_name() {
        let mut config = Config::default();
        config.warehouse.table = "RAW.REDDIT_POSTS; DROP TABLE X".to_string();
        assert!(config.validate().is_err());

        config.warehouse.table = "ANALYTICS.RAW.REDDIT_POSTS".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [source]
            subreddit = "MachineLearning"

            [warehouse]
            backend = "local"
            local_path = "/tmp/posts.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.source.subreddit, "MachineLearning");
        assert_eq!(config.source.limit, 5);
        assert_eq!(config.warehouse.backend, WarehouseBackend::Local);
        assert_eq!(config.warehouse.local_path, PathBuf::from("/tmp/posts.db"));
        assert_eq!(config.warehouse.table, "RAW.REDDIT_POSTS");
    }
}
