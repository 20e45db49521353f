//! Subreddit pipeline CLI
//!
//! Invoked once per scheduled trigger. Exits non-zero on any failure and
//! leaves retrying to the scheduler.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use reddit_pipeline::{
    config,
    error::Result,
    models::{Config, WarehouseBackend},
    pipeline,
    services::PostFetcher,
    utils::http,
    warehouse::{LocalWarehouse, Warehouse},
};

/// Load top subreddit posts into the warehouse
#[derive(Parser, Debug)]
#[command(name = "reddit-pipeline", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch top posts and upsert them into the warehouse
    Run {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Fetch top posts and print them as JSON without loading
    Fetch {
        #[command(flatten)]
        source: SourceArgs,

        /// Write posts to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration and warehouse credentials
    Validate,
}

/// Overrides for the configured source.
#[derive(Args, Debug)]
struct SourceArgs {
    /// Community name, without the `r/` prefix
    #[arg(long)]
    subreddit: Option<String>,

    /// Number of posts to request
    #[arg(long)]
    limit: Option<u32>,
}

impl SourceArgs {
    fn apply(self, config: &mut Config) {
        if let Some(subreddit) = self.subreddit {
            config.source.subreddit = subreddit;
        }
        if let Some(limit) = self.limit {
            config.source.limit = limit;
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the configured warehouse backend.
fn build_warehouse(config: &Config) -> Result<Box<dyn Warehouse>> {
    match config.warehouse.backend {
        WarehouseBackend::Local => Ok(Box::new(LocalWarehouse::new(
            &config.warehouse.local_path,
        ))),
        WarehouseBackend::Snowflake => build_snowflake(config),
    }
}

#[cfg(feature = "snowflake")]
fn build_snowflake(config: &Config) -> Result<Box<dyn Warehouse>> {
    let credentials = reddit_pipeline::config::WarehouseCredentials::from_env()?;
    log::info!(
        "✓ Warehouse credentials OK for {}@{}",
        credentials.user,
        credentials.account
    );
    Ok(Box::new(reddit_pipeline::warehouse::SnowflakeWarehouse::new(
        credentials,
        &config.warehouse.table,
    )))
}

#[cfg(not(feature = "snowflake"))]
fn build_snowflake(_config: &Config) -> Result<Box<dyn Warehouse>> {
    Err(reddit_pipeline::error::AppError::config(
        "warehouse.backend = \"snowflake\" requires building with the `snowflake` feature",
    ))
}

fn build_fetcher(config: &Config) -> Result<PostFetcher> {
    let client = http::create_async_client(&config.http)?;
    Ok(PostFetcher::new(client, &config.source))
}

/// Check that the loaded configuration can actually build its warehouse.
fn validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");
    log::info!("✓ Config OK");

    let warehouse = build_warehouse(config)?;
    log::info!("✓ Warehouse target {}", warehouse.describe());

    log::info!("All validations passed!");
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_logging(cli.verbose);

    let mut config = config::load_config(&cli.config)?;

    match cli.command {
        Command::Run { source } => {
            source.apply(&mut config);
            config.validate()?;

            let fetcher = build_fetcher(&config)?;
            let warehouse = build_warehouse(&config)?;
            let summary = pipeline::run_pipeline(&config, &fetcher, warehouse.as_ref()).await?;

            log::info!(
                "Fetched {} posts, loaded {} posts",
                summary.fetched,
                summary.loaded
            );
        }

        Command::Fetch { source, output } => {
            source.apply(&mut config);
            config.validate()?;

            let fetcher = build_fetcher(&config)?;
            let posts = pipeline::run_fetch(&config, &fetcher).await?;
            let json = serde_json::to_string_pretty(&posts)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    log::info!("Posts saved to {}", path.display());
                }
                None => println!("{json}"),
            }
        }

        Command::Validate => validate(&config)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_local_backend() {
        let mut config = Config::default();
        config.warehouse.backend = WarehouseBackend::Local;
        assert!(validate(&config).is_ok());
    }

    #[cfg(not(feature = "snowflake"))]
    #[test]
    fn validate_rejects_snowflake_without_feature() {
        let config = Config::default();
        assert_eq!(config.warehouse.backend, WarehouseBackend::Snowflake);

        let err = validate(&config).unwrap_err();
        assert!(matches!(err, reddit_pipeline::error::AppError::Config(_)));
    }
}
