// src/pipeline/pipeline.rs

use crate::error::Result;
use crate::models::{Config, PipelineSummary};
use crate::services::PostFetcher;
use crate::warehouse::Warehouse;

use super::fetch::run_fetch;
use super::load::run_load;

/// Run the full pipeline: fetch, then load.
///
/// Any error ends the run and is returned as-is.
pub async fn run_pipeline(
    config: &Config,
    fetcher: &PostFetcher,
    warehouse: &dyn Warehouse,
) -> Result<PipelineSummary> {
    log::info!(
        "Step 1/2: Fetching top posts from r/{}",
        config.source.subreddit
    );
    let posts = run_fetch(config, fetcher).await?;

    log::info!("Step 2/2: Loading posts into {}", warehouse.describe());
    let loaded = run_load(warehouse, &posts).await?;

    log::info!("Pipeline complete: loaded {} posts", loaded);

    Ok(PipelineSummary {
        fetched: posts.len(),
        loaded,
    })
}
