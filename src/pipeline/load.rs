// src/pipeline/load.rs

//! Load step.

use crate::error::Result;
use crate::models::Post;
use crate::services::PostLoader;
use crate::warehouse::Warehouse;

/// Upsert `posts` into `warehouse`, returning the number processed.
pub async fn run_load(warehouse: &dyn Warehouse, posts: &[Post]) -> Result<usize> {
    PostLoader::new(warehouse).load(posts).await
}
