//! Service layer for the pipeline.
//!
//! - Listing fetch and normalization (`PostFetcher`)
//! - Batch upsert into a warehouse (`PostLoader`)

mod loader;
mod posts;

pub use loader::PostLoader;
pub use posts::PostFetcher;
