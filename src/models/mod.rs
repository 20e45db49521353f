// src/models/mod.rs

//! Domain models for the pipeline.

mod config;
mod post;

// Re-export all public types
pub use config::{
    Config, HttpConfig, MAX_LIMIT, SourceConfig, WarehouseBackend, WarehouseConfig,
};
pub use post::{Listing, ListingChild, ListingData, Post, RawPost, epoch_to_utc};

/// Counts reported by a finished pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub fetched: usize,
    pub loaded: usize,
}
