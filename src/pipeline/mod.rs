//! Pipeline entry points.
//!
//! - `run_fetch`: Fetch and normalize the configured community's top posts
//! - `run_load`: Upsert a batch of posts into a warehouse
//! - `run_pipeline`: Fetch, then load

pub mod fetch;
pub mod load;
#[allow(clippy::module_inception)]
pub mod pipeline;

pub use fetch::run_fetch;
pub use load::run_load;
pub use pipeline::run_pipeline;
