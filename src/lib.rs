// src/lib.rs

//! Subreddit top-posts pipeline library.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
pub mod warehouse;
