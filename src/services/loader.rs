// src/services/loader.rs

//! Post loader service.
//!
//! Upserts a batch of posts through one warehouse session and commits once
//! at the end, so a failing statement leaves nothing from the batch behind.

use crate::error::Result;
use crate::models::Post;
use crate::warehouse::Warehouse;

/// Service for loading normalized posts into a warehouse.
pub struct PostLoader<'a> {
    warehouse: &'a dyn Warehouse,
}

impl<'a> PostLoader<'a> {
    pub fn new(warehouse: &'a dyn Warehouse) -> Self {
        Self { warehouse }
    }

    /// Upsert every post and return how many were processed.
    ///
    /// An empty batch returns 0 without opening a connection.
    pub async fn load(&self, posts: &[Post]) -> Result<usize> {
        if posts.is_empty() {
            log::info!("No posts to load");
            return Ok(0);
        }

        let mut session = self.warehouse.connect().await?;
        let mut processed = 0;

        for post in posts {
            if let Err(error) = session.upsert_post(post).await {
                log::error!("Upsert failed for post {}: {}", post.post_id, error);
                if let Err(rollback_error) = session.rollback().await {
                    log::warn!("Rollback failed: {}", rollback_error);
                }
                return Err(error);
            }
            processed += 1;
        }

        session.commit().await?;

        log::info!(
            "Loaded {} posts to {}",
            processed,
            self.warehouse.describe()
        );
        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::error::AppError;
    use crate::warehouse::WarehouseSession;

    /// In-memory warehouse keyed by post id, recording every interaction.
    #[derive(Default)]
    struct FakeWarehouse {
        state: Arc<Mutex<FakeState>>,
        fail_on: Option<String>,
    }

    #[derive(Default)]
    struct FakeState {
        connects: usize,
        commits: usize,
        rollbacks: usize,
        table: BTreeMap<String, Post>,
    }

    struct FakeSession {
        state: Arc<Mutex<FakeState>>,
        fail_on: Option<String>,
        pending: Vec<Post>,
    }

    #[async_trait]
    impl Warehouse for FakeWarehouse {
        fn describe(&self) -> String {
            "fake".to_string()
        }

        async fn connect(&self) -> Result<Box<dyn WarehouseSession>> {
            self.state.lock().unwrap().connects += 1;
            Ok(Box::new(FakeSession {
                state: Arc::clone(&self.state),
                fail_on: self.fail_on.clone(),
                pending: Vec::new(),
            }))
        }
    }

    #[async_trait]
    impl WarehouseSession for FakeSession {
        async fn upsert_post(&mut self, post: &Post) -> Result<()> {
            if self.fail_on.as_deref() == Some(post.post_id.as_str()) {
                return Err(AppError::statement(&post.post_id, "boom"));
            }
            self.pending.push(post.clone());
            Ok(())
        }

        async fn commit(self: Box<Self>) -> Result<()> {
            let FakeSession { state, pending, .. } = *self;
            let mut state = state.lock().unwrap();
            state.commits += 1;
            for post in pending {
                state.table.insert(post.post_id.clone(), post);
            }
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<()> {
            self.state.lock().unwrap().rollbacks += 1;
            Ok(())
        }
    }

    fn post(id: &str, score: i64) -> Post {
        Post {
            post_id: id.to_string(),
            title: format!("title {id}"),
            author: "u".to_string(),
            score,
            num_comments: 0,
            url: "https://x".to_string(),
            permalink: format!("https://reddit.com/r/Foo/comments/{id}/t/"),
            created_utc: Utc::now(),
            scraped_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_does_not_connect() {
        let warehouse = FakeWarehouse::default();
        let loaded = PostLoader::new(&warehouse).load(&[]).await.unwrap();

        assert_eq!(loaded, 0);
        assert_eq!(warehouse.state.lock().unwrap().connects, 0);
    }

    #[tokio::test]
    async fn test_batch_commits_once() {
        let warehouse = FakeWarehouse::default();
        let posts = vec![post("a", 1), post("b", 2), post("c", 3)];

        let loaded = PostLoader::new(&warehouse).load(&posts).await.unwrap();

        let state = warehouse.state.lock().unwrap();
        assert_eq!(loaded, 3);
        assert_eq!(state.connects, 1);
        assert_eq!(state.commits, 1);
        assert_eq!(state.rollbacks, 0);
        assert_eq!(state.table.len(), 3);
    }

    #[tokio::test]
    async fn test_repeated_post_counts_every_record() {
        let warehouse = FakeWarehouse::default();
        let posts = vec![post("a", 1), post("a", 5)];

        let loaded = PostLoader::new(&warehouse).load(&posts).await.unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(warehouse.state.lock().unwrap().table["a"].score, 5);
    }

    #[tokio::test]
    async fn test_failed_statement_rolls_back_whole_batch() {
        let warehouse = FakeWarehouse {
            fail_on: Some("b".to_string()),
            ..FakeWarehouse::default()
        };
        let posts = vec![post("a", 1), post("b", 2), post("c", 3)];

        let err = PostLoader::new(&warehouse).load(&posts).await.unwrap_err();

        assert!(matches!(err, AppError::Statement { ref post_id, .. } if post_id == "b"));
        let state = warehouse.state.lock().unwrap();
        assert_eq!(state.commits, 0);
        assert_eq!(state.rollbacks, 1);
        assert!(state.table.is_empty());
    }
}
