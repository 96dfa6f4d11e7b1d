//! In-memory gopher repository
//!
//! A single map guarded by one reader/writer lock: reads share the lock,
//! create/update/delete hold it exclusively.

use async_trait::async_trait;
use gopher_core::{Gopher, GopherError, GopherRepository, RequestContext, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

pub struct MemoryRepository {
    gophers: RwLock<HashMap<String, Gopher>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            gophers: RwLock::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    /// Create a repository pre-loaded with `gophers`, keyed by their ids.
    pub fn with_gophers(gophers: impl IntoIterator<Item = Gopher>) -> Self {
        let gophers = gophers
            .into_iter()
            .map(|gopher| (gopher.id.clone(), gopher))
            .collect();

        Self {
            gophers: RwLock::new(gophers),
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.gophers.read().await.len()
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GopherRepository for MemoryRepository {
    #[tracing::instrument(
        skip_all,
        fields(repository = "in memory", request_id = %ctx.request_id, id = %gopher.id)
    )]
    async fn create_gopher(&self, ctx: &RequestContext, gopher: &Gopher) -> Result<()> {
        let mut gophers = self.gophers.write().await;
        if gophers.contains_key(&gopher.id) {
            return Err(GopherError::AlreadyExists(gopher.id.clone()));
        }

        gophers.insert(gopher.id.clone(), gopher.clone());
        debug!("Gopher stored");
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(repository = "in memory", request_id = %ctx.request_id))]
    async fn fetch_gophers(&self, ctx: &RequestContext) -> Result<Vec<Gopher>> {
        let gophers = self.gophers.read().await;
        Ok(gophers.values().cloned().collect())
    }

    #[tracing::instrument(
        skip_all,
        fields(repository = "in memory", request_id = %ctx.request_id, id = %id)
    )]
    async fn fetch_gopher_by_id(&self, ctx: &RequestContext, id: &str) -> Result<Gopher> {
        let gophers = self.gophers.read().await;
        gophers
            .get(id)
            .cloned()
            .ok_or_else(|| GopherError::NotFound(id.to_string()))
    }

    #[tracing::instrument(
        skip_all,
        fields(repository = "in memory", request_id = %ctx.request_id, id = %id)
    )]
    async fn update_gopher(&self, ctx: &RequestContext, id: &str, gopher: &Gopher) -> Result<()> {
        let mut gophers = self.gophers.write().await;
        let existing = gophers
            .get_mut(id)
            .ok_or_else(|| GopherError::NotFound(id.to_string()))?;

        existing.apply(gopher);
        debug!("Gopher updated");
        Ok(())
    }

    #[tracing::instrument(
        skip_all,
        fields(repository = "in memory", request_id = %ctx.request_id, id = %id)
    )]
    async fn delete_gopher(&self, ctx: &RequestContext, id: &str) -> Result<()> {
        let removed = self.gophers.write().await.remove(id);
        debug!(existed = removed.is_some(), "Gopher deleted");
        Ok(())
    }
}
