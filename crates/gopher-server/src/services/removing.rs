//! Removing service

use gopher_core::{GopherRepository, RequestContext, Result};
use std::sync::Arc;
use tracing::info;

pub struct RemovingService {
    repository: Arc<dyn GopherRepository>,
}

impl RemovingService {
    pub fn new(repository: Arc<dyn GopherRepository>) -> Self {
        Self { repository }
    }

    pub async fn remove_gopher(&self, ctx: &RequestContext, id: &str) -> Result<()> {
        info!(request_id = %ctx.request_id, "Removing gopher: id={}", id);
        self.repository.delete_gopher(ctx, id).await
    }
}
