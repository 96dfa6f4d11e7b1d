//! Fetching service

use crate::logging;
use gopher_core::{Gopher, GopherError, GopherRepository, RequestContext, Result};
use std::sync::Arc;
use tracing::debug;

pub struct FetchingService {
    repository: Arc<dyn GopherRepository>,
}

impl FetchingService {
    pub fn new(repository: Arc<dyn GopherRepository>) -> Self {
        Self { repository }
    }

    pub async fn fetch_gophers(&self, ctx: &RequestContext) -> Result<Vec<Gopher>> {
        debug!(request_id = %ctx.request_id, "Fetching all gophers");
        self.repository.fetch_gophers(ctx).await
    }

    /// Look up one gopher. A missing gopher is `Ok(None)`; any other failure
    /// is logged as unexpected and returned.
    pub async fn fetch_gopher_by_id(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<Option<Gopher>> {
        debug!(request_id = %ctx.request_id, "Fetching gopher {}", id);

        match self.repository.fetch_gopher_by_id(ctx, id).await {
            Ok(gopher) => Ok(Some(gopher)),
            Err(GopherError::NotFound(_)) => Ok(None),
            Err(e) => {
                logging::unexpected_error(ctx, &e);
                Err(e)
            }
        }
    }
}
