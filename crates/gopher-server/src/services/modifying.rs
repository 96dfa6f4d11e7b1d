//! Modifying service

use gopher_core::{Gopher, GopherRepository, RequestContext, Result};
use std::sync::Arc;
use tracing::info;

pub struct ModifyingService {
    repository: Arc<dyn GopherRepository>,
}

impl ModifyingService {
    pub fn new(repository: Arc<dyn GopherRepository>) -> Self {
        Self { repository }
    }

    /// Replace name, image and age of the gopher stored under `id`.
    pub async fn modify_gopher(
        &self,
        ctx: &RequestContext,
        id: &str,
        name: &str,
        image: &str,
        age: i64,
    ) -> Result<()> {
        info!(request_id = %ctx.request_id, "Modifying gopher: id={}", id);

        let gopher = Gopher::new(id, name, image, age);
        self.repository.update_gopher(ctx, id, &gopher).await
    }
}
