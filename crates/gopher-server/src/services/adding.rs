//! Adding service

use gopher_core::{
    is_addressable_id, Gopher, GopherError, GopherRepository, RequestContext, Result,
};
use std::sync::Arc;
use tracing::info;

pub const INVALID_ID_MESSAGE: &str =
    "Gopher ID must be non-empty and contain only letters, digits and underscores";

pub struct AddingService {
    repository: Arc<dyn GopherRepository>,
}

impl AddingService {
    pub fn new(repository: Arc<dyn GopherRepository>) -> Self {
        Self { repository }
    }

    /// Store a new gopher built from the given fields. The id must be
    /// addressable through `/gophers/{id}`.
    pub async fn add_gopher(
        &self,
        ctx: &RequestContext,
        id: &str,
        name: &str,
        image: &str,
        age: i64,
    ) -> Result<()> {
        if !is_addressable_id(id) {
            return Err(GopherError::Validation(INVALID_ID_MESSAGE.to_string()));
        }

        info!(request_id = %ctx.request_id, "Adding gopher: id={}, name={}", id, name);

        let gopher = Gopher::new(id, name, image, age);
        self.repository.create_gopher(ctx, &gopher).await
    }
}
