//! Storage traits for persistence

use crate::{Gopher, RequestContext, Result};
use async_trait::async_trait;

/// Gopher store
///
/// Every backend implements the same contract:
/// - `create_gopher` fails with `AlreadyExists` when the id is taken.
/// - `fetch_gopher_by_id` fails with `NotFound` when the id is absent.
/// - `update_gopher` replaces name, image and age of an existing record and
///   fails with `NotFound` when the id is absent (never an upsert).
/// - `delete_gopher` is idempotent.
/// - `fetch_gophers` returns records in no particular order.
#[async_trait]
pub trait GopherRepository: Send + Sync {
    async fn create_gopher(&self, ctx: &RequestContext, gopher: &Gopher) -> Result<()>;
    async fn fetch_gophers(&self, ctx: &RequestContext) -> Result<Vec<Gopher>>;
    async fn fetch_gopher_by_id(&self, ctx: &RequestContext, id: &str) -> Result<Gopher>;
    async fn update_gopher(&self, ctx: &RequestContext, id: &str, gopher: &Gopher) -> Result<()>;
    async fn delete_gopher(&self, ctx: &RequestContext, id: &str) -> Result<()>;
}
