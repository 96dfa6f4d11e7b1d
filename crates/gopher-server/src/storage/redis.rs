//! Redis gopher repository
//!
//! Each gopher is stored as JSON under `{keyspace}:{id}`. Creation relies on
//! `SET NX` and updates on `SET XX`, so the existence checks happen inside
//! Redis in the same command as the write.

use anyhow::{Context, Result};
use async_trait::async_trait;
use gopher_core::{Gopher, GopherError, GopherRepository, RequestContext};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

pub const DEFAULT_KEYSPACE: &str = "gophers";

pub struct RedisRepository {
    conn: ConnectionManager,
    keyspace: String,
}

impl RedisRepository {
    pub async fn connect(redis_url: &str, keyspace: impl Into<String>) -> Result<Self> {
        tracing::info!("Connecting to Redis at: {}", redis_url);

        let client = redis::Client::open(redis_url)
            .with_context(|| format!("Invalid Redis URL: {}", redis_url))?;
        let conn = ConnectionManager::new(client)
            .await
            .with_context(|| format!("Failed to connect to Redis at: {}", redis_url))?;

        Ok(Self {
            conn,
            keyspace: keyspace.into(),
        })
    }

    fn key(&self, id: &str) -> String {
        gopher_key(&self.keyspace, id)
    }
}

fn gopher_key(keyspace: &str, id: &str) -> String {
    format!("{keyspace}:{id}")
}

fn encode(gopher: &Gopher) -> gopher_core::Result<String> {
    serde_json::to_string(gopher).map_err(|e| GopherError::Serialization(e.to_string()))
}

fn decode(json: &str) -> gopher_core::Result<Gopher> {
    serde_json::from_str(json).map_err(|e| GopherError::Serialization(e.to_string()))
}

#[async_trait]
impl GopherRepository for RedisRepository {
    #[tracing::instrument(
        skip_all,
        fields(repository = "redis", request_id = %ctx.request_id, id = %gopher.id)
    )]
    async fn create_gopher(
        &self,
        ctx: &RequestContext,
        gopher: &Gopher,
    ) -> gopher_core::Result<()> {
        let json = encode(gopher)?;
        let mut conn = self.conn.clone();

        let reply: Option<String> = redis::cmd("SET")
            .arg(self.key(&gopher.id))
            .arg(json)
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(GopherError::backend)?;

        match reply {
            Some(_) => Ok(()),
            None => Err(GopherError::AlreadyExists(gopher.id.clone())),
        }
    }

    #[tracing::instrument(skip_all, fields(repository = "redis", request_id = %ctx.request_id))]
    async fn fetch_gophers(&self, ctx: &RequestContext) -> gopher_core::Result<Vec<Gopher>> {
        let mut conn = self.conn.clone();

        let keys: Vec<String> = conn
            .keys(gopher_key(&self.keyspace, "*"))
            .await
            .map_err(GopherError::backend)?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(GopherError::backend)?;

        // Keys deleted between KEYS and MGET come back as nil.
        values.iter().flatten().map(|json| decode(json)).collect()
    }

    #[tracing::instrument(
        skip_all,
        fields(repository = "redis", request_id = %ctx.request_id, id = %id)
    )]
    async fn fetch_gopher_by_id(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> gopher_core::Result<Gopher> {
        let mut conn = self.conn.clone();

        let data: Option<String> = conn
            .get(self.key(id))
            .await
            .map_err(GopherError::backend)?;

        match data {
            Some(json) => decode(&json),
            None => Err(GopherError::NotFound(id.to_string())),
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(repository = "redis", request_id = %ctx.request_id, id = %id)
    )]
    async fn update_gopher(
        &self,
        ctx: &RequestContext,
        id: &str,
        gopher: &Gopher,
    ) -> gopher_core::Result<()> {
        let mut stored = gopher.clone();
        stored.id = id.to_string();
        let json = encode(&stored)?;
        let mut conn = self.conn.clone();

        let reply: Option<String> = redis::cmd("SET")
            .arg(self.key(id))
            .arg(json)
            .arg("XX")
            .query_async(&mut conn)
            .await
            .map_err(GopherError::backend)?;

        match reply {
            Some(_) => Ok(()),
            None => Err(GopherError::NotFound(id.to_string())),
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(repository = "redis", request_id = %ctx.request_id, id = %id)
    )]
    async fn delete_gopher(&self, ctx: &RequestContext, id: &str) -> gopher_core::Result<()> {
        let mut conn = self.conn.clone();

        let removed: i64 = conn.del(self.key(id)).await.map_err(GopherError::backend)?;
        tracing::debug!(removed, "Gopher deleted");

        Ok(())
    }
}
