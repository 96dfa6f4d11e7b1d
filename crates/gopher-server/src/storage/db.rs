//! SQLite gopher repository (embedded, no external dependencies)

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gopher_core::{Gopher, GopherError, GopherRepository, RequestContext};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Path value selecting a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        let pool = if database_path == IN_MEMORY {
            // Every connection to :memory: opens its own database, so keep one.
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
                .await
                .context("Failed to open in-memory SQLite database")?
        } else {
            if let Some(parent) = std::path::Path::new(database_path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.with_context(|| {
                        format!("Failed to create database directory: {}", parent.display())
                    })?;
                }
            }

            let options = SqliteConnectOptions::new()
                .filename(database_path)
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await
                .with_context(|| {
                    format!("Failed to connect to SQLite database at: {}", database_path)
                })?
        };

        Self::run_migrations(&pool)
            .await
            .context("Failed to create the gophers table")?;

        tracing::info!("SQLite database ready");
        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS gophers (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL DEFAULT '',
                image TEXT NOT NULL DEFAULT '',
                age INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME,
                updated_at DATETIME
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl GopherRepository for SqliteRepository {
    #[tracing::instrument(
        skip_all,
        fields(repository = "sqlite", request_id = %ctx.request_id, id = %gopher.id)
    )]
    async fn create_gopher(
        &self,
        ctx: &RequestContext,
        gopher: &Gopher,
    ) -> gopher_core::Result<()> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO gophers (id, name, image, age, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&gopher.id)
        .bind(&gopher.name)
        .bind(&gopher.image)
        .bind(gopher.age)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(GopherError::backend)?;

        if result.rows_affected() == 0 {
            return Err(GopherError::AlreadyExists(gopher.id.clone()));
        }

        Ok(())
    }

    #[tracing::instrument(skip_all, fields(repository = "sqlite", request_id = %ctx.request_id))]
    async fn fetch_gophers(&self, ctx: &RequestContext) -> gopher_core::Result<Vec<Gopher>> {
        let rows: Vec<GopherRow> = sqlx::query_as(
            r#"
            SELECT id, name, image, age, created_at, updated_at FROM gophers
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(GopherError::backend)?;

        Ok(rows.into_iter().map(Gopher::from).collect())
    }

    #[tracing::instrument(
        skip_all,
        fields(repository = "sqlite", request_id = %ctx.request_id, id = %id)
    )]
    async fn fetch_gopher_by_id(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> gopher_core::Result<Gopher> {
        let row: Option<GopherRow> = sqlx::query_as(
            r#"
            SELECT id, name, image, age, created_at, updated_at
            FROM gophers WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(GopherError::backend)?;

        row.map(Gopher::from)
            .ok_or_else(|| GopherError::NotFound(id.to_string()))
    }

    #[tracing::instrument(
        skip_all,
        fields(repository = "sqlite", request_id = %ctx.request_id, id = %id)
    )]
    async fn update_gopher(
        &self,
        ctx: &RequestContext,
        id: &str,
        gopher: &Gopher,
    ) -> gopher_core::Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE gophers SET name = ?1, image = ?2, age = ?3, updated_at = ?4
            WHERE id = ?5
            "#,
        )
        .bind(&gopher.name)
        .bind(&gopher.image)
        .bind(gopher.age)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(GopherError::backend)?;

        if result.rows_affected() == 0 {
            return Err(GopherError::NotFound(id.to_string()));
        }

        Ok(())
    }

    #[tracing::instrument(
        skip_all,
        fields(repository = "sqlite", request_id = %ctx.request_id, id = %id)
    )]
    async fn delete_gopher(&self, ctx: &RequestContext, id: &str) -> gopher_core::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM gophers WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(GopherError::backend)?;

        Ok(())
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct GopherRow {
    id: String,
    name: String,
    image: String,
    age: i64,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<GopherRow> for Gopher {
    fn from(r: GopherRow) -> Self {
        Gopher {
            id: r.id,
            name: r.name,
            image: r.image,
            age: r.age,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
