//! Gopher API Server
//!
//! REST service for creating, listing, modifying and removing gophers.
//! Storage is pluggable: in memory, embedded SQLite, or Redis.

mod config;
mod error;
mod extractors;
mod handlers;
mod logging;
mod sample;
mod services;
mod storage;

use anyhow::{Context, Result};
use axum::{
    extract::{MatchedPath, Request},
    middleware,
    routing::get,
    Router,
};
use clap::Parser;
use gopher_core::{GopherRepository, RequestContext};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, warn, Instrument};

use config::{Backend, Config};
use services::{AddingService, FetchingService, ModifyingService, RemovingService};
use storage::{MemoryRepository, RedisRepository, SqliteRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub server_id: Arc<str>,
    pub adding: Arc<AddingService>,
    pub fetching: Arc<FetchingService>,
    pub modifying: Arc<ModifyingService>,
    pub removing: Arc<RemovingService>,
}

impl AppState {
    pub fn new(server_id: impl Into<Arc<str>>, repository: Arc<dyn GopherRepository>) -> Self {
        Self {
            server_id: server_id.into(),
            adding: Arc::new(AddingService::new(repository.clone())),
            fetching: Arc::new(FetchingService::new(repository.clone())),
            modifying: Arc::new(ModifyingService::new(repository.clone())),
            removing: Arc::new(RemovingService::new(repository)),
        }
    }
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    dotenvy::dotenv().ok();
    let config = Config::parse();

    if let Err(e) = logging::init(config.log_json) {
        eprintln!("[FATAL] {:#}", e);
        std::process::exit(1);
    }

    info!("Starting Gopher API Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server(config).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server(config: Config) -> Result<()> {
    let server_id = config.server_id();
    info!("Server id: {}", server_id);

    let repository = open_repository(&config).await?;

    if config.with_data {
        let ctx = RequestContext::background(&server_id);
        sample::seed(repository.as_ref(), &ctx)
            .instrument(info_span!("startup", server_id = %ctx.server_id))
            .await
            .context("Failed to load sample gophers")?;
    }

    let state = AppState::new(server_id, repository);
    let app = build_router(state, config.with_trace);

    let addr = config.http_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    let local_addr = listener
        .local_addr()
        .context("Failed to read listening address")?;
    info!("Server listening on {}", local_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn open_repository(config: &Config) -> Result<Arc<dyn GopherRepository>> {
    let repository: Arc<dyn GopherRepository> = match config.database {
        Backend::Inmem => {
            info!("Using in-memory storage");
            Arc::new(MemoryRepository::new())
        }
        Backend::Sqlite => {
            info!("Using SQLite storage at {}", config.sqlite_path);
            Arc::new(
                SqliteRepository::new(&config.sqlite_path)
                    .await
                    .context("Failed to initialize SQLite database")?,
            )
        }
        Backend::Redis => {
            info!("Using Redis storage at {}", config.redis_url);
            Arc::new(
                RedisRepository::connect(&config.redis_url, storage::redis::DEFAULT_KEYSPACE)
                    .await
                    .context("Failed to connect to Redis")?,
            )
        }
    };

    Ok(repository)
}

pub fn build_router(state: AppState, with_trace: bool) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/gophers",
            get(handlers::gophers::list).post(handlers::gophers::create),
        )
        .route(
            "/gophers/:id",
            get(handlers::gophers::get)
                .put(handlers::gophers::update)
                .delete(handlers::gophers::delete),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            extractors::attach_request_context,
        ));

    let router = if with_trace {
        router.layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let route = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str)
                    .unwrap_or("unmatched");
                info_span!("http_request", method = %request.method(), route)
            }),
        )
    } else {
        router
    };

    router.with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
