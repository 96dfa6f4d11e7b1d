//! Logging setup and shared log events

use anyhow::{anyhow, Result};
use gopher_core::{GopherError, RequestContext};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_FILTER: &str = "info";

/// Log id attached to every unexpected error so they can be searched for.
pub const UNEXPECTED_ERROR_LOG_ID: &str = "01DK2XFX9PQ85ZPZ5CP68P108Y";

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init(json: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = if json {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
        tracing::subscriber::set_global_default(subscriber)
    };

    installed.map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

/// Report an error the caller did not expect, with the request metadata.
pub fn unexpected_error(ctx: &RequestContext, err: &GopherError) {
    tracing::error!(
        logid = UNEXPECTED_ERROR_LOG_ID,
        server_id = %ctx.server_id,
        request_id = %ctx.request_id,
        endpoint = ctx.endpoint.as_deref().unwrap_or("-"),
        client_ip = ctx.client_ip.as_deref().unwrap_or("-"),
        forwarded_for = ctx.forwarded_for.as_deref().unwrap_or("-"),
        "Unexpected error: {}",
        err
    );
}
