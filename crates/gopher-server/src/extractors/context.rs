//! Request context middleware
//!
//! Builds a `RequestContext` for every request and stores it in the request
//! extensions, where handlers pick it up with `Extension<RequestContext>`.
//! The rest of the request runs inside a `request` span carrying the server
//! id and request metadata, so every nested log event is tagged with them.

use crate::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use gopher_core::RequestContext;
use std::net::SocketAddr;
use tracing::{info_span, Instrument, Span};

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";

pub async fn attach_request_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let ctx = build_context(&state.server_id, &request);
    let span = request_span(&ctx);
    request.extensions_mut().insert(ctx);
    next.run(request).instrument(span).await
}

fn request_span(ctx: &RequestContext) -> Span {
    info_span!(
        "request",
        server_id = %ctx.server_id,
        request_id = %ctx.request_id,
        endpoint = %ctx.endpoint.as_deref().unwrap_or("-"),
        client_ip = %ctx.client_ip.as_deref().unwrap_or("-"),
        forwarded_for = %ctx.forwarded_for.as_deref().unwrap_or("-")
    )
}

fn build_context(server_id: &str, request: &Request) -> RequestContext {
    let headers = request.headers();

    let mut ctx = RequestContext::new(server_id);
    if let Some(request_id) = header(headers, REQUEST_ID_HEADER) {
        ctx = ctx.with_request_id(request_id);
    }

    let endpoint = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_else(|| request.uri().path());
    ctx = ctx.with_endpoint(endpoint);

    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        ctx = ctx.with_client_ip(addr.ip().to_string());
    }
    if let Some(forwarded_for) = header(headers, FORWARDED_FOR_HEADER) {
        ctx = ctx.with_forwarded_for(forwarded_for);
    }
    if let Some(forwarded_proto) = header(headers, FORWARDED_PROTO_HEADER) {
        ctx = ctx.with_forwarded_proto(forwarded_proto);
    }

    ctx
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
}
