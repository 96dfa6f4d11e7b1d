//! Health check handler

use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "server_id": &*state.server_id,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
