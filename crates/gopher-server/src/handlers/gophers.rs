//! Gopher handlers

use crate::error::ApiError;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use gopher_core::{is_addressable_id, Gopher, RequestContext};
use serde::Deserialize;

/// Body of POST and PUT requests. Every field is optional; PUT ignores `ID`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GopherRequest {
    #[serde(rename = "ID")]
    id: String,
    name: String,
    image: String,
    age: i64,
}

impl GopherRequest {
    fn parse(body: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(body).map_err(|e| {
            tracing::debug!("Rejected request body: {}", e);
            ApiError::invalid_body()
        })
    }
}

fn check_id(id: &str) -> Result<(), ApiError> {
    if is_addressable_id(id) {
        Ok(())
    } else {
        Err(ApiError::not_found())
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<Vec<Gopher>>, ApiError> {
    state
        .fetching
        .fetch_gophers(&ctx)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Failed to fetch gophers: {}", e);
            ApiError::from_gopher_error(&e, "Can't fetch gophers")
        })
}

pub async fn get(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<Json<Gopher>, ApiError> {
    check_id(&id)?;

    match state.fetching.fetch_gopher_by_id(&ctx, &id).await {
        Ok(Some(gopher)) => Ok(Json(gopher)),
        Ok(None) => Err(ApiError::not_found()),
        Err(e) => Err(ApiError::from_gopher_error(&e, "Can't fetch the gopher")),
    }
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let req = GopherRequest::parse(&body)?;

    state
        .adding
        .add_gopher(&ctx, &req.id, &req.name, &req.image, req.age)
        .await
        .map_err(|e| {
            tracing::warn!("Failed to create gopher {}: {}", req.id, e);
            ApiError::from_gopher_error(&e, "Can't create a gopher")
        })?;

    Ok(StatusCode::CREATED)
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    check_id(&id)?;
    let req = GopherRequest::parse(&body)?;

    state
        .modifying
        .modify_gopher(&ctx, &id, &req.name, &req.image, req.age)
        .await
        .map_err(|e| {
            tracing::warn!("Failed to modify gopher {}: {}", id, e);
            ApiError::from_gopher_error(&e, "Can't modify a gopher")
        })?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    check_id(&id)?;

    state
        .removing
        .remove_gopher(&ctx, &id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to remove gopher {}: {}", id, e);
            ApiError::from_gopher_error(&e, "Can't remove a gopher")
        })?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_router;
    use crate::storage::MemoryRepository;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app(repo: MemoryRepository) -> Router {
        build_router(AppState::new("gopherapi-test", Arc::new(repo)), false)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
        let response = app
            .clone()
            .oneshot(Request::builder().method(method).uri(uri).body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_list_returns_sample_gophers() {
        let app = test_app(MemoryRepository::with_gophers(crate::sample::gophers()));

        let (status, body) = send(&app, "GET", "/gophers", None).await;

        assert_eq!(status, StatusCode::OK);
        let gophers: Vec<Gopher> = serde_json::from_slice(&body).unwrap();
        assert_eq!(gophers.len(), 4);
    }

    #[tokio::test]
    async fn test_list_empty_store_is_empty_array() {
        let app = test_app(MemoryRepository::new());

        let (status, body) = send(&app, "GET", "/gophers", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<serde_json::Value>(&body).unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_get_found() {
        let app = test_app(MemoryRepository::with_gophers(crate::sample::gophers()));

        let (status, body) = send(&app, "GET", "/gophers/01D3XZ3ZHCP3KG9VT4FGAD8KDR", None).await;

        assert_eq!(status, StatusCode::OK);
        let gopher: Gopher = serde_json::from_slice(&body).unwrap();
        assert_eq!(gopher, crate::sample::gophers()[0]);
    }

    #[tokio::test]
    async fn test_get_missing_is_404_with_message() {
        let app = test_app(MemoryRepository::new());

        let (status, body) = send(&app, "GET", "/gophers/X", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(serde_json::from_slice::<String>(&body).unwrap(), "Gopher Not found");
    }

    #[tokio::test]
    async fn test_get_rejects_ids_outside_route_pattern() {
        let app = test_app(MemoryRepository::new());

        let (status, _) = send(&app, "GET", "/gophers/not-valid", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let app = test_app(MemoryRepository::new());
        let body = r#"{"ID":"G2","name":"Billy","image":"http://x","age":24}"#;

        let (status, created_body) = send(&app, "POST", "/gophers", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created_body.is_empty());

        let (status, body) = send(&app, "GET", "/gophers/G2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
            json!({"ID": "G2", "name": "Billy", "image": "http://x", "age": 24})
        );
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let app = test_app(MemoryRepository::with_gophers(vec![Gopher::new("G1", "Jenny", "", 18)]));

        let (status, body) = send(&app, "POST", "/gophers", Some(r#"{"ID":"G1"}"#)).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(serde_json::from_slice::<String>(&body).unwrap(), "Gopher already exists");
    }

    #[tokio::test]
    async fn test_create_with_malformed_body_is_bad_request() {
        let app = test_app(MemoryRepository::new());

        let (status, body) = send(&app, "POST", "/gophers", Some("{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::from_slice::<String>(&body).unwrap(),
            "Error unmarshalling request body"
        );
    }

    #[tokio::test]
    async fn test_create_rejects_ids_no_route_can_reach() {
        let app = test_app(MemoryRepository::new());

        let (status, body) = send(&app, "POST", "/gophers", Some(r#"{"ID":"a-b"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::from_slice::<String>(&body).unwrap(),
            crate::services::adding::INVALID_ID_MESSAGE
        );

        let (_, body) = send(&app, "GET", "/gophers", None).await;
        assert_eq!(serde_json::from_slice::<serde_json::Value>(&body).unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_create_without_id_is_bad_request() {
        let app = test_app(MemoryRepository::new());

        let (status, body) = send(&app, "POST", "/gophers", Some(r#"{"name":"Nameless"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::from_slice::<String>(&body).unwrap(),
            crate::services::adding::INVALID_ID_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_update_then_get() {
        let app = test_app(MemoryRepository::with_gophers(vec![Gopher::new("G1", "", "", 18)]));

        let (status, _) = send(&app, "PUT", "/gophers/G1", Some(r#"{"age":99}"#)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, "GET", "/gophers/G1", None).await;
        let gopher: Gopher = serde_json::from_slice(&body).unwrap();
        assert_eq!(gopher.id, "G1");
        assert_eq!(gopher.age, 99);
    }

    #[tokio::test]
    async fn test_update_missing_is_404() {
        let app = test_app(MemoryRepository::new());

        let (status, body) = send(&app, "PUT", "/gophers/G1", Some(r#"{"age":99}"#)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(serde_json::from_slice::<String>(&body).unwrap(), "Gopher Not found");
    }

    #[tokio::test]
    async fn test_delete_is_always_no_content() {
        let app = test_app(MemoryRepository::with_gophers(vec![Gopher::new("G1", "", "", 18)]));

        let (status, _) = send(&app, "DELETE", "/gophers/G1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "DELETE", "/gophers/G1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "GET", "/gophers/G1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
