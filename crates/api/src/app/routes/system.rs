use axum::{Extension, Json, http::StatusCode, response::IntoResponse};

use crate::app::errors::ApiError;
use crate::context::IdentityContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(identity): Extension<IdentityContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "store_id": identity.store_id().to_string(),
        "scopes": identity.scopes().iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("No route matches the requested path")
}
