use std::sync::Arc;

use axum::{Extension, Json, extract::rejection::JsonRejection};
use chrono::Duration;

use coupons_auth::{DEFAULT_SCOPE, DEFAULT_TTL_SECS};

use crate::app::dto::{LoginRequest, TokenResponse, missing_param};
use crate::app::errors::{ApiError, ApiResult};
use crate::app::services::AppServices;

/// Issue an access token for an existing store.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(body) = body?;
    let params = body.auth.ok_or_else(|| missing_param("auth"))?;
    let store_uid = params.store_uid.ok_or_else(|| missing_param("store_uid"))?;

    let store = store_uid
        .store_id()
        .and_then(|id| services.stores.find(id))
        .ok_or_else(|| ApiError::not_found("Store not found"))?;

    let scope = params.scope.unwrap_or_else(|| DEFAULT_SCOPE.to_string());
    let issued = services
        .codec
        .issue(store.id, &scope, Duration::seconds(DEFAULT_TTL_SECS))?;

    let expires_in = issued.expires_in();
    Ok(Json(TokenResponse {
        access_token: issued.token,
        token_type: "Bearer",
        expires_in,
        scope,
    }))
}
