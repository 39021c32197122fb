//! Request middleware: the authentication gate (the only place trust is
//! established for a request), CORS, and uniform 405 responses.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use coupons_auth::{Principal, TokenCodec, VerifyError};
use coupons_infra::StoreDirectory;

use crate::app::errors::ApiError;
use crate::context::IdentityContext;

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<TokenCodec>,
    pub stores: Arc<dyn StoreDirectory>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = authenticate(&state, req.headers())?;
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Verify the bearer credential and resolve its subject to a known store.
///
/// An unknown store is reported exactly like a bad token.
pub fn authenticate(state: &AuthState, headers: &HeaderMap) -> Result<IdentityContext, ApiError> {
    let token = extract_bearer(headers).ok_or(ApiError::AuthenticationMissing)?;

    let claims = state.codec.verify(token).map_err(|e| match e {
        VerifyError::Key(key_err) => {
            tracing::error!(error = %key_err, "token verification unavailable");
            ApiError::Internal
        }
        reason => {
            tracing::debug!(%reason, "rejected access token");
            ApiError::AuthenticationInvalid
        }
    })?;

    let store_id = claims
        .store_id()
        .filter(|id| state.stores.exists(*id))
        .ok_or_else(|| {
            tracing::debug!(sub = %claims.sub, jti = %claims.jti, "token subject does not resolve to a store");
            ApiError::AuthenticationInvalid
        })?;

    Ok(IdentityContext::new(Principal::from_claims(store_id, &claims)))
}

/// Cross-origin access for browser clients on the listed origins.
///
/// Credentials are allowed, so origins are always an explicit list.
pub fn cors_layer(allowed_origins: &[HeaderValue]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins.iter().cloned()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS, Method::HEAD])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Replace the router's bare 405 with the uniform error payload, keeping `Allow`.
pub async fn uniform_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut uniform = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        uniform.headers_mut().insert(header::ALLOW, allow);
    }
    uniform
}

/// `Authorization: Bearer <token>`; anything else counts as no credential.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();

    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, header::AUTHORIZATION};

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[tokio::test]
    async fn bare_405_becomes_uniform_error() {
        let mut bare = StatusCode::METHOD_NOT_ALLOWED.into_response();
        bare.headers_mut().insert(header::ALLOW, HeaderValue::from_static("GET,HEAD"));

        let res = uniform_method_not_allowed(bare).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()[header::ALLOW], "GET,HEAD");
        assert_eq!(
            res.headers()[header::CONTENT_TYPE],
            HeaderValue::from_static("application/json")
        );
    }

    #[tokio::test]
    async fn other_responses_pass_through() {
        let res = uniform_method_not_allowed(StatusCode::NO_CONTENT.into_response()).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn other_forms_are_no_credential() {
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
        assert_eq!(extract_bearer(&headers("abc.def.ghi")), None);
        assert_eq!(extract_bearer(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer(&headers("bearer abc")), None);
        assert_eq!(extract_bearer(&headers("Bearer ")), None);
    }
}
