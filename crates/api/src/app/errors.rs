//! Error taxonomy and the single place failures become HTTP responses.
//!
//! Every error body has the shape
//! `{ "errors": [ { "status", "code", "title", "detail" } ] }`.
//! Details are fixed, caller-safe summaries; the precise internal reason is
//! logged where the error is raised, never rendered.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use coupons_auth::{AuthzError, IssueError};
use coupons_core::DomainError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No bearer credential on a protected request.
    #[error("authentication required")]
    AuthenticationMissing,

    /// Credential present but not acceptable (any verification failure or unknown store).
    #[error("invalid token")]
    AuthenticationInvalid,

    /// Tenant mismatch or missing scope.
    #[error("forbidden")]
    Forbidden,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("bad request: {0}")]
    BadRequest(String),

    /// Known path, unsupported method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Server-side fault (e.g. unusable key material). Detail is never exposed.
    #[error("internal error")]
    Internal,
}

impl ApiError {
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound(detail.into())
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest(detail.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationMissing | ApiError::AuthenticationInvalid => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::AuthenticationMissing => "unauthorized",
            ApiError::AuthenticationInvalid => "invalid_token",
            ApiError::Forbidden => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Validation(_) => "invalid_record",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::MethodNotAllowed => "method_not_allowed",
            ApiError::Internal => "internal_error",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ApiError::AuthenticationMissing => "Authentication required",
            ApiError::AuthenticationInvalid => "Invalid token",
            ApiError::Forbidden => "Access denied",
            ApiError::NotFound(_) => "Resource not found",
            ApiError::Validation(_) => "Validation failed",
            ApiError::BadRequest(_) => "Bad request",
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::Internal => "Internal server error",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::AuthenticationMissing => "A bearer token is required to access this resource".to_string(),
            ApiError::AuthenticationInvalid => "The access token is invalid or has expired".to_string(),
            ApiError::Forbidden => "Access to this resource is not permitted".to_string(),
            ApiError::NotFound(detail) | ApiError::BadRequest(detail) => detail.clone(),
            ApiError::Validation(messages) => messages.join(", "),
            ApiError::MethodNotAllowed => "The requested method is not supported for this resource".to_string(),
            ApiError::Internal => "An unexpected error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            axum::Json(json!({
                "errors": [{
                    "status": status.as_str(),
                    "code": self.code(),
                    "title": self.title(),
                    "detail": self.detail(),
                }]
            })),
        )
            .into_response()
    }
}

impl From<AuthzError> for ApiError {
    fn from(_: AuthzError) -> Self {
        ApiError::Forbidden
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(messages) => ApiError::Validation(messages),
            DomainError::InvalidId(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<IssueError> for ApiError {
    fn from(err: IssueError) -> Self {
        match err {
            IssueError::InvalidScope(scope) => ApiError::bad_request(format!("malformed scope '{scope}'")),
            IssueError::InvalidTtl => ApiError::bad_request("token lifetime must be positive"),
            IssueError::Key(e) => {
                tracing::error!(error = %e, "token issuance failed: key material unavailable");
                ApiError::Internal
            }
            IssueError::Signing(e) => {
                tracing::error!(error = %e, "token issuance failed: signing error");
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_table() {
        let cases = [
            (ApiError::AuthenticationMissing, 401, "unauthorized"),
            (ApiError::AuthenticationInvalid, 401, "invalid_token"),
            (ApiError::Forbidden, 403, "forbidden"),
            (ApiError::not_found("x"), 404, "not_found"),
            (ApiError::Validation(vec!["x".into()]), 422, "invalid_record"),
            (ApiError::bad_request("x"), 400, "bad_request"),
            (ApiError::MethodNotAllowed, 405, "method_not_allowed"),
            (ApiError::Internal, 500, "internal_error"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status().as_u16(), status);
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn denial_reasons_are_indistinguishable() {
        let a = ApiError::from(AuthzError::TenantMismatch);
        let b = ApiError::from(AuthzError::MissingScope(coupons_auth::COUPON_WRITE));
        assert_eq!(a, b);
        assert_eq!(a.detail(), b.detail());
    }

    #[test]
    fn key_faults_do_not_leak() {
        let err = ApiError::from(IssueError::Key(coupons_auth::KeyError::NotConfigured(
            coupons_auth::KeyRole::Signing,
        )));
        assert_eq!(err, ApiError::Internal);
        assert!(!err.detail().contains("key"));
    }

    #[test]
    fn validation_detail_joins_messages() {
        let err = ApiError::from(DomainError::Validation(vec![
            "title can't be blank".into(),
            "valid_until can't be blank".into(),
        ]));
        assert_eq!(err.detail(), "title can't be blank, valid_until can't be blank");
    }
}
