//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: collaborators shared by handlers (codec, store directory, coupons)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON:API mapping helpers
//! - `errors.rs`: error taxonomy and the uniform error response

use std::sync::Arc;

use axum::{Extension, Router, http::HeaderValue, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// CORS applies to the `/api` routes only.
pub fn build_app(services: Arc<AppServices>, allowed_origins: &[HeaderValue]) -> Router {
    let auth_state = middleware::AuthState {
        codec: Arc::clone(&services.codec),
        stores: Arc::clone(&services.stores),
    };

    // Protected routes: require a verified token for a known store.
    let protected = routes::router().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    let api = routes::public_router()
        .merge(protected)
        .layer(middleware::cors_layer(allowed_origins));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(api)
        .fallback(routes::system::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::map_response(middleware::uniform_method_not_allowed))
                .layer(Extension(services)),
        )
}
