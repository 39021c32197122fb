use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod coupons;
pub mod system;

/// Routes reachable without a token.
pub fn public_router() -> Router {
    Router::new().route("/api/v1/auth/login", post(auth::login))
}

/// Router for all authenticated (store-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/api/v1/whoami", get(system::whoami))
        .route(
            "/api/v1/stores/:store_id/coupons",
            get(coupons::list_coupons).post(coupons::create_coupon),
        )
}
