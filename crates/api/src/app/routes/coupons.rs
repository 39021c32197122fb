use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{
        Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::Value;

use coupons_auth::{Action, ResourceClass};
use coupons_infra::PageRequest;

use crate::app::dto::{self, CreateCouponRequest};
use crate::app::errors::ApiResult;
use crate::app::services::AppServices;
use crate::authz::authorize_action;
use crate::context::IdentityContext;

pub async fn list_coupons(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(store_id): Path<String>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let store_id = authorize_action(&identity, &store_id, ResourceClass::Coupon, Action::Read)?;
    let Query(page) = query?;

    let page = services.coupons.list(store_id, page);
    Ok(Json(dto::coupon_collection(&page)))
}

pub async fn create_coupon(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(store_id): Path<String>,
    body: Result<Json<CreateCouponRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let store_id = authorize_action(&identity, &store_id, ResourceClass::Coupon, Action::Write)?;
    let Json(body) = body?;

    let coupon = body.into_draft()?.validate()?;
    let coupon = services.coupons.create(store_id, coupon)?;

    tracing::info!(store_id = %store_id, coupon_id = %coupon.id, "coupon created");
    Ok((StatusCode::CREATED, Json(dto::coupon_document(&coupon))))
}
