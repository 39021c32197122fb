use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use coupons_catalog::{Coupon, CouponDraft};
use coupons_core::StoreId;
use coupons_infra::Page;

use crate::app::errors::ApiError;

// -------------------------
// Request DTOs
// -------------------------

/// `POST /api/v1/auth/login` body: `{ "auth": { "store_uid": 1, "scope": "..." } }`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub auth: Option<LoginParams>,
}

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub store_uid: Option<StoreUid>,
    pub scope: Option<String>,
}

/// Store identifier as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoreUid {
    Number(i64),
    Text(String),
}

impl StoreUid {
    /// The store id, if the value names one. Non-numeric text names no store.
    pub fn store_id(&self) -> Option<StoreId> {
        match self {
            StoreUid::Number(n) => Some(StoreId::new(*n)),
            StoreUid::Text(s) => s.parse().ok(),
        }
    }
}

/// JSON:API create document: `{ "data": { "attributes": { ... } } }`.
#[derive(Debug, Deserialize)]
pub struct CreateCouponRequest {
    pub data: Option<CouponData>,
}

#[derive(Debug, Deserialize)]
pub struct CouponData {
    pub attributes: Option<CouponDraft>,
}

impl CreateCouponRequest {
    pub fn into_draft(self) -> Result<CouponDraft, ApiError> {
        let data = self.data.ok_or_else(|| missing_param("data"))?;
        data.attributes.ok_or_else(|| missing_param("attributes"))
    }
}

pub fn missing_param(name: &str) -> ApiError {
    ApiError::bad_request(format!("param is missing or the value is empty: {name}"))
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub scope: String,
}

pub fn coupon_resource(coupon: &Coupon) -> Value {
    json!({
        "id": coupon.id.to_string(),
        "type": "coupon",
        "attributes": {
            "title": coupon.title,
            "discount_percentage": coupon.discount_percentage,
            "valid_until": coupon.valid_until.format("%Y-%m-%d").to_string(),
            "created_at": coupon.created_at.to_rfc3339(),
            "updated_at": coupon.updated_at.to_rfc3339(),
        },
        "relationships": {
            "store": {
                "data": { "id": coupon.store_id.to_string(), "type": "store" }
            }
        }
    })
}

pub fn coupon_document(coupon: &Coupon) -> Value {
    json!({ "data": coupon_resource(coupon) })
}

pub fn coupon_collection(page: &Page<Coupon>) -> Value {
    json!({
        "data": page.items.iter().map(coupon_resource).collect::<Vec<_>>(),
        "meta": page.meta,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use coupons_core::CouponId;

    use super::*;

    #[test]
    fn store_uid_accepts_numbers_and_numeric_strings() {
        let n: StoreUid = serde_json::from_str("12").unwrap();
        let s: StoreUid = serde_json::from_str("\"12\"").unwrap();
        let bad: StoreUid = serde_json::from_str("\"twelve\"").unwrap();
        assert_eq!(n.store_id(), Some(StoreId::new(12)));
        assert_eq!(s.store_id(), Some(StoreId::new(12)));
        assert_eq!(bad.store_id(), None);
    }

    #[test]
    fn create_request_requires_data_and_attributes() {
        let req: CreateCouponRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.into_draft().unwrap_err(), missing_param("data"));

        let req: CreateCouponRequest = serde_json::from_str(r#"{"data":{}}"#).unwrap();
        assert_eq!(req.into_draft().unwrap_err(), missing_param("attributes"));
    }

    #[test]
    fn coupon_resource_shape() {
        let now = Utc::now();
        let coupon = Coupon {
            id: CouponId::new(3),
            store_id: StoreId::new(1),
            title: "Sale".into(),
            discount_percentage: 20,
            valid_until: NaiveDate::from_ymd_opt(2030, 5, 1).unwrap(),
            created_at: now,
            updated_at: now,
        };
        let v = coupon_resource(&coupon);
        assert_eq!(v["id"], "3");
        assert_eq!(v["type"], "coupon");
        assert_eq!(v["attributes"]["discount_percentage"], 20);
        assert_eq!(v["attributes"]["valid_until"], "2030-05-01");
        assert_eq!(v["relationships"]["store"]["data"]["id"], "1");
    }
}
