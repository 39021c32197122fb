use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use coupons_core::{CouponId, DomainError, DomainResult, StoreId};

/// Accepted discount, in percent.
pub const DISCOUNT_RANGE: RangeInclusive<i64> = 1..=100;

/// A persisted coupon belonging to exactly one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub store_id: StoreId,
    pub title: String,
    pub discount_percentage: i64,
    pub valid_until: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated coupon attributes as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CouponDraft {
    pub title: Option<String>,
    pub discount_percentage: Option<i64>,
    pub valid_until: Option<String>,
}

/// Coupon attributes that passed field validation.
///
/// Per-store title uniqueness needs the store's existing coupons and is
/// enforced by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoupon {
    pub title: String,
    pub discount_percentage: i64,
    pub valid_until: NaiveDate,
}

impl CouponDraft {
    /// Validate every field, reporting all failures at once.
    ///
    /// `valid_until` may lie in the past.
    pub fn validate(self) -> DomainResult<NewCoupon> {
        let mut errors = Vec::new();

        let title = match self.title.map(|t| t.trim().to_string()) {
            Some(t) if !t.is_empty() => Some(t),
            _ => {
                errors.push("title can't be blank".to_string());
                None
            }
        };

        let discount_percentage = match self.discount_percentage {
            None => {
                errors.push("discount_percentage can't be blank".to_string());
                None
            }
            Some(d) if !DISCOUNT_RANGE.contains(&d) => {
                errors.push(format!(
                    "discount_percentage must be between {} and {}",
                    DISCOUNT_RANGE.start(),
                    DISCOUNT_RANGE.end()
                ));
                None
            }
            Some(d) => Some(d),
        };

        let valid_until = match self.valid_until.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push("valid_until can't be blank".to_string());
                None
            }
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push("valid_until must be a date (YYYY-MM-DD)".to_string());
                    None
                }
            },
        };

        match (title, discount_percentage, valid_until) {
            (Some(title), Some(discount_percentage), Some(valid_until)) if errors.is_empty() => Ok(NewCoupon {
                title,
                discount_percentage,
                valid_until,
            }),
            _ => Err(DomainError::Validation(errors)),
        }
    }
}

impl NewCoupon {
    pub fn into_coupon(self, id: CouponId, store_id: StoreId, now: DateTime<Utc>) -> Coupon {
        Coupon {
            id,
            store_id,
            title: self.title,
            discount_percentage: self.discount_percentage,
            valid_until: self.valid_until,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: Option<&str>, discount: Option<i64>, valid_until: Option<&str>) -> CouponDraft {
        CouponDraft {
            title: title.map(str::to_string),
            discount_percentage: discount,
            valid_until: valid_until.map(str::to_string),
        }
    }

    #[test]
    fn valid_draft_passes() {
        let c = draft(Some("Spring sale"), Some(20), Some("2030-04-01")).validate().unwrap();
        assert_eq!(c.title, "Spring sale");
        assert_eq!(c.discount_percentage, 20);
        assert_eq!(c.valid_until, NaiveDate::from_ymd_opt(2030, 4, 1).unwrap());
    }

    #[test]
    fn past_expiry_is_allowed() {
        assert!(draft(Some("Old"), Some(5), Some("2001-01-01")).validate().is_ok());
    }

    #[test]
    fn discount_bounds_are_inclusive() {
        assert!(draft(Some("a"), Some(1), Some("2030-01-01")).validate().is_ok());
        assert!(draft(Some("a"), Some(100), Some("2030-01-01")).validate().is_ok());
        assert!(draft(Some("a"), Some(0), Some("2030-01-01")).validate().is_err());
        assert!(draft(Some("a"), Some(101), Some("2030-01-01")).validate().is_err());
    }

    #[test]
    fn reports_every_failing_field() {
        let err = draft(Some(""), Some(150), None).validate().unwrap_err();
        assert_eq!(
            err.messages(),
            [
                "title can't be blank".to_string(),
                "discount_percentage must be between 1 and 100".to_string(),
                "valid_until can't be blank".to_string(),
            ]
        );
    }

    #[test]
    fn unparseable_date_is_a_validation_error() {
        let err = draft(Some("a"), Some(10), Some("next week")).validate().unwrap_err();
        assert_eq!(err.messages(), ["valid_until must be a date (YYYY-MM-DD)".to_string()]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any in-range discount with a title and date validates.
            #[test]
            fn in_range_discounts_validate(
                title in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                discount in 1i64..=100,
            ) {
                let result = draft(Some(&title), Some(discount), Some("2030-12-31")).validate();
                prop_assert!(result.is_ok());
            }

            /// Property: out-of-range discounts never validate.
            #[test]
            fn out_of_range_discounts_fail(discount in prop_oneof![i64::MIN..1i64, 101i64..i64::MAX]) {
                let result = draft(Some("t"), Some(discount), Some("2030-12-31")).validate();
                prop_assert!(result.is_err());
            }
        }
    }
}
