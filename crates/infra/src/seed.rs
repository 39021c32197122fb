//! Demo data for local development.

use chrono::{Days, NaiveDate, Utc};

use coupons_catalog::{CouponDraft, Store};
use coupons_core::DomainResult;

use crate::{CouponRepository, InMemoryStoreDirectory};

const DEMO: &[(&str, &[(&str, i64, i64)])] = &[
    (
        "Sample Store 1",
        &[
            ("10% OFF", 10, 30),
            ("Summer Sale", 20, 60),
            ("Expired Coupon", 15, -30),
            ("New Members Only", 25, 14),
            ("Golden Week Campaign", 30, 60),
        ],
    ),
    (
        "Sample Store 2",
        &[
            ("Winter Campaign", 30, 90),
            ("Early Bird", 5, 7),
            ("Weekday Only", 12, 30),
            ("Last Year's Coupon", 20, -365),
        ],
    ),
    (
        "Test Store",
        &[("First Visit 50% OFF", 50, 180), ("Refer a Friend", 15, 45)],
    ),
];

/// Populate `stores` and `coupons` with a few stores and coupons, some
/// already expired. Returns the created stores.
pub fn seed_demo_data(
    stores: &InMemoryStoreDirectory,
    coupons: &dyn CouponRepository,
) -> DomainResult<Vec<Store>> {
    let today = Utc::now().date_naive();
    let mut created = Vec::new();

    for (name, store_coupons) in DEMO {
        let store = stores.create(name)?;
        for (title, discount, days) in *store_coupons {
            let draft = CouponDraft {
                title: Some((*title).to_string()),
                discount_percentage: Some(*discount),
                valid_until: Some(offset(today, *days).format("%Y-%m-%d").to_string()),
            };
            coupons.create(store.id, draft.validate()?)?;
        }
        tracing::info!(store_id = %store.id, name = %store.name, coupons = store_coupons.len(), "seeded store");
        created.push(store);
    }

    Ok(created)
}

fn offset(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryCouponRepository, PageRequest};

    #[test]
    fn seeds_three_stores_with_their_coupons() {
        let stores = InMemoryStoreDirectory::new();
        let coupons = InMemoryCouponRepository::new();

        let created = seed_demo_data(&stores, &coupons).unwrap();
        assert_eq!(created.len(), 3);

        let counts: Vec<_> = created
            .iter()
            .map(|s| coupons.list(s.id, PageRequest::default()).meta.total_count)
            .collect();
        assert_eq!(counts, [5, 4, 2]);
    }
}
