use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;

use coupons_catalog::{Coupon, NewCoupon};
use coupons_core::{CouponId, DomainError, DomainResult, StoreId};

use crate::pagination::{Page, PageRequest};

/// Tenant-isolated coupon persistence.
///
/// Every operation is keyed by the owning store; there is no way to reach
/// another store's coupons through this trait.
pub trait CouponRepository: Send + Sync {
    /// Persist a validated coupon under `store_id`. Titles are unique per store.
    fn create(&self, store_id: StoreId, coupon: NewCoupon) -> DomainResult<Coupon>;

    /// Coupons of `store_id` in creation order, paged.
    fn list(&self, store_id: StoreId, page: PageRequest) -> Page<Coupon>;
}

impl<S> CouponRepository for Arc<S>
where
    S: CouponRepository + ?Sized,
{
    fn create(&self, store_id: StoreId, coupon: NewCoupon) -> DomainResult<Coupon> {
        (**self).create(store_id, coupon)
    }

    fn list(&self, store_id: StoreId, page: PageRequest) -> Page<Coupon> {
        (**self).list(store_id, page)
    }
}

/// In-memory coupon repository for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCouponRepository {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    coupons: BTreeMap<CouponId, Coupon>,
}

impl InMemoryCouponRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CouponRepository for InMemoryCouponRepository {
    fn create(&self, store_id: StoreId, coupon: NewCoupon) -> DomainResult<Coupon> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let taken = inner
            .coupons
            .values()
            .any(|c| c.store_id == store_id && c.title == coupon.title);
        if taken {
            return Err(DomainError::validation("title has already been taken"));
        }

        inner.next_id += 1;
        let id = CouponId::new(inner.next_id);
        let coupon = coupon.into_coupon(id, store_id, Utc::now());
        inner.coupons.insert(id, coupon.clone());

        tracing::debug!(store_id = %store_id, coupon_id = %id, "coupon created");
        Ok(coupon)
    }

    fn list(&self, store_id: StoreId, page: PageRequest) -> Page<Coupon> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let owned = inner
            .coupons
            .values()
            .filter(|c| c.store_id == store_id)
            .cloned()
            .collect();
        page.apply(owned)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn new_coupon(title: &str) -> NewCoupon {
        NewCoupon {
            title: title.to_string(),
            discount_percentage: 10,
            valid_until: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        }
    }

    #[test]
    fn list_is_tenant_scoped() {
        let repo = InMemoryCouponRepository::new();
        let a = StoreId::new(1);
        let b = StoreId::new(2);
        for i in 0..3 {
            repo.create(a, new_coupon(&format!("a-{i}"))).unwrap();
        }
        repo.create(b, new_coupon("b-0")).unwrap();

        let page = repo.list(a, PageRequest::default());
        assert_eq!(page.meta.total_count, 3);
        assert!(page.items.iter().all(|c| c.store_id == a));
    }

    #[test]
    fn title_is_unique_per_store_only() {
        let repo = InMemoryCouponRepository::new();
        repo.create(StoreId::new(1), new_coupon("Sale")).unwrap();

        let err = repo.create(StoreId::new(1), new_coupon("Sale")).unwrap_err();
        assert_eq!(err, DomainError::validation("title has already been taken"));

        assert!(repo.create(StoreId::new(2), new_coupon("Sale")).is_ok());
    }

    #[test]
    fn ids_increase_in_creation_order() {
        let repo = InMemoryCouponRepository::new();
        let first = repo.create(StoreId::new(1), new_coupon("x")).unwrap();
        let second = repo.create(StoreId::new(1), new_coupon("y")).unwrap();
        assert!(first.id < second.id);

        let titles: Vec<_> = repo
            .list(StoreId::new(1), PageRequest::default())
            .items
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, ["x", "y"]);
    }

    #[test]
    fn listing_survives_a_poisoned_lock() {
        let repo = Arc::new(InMemoryCouponRepository::new());
        repo.create(StoreId::new(1), new_coupon("Sale")).unwrap();

        let poisoner = Arc::clone(&repo);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the repository lock");
        })
        .join();
        assert!(repo.inner.is_poisoned());

        assert_eq!(repo.list(StoreId::new(1), PageRequest::default()).meta.total_count, 1);
    }
}
