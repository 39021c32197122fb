use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;

use coupons_catalog::Store;
use coupons_core::{DomainResult, StoreId};

/// Tenant lookup used by authentication and issuance.
///
/// The auth layer only asks whether a store exists; it never manages stores.
pub trait StoreDirectory: Send + Sync {
    fn find(&self, id: StoreId) -> Option<Store>;

    fn exists(&self, id: StoreId) -> bool {
        self.find(id).is_some()
    }
}

impl<S> StoreDirectory for Arc<S>
where
    S: StoreDirectory + ?Sized,
{
    fn find(&self, id: StoreId) -> Option<Store> {
        (**self).find(id)
    }

    fn exists(&self, id: StoreId) -> bool {
        (**self).exists(id)
    }
}

/// In-memory store directory for tests/dev. Ids are assigned sequentially from 1.
#[derive(Debug, Default)]
pub struct InMemoryStoreDirectory {
    inner: RwLock<BTreeMap<StoreId, Store>>,
}

impl InMemoryStoreDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new store and return it.
    pub fn create(&self, name: &str) -> DomainResult<Store> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let next = map.keys().next_back().map_or(1, |id| id.get() + 1);
        let store = Store::new(StoreId::new(next), name, Utc::now())?;
        map.insert(store.id, store.clone());
        tracing::debug!(store_id = %store.id, "store created");
        Ok(store)
    }

    pub fn list(&self) -> Vec<Store> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.values().cloned().collect()
    }
}

impl StoreDirectory for InMemoryStoreDirectory {
    fn find(&self, id: StoreId) -> Option<Store> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&id).cloned()
    }
}
