use std::sync::Arc;

use coupons_auth::TokenCodec;
use coupons_core::DomainResult;
use coupons_infra::{
    CouponRepository, InMemoryCouponRepository, InMemoryStoreDirectory, StoreDirectory,
    seed::seed_demo_data,
};

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct AppServices {
    pub codec: Arc<TokenCodec>,
    pub stores: Arc<dyn StoreDirectory>,
    pub coupons: Arc<dyn CouponRepository>,
}

impl AppServices {
    pub fn new(
        codec: Arc<TokenCodec>,
        stores: Arc<dyn StoreDirectory>,
        coupons: Arc<dyn CouponRepository>,
    ) -> Self {
        Self { codec, stores, coupons }
    }

    /// In-memory wiring for dev, optionally pre-populated with demo stores.
    pub fn in_memory(codec: Arc<TokenCodec>, seed: bool) -> DomainResult<Self> {
        let stores = Arc::new(InMemoryStoreDirectory::new());
        let coupons = Arc::new(InMemoryCouponRepository::new());

        if seed {
            let seeded = seed_demo_data(&stores, coupons.as_ref())?;
            tracing::info!(stores = seeded.len(), "seeded demo data");
        }

        Ok(Self::new(codec, stores, coupons))
    }
}
