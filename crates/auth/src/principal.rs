use coupons_core::StoreId;

use crate::{ScopeSet, TokenClaims};

/// Identity established by a verified token: the acting store and the scopes
/// it was granted.
///
/// Built once per request after authentication and never shared across
/// requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub store_id: StoreId,
    pub scopes: ScopeSet,
}

impl Principal {
    pub fn new(store_id: StoreId, scopes: ScopeSet) -> Self {
        Self { store_id, scopes }
    }

    /// Principal for verified claims whose subject resolved to `store_id`.
    pub fn from_claims(store_id: StoreId, claims: &TokenClaims) -> Self {
        Self::new(store_id, claims.scopes())
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }
}
