use coupons_auth::{Principal, ScopeSet};
use coupons_core::StoreId;

/// Identity context for a request (authenticated store + granted scopes).
///
/// Inserted by the auth middleware and dropped with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    principal: Principal,
}

impl IdentityContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn store_id(&self) -> StoreId {
        self.principal.store_id
    }

    pub fn scopes(&self) -> &ScopeSet {
        &self.principal.scopes
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
