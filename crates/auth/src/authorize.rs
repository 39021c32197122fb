use thiserror::Error;

use coupons_core::StoreId;

use crate::Principal;
use crate::scope::{COUPON_READ, COUPON_WRITE};

/// Resource collections guarded by the policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResourceClass {
    Coupon,
}

/// Operations a caller may request on a resource collection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// List/show.
    Read,
    /// Create.
    Write,
}

impl ResourceClass {
    /// The single scope an action on this resource requires.
    pub const fn required_scope(self, action: Action) -> &'static str {
        match (self, action) {
            (ResourceClass::Coupon, Action::Read) => COUPON_READ,
            (ResourceClass::Coupon, Action::Write) => COUPON_WRITE,
        }
    }
}

/// Internal reason for a denial.
///
/// Both variants are rendered identically to the caller; the distinction is
/// for logs only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("tenant mismatch")]
    TenantMismatch,

    #[error("forbidden: missing scope '{0}'")]
    MissingScope(&'static str),
}

/// Decide whether `principal` may perform `action` on `resource` owned by `owner`.
///
/// - No IO
/// - No panics
/// - Tenant isolation is checked before scopes
pub fn authorize(
    principal: &Principal,
    owner: StoreId,
    resource: ResourceClass,
    action: Action,
) -> Result<(), AuthzError> {
    if principal.store_id != owner {
        return Err(AuthzError::TenantMismatch);
    }

    let required = resource.required_scope(action);
    if principal.has_scope(required) {
        Ok(())
    } else {
        Err(AuthzError::MissingScope(required))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_SCOPE, ScopeSet};

    fn principal(store: i64, scope: &str) -> Principal {
        Principal::new(StoreId::new(store), ScopeSet::from_claim(scope))
    }

    #[test]
    fn read_scope_allows_read_only() {
        let p = principal(1, "coupon:read");
        assert_eq!(authorize(&p, StoreId::new(1), ResourceClass::Coupon, Action::Read), Ok(()));
        assert_eq!(
            authorize(&p, StoreId::new(1), ResourceClass::Coupon, Action::Write),
            Err(AuthzError::MissingScope(COUPON_WRITE))
        );
    }

    #[test]
    fn write_scope_does_not_imply_read() {
        let p = principal(1, "coupon:write");
        assert_eq!(
            authorize(&p, StoreId::new(1), ResourceClass::Coupon, Action::Read),
            Err(AuthzError::MissingScope(COUPON_READ))
        );
        assert_eq!(authorize(&p, StoreId::new(1), ResourceClass::Coupon, Action::Write), Ok(()));
    }

    #[test]
    fn tenant_mismatch_denies_even_with_every_scope() {
        let p = principal(1, DEFAULT_SCOPE);
        for action in [Action::Read, Action::Write] {
            assert_eq!(
                authorize(&p, StoreId::new(2), ResourceClass::Coupon, action),
                Err(AuthzError::TenantMismatch)
            );
        }
    }

    #[test]
    fn tenant_is_checked_before_scope() {
        let p = principal(1, "");
        assert_eq!(
            authorize(&p, StoreId::new(2), ResourceClass::Coupon, Action::Read),
            Err(AuthzError::TenantMismatch)
        );
    }

    #[test]
    fn no_wildcards() {
        let p = principal(1, "* coupon:*");
        assert!(authorize(&p, StoreId::new(1), ResourceClass::Coupon, Action::Read).is_err());
    }
}
