//! API-side authorization guard.
//!
//! Called by handlers before the action executes (and before the request body
//! is interpreted). Denials collapse to a single `Forbidden`.

use coupons_auth::{Action, ResourceClass, authorize};
use coupons_core::StoreId;

use crate::app::errors::ApiError;
use crate::context::IdentityContext;

/// Check that the caller may perform `action` on `resource` owned by the store
/// named in the request path.
///
/// `path_store` is the raw path segment; one that is not a store id can never
/// match the caller and is denied the same way.
pub fn authorize_action(
    identity: &IdentityContext,
    path_store: &str,
    resource: ResourceClass,
    action: Action,
) -> Result<StoreId, ApiError> {
    let Ok(owner) = path_store.parse::<StoreId>() else {
        tracing::debug!(store_id = %identity.store_id(), path_store, "authorization denied: unparseable owner");
        return Err(ApiError::Forbidden);
    };

    authorize(identity.principal(), owner, resource, action).map_err(|reason| {
        tracing::debug!(store_id = %identity.store_id(), owner = %owner, ?action, %reason, "authorization denied");
        ApiError::from(reason)
    })?;

    Ok(owner)
}
