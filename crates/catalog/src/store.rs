use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coupons_core::{DomainError, DomainResult, StoreId};

/// A store: the tenant that owns coupons and is the subject of access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn new(id: StoreId, name: impl Into<String>, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name can't be blank"));
        }
        Ok(Self {
            id,
            name,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_required() {
        let err = Store::new(StoreId::new(1), "  ", Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::validation("name can't be blank"));
    }
}
