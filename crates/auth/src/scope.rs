use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Read access to a store's coupons.
pub const COUPON_READ: &str = "coupon:read";

/// Create access to a store's coupons.
pub const COUPON_WRITE: &str = "coupon:write";

/// Scope granted when an issuance request names none.
pub const DEFAULT_SCOPE: &str = "coupon:read coupon:write";

/// A single permission string (e.g. "coupon:read").
///
/// Scopes are opaque at this layer: issuance checks their *format*, never
/// whether the permission exists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(Cow<'static, str>);

impl Scope {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// RFC 6749 scope-token: one or more of %x21 / %x23-5B / %x5D-7E.
    pub fn is_well_formed(token: &str) -> bool {
        !token.is_empty()
            && token
                .bytes()
                .all(|b| matches!(b, 0x21 | 0x23..=0x5B | 0x5D..=0x7E))
    }
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unordered set of scopes carried by a token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSet(BTreeSet<Scope>);

impl ScopeSet {
    /// Split a space-delimited `scope` claim. Blank input yields the empty set.
    pub fn from_claim(claim: &str) -> Self {
        Self(
            claim
                .split_whitespace()
                .map(|s| Scope::new(s.to_owned()))
                .collect(),
        )
    }

    /// Exact-string membership; no wildcards, no hierarchy.
    pub fn contains(&self, scope: &str) -> bool {
        self.0.iter().any(|s| s.as_str() == scope)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Scope> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Validate a requested scope string for issuance.
///
/// Returns the offending token on failure.
pub fn check_scope_format(scope: &str) -> Result<(), String> {
    match scope.split_whitespace().find(|t| !Scope::is_well_formed(t)) {
        Some(bad) => Err(bad.to_owned()),
        None => Ok(()),
    }
}
