//! `coupons-auth` — authentication/authorization boundary.
//!
//! Key management, token issuance/verification and the scope policy. This
//! crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod claims;
pub mod keys;
pub mod principal;
pub mod scope;
pub mod token;

pub use authorize::{Action, AuthzError, ResourceClass, authorize};
pub use claims::{CLOCK_SKEW_SECS, TokenClaims, validate_time_window};
pub use keys::{KeyConfig, KeyError, KeyProvider, KeyRole, KeySource};
pub use principal::Principal;
pub use scope::{COUPON_READ, COUPON_WRITE, DEFAULT_SCOPE, Scope, ScopeSet};
pub use token::{
    DEFAULT_AUDIENCE, DEFAULT_ISSUER, DEFAULT_KEY_ID, DEFAULT_TTL_SECS, IssueError, IssuedToken,
    TokenCodec, TokenSettings, VerifyError,
};
