//! Token Codec: RS256 access-token issuance and verification.
//!
//! Issuance stamps `iat`/`exp`, a random `jti`, and the configured issuer and
//! audience, then signs with the provider's private key. Verification checks
//! the algorithm, signature, issuer and audience via `jsonwebtoken`, and the
//! time window itself (with [`crate::CLOCK_SKEW_SECS`] on both ends) so that the
//! reference clock can be supplied by the caller.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation, errors::ErrorKind};
use serde::de::IgnoredAny;
use thiserror::Error;
use uuid::Uuid;

use coupons_core::StoreId;

use crate::claims::{TokenClaims, validate_time_window};
use crate::keys::{KeyError, KeyProvider};
use crate::scope::check_scope_format;

pub const DEFAULT_ISSUER: &str = "coupon-api";
pub const DEFAULT_AUDIENCE: &str = "coupon-api";
pub const DEFAULT_KEY_ID: &str = "default-key-id";

/// Lifetime of an issued token unless the caller asks otherwise.
pub const DEFAULT_TTL_SECS: i64 = 900;

const ALGORITHM: Algorithm = Algorithm::RS256;

/// Issuer/audience/key-id values stamped into and expected from tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSettings {
    pub issuer: String,
    pub audience: String,
    pub key_id: String,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            key_id: DEFAULT_KEY_ID.to_string(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IssueError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("malformed scope '{0}'")]
    InvalidScope(String),

    #[error("token lifetime must be positive")]
    InvalidTtl,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Why a presented token was rejected.
///
/// Every variant except `Key` is a caller error; all of them surface to the
/// client as the same "invalid token" response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("malformed token")]
    Malformed,

    #[error("signature mismatch")]
    InvalidSignature,

    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("issuer mismatch")]
    IssuerMismatch,

    #[error("audience mismatch")]
    AudienceMismatch,

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

impl IssuedToken {
    pub fn expires_in(&self) -> i64 {
        self.claims.exp - self.claims.iat
    }
}

/// Issues and verifies access tokens with a shared [`KeyProvider`].
#[derive(Debug, Clone)]
pub struct TokenCodec {
    keys: Arc<KeyProvider>,
    settings: TokenSettings,
}

impl TokenCodec {
    pub fn new(keys: Arc<KeyProvider>, settings: TokenSettings) -> Self {
        Self { keys, settings }
    }

    pub fn issue(&self, subject: StoreId, scope: &str, ttl: Duration) -> Result<IssuedToken, IssueError> {
        self.issue_at(subject, scope, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// The subject is not checked for existence here; that is the caller's job.
    pub fn issue_at(
        &self,
        subject: StoreId,
        scope: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, IssueError> {
        check_scope_format(scope).map_err(IssueError::InvalidScope)?;
        let ttl = ttl.num_seconds();
        if ttl <= 0 {
            return Err(IssueError::InvalidTtl);
        }

        let key = self.keys.signing_key()?;

        let iat = now.timestamp();
        let claims = TokenClaims {
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
            sub: subject.to_string(),
            exp: iat + ttl,
            iat,
            jti: Uuid::new_v4().to_string(),
            scope: scope.to_string(),
        };

        let mut header = Header::new(ALGORITHM);
        header.kid = Some(self.settings.key_id.clone());

        let token = jsonwebtoken::encode(&header, &claims, &key)
            .map_err(|e| IssueError::Signing(e.to_string()))?;

        tracing::info!(store_id = %subject, jti = %claims.jti, exp = claims.exp, "issued access token");

        Ok(IssuedToken { token, claims })
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, VerifyError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token against the clock reading `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, VerifyError> {
        let key = self.keys.verification_key()?;

        let data = jsonwebtoken::decode::<TokenClaims>(token, &key, &self.validation())
            .map_err(|e| map_decode_error(token, e))?;

        validate_time_window(&data.claims, now)?;
        Ok(data.claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[self.settings.issuer.as_str()]);
        validation.set_audience(&[self.settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        // Time checks run in `validate_time_window` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation
    }
}

/// Undecodable signature bytes on an otherwise well-formed token are a
/// signature failure, not a malformed token.
fn map_decode_error(token: &str, error: jsonwebtoken::errors::Error) -> VerifyError {
    match error.kind() {
        ErrorKind::Base64(_) | ErrorKind::Crypto(_) if signing_input_is_intact(token) => VerifyError::InvalidSignature,
        _ => map_jwt_error(error),
    }
}

/// Whether header and payload decode when the signature is not looked at.
fn signing_input_is_intact(token: &str) -> bool {
    let mut validation = Validation::new(ALGORITHM);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<IgnoredAny>(token, &DecodingKey::from_secret(&[]), &validation).is_ok()
}

fn map_jwt_error(error: jsonwebtoken::errors::Error) -> VerifyError {
    match error.kind() {
        ErrorKind::InvalidSignature => VerifyError::InvalidSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => VerifyError::UnexpectedAlgorithm,
        ErrorKind::InvalidIssuer => VerifyError::IssuerMismatch,
        ErrorKind::InvalidAudience => VerifyError::AudienceMismatch,
        ErrorKind::ExpiredSignature => VerifyError::Expired,
        ErrorKind::ImmatureSignature => VerifyError::NotYetValid,
        _ => VerifyError::Malformed,
    }
}
