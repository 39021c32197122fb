//! Key Provider: RSA key material for signing and verification.
//!
//! Keys are sourced once per process (inline PEM or a file path) and cached
//! behind a `OnceLock`, so concurrent first access performs exactly one load.
//! The provider is constructed explicitly at startup and shared by handle.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use jsonwebtoken::{DecodingKey, EncodingKey};
use thiserror::Error;

/// Which half of the key pair an operation needs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyRole {
    Signing,
    Verification,
}

impl core::fmt::Display for KeyRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            KeyRole::Signing => f.write_str("signing"),
            KeyRole::Verification => f.write_str("verification"),
        }
    }
}

/// Where a PEM-encoded key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    /// PEM text supplied directly (e.g. from an environment variable).
    Pem(String),
    /// Path to a PEM file read on first use.
    File(PathBuf),
}

// Inline PEM text never reaches logs.
impl core::fmt::Debug for KeySource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            KeySource::Pem(_) => f.write_str("Pem(<redacted>)"),
            KeySource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Key material configuration. Either half may be absent: a verify-only
/// deployment carries no private key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyConfig {
    pub private_key: Option<KeySource>,
    pub public_key: Option<KeySource>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("{0} key is not configured")]
    NotConfigured(KeyRole),

    #[error("failed to read {role} key from {path}: {reason}")]
    Unreadable {
        role: KeyRole,
        path: String,
        reason: String,
    },

    #[error("invalid {role} key: {reason}")]
    Invalid { role: KeyRole, reason: String },
}

/// Lazily-loaded, process-lifetime key pair.
///
/// A failed load is cached too: key material is startup configuration, and a
/// broken configuration stays broken until the process restarts.
pub struct KeyProvider {
    config: KeyConfig,
    signing: OnceLock<Result<Arc<EncodingKey>, KeyError>>,
    verification: OnceLock<Result<Arc<DecodingKey>, KeyError>>,
}

impl KeyProvider {
    pub fn new(config: KeyConfig) -> Self {
        Self {
            config,
            signing: OnceLock::new(),
            verification: OnceLock::new(),
        }
    }

    /// Private key used to sign issued tokens.
    pub fn signing_key(&self) -> Result<Arc<EncodingKey>, KeyError> {
        self.signing
            .get_or_init(|| {
                let pem = load_pem(KeyRole::Signing, self.config.private_key.as_ref())?;
                let key = EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| KeyError::Invalid {
                    role: KeyRole::Signing,
                    reason: e.to_string(),
                })?;
                tracing::debug!("loaded signing key");
                Ok(Arc::new(key))
            })
            .clone()
    }

    /// Public key used to verify presented tokens.
    pub fn verification_key(&self) -> Result<Arc<DecodingKey>, KeyError> {
        self.verification
            .get_or_init(|| {
                let pem = load_pem(KeyRole::Verification, self.config.public_key.as_ref())?;
                let key = DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| KeyError::Invalid {
                    role: KeyRole::Verification,
                    reason: e.to_string(),
                })?;
                tracing::debug!("loaded verification key");
                Ok(Arc::new(key))
            })
            .clone()
    }

    /// Force both halves to load now, surfacing configuration faults at startup.
    pub fn preload(&self) -> Result<(), KeyError> {
        self.signing_key()?;
        self.verification_key()?;
        Ok(())
    }
}

impl core::fmt::Debug for KeyProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyProvider")
            .field("config", &self.config)
            .field("signing_loaded", &self.signing.get().is_some())
            .field("verification_loaded", &self.verification.get().is_some())
            .finish()
    }
}

fn load_pem(role: KeyRole, source: Option<&KeySource>) -> Result<String, KeyError> {
    match source {
        None => Err(KeyError::NotConfigured(role)),
        Some(KeySource::Pem(pem)) if pem.trim().is_empty() => Err(KeyError::NotConfigured(role)),
        Some(KeySource::Pem(pem)) => Ok(pem.clone()),
        Some(KeySource::File(path)) => {
            std::fs::read_to_string(path).map_err(|e| KeyError::Unreadable {
                role,
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod test_keys {
    pub const PRIVATE_PEM: &str = include_str!("../../../testdata/jwt_private_key.pem");
    pub const PUBLIC_PEM: &str = include_str!("../../../testdata/jwt_public_key.pem");
    pub const OTHER_PRIVATE_PEM: &str = include_str!("../../../testdata/other_private_key.pem");

    use super::{KeyConfig, KeyProvider, KeySource};

    pub fn provider() -> KeyProvider {
        KeyProvider::new(KeyConfig {
            private_key: Some(KeySource::Pem(PRIVATE_PEM.to_string())),
            public_key: Some(KeySource::Pem(PUBLIC_PEM.to_string())),
        })
    }
}
