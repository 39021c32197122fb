//! Process configuration, read once from the environment at startup.
//!
//! | Variable | Default |
//! |---|---|
//! | `BIND_ADDR` | `0.0.0.0:8080` |
//! | `JWT_PRIVATE_KEY` / `JWT_PRIVATE_KEY_PATH` | `config/jwt_private_key.pem` |
//! | `JWT_PUBLIC_KEY` / `JWT_PUBLIC_KEY_PATH` | `config/jwt_public_key.pem` |
//! | `JWT_ISSUER`, `JWT_AUDIENCE` | `coupon-api` |
//! | `JWT_KID` | `default-key-id` |
//! | `SEED_DEMO_DATA` | `false` |
//! | `ALLOWED_ORIGINS` | `http://localhost:3001` (comma-separated) |
//!
//! Inline PEM values take precedence over paths and may use literal `\n`
//! escapes for line breaks.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;
use thiserror::Error;

use coupons_auth::{KeyConfig, KeySource, TokenSettings};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "config/jwt_private_key.pem";
pub const DEFAULT_PUBLIC_KEY_PATH: &str = "config/jwt_public_key.pem";
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3001";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub keys: KeyConfig,
    pub token: TokenSettings,
    pub seed_demo_data: bool,
    /// Browser origins granted CORS access to `/api` routes.
    pub allowed_origins: Vec<HeaderValue>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                name: "BIND_ADDR",
                message: e.to_string(),
            })?;

        let key_source = |pem_var: &str, path_var: &str, default_path: &str| match var(pem_var) {
            Some(pem) => KeySource::Pem(pem.replace("\\n", "\n")),
            None => KeySource::File(PathBuf::from(
                var(path_var).unwrap_or_else(|| default_path.to_string()),
            )),
        };
        let keys = KeyConfig {
            private_key: Some(key_source("JWT_PRIVATE_KEY", "JWT_PRIVATE_KEY_PATH", DEFAULT_PRIVATE_KEY_PATH)),
            public_key: Some(key_source("JWT_PUBLIC_KEY", "JWT_PUBLIC_KEY_PATH", DEFAULT_PUBLIC_KEY_PATH)),
        };

        let defaults = TokenSettings::default();
        let token = TokenSettings {
            issuer: var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: var("JWT_AUDIENCE").unwrap_or(defaults.audience),
            key_id: var("JWT_KID").unwrap_or(defaults.key_id),
        };

        let seed_demo_data = match var("SEED_DEMO_DATA").as_deref().map(str::trim) {
            None => false,
            Some(v) if matches!(v, "1" | "true" | "TRUE" | "yes") => true,
            Some(v) if matches!(v, "0" | "false" | "FALSE" | "no") => false,
            Some(v) => {
                return Err(ConfigError::InvalidValue {
                    name: "SEED_DEMO_DATA",
                    message: format!("expected a boolean, got '{v}'"),
                });
            }
        };

        let allowed_origins = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidValue {
                    name: "ALLOWED_ORIGINS",
                    message: format!("'{origin}': {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            bind_addr,
            keys,
            token,
            seed_demo_data,
            allowed_origins,
        })
    }
}
