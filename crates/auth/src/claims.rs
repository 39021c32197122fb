use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use coupons_core::StoreId;

use crate::ScopeSet;
use crate::token::VerifyError;

/// Symmetric tolerance applied to `iat` and `exp`, in seconds.
pub const CLOCK_SKEW_SECS: i64 = 60;

/// Wire claim set of an access token.
///
/// Unknown additional claims are ignored on decode. `scope` may be absent and
/// then reads as empty; every other field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iss: String,
    pub aud: String,
    /// Store id rendered as a decimal string. Decodes from a JSON number too.
    #[serde(deserialize_with = "subject_from_number_or_string")]
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    #[serde(default)]
    pub scope: String,
}

impl TokenClaims {
    /// The subject as a store id, if it is one.
    pub fn store_id(&self) -> Option<StoreId> {
        self.sub.parse().ok()
    }

    pub fn scopes(&self) -> ScopeSet {
        ScopeSet::from_claim(&self.scope)
    }

}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSubject {
    Number(i64),
    Text(String),
}

fn subject_from_number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawSubject::deserialize(deserializer)? {
        RawSubject::Number(n) => n.to_string(),
        RawSubject::Text(s) => s,
    })
}

/// Validate the time window of already signature-checked claims.
///
/// Accepts `now` in `[iat - skew, exp + skew]`.
pub fn validate_time_window(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), VerifyError> {
    if claims.exp <= claims.iat {
        return Err(VerifyError::InvalidTimeWindow);
    }
    let now = now.timestamp();
    if now < claims.iat.saturating_sub(CLOCK_SKEW_SECS) {
        return Err(VerifyError::NotYetValid);
    }
    if now > claims.exp.saturating_add(CLOCK_SKEW_SECS) {
        return Err(VerifyError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn claims(iat: i64, exp: i64) -> TokenClaims {
        TokenClaims {
            iss: "coupon-api".into(),
            aud: "coupon-api".into(),
            sub: "1".into(),
            exp,
            iat,
            jti: "00000000-0000-4000-8000-000000000000".into(),
            scope: String::new(),
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn window_bounds_include_skew() {
        let c = claims(1_000, 1_900);
        assert_eq!(validate_time_window(&c, at(940)), Ok(()));
        assert_eq!(validate_time_window(&c, at(1_960)), Ok(()));
        assert_eq!(validate_time_window(&c, at(939)), Err(VerifyError::NotYetValid));
        assert_eq!(validate_time_window(&c, at(1_961)), Err(VerifyError::Expired));
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert_eq!(
            validate_time_window(&claims(1_000, 1_000), at(1_000)),
            Err(VerifyError::InvalidTimeWindow)
        );
    }

    #[test]
    fn subject_must_be_numeric_to_name_a_store() {
        let mut c = claims(0, 1);
        assert_eq!(c.store_id(), Some(StoreId::new(1)));
        c.sub = "store-1".into();
        assert_eq!(c.store_id(), None);
    }

    #[test]
    fn missing_scope_claim_decodes_as_empty() {
        let json = r#"{"iss":"a","aud":"b","sub":"3","exp":2,"iat":1,"jti":"x","extra":true}"#;
        let c: TokenClaims = serde_json::from_str(json).unwrap();
        assert!(c.scopes().is_empty());
    }

    #[test]
    fn numeric_subject_decodes_as_decimal_string() {
        let json = r#"{"iss":"a","aud":"b","sub":42,"exp":2,"iat":1,"jti":"x"}"#;
        let c: TokenClaims = serde_json::from_str(json).unwrap();
        assert_eq!(c.sub, "42");
        assert_eq!(c.store_id(), Some(StoreId::new(42)));

        let encoded = serde_json::to_value(&c).unwrap();
        assert_eq!(encoded["sub"], "42");
    }
}
