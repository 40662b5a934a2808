//! Access-token claims: HS256 issue and decode.
//!
//! The payload is a fixed, typed structure. Any missing or wrongly-shaped
//! field fails deserialization and the token is rejected as malformed rather
//! than being treated as an open-ended claim map.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::state::AuthConfig;

/// Claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject -- the user's id.
    pub sub: String,
    /// The user's token epoch at issuance time. Compared for equality against
    /// the live value on every authorization check.
    pub epoch: String,
    /// Whether the user's email address was verified at issuance time.
    pub email_verified: bool,
    /// Role names attached to the user at issuance time.
    pub roles: Vec<String>,
    /// Issued-at (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration (UTC Unix timestamp).
    pub exp: i64,
}

/// Sign an access token for the given user.
///
/// Deterministic for identical inputs apart from the clock. Fails only when
/// the signing key is unusable, which is a configuration error.
pub(crate) fn issue_access_token(
    user_id: &str,
    epoch: &str,
    email_verified: bool,
    roles: Vec<String>,
    config: &AuthConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = i64::try_from(jsonwebtoken::get_current_timestamp()).unwrap_or(i64::MAX);

    let claims = AccessClaims {
        sub: user_id.to_string(),
        epoch: epoch.to_string(),
        email_verified,
        roles,
        iat: now,
        exp: now + config.access_token_ttl_seconds(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.jwt_secret().expose_secret().as_bytes()),
    )
}

/// Validate signature and expiry, returning the embedded [`AccessClaims`].
pub(crate) fn decode_access_token(
    token: &str,
    config: &AuthConfig,
) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret().expose_secret().as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> AuthConfig {
        AuthConfig::new(
            SecretString::from("unit-test-secret"),
            "https://gardi.dev".to_string(),
        )
    }

    #[test]
    fn issue_and_decode_round_trip() {
        let config = config();
        let token = issue_access_token(
            "01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "epoch-1",
            true,
            vec!["admin".to_string(), "user".to_string()],
            &config,
        )
        .expect("issuing should succeed");

        let claims = decode_access_token(&token, &config).expect("decoding should succeed");
        assert_eq!(claims.sub, "01ARZ3NDEKTSV4RRFFQ69G5FAV");
        assert_eq!(claims.epoch, "epoch-1");
        assert!(claims.email_verified);
        assert_eq!(claims.roles, vec!["admin", "user"]);
        assert_eq!(claims.exp - claims.iat, config.access_token_ttl_seconds());
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let token = issue_access_token("user", "e1", false, vec![], &config())
            .expect("issuing should succeed");

        let other = AuthConfig::new(
            SecretString::from("a-different-secret"),
            "https://gardi.dev".to_string(),
        );
        assert!(decode_access_token(&token, &other).is_err());
    }

    #[test]
    fn decode_rejects_expired_token() {
        // TTL far enough in the past to clear the default validation leeway.
        let config = config().with_access_token_ttl_seconds(-3600);
        let token = issue_access_token("user", "e1", true, vec![], &config)
            .expect("issuing should succeed");

        let err = decode_access_token(&token, &config).expect_err("token should be expired");
        assert!(matches!(
            err.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }

    #[test]
    fn decode_rejects_missing_fields() {
        // Sign a payload without the `roles` field using the same key.
        let config = config();
        let now = i64::try_from(jsonwebtoken::get_current_timestamp()).unwrap_or(i64::MAX);
        let payload = serde_json::json!({
            "sub": "user",
            "epoch": "e1",
            "email_verified": true,
            "iat": now,
            "exp": now + 900,
        });
        let token = encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(config.jwt_secret().expose_secret().as_bytes()),
        )
        .expect("signing should succeed");

        assert!(decode_access_token(&token, &config).is_err());
    }
}
