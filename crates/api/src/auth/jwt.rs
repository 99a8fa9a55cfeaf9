//! Access-token verification.
//!
//! Tokens are issued by the hosted auth provider, not by this service. They
//! are HS256-signed JWTs sharing a secret with the server; the `sub` claim is
//! the agency user's UUID and scopes every owner-bound query.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use marro_core::types::OwnerId;
use serde::{Deserialize, Serialize};

/// JWT claims the server relies on. Other claims are ignored.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the agency user's id.
    pub sub: OwnerId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: i64,
    /// Intended audience, checked only when [`AuthConfig::audience`] is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Configuration for access-token validation.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret shared with the auth provider.
    pub secret: String,
    /// Required `aud` claim, if any.
    pub audience: Option<String>,
}

impl AuthConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var        | Required | Default |
    /// |----------------|----------|---------|
    /// | `JWT_SECRET`   | **yes**  | --      |
    /// | `JWT_AUDIENCE` | no       | unset   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let audience = std::env::var("JWT_AUDIENCE")
            .ok()
            .filter(|aud| !aud.is_empty());

        Self { secret, audience }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the HS256 signature and expiry, and the audience when configured.
pub fn validate_token(
    token: &str,
    config: &AuthConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    match &config.audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    use super::*;

    fn test_config(audience: Option<&str>) -> AuthConfig {
        AuthConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            audience: audience.map(str::to_string),
        }
    }

    fn mint(config: &AuthConfig, sub: OwnerId, exp_offset: i64, aud: Option<&str>) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub,
            exp: now + exp_offset,
            iat: now,
            aud: aud.map(str::to_string),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn valid_token_yields_owner() {
        let config = test_config(None);
        let owner = Uuid::new_v4();
        let token = mint(&config, owner, 600, None);

        let claims = validate_token(&token, &config).expect("token should validate");
        assert_eq!(claims.sub, owner);
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config(None);
        // Well past the default 60-second leeway.
        let token = mint(&config, Uuid::new_v4(), -300, None);
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn different_secret_fails() {
        let issuer = test_config(None);
        let verifier = AuthConfig {
            secret: "another-secret".to_string(),
            audience: None,
        };
        let token = mint(&issuer, Uuid::new_v4(), 600, None);
        assert!(validate_token(&token, &verifier).is_err());
    }

    #[test]
    fn audience_is_enforced_when_configured() {
        let config = test_config(Some("authenticated"));
        let good = mint(&config, Uuid::new_v4(), 600, Some("authenticated"));
        let bad = mint(&config, Uuid::new_v4(), 600, Some("anon"));

        assert!(validate_token(&good, &config).is_ok());
        assert!(validate_token(&bad, &config).is_err());
    }

    #[test]
    fn audience_is_ignored_when_not_configured() {
        let config = test_config(None);
        let token = mint(&config, Uuid::new_v4(), 600, Some("authenticated"));
        assert!(validate_token(&token, &config).is_ok());
    }

    #[test]
    fn non_uuid_subject_fails() {
        let config = test_config(None);
        let now = chrono::Utc::now().timestamp();
        let token = encode(
            &Header::default(),
            &serde_json::json!({ "sub": "42", "exp": now + 600, "iat": now }),
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();
        assert!(validate_token(&token, &config).is_err());
    }
}
