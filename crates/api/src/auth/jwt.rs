//! JWT validation for identity-provider tokens.
//!
//! The provider signs HS256 tokens with a secret shared with this service.
//! Only the claims needed to identify the caller are read: there is no local
//! user table, so `email` and `name` are taken from the token as-is.

use cpm_core::identity::UserIdentity;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by an identity-provider token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the provider's user id.
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Configuration for token validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
    /// Expected `iss` claim; not checked when `None`.
    pub issuer: Option<String>,
    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway_secs: u64,
}

/// Default clock skew tolerance in seconds.
const DEFAULT_LEEWAY_SECS: u64 = 30;

impl JwtConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var                | Required | Default |
    /// |------------------------|----------|---------|
    /// | `AUTH_JWT_SECRET`      | **yes**  | --      |
    /// | `AUTH_JWT_ISSUER`      | no       | --      |
    /// | `AUTH_JWT_LEEWAY_SECS` | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `AUTH_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_JWT_SECRET")
            .expect("AUTH_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "AUTH_JWT_SECRET must not be empty");

        let issuer = std::env::var("AUTH_JWT_ISSUER")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let leeway_secs: u64 = std::env::var("AUTH_JWT_LEEWAY_SECS")
            .unwrap_or_else(|_| DEFAULT_LEEWAY_SECS.to_string())
            .parse()
            .expect("AUTH_JWT_LEEWAY_SECS must be a valid u64");

        Self {
            secret,
            issuer,
            leeway_secs,
        }
    }
}

/// Validate a token's signature, expiry and (if configured) issuer.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = config.leeway_secs;
    if let Some(issuer) = &config.issuer {
        validation.set_issuer(&[issuer]);
    }

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

/// Issue a token for `user`, valid for `ttl_mins` minutes.
///
/// Production tokens come from the identity provider; this exists for
/// integration tests and local tooling that need to act as a given user.
pub fn generate_token(
    user: &UserIdentity,
    config: &JwtConfig,
    ttl_mins: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user.email.clone(),
        email: Some(user.email.clone()),
        name: Some(user.name.clone()),
        exp: (now + chrono::Duration::minutes(ttl_mins)).timestamp(),
        iat: Some(now.timestamp()),
        iss: config.issuer.clone(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
