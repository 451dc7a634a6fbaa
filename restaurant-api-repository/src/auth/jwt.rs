//! # JWT Credentials
//!
//! HS256 JSON Web Token plugin. The signing secret comes from the local
//! secrets file; validation is stateless.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::credentials::{CredentialsPlugin, UserProfile};
use crate::errors::ApiError;

/// Name the JWT plugin registers under.
pub const JWT_PLUGIN_NAME: &str = "jwt";

/// JWT claims carried by restaurant API tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,
}

/// JWT credentials plugin
#[derive(Clone)]
pub struct JwtCredentials {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtCredentials {
    /// Create a plugin signing and verifying with `secret`
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a token for `subject` valid for `ttl`
    pub fn issue(
        &self,
        subject: &str,
        name: Option<&str>,
        ttl: Duration,
    ) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: subject.to_string(),
            name: name.map(str::to_string),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::auth(format!("Could not sign token: {}", e)))
    }

    /// Validate a token and extract its claims
    pub fn verify(&self, token: &str) -> Result<JwtClaims, ApiError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data =
            decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        ApiError::auth("Token expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        ApiError::auth("Invalid token signature")
                    }
                    _ => ApiError::auth("Malformed token"),
                }
            })?;

        Ok(token_data.claims)
    }
}

impl CredentialsPlugin for JwtCredentials {
    fn name(&self) -> &str {
        JWT_PLUGIN_NAME
    }

    fn authenticate(&self, token: &str) -> Result<UserProfile, ApiError> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token);
        let claims = self.verify(token)?;

        Ok(UserProfile {
            id: claims.sub,
            display_name: claims.name,
            provider: JWT_PLUGIN_NAME.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_authenticate() {
        let jwt = JwtCredentials::new("kitchen-secret");
        let token = jwt
            .issue("user-1", Some("Alice"), Duration::minutes(15))
            .unwrap();

        let profile = jwt.authenticate(&format!("Bearer {}", token)).unwrap();
        assert_eq!(profile.id, "user-1");
        assert_eq!(profile.display_name.as_deref(), Some("Alice"));
        assert_eq!(profile.provider, JWT_PLUGIN_NAME);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtCredentials::new("kitchen-secret")
            .issue("user-1", None, Duration::minutes(15))
            .unwrap();

        let result = JwtCredentials::new("other-secret").verify(&token);
        assert_eq!(result, Err(ApiError::auth("Invalid token signature")));
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = JwtCredentials::new("kitchen-secret");
        let token = jwt.issue("user-1", None, Duration::hours(-1)).unwrap();

        assert_eq!(jwt.verify(&token), Err(ApiError::auth("Token expired")));
    }

    #[test]
    fn test_garbage_rejected() {
        let jwt = JwtCredentials::new("kitchen-secret");
        assert_eq!(jwt.verify("not-a-token"), Err(ApiError::auth("Malformed token")));
    }
}
