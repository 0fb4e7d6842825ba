//! JWT access-token issuance and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User document id (hex string).
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Manages JWT creation and validation.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
}

impl JwtManager {
    pub fn new(secret: &[u8], expire_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_seconds: Duration::days(expire_days).num_seconds(),
        }
    }

    /// Issue an access token for the given user; returns the token and its
    /// expiry as a unix timestamp.
    pub fn issue(&self, user_id: &str, username: &str) -> Result<(String, i64), Error> {
        let now = Utc::now().timestamp();
        let exp = now + self.ttl_seconds;
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: now,
            exp,
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok((token, exp))
    }

    /// Validate a token and return its claims. Any decode failure (bad
    /// signature, expired, malformed) surfaces as an authentication error.
    pub fn validate(&self, token: &str) -> Result<Claims, Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| Error::Auth("could not validate credentials".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_jwt() -> JwtManager {
        JwtManager::new(b"test-secret-key-for-testing", 7)
    }

    #[test]
    fn issue_and_validate() {
        let jwt = test_jwt();
        let (token, exp) = jwt.issue("66fe9e7fbd12f8f9c9f3e3d2", "alice").unwrap();
        let claims = jwt.validate(&token).unwrap();
        assert_eq!(claims.sub, "66fe9e7fbd12f8f9c9f3e3d2");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp, exp);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_token_rejected() {
        let jwt = test_jwt();
        let (token, _) = jwt.issue("user-1", "alice").unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(matches!(jwt.validate(&tampered), Err(Error::Auth(_))));
    }

    #[test]
    fn wrong_secret_rejected() {
        let (token, _) = test_jwt().issue("user-1", "alice").unwrap();
        let other = JwtManager::new(b"a-different-secret", 7);
        assert!(matches!(other.validate(&token), Err(Error::Auth(_))));
    }
}
