use std::fmt;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use handsup_core::domain::{Account, AccountId, Role, VolunteerId};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: AccountId,
    /// Volunteer profile owned by the account.
    pub vid: VolunteerId,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid(err.to_string()),
        }
    }
}

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

/// HS256 signing material built once from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, account: &Account) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let ttl = TimeDelta::from_std(self.ttl)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        let claims = Claims {
            sub: account.id,
            vid: account.volunteer_id,
            role: account.role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok(IssuedToken {
            token,
            expires_in: self.ttl.as_secs(),
        })
    }

    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        Ok(decode::<Claims>(token, &self.decoding, &self.validation)?.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "a-test-secret-that-is-long-enough!!";

    fn keys(secret: &str) -> JwtKeys {
        JwtKeys::new(secret, Duration::from_secs(600))
    }

    fn account(role: Role) -> Account {
        Account {
            id: AccountId(7),
            email: "ada@example.org".into(),
            password_hash: String::new(),
            role,
            volunteer_id: VolunteerId(3),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let keys = keys(SECRET);
        let issued = keys.issue(&account(Role::Admin)).unwrap();
        assert_eq!(issued.expires_in, 600);

        let claims = keys.validate(&issued.token).unwrap();
        assert_eq!(claims.sub, AccountId(7));
        assert_eq!(claims.vid, VolunteerId(3));
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 600);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let ours = keys(SECRET);
        let theirs = keys("some-other-secret-of-similar-size!!");
        let issued = theirs.issue(&account(Role::Volunteer)).unwrap();

        assert!(matches!(
            ours.validate(&issued.token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let keys = keys(SECRET);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: AccountId(1),
            vid: VolunteerId(1),
            role: Role::Volunteer,
            iat: now - 7200,
            exp: now - 3600,
            jti: "old".into(),
        };
        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &claims, &keys.encoding).unwrap();

        assert!(matches!(keys.validate(&token), Err(TokenError::Expired)));
    }
}
