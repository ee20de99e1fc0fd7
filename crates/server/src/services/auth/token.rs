//! Bearer-token issuing and verification.
//!
//! Tokens are HS256 JWTs carrying the user's id and role. Verification
//! yields an [`AuthUser`] that handlers receive explicitly - core
//! operations never read the caller's identity from ambient state, and
//! never trust a client-supplied user id.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use shoprate_core::{Role, UserId};

use super::AuthError;

/// The verified caller identity extracted from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub role: Role,
}

/// JWT claims for an issued token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id.
    sub: i64,
    /// User role at issue time.
    role: Role,
    /// Issued-at, seconds since epoch.
    iat: i64,
    /// Expiry, seconds since epoch.
    exp: i64,
}

/// Signs and verifies bearer tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service from the configured secret and TTL.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_hours: i64) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if encoding fails.
    pub fn sign(&self, user_id: UserId, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.as_i64(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| AuthError::TokenSigning)
    }

    /// Verify a token and extract the caller identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` for expired tokens and
    /// `AuthError::InvalidToken` for anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &self.decoding,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(AuthUser {
            id: UserId::new(data.claims.sub),
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from("k9#mQ2$vX7!pL4@wN8^rT3&yB6*zD1%f"), 24)
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let tokens = service();
        let token = tokens.sign(UserId::new(7), Role::Owner).unwrap();
        let user = tokens.verify(&token).unwrap();
        assert_eq!(user.id, UserId::new(7));
        assert_eq!(user.role, Role::Owner);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let tokens = service();
        assert!(matches!(
            tokens.verify("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = service().sign(UserId::new(1), Role::User).unwrap();
        let other =
            TokenService::new(&SecretString::from("a2!bX9$cY4#dZ7@eW1^fV5&gU8*hT3%j"), 24);
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative TTL backdates the expiry past jsonwebtoken's leeway.
        let tokens = TokenService::new(&SecretString::from("k9#mQ2$vX7!pL4@wN8^rT3&yB6*zD1%f"), -1);
        let token = tokens.sign(UserId::new(1), Role::User).unwrap();
        assert!(matches!(
            service().verify(&token),
            Err(AuthError::TokenExpired)
        ));
    }
}
