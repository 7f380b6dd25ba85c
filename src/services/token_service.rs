use std::fmt;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::errors::AuthError;
use crate::types::enums::UserTipo;
use crate::types::internal::Claims;

/// Manages session token generation and validation
pub struct TokenService {
    jwt_secret: String,
    expiration_hours: i64,
}

impl TokenService {
    /// Fixed session window, matching the deployed configuration
    pub const DEFAULT_EXPIRATION_HOURS: i64 = 2;

    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            expiration_hours: Self::DEFAULT_EXPIRATION_HOURS,
        }
    }

    /// Issue a signed session token carrying the user id and role
    pub fn generate(&self, user_id: &str, tipo: UserTipo) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            tipo,
            exp: now + self.expiration_hours * 3600,
            iat: now,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::internal_error(format!("Failed to generate token: {e}")))
    }

    /// Validate a session token, distinguishing expiry from tampering
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::expired_token(),
            _ => AuthError::invalid_token(),
        })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}
