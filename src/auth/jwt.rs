use crate::types::{AppError, Claims, PublicUser, Result};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

/// Algorithm used for every token this server signs or accepts.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Mints signed, time-limited tokens for authenticated users.
///
/// Verification is deliberately not part of this type; see
/// [`BearerTokenStrategy`](crate::auth::strategy::BearerTokenStrategy), which
/// must be built from the same secret.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl_secs: i64,
}

impl TokenIssuer {
    /// Creates a new issuer.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for signing JWTs
    /// * `ttl_secs` - Token validity in seconds
    pub fn new(jwt_secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issues a token for `user` expiring `ttl_secs` from now.
    pub fn issue(&self, user: &PublicUser) -> Result<String> {
        self.issue_at(user, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, user: &PublicUser, now: DateTime<Utc>) -> Result<String> {
        let exp = TimeDelta::try_seconds(self.ttl_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::Internal(format!("Token lifetime of {}s overflows", self.ttl_secs))
            })?;

        let claims = Claims {
            user: user.clone(),
            sub: user.user_name.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }
}
