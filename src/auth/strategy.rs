use crate::auth::jwt::TOKEN_ALGORITHM;
use crate::auth::password::{dummy_verify, verify_password};
use crate::db::{find_user_with_timeout, CredentialStore};
use crate::types::{AppError, Claims, PublicUser};
use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use std::sync::Arc;
use std::time::Duration;

/// Why a request failed to authenticate.
///
/// Only logged; every variant except `Internal` reaches the client as the
/// same 401 body.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no credentials for the expected scheme")]
    MissingCredentials,

    #[error("malformed authorization header")]
    MalformedHeader,

    #[error("unknown user")]
    UnknownUser,

    #[error("password mismatch")]
    PasswordMismatch,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    TokenExpired,

    #[error("token subject is empty or does not match its user")]
    MalformedSubject,

    #[error(transparent)]
    Internal(AppError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(inner) => inner,
            other => {
                tracing::debug!(reason = %other, "authentication rejected");
                AppError::Unauthorized
            }
        }
    }
}

/// The authentication schemes a route can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `Authorization: Basic base64(user:password)` checked against the store.
    Basic,
    /// `Authorization: Bearer <jwt>` checked against the signing secret.
    Bearer,
}

/// Returns the credentials part of the `Authorization` header if it uses
/// `scheme` (case-insensitive).
fn authorization_credentials<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let (given, credentials) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedHeader)?;

    if !given.eq_ignore_ascii_case(scheme) {
        return Err(AuthError::MissingCredentials);
    }

    Ok(credentials.trim())
}

/// Decodes `user:password` from a Basic header.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), AuthError> {
    let encoded = authorization_credentials(headers, "Basic")?;
    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| AuthError::MalformedHeader)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedHeader)?;

    let (user_name, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MalformedHeader)?;

    Ok((user_name.to_string(), password.to_string()))
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let token = authorization_credentials(headers, "Bearer")?;
    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(token)
}

/// Username/password verification against the credential store.
pub struct BasicCredentialStrategy {
    store: Arc<dyn CredentialStore>,
    lookup_timeout: Duration,
}

impl BasicCredentialStrategy {
    pub fn new(store: Arc<dyn CredentialStore>, lookup_timeout: Duration) -> Self {
        Self {
            store,
            lookup_timeout,
        }
    }

    pub async fn verify(&self, user_name: &str, password: &str) -> Result<PublicUser, AuthError> {
        let user = find_user_with_timeout(self.store.as_ref(), user_name, self.lookup_timeout)
            .await
            .map_err(AuthError::Internal)?;

        let password = password.to_owned();
        let Some(user) = user else {
            tokio::task::spawn_blocking(move || dummy_verify(&password))
                .await
                .map_err(|e| AuthError::Internal(AppError::Internal(e.to_string())))?;
            return Err(AuthError::UnknownUser);
        };

        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(AppError::Internal(e.to_string())))?
            .map_err(AuthError::Internal)?;

        if matches {
            Ok(user.api_repr())
        } else {
            Err(AuthError::PasswordMismatch)
        }
    }
}

/// Signature and expiry verification of previously issued tokens.
///
/// The embedded user is trusted as-is for the token's lifetime; the store is
/// not consulted.
pub struct BearerTokenStrategy {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl BearerTokenStrategy {
    pub fn new(jwt_secret: &str) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Expiry is checked in `verify_at` so the clock can be injected.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<PublicUser, AuthError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<PublicUser, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(AuthError::TokenExpired);
        }

        if claims.sub.trim().is_empty() || claims.sub != claims.user.user_name {
            return Err(AuthError::MalformedSubject);
        }

        Ok(claims.user)
    }
}

/// Runs whichever [`Strategy`] a route asks for.
pub struct Authenticator {
    basic: BasicCredentialStrategy,
    bearer: BearerTokenStrategy,
}

impl Authenticator {
    pub fn new(basic: BasicCredentialStrategy, bearer: BearerTokenStrategy) -> Self {
        Self { basic, bearer }
    }

    pub fn basic(&self) -> &BasicCredentialStrategy {
        &self.basic
    }

    pub fn bearer(&self) -> &BearerTokenStrategy {
        &self.bearer
    }

    pub async fn authenticate(
        &self,
        strategy: Strategy,
        headers: &HeaderMap,
    ) -> Result<PublicUser, AuthError> {
        match strategy {
            Strategy::Basic => {
                let (user_name, password) = basic_credentials(headers)?;
                self.basic.verify(&user_name, &password).await
            }
            Strategy::Bearer => self.bearer.verify(bearer_token(headers)?),
        }
    }
}
