use crate::auth::strategy::{Authenticator, Strategy};
use crate::types::{AppError, PublicUser};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

async fn authenticate_request(
    authenticator: &Authenticator,
    strategy: Strategy,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticator
        .authenticate(strategy, req.headers())
        .await?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Requires HTTP Basic credentials matching a stored user.
pub async fn require_basic(
    State(authenticator): State<Arc<Authenticator>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    authenticate_request(&authenticator, Strategy::Basic, req, next).await
}

/// Requires a valid, unexpired bearer token.
pub async fn require_bearer(
    State(authenticator): State<Arc<Authenticator>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    authenticate_request(&authenticator, Strategy::Bearer, req, next).await
}

// Extractor for the user placed in extensions by the middleware above
pub struct AuthUser(pub PublicUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<PublicUser>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}
