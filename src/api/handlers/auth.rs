use crate::{
    auth::middleware::AuthUser,
    types::{Result, TokenResponse},
    AppState,
};
use axum::{extract::State, Json};

/// Login with HTTP Basic credentials
#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<TokenResponse>> {
    let auth_token = state.token_issuer.issue(&user)?;

    Ok(Json(TokenResponse { auth_token }))
}

/// Exchange a valid bearer token for a fresh one
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Token refreshed", body = TokenResponse),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<TokenResponse>> {
    // The embedded user is reused as-is; the store is not consulted again.
    let auth_token = state.token_issuer.issue(&user)?;

    Ok(Json(TokenResponse { auth_token }))
}
