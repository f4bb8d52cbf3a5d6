use crate::{
    auth::middleware::AuthUser,
    db::find_user_with_timeout,
    types::{AppError, ProtectedDataResponse, Result},
    AppState,
};
use axum::{
    extract::State,
    http::{Method, Uri},
    Json,
};

/// Expense data of the authenticated user
#[utoipa::path(
    get,
    path = "/api/protected",
    responses(
        (status = 200, description = "Stored expense data", body = ProtectedDataResponse),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "User no longer exists")
    ),
    tag = "protected"
)]
pub async fn protected_data(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProtectedDataResponse>> {
    let record = find_user_with_timeout(
        state.store.as_ref(),
        &user.user_name,
        state.config.lookup_timeout(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_name)))?;

    Ok(Json(ProtectedDataResponse {
        data: record.expense_manager_data,
    }))
}

/// Catch-all for unknown paths. Only reads are answered.
pub async fn fallback(method: Method, uri: Uri) -> Result<Json<serde_json::Value>> {
    if method == Method::GET || method == Method::HEAD {
        Ok(Json(serde_json::json!({ "ok": true })))
    } else {
        Err(AppError::NotFound(format!("Cannot {} {}", method, uri.path())))
    }
}
