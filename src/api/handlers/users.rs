use crate::{
    auth::password::hash_password,
    db::find_user_with_timeout,
    types::{AppError, NewUser, PublicUser, Result, UserCreatedResponse},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

const REQUIRED_FIELDS: [&str; 2] = ["userName", "password"];
const STRING_FIELDS: [&str; 3] = ["userName", "password", "fullName"];
const TRIMMED_FIELDS: [&str; 2] = ["userName", "password"];
// (field, min chars, max chars). 72 is the longest password worth hashing.
const SIZED_FIELDS: [(&str, usize, Option<usize>); 2] =
    [("userName", 1, None), ("password", 10, Some(72))];

/// A registration body that passed validation.
#[derive(Debug, PartialEq, Eq)]
pub struct Registration {
    pub user_name: String,
    pub password: String,
    pub full_name: String,
}

/// Checks a raw registration body, reporting the first offending field.
///
/// Checks run in a fixed order: presence, type, surrounding whitespace, size.
pub fn validate_registration(body: &Value) -> Result<Registration> {
    let field = |name: &str| body.as_object().and_then(|obj| obj.get(name));

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|name| field(**name).is_none()) {
        return Err(AppError::validation("Missing field", *missing));
    }

    if let Some(non_string) = STRING_FIELDS
        .iter()
        .find(|name| field(**name).is_some_and(|v| !v.is_string()))
    {
        return Err(AppError::validation(
            "Incorrect field type: expected string",
            *non_string,
        ));
    }

    let text = |name: &str| field(name).and_then(Value::as_str).unwrap_or_default();

    if let Some(padded) = TRIMMED_FIELDS
        .iter()
        .find(|name| text(**name).trim() != text(**name))
    {
        return Err(AppError::validation(
            "Cannot start or end with whitespace",
            *padded,
        ));
    }

    for (name, min, max) in SIZED_FIELDS {
        let len = text(name).chars().count();
        if len < min {
            return Err(AppError::validation(
                format!("Must be at least {} characters long", min),
                name,
            ));
        }
        if let Some(max) = max.filter(|max| len > *max) {
            return Err(AppError::validation(
                format!("Must be at most {} characters long", max),
                name,
            ));
        }
    }

    Ok(Registration {
        user_name: text("userName").to_string(),
        password: text("password").to_string(),
        full_name: text("fullName").trim().to_string(),
    })
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/users",
    responses(
        (status = 201, description = "User created", body = UserCreatedResponse),
        (status = 422, description = "Invalid field or username already taken")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<UserCreatedResponse>)> {
    // A missing or unparseable body is validated like an empty one.
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!("registration body rejected: {}", rejection);
            Value::Null
        }
    };
    let registration = validate_registration(&body)?;

    if find_user_with_timeout(
        state.store.as_ref(),
        &registration.user_name,
        state.config.lookup_timeout(),
    )
    .await?
    .is_some()
    {
        return Err(AppError::validation("Username already taken", "userName"));
    }

    let password = registration.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let user = state
        .store
        .create_user(&NewUser {
            user_name: registration.user_name,
            password_hash,
            full_name: registration.full_name,
        })
        .await?;

    tracing::info!(user_name = %user.user_name, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            code: StatusCode::CREATED.as_u16(),
            reason: "Created".to_string(),
            user: user.api_repr(),
        }),
    ))
}

/// List all users (public fields only)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users in registration order", body = [PublicUser])
    ),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>> {
    let users = state.store.list_users().await?;

    Ok(Json(users.iter().map(|user| user.api_repr()).collect()))
}
