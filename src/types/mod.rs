use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= User Types =============

/// Stored user record, including the password hash.
#[derive(Debug, Clone)]
pub struct User {
    pub user_name: String,
    pub password_hash: String,
    pub full_name: String,
    pub expense_manager_data: Option<serde_json::Value>,
    pub created_at: i64,
}

impl User {
    /// Public representation, safe to return to clients and embed in tokens.
    pub fn api_repr(&self) -> PublicUser {
        PublicUser {
            user_name: self.user_name.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub user_name: String,
    #[serde(default)]
    pub full_name: String,
}

/// Fields required to insert a user into the credential store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub password_hash: String,
    pub full_name: String,
}

// ============= API Request/Response Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub auth_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserCreatedResponse {
    pub code: u16,
    pub reason: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProtectedDataResponse {
    pub data: Option<serde_json::Value>,
}

// ============= Authentication Types =============

/// JWT payload. `sub` always equals `user.user_name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: PublicUser,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error on {location}: {message}")]
    Validation { message: String, location: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>, location: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            location: location.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, body) = match self {
            AppError::Validation { message, location } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({
                    "code": 422,
                    "reason": "ValidationError",
                    "message": message,
                    "location": location,
                }),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({
                    "code": 401,
                    "reason": "AuthenticationError",
                    "message": "Unauthorized",
                }),
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({
                    "code": 404,
                    "reason": "NotFoundError",
                    "message": msg,
                }),
            ),
            AppError::Database(msg) | AppError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({
                        "code": 500,
                        "reason": "InternalError",
                        "message": "Internal server error",
                    }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("should read body");
        (status, serde_json::from_slice(&bytes).expect("body is json"))
    }

    #[tokio::test]
    async fn test_validation_error_body() {
        let (status, body) = body_json(AppError::validation("Missing field", "userName")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["reason"], "ValidationError");
        assert_eq!(body["message"], "Missing field");
        assert_eq!(body["location"], "userName");
    }

    #[tokio::test]
    async fn test_internal_errors_hide_detail() {
        let (status, body) =
            body_json(AppError::Database("connection refused on /tmp/x.db".into())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
        assert!(!body.to_string().contains("connection refused"));
    }

    #[test]
    fn test_api_repr_excludes_hash() {
        let user = User {
            user_name: "exampleUser".into(),
            password_hash: "$argon2id$secret".into(),
            full_name: "Example".into(),
            expense_manager_data: None,
            created_at: 0,
        };

        let json = serde_json::to_value(user.api_repr()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"userName": "exampleUser", "fullName": "Example"})
        );
    }
}
