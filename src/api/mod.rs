//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer, built on the Axum web framework.
//!
//! # API Endpoints
//!
//! ## Authentication (`/api/auth`)
//! - `POST /api/auth/login` - HTTP Basic credentials in, `{authToken}` out
//! - `POST /api/auth/refresh` - Bearer token in, fresh `{authToken}` out
//!
//! ## Users (`/api/users`)
//! - `POST /api/users` - Register a user
//! - `GET /api/users` - List users (`userName`, `fullName`)
//!
//! ## Protected (`/api/protected`)
//! - `GET /api/protected` - Expense data of the token's user
//!
//! ## Documentation
//! - `GET /api/openapi.json` - OpenAPI document
//!
//! Any other path answers `{"ok": true}`.

use crate::types::{ProtectedDataResponse, PublicUser, TokenResponse, UserCreatedResponse};
use utoipa::OpenApi;

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::refresh_token,
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::protected::protected_data,
    ),
    components(schemas(TokenResponse, PublicUser, UserCreatedResponse, ProtectedDataResponse)),
    tags(
        (name = "auth", description = "Login and token refresh"),
        (name = "users", description = "Registration and listing"),
        (name = "protected", description = "Bearer-protected data")
    )
)]
pub struct ApiDoc;
