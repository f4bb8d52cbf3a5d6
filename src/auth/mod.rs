//! Credential verification and token issuance
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id hashing and verification
//! - [`auth::jwt`](crate::auth::jwt) - `TokenIssuer`, mints HS256 tokens
//! - [`auth::strategy`](crate::auth::strategy) - Basic and Bearer strategies, `Authenticator`
//! - [`auth::middleware`](crate::auth::middleware) - Axum layers and the `AuthUser` extractor
//!
//! # Flow
//!
//! Login runs the Basic strategy (username/password against the store) and
//! issues a token. Refresh and protected routes run the Bearer strategy
//! (signature + expiry against the server secret); refresh then issues a new
//! token for the same embedded user.
//!
//! Every authentication failure reaches the client as the same 401 body, so a
//! wrong password cannot be told apart from an unknown username.
//!
//! ## Usage
//!
//! ```ignore
//! use expense_manager::auth::middleware::{require_bearer, AuthUser};
//!
//! let app = Router::new()
//!     .route("/protected", get(handler))
//!     .route_layer(middleware::from_fn_with_state(authenticator, require_bearer));
//!
//! async fn handler(AuthUser(user): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.user_name)
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [auth]
//! jwt_secret_env = "JWT_SECRET"  # Required, the variable must be set
//! token_ttl = "1d"
//! ```

/// Token issuance.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Password hashing.
pub mod password;
/// Basic and Bearer authentication strategies.
pub mod strategy;
