//! # Expense Manager Server
//!
//! Backend for an expense manager: user registration and listing, plus
//! JWT-based login and refresh over HTTP.
//!
//! ## Overview
//!
//! - Login takes HTTP Basic credentials, checks them against the stored
//!   Argon2id hash and answers with a signed HS256 token.
//! - Refresh takes a valid bearer token and answers with a new one for the
//!   same user (sliding expiry).
//! - Protected routes accept the bearer token and read the embedded user.
//!
//! Tokens are stateless: there is no revocation list, and the user embedded
//! in a token is trusted until the token expires.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use expense_manager::{api::routes::build_app, db::TursoClient, AppConfig, AppState};
//! use std::sync::Arc;
//!
//! let config = AppConfig::load_or_default("expense.toml")?;
//! let store = Arc::new(TursoClient::new_local(&config.database.url).await?);
//! let state = AppState::new(config.clone(), &config.jwt_secret()?, store)?;
//! let app = build_app(state);
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Password hashing, token issuance, authentication strategies
//! - [`db`] - Credential store (libSQL)
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration

/// HTTP API handlers and routes.
pub mod api;
/// Credential verification and token issuance.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Credential store.
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use db::{CredentialStore, TursoClient};
pub use types::{AppError, Result};
pub use utils::toml_config::{AppConfig, ConfigError};

use crate::auth::jwt::TokenIssuer;
use crate::auth::strategy::{Authenticator, BasicCredentialStrategy, BearerTokenStrategy};
use std::sync::Arc;

/// Application state shared across handlers. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Arc<AppConfig>,
    /// User records
    pub store: Arc<dyn CredentialStore>,
    /// Signs tokens for login and refresh
    pub token_issuer: Arc<TokenIssuer>,
    /// Basic and Bearer strategies, used by the auth middleware
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    /// Wires the issuer and both strategies to the same secret.
    pub fn new(
        config: AppConfig,
        jwt_secret: &str,
        store: Arc<dyn CredentialStore>,
    ) -> std::result::Result<Self, ConfigError> {
        if jwt_secret.is_empty() {
            return Err(ConfigError::MissingEnvVar(config.auth.jwt_secret_env.clone()));
        }

        let ttl_secs = config.token_ttl_secs()?;
        let authenticator = Authenticator::new(
            BasicCredentialStrategy::new(store.clone(), config.lookup_timeout()),
            BearerTokenStrategy::new(jwt_secret),
        );

        Ok(Self {
            config: Arc::new(config),
            store,
            token_issuer: Arc::new(TokenIssuer::new(jwt_secret, ttl_secs)),
            authenticator: Arc::new(authenticator),
        })
    }
}
