//! Credential store abstraction
//!
//! The authentication core only needs three operations from persistence:
//! insert a user, look one up by username, and list them. `CredentialStore`
//! captures exactly that so handlers and strategies work against any backend
//! (the libSQL client in production, in-memory SQLite in tests).
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_manager::db::{CredentialStore, TursoClient};
//!
//! let store = TursoClient::new_memory().await?;
//! let user = store.find_by_user_name("exampleUser").await?;
//! ```

use crate::types::{AppError, NewUser, Result, User};
use async_trait::async_trait;
use std::time::Duration;

/// Async access to stored user records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user. A taken username is a validation error on `userName`.
    async fn create_user(&self, user: &NewUser) -> Result<User>;

    /// Get a user by username
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>>;

    /// All users in insertion order
    async fn list_users(&self) -> Result<Vec<User>>;
}

/// Looks up a user, failing with an internal error if the store does not
/// answer within `timeout`.
pub async fn find_user_with_timeout(
    store: &dyn CredentialStore,
    user_name: &str,
    timeout: Duration,
) -> Result<Option<User>> {
    tokio::time::timeout(timeout, store.find_by_user_name(user_name))
        .await
        .map_err(|_| {
            AppError::Database(format!("User lookup timed out after {:?}", timeout))
        })?
}
