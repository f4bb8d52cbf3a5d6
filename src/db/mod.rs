//! Persistence for user records.
//!
//! - [`traits`] defines the `CredentialStore` seam the auth core depends on.
//! - [`turso`] implements it over libSQL (local SQLite file or `:memory:`).

pub mod traits;
pub mod turso;

pub use traits::{find_user_with_timeout, CredentialStore};
pub use turso::TursoClient;
