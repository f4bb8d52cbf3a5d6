//! API request handlers.

/// Login and token refresh.
pub mod auth;
/// Bearer-protected data and the catch-all route.
pub mod protected;
/// Registration and listing.
pub mod users;
