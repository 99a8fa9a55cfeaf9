//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated agency user from a JWT Bearer token.

pub mod auth;
