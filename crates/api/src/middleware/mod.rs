//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller's identity from a Bearer token.

pub mod auth;
