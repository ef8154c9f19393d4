//! Verification of identity tokens issued by the external identity provider.
//!
//! - [`jwt`] -- HS256 token validation and (for tests and tooling) issuance.

pub mod jwt;
