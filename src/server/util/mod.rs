//! Shared helpers used across controllers and error responses.

/// 302 redirect response.
pub mod redirect;
