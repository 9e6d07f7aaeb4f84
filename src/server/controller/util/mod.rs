//! Utility functions for controller request handling.
//!
//! This module provides reusable helper functions used across controllers, including
//! consuming the CSRF state for the OAuth callback and resolving the authenticated user
//! for protected pages.

/// Single-use CSRF state.
pub mod csrf;
/// Signed-in user resolution.
pub mod get_user;
