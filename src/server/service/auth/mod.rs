//! Authentication service layer.
//!
//! This module contains the services for the OAuth authorization-code flow: building the
//! login redirect and completing the callback (state check, token exchange, profile fetch).

/// Callback validation and code exchange.
pub mod callback;
/// Authorization URL creation.
pub mod login;
