//! HTTP controller endpoints for the Sheetform web application.
//!
//! This module contains Axum handlers for the sign-in flow, the form page and its
//! submission, and the static pages. Controllers handle HTTP requests, read and write the
//! visitor's session through tower-sessions, call into services, and return HTML pages or
//! redirects.

/// Login, callback and logout handlers.
pub mod auth;
/// Form page and submission handlers.
pub mod form;
/// Static pages.
pub mod page;
pub mod util;
