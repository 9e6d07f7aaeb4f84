//! Server application models and type definitions.
//!
//! This module contains data models for the server application: the shared application
//! state injected into handlers, the OAuth credential and profile records attached to a
//! visitor's session, the form submission forwarded to the row store, and the typed session
//! wrappers used to read and write them.

/// Shared handler state.
pub mod app;
/// Credential and profile types.
pub mod auth;
/// Posted form fields and the validated submission.
pub mod form;
pub mod session;
