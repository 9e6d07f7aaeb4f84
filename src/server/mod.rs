//! Server application core modules.
//!
//! This module contains all server-side functionality for Sheetform: HTTP routing, the
//! OAuth sign-in flow, session state, the spreadsheet row-store adapter, and the form
//! submission write path. Route handlers are thin; provider calls live in `provider` and
//! the multi-step flows live in `service`.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Environment configuration.
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;
pub mod router;
pub mod service;
/// Process startup: tracing, provider clients and the session key.
pub mod startup;
pub mod util;
pub mod view;
