//! Mock HTTP endpoints and response bodies for the external services the app talks to.
//!
//! - `oauth` - Identity provider token and user-info endpoints
//! - `sheets` - Service account token endpoint and the Sheets API

pub mod oauth;
pub mod sheets;
