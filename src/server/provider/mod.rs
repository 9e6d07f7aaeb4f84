//! Clients for the external services the application delegates to.
//!
//! - `oauth` - the identity provider's authorization, token and user-info endpoints
//! - `sheets` - the spreadsheet the form submissions are appended to

pub mod oauth;
pub mod sheets;
