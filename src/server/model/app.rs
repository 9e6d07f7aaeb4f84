use std::sync::Arc;

use crate::server::provider::{oauth::OAuthClient, sheets::Worksheet};

/// State shared by every request handler.
///
/// Constructed once at startup and injected into the router. The worksheet handle is `None`
/// when the row store failed to connect at startup, in which case every submission fails
/// fast until the process is restarted.
#[derive(Clone)]
pub struct AppState {
    /// Client for the identity provider.
    pub oauth: OAuthClient,
    /// Row store handle, `None` after a failed startup connection.
    pub worksheet: Option<Arc<Worksheet>>,
}

impl AppState {
    /// Wraps the worksheet for sharing across handlers.
    pub fn new(oauth: OAuthClient, worksheet: Option<Worksheet>) -> Self {
        Self {
            oauth,
            worksheet: worksheet.map(Arc::new),
        }
    }
}
