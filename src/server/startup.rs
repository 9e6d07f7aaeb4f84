use rand::RngCore;
use tower_sessions::cookie::Key;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::server::{
    config::Config,
    error::{config::ConfigError, Error},
    provider::{
        oauth::{ClientSecrets, OAuthClient},
        sheets::{ServiceAccountKey, Worksheet, SHEETS_API_URL},
    },
};

/// Install the tracing subscriber; `RUST_LOG` overrides the mode default
pub fn init_tracing(config: &Config) {
    let default_level = if config.is_production() {
        "info"
    } else {
        "debug"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

/// Build the OAuth client from the client secrets file and redirect URI
///
/// Plain http endpoints are only accepted in development.
pub fn build_oauth_client(config: &Config) -> Result<OAuthClient, Error> {
    let secrets = ClientSecrets::from_file(&config.client_secrets_file)?;

    let oauth = OAuthClient::builder()
        .secrets(&secrets)
        .redirect_url(&config.redirect_uri)
        .allow_insecure_transport(!config.is_production())
        .build()?;

    Ok(oauth)
}

/// Open the target spreadsheet with the service account credential
///
/// Failure does not stop startup: it is logged once and the handle is left absent, so
/// every submission fails until the process is restarted.
pub async fn connect_to_worksheet(config: &Config) -> Option<Worksheet> {
    let result = match ServiceAccountKey::from_file(&config.service_account_file) {
        Ok(key) => Worksheet::open(key, &config.spreadsheet_id, SHEETS_API_URL).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(worksheet) => {
            tracing::info!(
                spreadsheet_id = %config.spreadsheet_id,
                worksheet = %worksheet.title(),
                "Connected to spreadsheet"
            );

            Some(worksheet)
        }
        Err(e) => {
            tracing::error!(spreadsheet_id = %config.spreadsheet_id, "{}", e);

            None
        }
    }
}

/// Derive the session cookie signing key
///
/// Without `SECRET_KEY` a random key is generated, so sessions do not survive a restart.
pub fn session_key(config: &Config) -> Result<Key, Error> {
    match &config.secret_key {
        Some(secret) => Key::try_from(secret.as_bytes()).map_err(|e| {
            ConfigError::InvalidEnvValue {
                var: "SECRET_KEY".to_string(),
                reason: e.to_string(),
            }
            .into()
        }),
        None => {
            tracing::warn!("SECRET_KEY is not set, generating a random session signing key");

            let mut bytes = [0u8; 64];
            rand::rng().fill_bytes(&mut bytes);

            Ok(Key::from(&bytes))
        }
    }
}
