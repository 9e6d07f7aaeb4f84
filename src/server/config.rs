use std::path::PathBuf;

use crate::server::error::config::ConfigError;

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 5000;
/// Callback URL registered with the provider when `REDIRECT_URI` is unset.
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:5000/callback";
/// Service account key file used when `SERVICE_ACCOUNT_FILE` is unset.
pub const DEFAULT_SERVICE_ACCOUNT_FILE: &str = "service_account.json";
/// OAuth client secrets file used when `CLIENT_SECRETS_FILE` is unset.
pub const DEFAULT_CLIENT_SECRETS_FILE: &str = "credentials.json";

/// Minimum length of `SECRET_KEY`, required by the cookie signing key.
pub const MIN_SECRET_KEY_LEN: usize = 64;

/// Deployment mode, selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Debug logging and plain-http cookies.
    Development,
    /// Info logging and secure-only cookies.
    Production,
}

/// Server configuration read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Session signing secret; a random one is generated per process when unset.
    pub secret_key: Option<String>,
    /// Spreadsheet rows are appended to.
    pub spreadsheet_id: String,
    /// Service account key used to call the Sheets API.
    pub service_account_file: PathBuf,
    /// OAuth client id and secret downloaded from the provider console.
    pub client_secrets_file: PathBuf,
    /// Absolute URL of `/callback`.
    pub redirect_uri: String,
    /// Port the server listens on.
    pub port: u16,
    /// Deployment mode.
    pub environment: Environment,
}

impl Config {
    /// Reads the configuration from environment variables.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables are present and valid
    /// - `Err(ConfigError)` - A required variable is missing, `SECRET_KEY` is too short, or
    ///   `PORT` is not a number
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_key = optional("SECRET_KEY");
        if let Some(secret) = &secret_key {
            if secret.len() < MIN_SECRET_KEY_LEN {
                return Err(ConfigError::InvalidEnvValue {
                    var: "SECRET_KEY".to_string(),
                    reason: format!("must be at least {} bytes", MIN_SECRET_KEY_LEN),
                });
            }
        }

        let port = match optional("PORT") {
            Some(port) => port.parse().map_err(|e| ConfigError::InvalidEnvValue {
                var: "PORT".to_string(),
                reason: format!("{}", e),
            })?,
            None => DEFAULT_PORT,
        };

        let environment = match optional("APP_ENV").as_deref() {
            None | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some(other) => {
                return Err(ConfigError::InvalidEnvValue {
                    var: "APP_ENV".to_string(),
                    reason: format!("expected development or production, got {:?}", other),
                })
            }
        };

        Ok(Self {
            secret_key,
            spreadsheet_id: required("SPREADSHEET_ID")?,
            service_account_file: optional("SERVICE_ACCOUNT_FILE")
                .unwrap_or_else(|| DEFAULT_SERVICE_ACCOUNT_FILE.to_string())
                .into(),
            client_secrets_file: optional("OAUTH_CLIENT_SECRETS_FILE")
                .unwrap_or_else(|| DEFAULT_CLIENT_SECRETS_FILE.to_string())
                .into(),
            redirect_uri: optional("REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            port,
            environment,
        })
    }

    /// Returns whether `APP_ENV` selected production mode.
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn required(var: &str) -> Result<String, ConfigError> {
    optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

fn optional(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.is_empty())
}
