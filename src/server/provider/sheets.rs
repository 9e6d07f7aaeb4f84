//! Spreadsheet row store backed by the Google Sheets v4 API.
//!
//! A [`Worksheet`] is opened once at startup with a service account credential and then
//! shared by every request. Access tokens are obtained through the JWT-bearer grant and
//! cached until shortly before they expire; apart from that cache the handle is immutable,
//! so concurrent appends need no further coordination.

use std::{fmt, fs, path::Path};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use url::Url;

use crate::server::{error::sheet::SheetError, model::form::FormSubmission};

/// Base URL of the Sheets v4 API.
pub const SHEETS_API_URL: &str = "https://sheets.googleapis.com/";
/// Scope requested for the service account token.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Service account credential as downloaded from the provider console.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Issuer of the signed assertion.
    pub client_email: String,
    /// PEM-encoded RSA key.
    pub private_key: String,
    /// Endpoint the assertion is exchanged at.
    pub token_uri: String,
    /// Sent as the JWT `kid` header when present.
    #[serde(default)]
    pub private_key_id: Option<String>,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[redacted]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Reads and parses a service account JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            SheetError::InitFailure(format!("failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&contents)
    }

    /// Parses service account JSON.
    pub fn from_json(contents: &str) -> Result<Self, SheetError> {
        serde_json::from_str(contents)
            .map_err(|e| SheetError::InitFailure(format!("invalid service account: {}", e)))
    }
}

/// Acknowledgement returned by the API for an appended row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendAck {
    /// Range of the table the row was appended to.
    #[serde(default)]
    pub table_range: Option<String>,
    /// What was written.
    #[serde(default)]
    pub updates: AppendUpdates,
}

/// Cells written by an append.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendUpdates {
    /// A1 range of the new row.
    #[serde(default)]
    pub updated_range: Option<String>,
    /// Number of rows written.
    #[serde(default)]
    pub updated_rows: Option<u32>,
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct ServiceToken {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct CachedToken {
    secret: String,
    expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: i64,
}

#[derive(Serialize)]
struct ValueRange<'a> {
    values: [[&'a str; 3]; 1],
}

/// Failures while talking to the API; mapped to `InitFailure` or `AppendFailure` at the
/// public boundary depending on which operation hit them.
#[derive(Error, Debug)]
enum RequestError {
    #[error("failed to sign service account assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("API responded with {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("invalid API URL: {0}")]
    Url(String),
}

/// Handle to the first worksheet of one spreadsheet.
pub struct Worksheet {
    http: reqwest::Client,
    api_url: Url,
    spreadsheet_id: String,
    title: String,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    token: Mutex<Option<CachedToken>>,
}

impl Worksheet {
    /// Opens the spreadsheet and resolves its first worksheet.
    ///
    /// # Arguments
    /// - `key` - Service account credential the spreadsheet is shared with
    /// - `spreadsheet_id` - Identifier of the target spreadsheet
    /// - `api_url` - Base URL of the Sheets API, normally [`SHEETS_API_URL`]
    ///
    /// # Returns
    /// - `Ok(Worksheet)` - Spreadsheet reachable and has at least one worksheet
    /// - `Err(SheetError::InitFailure)` - Bad credential, unreachable API, missing permission,
    ///   or a spreadsheet without worksheets
    pub async fn open(
        key: ServiceAccountKey,
        spreadsheet_id: &str,
        api_url: &str,
    ) -> Result<Self, SheetError> {
        let init_failure = |e: RequestError| SheetError::InitFailure(e.to_string());

        let api_url = Url::parse(api_url)
            .map_err(|e| SheetError::InitFailure(format!("invalid API URL: {}", e)))?;
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| init_failure(e.into()))?;

        let mut worksheet = Self {
            http: reqwest::Client::new(),
            api_url,
            spreadsheet_id: spreadsheet_id.to_string(),
            title: String::new(),
            key,
            encoding_key,
            token: Mutex::new(None),
        };

        worksheet.title = worksheet.first_sheet_title().await.map_err(init_failure)?;

        Ok(worksheet)
    }

    /// Title of the worksheet rows are appended to.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Appends one row with columns (name, pincode, submitter email).
    ///
    /// # Returns
    /// - `Ok(AppendAck)` - Row appended
    /// - `Err(SheetError::AppendFailure)` - Connectivity, permission or API error, carrying
    ///   the underlying message
    pub async fn append(&self, submission: &FormSubmission) -> Result<AppendAck, SheetError> {
        self.append_row(submission.to_row())
            .await
            .map_err(|e| SheetError::AppendFailure(e.to_string()))
    }

    async fn append_row(&self, row: [&str; 3]) -> Result<AppendAck, RequestError> {
        let range = format!("'{}'!A1", self.title.replace('\'', "''"));
        let segment = format!("{}:append", range);
        let mut url = self.spreadsheet_url(&["values", segment.as_str()])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let token = self.access_token().await?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&ValueRange { values: [row] })
            .send()
            .await?;

        Ok(check_status(response).await?.json::<AppendAck>().await?)
    }

    async fn first_sheet_title(&self) -> Result<String, RequestError> {
        let mut url = self.spreadsheet_url(&[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(title,index)");

        let token = self.access_token().await?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let metadata: SpreadsheetMetadata = check_status(response).await?.json().await?;

        metadata
            .sheets
            .into_iter()
            .min_by_key(|sheet| sheet.properties.index)
            .map(|sheet| sheet.properties.title)
            .ok_or_else(|| RequestError::Api {
                status: StatusCode::NOT_FOUND,
                body: "spreadsheet has no worksheets".to_string(),
            })
    }

    fn spreadsheet_url(&self, extra: &[&str]) -> Result<Url, RequestError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| RequestError::Url(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str()])
            .extend(extra);

        Ok(url)
    }

    /// Returns a cached access token, requesting a new one when close to expiry.
    async fn access_token(&self) -> Result<String, RequestError> {
        let mut cached = self.token.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) > now {
                return Ok(token.secret.clone());
            }
        }

        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SPREADSHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        let assertion = jsonwebtoken::encode(&header, &claims, &self.encoding_key)?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let token: ServiceToken = check_status(response).await?.json().await?;

        let expires_in = token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        *cached = Some(CachedToken {
            secret: token.access_token.clone(),
            expires_at: now + Duration::seconds(expires_in),
        });

        Ok(token.access_token)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RequestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(RequestError::Api { status, body })
}
