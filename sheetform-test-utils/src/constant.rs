//! Test configuration constants for the OAuth client and the mock Sheets API.
//!
//! None of these are real credentials; they only need to match between the mock
//! endpoints and the clients pointed at them.

/// Mock OAuth client ID.
pub static TEST_CLIENT_ID: &str = "test_client_id";

/// Mock OAuth client secret.
pub static TEST_CLIENT_SECRET: &str = "test_client_secret";

/// Redirect URI registered for the mock OAuth client.
pub static TEST_CALLBACK_URL: &str = "http://localhost:8080/callback";

/// Access token issued by the mock token endpoint.
pub static TEST_ACCESS_TOKEN: &str = "test_access_token";

pub static TEST_REFRESH_TOKEN: &str = "test_refresh_token";

/// Email returned by the mock user-info endpoint.
pub static TEST_USER_EMAIL: &str = "a@b.com";

pub static TEST_USER_NAME: &str = "Test User";

pub static TEST_SPREADSHEET_ID: &str = "test-spreadsheet-id";

/// Title of the first worksheet in the mock spreadsheet.
pub static TEST_SHEET_TITLE: &str = "Sheet1";

pub static TEST_SERVICE_ACCOUNT_EMAIL: &str = "sheetform@test-project.iam.gserviceaccount.com";

/// Access token issued to the service account by the mock token endpoint.
pub static TEST_SERVICE_ACCESS_TOKEN: &str = "test_service_access_token";
