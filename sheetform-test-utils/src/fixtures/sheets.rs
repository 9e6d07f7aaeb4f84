//! Sheets API endpoints and the service account token endpoint.

use mockito::{Matcher, Mock};
use serde_json::{json, Value};

use crate::{
    constant::{TEST_SERVICE_ACCESS_TOKEN, TEST_SHEET_TITLE, TEST_SPREADSHEET_ID},
    TestSetup,
};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

impl TestSetup {
    pub fn sheets<'a>(&'a mut self) -> SheetsFixtures<'a> {
        SheetsFixtures { setup: self }
    }
}

pub struct SheetsFixtures<'a> {
    setup: &'a mut TestSetup,
}

/// Spreadsheet metadata with the first worksheet listed last, so callers must go by index.
pub fn mock_spreadsheet_metadata() -> Value {
    json!({
        "sheets": [
            { "properties": { "title": "Archive", "index": 1 } },
            { "properties": { "title": TEST_SHEET_TITLE, "index": 0 } },
        ]
    })
}

pub fn mock_append_response() -> Value {
    json!({
        "spreadsheetId": TEST_SPREADSHEET_ID,
        "tableRange": format!("{}!A1:C1", TEST_SHEET_TITLE),
        "updates": {
            "spreadsheetId": TEST_SPREADSHEET_ID,
            "updatedRange": format!("{}!A2:C2", TEST_SHEET_TITLE),
            "updatedRows": 1,
            "updatedColumns": 3,
            "updatedCells": 3,
        }
    })
}

fn api_error(code: usize, message: &str, status: &str) -> String {
    json!({
        "error": {
            "code": code,
            "message": message,
            "status": status,
        }
    })
    .to_string()
}

impl<'a> SheetsFixtures<'a> {
    /// Token endpoint accepting the service account's signed assertion.
    pub fn create_service_token_endpoint(&mut self, expected_requests: usize) -> Mock {
        self.setup
            .server
            .mock("POST", "/service/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".to_string(), JWT_BEARER_GRANT.to_string()),
                Matcher::Regex("assertion=".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "access_token": TEST_SERVICE_ACCESS_TOKEN,
                    "expires_in": 3599,
                    "token_type": "Bearer",
                })
                .to_string(),
            )
            .expect(expected_requests)
            .create()
    }

    pub fn create_failing_service_token_endpoint(&mut self) -> Mock {
        self.setup
            .server
            .mock("POST", "/service/token")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid JWT Signature.",
                })
                .to_string(),
            )
            .create()
    }

    pub fn create_spreadsheet_endpoint(&mut self) -> Mock {
        let path = self.setup.spreadsheet_path();

        self.setup
            .server
            .mock("GET", path.as_str())
            .match_query(Matcher::Any)
            .match_header(
                "authorization",
                Matcher::Exact(format!("Bearer {}", TEST_SERVICE_ACCESS_TOKEN)),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(mock_spreadsheet_metadata().to_string())
            .create()
    }

    /// Spreadsheet that was never shared with the service account.
    pub fn create_forbidden_spreadsheet_endpoint(&mut self) -> Mock {
        let path = self.setup.spreadsheet_path();

        self.setup
            .server
            .mock("GET", path.as_str())
            .match_query(Matcher::Any)
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(api_error(
                403,
                "The caller does not have permission",
                "PERMISSION_DENIED",
            ))
            .create()
    }

    /// Append endpoint that only accepts exactly `row` as the single appended row.
    ///
    /// # Arguments
    /// - `row` - Expected (name, pincode, submitter email) values
    /// - `expected_requests` - Number of appends the test should perform
    pub fn create_append_endpoint(&mut self, row: [&str; 3], expected_requests: usize) -> Mock {
        let path = format!("^{}/values/.+:append$", self.setup.spreadsheet_path());

        self.setup
            .server
            .mock("POST", Matcher::Regex(path))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("valueInputOption".to_string(), "RAW".to_string()),
                Matcher::UrlEncoded("insertDataOption".to_string(), "INSERT_ROWS".to_string()),
            ]))
            .match_header(
                "authorization",
                Matcher::Exact(format!("Bearer {}", TEST_SERVICE_ACCESS_TOKEN)),
            )
            .match_body(Matcher::Json(json!({ "values": [row] })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(mock_append_response().to_string())
            .expect(expected_requests)
            .create()
    }

    /// Append endpoint rejecting the write, as for a read-only share.
    pub fn create_failing_append_endpoint(&mut self) -> Mock {
        let path = format!("^{}/values/.+:append$", self.setup.spreadsheet_path());

        self.setup
            .server
            .mock("POST", Matcher::Regex(path))
            .match_query(Matcher::Any)
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(api_error(
                403,
                "The caller does not have permission",
                "PERMISSION_DENIED",
            ))
            .create()
    }
}
