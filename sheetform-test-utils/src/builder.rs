//! Declarative test builder.
//!
//! Mock endpoints are queued on the builder and only created on the mock server during
//! `build()`, which keeps every created `Mock` alive on the returned `TestSetup`.

use mockito::Mock;

use crate::{error::TestError, TestSetup};

enum Endpoint {
    Token(usize),
    FailingToken,
    Userinfo(Option<String>, usize),
    FailingUserinfo,
    ServiceToken(usize),
    FailingServiceToken,
    Spreadsheet,
    ForbiddenSpreadsheet,
    Append([String; 3], usize),
    FailingAppend,
}

/// Builder for declarative test initialization.
///
/// Chain `with_*` methods to mock the identity provider and the Sheets API, then
/// finalize with `build()`.
pub struct TestBuilder {
    endpoints: Vec<Endpoint>,
    mock_builders: Vec<Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>>,
}

impl TestBuilder {
    pub fn new() -> Self {
        Self {
            endpoints: Vec::new(),
            mock_builders: Vec::new(),
        }
    }

    /// Add a provider token endpoint that exchanges any authorization code.
    ///
    /// # Arguments
    /// - `expected_requests` - Number of times the endpoint should be called
    pub fn with_token_endpoint(mut self, expected_requests: usize) -> Self {
        self.endpoints.push(Endpoint::Token(expected_requests));
        self
    }

    /// Add a provider token endpoint that rejects the code, expected once.
    pub fn with_failing_token_endpoint(mut self) -> Self {
        self.endpoints.push(Endpoint::FailingToken);
        self
    }

    /// Add a user-info endpoint returning the mock profile.
    ///
    /// # Arguments
    /// - `email` - Email on the profile, or `None` for a profile without one
    /// - `expected_requests` - Number of times the endpoint should be called
    pub fn with_userinfo_endpoint(mut self, email: Option<&str>, expected_requests: usize) -> Self {
        self.endpoints.push(Endpoint::Userinfo(
            email.map(str::to_string),
            expected_requests,
        ));
        self
    }

    pub fn with_failing_userinfo_endpoint(mut self) -> Self {
        self.endpoints.push(Endpoint::FailingUserinfo);
        self
    }

    /// Add a service account token endpoint, expected once.
    pub fn with_service_token_endpoint(mut self) -> Self {
        self.endpoints.push(Endpoint::ServiceToken(1));
        self
    }

    pub fn with_failing_service_token_endpoint(mut self) -> Self {
        self.endpoints.push(Endpoint::FailingServiceToken);
        self
    }

    /// Add everything needed to open the mock spreadsheet once.
    ///
    /// The service token endpoint expects a single request, so tests asserting mocks also
    /// verify the token is cached across later appends.
    pub fn with_worksheet(mut self) -> Self {
        self.endpoints.push(Endpoint::ServiceToken(1));
        self.endpoints.push(Endpoint::Spreadsheet);
        self
    }

    /// Add a spreadsheet the service account is not allowed to read.
    pub fn with_forbidden_spreadsheet(mut self) -> Self {
        self.endpoints.push(Endpoint::ForbiddenSpreadsheet);
        self
    }

    /// Add an append endpoint accepting exactly one row with the given values.
    ///
    /// # Arguments
    /// - `row` - Expected (name, pincode, submitter email) values
    /// - `expected_requests` - Number of times the endpoint should be called
    pub fn with_append_endpoint(mut self, row: [&str; 3], expected_requests: usize) -> Self {
        self.endpoints.push(Endpoint::Append(
            row.map(str::to_string),
            expected_requests,
        ));
        self
    }

    /// Add an append endpoint that responds with 403.
    pub fn with_failing_append_endpoint(mut self) -> Self {
        self.endpoints.push(Endpoint::FailingAppend);
        self
    }

    /// Add a custom mock endpoint with full control over the mock server.
    pub fn with_mock_endpoint<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(setup));
        self
    }

    /// Build the test setup by creating all configured mock endpoints.
    ///
    /// Custom endpoints are created first so mockito matches them ahead of the shortcuts.
    ///
    /// # Returns
    /// - `Ok(TestSetup)` - Mock server with endpoints and an empty session
    /// - `Err(TestError::Openssl)` - Service account key generation failed
    pub async fn build(self) -> Result<TestSetup, TestError> {
        let mut setup = TestSetup::new().await?;
        let mut mocks = Vec::new();

        for builder in self.mock_builders {
            mocks.push(builder(&mut setup.server));
        }

        for endpoint in self.endpoints {
            let mock = match endpoint {
                Endpoint::Token(expected) => setup.oauth().create_token_endpoint(expected),
                Endpoint::FailingToken => setup.oauth().create_failing_token_endpoint(),
                Endpoint::Userinfo(email, expected) => setup
                    .oauth()
                    .create_userinfo_endpoint(email.as_deref(), expected),
                Endpoint::FailingUserinfo => setup.oauth().create_failing_userinfo_endpoint(),
                Endpoint::ServiceToken(expected) => {
                    setup.sheets().create_service_token_endpoint(expected)
                }
                Endpoint::FailingServiceToken => {
                    setup.sheets().create_failing_service_token_endpoint()
                }
                Endpoint::Spreadsheet => setup.sheets().create_spreadsheet_endpoint(),
                Endpoint::ForbiddenSpreadsheet => {
                    setup.sheets().create_forbidden_spreadsheet_endpoint()
                }
                Endpoint::Append(row, expected) => {
                    let [name, pincode, email] = &row;
                    setup
                        .sheets()
                        .create_append_endpoint(
                            [name.as_str(), pincode.as_str(), email.as_str()],
                            expected,
                        )
                }
                Endpoint::FailingAppend => setup.sheets().create_failing_append_endpoint(),
            };
            mocks.push(mock);
        }

        // Store mocks in setup so they live as long as the test
        setup.mocks = mocks;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
