use std::sync::{Arc, OnceLock};

use mockito::{Mock, Server, ServerGuard};
use openssl::{pkey::PKey, rsa::Rsa};
use serde_json::{json, Value};
use tower_sessions::{MemoryStore, Session};

use crate::{
    constant::{TEST_SERVICE_ACCOUNT_EMAIL, TEST_SPREADSHEET_ID},
    error::TestError,
};

/// RSA keys are slow to generate, so one is shared by every test in the process.
static SERVICE_ACCOUNT_PEM: OnceLock<String> = OnceLock::new();

pub struct TestSetup {
    pub server: ServerGuard,
    pub session: Session,
    pub mocks: Vec<Mock>,
    service_account_pem: String,
}

impl TestSetup {
    pub async fn new() -> Result<Self, TestError> {
        let server = Server::new_async().await;

        let store = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        Ok(TestSetup {
            server,
            session,
            mocks: Vec::new(),
            service_account_pem: service_account_pem()?,
        })
    }

    /// Provider authorization endpoint on the mock server.
    pub fn auth_url(&self) -> String {
        format!("{}/oauth2/auth", self.server.url())
    }

    /// Provider token endpoint on the mock server.
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.server.url())
    }

    pub fn userinfo_url(&self) -> String {
        format!("{}/oauth2/v2/userinfo", self.server.url())
    }

    /// Token endpoint the mock service account exchanges its signed assertion at.
    pub fn service_token_url(&self) -> String {
        format!("{}/service/token", self.server.url())
    }

    /// Path of the mock spreadsheet, relative to the server root.
    pub fn spreadsheet_path(&self) -> String {
        format!("/v4/spreadsheets/{}", TEST_SPREADSHEET_ID)
    }

    /// Service account credential file contents pointing at the mock token endpoint.
    pub fn service_account_json(&self) -> Value {
        json!({
            "type": "service_account",
            "project_id": "test-project",
            "private_key_id": "test-key-id",
            "private_key": self.service_account_pem,
            "client_email": TEST_SERVICE_ACCOUNT_EMAIL,
            "token_uri": self.service_token_url(),
        })
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}

fn service_account_pem() -> Result<String, TestError> {
    if let Some(pem) = SERVICE_ACCOUNT_PEM.get() {
        return Ok(pem.clone());
    }

    let rsa = Rsa::generate(2048)?;
    let pem = PKey::from_rsa(rsa)?.private_key_to_pem_pkcs8()?;
    let pem = String::from_utf8_lossy(&pem).into_owned();

    Ok(SERVICE_ACCOUNT_PEM.get_or_init(|| pem).clone())
}
