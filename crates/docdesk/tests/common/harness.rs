//! Test harness for running the document manager against a mock store.
//!
//! The `TestHarness` owns:
//! - A `wiremock::MockServer` standing in for the document store
//! - A `DocumentManager` over `HttpDocumentApi` pointed at that server
//! - The credential publisher and a temp directory for files to upload

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use docdesk::{
    credential_channel, ClientConfig, Credential, CredentialPublisher, DocumentManager,
    HttpDocumentApi,
};

pub const TEST_TOKEN: &str = "test-token";
pub const BEARER: &str = "Bearer test-token";

pub struct TestHarness {
    pub server: MockServer,
    pub manager: Arc<DocumentManager<HttpDocumentApi>>,
    pub credentials: CredentialPublisher,
    temp_dir: TempDir,
}

impl TestHarness {
    /// Harness with a credential already published.
    pub async fn new() -> Self {
        Self::with_credential(Credential::from_token(TEST_TOKEN)).await
    }

    pub async fn with_credential(credential: Option<Credential>) -> Self {
        let server = MockServer::start().await;
        let config = ClientConfig {
            base_url: format!("{}/api", server.uri()),
            ..ClientConfig::default()
        };

        let api = HttpDocumentApi::new(&config).expect("valid client config");
        let (credentials, receiver) = credential_channel(credential);
        let manager = Arc::new(DocumentManager::new(api, receiver, config.upload.clone()));

        Self {
            server,
            manager,
            credentials,
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Serves `body` for every authorised list request.
    pub async fn mount_list(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path("/api/documents"))
            .and(header("authorization", BEARER))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Serves `body` for the next `times` list requests only. Mount before
    /// any fallback list mock.
    pub async fn mount_list_times(&self, body: Value, times: u64) {
        Mock::given(method("GET"))
            .and(path("/api/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Writes a file into the harness temp directory.
    pub fn write_file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, bytes).expect("Failed to write test file");
        path
    }

    /// Requests the server received for `method` and `path`.
    pub async fn requests_to(&self, http_method: &str, request_path: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .collect()
    }
}
