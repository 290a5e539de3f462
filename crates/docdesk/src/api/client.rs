//! HTTP client for the remote document store.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};

use super::types::{detail_from_body, file_name_from_disposition, DocumentContent, UploadRequest};
use crate::config::ClientConfig;
use crate::credentials::Credential;
use crate::error::ApiError;
use crate::model::DocumentRecord;
use crate::sanitize;

pub type Result<T> = std::result::Result<T, ApiError>;

/// The four operations the document manager needs from the store.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn list_documents(&self, credential: &Credential) -> Result<Vec<DocumentRecord>>;

    async fn delete_document(&self, credential: &Credential, id: &str) -> Result<()>;

    async fn fetch_content(&self, credential: &Credential, id: &str) -> Result<DocumentContent>;

    async fn upload_document(&self, credential: &Credential, request: UploadRequest)
        -> Result<()>;
}

/// [`DocumentApi`] over reqwest.
pub struct HttpDocumentApi {
    client: Client,
    list_url: Url,
    upload_url: Url,
}

/// Creates an HTTP client with the configured timeouts.
fn create_http_client(config: &ClientConfig) -> Result<Client> {
    Ok(Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?)
}

fn join_url(base: &str, path: &str) -> Result<Url> {
    let raw = format!("{}{}", base.trim_end_matches('/'), path);
    Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
        url: sanitize::redact_url(&raw),
        reason: e.to_string(),
    })
}

impl HttpDocumentApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: create_http_client(config)?,
            list_url: join_url(&config.base_url, &config.endpoints.list)?,
            upload_url: join_url(&config.base_url, &config.endpoints.upload)?,
        })
    }

    pub fn list_url(&self) -> &Url {
        &self.list_url
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }

    /// `{list}/{id}` plus optional trailing segments, with `id` escaped as a
    /// single path segment.
    pub fn document_url(&self, id: &str, suffix: &[&str]) -> Result<Url> {
        let mut url = self.list_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: sanitize::redact_url(self.list_url.as_str()),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(id)
            .extend(suffix);
        Ok(url)
    }
}

/// Turns a non-success response into [`ApiError::Status`], keeping the
/// server's `detail` message when present.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(
        "Remote store returned {}: {}",
        status,
        sanitize::truncate_body(&body)
    );

    Err(ApiError::Status {
        status,
        detail: detail_from_body(&body),
    })
}

#[async_trait]
impl DocumentApi for HttpDocumentApi {
    async fn list_documents(&self, credential: &Credential) -> Result<Vec<DocumentRecord>> {
        let response = self
            .client
            .get(self.list_url.clone())
            .header(AUTHORIZATION, credential.header_value())
            .send()
            .await?;
        let response = check_status(response).await?;

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn delete_document(&self, credential: &Credential, id: &str) -> Result<()> {
        let url = self.document_url(id, &[])?;
        let response = self
            .client
            .delete(url)
            .header(AUTHORIZATION, credential.header_value())
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn fetch_content(&self, credential: &Credential, id: &str) -> Result<DocumentContent> {
        let url = self.document_url(id, &["content"])?;
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, credential.header_value())
            .send()
            .await?;
        let response = check_status(response).await?;

        let headers = response.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let file_name = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(file_name_from_disposition);

        let bytes = response.bytes().await?.to_vec();

        Ok(DocumentContent {
            bytes,
            content_type,
            file_name,
        })
    }

    async fn upload_document(
        &self,
        credential: &Credential,
        request: UploadRequest,
    ) -> Result<()> {
        let UploadRequest {
            file,
            title,
            document_type,
        } = request;

        let mut part = Part::bytes(file.bytes).file_name(file.name);
        if let Some(mime) = file.mime_type.as_deref() {
            part = part.mime_str(mime)?;
        }

        let form = Form::new()
            .part("file", part)
            .text("title", title)
            .text("document_type", document_type.as_str());

        let response = self
            .client
            .post(self.upload_url.clone())
            .header(AUTHORIZATION, credential.header_value())
            .multipart(form)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
