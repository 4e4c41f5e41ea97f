//! HTTP upload client for the records service.
//!
//! Records and identity are posted as JSON; documents go up as multipart
//! form data with a single `file` part. A non-2xx answer is an error and
//! nothing is retried.
//!
//! ## Example
//!
//! ```rust,no_run
//! use healthsnap_adapters::upload::UploadClient;
//! use healthsnap_types::{GeneralInformation, Insurance};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = UploadClient::builder()
//!         .endpoint("http://localhost:8080")
//!         .timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     let info = GeneralInformation {
//!         name: "Ada Lovelace".into(),
//!         insurance: Insurance {
//!             provider: "TK".into(),
//!             insurance_number: "A123".into(),
//!         },
//!         ..Default::default()
//!     };
//!     client.upload_general_information(&info).await?;
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{debug, info};

use healthsnap_types::{GeneralInformation, NormalizedRecord};

use crate::{content_type_for, UploadError};

/// Default service endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the records service.
#[derive(Debug, Clone)]
pub struct UploadClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl UploadClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> UploadClientBuilder {
        UploadClientBuilder::default()
    }

    /// The base URL every request is joined to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST the normalized record to `/health`.
    pub async fn upload_record(&self, record: &NormalizedRecord) -> Result<(), UploadError> {
        self.post_json("health", record).await
    }

    /// POST patient identity to `/general-information`.
    pub async fn upload_general_information(
        &self,
        info: &GeneralInformation,
    ) -> Result<(), UploadError> {
        self.post_json("general-information", info).await
    }

    /// Send a document to `/upload` as multipart form data.
    pub async fn upload_document(&self, path: impl AsRef<Path>) -> Result<(), UploadError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let content_type = content_type_for(path);
        debug!(file = %file_name, content_type, size = bytes.len(), "uploading document");

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("upload"))
            .multipart(form)
            .send()
            .await?;
        check_status(response).await?;

        info!(path = %path.display(), "document uploaded");
        Ok(())
    }

    async fn post_json<T: Serialize + ?Sized>(&self, route: &str, body: &T) -> Result<(), UploadError> {
        let url = self.url(route);
        let body = serde_json::to_vec(body)?;
        debug!(%url, size = body.len(), "posting json");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        check_status(response).await?;

        info!(%url, "upload accepted");
        Ok(())
    }

    fn url(&self, route: &str) -> String {
        join_url(&self.endpoint, route)
    }
}

async fn check_status(response: Response) -> Result<(), UploadError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(UploadError::Rejected {
        status: status.as_u16(),
        body,
    })
}

// Join a route onto the endpoint without doubling or dropping the slash
fn join_url(endpoint: &str, route: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        route.trim_start_matches('/')
    )
}

/// Builder for UploadClient.
#[derive(Debug, Default)]
pub struct UploadClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl UploadClientBuilder {
    /// Set the service base URL (e.g., "https://records.example.com/api").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<UploadClient, UploadError> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = Client::builder().timeout(timeout).build()?;

        Ok(UploadClient {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout,
        })
    }
}
