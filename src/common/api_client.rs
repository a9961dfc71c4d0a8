use reqwest::multipart::Form;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Only the status text is shown, the body is kept for diagnostics.
    #[error("{}", status_text(.status))]
    UnexpectedStatus { status: StatusCode, text: String },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

fn status_text(status: &StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_string(), str::to_string)
}

/// Thin wrapper over `reqwest` bound to the search service's base url.
///
/// No request timeout is configured: a call waits until the transport settles.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create api client
    ///
    /// # Errors
    /// If the underlying http client can't be built.
    pub fn new(base_url: &str) -> Result<Self, ApiClientError> {
        let http_client = Client::builder().build()?;
        Ok(Self::with_client(http_client, base_url))
    }

    #[must_use]
    pub fn with_client(http_client: Client, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute url for an api path such as `/api/base/search`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST a multipart form and parse the json reply.
    ///
    /// # Errors
    /// * If POST request can't be made to url.
    /// * If json can't be parsed
    /// * If body can't be read
    /// * If a non-success status code is received.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiClientError> {
        let url = self.url(path);
        debug!("POST {} (multipart)", url);
        let response = self.http_client.post(&url).multipart(form).send().await?;
        Self::parse_json(&url, response).await
    }

    /// POST without a body and parse the json reply.
    ///
    /// # Errors
    /// * If POST request can't be made to url.
    /// * If json can't be parsed
    /// * If a non-success status code is received.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiClientError> {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self.http_client.post(&url).send().await?;
        Self::parse_json(&url, response).await
    }

    /// GET a json document.
    ///
    /// # Errors
    /// * If GET request can't be made to url.
    /// * If json can't be parsed
    /// * If a non-success status code is received.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiClientError> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self.http_client.get(&url).send().await?;
        Self::parse_json(&url, response).await
    }

    /// GET raw bytes, used for image resources.
    ///
    /// # Errors
    /// * If GET request can't be made to url.
    /// * If body can't be read
    /// * If a non-success status code is received.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiClientError> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("GET {} returned {}: {}", url, status, text);
            return Err(ApiClientError::UnexpectedStatus { status, text });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn parse_json<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            error!("Request to {} returned {}: {}", url, status, text);
            return Err(ApiClientError::UnexpectedStatus { status, text });
        }
        Ok(serde_json::from_str(&text)?)
    }
}
