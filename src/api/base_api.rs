use crate::api::backend::{build_search_form, SearchBackend};
use crate::api::search_structs::{
    ApiEnvelope, BaseMatch, BasePage, SearchParameters, SearchResponse, StatsData,
};
use crate::common::api_client::{ApiClient, ApiClientError};
use crate::common::selected_file::SelectedFile;
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

const SEARCH_PATH: &str = "/api/base/search";
const STATS_PATH: &str = "/api/base/collection/stats";
const BATCH_START_PATH: &str = "/api/base/batch/start";
const BATCH_STATUS_PATH: &str = "/api/base/batch/status";
const BATCH_RESET_PATH: &str = "/api/base/batch/reset";

/// Endpoints for the general image collection.
#[derive(Clone, Debug)]
pub struct BaseSearchApi {
    client: ApiClient,
}

impl BaseSearchApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Search the general collection by image.
    ///
    /// # Errors
    /// * Transport failures.
    /// * Non-success status codes.
    /// * Unparseable json.
    pub async fn search(
        &self,
        file: &SelectedFile,
        params: &SearchParameters,
    ) -> Result<SearchResponse<BaseMatch>, ApiClientError> {
        info!(
            "Searching base collection with {} (top_k={}, min_score={})",
            file.file_name, params.top_k, params.min_score
        );
        let form = build_search_form(file, params.form_fields())?;
        self.client.post_multipart(SEARCH_PATH, form).await
    }

    /// # Errors
    /// See [`ApiClient::get_json`].
    pub async fn collection_stats(&self) -> Result<ApiEnvelope<StatsData>, ApiClientError> {
        self.client.get_json(STATS_PATH).await
    }

    /// # Errors
    /// See [`ApiClient::post_empty`].
    pub async fn start_batch(&self) -> Result<ApiEnvelope<Value>, ApiClientError> {
        self.client.post_empty(BATCH_START_PATH).await
    }

    /// # Errors
    /// See [`ApiClient::get_json`].
    pub async fn batch_status(&self) -> Result<ApiEnvelope<Value>, ApiClientError> {
        self.client.get_json(BATCH_STATUS_PATH).await
    }

    /// # Errors
    /// See [`ApiClient::post_empty`].
    pub async fn reset_batch(&self) -> Result<ApiEnvelope<Value>, ApiClientError> {
        self.client.post_empty(BATCH_RESET_PATH).await
    }
}

#[async_trait]
impl SearchBackend for BaseSearchApi {
    type Match = BaseMatch;

    async fn search(
        &self,
        file: &SelectedFile,
        params: &SearchParameters,
    ) -> Result<SearchResponse<BaseMatch>, ApiClientError> {
        Self::search(self, file, params).await
    }
}

#[must_use]
pub fn thumbnail_path(file_name: &str) -> String {
    format!("/api/image/{file_name}")
}

#[must_use]
pub fn full_image_path(file_name: &str) -> String {
    format!("/api/image/full/{file_name}")
}

impl BasePage {
    #[must_use]
    pub fn full_image_path(&self) -> String {
        full_image_path(&self.file_name)
    }
}
