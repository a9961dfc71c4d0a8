use crate::api::backend::{build_search_form, SearchBackend};
use crate::api::search_structs::{
    ApiEnvelope, PatentDetail, PatentMatch, SearchParameters, SearchResponse, StatsData,
};
use crate::common::api_client::{ApiClient, ApiClientError};
use crate::common::image_ref::design_image_path;
use crate::common::selected_file::SelectedFile;
use async_trait::async_trait;
use tracing::info;

const SEARCH_PATH: &str = "/api/design/search";
const STATS_PATH: &str = "/api/design/stats";

/// Endpoints for the design-patent collection.
#[derive(Clone, Debug)]
pub struct DesignSearchApi {
    client: ApiClient,
}

impl DesignSearchApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Search design patents by image, narrowed by whichever filters are present.
    ///
    /// # Errors
    /// * Transport failures.
    /// * Non-success status codes.
    /// * Unparseable json.
    pub async fn search(
        &self,
        file: &SelectedFile,
        params: &SearchParameters,
    ) -> Result<SearchResponse<PatentMatch>, ApiClientError> {
        info!(
            "Searching design patents with {} (top_k={}, min_score={}, filters={:?})",
            file.file_name, params.top_k, params.min_score, params.filters
        );
        let mut fields = params.form_fields();
        fields.extend(params.filters.form_fields());
        let form = build_search_form(file, fields)?;
        self.client.post_multipart(SEARCH_PATH, form).await
    }

    /// # Errors
    /// See [`ApiClient::get_json`].
    pub async fn stats(&self) -> Result<ApiEnvelope<StatsData>, ApiClientError> {
        self.client.get_json(STATS_PATH).await
    }

    /// All images and metadata of one patent.
    ///
    /// # Errors
    /// See [`ApiClient::get_json`].
    pub async fn patent_detail(
        &self,
        patent_id: &str,
    ) -> Result<ApiEnvelope<PatentDetail>, ApiClientError> {
        self.client
            .get_json(&format!("/api/design/patent/{patent_id}"))
            .await
    }

    /// Download a patent image, converted to JPEG by the service.
    ///
    /// # Errors
    /// See [`ApiClient::get_bytes`].
    pub async fn fetch_image(
        &self,
        patent_id: &str,
        file_name: &str,
        thumbnail: bool,
    ) -> Result<Vec<u8>, ApiClientError> {
        self.client
            .get_bytes(&design_image_path(patent_id, file_name, thumbnail))
            .await
    }
}

#[async_trait]
impl SearchBackend for DesignSearchApi {
    type Match = PatentMatch;

    async fn search(
        &self,
        file: &SelectedFile,
        params: &SearchParameters,
    ) -> Result<SearchResponse<PatentMatch>, ApiClientError> {
        Self::search(self, file, params).await
    }
}
