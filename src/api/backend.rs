use crate::api::search_structs::{SearchParameters, SearchResponse};
use crate::common::api_client::ApiClientError;
use crate::common::selected_file::SelectedFile;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

/// Something that can run an image search. Implemented by the two http apis,
/// and by in-memory fakes in tests.
#[async_trait]
pub trait SearchBackend: Send + Sync + 'static {
    type Match: Clone + Send + Sync + 'static;

    /// Issue exactly one search request. No retries.
    async fn search(
        &self,
        file: &SelectedFile,
        params: &SearchParameters,
    ) -> Result<SearchResponse<Self::Match>, ApiClientError>;
}

/// Multipart body: the image under `file` plus one text part per field.
pub(crate) fn build_search_form(
    file: &SelectedFile,
    fields: Vec<(&'static str, String)>,
) -> Result<Form, ApiClientError> {
    let part = Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(file.content_type().as_ref())?;

    Ok(fields
        .into_iter()
        .fold(Form::new().part("file", part), |form, (name, value)| {
            form.text(name, value)
        }))
}
