use crate::api::backend::SearchBackend;
use crate::common::selected_file::SelectedFile;
use crate::pages::search_state::{SearchFields, SearchPage, SearchPhase};
use std::ops::Deref;
use tracing::debug;

/// General collection search: every accepted upload immediately starts a search.
///
/// There is no guard against overlapping searches. If two uploads are in
/// flight, whichever response arrives last is what the page shows.
pub struct GeneralSearchPage<B: SearchBackend> {
    page: SearchPage<B>,
}

impl<B: SearchBackend> Clone for GeneralSearchPage<B> {
    fn clone(&self) -> Self {
        Self {
            page: self.page.clone(),
        }
    }
}

impl<B: SearchBackend> Deref for GeneralSearchPage<B> {
    type Target = SearchPage<B>;

    fn deref(&self) -> &Self::Target {
        &self.page
    }
}

impl<B: SearchBackend> GeneralSearchPage<B> {
    pub fn new(backend: B, fields: SearchFields) -> Self {
        Self {
            page: SearchPage::new(backend, fields),
        }
    }

    /// Search with `file` using the current field values.
    pub async fn search(&self, file: SelectedFile) -> SearchPhase {
        debug!("General search for {}", file.file_name);
        let mut params = None;
        self.page.modify(|state| {
            SearchPage::<B>::begin(state);
            state.staged_file = Some(file.clone());
            params = Some(state.fields.to_parameters(false));
        });
        let params = params.unwrap_or_default();
        self.page.execute(file, params).await
    }

    /// Handler for [`crate::components::upload::UploadCapture`]: spawns a
    /// search for every accepted file. Must be called inside a tokio runtime.
    pub fn upload_handler(&self) -> impl Fn(SelectedFile) + Send + Sync + 'static {
        let page = self.clone();
        move |file| {
            let page = page.clone();
            tokio::spawn(async move {
                page.search(file).await;
            });
        }
    }
}
