use crate::api::backend::SearchBackend;
use crate::common::selected_file::SelectedFile;
use crate::pages::search_state::{SearchFields, SearchPage, SearchPhase};
use std::ops::Deref;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TriggerRejected {
    #[error("no image selected")]
    NoFileStaged,
    #[error("a search is already running")]
    AlreadySearching,
}

/// Design-patent search: uploads are only staged, searching needs an explicit
/// trigger, and only one search runs at a time.
pub struct PatentSearchPage<B: SearchBackend> {
    page: SearchPage<B>,
}

impl<B: SearchBackend> Clone for PatentSearchPage<B> {
    fn clone(&self) -> Self {
        Self {
            page: self.page.clone(),
        }
    }
}

impl<B: SearchBackend> Deref for PatentSearchPage<B> {
    type Target = SearchPage<B>;

    fn deref(&self) -> &Self::Target {
        &self.page
    }
}

impl<B: SearchBackend> PatentSearchPage<B> {
    pub fn new(backend: B, fields: SearchFields) -> Self {
        Self {
            page: SearchPage::new(backend, fields),
        }
    }

    /// Keep `file` for the next search. No request is made.
    ///
    /// Leaves `Idle` and the terminal phases for `Ready`; a running search keeps
    /// its phase and picks the file up on the next trigger.
    pub fn stage_file(&self, file: SelectedFile) {
        debug!("Staged {} for patent search", file.file_name);
        self.page.modify(|state| {
            state.staged_file = Some(file);
            if !state.loading() {
                state.phase = SearchPhase::Ready;
            }
        });
    }

    pub fn clear_file(&self) {
        self.page.modify(|state| {
            state.staged_file = None;
            if state.phase == SearchPhase::Ready {
                state.phase = SearchPhase::Idle;
            }
        });
    }

    /// Whether the search button is enabled.
    pub fn can_search(&self) -> bool {
        let state = self.page.state();
        state.staged_file.is_some() && !state.loading()
    }

    /// Search with the staged file and the current field values.
    ///
    /// # Errors
    /// Rejected without a request when nothing is staged or a search is
    /// already running.
    pub async fn trigger_search(&self) -> Result<SearchPhase, TriggerRejected> {
        let mut claim = Err(TriggerRejected::NoFileStaged);
        self.page.modify_if(|state| {
            if state.loading() {
                claim = Err(TriggerRejected::AlreadySearching);
                return false;
            }
            let Some(file) = state.staged_file.clone() else {
                return false;
            };
            SearchPage::<B>::begin(state);
            claim = Ok((file, state.fields.to_parameters(true)));
            true
        });

        let (file, params) = claim.inspect_err(|reason| info!("Search not started: {}", reason))?;
        Ok(self.page.execute(file, params).await)
    }

    /// Handler for [`crate::components::upload::UploadCapture`]: stages the file.
    pub fn upload_handler(&self) -> impl Fn(SelectedFile) + Send + Sync + 'static {
        let page = self.clone();
        move |file| page.stage_file(file)
    }
}
