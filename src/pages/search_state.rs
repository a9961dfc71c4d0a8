use crate::api::backend::SearchBackend;
use crate::api::search_structs::{
    PatentFilters, SearchData, SearchParameters, DEFAULT_MIN_SCORE, DEFAULT_TOP_K,
};
use crate::common::selected_file::SelectedFile;
use crate::components::detail_overlay::{DetailOverlay, DetailRecord, DetailView};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    /// A file is staged but no search has been requested yet.
    Ready,
    Searching,
    Success,
    Failed,
}

impl SearchPhase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// Current values of the search form.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFields {
    pub top_k: u32,
    pub min_score: f64,
    pub keyword: String,
    pub loc_class: String,
    pub applicant: String,
}

impl Default for SearchFields {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K, DEFAULT_MIN_SCORE)
    }
}

impl SearchFields {
    #[must_use]
    pub const fn new(top_k: u32, min_score: f64) -> Self {
        Self {
            top_k,
            min_score,
            keyword: String::new(),
            loc_class: String::new(),
            applicant: String::new(),
        }
    }

    #[must_use]
    pub fn to_parameters(&self, with_filters: bool) -> SearchParameters {
        let params = SearchParameters::new(self.top_k, self.min_score);
        if with_filters {
            params.with_filters(PatentFilters::from_fields(
                &self.keyword,
                &self.loc_class,
                &self.applicant,
            ))
        } else {
            params
        }
    }
}

/// Everything a search page shows.
#[derive(Debug, Clone)]
pub struct SearchState<R> {
    pub phase: SearchPhase,
    pub fields: SearchFields,
    pub staged_file: Option<SelectedFile>,
    /// Last error, shown until dismissed or the next search starts.
    pub error: Option<String>,
    /// Last successful response. Replaced wholesale, never merged.
    pub outcome: Option<SearchData<R>>,
    pub overlay: DetailOverlay<R>,
}

impl<R> SearchState<R> {
    fn new(fields: SearchFields) -> Self {
        Self {
            phase: SearchPhase::Idle,
            fields,
            staged_file: None,
            error: None,
            outcome: None,
            overlay: DetailOverlay::default(),
        }
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.phase == SearchPhase::Searching
    }

    #[must_use]
    pub fn results(&self) -> &[R] {
        self.outcome.as_ref().map_or(&[], |o| o.results.as_slice())
    }
}

/// Page state plus the backend it searches. Cloning shares the same state.
///
/// State lives in a `watch` channel: every change is published to subscribers
/// and all mutation goes through `send_modify`/`send_if_modified`.
pub struct SearchPage<B: SearchBackend> {
    backend: Arc<B>,
    state: Arc<watch::Sender<SearchState<B::Match>>>,
}

impl<B: SearchBackend> Clone for SearchPage<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            state: self.state.clone(),
        }
    }
}

impl<B: SearchBackend> SearchPage<B> {
    pub fn new(backend: B, fields: SearchFields) -> Self {
        let (state, _) = watch::channel(SearchState::new(fields));
        Self {
            backend: Arc::new(backend),
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState<B::Match>> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn state(&self) -> SearchState<B::Match> {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> SearchPhase {
        self.state.borrow().phase
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading()
    }

    pub fn update_fields(&self, update: impl FnOnce(&mut SearchFields)) {
        self.state.send_modify(|state| update(&mut state.fields));
    }

    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|state| state.error.take().is_some());
    }

    pub(crate) fn modify(&self, update: impl FnOnce(&mut SearchState<B::Match>)) {
        self.state.send_modify(update);
    }

    pub(crate) fn modify_if(&self, update: impl FnOnce(&mut SearchState<B::Match>) -> bool) -> bool {
        self.state.send_if_modified(update)
    }

    /// Enter `Searching`: clears the previous error, keeps previous results.
    pub(crate) fn begin(state: &mut SearchState<B::Match>) {
        state.phase = SearchPhase::Searching;
        state.error = None;
    }

    /// Run one request and apply its outcome. The page must already be in
    /// `Searching`.
    pub(crate) async fn execute(&self, file: SelectedFile, params: SearchParameters) -> SearchPhase {
        let outcome = if let Err(e) = params.validate() {
            Err(e.to_string())
        } else {
            match self.backend.search(&file, &params).await {
                Ok(envelope) => envelope.into_data().map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            }
        };
        self.finish(outcome)
    }

    fn finish(&self, outcome: Result<SearchData<B::Match>, String>) -> SearchPhase {
        let mut phase = SearchPhase::Failed;
        self.state.send_modify(|state| match outcome {
            Ok(data) => {
                info!("Search returned {} results", data.results.len());
                state.outcome = Some(data);
                state.error = None;
                state.phase = SearchPhase::Success;
                phase = SearchPhase::Success;
            }
            Err(message) => {
                warn!("Search failed: {}", message);
                state.error = Some(message);
                state.phase = SearchPhase::Failed;
            }
        });
        phase
    }
}

impl<B: SearchBackend> SearchPage<B>
where
    B::Match: DetailRecord,
{
    /// Show result `index` in the detail overlay. Out-of-range indices do nothing.
    pub fn open_detail(&self, index: usize) -> Option<DetailView<B::Match>> {
        let mut opened = None;
        self.state.send_if_modified(|state| {
            let Some(record) = state.results().get(index).cloned() else {
                return false;
            };
            opened = Some(state.overlay.open(&record).clone());
            true
        });
        opened
    }

    pub fn close_detail(&self) {
        self.state.send_if_modified(|state| {
            let was_visible = state.overlay.is_visible();
            state.overlay.close();
            was_visible
        });
    }
}
