//! Maps user actions to backend calls and applies their responses to the
//! view state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{
    domain::{puzzle_ids, Backend, PuzzleId, PuzzleImage},
    filters::{FilterCategory, FilterSelection},
    pagination::PAGE_SIZE,
    protocol::{FilterRequest, RecommendationRequest},
    schema_org::{collection_page, CollectionPage},
};
use tracing::{debug, error, info, warn};

use crate::{
    config::Settings,
    error::{Operation, RequestError},
    state::{ResponseSequence, ViewState},
    transport::{HttpBackend, PuzzleBackend},
};

/// How an operation that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// Returned early without contacting the backend.
    Skipped,
    /// A newer response had already been applied; this one was dropped.
    Superseded,
}

#[derive(Debug, Clone, Copy)]
enum Loading {
    Images,
    Recommendations,
}

#[derive(Default)]
struct OrchestratorState {
    view: ViewState,
    images_in_flight: usize,
    recommendations_in_flight: usize,
    images_seq: ResponseSequence,
    recommendations_seq: ResponseSequence,
    /// Bumped by every reload; responses from an older epoch are dropped.
    epoch: u64,
}

impl OrchestratorState {
    fn sync_loading_flags(&mut self) {
        self.view.is_loading_images = self.images_in_flight > 0;
        self.view.is_loading_recommendations = self.recommendations_in_flight > 0;
    }

    fn counter(&mut self, kind: Loading) -> &mut usize {
        match kind {
            Loading::Images => &mut self.images_in_flight,
            Loading::Recommendations => &mut self.recommendations_in_flight,
        }
    }
}

/// Holds a loading flag up until dropped, whichever way the call ends.
struct LoadingGuard<'a> {
    inner: &'a Mutex<OrchestratorState>,
    kind: Loading,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let counter = inner.counter(self.kind);
        *counter = counter.saturating_sub(1);
        inner.sync_loading_flags();
    }
}

pub struct Orchestrator {
    backend: Arc<dyn PuzzleBackend>,
    settings: Settings,
    inner: Mutex<OrchestratorState>,
}

impl Orchestrator {
    pub fn new(settings: Settings) -> Self {
        let backend = Arc::new(HttpBackend::new(settings.clone()));
        Self::with_backend(settings, backend)
    }

    pub fn with_backend(settings: Settings, backend: Arc<dyn PuzzleBackend>) -> Self {
        Self {
            backend,
            settings,
            inner: Mutex::new(OrchestratorState::default()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn snapshot(&self) -> ViewState {
        self.lock().view.clone()
    }

    /// schema.org description of the images currently loaded.
    pub fn structured_data(&self) -> CollectionPage {
        let inner = self.lock();
        collection_page(&inner.view.images, &self.settings.image_base_url)
    }

    fn lock(&self) -> MutexGuard<'_, OrchestratorState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, kind: Loading) -> LoadingGuard<'_> {
        let mut inner = self.lock();
        *inner.counter(kind) += 1;
        inner.sync_loading_flags();
        LoadingGuard {
            inner: &self.inner,
            kind,
        }
    }

    fn fail(&self, operation: Operation, err: anyhow::Error) -> RequestError {
        let err = RequestError::new(operation, &err);
        error!(operation = %operation, error = %err.detail, "backend request failed");
        err
    }

    pub async fn load_initial(&self) -> Result<Completion, RequestError> {
        let (ticket, epoch) = {
            let mut inner = self.lock();
            (inner.images_seq.issue(), inner.epoch)
        };
        let _loading = self.begin(Loading::Images);
        debug!(ticket, epoch, "requesting initial puzzle images");

        let images = match self.backend.initial_images().await {
            Ok(images) => images,
            Err(err) => return Err(self.fail(Operation::LoadInitial, err)),
        };

        let mut inner = self.lock();
        if inner.epoch != epoch {
            warn!(ticket, epoch, "dropping initial load issued before a reload");
            return Ok(Completion::Superseded);
        }
        inner.view.original_images = images.clone();
        inner.view.initial_loaded = true;
        if !inner.images_seq.try_apply(ticket) {
            warn!(ticket, "initial load finished after a newer image response; gallery kept");
            return Ok(Completion::Superseded);
        }
        info!(count = images.len(), "loaded initial puzzle images");
        inner.view.images = images;
        Ok(Completion::Applied)
    }

    /// Runs a search. The query goes to the backend as typed, empty or not.
    /// The recommendations flag is raised for the whole call, since a
    /// successful search is followed by a recommendation refresh.
    pub async fn search(&self, query: &str) -> Result<Completion, RequestError> {
        let ticket = self.lock().images_seq.issue();
        let loading = self.begin(Loading::Images);
        let _recommendations_loading = self.begin(Loading::Recommendations);
        debug!(ticket, query, "requesting search results");

        let images = match self.backend.search(query).await {
            Ok(images) => images,
            Err(err) => return Err(self.fail(Operation::Search, err)),
        };

        let visible = {
            let mut inner = self.lock();
            if !inner.images_seq.try_apply(ticket) {
                warn!(ticket, query, "dropping stale search response");
                return Ok(Completion::Superseded);
            }
            info!(count = images.len(), query, "applied search results");
            let visible = first_page_ids(&images);
            inner.view.search_results = images.clone();
            inner.view.images = images;
            inner.view.search_performed = true;
            inner.view.filter_applied = false;
            inner.view.reset_filters();
            visible
        };
        drop(loading);

        self.refresh_after_images(&visible).await;
        Ok(Completion::Applied)
    }

    /// Narrows the base set with `selection`, which also becomes the active
    /// panel selection. An empty base set makes this a no-op.
    pub async fn filter(&self, selection: FilterSelection) -> Result<Completion, RequestError> {
        let _recommendations_loading = self.begin(Loading::Recommendations);
        let (ticket, request) = {
            let mut inner = self.lock();
            inner.view.selected_filters = selection.clone();

            let candidates = puzzle_ids(inner.view.filter_base());
            if candidates.is_empty() {
                warn!("no images available to filter");
                return Ok(Completion::Skipped);
            }

            let endpoint = self
                .settings
                .game_state_filter_url(inner.view.game_state_backend)
                .to_string();
            let request = FilterRequest {
                filters: selection,
                puzzle_ids: candidates,
                game_state_filter_endpoint: endpoint,
            };
            (inner.images_seq.issue(), request)
        };
        let loading = self.begin(Loading::Images);
        debug!(
            ticket,
            candidates = request.puzzle_ids.len(),
            game_state_endpoint = %request.game_state_filter_endpoint,
            "requesting filtered images"
        );

        let images = match self.backend.filter(&request).await {
            Ok(images) => images,
            Err(err) => return Err(self.fail(Operation::Filter, err)),
        };

        let visible = {
            let mut inner = self.lock();
            if !inner.images_seq.try_apply(ticket) {
                warn!(ticket, "dropping stale filter response");
                return Ok(Completion::Superseded);
            }
            info!(count = images.len(), "applied filter results");
            let visible = first_page_ids(&images);
            inner.view.images = images;
            inner.view.filter_applied = true;
            visible
        };
        drop(loading);

        self.refresh_after_images(&visible).await;
        Ok(Completion::Applied)
    }

    /// Fetches recommendations for the visible puzzles. At most one page of
    /// ids is sent.
    pub async fn refresh_recommendations(
        &self,
        visible_ids: &[PuzzleId],
    ) -> Result<Completion, RequestError> {
        if visible_ids.is_empty() {
            return Ok(Completion::Skipped);
        }
        let ids = &visible_ids[..visible_ids.len().min(PAGE_SIZE)];

        let (ticket, backend) = {
            let mut inner = self.lock();
            (
                inner.recommendations_seq.issue(),
                inner.view.recommendation_backend,
            )
        };
        let _loading = self.begin(Loading::Recommendations);
        debug!(ticket, backend = %backend, count = ids.len(), "requesting recommendations");

        let request = RecommendationRequest {
            puzzle_ids: ids.to_vec(),
        };
        let recommendations = match self.backend.recommendations(backend, &request).await {
            Ok(recommendations) => recommendations,
            Err(err) => return Err(self.fail(Operation::Recommendations, err)),
        };

        let mut inner = self.lock();
        if !inner.recommendations_seq.try_apply(ticket) {
            warn!(ticket, "dropping stale recommendations");
            return Ok(Completion::Superseded);
        }
        info!(count = recommendations.len(), backend = %backend, "applied recommendations");
        inner.view.recommendations = recommendations;
        Ok(Completion::Applied)
    }

    /// Gallery pagination hook. Recommendations only follow the page once a
    /// search has happened.
    pub async fn on_page_change(
        &self,
        visible_ids: &[PuzzleId],
    ) -> Result<Completion, RequestError> {
        if !self.lock().view.search_performed {
            return Ok(Completion::Skipped);
        }
        self.refresh_recommendations(visible_ids).await
    }

    // Failures are already logged by refresh_recommendations and must not
    // fail the search or filter that triggered them.
    async fn refresh_after_images(&self, visible: &[PuzzleId]) {
        let _ = self.refresh_recommendations(visible).await;
    }

    /// Drops all view state and reloads the startup collection. Responses
    /// still in flight from before the reload are discarded.
    pub async fn reload(&self) -> Result<Completion, RequestError> {
        {
            let mut inner = self.lock();
            inner.view = ViewState::default();
            inner.epoch += 1;
            inner.images_seq.invalidate_pending();
            inner.recommendations_seq.invalidate_pending();
            inner.sync_loading_flags();
        }
        info!("view state reset");
        self.load_initial().await
    }

    pub fn set_recommendation_backend(&self, backend: Backend) {
        self.lock().view.recommendation_backend = backend;
    }

    pub fn set_game_state_backend(&self, backend: Backend) {
        self.lock().view.game_state_backend = backend;
    }

    pub fn set_selected_filters(&self, selection: FilterSelection) {
        self.lock().view.selected_filters = selection;
    }

    /// Returns whether `value` is selected afterwards.
    pub fn toggle_filter_value(&self, category: FilterCategory, value: &str) -> bool {
        self.lock().view.selected_filters.toggle(category, value)
    }

    /// Returns whether the section is expanded afterwards.
    pub fn toggle_section(&self, category: FilterCategory) -> bool {
        self.lock().view.expanded_sections.toggle(category)
    }

    pub fn set_section_expanded(&self, category: FilterCategory, expanded: bool) {
        self.lock().view.expanded_sections.set(category, expanded);
    }
}

fn first_page_ids(images: &[PuzzleImage]) -> Vec<PuzzleId> {
    images
        .iter()
        .take(PAGE_SIZE)
        .map(|image| image.puzzle_id.clone())
        .collect()
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
