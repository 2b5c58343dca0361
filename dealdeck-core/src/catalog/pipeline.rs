//! The catalog pipeline
//!
//! Owns the authoritative result set and the active view criteria. Network
//! operations are tagged with a request token; only the response to the
//! most recently issued load or search is applied, so a slow response that
//! lands after a newer one is dropped instead of overwriting it. Detail
//! lookups carry their own token and only the latest one opens its modal.
//!
//! State lives behind a mutex that is only held for synchronous bookkeeping
//! and view calls, never across an await point.

use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use super::criteria::{SortKey, ViewCriteria};
use super::record::{DealDetail, DealRecord, MAX_GAMES};
use super::stores::INITIAL_STORE_ID;
use crate::error::TransportError;
use crate::gateway::DealsGateway;
use crate::view::View;

/// Alert text shown when a detail lookup fails
pub const DETAIL_FAILURE_MESSAGE: &str = "Could not load game details";

/// Sequence number tagging a load, search or detail lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequestToken(u64);

/// What became of a load or search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Result set replaced and rendered with this many records
    Rendered(usize),
    /// Request succeeded with no records
    Empty,
    /// Transport failure, result set left as it was
    Failed,
    /// A newer request was issued before this one resolved
    Superseded,
}

impl LoadOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, LoadOutcome::Failed)
    }
}

#[derive(Debug, Default)]
struct PipelineState {
    results: Vec<DealRecord>,
    criteria: ViewCriteria,
    /// Token of the most recently issued load or search
    latest_token: u64,
    /// Token of the most recently issued detail lookup
    latest_detail: u64,
    /// Requests of any kind still awaiting a response
    in_flight: usize,
}

/// Result set, view criteria and the operations over them
pub struct CatalogPipeline<G, V> {
    gateway: G,
    view: V,
    initial_store: String,
    state: Mutex<PipelineState>,
}

impl<G, V> CatalogPipeline<G, V>
where
    G: DealsGateway,
    V: View,
{
    /// Create an empty pipeline; nothing is fetched until [`Self::load_initial`]
    pub fn new(gateway: G, view: V) -> Self {
        Self {
            gateway,
            view,
            initial_store: INITIAL_STORE_ID.to_string(),
            state: Mutex::new(PipelineState::default()),
        }
    }

    /// Use a different storefront for the initial listing
    pub fn with_initial_store(mut self, store_id: impl Into<String>) -> Self {
        self.initial_store = store_id.into();
        self
    }

    pub fn initial_store(&self) -> &str {
        &self.initial_store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Fetch the initial storefront listing and replace the result set
    pub async fn load_initial(&self) -> LoadOutcome {
        let token = self.begin_load();
        debug!(
            "Loading initial deals from store {} via {} (token {})",
            self.initial_store,
            self.gateway.name(),
            token.0
        );

        let response = self.gateway.list_deals(&self.initial_store, MAX_GAMES).await;
        self.complete_load(token, response)
    }

    /// Search by title; a blank term falls back to the initial listing
    pub async fn search(&self, term: &str) -> LoadOutcome {
        let term = term.trim();
        if term.is_empty() {
            return self.load_initial().await;
        }

        let token = self.begin_load();
        debug!(
            "Searching {} for '{}' (token {})",
            self.gateway.name(),
            term,
            token.0
        );

        let response = self.gateway.search_by_title(term, MAX_GAMES).await;
        self.complete_load(token, response)
    }

    /// Change the store filter and re-render from the current result set
    ///
    /// A blank store id clears the filter.
    pub fn set_store_filter(&self, store_id: Option<String>) -> Vec<DealRecord> {
        let mut state = self.lock();
        state.criteria.store_filter = store_id.filter(|id| !id.trim().is_empty());
        self.render_derived(&state)
    }

    /// Change the sort order and re-render from the current result set
    pub fn set_sort(&self, sort_key: Option<SortKey>) -> Vec<DealRecord> {
        let mut state = self.lock();
        state.criteria.sort_key = sort_key;
        self.render_derived(&state)
    }

    /// The filtered and sorted projection of the result set
    pub fn derived_view(&self) -> Vec<DealRecord> {
        let state = self.lock();
        state.criteria.apply(&state.results)
    }

    pub fn criteria(&self) -> ViewCriteria {
        self.lock().criteria.clone()
    }

    /// The unfiltered result set
    pub fn results(&self) -> Vec<DealRecord> {
        self.lock().results.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight > 0
    }

    /// Look up one game's detail and open it in the view
    ///
    /// Failures raise an alert rather than the inline error indicator and
    /// leave the result set alone. A lookup overtaken by a newer one still
    /// returns its response but shows nothing.
    pub async fn fetch_detail(&self, game_id: &str) -> Result<DealDetail, TransportError> {
        let token = {
            let mut state = self.lock();
            state.latest_detail += 1;
            self.begin_request(&mut state);
            RequestToken(state.latest_detail)
        };
        debug!("Fetching detail for game {} from {}", game_id, self.gateway.name());

        let response = self.gateway.get_detail(game_id).await;

        let mut state = self.lock();
        if token.0 != state.latest_detail {
            debug!(
                "Discarding stale detail for game {} (token {}, latest {})",
                game_id, token.0, state.latest_detail
            );
        } else {
            match &response {
                Ok(detail) => self.view.render_detail(detail),
                Err(e) => {
                    warn!("Failed to load detail for game {}: {}", game_id, e);
                    self.view.alert(DETAIL_FAILURE_MESSAGE);
                }
            }
        }
        self.finish_request(&mut state);

        response
    }

    fn lock(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_request(&self, state: &mut PipelineState) {
        state.in_flight += 1;
        self.view.set_loading(true);
    }

    fn finish_request(&self, state: &mut PipelineState) {
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 {
            self.view.set_loading(false);
        }
    }

    fn begin_load(&self) -> RequestToken {
        let mut state = self.lock();
        state.latest_token += 1;
        self.view.clear_status();
        self.begin_request(&mut state);
        RequestToken(state.latest_token)
    }

    fn complete_load(
        &self,
        token: RequestToken,
        response: Result<Vec<DealRecord>, TransportError>,
    ) -> LoadOutcome {
        let mut state = self.lock();

        let outcome = if token.0 != state.latest_token {
            debug!(
                "Discarding response for token {} (latest is {})",
                token.0, state.latest_token
            );
            LoadOutcome::Superseded
        } else {
            match response {
                Ok(mut records) => {
                    records.truncate(MAX_GAMES);
                    state.results = records;
                    state.criteria = ViewCriteria::default();

                    if state.results.is_empty() {
                        self.view.render_empty();
                        LoadOutcome::Empty
                    } else {
                        info!("Loaded {} deals", state.results.len());
                        self.view.render_list(&state.results);
                        LoadOutcome::Rendered(state.results.len())
                    }
                }
                Err(e) => {
                    warn!("Failed to load deals: {}", e);
                    self.view.render_error();
                    LoadOutcome::Failed
                }
            }
        };

        self.finish_request(&mut state);
        outcome
    }

    fn render_derived(&self, state: &PipelineState) -> Vec<DealRecord> {
        let view = state.criteria.apply(&state.results);
        if view.is_empty() {
            self.view.render_empty();
        } else {
            self.view.render_list(&view);
        }
        view
    }
}
