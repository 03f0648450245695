//! Query orchestration state machine.
//!
//! Sits between the input surface (TUI keys, CLI flags) and the transport.
//! Given the raw query text and the current parameters it decides whether to
//! search immediately, debounce, serve from cache, or skip entirely, and it
//! owns the single in-flight-request slot.
//!
//! Requests run on worker threads and report back through a channel; `tick()`
//! drains that channel on the UI thread, so every state transition happens
//! there. Supersession is enforced by a generation counter: an outcome whose
//! generation no longer matches the in-flight slot is discarded, which makes
//! response application last-request-wins regardless of arrival order.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, info, warn};

use crate::api::{ApiError, CancelToken, SearchBackend};
use crate::config::ClientConfig;
use crate::model::types::{Metric, SearchHit, SearchParams, SearchRequest, SearchResponse};
use crate::search::cache::{ResponseCache, request_key};
use crate::search::debounce::Debouncer;

/// Where the orchestrator is in its request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// No query, no request.
    Idle,
    /// A request is in flight; displayed results are the last settled ones.
    Searching,
    /// The last request completed, successfully or not.
    Settled,
}

/// Everything the presentation layer needs to render.
///
/// Owned exclusively by the orchestrator; mutated only through its
/// transitions. While `phase` is `Searching`, `results` always hold the last
/// settled response, never a partial one. A surfaced `error` clears previous
/// results, so `error` and non-empty `results` never coexist.
#[derive(Debug)]
pub struct UiState {
    pub query: String,
    pub params: SearchParams,
    pub phase: SearchPhase,
    pub error: Option<String>,
    pub results: Vec<SearchHit>,
}

impl UiState {
    pub fn loading(&self) -> bool {
        self.phase == SearchPhase::Searching
    }
}

/// The at-most-one current request and its cancellation token.
struct InFlight {
    generation: u64,
    cancel: CancelToken,
}

/// What a worker thread reports back when its request settles.
struct SearchOutcome {
    generation: u64,
    /// Cache key for `/search` responses; `None` for the `/posts` listing.
    fingerprint: Option<String>,
    result: Result<serde_json::Value, ApiError>,
}

pub struct QueryOrchestrator<B: SearchBackend> {
    backend: Arc<B>,
    cache: Arc<ResponseCache>,
    debouncer: Debouncer,
    search_url: String,
    state: UiState,
    generation: u64,
    in_flight: Option<InFlight>,
    outcome_tx: Sender<SearchOutcome>,
    outcome_rx: Receiver<SearchOutcome>,
}

impl<B: SearchBackend> QueryOrchestrator<B> {
    pub fn new(backend: Arc<B>, cache: Arc<ResponseCache>, config: &ClientConfig) -> Self {
        let (outcome_tx, outcome_rx) = unbounded();
        Self {
            backend,
            cache,
            debouncer: Debouncer::new(config.debounce),
            search_url: format!("{}/search", config.endpoint),
            state: UiState {
                query: String::new(),
                params: SearchParams::default(),
                phase: SearchPhase::Idle,
                error: None,
                results: Vec::new(),
            },
            generation: 0,
            in_flight: None,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Fetch the unfiltered listing shown before the user types anything.
    /// Runs once at startup; a failure surfaces like any other request
    /// failure and does not block searching.
    pub fn initial_load(&mut self) {
        self.start_request(None, None);
    }

    /// The query text changed (live typing).
    ///
    /// Empty text cancels everything and returns to `Idle` without issuing a
    /// request. Otherwise a cached fingerprint settles immediately, bypassing
    /// both the network and the debounce delay; a miss schedules the
    /// debounced trigger.
    pub fn set_query(&mut self, text: &str) {
        self.state.query = text.to_string();
        if text.trim().is_empty() {
            self.clear_to_idle();
            return;
        }

        let req = SearchRequest::new(text, self.state.params);
        match self.cached_response(&req) {
            Some(resp) => {
                self.debouncer.cancel();
                self.cancel_in_flight();
                self.settle_success(resp);
            }
            None => self.debouncer.trigger(text.to_string()),
        }
    }

    /// Metric changed. Parameter changes are deliberate actions, so an active
    /// query re-searches immediately with the new value - no debounce.
    pub fn set_metric(&mut self, metric: Metric) {
        self.state.params.metric = metric;
        if !self.state.query.trim().is_empty() {
            self.search_now();
        }
    }

    /// Result limit changed; same immediate re-search rule as `set_metric`.
    pub fn set_k(&mut self, k: usize) {
        self.state.params = self.state.params.with_k(k);
        if !self.state.query.trim().is_empty() {
            self.search_now();
        }
    }

    /// Explicit submit (Enter): immediate, non-debounced search for the
    /// current text and parameters, cache-checked first.
    pub fn submit(&mut self) {
        self.search_now();
    }

    /// Advance the machine: fire a ripe debounce and drain settled outcomes.
    /// Called from the UI tick loop. Returns true when displayed state
    /// changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;

        if let Some(released) = self.debouncer.poll() {
            // The text may have changed since scheduling; the current query
            // is authoritative.
            debug!(released = %released, current = %self.state.query, "debounce_fired");
            if !self.state.query.trim().is_empty() {
                self.search_now();
                changed = true;
            }
        }

        while let Ok(outcome) = self.outcome_rx.try_recv() {
            changed |= self.apply_outcome(outcome);
        }

        changed
    }

    /// Immediate search for the current text and parameters. Shared by
    /// submit, parameter changes, and the debounce trigger; always checks the
    /// cache before touching the network.
    fn search_now(&mut self) {
        self.debouncer.cancel();
        if self.state.query.trim().is_empty() {
            self.clear_to_idle();
            return;
        }

        let req = SearchRequest::new(&self.state.query, self.state.params);
        if let Some(resp) = self.cached_response(&req) {
            self.cancel_in_flight();
            self.settle_success(resp);
            return;
        }

        let body = match serde_json::to_value(&req) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "request serialization failed");
                return;
            }
        };
        let key = request_key(&self.search_url, &body);
        self.start_request(Some(req), Some(key));
    }

    /// Look up the typed response for a request, if its fingerprint is
    /// cached. An entry that no longer validates is treated as a miss.
    fn cached_response(&self, req: &SearchRequest) -> Option<SearchResponse> {
        let body = serde_json::to_value(req).ok()?;
        let key = request_key(&self.search_url, &body);
        let raw = self.cache.get(&key)?;
        match SearchResponse::from_value(&raw) {
            Ok(resp) => {
                debug!(key = %key, "cache_hit");
                Some(resp)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cached payload failed validation");
                None
            }
        }
    }

    /// Cancel the current slot and spawn a worker for the next generation.
    /// `req == None` requests the unfiltered `/posts` listing.
    fn start_request(&mut self, req: Option<SearchRequest>, fingerprint: Option<String>) {
        self.cancel_in_flight();
        self.generation += 1;
        let generation = self.generation;
        let cancel = CancelToken::new();
        self.in_flight = Some(InFlight {
            generation,
            cancel: cancel.clone(),
        });
        self.state.phase = SearchPhase::Searching;
        self.state.error = None;

        info!(
            generation,
            query = req.as_ref().map(|r| r.query.as_str()).unwrap_or(""),
            "search_start"
        );

        let backend = Arc::clone(&self.backend);
        let tx = self.outcome_tx.clone();
        thread::spawn(move || {
            let result = match &req {
                Some(r) => backend.search(r, &cancel),
                None => backend.list_posts(&cancel),
            };
            // The orchestrator may already be gone on shutdown.
            let _ = tx.send(SearchOutcome {
                generation,
                fingerprint,
                result,
            });
        });
    }

    fn apply_outcome(&mut self, outcome: SearchOutcome) -> bool {
        let is_current = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.generation == outcome.generation);

        match outcome.result {
            Ok(raw) => {
                // Completed responses are cached even when superseded: the
                // payload for this fingerprint is deterministic and a later
                // identical request can short-circuit on it.
                if let Some(key) = &outcome.fingerprint {
                    self.cache.set(key, raw.clone());
                }
                if !is_current {
                    debug!(generation = outcome.generation, "superseded_response_discarded");
                    return false;
                }
                self.in_flight = None;
                match SearchResponse::from_value(&raw) {
                    Ok(resp) => {
                        info!(
                            generation = outcome.generation,
                            count = resp.results.len(),
                            "search_settled"
                        );
                        self.settle_success(resp);
                    }
                    Err(e) => self.settle_failure(format!("malformed response: {e}")),
                }
                true
            }
            Err(err) if err.is_abort() => {
                // Cancellation is internal bookkeeping; it never mutates
                // displayed state and never surfaces to the user.
                debug!(generation = outcome.generation, "aborted_request_settled");
                false
            }
            Err(err) => {
                if !is_current {
                    debug!(generation = outcome.generation, "superseded_failure_discarded");
                    return false;
                }
                self.in_flight = None;
                warn!(generation = outcome.generation, error = %err, "search_failed");
                self.settle_failure(err.to_string());
                true
            }
        }
    }

    fn settle_success(&mut self, resp: SearchResponse) {
        self.state.phase = SearchPhase::Settled;
        self.state.error = None;
        self.state.results = resp.results;
    }

    /// Never retried automatically; the user re-triggers by typing, changing
    /// a parameter, or resubmitting.
    fn settle_failure(&mut self, message: String) {
        self.state.phase = SearchPhase::Settled;
        self.state.results.clear();
        self.state.error = Some(message);
    }

    fn clear_to_idle(&mut self) {
        self.debouncer.cancel();
        self.cancel_in_flight();
        self.state.phase = SearchPhase::Idle;
        self.state.error = None;
        self.state.results.clear();
    }

    fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
            debug!(generation = in_flight.generation, "request_cancelled");
        }
    }
}
